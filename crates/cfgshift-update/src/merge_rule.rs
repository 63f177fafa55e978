//! Merge conflict policy
//!
//! When the user and default documents both hold a block under the same key
//! and the pair is not (section, section), a [`MergeRule`] names the pair and
//! [`MergeRules`] decides whether the user's block survives.

/// Kind pair of a user block and the default block under the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeRule {
    /// User terminal, default terminal
    Terminals,
    /// User terminal where the default has a section
    TerminalAtSection,
    /// User section where the default has a terminal
    SectionAtTerminal,
}

impl MergeRule {
    /// Rule for a kind pair; `None` for two sections, which are merged
    /// recursively
    #[inline]
    #[must_use]
    pub fn of(user_is_section: bool, default_is_section: bool) -> Option<Self> {
        match (user_is_section, default_is_section) {
            (false, false) => Some(Self::Terminals),
            (false, true) => Some(Self::TerminalAtSection),
            (true, false) => Some(Self::SectionAtTerminal),
            (true, true) => None,
        }
    }
}

/// Whether the user's block is preserved, per [`MergeRule`]
///
/// Defaults: user values win over default values, mismatched kinds take the
/// default's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRules {
    terminals: bool,
    terminal_at_section: bool,
    section_at_terminal: bool,
}

impl MergeRules {
    /// Create default rules
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the user block is preserved for `rule`
    #[inline]
    #[must_use]
    pub fn with(mut self, rule: MergeRule, preserve_user: bool) -> Self {
        *self.slot(rule) = preserve_user;
        self
    }

    /// Check if the user block is preserved for `rule`
    #[inline]
    #[must_use]
    pub fn preserve_user(&self, rule: MergeRule) -> bool {
        match rule {
            MergeRule::Terminals => self.terminals,
            MergeRule::TerminalAtSection => self.terminal_at_section,
            MergeRule::SectionAtTerminal => self.section_at_terminal,
        }
    }

    fn slot(&mut self, rule: MergeRule) -> &mut bool {
        match rule {
            MergeRule::Terminals => &mut self.terminals,
            MergeRule::TerminalAtSection => &mut self.terminal_at_section,
            MergeRule::SectionAtTerminal => &mut self.section_at_terminal,
        }
    }
}

impl Default for MergeRules {
    fn default() -> Self {
        Self {
            terminals: true,
            terminal_at_section: false,
            section_at_terminal: false,
        }
    }
}
