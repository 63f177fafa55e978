//! Testing utilities for cfgshift workspace
//!
//! Shared test helpers and fixtures.

#![allow(missing_docs)]

use std::sync::Once;

use cfgshift_document::{Document, DocumentSettings, Route};
use cfgshift_version::{Pattern, Segment, Version};
use tracing_subscriber::EnvFilter;

/// `major.minor` with major in 1..=100 and minor in 0..=10
pub fn standard_pattern() -> Pattern {
    Pattern::new([
        Segment::range(1, 100),
        Segment::literal("."),
        Segment::range(0, 10),
    ])
    .unwrap()
}

pub fn version(id: &str) -> Version {
    standard_pattern().version(id).unwrap()
}

pub fn document(yaml: &str) -> Document {
    Document::load(yaml, DocumentSettings::new()).unwrap()
}

pub fn document_with(yaml: &str, settings: DocumentSettings) -> Document {
    Document::load(yaml, settings).unwrap()
}

pub fn route(text: &str) -> Route {
    text.parse().unwrap()
}

/// Install a fmt subscriber once, filtered by `RUST_LOG`
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
