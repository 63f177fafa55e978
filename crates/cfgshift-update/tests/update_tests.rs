//! Update Engine Tests
//!
//! End-to-end runs of the updater over loaded documents: versioning,
//! relocation, merging and pruning together.
//!
use cfgshift_document::{Comment, NodeRole, Position, Route};
use cfgshift_test_utils::{document, init_tracing, route, standard_pattern, version};
use cfgshift_update::{
    AutomaticVersioning, ManualVersioning, MergeRule, Relocations, Relocator, UpdateError,
    UpdateStage, Updater, UpdaterSettings,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_yaml::Value;

fn cycle_relocations() -> Relocations {
    Relocations::new()
        .with("1.2", route("x"), route("f"))
        .with("1.3", route("x"), route("g"))
        .with("1.3", route("y"), route("x"))
        .with("1.3", route("j"), route("k"))
        .with("2.3", route("g"), route("h"))
        .with("2.3", route("z"), route("i"))
}

fn automatic() -> AutomaticVersioning {
    AutomaticVersioning::new(standard_pattern(), route("version"))
}

#[test]
fn test_relocation_cycle_is_safe() {
    init_tracing();
    let mut user = document("x: a\ny: b\nz: {a: 1, b: 10}\n");
    let (from, to) = (version("1.2"), version("2.3"));

    let moved = Relocator::new(user.root_mut(), &from, &to)
        .apply(&cycle_relocations())
        .unwrap();

    assert_eq!(moved, 4);
    assert_eq!(
        user.root().keys().cloned().collect::<Vec<_>>(),
        ["x", "h", "i"].map(Value::from)
    );
    assert_eq!(user.root().get_section(&route("i")).unwrap().len(), 2);
    assert_eq!(
        user.to_value().unwrap(),
        document("x: b\nh: a\ni: {a: 1, b: 10}\n").to_value().unwrap()
    );
}

#[test]
fn test_update_replays_relocations_then_merges() {
    init_tracing();
    let settings = UpdaterSettings::new()
        .with_versioning(ManualVersioning::new(standard_pattern(), Some("1.2"), "2.3").unwrap())
        .with_relocations(cycle_relocations());
    let mut user = document("x: a\ny: b\nz: {a: 1, b: 10}\n");
    let default = document("h: ''\nx: ''\ni: {a: 0, b: 0}\nnew: 1\n");

    let report = Updater::update(&mut user, &default, &settings).unwrap();

    assert!(report.relocated);
    assert_eq!(report.stage, UpdateStage::Done);
    assert_eq!(report.user_version, Some(version("1.2")));
    assert_eq!(report.default_version, Some(version("2.3")));
    assert_eq!(
        user.dump().unwrap(),
        "x: b\nh: a\ni:\n  a: 1\n  b: 10\nnew: 1\n"
    );
}

#[test]
fn test_merge_only_end_to_end() {
    let mut user = document("x: 1.2\ny: true\nz: {a: 1, b: 10}\no: 'a: b'\n");
    let default = document("x: 1.4\ny: false\nz: {a: 5, b: 10}\nm: 'a: c'\n");

    let report = Updater::update(&mut user, &default, &UpdaterSettings::new()).unwrap();

    assert_eq!(
        user.to_value().unwrap(),
        document("x: 1.2\ny: true\nz: {a: 1, b: 10}\nm: 'a: c'\n")
            .to_value()
            .unwrap()
    );
    assert!(!report.relocated);
    assert_eq!(report.user_version, None);
    assert_eq!(report.merge.added, 1);
    assert_eq!(report.merge.pruned, 1);
    assert_eq!(report.stage, UpdateStage::Done);
}

#[test]
fn test_user_terminal_beats_default_type() {
    let mut user = document("count: 5\n");
    Updater::update(&mut user, &document("count: five\n"), &UpdaterSettings::new()).unwrap();
    assert_eq!(user.get_value(&route("count")), Some(&Value::from(5)));
}

#[test]
fn test_terminal_rule_can_favor_default() {
    let settings = UpdaterSettings::new().with_merge_rule(MergeRule::Terminals, false);
    let mut user = document("count: 5\n");
    Updater::update(&mut user, &document("count: five\n"), &settings).unwrap();
    assert_eq!(user.get_str(&route("count")), Some("five"));
}

#[test]
fn test_pruning_honours_keep_all() {
    let default = document("a: 1\n");

    let mut pruned = document("a: 1\nlocal: 2\n");
    Updater::update(&mut pruned, &default, &UpdaterSettings::new()).unwrap();
    assert!(pruned.get(&route("local")).is_none());

    let mut kept = document("a: 1\nlocal: 2\n");
    Updater::update(&mut kept, &default, &UpdaterSettings::new().with_keep_all(true)).unwrap();
    assert_eq!(kept.get_value(&route("local")), Some(&Value::from(2)));
}

#[test]
fn test_keep_route_follows_relocation() {
    let settings = UpdaterSettings::new()
        .with_versioning(ManualVersioning::new(standard_pattern(), Some("1.0"), "1.1").unwrap())
        .with_relocations(Relocations::new().with("1.1", route("legacy"), route("old.legacy")))
        .with_keep_route(route("legacy"));
    let mut user = document("a: 1\nlegacy: 2\n");

    Updater::update(&mut user, &document("a: 0\n"), &settings).unwrap();

    assert_eq!(user.get_value(&route("old.legacy")), Some(&Value::from(2)));
    assert!(user.get(&route("legacy")).is_none());
}

#[test]
fn test_default_untouched_by_user_edits() {
    let default = document("list: [1, 2]\nsection: {a: 1}\n");
    let mut user = document("");
    Updater::update(&mut user, &default, &UpdaterSettings::new()).unwrap();

    user.set(&route("section.a"), 99).unwrap();
    user.set(&route("list"), "changed").unwrap();

    assert_eq!(
        default.to_value().unwrap(),
        document("list: [1, 2]\nsection: {a: 1}\n").to_value().unwrap()
    );
}

#[test]
fn test_automatic_versioning_persists_default_id() {
    let settings = UpdaterSettings::new().with_versioning(automatic());
    let mut user = document("version: '1.2'\nport: 1\n");
    user.root_mut()
        .get_mut(&route("version"))
        .unwrap()
        .comments_mut()
        .add(NodeRole::Key, Position::Before, Comment::line("managed, do not edit"));
    let default = document("version: '1.4'\nport: 2\n");

    let report = Updater::update(&mut user, &default, &settings).unwrap();

    assert_eq!(report.stage, UpdateStage::Done);
    assert_eq!(
        user.dump().unwrap(),
        "# managed, do not edit\nversion: '1.4'\nport: 1\n"
    );
}

#[test]
fn test_unreadable_user_version_assumes_oldest() {
    let settings = UpdaterSettings::new()
        .with_versioning(automatic())
        .with_relocations(Relocations::new().with("1.1", route("a"), route("b")));
    let mut user = document("a: 1\n");

    let report = Updater::update(&mut user, &document("version: '1.1'\nb: 0\n"), &settings).unwrap();

    assert_eq!(report.user_version, Some(standard_pattern().oldest()));
    assert_eq!(report.moved, 1);
    assert_eq!(user.get_value(&route("b")), Some(&Value::from(1)));
    assert_eq!(user.get_str(&route("version")), Some("1.1"));
}

#[test]
fn test_missing_default_version_fails() {
    let settings = UpdaterSettings::new().with_versioning(automatic());
    let mut user = document("version: '1.0'\n");
    let err = Updater::update(&mut user, &document("a: 1\n"), &settings).unwrap_err();
    assert!(matches!(err, UpdateError::MissingDefaultVersion));
}

#[test]
fn test_malformed_default_version_fails() {
    let settings = UpdaterSettings::new().with_versioning(automatic());
    let mut user = document("version: '1.0'\n");
    let err = Updater::update(&mut user, &document("version: 'one'\n"), &settings).unwrap_err();
    assert!(matches!(err, UpdateError::Version(_)));
}

#[test]
fn test_downgrade_rejected_by_default() {
    let settings = UpdaterSettings::new()
        .with_versioning(ManualVersioning::new(standard_pattern(), Some("2.0"), "1.0").unwrap());
    let mut user = document("a: 1\n");
    let err = Updater::update(&mut user, &document("a: 2\nb: 3\n"), &settings).unwrap_err();
    match err {
        UpdateError::DowngradeNotAllowed { user, default } => {
            assert_eq!((user.as_str(), default.as_str()), ("2.0", "1.0"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(user.get(&route("b")).is_none());
}

#[test]
fn test_downgrade_allowed_skips_relocation() {
    let settings = UpdaterSettings::new()
        .with_versioning(ManualVersioning::new(standard_pattern(), Some("2.0"), "1.0").unwrap())
        .with_relocations(Relocations::new().with("1.0", route("a"), route("moved")))
        .with_downgrading(true);
    let mut user = document("a: 1\n");

    let report = Updater::update(&mut user, &document("a: 2\nb: 3\n"), &settings).unwrap();

    assert!(report.downgrade);
    assert!(!report.relocated);
    assert_eq!(
        user.to_value().unwrap(),
        document("a: 1\nb: 3\n").to_value().unwrap()
    );
}

#[test]
fn test_equal_versions_skip_relocation() {
    let settings = UpdaterSettings::new()
        .with_versioning(ManualVersioning::new(standard_pattern(), Some("1.1"), "1.1").unwrap())
        .with_relocations(Relocations::new().with("1.1", route("a"), route("b")));
    let mut user = document("a: 1\n");

    let report = Updater::update(&mut user, &document("a: 0\n"), &settings).unwrap();

    assert!(!report.relocated);
    assert_eq!(user.get_value(&route("a")), Some(&Value::from(1)));
}

#[test]
fn test_relocations_loaded_from_yaml() {
    let relocations = Relocations::from_yaml("'1.1':\n  server.port: net.port\n", '.').unwrap();
    let settings = UpdaterSettings::new()
        .with_versioning(ManualVersioning::new(standard_pattern(), Some("1.0"), "1.1").unwrap())
        .with_relocations(relocations);
    let mut user = document("server: {port: 8080}\n");

    Updater::update(&mut user, &document("net: {port: 80}\n"), &settings).unwrap();

    assert_eq!(user.dump().unwrap(), "net:\n  port: 8080\n");
}

#[test]
fn test_update_keeps_user_comments() {
    let mut user = document("# user config\n\n# listening port\nport: 1 # my port\nlocal: 2\n");
    let default = document("# defaults\nport: 8080\n# host name\nhost: x\n");

    Updater::update(&mut user, &default, &UpdaterSettings::new()).unwrap();

    assert_eq!(
        user.dump().unwrap(),
        "# user config\n\n# listening port\nport: 1 # my port\n# host name\nhost: x\n"
    );
}

#[test]
fn test_keep_flags_cleared_after_update() {
    let settings = UpdaterSettings::new()
        .with_versioning(ManualVersioning::new(standard_pattern(), Some("1.0"), "1.1").unwrap())
        .with_keep_route(route("local"));
    let mut user = document("a: 1\nlocal: 2\nflagged: 3\n");
    user.root_mut().get_mut(&route("flagged")).unwrap().set_keep(true);

    Updater::update(&mut user, &document("a: 0\n"), &settings).unwrap();

    assert!(!user.get(&route("local")).unwrap().is_kept());
    assert!(!user.get(&route("flagged")).unwrap().is_kept());

    Updater::update(&mut user, &document("a: 0\n"), &UpdaterSettings::new()).unwrap();
    assert_eq!(
        user.to_value().unwrap(),
        document("a: 1\n").to_value().unwrap()
    );
}

proptest! {
    #[test]
    fn prop_absent_relocation_leaves_tree_unchanged(
        from in "[a-z]{1,3}(\\.[a-z]{1,3}){0,2}",
        to in "[a-z]{1,3}(\\.[a-z]{1,3}){0,2}",
    ) {
        let text = "present: 1\nnested: {inner: 2}\n";
        let from: Route = from.parse().unwrap();
        prop_assume!(document(text).get(&from).is_none());

        let mut user = document(text);
        let relocations = Relocations::new().with("1.1", from, to.parse().unwrap());
        let moved = Relocator::new(user.root_mut(), &version("1.0"), &version("1.1"))
            .apply(&relocations)
            .unwrap();

        prop_assert_eq!(moved, 0);
        prop_assert_eq!(user.to_value().unwrap(), document(text).to_value().unwrap());
    }
}
