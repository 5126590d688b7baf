use std::collections::BTreeMap;
use std::sync::Arc;

use stalecheck::errors::StalecheckError;
use stalecheck::fs::mock::MockFileSystem;
use stalecheck::registry::{BuildTarget, InputSet, InputSource, TargetRegistry};
use stalecheck::types::OnConflict;
use stalecheck_test_utils::builders::{ConfigFileBuilder, TargetConfigBuilder};

fn target(name: &str, outputs: &[&str]) -> BuildTarget {
    BuildTarget {
        name: name.to_string(),
        outputs: outputs.iter().map(|s| s.to_string()).collect(),
        cmd: format!("make {name}"),
        force: false,
    }
}

fn empty_registry(policy: OnConflict) -> TargetRegistry {
    TargetRegistry::with_fs(
        ".",
        BTreeMap::new(),
        policy,
        Arc::new(MockFileSystem::new()),
    )
}

#[test]
fn register_rejects_empty_output_list() {
    let mut registry = empty_registry(OnConflict::Reject);

    match registry.register(target("T", &[]), InputSet::default()) {
        Err(StalecheckError::ConfigError(msg)) => {
            assert!(msg.contains("declares no outputs"), "msg: {msg}");
        }
        other => panic!("expected ConfigError, got {:?}", other),
    }
}

#[test]
fn register_rejects_overlapping_outputs() {
    let mut registry = empty_registry(OnConflict::Reject);
    registry
        .register(target("A", &["shared.bin"]), InputSet::default())
        .unwrap();

    match registry.register(target("B", &["shared.bin"]), InputSet::default()) {
        Err(StalecheckError::ConfigError(msg)) => {
            assert!(msg.contains("both declare output"), "msg: {msg}");
        }
        other => panic!("expected ConfigError, got {:?}", other),
    }
}

#[test]
fn reject_policy_allows_identical_re_registration() {
    let mut registry = empty_registry(OnConflict::Reject);
    registry
        .register(target("T", &["out.bin"]), InputSet::default())
        .unwrap();

    // Same definition again: accepted as a no-op.
    registry
        .register(target("T", &["out.bin"]), InputSet::default())
        .unwrap();
    assert_eq!(registry.len(), 1);
}

#[test]
fn reject_policy_errors_on_conflicting_re_registration() {
    let mut registry = empty_registry(OnConflict::Reject);
    registry
        .register(target("T", &["out.bin"]), InputSet::default())
        .unwrap();

    let conflicting = InputSet {
        sources: vec![InputSource::Pattern("src.txt".to_string())],
        exclude: vec![],
    };
    match registry.register(target("T", &["out.bin"]), conflicting) {
        Err(StalecheckError::ConfigError(msg)) => {
            assert!(msg.contains("conflicting definition"), "msg: {msg}");
        }
        other => panic!("expected ConfigError, got {:?}", other),
    }
}

#[test]
fn replace_policy_keeps_the_newest_definition() {
    let mut registry = empty_registry(OnConflict::Replace);
    registry
        .register(target("T", &["out.bin"]), InputSet::default())
        .unwrap();
    registry
        .register(target("T", &["other.bin"]), InputSet::default())
        .unwrap();

    let kept = registry.get("T").expect("target registered");
    assert_eq!(kept.outputs, vec!["other.bin".to_string()]);
    assert_eq!(registry.len(), 1);
}

#[test]
fn evaluation_order_follows_dependencies_not_names() {
    // Alphabetical order would put "alast" first; the dependency edge must
    // override that.
    let cfg = ConfigFileBuilder::new()
        .with_target(
            "zfirst",
            TargetConfigBuilder::new("make z").output("z.bin").build(),
        )
        .with_target(
            "alast",
            TargetConfigBuilder::new("make a")
                .output("a.bin")
                .after("zfirst")
                .build(),
        )
        .build();

    let registry =
        TargetRegistry::from_config_with_fs(&cfg, ".", Arc::new(MockFileSystem::new()))
            .unwrap();

    let order = registry.evaluation_order().unwrap();
    assert_eq!(order, vec!["zfirst".to_string(), "alast".to_string()]);
}

#[test]
fn dependency_closure_covers_transitive_deps_only() {
    let cfg = ConfigFileBuilder::new()
        .with_target(
            "base",
            TargetConfigBuilder::new("make base").output("base.bin").build(),
        )
        .with_target(
            "mid",
            TargetConfigBuilder::new("make mid")
                .output("mid.bin")
                .after("base")
                .build(),
        )
        .with_target(
            "top",
            TargetConfigBuilder::new("make top")
                .output("top.bin")
                .after("mid")
                .build(),
        )
        .with_target(
            "unrelated",
            TargetConfigBuilder::new("make other").output("other.bin").build(),
        )
        .build();

    let registry =
        TargetRegistry::from_config_with_fs(&cfg, ".", Arc::new(MockFileSystem::new()))
            .unwrap();

    let closure = registry.dependency_closure("mid").unwrap();
    assert_eq!(closure, vec!["base".to_string(), "mid".to_string()]);

    match registry.dependency_closure("nope") {
        Err(StalecheckError::TargetNotFound(name)) => assert_eq!(name, "nope"),
        other => panic!("expected TargetNotFound, got {:?}", other),
    }
}

#[test]
fn evaluate_all_isolates_per_target_errors() {
    let cfg = ConfigFileBuilder::new()
        .with_target(
            "good",
            TargetConfigBuilder::new("make good")
                .output("good.bin")
                .input("good.src")
                .build(),
        )
        .with_target(
            "bad",
            TargetConfigBuilder::new("make bad")
                .output("bad.bin")
                .input("gone.src")
                .build(),
        )
        .build();

    let fs = MockFileSystem::new();
    fs.add_file("./good.bin", 100);
    fs.add_file("./good.src", 50);
    fs.add_file("./bad.bin", 100);

    let registry =
        TargetRegistry::from_config_with_fs(&cfg, ".", Arc::new(fs.clone())).unwrap();

    let results = registry.evaluate_all(false).unwrap();
    assert_eq!(results.len(), 2);

    for (name, result) in results {
        match name.as_str() {
            "good" => assert!(!result.unwrap().needs_build),
            "bad" => assert!(matches!(
                result,
                Err(StalecheckError::MissingInput(_))
            )),
            other => panic!("unexpected target {other}"),
        }
    }
}

#[test]
fn manual_cycle_is_reported_at_evaluation_order() {
    // The config validator refuses cycles up front; a registry assembled by
    // hand reports them when an order is requested.
    let mut registry = empty_registry(OnConflict::Reject);
    let a_inputs = InputSet {
        sources: vec![InputSource::TargetOutputs("B".to_string())],
        exclude: vec![],
    };
    let b_inputs = InputSet {
        sources: vec![InputSource::TargetOutputs("A".to_string())],
        exclude: vec![],
    };
    registry.register(target("A", &["a.bin"]), a_inputs).unwrap();
    registry.register(target("B", &["b.bin"]), b_inputs).unwrap();

    match registry.evaluation_order() {
        Err(StalecheckError::DepCycle(msg)) => {
            assert!(msg.contains("cycle detected"), "msg: {msg}");
        }
        other => panic!("expected DepCycle, got {:?}", other),
    }
}

#[test]
fn vars_expand_in_declared_outputs() {
    let cfg = ConfigFileBuilder::new()
        .with_var("outdir", "out/Release")
        .with_target(
            "T",
            TargetConfigBuilder::new("make T")
                .output("<outdir>/node")
                .input("src.txt")
                .build(),
        )
        .build();

    let fs = MockFileSystem::new();
    fs.add_file("./out/Release/node", 100);
    fs.add_file("./src.txt", 50);

    let registry =
        TargetRegistry::from_config_with_fs(&cfg, ".", Arc::new(fs.clone())).unwrap();
    assert!(!registry.evaluate("T", false).unwrap().needs_build);

    fs.set_mtime("./src.txt", 150);
    let decision = registry.evaluate("T", false).unwrap();
    assert!(decision.needs_build);
    assert_eq!(
        decision.reason.as_deref(),
        Some("./src.txt is newer than ./out/Release/node")
    );
}
