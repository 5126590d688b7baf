use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use stalecheck::config::model::DefaultSection;
use stalecheck::errors::StalecheckError;
use stalecheck::fs::mock::MockFileSystem;
use stalecheck::registry::resolve::{
    expand_placeholders, is_glob, resolve_input_patterns, resolve_outputs,
};
use stalecheck::registry::{input_set_from_config, InputSource, TargetRegistry};
use stalecheck_test_utils::builders::{ConfigFileBuilder, TargetConfigBuilder};

fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn placeholders_expand_against_vars() {
    let vars = vars(&[("outdir", "out/Release"), ("mode", "Debug")]);

    assert_eq!(
        expand_placeholders("<outdir>/node", &vars).unwrap(),
        "out/Release/node"
    );
    assert_eq!(
        expand_placeholders("build/<mode>/<mode>.log", &vars).unwrap(),
        "build/Debug/Debug.log"
    );
    assert_eq!(expand_placeholders("plain/path", &vars).unwrap(), "plain/path");
}

#[test]
fn unknown_placeholder_is_a_config_error() {
    let vars = BTreeMap::new();
    match expand_placeholders("<ghost>/node", &vars) {
        Err(StalecheckError::ConfigError(msg)) => {
            assert!(msg.contains("unknown variable '<ghost>'"), "msg: {msg}");
        }
        other => panic!("expected ConfigError, got {:?}", other),
    }
}

#[test]
fn glob_detection() {
    assert!(is_glob("src/**/*.c"));
    assert!(is_glob("out/node?.bin"));
    assert!(is_glob("lib/[ab].js"));
    assert!(!is_glob("out/Release/node"));
    assert!(!is_glob("Makefile"));
}

#[test]
fn literal_outputs_are_kept_even_when_absent() {
    let fs = MockFileSystem::new();
    let outputs = resolve_outputs(
        &fs,
        &PathBuf::from("."),
        &["out/node".to_string()],
        &BTreeMap::new(),
    )
    .unwrap();

    assert_eq!(outputs, vec![PathBuf::from("./out/node")]);
}

#[test]
fn glob_outputs_contribute_only_matches() {
    let fs = MockFileSystem::new();
    fs.add_file("./out/lib/a.h", 10);
    fs.add_file("./out/lib/b.h", 20);
    fs.add_file("./out/lib/notes.txt", 30);

    let outputs = resolve_outputs(
        &fs,
        &PathBuf::from("."),
        &["out/lib/*.h".to_string()],
        &BTreeMap::new(),
    )
    .unwrap();

    assert_eq!(
        outputs,
        vec![PathBuf::from("./out/lib/a.h"), PathBuf::from("./out/lib/b.h")]
    );
}

#[test]
fn input_patterns_apply_excludes_to_globs_only() {
    let fs = MockFileSystem::new();
    fs.add_file("./src/main.c", 10);
    fs.add_file("./src/gen_tmp.c", 20);
    fs.add_file("./Makefile", 30);

    let inputs = resolve_input_patterns(
        &fs,
        &PathBuf::from("."),
        &["src/**/*.c".to_string(), "Makefile".to_string()],
        &["src/**/*_tmp.c".to_string()],
    )
    .unwrap();

    assert_eq!(
        inputs,
        vec![PathBuf::from("./Makefile"), PathBuf::from("./src/main.c")]
    );
}

#[test]
fn missing_literal_inputs_survive_resolution() {
    // Resolution keeps the path; evaluation is where it fails loudly.
    let fs = MockFileSystem::new();
    let inputs = resolve_input_patterns(
        &fs,
        &PathBuf::from("."),
        &["gone.txt".to_string()],
        &[],
    )
    .unwrap();

    assert_eq!(inputs, vec![PathBuf::from("./gone.txt")]);
}

#[test]
fn input_set_uses_defaults_when_target_declares_none() {
    let defaults = DefaultSection {
        inputs: vec!["src/**/*.c".to_string()],
        exclude: vec!["src/**/*.tmp".to_string()],
    };
    let target = TargetConfigBuilder::new("make t").output("out.bin").build();

    let set = input_set_from_config(&target, &defaults);
    assert_eq!(
        set.sources,
        vec![InputSource::Pattern("src/**/*.c".to_string())]
    );
    assert_eq!(set.exclude, vec!["src/**/*.tmp".to_string()]);
}

#[test]
fn input_set_appends_defaults_when_asked() {
    let defaults = DefaultSection {
        inputs: vec!["common.gypi".to_string()],
        exclude: vec![],
    };
    let target = TargetConfigBuilder::new("make t")
        .output("out.bin")
        .input("src/**/*.c")
        .append_default_inputs(true)
        .build();

    let set = input_set_from_config(&target, &defaults);
    assert_eq!(
        set.sources,
        vec![
            InputSource::Pattern("src/**/*.c".to_string()),
            InputSource::Pattern("common.gypi".to_string()),
        ]
    );
}

#[test]
fn default_inputs_flow_through_registry_evaluation() {
    let cfg = ConfigFileBuilder::new()
        .with_default_input("src/**/*.c")
        .with_target(
            "T",
            TargetConfigBuilder::new("make T").output("out.bin").build(),
        )
        .build();

    let fs = MockFileSystem::new();
    fs.add_file("./out.bin", 100);
    fs.add_file("./src/main.c", 150);

    let registry =
        TargetRegistry::from_config_with_fs(&cfg, ".", Arc::new(fs.clone())).unwrap();
    let decision = registry.evaluate("T", false).unwrap();

    assert!(decision.needs_build);
    assert_eq!(
        decision.reason.as_deref(),
        Some("./src/main.c is newer than ./out.bin")
    );
}
