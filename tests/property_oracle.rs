use std::path::PathBuf;

use proptest::prelude::*;

use stalecheck::fs::mock::MockFileSystem;
use stalecheck::oracle::{evaluate, ResolvedPaths};

/// Build a mock filesystem holding `inputs.len()` input files and
/// `outputs.len()` output files with the given mtimes, plus the matching
/// `ResolvedPaths` for the oracle.
fn tree_from_mtimes(inputs: &[u64], outputs: &[u64]) -> (MockFileSystem, ResolvedPaths) {
    let fs = MockFileSystem::new();
    let mut paths = ResolvedPaths::default();

    for (i, secs) in inputs.iter().enumerate() {
        let path = format!("./in/src_{i}.txt");
        fs.add_file(&path, *secs);
        paths.inputs.push(PathBuf::from(path));
    }
    for (i, secs) in outputs.iter().enumerate() {
        let path = format!("./out/result_{i}.bin");
        fs.add_file(&path, *secs);
        paths.outputs.push(PathBuf::from(path));
    }

    (fs, paths)
}

proptest! {
    /// The oracle must agree with the plain mtime model: stale iff forced
    /// or the newest input beats the oldest output.
    #[test]
    fn decision_matches_mtime_model(
        inputs in proptest::collection::vec(0u64..10_000, 1..8),
        outputs in proptest::collection::vec(0u64..10_000, 1..4),
        force in any::<bool>(),
    ) {
        let (fs, paths) = tree_from_mtimes(&inputs, &outputs);

        let decision = evaluate(&fs, "t", &paths, force).unwrap();

        let newest_input = inputs.iter().copied().max().unwrap_or(0);
        let oldest_output = outputs.iter().copied().min().unwrap_or(0);
        let expected = force || newest_input > oldest_output;

        prop_assert_eq!(decision.needs_build, expected);
    }

    /// Two evaluations with no intervening filesystem change must return
    /// identical decisions.
    #[test]
    fn evaluation_is_idempotent(
        inputs in proptest::collection::vec(0u64..10_000, 1..8),
        outputs in proptest::collection::vec(0u64..10_000, 1..4),
        force in any::<bool>(),
    ) {
        let (fs, paths) = tree_from_mtimes(&inputs, &outputs);

        let first = evaluate(&fs, "t", &paths, force).unwrap();
        let second = evaluate(&fs, "t", &paths, force).unwrap();

        prop_assert_eq!(first, second);
    }

    /// Advancing an input past every output flips a fresh target to stale;
    /// a decision never flips back without a filesystem change.
    #[test]
    fn advancing_an_input_makes_a_fresh_target_stale(
        base in proptest::collection::vec(0u64..1_000, 1..6),
        outputs in proptest::collection::vec(1_000u64..2_000, 1..4),
        bumped_index in any::<proptest::sample::Index>(),
    ) {
        // All inputs start at or below every output.
        let (fs, paths) = tree_from_mtimes(&base, &outputs);
        let fresh = evaluate(&fs, "t", &paths, false).unwrap();
        prop_assert!(!fresh.needs_build);

        let newest_output = outputs.iter().copied().max().unwrap_or(0);
        let index = bumped_index.index(base.len());
        fs.set_mtime(format!("./in/src_{index}.txt"), newest_output + 1);

        let stale = evaluate(&fs, "t", &paths, false).unwrap();
        prop_assert!(stale.needs_build);
    }
}
