//! Cross-process determinism: spawns the `classify_fixture` binary under
//! several environment variants and asserts identical output. Proves the
//! classification is not influenced by process-level state (cwd, locale,
//! hash seeds).

use std::path::Path;
use std::process::Command;

use lock_tests::fixtures::workspace_root;

/// `cargo test` puts test binaries in `target/<profile>/deps/`; the fixture
/// binary lives one level up.
fn binary_path() -> String {
    let mut path = std::env::current_exe()
        .expect("can resolve test binary path")
        .parent()
        .expect("binary dir exists")
        .parent()
        .expect("deps parent exists")
        .to_path_buf();
    path.push("classify_fixture");
    path.to_string_lossy().to_string()
}

fn run_variant(work_dir: &Path, env_overrides: &[(&str, &str)]) -> String {
    let bin = binary_path();
    let mut command = Command::new(&bin);
    command
        .current_dir(work_dir)
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!(
            "failed to spawn {bin} (work_dir={}, overrides={env_overrides:?}): {e}",
            work_dir.display()
        )
    });
    assert!(
        output.status.success(),
        "classify_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_determinism_three_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);

    let tmp = tempfile::tempdir().unwrap();
    let moved = run_variant(tmp.path(), &[("LC_ALL", "C")]);
    let localized = run_variant(&root, &[("LANG", "de_DE.UTF-8"), ("RUST_LOG", "trace")]);

    assert_eq!(baseline, moved, "cwd/locale changed the output");
    assert_eq!(baseline, localized, "locale/env changed the output");
}

#[test]
fn fixture_reports_a_valid_tree() {
    let out = run_variant(&workspace_root(), &[]);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines.contains(&"valid=true"), "{out}");
    assert!(lines.contains(&"termination=valid tree found"), "{out}");
    assert!(lines.contains(&"endnodes_missing=0"), "{out}");
    assert!(lines.iter().any(|l| l.starts_with("output_digest=sha256:")), "{out}");
}
