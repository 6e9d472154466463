//! Build-graph layering: kernel knows nothing of search, search knows
//! nothing of the harness.

use std::fmt::Write;
use std::fs;
use std::path::Path;

use lock_tests::fixtures::workspace_root;

fn scan(dir: &Path, forbidden: &[&str], violations: &mut Vec<(String, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan(&path, forbidden, violations);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            for (line_no, line) in content.lines().enumerate() {
                let trimmed = line.trim();
                if trimmed.starts_with("//") {
                    continue;
                }
                if forbidden.iter().any(|p| trimmed.contains(p)) {
                    violations.push((path.display().to_string(), line_no + 1, line.to_string()));
                }
            }
        }
    }
}

fn assert_clean(crate_dir: &str, forbidden: &[&str]) {
    let root = workspace_root();
    let mut violations = Vec::new();
    scan(&root.join(crate_dir).join("src"), forbidden, &mut violations);

    let manifest = fs::read_to_string(root.join(crate_dir).join("Cargo.toml"))
        .expect("crate manifest readable");
    for (line_no, line) in manifest.lines().enumerate() {
        let dashed: Vec<String> = forbidden.iter().map(|p| p.replace('_', "-")).collect();
        if dashed.iter().any(|p| line.trim_start().starts_with(p.as_str())) {
            violations.push(("Cargo.toml".into(), line_no + 1, line.to_string()));
        }
    }

    if !violations.is_empty() {
        let mut msg = format!("layering violations in {crate_dir}:\n");
        for (file, line, content) in &violations {
            let _ = writeln!(msg, "  {file}:{line}: {content}");
        }
        panic!("{msg}");
    }
}

#[test]
fn kernel_does_not_reach_upward() {
    assert_clean("kernel", &["airway_search", "airway_harness"]);
}

#[test]
fn search_does_not_reach_into_harness() {
    assert_clean("search", &["airway_harness"]);
}
