use std::fs;
use std::path::{Path, PathBuf};

fn rs_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
                out.push(path);
            }
        }
    }
    out.sort();
    out
}

fn rel(path: &Path) -> String {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let rel = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();
    rel.replace('\\', "/")
}

fn src(path: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(path)
}

fn forbidden_imports(files: &[PathBuf], forbidden: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in files {
        let content = fs::read_to_string(file).unwrap_or_default();
        for needle in forbidden {
            if content.contains(needle) {
                violations.push(format!(
                    "{} imports forbidden dependency `{}`",
                    rel(file),
                    needle
                ));
            }
        }
    }
    violations
}

#[test]
fn rank_module_is_pure() {
    let violations = forbidden_imports(
        &rs_files(&src("rank")),
        &["crate::system", "crate::session", "sysinfo", "tokio"],
    );

    assert!(
        violations.is_empty(),
        "Ranking layering violations:\n{}",
        violations.join("\n")
    );
}

#[test]
fn report_rendering_does_not_touch_the_host() {
    let files = vec![src("report.rs"), src("format.rs"), src("task.rs")];
    let violations = forbidden_imports(
        &files,
        &["crate::system", "crate::session", "sysinfo", "tokio"],
    );

    assert!(
        violations.is_empty(),
        "Report layering violations:\n{}",
        violations.join("\n")
    );
}

#[test]
fn session_control_is_host_agnostic() {
    let files = vec![src("session.rs"), src("sampler.rs"), src("console.rs")];
    let violations = forbidden_imports(&files, &["crate::system", "sysinfo"]);

    assert!(
        violations.is_empty(),
        "Session/host boundary violations:\n{}",
        violations.join("\n")
    );
}

#[test]
fn target_os_cfg_is_scoped_to_system_platform() {
    let mut violations = Vec::new();

    for file in rs_files(&src("")) {
        let content = fs::read_to_string(&file).unwrap_or_default();
        if !content.contains("target_os") {
            continue;
        }

        let rel_path = rel(&file);
        if !rel_path.starts_with("src/system/platform/") {
            violations.push(format!(
                "{} contains `target_os` cfg but is outside allowed boundary",
                rel_path
            ));
        }
    }

    assert!(
        violations.is_empty(),
        "Unexpected target_os cfg usage:\n{}",
        violations.join("\n")
    );
}
