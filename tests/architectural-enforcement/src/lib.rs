//! Architectural Enforcement Integration Tests
//!
//! This package holds source scanners that enforce the sync/async boundary:
//! - The console crate is fully synchronous
//! - Async code in the core never parks its thread on a blocking handoff
//!
//! The scanners are line based. They skip comment lines and stop at the
//! first `#[cfg(test)]` of each file.

use std::fs;
use std::path::{Path, PathBuf};

/// A forbidden pattern found in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: PathBuf,
    pub line: usize,
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line, self.text)
    }
}

/// Workspace root, from this crate's manifest directory
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// All `.rs` files under `dir`
pub fn rust_sources(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect()
}

/// Production lines of a file: comment lines blanked, tests cut off
fn production_lines(source: &str) -> Vec<&str> {
    source
        .lines()
        .take_while(|line| !line.trim_start().starts_with("#[cfg(test)]"))
        .map(|line| {
            if line.trim_start().starts_with("//") {
                ""
            } else {
                line
            }
        })
        .collect()
}

/// Lines (1-based) matching `is_forbidden` anywhere in production code
pub fn find_anywhere(source: &str, is_forbidden: impl Fn(&str) -> bool) -> Vec<(usize, String)> {
    production_lines(source)
        .into_iter()
        .enumerate()
        .filter(|(_, line)| is_forbidden(line))
        .map(|(idx, line)| (idx + 1, line.trim().to_string()))
        .collect()
}

/// Lines (1-based) matching `is_forbidden` inside async fn bodies or async blocks
pub fn find_in_async(source: &str, is_forbidden: impl Fn(&str) -> bool) -> Vec<(usize, String)> {
    let mut found = Vec::new();
    let mut depth: i32 = 0;
    // Brace depth outside the innermost async body being tracked
    let mut async_floor: Option<i32> = None;
    let mut pending_async = false;

    for (idx, line) in production_lines(source).into_iter().enumerate() {
        if async_floor.is_none() && opens_async(line) {
            pending_async = true;
        }

        let inside_before = async_floor.is_some();
        for c in line.chars() {
            match c {
                '{' => {
                    if pending_async {
                        async_floor = Some(depth);
                        pending_async = false;
                    }
                    depth += 1;
                }
                '}' => depth -= 1,
                _ => {}
            }
        }

        if (inside_before || async_floor.is_some()) && is_forbidden(line) {
            found.push((idx + 1, line.trim().to_string()));
        }
        if matches!(async_floor, Some(floor) if depth <= floor) {
            async_floor = None;
        }
    }

    found
}

fn opens_async(line: &str) -> bool {
    line.contains("async fn") || line.contains("async move") || line.contains("async {")
}

/// Scan every Rust file under `dir` with `scan`
pub fn scan_dir(
    dir: &Path,
    scan: impl Fn(&str) -> Vec<(usize, String)>,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for path in rust_sources(dir) {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for (line, text) in scan(&content) {
            violations.push(Violation {
                path: path.clone(),
                line,
                text,
            });
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_sleep(line: &str) -> bool {
        line.contains("thread::sleep(")
    }

    #[test]
    fn test_sleep_in_async_fn_is_found() {
        let source = "\
fn sync_ok() {
    std::thread::sleep(d);
}

async fn bad() {
    if x {
        std::thread::sleep(d);
    }
}

fn after() {
    std::thread::sleep(d);
}
";
        let found = find_in_async(source, is_sleep);
        assert_eq!(found, vec![(7, "std::thread::sleep(d);".to_string())]);
    }

    #[test]
    fn test_async_move_block_is_tracked() {
        let source = "\
fn spawn() {
    runtime.block_on(async move {
        std::thread::sleep(d);
    });
    std::thread::sleep(d);
}
";
        let found = find_in_async(source, is_sleep);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 3);
    }

    #[test]
    fn test_comments_and_tests_are_skipped() {
        let source = "\
// async fn in a comment { thread::sleep(d) }
async fn ok() {}

#[cfg(test)]
mod tests {
    async fn t() { std::thread::sleep(d); }
}
";
        assert!(find_in_async(source, is_sleep).is_empty());
        assert!(find_anywhere(source, |l| l.contains("async fn t")).is_empty());
    }
}
