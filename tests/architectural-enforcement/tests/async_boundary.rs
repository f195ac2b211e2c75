//! Integration Test: Sync/Async Boundary
//!
//! **Policy**: The console is synchronous. Async code exists only inside the
//! transport worker in `parlor/core`, and it must never block its runtime.
//!
//! **Required**: Cross the boundary with channels. Async code sends without
//! waiting; sync code blocks on crossbeam receivers.

use architectural_enforcement::{find_anywhere, find_in_async, scan_dir, workspace_root};

const CORE_SRC: &str = "parlor/core/src";
const CONSOLE_SRC: &str = "console/src";

fn blocks_the_runtime(line: &str) -> bool {
    line.contains("blocking_recv(")
        || line.contains("blocking_send(")
        || line.contains("thread::sleep(")
        || line.contains("recv_timeout(")
        || (line.contains("select!") && !line.contains("tokio::select!"))
}

fn is_async(line: &str) -> bool {
    line.contains("async fn") || line.contains(".await") || line.contains("async move")
}

/// Async bodies in the core never block their thread
#[test]
fn test_no_blocking_handoff_in_async_code() {
    let dir = workspace_root().join(CORE_SRC);
    assert!(dir.exists(), "missing {}", dir.display());

    let violations = scan_dir(&dir, |source| find_in_async(source, blocks_the_runtime));

    if !violations.is_empty() {
        eprintln!("\n❌ Blocking calls found inside async code!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n❌ FORBIDDEN inside async fn / async blocks:");
        eprintln!("  - tokio mpsc blocking_recv() / blocking_send()");
        eprintln!("  - std::thread::sleep()");
        eprintln!("  - crossbeam select! / recv_timeout()");
        eprintln!("\n✅ REQUIRED:");
        eprintln!("  - tokio::select! and .await on tokio channels");
        eprintln!("  - crossbeam unbounded send() toward sync code");

        panic!("\nFound {} blocking call(s) in async code.", violations.len());
    }
}

/// The console crate has no async code at all
#[test]
fn test_console_is_synchronous() {
    let dir = workspace_root().join(CONSOLE_SRC);
    assert!(dir.exists(), "missing {}", dir.display());

    let violations = scan_dir(&dir, |source| find_anywhere(source, is_async));

    if !violations.is_empty() {
        eprintln!("\n❌ Async code found in the console crate!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ Put async work behind a transport in parlor/core");

        panic!("\nFound {} async construct(s) in the console.", violations.len());
    }
}
