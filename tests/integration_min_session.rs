// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop, the wall-clock scheduler and crossterm
// input handling without relying on internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn one_second_round_runs_out_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let profile = dir.path().join("profile.json");
    let history = dir.path().join("history.csv");

    let bin = assert_cmd::cargo::cargo_bin("keyrush");
    let cmd = format!(
        "{} --duration 1 --name pty --profile {} --history-log {}",
        bin.display(),
        profile.display(),
        history.display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    // Enter starts the round; let the clock run out
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(1800));

    p.send("\x1b")?; // ESC
    p.expect(Eof)?;

    let rows = std::fs::read_to_string(&history)?;
    assert_eq!(rows.lines().count(), 2);
    assert!(rows.contains(",pty,0,100,0,1"));
    Ok(())
}
