use std::process::Command;

#[test]
fn seeded_headless_run_completes() {
    let output = Command::new(env!("CARGO_BIN_EXE_pacboy"))
        .args(["--seconds", "3", "--seed", "7", "--draw-every", "0", "--log", "warn"])
        .output()
        .expect("failed to launch the pacboy binary");

    assert!(output.status.success(), "pacboy should exit cleanly");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome to Pacboy."));
    assert!(stdout.contains("Reached level"));
}

#[test]
fn unreadable_config_fails_with_context() {
    let output = Command::new(env!("CARGO_BIN_EXE_pacboy"))
        .args(["--seconds", "1", "--config", "/nonexistent/pacboy.toml"])
        .output()
        .expect("failed to launch the pacboy binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read config file"));
}
