use std::{fs, process::Command};

fn rampart() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rampart"))
}

#[test]
fn help_lists_the_run_flags() {
    let output = rampart().arg("--help").output().expect("run rampart --help");
    assert!(output.status.success());

    let help = String::from_utf8_lossy(&output.stdout);
    for flag in ["--config", "--layout", "--seed", "--waves", "--tick-ms", "--rush"] {
        assert!(help.contains(flag), "missing {flag} in:\n{help}");
    }
}

#[test]
fn scripted_layout_survives_the_first_wave() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let layout = dir.path().join("layout.toml");
    fs::write(
        &layout,
        "[[towers]]\nkind = \"basic\"\ncolumn = 5\nrow = 4\n\n\
         [[towers]]\nkind = \"basic\"\ncolumn = 10\nrow = 4\n",
    )?;

    let output = rampart()
        .arg("--layout")
        .arg(&layout)
        .args(["--waves", "1", "--tick-ms", "100", "--rush", "--seed", "3"])
        .output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr:\n{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Survived 1 waves."), "stdout:\n{stdout}");
    assert!(stdout.contains("Coins left:"));
    Ok(())
}

#[test]
fn malformed_layout_fails_with_context() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let layout = dir.path().join("broken.toml");
    fs::write(&layout, "[[towers]]\nkind = \"laser\"\ncolumn = 1\nrow = 1\n")?;

    let output = rampart().arg("--layout").arg(&layout).output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid tower layout"), "stderr:\n{stderr}");
    Ok(())
}
