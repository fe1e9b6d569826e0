use assert_cmd::prelude::*;
use std::process::Command;

// We check the --help output in order to confirm that the clap cli is setup correctly.
// Any arguments that are set up incorrectly will cause clap to panic regardless of the
// arguments or options provided.
#[test]
fn check_clap_cli_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("isbn-search")?;

    cmd.arg("--help");
    cmd.assert().success();

    Ok(())
}

#[test]
fn check_valid_isbn13() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("isbn-search")?;

    cmd.args(["check", "978-0-306-40615-7"]);
    cmd.assert()
        .success()
        .stdout("'9780306406157' is a valid ISBN-13\n");

    Ok(())
}

#[test]
fn check_converts_isbn10() -> Result<(), Box<dyn std::error::Error>> {
    let output = Command::cargo_bin("isbn-search")?
        .args(["check", "0306406152"])
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("ISBN-13: 9780306406157"), "{stdout}");

    Ok(())
}

#[test]
fn check_lists_corrections() -> Result<(), Box<dyn std::error::Error>> {
    let output = Command::cargo_bin("isbn-search")?
        .args(["check", "9870306406157"])
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("did you mean"), "{stdout}");
    assert!(stdout.contains("    9780306406157"), "{stdout}");

    Ok(())
}

#[test]
fn quiet_check_prints_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("isbn-search")?;

    cmd.args(["--quiet", "check", "0306406152"]);
    cmd.assert().success().stdout("");

    Ok(())
}

// An ISBN without corrections is rejected before any request is made.
#[test]
fn search_without_corrections_fails() -> Result<(), Box<dyn std::error::Error>> {
    let output = Command::cargo_bin("isbn-search")?
        .args(["loc", "1234567890123"])
        .output()?;

    assert_eq!(Some(2), output.status.code());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("no corrections were found"), "{stderr}");

    Ok(())
}

#[test]
fn unknown_format_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("isbn-search")?;

    cmd.args(["google", "9780306406157", "--format", "yaml"]);
    cmd.assert().failure();

    Ok(())
}
