mod common {
    pub mod test_prelude;
    pub mod test_utils;
}
use common::test_prelude::*;
use common::test_utils::write_log;
use tempfile::tempdir;

const MSVC_LOG: &str = "qmlstandalone\\main.cpp(54) : error C4716: 'findUnresolvedModule' : must return a value\n\
                        x:\\src\\msvcparser.cpp(69) : warning C4100: 'something' : unreferenced formal parameter\n\
                        Generating Code...\n";

const CLANG_LOG: &str = ".\\gdi.cpp(48,3) :  error: unknown type name 'errr'\n\
                         \x20 errr\n\
                         \x20 ^\n\
                         1 error generated.\n";

#[test]
fn text_report_and_summary() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let log = write_log(dir.path(), "build.log", MSVC_LOG)?;

    let mut cmd = Command::cargo_bin("e-msvc-tasks")?;
    cmd.current_dir(dir.path()).arg("--no-color").arg(&log);
    cmd.assert()
        .success()
        .stdout(contains(
            "qmlstandalone/main.cpp(54): error: C4716: 'findUnresolvedModule' : must return a value",
        ))
        .stdout(contains("x:/src/msvcparser.cpp(69): warning: C4100:"))
        .stdout(contains("Generating Code...").not())
        .stderr(contains("1 error, 1 warning, 0 other"));
    Ok(())
}

#[test]
fn reads_stdin_by_default() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut cmd = Command::cargo_bin("e-msvc-tasks")?;
    cmd.current_dir(dir.path())
        .arg("--no-color")
        .write_stdin("LINK : fatal error LNK1146: no argument specified with option '/LIBPATH:'\n");
    cmd.assert()
        .success()
        .stdout(contains("error: LNK1146: no argument specified"));
    Ok(())
}

#[test]
fn passthrough_echoes_unrecognized_lines() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let log = write_log(dir.path(), "build.log", MSVC_LOG)?;

    let mut cmd = Command::cargo_bin("e-msvc-tasks")?;
    cmd.current_dir(dir.path())
        .args(["--no-color", "--passthrough"])
        .arg(&log);
    cmd.assert()
        .success()
        .stdout(contains("Generating Code..."));
    Ok(())
}

#[test]
fn clang_cl_on_stderr_channel() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let log = write_log(dir.path(), "build.err", CLANG_LOG)?;

    let mut cmd = Command::cargo_bin("e-msvc-tasks")?;
    cmd.current_dir(dir.path())
        .args(["--no-color", "-p", "clang-cl", "-c", "stderr"])
        .arg(&log);
    cmd.assert()
        .success()
        .stdout(contains("gdi.cpp(48): error: unknown type name 'errr'\n    errr"))
        .stderr(contains("1 error, 0 warnings, 0 other"));
    Ok(())
}

#[test]
fn stderr_log_is_parsed_on_stderr() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let out_log = write_log(dir.path(), "build.log", MSVC_LOG)?;
    let err_log = write_log(
        dir.path(),
        "build.err",
        "cl : Command line warning D9002 : ignoring unknown option '-fopenmp'\n",
    )?;

    let mut cmd = Command::cargo_bin("e-msvc-tasks")?;
    cmd.current_dir(dir.path())
        .arg("--no-color")
        .arg("--stderr-log")
        .arg(&err_log)
        .arg(&out_log);
    cmd.assert()
        .success()
        .stdout(contains("warning: D9002 : ignoring unknown option '-fopenmp'"))
        .stderr(contains("1 error, 2 warnings, 0 other"));
    Ok(())
}

#[test]
fn logs_without_final_newline_stay_separate() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let first = write_log(dir.path(), "a.log", "a.cpp(1) : error C1001: first")?;
    let second = write_log(dir.path(), "b.log", "b.cpp(2) : error C1002: second\n")?;
    let err_log = write_log(dir.path(), "c.err", "c.cpp(3) : warning C4100: third")?;

    let mut cmd = Command::cargo_bin("e-msvc-tasks")?;
    cmd.current_dir(dir.path())
        .args(["--no-color", "--fail-on-error"])
        .arg("--stderr-log")
        .arg(&err_log)
        .arg(&first)
        .arg(&second);
    cmd.assert()
        .failure()
        .code(1)
        .stdout(contains("a.cpp(1): error: C1001: first\n"))
        .stdout(contains("b.cpp(2): error: C1002: second"))
        .stdout(contains("c.cpp(3): warning: C4100: third"))
        .stderr(contains("2 errors, 1 warning, 0 other"));
    Ok(())
}

#[test]
fn fail_on_error_sets_exit_status() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let log = write_log(dir.path(), "build.log", MSVC_LOG)?;

    let mut cmd = Command::cargo_bin("e-msvc-tasks")?;
    cmd.current_dir(dir.path())
        .args(["--no-color", "--fail-on-error"])
        .arg(&log);
    cmd.assert().failure().code(1);

    let clean = write_log(dir.path(), "clean.log", "Generating Code...\n")?;
    let mut cmd = Command::cargo_bin("e-msvc-tasks")?;
    cmd.current_dir(dir.path()).arg("--fail-on-error").arg(&clean);
    cmd.assert()
        .success()
        .stderr(contains("0 errors, 0 warnings, 0 other"));
    Ok(())
}

#[test]
fn table_format() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let log = write_log(dir.path(), "build.log", MSVC_LOG)?;

    let mut cmd = Command::cargo_bin("e-msvc-tasks")?;
    cmd.current_dir(dir.path()).args(["-f", "table"]).arg(&log);
    cmd.assert()
        .success()
        .stdout(contains("description"))
        .stdout(contains("error"))
        .stdout(contains("warning"));
    Ok(())
}

#[cfg(feature = "uses_serde")]
#[test]
fn json_format() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let log = write_log(dir.path(), "build.log", MSVC_LOG)?;

    let mut cmd = Command::cargo_bin("e-msvc-tasks")?;
    cmd.current_dir(dir.path()).args(["--format", "json"]).arg(&log);
    let output = cmd.output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let tasks = value.as_array().expect("json array");
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["task"]["task_type"], "error");
    assert_eq!(tasks[0]["task"]["location"]["path"], "qmlstandalone/main.cpp");
    assert_eq!(tasks[0]["task"]["location"]["line"], 54);
    assert_eq!(tasks[1]["task"]["task_type"], "warning");
    Ok(())
}

#[test]
fn config_file_in_working_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_log(
        dir.path(),
        "e-msvc-tasks.toml",
        "parsers = [\"msvc\", \"clang-cl\"]\nchannel = \"stderr\"\ncolor = false\nfail_on_error = true\n",
    )?;
    let log = write_log(dir.path(), "build.err", CLANG_LOG)?;

    let mut cmd = Command::cargo_bin("e-msvc-tasks")?;
    cmd.current_dir(dir.path()).arg(&log);
    cmd.assert()
        .failure()
        .code(1)
        .stdout(contains("gdi.cpp(48): error: unknown type name 'errr'"));
    Ok(())
}

#[test]
fn explicit_config_and_cli_override() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config = write_log(dir.path(), "custom.toml", "format = \"json\"\nfail_on_error = true\n")?;
    let log = write_log(dir.path(), "build.log", MSVC_LOG)?;

    let mut cmd = Command::cargo_bin("e-msvc-tasks")?;
    cmd.current_dir(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["-f", "text", "--no-color"])
        .arg(&log);
    cmd.assert()
        .failure()
        .code(1)
        .stdout(contains("qmlstandalone/main.cpp(54): error:"));
    Ok(())
}

#[test]
fn invalid_config_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_log(dir.path(), "e-msvc-tasks.toml", "parsers = [\"gcc\"]\n")?;

    let mut cmd = Command::cargo_bin("e-msvc-tasks")?;
    cmd.current_dir(dir.path()).write_stdin("");
    cmd.assert()
        .failure()
        .stderr(contains("unknown parser `gcc`"));
    Ok(())
}

#[test]
fn missing_input_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut cmd = Command::cargo_bin("e-msvc-tasks")?;
    cmd.current_dir(dir.path()).arg("nope.log");
    cmd.assert()
        .failure()
        .stderr(contains("failed to read nope.log"));
    Ok(())
}
