use std::io::Write;

use assert_cmd::Command;
use tempfile::NamedTempFile;

fn script(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file to be created");
    write!(file, "{source}").expect("temp file to be writable");
    file
}

#[test]
fn runs_a_script_and_exits_zero_on_success() {
    let file = script("print 1 + 2;");

    Command::cargo_bin("loxwalk")
        .expect("binary to be built")
        .arg(file.path())
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn exits_65_on_static_error() {
    let file = script("1 +;");

    Command::cargo_bin("loxwalk")
        .expect("binary to be built")
        .arg(file.path())
        .assert()
        .code(65);
}

#[test]
fn exits_70_on_runtime_error() {
    let file = script("print notDefined;");

    Command::cargo_bin("loxwalk")
        .expect("binary to be built")
        .arg(file.path())
        .assert()
        .code(70);
}

#[test]
fn exits_64_on_usage_error() {
    Command::cargo_bin("loxwalk")
        .expect("binary to be built")
        .arg("one")
        .arg("two")
        .assert()
        .code(64);
}

#[test]
fn exits_74_when_script_file_is_missing() {
    Command::cargo_bin("loxwalk")
        .expect("binary to be built")
        .arg("/no/such/file.lox")
        .assert()
        .code(74);
}
