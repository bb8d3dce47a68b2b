use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().unwrap().parent().unwrap().to_path_buf()
}

fn script(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("script.jlox");
    std::fs::write(&path, contents).unwrap();
    (tmp_dir, path)
}

#[test]
fn runs_counter_demo() {
    let root = workspace_root();
    let mut cmd = Command::cargo_bin("jlox").unwrap();
    cmd.arg(root.join("demos/counter.jlox"));
    cmd.assert().success().stdout("1\n2\n");
}

#[test]
fn runs_fib_demo() {
    let root = workspace_root();
    let mut cmd = Command::cargo_bin("jlox").unwrap();
    cmd.arg(root.join("demos/fib.jlox"));
    cmd.assert()
        .success()
        .stdout("0\n1\n1\n2\n3\n5\n8\n13\n21\n34\n");
}

#[test]
fn runs_scopes_demo() {
    let root = workspace_root();
    let mut cmd = Command::cargo_bin("jlox").unwrap();
    cmd.arg(root.join("demos/scopes.jlox"));
    cmd.assert()
        .success()
        .stdout("inner a\nglobal b\nouter a\nglobal a\nhello, world\nfallback\n");
}

#[test]
fn syntax_error_is_nonzero() {
    let (_dir, path) = script("print 1;\nvar x = 2\n");
    let mut cmd = Command::cargo_bin("jlox").unwrap();
    cmd.arg(path);
    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Syntax error"))
        .stderr(predicate::str::contains("Missing semicolon"))
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn token_error_is_nonzero() {
    let (_dir, path) = script("print \"never closed;\n");
    let mut cmd = Command::cargo_bin("jlox").unwrap();
    cmd.arg(path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Token error"))
        .stderr(predicate::str::contains("Unterminated string"));
}

#[test]
fn runtime_error_keeps_earlier_output() {
    let (_dir, path) = script("print \"before\";\nundeclared = 1;\nprint \"after\";\n");
    let mut cmd = Command::cargo_bin("jlox").unwrap();
    cmd.arg(path);
    cmd.assert()
        .failure()
        .code(1)
        .stdout("before\n")
        .stderr(predicate::str::contains("Undefined variable (identifier): \"undeclared\""));
}

#[test]
fn missing_file_is_nonzero() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("jlox").unwrap();
    cmd.arg(tmp_dir.path().join("nope.jlox"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn debug_logging_goes_to_stderr() {
    let root = workspace_root();
    let mut cmd = Command::cargo_bin("jlox").unwrap();
    cmd.arg(root.join("demos/counter.jlox")).env("JLOX_LOG", "debug");
    cmd.assert()
        .success()
        .stdout("1\n2\n")
        .stderr(predicate::str::contains("declaring function 'makeCounter'"));
}

#[test]
fn repl_keeps_state_between_inputs() {
    let mut cmd = assert_cmd::Command::cargo_bin("jlox").unwrap();
    cmd.write_stdin("var a = 20;\nfun twice(x) {\n  return x * 2;\n}\ntwice(a) + 2;\n:vars\n:quit\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("42"))
        .stdout(predicate::str::contains("... > "))
        .stdout(predicate::str::contains("<fn twice>"));
}

#[test]
fn repl_recovers_from_errors() {
    let mut cmd = assert_cmd::Command::cargo_bin("jlox").unwrap();
    cmd.write_stdin("var a = 1;\nmissing = 2;\nprint a + 1;\n:reset\n:vars\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2"))
        .stdout(predicate::str::contains("<no vars>"))
        .stderr(predicate::str::contains("Undefined variable"));
}

#[test]
fn deep_recursion_reports_stack_overflow() {
    let (_dir, path) = script(
        "fun down(n) { if (n <= 0) return 0; return down(n - 1) + 1; }\nprint down(3000);\nprint down(100000);\n",
    );
    let mut cmd = Command::cargo_bin("jlox").unwrap();
    cmd.arg(path);
    cmd.assert()
        .failure()
        .code(1)
        .stdout("3000\n")
        .stderr(predicate::str::contains("Stack overflow"));
}
