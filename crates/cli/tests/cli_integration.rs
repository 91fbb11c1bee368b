use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("optline-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn optline() -> Command {
    Command::new(env!("CARGO_BIN_EXE_optline"))
}

const TABLE: &str = r#"[
    {"short": "v", "definition": "verbose", "comment": "be chatty"},
    ["n", "name=NAME", "who to greet", "world"],
    ["t", "tag=TAG+", "tag to attach"],
    ["", "color[=WHEN]", "colorize output"]
]"#;

fn write_table(dir: &Path) -> PathBuf {
    let path = dir.join("options.json");
    fs::write(&path, TABLE).expect("failed to write option table");
    path
}

fn run(table: &Path, args: &[&str]) -> Output {
    optline()
        .arg("--options")
        .arg(table)
        .arg("--")
        .args(args)
        .output()
        .expect("failed to run optline")
}

fn stdout_json(out: &Output) -> serde_json::Value {
    assert!(
        out.status.success(),
        "optline failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    serde_json::from_slice(&out.stdout).expect("stdout is not JSON")
}

#[test]
fn help_works() {
    let out = optline()
        .arg("--help")
        .output()
        .expect("failed to run optline --help");
    assert!(
        out.status.success(),
        "optline --help failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("--options") && stdout.contains("--usage"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn parses_arguments_to_json() {
    let dir = make_temp_dir("parse");
    let table = write_table(&dir);

    let out = run(
        &table,
        &["-v", "-tone", "--tag", "two", "--color", "in.txt", "--", "-x"],
    );
    let json = stdout_json(&out);
    assert_eq!(json["options"]["verbose"], serde_json::json!(true));
    assert_eq!(json["options"]["v"], serde_json::json!(true));
    assert_eq!(json["options"]["name"], serde_json::json!("world"));
    assert_eq!(json["options"]["tag"], serde_json::json!(["one", "two"]));
    assert_eq!(json["options"]["t"], serde_json::json!("two"));
    assert_eq!(json["options"]["color"], serde_json::json!(""));
    assert_eq!(json["positionals"], serde_json::json!(["in.txt", "-x"]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn unknown_option_fails_with_message() {
    let dir = make_temp_dir("unknown");
    let table = write_table(&dir);

    let out = run(&table, &["-vq"]);
    assert!(!out.status.success(), "expected failure");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid option q"), "unexpected stderr:\n{stderr}");

    let out = run(&table, &["--name"]);
    assert!(!out.status.success(), "expected failure");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("option name need argument"), "unexpected stderr:\n{stderr}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn usage_renders_sorted_table() {
    let dir = make_temp_dir("usage");
    let table = write_table(&dir);

    let out = optline()
        .arg("--options")
        .arg(&table)
        .arg("--usage")
        .arg("--sort")
        .arg("--program")
        .arg("greet")
        .output()
        .expect("failed to run optline --usage");
    assert!(out.status.success(), "stderr:\n{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    let expected = "\
Usage:
  greet [OPTION]
Options:
      --color[=WHEN] colorize output
  -n, --name=NAME    who to greet    (default: world)
  -t, --tag=TAG+     tag to attach
  -v, --verbose      be chatty
";
    assert_eq!(stdout, expected);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn invalid_table_is_reported() {
    let dir = make_temp_dir("invalid");
    let table = dir.join("options.json");
    fs::write(&table, r#"[["vv", "verbose"]]"#).expect("failed to write option table");

    let out = run(&table, &[]);
    assert!(!out.status.success(), "expected failure");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("invalid option table") && stderr.contains("single characters"),
        "unexpected stderr:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

fn run_bound(dir: &Path, args: &[&str]) -> Output {
    let extra = dir.join("extra.json");
    fs::write(&extra, r#"[["", "dry-run", "do nothing"]]"#).expect("failed to write option table");
    optline()
        .arg("--options")
        .arg(write_table(dir))
        .arg("--options")
        .arg(&extra)
        .arg("--bind-help")
        .arg("--program")
        .arg("greet")
        .arg("--")
        .args(args)
        .output()
        .expect("failed to run optline")
}

#[test]
fn bound_help_prints_current_table_and_exits_zero() {
    let dir = make_temp_dir("bound-help");

    let out = run_bound(&dir, &["-v", "--help", "ignored"]);
    assert!(
        out.status.success(),
        "status: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    // --dry-run comes from a table appended after the bind.
    let expected = "\
Usage:
  greet [OPTION]
Options:
  -v, --verbose      be chatty
  -n, --name=NAME    who to greet      (default: world)
  -t, --tag=TAG+     tag to attach
      --color[=WHEN] colorize output
  -h, --help         display this help
      --dry-run      do nothing
";
    assert_eq!(stdout, expected);

    let out = run_bound(&dir, &["-h"]);
    assert!(out.status.success(), "stderr:\n{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(String::from_utf8_lossy(&out.stdout), expected);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn default_error_handler_reports_and_exits_one() {
    let dir = make_temp_dir("default-handler");

    let out = run_bound(&dir, &["-q"]);
    assert_eq!(out.status.code(), Some(1), "status: {}", out.status);
    assert!(out.stdout.is_empty(), "unexpected stdout:\n{}", String::from_utf8_lossy(&out.stdout));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid option q"), "unexpected stderr:\n{stderr}");

    let out = run_bound(&dir, &["--dry-run", "in.txt"]);
    let json = stdout_json(&out);
    assert_eq!(json["options"]["dry-run"], serde_json::json!(true));
    assert_eq!(json["positionals"], serde_json::json!(["in.txt"]));

    let _ = fs::remove_dir_all(&dir);
}
