//! Integration tests for lsipc CLI

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

const SHM: &str = "       key      shmid perms                  size  cpid  lpid nattch   uid   gid  cuid  cgid      atime      dtime      ctime                   rss                  swap
         0          5  1600                524288  2130  2207      2  1000  1000  1000  1000 1700000000 1700000100 1690000000                  4096                     0
1234567890         17   644                  4096  3001     0      0     0     0     0     0          0          0 1690000500                     0                     0
";

const MSG: &str = "       key      msqid perms      cbytes       qnum lspid lrpid   uid   gid  cuid  cgid      stime      rtime      ctime
        -1          0   666          48          3   100   101  1000   100     0     0 1700000000          0 1690000000
";

const SEM: &str = "       key      semid perms      nsems   uid   gid  cuid  cgid      otime      ctime
     51966          3   600          4     0     0     0     0          0 1690000000
         7          9   640          2     0     0     0     0          0 1690000000
";

/// Build a fake proc root holding the tables above and kernel limits.
fn fake_proc() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let sysvipc = dir.path().join("sysvipc");
    let kernel = dir.path().join("sys/kernel");
    fs::create_dir_all(&sysvipc).unwrap();
    fs::create_dir_all(&kernel).unwrap();

    fs::write(sysvipc.join("shm"), SHM).unwrap();
    fs::write(sysvipc.join("msg"), MSG).unwrap();
    fs::write(sysvipc.join("sem"), SEM).unwrap();

    for (name, value) in [
        ("shmall", "18446744073692774399\n"),
        ("shmmax", "18446744073692774399\n"),
        ("shmmni", "4096\n"),
        ("msgmni", "32000\n"),
        ("msgmax", "8192\n"),
        ("msgmnb", "16384\n"),
        ("sem", "32000\t1024000000\t500\t32000\n"),
    ] {
        fs::write(kernel.join(name), value).unwrap();
    }
    dir
}

fn run_lsipc(root: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_lsipc"))
        .arg("--proc-root")
        .arg(root)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

fn run_json(root: &Path, args: &[&str]) -> serde_json::Value {
    let mut args = args.to_vec();
    args.push("--json");
    let (stdout, stderr, success) = run_lsipc(root, &args);
    assert!(success, "{stderr}");
    serde_json::from_str(&stdout).expect("Invalid JSON output")
}

#[test]
fn test_cli_help() {
    let root = fake_proc();
    let (stdout, _, success) = run_lsipc(root.path(), &["--help"]);

    assert!(success);
    assert!(stdout.contains("--shmems"));
    assert!(stdout.contains("--queues"));
    assert!(stdout.contains("--semaphores"));
    assert!(stdout.contains("--time-format"));
    assert!(stdout.contains("Available columns"));
    assert!(stdout.contains("USEDBYTES"));
    assert!(!stdout.contains("--proc-root"));
}

#[test]
fn test_cli_version() {
    let root = fake_proc();
    let (stdout, _, success) = run_lsipc(root.path(), &["--version"]);

    assert!(success);
    assert!(stdout.contains("lsipc"));
}

#[test]
fn test_resource_is_required() {
    let root = fake_proc();
    let (_, stderr, success) = run_lsipc(root.path(), &[]);

    assert!(!success);
    assert!(stderr.contains("One of --shmems, --queues or --semaphores must be specified"));
}

#[test]
fn test_conflicting_resources() {
    let root = fake_proc();
    let (_, _, success) = run_lsipc(root.path(), &["--shmems", "--queues"]);
    assert!(!success);
}

#[test]
fn test_unknown_column() {
    let root = fake_proc();
    let (stdout, stderr, success) = run_lsipc(root.path(), &["-m", "-o", "KEY,BOGUS"]);

    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("unknown column: BOGUS"));
}

#[test]
fn test_column_of_other_resource() {
    let root = fake_proc();
    let (_, stderr, success) = run_lsipc(root.path(), &["-q", "-o", "SIZE"]);

    assert!(!success);
    assert!(stderr.contains("does not apply"));
}

#[test]
fn test_shm_raw_output() {
    let root = fake_proc();
    let (stdout, _, success) =
        run_lsipc(root.path(), &["-m", "--raw", "--bytes", "-o", "KEY,ID,SIZE,NATTCH"]);

    assert!(success);
    assert_eq!(
        stdout,
        "KEY ID SIZE NATTCH\n0x00000000 5 524288 2\n0x499602d2 17 4096 0\n"
    );
}

#[test]
fn test_shm_status_column() {
    let root = fake_proc();
    let (stdout, _, success) =
        run_lsipc(root.path(), &["-m", "--raw", "--noheadings", "-o", "ID,STATUS"]);

    assert!(success);
    assert_eq!(stdout, "5 dest\n17 \n");
}

#[test]
fn test_default_table() {
    let root = fake_proc();
    let (stdout, _, success) = run_lsipc(root.path(), &["--semaphores"]);

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    let header: Vec<&str> = lines[0].split_whitespace().collect();
    assert_eq!(header, ["KEY", "ID", "PERMS", "OWNER", "NSEMS"]);
    assert!(lines[1].starts_with("0x0000cafe 3"));
    assert!(lines[1].contains("-rw-------"));
}

#[test]
fn test_queue_json() {
    let root = fake_proc();
    let value = run_json(
        root.path(),
        &["-q", "-b", "-P", "-o", "KEY,ID,PERMS,USEDBYTES,MSGS,RECV"],
    );

    let rows = value["ipc"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["key"], "0xffffffff");
    assert_eq!(rows[0]["id"], "0");
    assert_eq!(rows[0]["perms"], "0666");
    assert_eq!(rows[0]["usedbytes"], "48");
    assert_eq!(rows[0]["msgs"], "3");
    assert!(rows[0]["recv"].is_null());
}

#[test]
fn test_export_output() {
    let root = fake_proc();
    let (stdout, _, success) = run_lsipc(root.path(), &["-q", "--export", "-o", "ID,LSPID,LRPID"]);

    assert!(success);
    assert_eq!(stdout, "ID=\"0\" LSPID=\"100\" LRPID=\"101\"\n");
}

#[test]
fn test_print0_output() {
    let root = fake_proc();
    let (stdout, _, success) = run_lsipc(
        root.path(),
        &["-s", "--print0", "--noheadings", "-o", "ID,NSEMS"],
    );

    assert!(success);
    assert_eq!(stdout, "3 4\u{0}9 2\u{0}");
}

#[test]
fn test_global_json() {
    let root = fake_proc();
    let value = run_json(root.path(), &["--global"]);

    let rows = value["ipc"].as_array().unwrap();
    let names: Vec<&str> = rows
        .iter()
        .map(|row| row["resource"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ["MSGMNI", "MSGMAX", "MSGMNB", "SHMMNI", "SHMALL", "SEMMNS", "SEMMNI"]
    );

    let used = |name: &str| {
        rows.iter()
            .find(|row| row["resource"] == name)
            .map(|row| row["used"].as_str().unwrap().to_string())
            .unwrap()
    };
    assert_eq!(used("MSGMNI"), "1");
    assert_eq!(used("SHMMNI"), "2");
    assert_eq!(used("SEMMNS"), "6");
    assert_eq!(used("SEMMNI"), "2");

    let limit = rows.iter().find(|row| row["resource"] == "MSGMNB").unwrap();
    assert_eq!(limit["limit"], "16384");
    assert!(limit["description"].as_str().is_some());
}

#[test]
fn test_global_for_one_resource() {
    let root = fake_proc();
    let value = run_json(root.path(), &["--global", "--semaphores"]);

    let rows = value["ipc"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["resource"], "SEMMNS");
}

#[test]
fn test_pretty_shm() {
    let root = fake_proc();
    let (stdout, stderr, success) = run_lsipc(root.path(), &["-m", "--id", "5"]);

    assert!(success, "{stderr}");
    let key = stdout.lines().find(|l| l.starts_with("Key:")).unwrap();
    assert!(key.ends_with("0x00000000"));
    assert!(stdout.lines().any(|l| l.starts_with("ID:") && l.ends_with(" 5")));
    assert!(!stdout.contains("KEY"));
}

#[test]
fn test_missing_id_warns() {
    let root = fake_proc();
    let (stdout, stderr, success) = run_lsipc(root.path(), &["-s", "--id", "99"]);

    assert!(success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("lsipc: id 99 not found"));
}

#[test]
fn test_id_rejects_creator_and_time() {
    let root = fake_proc();
    let (stdout, _, success) = run_lsipc(root.path(), &["-m", "--id", "5", "--creator"]);
    assert!(!success);
    assert!(stdout.is_empty());

    let (_, _, success) = run_lsipc(root.path(), &["-m", "--id", "5", "--time"]);
    assert!(!success);
}

#[test]
fn test_all_ids_in_detail_view() {
    let root = fake_proc();
    let (stdout, stderr, success) = run_lsipc(root.path(), &["-m", "--id", "-1"]);

    assert!(success, "{stderr}");
    let blocks: Vec<&str> = stdout.split("\n\n").collect();
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].lines().any(|l| l.starts_with("ID:") && l.ends_with(" 5")));
    assert!(blocks[1].lines().any(|l| l.starts_with("ID:") && l.ends_with(" 17")));
}

#[test]
fn test_id_conflicts_with_output_mode() {
    let root = fake_proc();
    let (_, _, success) = run_lsipc(root.path(), &["-m", "--id", "5", "--raw"]);
    assert!(!success);
}

#[test]
fn test_empty_column_list() {
    let root = fake_proc();
    let (_, _, success) = run_lsipc(root.path(), &["-m", "-o", ""]);
    assert!(!success);
}
