use std::fs;
use std::path::Path;

use predicates::prelude::*;
use symbridge_core::db::ProjectLayout;
use tempfile::tempdir;

const SNAPSHOT: &str = r#"{
  "names": [
    { "address": 4198400, "name": "_Z3fooiv" },
    { "address": 4198432, "name": "loc_401020" },
    { "address": 20480, "name": "CreateFileW" }
  ],
  "functions": [
    {
      "start": 4198400,
      "end": 4198464,
      "short_name": "int __cdecl foo(int a)",
      "frame": {
        "size": 32,
        "saved_regs": 8,
        "members": [
          { "name": "frame.var_10", "offset": 24 },
          { "name": "frame.arg_0", "offset": 48 }
        ]
      }
    }
  ],
  "segments": [
    { "name": ".text", "start": 4194304, "end": 4259840, "permissions": "READ | EXEC" }
  ],
  "xrefs": [ { "to": 4198432, "from": 4198410, "kind": "jump" } ],
  "imports": [
    { "name": "KERNEL32", "entries": [ { "address": 20480, "name": "CreateFileW" } ] }
  ],
  "demangled": { "_Z3fooiv": "foo(int, void)" }
}"#;

fn init_project(root: &Path) {
    fs::write(root.join("db.json"), SNAPSHOT).expect("write snapshot");
    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("init-project")
        .arg("--root")
        .arg(root)
        .arg("--name")
        .arg("BridgeProject")
        .arg("--database")
        .arg("db.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Database: db.json"));
}

/// init-project without --root uses the current directory and creates the store.
#[test]
fn init_project_uses_default_root_when_not_provided() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .current_dir(root)
        .arg("init-project")
        .arg("--name")
        .arg("TestProject")
        .assert()
        .success()
        .stdout(predicate::str::contains("Database: (none)"));

    let layout = ProjectLayout::new(root);
    assert!(layout.project_config_path.is_file());
    assert!(layout.store_path.is_file());
}

/// project-info should fail (non-zero exit) if no project config exists.
#[test]
fn project_info_fails_when_config_missing() {
    let dir = tempdir().expect("tempdir");
    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("project-info")
        .arg("--root")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read project config"));
}

#[test]
fn init_project_fails_for_missing_snapshot() {
    let dir = tempdir().expect("tempdir");
    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("init-project")
        .arg("--root")
        .arg(dir.path())
        .arg("--database")
        .arg("nope.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn project_info_reports_snapshot_hash() {
    let dir = tempdir().expect("tempdir");
    init_project(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("project-info")
        .arg("--root")
        .arg(dir.path())
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"database_hash_matches\": true"));

    fs::write(dir.path().join("db.json"), "{}").expect("swap snapshot");
    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("project-info")
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("CHANGED since init"));
}

#[test]
fn resolve_prints_canonical_names_and_classification() {
    let dir = tempdir().expect("tempdir");
    init_project(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("resolve")
        .arg("--root")
        .arg(dir.path())
        .arg("--address")
        .arg("0x401000")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"foo\""))
        .stdout(predicate::str::contains("\"is_function\": true"))
        .stdout(predicate::str::contains("\"function_size\": 64"));

    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("resolve")
        .arg("--root")
        .arg(dir.path())
        .arg("--address")
        .arg("20480")
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: __imp_CreateFileW"))
        .stdout(predicate::str::contains("Import: true"));

    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("resolve")
        .arg("--root")
        .arg(dir.path())
        .arg("--address")
        .arg("0x401020")
        .assert()
        .success()
        .stdout(predicate::str::contains("Label: true"));

    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("resolve")
        .arg("--root")
        .arg(dir.path())
        .arg("--address")
        .arg("0x999999")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No symbol is named"));
}

#[test]
fn resolve_function_uses_short_name_token() {
    let dir = tempdir().expect("tempdir");
    init_project(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("resolve-function")
        .arg("--root")
        .arg(dir.path())
        .arg("--address")
        .arg("0x401030")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry: 0x401000"))
        .stdout(predicate::str::contains("Name: foo"));
}

#[test]
fn stack_var_accepts_negative_offsets() {
    let dir = tempdir().expect("tempdir");
    init_project(dir.path());

    for (offset, expected) in [("8", "arg_0"), ("-16", "var_10"), ("-0x10", "var_10")] {
        assert_cmd::cargo::cargo_bin_cmd!("symbridge")
            .arg("stack-var")
            .arg("--root")
            .arg(dir.path())
            .arg("--function")
            .arg("0x401000")
            .arg("--offset")
            .arg(offset)
            .assert()
            .success()
            .stdout(predicate::str::diff(format!("{expected}\n")));
    }

    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("stack-var")
        .arg("--root")
        .arg(dir.path())
        .arg("--function")
        .arg("0x401000")
        .arg("--offset")
        .arg("0xFFFFFFF0")
        .arg("--addr-size")
        .arg("4")
        .assert()
        .success()
        .stdout(predicate::str::contains("var_10"));
}

#[test]
fn regvar_round_trips_across_invocations() {
    let dir = tempdir().expect("tempdir");
    init_project(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("set-regvar")
        .arg("--root")
        .arg(dir.path())
        .arg("--function")
        .arg("0x401010")
        .arg("--name")
        .arg("rax_1")
        .arg("--value")
        .arg("counter")
        .assert()
        .success();

    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("get-regvar")
        .arg("--root")
        .arg(dir.path())
        .arg("--function")
        .arg("0x401000")
        .arg("--name")
        .arg("rax_1")
        .assert()
        .success()
        .stdout(predicate::str::diff("counter\n"));

    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("annotations")
        .arg("--root")
        .arg(dir.path())
        .arg("--function")
        .arg("0x401000")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key\": \"401000.regvar.rax_1\""));
}

#[test]
fn type_round_trips_across_invocations() {
    let dir = tempdir().expect("tempdir");
    init_project(dir.path());

    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("set-type")
        .arg("--root")
        .arg(dir.path())
        .arg("--function")
        .arg("0x401000")
        .arg("--name")
        .arg("local_18")
        .arg("--decl")
        .arg("unsigned int *")
        .arg("--space")
        .arg("stack")
        .arg("--location-offset")
        .arg("-24")
        .assert()
        .success();

    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("get-type")
        .arg("--root")
        .arg(dir.path())
        .arg("--function")
        .arg("0x401000")
        .arg("--name")
        .arg("local_18")
        .assert()
        .success()
        .stdout(predicate::str::diff("uint32_t *\n"));

    assert_cmd::cargo::cargo_bin_cmd!("symbridge")
        .arg("get-type")
        .arg("--root")
        .arg(dir.path())
        .arg("--function")
        .arg("0x401000")
        .arg("--name")
        .arg("local_20")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No type recorded"));
}
