use assert_cmd::Command;
use packimport_test_helpers::fixtures;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn packimport_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("packimport"))
}

fn resource_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fixtures::write_resource_dir(dir.path()).unwrap();
    dir
}

// ============================================================================
// INIT
// ============================================================================

#[test]
fn test_init_creates_config_file() {
    let temp_dir = TempDir::new().unwrap();

    packimport_cmd()
        .current_dir(&temp_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("packimport.json"));

    let config = fs::read_to_string(temp_dir.path().join("packimport.json")).unwrap();
    assert!(config.contains("\"sourceSuffix\": \"py\""));
    assert!(config.contains("\"priority\": \"front\""));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("packimport.json"), "{}").unwrap();

    packimport_cmd()
        .current_dir(&temp_dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("packimport.json")).unwrap(),
        "{}"
    );
}

// ============================================================================
// PACK AND INSPECT
// ============================================================================

#[test]
fn test_pack_then_inspect() {
    let resources = resource_dir();
    let out = TempDir::new().unwrap();
    let package = out.path().join("game.pak");

    packimport_cmd()
        .arg("pack")
        .arg(resources.path())
        .arg("-o")
        .arg(&package)
        .assert()
        .success()
        .stdout(predicate::str::contains("Packed 3 resource(s)"));

    packimport_cmd()
        .arg("inspect")
        .arg(&package)
        .assert()
        .success()
        .stdout(predicate::str::contains("tools.util.py"))
        .stdout(predicate::str::contains("settings.py"))
        .stdout(predicate::str::contains("3 resource(s)"));
}

#[test]
fn test_pack_exclude_pattern() {
    let resources = resource_dir();
    fs::write(resources.path().join("notes.txt"), "not a module").unwrap();
    let out = TempDir::new().unwrap();
    let package = out.path().join("game.pak");

    packimport_cmd()
        .arg("pack")
        .arg(resources.path())
        .arg("-o")
        .arg(&package)
        .arg("--exclude")
        .arg("*.txt")
        .arg("--exclude")
        .arg("broken.*")
        .assert()
        .success();

    packimport_cmd()
        .arg("inspect")
        .arg(&package)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"settings.py\""))
        .stdout(predicate::str::contains("notes.txt").not())
        .stdout(predicate::str::contains("broken.py").not());
}

#[test]
fn test_pack_appends_to_player() {
    let resources = resource_dir();
    let out = TempDir::new().unwrap();
    let player = out.path().join("player");
    fs::write(&player, b"player executable bytes").unwrap();
    let bundled = out.path().join("game");

    packimport_cmd()
        .arg("pack")
        .arg(resources.path())
        .arg("-o")
        .arg(&bundled)
        .arg("--append-to")
        .arg(&player)
        .assert()
        .success();

    let bytes = fs::read(&bundled).unwrap();
    assert!(bytes.starts_with(b"player executable bytes"));

    packimport_cmd()
        .arg("import")
        .arg("tools.util")
        .arg("--package")
        .arg(&bundled)
        .assert()
        .success()
        .stdout(predicate::str::contains("module tools.util from tools.util.py"))
        .stdout(predicate::str::contains("VALUE = 1"));
}

#[test]
fn test_pack_missing_directory_fails() {
    let out = TempDir::new().unwrap();

    packimport_cmd()
        .arg("pack")
        .arg(out.path().join("nope"))
        .arg("-o")
        .arg(out.path().join("game.pak"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Resource directory not found"));
}

#[test]
fn test_inspect_rejects_non_package() {
    let out = TempDir::new().unwrap();
    let file = out.path().join("junk");
    fs::write(&file, b"tiny").unwrap();

    packimport_cmd()
        .arg("inspect")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read package"));
}

// ============================================================================
// IMPORT
// ============================================================================

#[test]
fn test_import_from_resource_dir() {
    let resources = resource_dir();

    packimport_cmd()
        .arg("import")
        .arg("settings")
        .arg("--resource-dir")
        .arg(resources.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("TITLE = \"Space Miners\""))
        .stdout(predicate::str::contains("GRAVITY = 9.81"))
        .stdout(predicate::str::contains("DEBUG = False"));
}

#[test]
fn test_import_missing_module_fails() {
    let resources = resource_dir();

    packimport_cmd()
        .arg("import")
        .arg("missing.mod")
        .arg("--resource-dir")
        .arg(resources.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No module named 'missing.mod'"));
}

#[test]
fn test_import_priority_back_prefers_search_path() {
    let resources = resource_dir();
    let lib = TempDir::new().unwrap();
    fs::create_dir(lib.path().join("tools")).unwrap();
    fs::write(lib.path().join("tools").join("util.py"), "VALUE = 2\n").unwrap();

    packimport_cmd()
        .arg("import")
        .arg("tools.util")
        .arg("--resource-dir")
        .arg(resources.path())
        .arg("--search-path")
        .arg(lib.path())
        .arg("--priority")
        .arg("back")
        .assert()
        .success()
        .stdout(predicate::str::contains("VALUE = 2"));
}

#[test]
fn test_import_uses_config_file() {
    let resources = resource_dir();
    let work = TempDir::new().unwrap();
    let config = format!(
        "resourceDir: {}\npriority: back\npretty: false\n",
        resources.path().display()
    );
    fs::write(work.path().join("packimport.yaml"), config).unwrap();

    packimport_cmd()
        .current_dir(&work)
        .arg("import")
        .arg("broken")
        .arg("--config")
        .arg("packimport.yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.py:3"));
}

#[test]
fn test_import_invalid_priority_is_rejected() {
    packimport_cmd()
        .arg("import")
        .arg("x")
        .arg("--priority")
        .arg("middle")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown priority"));
}
