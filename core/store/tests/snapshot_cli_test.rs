use house_store::{
    decode_snapshot, encode_snapshot, malformed_key, seeded_snapshot, SnapshotStorage,
    SqliteStorage,
};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const KEY: &str = "house-of-swass-storage";

fn run(db_path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_house-snapshot"))
        .arg("--db-path")
        .arg(db_path)
        .arg("--key")
        .arg(KEY)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

#[test]
fn test_show_on_empty_database_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("house.db");

    let output = run(&db_path, &["show"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("nothing stored"));

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.load(KEY).unwrap(), None);
}

#[test]
fn test_export_prints_stored_document_verbatim() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("house.db");
    let mut storage = SqliteStorage::new(&db_path).unwrap();
    storage.save(KEY, r#"{"places": "not a list"}"#).unwrap();
    drop(storage);

    let output = run(&db_path, &["export"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        r#"{"places": "not a list"}"#
    );

    // A malformed document is neither replaced nor parked by reading it
    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(
        storage.load(KEY).unwrap().as_deref(),
        Some(r#"{"places": "not a list"}"#)
    );
    assert_eq!(storage.load(&malformed_key(KEY)).unwrap(), None);
}

#[test]
fn test_show_summarizes_stored_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("house.db");
    let mut storage = SqliteStorage::new(&db_path).unwrap();
    storage
        .save(KEY, &encode_snapshot(&seeded_snapshot()).unwrap())
        .unwrap();
    drop(storage);

    let output = run(&db_path, &["show"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("places:          3"));
    assert!(stdout.contains("goals:           5 (40% complete)"));
    assert!(stdout.contains("session:         signed out"));
}

#[test]
fn test_reset_writes_seed() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("house.db");

    let output = run(&db_path, &["reset"]);
    assert!(output.status.success());

    let storage = SqliteStorage::new(&db_path).unwrap();
    let document = storage.load(KEY).unwrap().unwrap();
    assert_eq!(
        decode_snapshot(&document).unwrap(),
        seeded_snapshot()
    );
}
