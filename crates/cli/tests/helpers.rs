use std::fs;
use std::path::Path;

use symbridge::{canonicalize_or_current, infer_project_name, parse_address, parse_offset};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_resolves_existing_relative_path() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = canonicalize_or_current("nested").expect("canonicalize nested");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn canonicalize_or_current_joins_missing_paths_onto_cwd() {
    let cwd = std::env::current_dir().expect("cwd");
    let result = canonicalize_or_current("does-not-exist-yet").expect("canonicalize");
    assert!(result.is_absolute());
    assert!(result.starts_with(&cwd) || result.ends_with("does-not-exist-yet"));
}

#[test]
fn infer_project_name_uses_last_path_component() {
    assert_eq!(infer_project_name(Path::new("C:/work/symbridge")), "symbridge");
    assert_eq!(infer_project_name(Path::new("/tmp/project-root")), "project-root");
}

#[test]
fn infer_project_name_falls_back_when_missing() {
    assert_eq!(infer_project_name(Path::new("/")), "unnamed-project");
}

#[test]
fn parse_address_accepts_hex_and_decimal() {
    assert_eq!(parse_address("0x401000").unwrap(), 0x401000);
    assert_eq!(parse_address("0X10").unwrap(), 0x10);
    assert_eq!(parse_address(" 4096 ").unwrap(), 4096);
    let err = parse_address("401000h").unwrap_err();
    assert!(err.to_string().contains("Invalid address"), "unexpected error: {err}");
}

#[test]
fn parse_offset_wraps_negative_values() {
    assert_eq!(parse_offset("8").unwrap(), 8);
    assert_eq!(parse_offset("-16").unwrap(), (-16i64) as u64);
    assert_eq!(parse_offset("-0x10").unwrap(), (-16i64) as u64);
    assert!(parse_offset("-").is_err());
    assert!(parse_offset("--8").is_err());
}
