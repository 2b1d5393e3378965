//! Integration tests for delimiter detection and file discovery.

use claimlens_data::{DataError, f64_column, load_insurance_data, string_column};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("claimlens-data-{}-{}", std::process::id(), name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_pipe_delimited_txt() {
    let dir = scratch_dir("pipe");
    let path = dir.join("policies.txt");
    fs::write(
        &path,
        "Province|PostalCode|TotalPremium|TotalClaims\n\
         Gauteng|2000|120.5|0\n\
         Western Cape|8000|80.0|1500\n",
    )
    .unwrap();

    let df = load_insurance_data(Some(&path), &dir).unwrap();

    assert_eq!(df.shape(), (2, 4));
    let provinces = string_column(&df, "Province").unwrap();
    assert_eq!(provinces[1].as_deref(), Some("Western Cape"));
}

#[test]
fn test_txt_falls_back_to_comma() {
    let dir = scratch_dir("fallback");
    let path = dir.join("policies.txt");
    fs::write(
        &path,
        "Province,TotalPremium,TotalClaims\nGauteng,100,0\nLimpopo,50,25\n",
    )
    .unwrap();

    let df = load_insurance_data(Some(&path), &dir).unwrap();

    assert_eq!(df.width(), 3);
    assert_eq!(
        f64_column(&df, "TotalClaims").unwrap(),
        vec![Some(0.0), Some(25.0)]
    );
}

#[test]
fn test_discovers_first_file_in_raw_dir() {
    let dir = scratch_dir("discover");
    fs::write(dir.join("b.csv"), "Gender,TotalPremium,TotalClaims\nMale,1,0\n").unwrap();
    fs::write(
        dir.join("a.csv"),
        "Gender,TotalPremium,TotalClaims\nFemale,2,0\nMale,3,4\n",
    )
    .unwrap();
    fs::write(dir.join("notes.md"), "not data").unwrap();

    let df = load_insurance_data(None, &dir).unwrap();

    assert_eq!(df.height(), 2);
}

#[test]
fn test_empty_raw_dir_is_file_not_found() {
    let dir = scratch_dir("empty");
    let err = load_insurance_data(None, &dir).unwrap_err();
    assert!(matches!(err, DataError::FileNotFound(_)));
}
