//! Tests for concatenating table files into the combined artifact

use std::fs;
use tempfile::TempDir;
use tpcc_gen::combiner::{Combiner, COMBINED_FILE_NAME};

#[test]
fn test_sorted_by_file_name() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("stock.csv"), "s\n").unwrap();
    fs::write(dir.join("customer.csv"), "c\n").unwrap();
    fs::write(dir.join("item.csv"), "i\n").unwrap();
    fs::write(dir.join("district.csv"), "d\n").unwrap();

    let stats = Combiner::new(dir.to_path_buf()).combine().unwrap();

    assert_eq!(
        stats.file_names,
        vec!["customer.csv", "district.csv", "item.csv", "stock.csv"]
    );
    let content = fs::read_to_string(dir.join(COMBINED_FILE_NAME)).unwrap();
    assert_eq!(content, "c\nd\ni\ns\n");
}

#[test]
fn test_unsorted_keeps_every_file() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("a.csv"), "1\n").unwrap();
    fs::write(dir.join("b.csv"), "2\n").unwrap();

    let stats = Combiner::new(dir.to_path_buf())
        .with_sorted(false)
        .combine()
        .unwrap();

    let mut names = stats.file_names.clone();
    names.sort();
    assert_eq!(names, vec!["a.csv", "b.csv"]);
    assert_eq!(stats.bytes_written, 4);
}

#[test]
fn test_custom_output_name() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("item.csv"), "1,5\n").unwrap();
    fs::write(dir.join(COMBINED_FILE_NAME), "old\n").unwrap();

    let combiner = Combiner::new(dir.to_path_buf()).with_output_name("everything.csv");
    assert_eq!(combiner.output_path(), dir.join("everything.csv"));
    let stats = combiner.combine().unwrap();

    // a file named like the default output is an ordinary input here
    assert_eq!(stats.file_names, vec!["item.csv", COMBINED_FILE_NAME]);
    let content = fs::read_to_string(dir.join("everything.csv")).unwrap();
    assert_eq!(content, "1,5\nold\n");
}

#[test]
fn test_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let stats = Combiner::new(temp_dir.path().to_path_buf())
        .combine()
        .unwrap();

    assert_eq!(stats.files_combined, 0);
    assert_eq!(stats.bytes_written, 0);
    assert_eq!(
        fs::metadata(temp_dir.path().join(COMBINED_FILE_NAME))
            .unwrap()
            .len(),
        0
    );
}

#[test]
fn test_unwritable_output_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("item.csv"), "1,5\n").unwrap();
    fs::create_dir(dir.join(COMBINED_FILE_NAME)).unwrap();

    let err = Combiner::new(dir.to_path_buf()).combine().unwrap_err();
    assert!(err.to_string().contains("cannot open combined output file"));
}

#[test]
fn test_missing_directory_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");
    let err = Combiner::new(missing).combine().unwrap_err();
    assert!(err.to_string().contains("cannot read directory"));
}

#[cfg(unix)]
#[test]
fn test_unreadable_input_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("customer.csv"), "c\n").unwrap();
    fs::write(dir.join("stock.csv"), "s\n").unwrap();
    std::os::unix::fs::symlink(dir.join("gone.csv"), dir.join("item.csv")).unwrap();

    let stats = Combiner::new(dir.to_path_buf()).combine().unwrap();

    assert_eq!(stats.files_combined, 2);
    assert_eq!(stats.file_names, vec!["customer.csv", "stock.csv"]);
    assert_eq!(stats.bytes_written, 4);
    assert_eq!(stats.skipped.len(), 1);
    assert_eq!(stats.skipped[0].file, "item.csv");
    let content = fs::read_to_string(dir.join(COMBINED_FILE_NAME)).unwrap();
    assert_eq!(content, "c\ns\n");
}

#[cfg(unix)]
#[test]
fn test_link_to_directory_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::create_dir(dir.join("nested")).unwrap();
    fs::write(dir.join("item.csv"), "i\n").unwrap();
    std::os::unix::fs::symlink(dir.join("nested"), dir.join("linked")).unwrap();

    let stats = Combiner::new(dir.to_path_buf()).combine().unwrap();

    assert_eq!(stats.file_names, vec!["item.csv"]);
    assert!(stats.skipped.is_empty());
}

#[test]
fn test_stats_serialize() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("item.csv"), "1,5\n").unwrap();

    let stats = Combiner::new(dir.to_path_buf()).combine().unwrap();
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["files_combined"], 1);
    assert_eq!(json["bytes_written"], 4);
    assert!(json["skipped"].as_array().unwrap().is_empty());
}
