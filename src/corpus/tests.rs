use super::*;
use std::fs;
use tempfile::TempDir;

fn write_corpus(contents: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().expect("should create TempDir");
    let path = temp_dir.path().join("spots.csv");
    fs::write(&path, contents).expect("should write corpus file");
    (temp_dir, path)
}

#[test]
fn loads_rows_as_documents() {
    let (_temp_dir, path) = write_corpus(
        "name,description,group,season,budget\n\
         Munnar,hill station,family,winter,10000\n\
         Varkala,cliff beach,girls,summer,8000\n",
    );

    let documents = load_documents(&path).expect("should load corpus");
    assert_eq!(documents.len(), 2);

    assert!(documents[0].text.contains("name: Munnar"));
    assert!(documents[0].text.contains("description: hill station"));
    assert!(documents[0].text.contains("season: winter"));
    assert_eq!(documents[0].metadata.row_index, 0);
    assert_eq!(documents[0].metadata.name.as_deref(), Some("Munnar"));
    assert_eq!(documents[0].metadata.source, path.display().to_string());

    assert_eq!(documents[1].metadata.row_index, 1);
    assert_eq!(documents[1].metadata.name.as_deref(), Some("Varkala"));
}

#[test]
fn tolerates_arbitrary_columns() {
    let (_temp_dir, path) = write_corpus(
        "spot,vibe,best_month\n\
         Wayanad,quiet,November\n",
    );

    let documents = load_documents(&path).expect("should load corpus");
    assert_eq!(documents.len(), 1);
    assert!(documents[0].text.contains("spot: Wayanad"));
    assert!(documents[0].text.contains("best_month: November"));
    assert_eq!(documents[0].metadata.name, None);
}

#[test]
fn skips_blank_rows() {
    let (_temp_dir, path) = write_corpus(
        "name,description\n\
         Munnar,hill station\n\
         ,\n\
         Alleppey,backwaters\n",
    );

    let documents = load_documents(&path).expect("should load corpus");
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[1].metadata.name.as_deref(), Some("Alleppey"));
    // Row index is positional in the source file, not the output sequence
    assert_eq!(documents[1].metadata.row_index, 2);
}

#[test]
fn missing_file_is_an_error() {
    let temp_dir = TempDir::new().expect("should create TempDir");
    let result = load_documents(&temp_dir.path().join("nope.csv"));
    assert!(matches!(result, Err(GuideError::Corpus(_))));
}

#[test]
fn malformed_rows_are_an_error() {
    let (_temp_dir, path) = write_corpus(
        "name,description\n\
         Munnar,hill station,extra-field\n",
    );

    let result = load_documents(&path);
    assert!(matches!(result, Err(GuideError::Corpus(_))));
}

#[test]
fn fingerprint_tracks_contents() {
    let (_temp_dir, path) = write_corpus("name\nMunnar\n");

    let first = fingerprint(&path).expect("should fingerprint corpus");
    let again = fingerprint(&path).expect("should fingerprint corpus");
    assert_eq!(first, again);

    fs::write(&path, "name\nMunnar\nVarkala\n").expect("should rewrite corpus");
    let changed = fingerprint(&path).expect("should fingerprint corpus");
    assert_ne!(first, changed);
}

#[test]
fn fingerprint_missing_file_is_an_error() {
    let temp_dir = TempDir::new().expect("should create TempDir");
    let result = fingerprint(&temp_dir.path().join("nope.csv"));
    assert!(matches!(result, Err(GuideError::Io(_))));
}
