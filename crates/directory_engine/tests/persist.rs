use std::fs;

use directory_engine::{PersistError, StoreFiles};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn root_is_created_on_demand() {
    let temp = TempDir::new().unwrap();
    let files = StoreFiles::new(temp.path().join("data"));
    files.ensure_root().unwrap();
    assert!(files.root().is_dir());
}

#[test]
fn root_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("not_a_dir");
    fs::write(&path, "x").unwrap();

    let err = StoreFiles::new(path).ensure_root().unwrap_err();
    assert!(matches!(err, PersistError::StoreDir(_)));
}

#[test]
fn collection_rewrite_replaces_previous_documents() {
    let temp = TempDir::new().unwrap();
    let files = StoreFiles::new(temp.path().to_path_buf());
    assert!(files.read_collection("images").unwrap().is_empty());

    let first = files
        .write_collection("images", &[json!({ "title": "Sunset" })])
        .unwrap();
    assert_eq!(first, temp.path().join("collections/images.json"));

    let documents = vec![json!({ "title": "Sunset" }), json!({ "title": "Harbour" })];
    let second = files.write_collection("images", &documents).unwrap();
    assert_eq!(first, second);
    assert_eq!(files.read_collection("images").unwrap(), documents);

    let leftovers: Vec<_> = fs::read_dir(temp.path().join("collections"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(leftovers, vec!["images.json".to_string()]);
}

#[test]
fn non_array_collection_is_reported_by_name() {
    let temp = TempDir::new().unwrap();
    let files = StoreFiles::new(temp.path().to_path_buf());
    fs::create_dir_all(temp.path().join("collections")).unwrap();
    fs::write(files.collection_path("videos"), "{\"title\": \"Talk\"}").unwrap();

    match files.read_collection("videos").unwrap_err() {
        PersistError::NotAnArray(name) => assert_eq!(name, "videos"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn blobs_land_under_their_object_path() {
    let temp = TempDir::new().unwrap();
    let files = StoreFiles::new(temp.path().to_path_buf());

    let path = files.write_blob("video_posts/17_talk.mp4", b"mp4").unwrap();
    assert_eq!(path, temp.path().join("blobs/video_posts/17_talk.mp4"));
    assert_eq!(fs::read(&path).unwrap(), b"mp4");
}

#[test]
fn blob_under_a_file_leaves_nothing_behind() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("not_a_dir");
    fs::write(&root, "x").unwrap();

    let result = StoreFiles::new(root.clone()).write_blob("a.png", b"data");
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&root).unwrap(), "x");
}
