use std::fs;

use bytes::Bytes;
use directory_engine::{BlobStore, LocalStore, NewDocument, RemoteStore, StoreError, ID_FIELD};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use tempfile::TempDir;

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("object expected"),
    }
}

#[tokio::test]
async fn added_documents_are_fetched_back_with_id_and_timestamp() {
    let temp = TempDir::new().unwrap();
    let store = LocalStore::new(temp.path().to_path_buf(), "https://blobs.example");
    store.connection_ready().await.unwrap();

    let doc = NewDocument::new(fields(json!({ "title": "Cat pics" })))
        .with_server_timestamp("created_at");
    let id = store.add_document("images", doc).await.unwrap();

    let records = store.fetch_collection("images", 500).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["title"], "Cat pics");
    assert_eq!(records[0][ID_FIELD], Value::String(id));
    let stamp = records[0]["created_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
}

#[tokio::test]
async fn fetch_is_capped_and_missing_collections_are_empty() {
    let temp = TempDir::new().unwrap();
    let store = LocalStore::new(temp.path().to_path_buf(), "https://blobs.example");
    for i in 0..3 {
        let doc = NewDocument::new(fields(json!({ "title": format!("t{i}") })));
        store.add_document("websites", doc).await.unwrap();
    }

    assert_eq!(store.fetch_collection("websites", 2).await.unwrap().len(), 2);
    assert!(store.fetch_collection("videos", 500).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_names_and_corrupt_files_are_errors() {
    let temp = TempDir::new().unwrap();
    let store = LocalStore::new(temp.path().to_path_buf(), "https://blobs.example");

    let err = store.fetch_collection("../etc", 10).await.unwrap_err();
    assert!(matches!(err, StoreError::Collection { .. }));

    fs::create_dir_all(temp.path().join("collections")).unwrap();
    fs::write(temp.path().join("collections/images.json"), "{\"not\": \"a list\"}").unwrap();
    let err = store.fetch_collection("images", 10).await.unwrap_err();
    assert!(matches!(err, StoreError::Collection { .. }));

    fs::write(temp.path().join("collections/videos.json"), "not json").unwrap();
    let err = store.fetch_collection("videos", 10).await.unwrap_err();
    assert!(matches!(err, StoreError::Json(_)));
}

#[tokio::test]
async fn blobs_are_written_and_addressed_by_public_url() {
    let temp = TempDir::new().unwrap();
    let store = LocalStore::new(temp.path().to_path_buf(), "https://blobs.example/");

    let url = store
        .upload_blob("image_posts/17_a.png", Bytes::from_static(b"png"))
        .await
        .unwrap();
    assert_eq!(url, "https://blobs.example/image_posts/17_a.png");
    assert_eq!(
        fs::read(temp.path().join("blobs/image_posts/17_a.png")).unwrap(),
        b"png"
    );

    let err = store
        .upload_blob("../escape.png", Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn store_root_that_is_a_file_is_unavailable() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("not_a_dir");
    fs::write(&file, "x").unwrap();

    let store = LocalStore::new(file, "https://blobs.example");
    let err = store.connection_ready().await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}
