use super::*;
use crate::config::HttpTimeouts;

// ===== listFiles =====

#[test]
fn list_maps_keys_to_public_urls_and_categories() {
    let json = serde_json::json!({
        "files": [
            { "key": "Animal_abc.png", "id": "1", "name": "cat.png", "status": "Uploaded" },
            { "key": "xyz789", "id": "2", "name": "tree.jpg", "status": "Uploaded" }
        ],
        "hasMore": false
    })
    .to_string();
    let records = parse_list_response(&json, "https://uploadthing.com/f").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].url, "https://uploadthing.com/f/Animal_abc.png");
    assert_eq!(records[0].category, "Animal");
    assert_eq!(records[1].key, "xyz789");
    assert_eq!(records[1].category, "xyz789");
}

#[test]
fn list_without_files_field_is_empty() {
    let records = parse_list_response("{}", "https://uploadthing.com/f").unwrap();
    assert!(records.is_empty());
}

#[test]
fn list_rejects_malformed_body() {
    let err = parse_list_response("<html>", "https://uploadthing.com/f").unwrap_err();
    assert!(matches!(err, StoreError::Parse(_)));
}

// ===== uploadFiles =====

#[test]
fn presign_takes_first_slot() {
    let json = serde_json::json!({
        "data": [{
            "key": "k1",
            "fileName": "cat.png",
            "fileType": "image/png",
            "fileUrl": "https://utfs.io/f/k1",
            "url": "https://bucket.s3.amazonaws.com",
            "fields": { "key": "k1", "policy": "abc" }
        }]
    })
    .to_string();
    let slot = parse_presign_response(&json).unwrap();
    assert_eq!(slot.key, "k1");
    assert_eq!(slot.url, "https://bucket.s3.amazonaws.com");
    assert_eq!(slot.file_url.as_deref(), Some("https://utfs.io/f/k1"));
    assert_eq!(slot.fields.get("policy").map(String::as_str), Some("abc"));
}

#[test]
fn presign_without_slots_is_parse_error() {
    let err = parse_presign_response(r#"{"data": []}"#).unwrap_err();
    assert!(matches!(err, StoreError::Parse(_)));
}

#[test]
fn presign_request_uses_wire_names() {
    let request = PresignRequest {
        files: vec![PresignFile { name: "a.png", size: 12, file_type: "image/png" }],
        acl: "public-read",
        content_disposition: "inline",
    };
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["files"][0]["type"], "image/png");
    assert_eq!(value["files"][0]["size"], 12);
    assert_eq!(value["contentDisposition"], "inline");
}

// ===== deleteFiles =====

#[test]
fn delete_request_sends_single_key() {
    let value = serde_json::to_value(DeleteRequest { file_keys: ["k9"] }).unwrap();
    assert_eq!(value, serde_json::json!({ "fileKeys": ["k9"] }));
}

#[test]
fn delete_success_and_failure() {
    assert!(parse_delete_response(r#"{"success": true, "deletedCount": 1}"#).is_ok());
    let err = parse_delete_response(r#"{"success": false}"#).unwrap_err();
    assert!(matches!(err, StoreError::Response { status: 200, .. }));
}

// ===== client =====

#[tokio::test]
async fn upload_rejects_oversize_before_network() {
    let store = UploadThingStore::new(&FileHostConfig {
        api_key: "secret".into(),
        // Unroutable: any network attempt would fail with Request, not Rejected.
        api_url: "http://127.0.0.1:9".into(),
        public_url: "http://127.0.0.1:9/f".into(),
        timeouts: HttpTimeouts { request_secs: 1, connect_secs: 1 },
    })
    .unwrap();
    let upload = Upload {
        name: "big.png".into(),
        content_type: "image/png".into(),
        bytes: vec![0; crate::store::MAX_UPLOAD_BYTES + 1],
    };
    let err = store.upload(upload).await.unwrap_err();
    assert!(matches!(err, StoreError::Rejected(_)));
}
