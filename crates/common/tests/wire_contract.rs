// Wire-format contract for the document types.
//
// The JSON shapes here are the external HTTP contract; renaming a field or
// changing a default breaks every client, so the shapes are pinned as tests.

use chrono::{TimeZone, Utc};
use quire_common::types::{
    Block, BlockUpdateRequest, Document, DocumentMeta, FilterRequest, FilterResponse, Tab,
};

#[test]
fn document_serializes_with_camel_case_fields() {
    let document = Document {
        title: "notes".to_owned(),
        creator: Some("alice".to_owned()),
        created_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        updated_at: None,
        content: vec![Tab::titled("notes")],
        archived: false,
    };

    let value = serde_json::to_value(&document).expect("document should serialize");
    assert_eq!(value["title"], "notes");
    assert_eq!(value["creator"], "alice");
    assert!(value["createdAt"].is_string());
    assert!(value["updatedAt"].is_null());
    assert_eq!(value["archived"], false);
    assert_eq!(value["content"][0]["title"], "notes");
    assert_eq!(value["content"][0]["textBlocks"], serde_json::json!([]));
}

#[test]
fn document_deserializes_with_missing_optional_fields() {
    let document: Document =
        serde_json::from_str(r#"{"title":"bare"}"#).expect("minimal document should parse");

    assert_eq!(document.title, "bare");
    assert!(document.creator.is_none());
    assert!(document.created_at.is_none());
    assert!(document.content.is_empty());
    assert!(!document.archived);
}

#[test]
fn document_meta_omits_content() {
    let meta = DocumentMeta {
        title: "notes".to_owned(),
        creator: None,
        created_at: None,
        updated_at: None,
        archived: true,
    };

    let value = serde_json::to_value(&meta).expect("meta should serialize");
    assert!(value.get("content").is_none());
    assert_eq!(value["archived"], true);
}

#[test]
fn block_round_trips_null_content() {
    let json = r#"{"id":"b-1","content":null,"creator":"bob","code":true}"#;
    let block: Block = serde_json::from_str(json).expect("block should parse");

    assert_eq!(block.id, "b-1");
    assert!(block.content.is_none());
    assert!(block.code);
    assert!(block.updated_at.is_none());
    assert!(block.updated_by.is_none());

    let value = serde_json::to_value(&block).expect("block should serialize");
    assert!(value["content"].is_null());
    assert!(value["updatedBy"].is_null());
    assert_eq!(value["creator"], "bob");
}

#[test]
fn block_update_request_defaults_to_empty_fields() {
    let request: BlockUpdateRequest =
        serde_json::from_str("{}").expect("empty update request should parse");
    assert_eq!(request.content, "");
    assert_eq!(request.username, "");
}

#[test]
fn filter_pair_uses_filtered_text_field() {
    let request = FilterRequest { text: "hello".to_owned() };
    let value = serde_json::to_value(&request).expect("filter request should serialize");
    assert_eq!(value, serde_json::json!({"text": "hello"}));

    let response: FilterResponse = serde_json::from_str(r#"{"valid":true,"filteredText":"hi"}"#)
        .expect("filter response should parse");
    assert!(response.valid);
    assert_eq!(response.filtered_text.as_deref(), Some("hi"));

    // A response body without a payload is legal and maps to None.
    let empty: FilterResponse =
        serde_json::from_str("{}").expect("empty filter response should parse");
    assert!(!empty.valid);
    assert!(empty.filtered_text.is_none());
}

#[test]
fn meta_projection_copies_scalar_fields() {
    let document = Document {
        title: "d".to_owned(),
        creator: Some("alice".to_owned()),
        created_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        updated_at: Some(Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap()),
        content: vec![Tab::titled("d")],
        archived: true,
    };

    let meta = DocumentMeta::from(&document);
    assert_eq!(meta.title, "d");
    assert_eq!(meta.creator.as_deref(), Some("alice"));
    assert_eq!(meta.created_at, document.created_at);
    assert_eq!(meta.updated_at, document.updated_at);
    assert!(meta.archived);
}
