//! Tests for the engine core: payload navigation, dispatch, and the shared
//! sub-rules.

use super::*;
use crate::event::EventHeaders;
use crate::resolve::{PassthroughRewriter, PlainResolver};
use serde_json::json;
use std::collections::HashMap;

fn engine() -> TransformationEngine {
    TransformationEngine::new(
        Arc::new(PlainResolver),
        Arc::new(PassthroughRewriter),
        EngineConfig::default(),
    )
}

fn event_with_key(key: &str, body: Value) -> RawEvent {
    let mut map = HashMap::new();
    map.insert("x-event-key".to_string(), key.to_string());
    RawEvent::new(EventHeaders::from_http_headers(&map), body)
}

#[test]
fn test_value_at_walks_dotted_path() {
    let payload = json!({"a": {"b": {"c": "deep"}}});
    assert_eq!(value_at(&payload, "a.b.c").and_then(Value::as_str), Some("deep"));
    assert!(value_at(&payload, "a.b.missing").is_none());
}

#[test]
fn test_value_at_treats_null_as_absent() {
    let payload = json!({"assignee": null});
    assert!(value_at(&payload, "assignee").is_none());
}

#[test]
fn test_required_reports_dotted_path() {
    let payload = json!({"pullrequest": {}});
    let err = required(EventKind::PullRequestCreated, &payload, "pullrequest.title").unwrap_err();
    match err {
        TransformError::MissingField { kind, path } => {
            assert_eq!(kind, EventKind::PullRequestCreated);
            assert_eq!(path, "pullrequest.title");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_required_str_rejects_wrong_type() {
    let payload = json!({"issue": {"id": 42}});
    let err = required_str(EventKind::IssueCreated, &payload, "issue.id").unwrap_err();
    assert!(matches!(err, TransformError::InvalidFieldType { .. }));
}

#[test]
fn test_short_hash_takes_seven_chars() {
    assert_eq!(short_hash("0123456789abcdef"), "0123456");
    assert_eq!(short_hash("abc"), "abc");
}

#[tokio::test]
async fn test_transform_skips_missing_header() {
    let event = RawEvent::new(EventHeaders::default(), json!({}));
    let result = engine().transform(&event).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_transform_skips_unknown_key() {
    let event = event_with_key("repo:transfer", json!({}));
    let result = engine().transform(&event).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_transform_routes_known_key() {
    let body = json!({
        "actor": {"display_name": "Alice"},
        "repository": {"full_name": "team/widget"},
        "fork": {"full_name": "alice/widget"},
    });
    let event = event_with_key("repo:fork", body);

    let message = engine().transform(&event).await.unwrap().unwrap();
    assert_eq!(message.embeds.len(), 1);
    assert!(message.content.contains("forked"));
}

#[test]
fn test_embed_author_without_links_uses_defaults() {
    let engine = engine();
    let author = engine.embed_author(&json!({"display_name": "Alice"}));

    assert_eq!(author.name, "Alice");
    assert_eq!(author.icon_url, EngineConfig::default().default_avatar_url);
    assert_eq!(author.url, "");
}

#[test]
fn test_embed_author_with_links_composes_profile_url() {
    let engine = engine();
    let author = engine.embed_author(&json!({
        "display_name": "Alice",
        "nickname": "alice",
        "links": {"avatar": {"href": "https://avatars.example/alice.png"}},
    }));

    assert_eq!(author.icon_url, "https://avatars.example/alice.png");
    assert_eq!(author.url, "https://bitbucket.org/alice");
}

#[test]
fn test_repo_footer_carries_full_name_and_avatar() {
    let engine = engine();
    let payload = json!({
        "repository": {
            "full_name": "team/widget",
            "links": {"avatar": {"href": "https://avatars.example/widget.png"}},
        },
    });

    let footer = engine.repo_footer(EventKind::Push, &payload).unwrap();
    assert_eq!(footer.text, "team/widget");
    assert_eq!(footer.icon_url, "https://avatars.example/widget.png");
}
