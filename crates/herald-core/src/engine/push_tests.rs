//! Tests for the push rule.

use super::*;
use crate::config::EngineConfig;
use crate::resolve::{PassthroughRewriter, PlainResolver};
use serde_json::json;
use std::sync::Arc;

fn engine() -> TransformationEngine {
    TransformationEngine::new(
        Arc::new(PlainResolver),
        Arc::new(PassthroughRewriter),
        EngineConfig::default(),
    )
}

fn base_payload(changes: Value) -> Value {
    json!({
        "actor": {"display_name": "Alice"},
        "repository": {"full_name": "team/widget"},
        "push": {"changes": changes},
    })
}

fn commit_change(branch: &str) -> Value {
    json!({
        "old": {"type": "branch", "name": branch},
        "new": {"type": "branch", "name": branch},
        "commits": [
            {
                "hash": "0123456789abcdef",
                "message": "Fix the widget\n",
                "links": {"html": {"href": "https://git.example/commit/0123456"}},
            },
        ],
    })
}

#[tokio::test]
async fn test_push_without_push_data_is_no_op() {
    let payload = json!({
        "actor": {"display_name": "Alice"},
        "repository": {"full_name": "team/widget"},
    });
    let result = engine().push(&payload).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_push_without_changes_is_no_op() {
    let payload = json!({
        "actor": {"display_name": "Alice"},
        "repository": {"full_name": "team/widget"},
        "push": {},
    });
    let result = engine().push(&payload).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_push_renders_first_four_changes_only() {
    let changes: Vec<Value> = (0..5).map(|i| commit_change(&format!("branch-{i}"))).collect();
    let payload = base_payload(Value::Array(changes));

    let message = engine().push(&payload).await.unwrap().unwrap();
    assert_eq!(message.embeds.len(), 4);
    assert!(message.content.contains("branch-3"));
    assert!(!message.content.contains("branch-4"));
}

#[tokio::test]
async fn test_branch_deletion_change() {
    let payload = base_payload(json!([
        {"old": {"type": "branch", "name": "stale"}, "new": null},
    ]));

    let message = engine().push(&payload).await.unwrap().unwrap();
    assert!(message.content.contains("deleted branch `stale`"));
    assert_eq!(message.embeds[0].color, 0xff3030);
}

#[tokio::test]
async fn test_branch_creation_change() {
    let payload = base_payload(json!([
        {
            "old": null,
            "new": {
                "type": "branch",
                "name": "feature",
                "links": {"html": {"href": "https://git.example/branch/feature"}},
            },
        },
    ]));

    let message = engine().push(&payload).await.unwrap().unwrap();
    assert!(message.content.contains("pushed new branch `feature`"));
    assert_eq!(message.embeds[0].color, colors::SUCCESS);
    assert_eq!(
        message.embeds[0].url.as_deref(),
        Some("https://git.example/branch/feature")
    );
}

#[tokio::test]
async fn test_commit_push_lists_commits_as_fields() {
    let payload = base_payload(json!([commit_change("main")]));

    let message = engine().push(&payload).await.unwrap().unwrap();
    let embed = &message.embeds[0];

    assert_eq!(embed.color, colors::DEFAULT);
    assert_eq!(embed.fields.len(), 1);
    assert_eq!(
        embed.fields[0].value,
        "[`0123456`](https://git.example/commit/0123456) Fix the widget"
    );
    assert!(message.content.contains("pushed 1 commit(s) to `main`"));
}

#[tokio::test]
async fn test_commit_missing_hash_propagates() {
    let payload = base_payload(json!([
        {
            "old": {"type": "branch", "name": "main"},
            "new": {"type": "branch", "name": "main"},
            "commits": [{"links": {"html": {"href": "https://x"}}}],
        },
    ]));

    let err = engine().push(&payload).await.unwrap_err();
    assert!(matches!(err, TransformError::MissingField { .. }));
}
