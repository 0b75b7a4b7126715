//! Tests for the repository-level rules.

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

fn base() -> Value {
    json!({
        "actor": {"display_name": "Alice"},
        "repository": {
            "full_name": "team/widget",
            "links": {
                "html": {"href": "https://git.example/team/widget"},
                "avatar": {"href": "https://avatars.example/widget.png"},
            },
        },
    })
}

#[tokio::test]
async fn test_fork_links_source_to_fork() {
    let mut payload = base();
    payload["fork"] = json!({
        "full_name": "alice/widget",
        "links": {"html": {"href": "https://git.example/alice/widget"}},
    });

    let message = engine().fork(&payload).await.unwrap().unwrap();
    assert_eq!(
        message.embeds[0].description.as_deref(),
        Some(
            "[team/widget](https://git.example/team/widget) \
             forked to [alice/widget](https://git.example/alice/widget)"
        )
    );
    assert_eq!(message.content, "Alice forked repository");
}

#[tokio::test]
async fn test_repo_updated_diffs_watched_properties() {
    let mut payload = base();
    payload["changes"] = json!({
        "name": {"old": "widget", "new": "gadget"},
        "language": {"old": "rust", "new": "zig"},
        "full_name": {"old": "a", "new": "b"},
    });

    let message = engine().repo_updated(&payload).await.unwrap().unwrap();
    let description = message.embeds[0].description.as_deref().unwrap();

    // Watched order: name, website, language, description. full_name is not
    // watched.
    assert_eq!(
        description,
        "**Name:** \"widget\" -> \"gadget\"\n**Language:** \"rust\" -> \"zig\""
    );
}

#[tokio::test]
async fn test_repo_updated_empty_diff_yields_empty_description() {
    let mut payload = base();
    payload["changes"] = json!({"full_name": {"old": "a", "new": "b"}});

    let message = engine().repo_updated(&payload).await.unwrap().unwrap();
    assert_eq!(message.embeds[0].description.as_deref(), Some(""));
}

#[tokio::test]
async fn test_commit_comment_title_carries_short_hash() {
    let mut payload = base();
    payload["commit"] = json!({"hash": "0123456789abcdef"});
    payload["comment"] = json!({
        "content": {"html": "<p>Nice <em>touch</em></p>"},
        "links": {"html": {"href": "https://git.example/commit/0123456#comment-1"}},
    });

    let message = engine().commit_comment(&payload).await.unwrap().unwrap();
    assert_eq!(
        message.embeds[0].title.as_deref(),
        Some("New comment on commit `0123456`")
    );
    assert_eq!(message.embeds[0].description.as_deref(), Some("Nice touch"));
    assert!(message.content.contains("commented on commit `0123456`"));
}

#[tokio::test]
async fn test_commit_status_created_omits_author() {
    let mut payload = base();
    payload["commit_status"] = json!({
        "name": "unit tests",
        "state": "INPROGRESS",
        "description": "Build #17 running",
        "url": "https://ci.example/build/17",
    });

    let message = engine()
        .commit_status(&payload, EventKind::CommitStatusCreated)
        .await
        .unwrap()
        .unwrap();

    let embed = &message.embeds[0];
    assert!(embed.author.is_none());
    assert_eq!(
        embed.description.as_deref(),
        Some("**State:** INPROGRESS\nBuild #17 running")
    );
    assert_eq!(embed.color, colors::PENDING);
    assert!(message.content.contains("created a commit status"));
}

#[tokio::test]
async fn test_commit_status_updated_includes_author() {
    let mut payload = base();
    payload["commit_status"] = json!({
        "name": "unit tests",
        "state": "SUCCESSFUL",
        "description": "All 132 passed",
    });

    let message = engine()
        .commit_status(&payload, EventKind::CommitStatusUpdated)
        .await
        .unwrap()
        .unwrap();

    let embed = &message.embeds[0];
    assert_eq!(embed.author.as_ref().map(|a| a.name.as_str()), Some("Alice"));
    assert_eq!(embed.color, colors::SUCCESS);
}

#[tokio::test]
async fn test_commit_status_failed_is_red() {
    let mut payload = base();
    payload["commit_status"] = json!({"state": "FAILED"});

    let message = engine()
        .commit_status(&payload, EventKind::CommitStatusUpdated)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(message.embeds[0].color, colors::FAILURE);
    assert_eq!(
        message.embeds[0].description.as_deref(),
        Some("**State:** FAILED\n")
    );
}
