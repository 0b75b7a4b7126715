//! # Transformation Engine Module
//!
//! One rule per recognized event kind. Each rule reads the loosely-typed
//! payload defensively, calls the sanitizer and the injected collaborators,
//! and assembles an [`OutgoingMessage`] through [`MessageBuilder`].
//!
//! Every dispatch is independent and stateless: an invocation owns its
//! builders exclusively until the finished message is handed back, so any
//! number of events may be transformed concurrently without coordination.

use crate::{
    config::EngineConfig,
    event::{EventKind, RawEvent},
    message::{EmbedAuthor, EmbedFooter, OutgoingMessage},
    resolve::{MarkdownRewriter, UserResolver},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

mod issue;
mod pull_request;
mod push;
mod repo;

/// Separator glyph used when rendering an old-to-new change pair.
pub(crate) const CHANGE_ARROW: char = '\u{10C6A}';

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while transforming a single event.
///
/// A missing required field is a contract violation by the upstream payload
/// and always propagates; it is never silently repaired. Oversize text is
/// handled by truncation and is never an error. An unrecognized event key is
/// not an error either: [`TransformationEngine::transform`] returns `Ok(None)`
/// for it.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Missing required field {path} in {kind} payload")]
    MissingField { kind: EventKind, path: String },

    #[error("Invalid type for field {path} in {kind} payload")]
    InvalidFieldType { kind: EventKind, path: String },

    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

// ============================================================================
// Defensive payload navigation
// ============================================================================

/// Walk a dotted path through a JSON tree. JSON `null` counts as absent.
pub(crate) fn value_at<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = payload;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Look up a field the event-type contract guarantees.
pub(crate) fn required<'a>(
    kind: EventKind,
    payload: &'a Value,
    path: &str,
) -> Result<&'a Value, TransformError> {
    value_at(payload, path).ok_or_else(|| TransformError::MissingField {
        kind,
        path: path.to_string(),
    })
}

/// Look up a guaranteed string field.
pub(crate) fn required_str<'a>(
    kind: EventKind,
    payload: &'a Value,
    path: &str,
) -> Result<&'a str, TransformError> {
    required(kind, payload, path)?
        .as_str()
        .ok_or_else(|| TransformError::InvalidFieldType {
            kind,
            path: path.to_string(),
        })
}

/// Look up an optional string field.
pub(crate) fn optional_str<'a>(payload: &'a Value, path: &str) -> Option<&'a str> {
    value_at(payload, path).and_then(Value::as_str)
}

/// First 7 hex characters of a commit hash.
pub(crate) fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

// ============================================================================
// TransformationEngine
// ============================================================================

/// Converts recognized webhook events into chat notifications.
///
/// Holds the two collaborator seams and the engine configuration; carries no
/// per-event state.
pub struct TransformationEngine {
    resolver: Arc<dyn UserResolver>,
    rewriter: Arc<dyn MarkdownRewriter>,
    config: EngineConfig,
}

impl TransformationEngine {
    pub fn new(
        resolver: Arc<dyn UserResolver>,
        rewriter: Arc<dyn MarkdownRewriter>,
        config: EngineConfig,
    ) -> Self {
        Self {
            resolver,
            rewriter,
            config,
        }
    }

    /// Transform one delivery into a notification.
    ///
    /// Returns `Ok(None)` when the event-type header is absent or names an
    /// unrecognized key (the defined no-op), and for a push delivery without
    /// push data.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError`] when a field the event-type contract
    /// guarantees is missing or has an unexpected type.
    #[instrument(skip(self, event), fields(event_key = event.headers.event_key().unwrap_or("<absent>")))]
    pub async fn transform(
        &self,
        event: &RawEvent,
    ) -> Result<Option<OutgoingMessage>, TransformError> {
        let kind = match event.kind() {
            Some(kind) => kind,
            None => {
                debug!("No rule for event key; skipping delivery");
                return Ok(None);
            }
        };

        let message = self.transform_kind(kind, &event.body).await?;

        if let Some(message) = &message {
            info!(
                kind = %kind,
                embeds = message.embeds.len(),
                "Transformed event into notification"
            );
        }

        Ok(message)
    }

    /// Rule entry point for callers that already resolved the kind.
    ///
    /// Dispatch is an exhaustive match: every recognized kind has exactly one
    /// rule.
    pub async fn transform_kind(
        &self,
        kind: EventKind,
        payload: &Value,
    ) -> Result<Option<OutgoingMessage>, TransformError> {
        match kind {
            EventKind::Push => self.push(payload).await,
            EventKind::Fork => self.fork(payload).await,
            EventKind::RepoUpdated => self.repo_updated(payload).await,
            EventKind::CommitCommentCreated => self.commit_comment(payload).await,
            EventKind::CommitStatusCreated => self.commit_status(payload, kind).await,
            EventKind::CommitStatusUpdated => self.commit_status(payload, kind).await,
            EventKind::IssueCreated => self.issue_created(payload).await,
            EventKind::IssueUpdated => self.issue_updated(payload).await,
            EventKind::IssueCommentCreated => self.issue_comment(payload).await,
            EventKind::PullRequestCreated
            | EventKind::PullRequestUpdated
            | EventKind::PullRequestApproved
            | EventKind::PullRequestUnapproved
            | EventKind::PullRequestMerged
            | EventKind::PullRequestDeclined => self.pull_request(payload, kind).await,
            EventKind::PullRequestCommentCreated
            | EventKind::PullRequestCommentUpdated
            | EventKind::PullRequestCommentDeleted => {
                self.pull_request_comment(payload, kind).await
            }
            EventKind::ChangesRequestCreated | EventKind::ChangesRequestRemoved => {
                self.changes_request(payload, kind).await
            }
        }
    }

    // ------------------------------------------------------------------
    // Shared sub-rules
    // ------------------------------------------------------------------

    /// Build an embed author block from a payload user record.
    ///
    /// A record without link information gets the configured default icon and
    /// an empty profile url; otherwise the avatar href is used and the
    /// profile url is composed from the configured base plus the username.
    pub(crate) fn embed_author(&self, user: &Value) -> EmbedAuthor {
        let name = user
            .get("display_name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string();

        match value_at(user, "links.avatar.href").and_then(Value::as_str) {
            Some(avatar) => {
                let username = user
                    .get("nickname")
                    .or_else(|| user.get("username"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                EmbedAuthor {
                    name,
                    icon_url: avatar.to_string(),
                    url: format!("{}{}", self.config.profile_base_url, username),
                }
            }
            None => EmbedAuthor {
                name,
                icon_url: self.config.default_avatar_url.clone(),
                url: String::new(),
            },
        }
    }

    /// Author block for the event root object's `author` record.
    pub(crate) fn extract_author(
        &self,
        kind: EventKind,
        payload: &Value,
        root_key: &str,
    ) -> Result<EmbedAuthor, TransformError> {
        let author = required(kind, payload, &format!("{}.author", root_key))?;
        Ok(self.embed_author(author))
    }

    /// The acting user's display name resolved to a chat mention. Subject of
    /// the one-line content summary.
    pub(crate) async fn actor_mention(
        &self,
        kind: EventKind,
        payload: &Value,
    ) -> Result<String, TransformError> {
        let display_name = required_str(kind, payload, "actor.display_name")?;
        Ok(self.resolver.resolve(display_name).await)
    }

    /// Footer shared by every rule: repository full name plus repository
    /// avatar.
    pub(crate) fn repo_footer(
        &self,
        kind: EventKind,
        payload: &Value,
    ) -> Result<EmbedFooter, TransformError> {
        let text = required_str(kind, payload, "repository.full_name")?.to_string();
        let icon_url = optional_str(payload, "repository.links.avatar.href")
            .unwrap_or_default()
            .to_string();
        Ok(EmbedFooter { text, icon_url })
    }

    pub(crate) fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn resolver(&self) -> &dyn UserResolver {
        self.resolver.as_ref()
    }

    pub(crate) fn rewriter(&self) -> &dyn MarkdownRewriter {
        self.rewriter.as_ref()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
