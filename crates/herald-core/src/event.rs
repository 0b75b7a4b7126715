//! # Event Dispatch Module
//!
//! Raw webhook input ([`RawEvent`], [`EventHeaders`]) and the closed set of
//! recognized Bitbucket event keys ([`EventKind`]). Resolving a kind from the
//! headers is the dispatch step; routing a known kind to its rule is an
//! exhaustive match in the engine, so there is no runtime string-keyed rule
//! table to fall through.

use crate::engine::TransformError;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Header carrying the event-type key on Bitbucket webhook deliveries.
pub const EVENT_KEY_HEADER: &str = "x-event-key";

// ============================================================================
// Raw input
// ============================================================================

/// Case-insensitive view over the HTTP headers of a webhook delivery.
#[derive(Debug, Clone, Default)]
pub struct EventHeaders {
    headers: HashMap<String, String>,
}

impl EventHeaders {
    /// Build from an HTTP header map. Keys are normalized to lowercase.
    pub fn from_http_headers(headers: &HashMap<String, String>) -> Self {
        Self {
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_lowercase(), v.clone()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// The raw `x-event-key` value, if present.
    pub fn event_key(&self) -> Option<&str> {
        self.get(EVENT_KEY_HEADER)
    }
}

/// One webhook delivery: headers plus the parsed JSON body.
///
/// Immutable input to a transformation rule, consumed once. No schema is
/// enforced beyond what each rule reads defensively.
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub headers: EventHeaders,
    pub body: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

impl RawEvent {
    pub fn new(headers: EventHeaders, body: serde_json::Value) -> Self {
        Self {
            headers,
            body,
            received_at: Utc::now(),
        }
    }

    /// Parse a raw request body into an event.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::MalformedBody`] when the body is not valid
    /// JSON.
    pub fn from_bytes(headers: EventHeaders, body: Bytes) -> Result<Self, TransformError> {
        let body = serde_json::from_slice(&body)?;
        Ok(Self::new(headers, body))
    }

    /// Resolve the event kind from the headers, if the key is present and
    /// recognized.
    pub fn kind(&self) -> Option<EventKind> {
        EventKind::from_headers(&self.headers)
    }
}

// ============================================================================
// Event kinds
// ============================================================================

/// The closed set of Bitbucket event keys this engine transforms.
///
/// Dispatch is total over this set: every variant has exactly one rule.
/// Unrecognized keys never reach a rule; whether to ignore them silently or
/// signal "unsupported event" is the caller's policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Push,
    Fork,
    RepoUpdated,
    CommitCommentCreated,
    CommitStatusCreated,
    CommitStatusUpdated,
    IssueCreated,
    IssueUpdated,
    IssueCommentCreated,
    PullRequestCreated,
    PullRequestUpdated,
    PullRequestApproved,
    PullRequestUnapproved,
    PullRequestMerged,
    PullRequestDeclined,
    PullRequestCommentCreated,
    PullRequestCommentUpdated,
    PullRequestCommentDeleted,
    ChangesRequestCreated,
    ChangesRequestRemoved,
}

impl EventKind {
    /// All recognized kinds, in declaration order.
    pub const ALL: [EventKind; 20] = [
        Self::Push,
        Self::Fork,
        Self::RepoUpdated,
        Self::CommitCommentCreated,
        Self::CommitStatusCreated,
        Self::CommitStatusUpdated,
        Self::IssueCreated,
        Self::IssueUpdated,
        Self::IssueCommentCreated,
        Self::PullRequestCreated,
        Self::PullRequestUpdated,
        Self::PullRequestApproved,
        Self::PullRequestUnapproved,
        Self::PullRequestMerged,
        Self::PullRequestDeclined,
        Self::PullRequestCommentCreated,
        Self::PullRequestCommentUpdated,
        Self::PullRequestCommentDeleted,
        Self::ChangesRequestCreated,
        Self::ChangesRequestRemoved,
    ];

    /// Look up a kind by its wire key. `None` means the key is outside the
    /// recognized set.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "repo:push" => Some(Self::Push),
            "repo:fork" => Some(Self::Fork),
            "repo:updated" => Some(Self::RepoUpdated),
            "repo:commit_comment_created" => Some(Self::CommitCommentCreated),
            "repo:commit_status_created" => Some(Self::CommitStatusCreated),
            "repo:commit_status_updated" => Some(Self::CommitStatusUpdated),
            "issue:created" => Some(Self::IssueCreated),
            "issue:updated" => Some(Self::IssueUpdated),
            "issue:comment_created" => Some(Self::IssueCommentCreated),
            "pullrequest:created" => Some(Self::PullRequestCreated),
            "pullrequest:updated" => Some(Self::PullRequestUpdated),
            "pullrequest:approved" => Some(Self::PullRequestApproved),
            "pullrequest:unapproved" => Some(Self::PullRequestUnapproved),
            "pullrequest:fulfilled" => Some(Self::PullRequestMerged),
            "pullrequest:rejected" => Some(Self::PullRequestDeclined),
            "pullrequest:comment_created" => Some(Self::PullRequestCommentCreated),
            "pullrequest:comment_updated" => Some(Self::PullRequestCommentUpdated),
            "pullrequest:comment_deleted" => Some(Self::PullRequestCommentDeleted),
            "pullrequest:changes_request_created" => Some(Self::ChangesRequestCreated),
            "pullrequest:changes_request_removed" => Some(Self::ChangesRequestRemoved),
            _ => None,
        }
    }

    /// Resolve the kind from delivery headers. `None` when the header is
    /// absent or the key unrecognized.
    pub fn from_headers(headers: &EventHeaders) -> Option<Self> {
        headers.event_key().and_then(Self::from_key)
    }

    /// Whether `key` names a recognized event kind.
    pub fn is_known(key: &str) -> bool {
        Self::from_key(key).is_some()
    }

    /// The wire key for this kind.
    pub fn as_key(&self) -> &'static str {
        match self {
            Self::Push => "repo:push",
            Self::Fork => "repo:fork",
            Self::RepoUpdated => "repo:updated",
            Self::CommitCommentCreated => "repo:commit_comment_created",
            Self::CommitStatusCreated => "repo:commit_status_created",
            Self::CommitStatusUpdated => "repo:commit_status_updated",
            Self::IssueCreated => "issue:created",
            Self::IssueUpdated => "issue:updated",
            Self::IssueCommentCreated => "issue:comment_created",
            Self::PullRequestCreated => "pullrequest:created",
            Self::PullRequestUpdated => "pullrequest:updated",
            Self::PullRequestApproved => "pullrequest:approved",
            Self::PullRequestUnapproved => "pullrequest:unapproved",
            Self::PullRequestMerged => "pullrequest:fulfilled",
            Self::PullRequestDeclined => "pullrequest:rejected",
            Self::PullRequestCommentCreated => "pullrequest:comment_created",
            Self::PullRequestCommentUpdated => "pullrequest:comment_updated",
            Self::PullRequestCommentDeleted => "pullrequest:comment_deleted",
            Self::ChangesRequestCreated => "pullrequest:changes_request_created",
            Self::ChangesRequestRemoved => "pullrequest:changes_request_removed",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_key())
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
