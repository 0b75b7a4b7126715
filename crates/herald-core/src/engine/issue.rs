//! Rules for `issue:*` deliveries.

use crate::{
    engine::{
        optional_str, required, required_str, TransformError, TransformationEngine, value_at,
        CHANGE_ARROW,
    },
    event::EventKind,
    message::{EmbedBuilder, MessageBuilder, OutgoingMessage},
    sanitize::{title_case, truncate, REWRITE_LIMIT},
};
use serde_json::Value;

/// Optional issue attributes rendered by the created rule, with labels, in
/// rendering order.
const OPTIONAL_ATTRIBUTES: [(&str, &str); 3] = [
    ("component", "Component"),
    ("milestone", "Milestone"),
    ("version", "Version"),
];

/// Scalar change-set keys rendered by the updated rule, with labels, in
/// rendering order.
const SCALAR_CHANGES: [(&str, &str); 6] = [
    ("kind", "Kind"),
    ("priority", "Priority"),
    ("status", "Status"),
    ("component", "Component"),
    ("milestone", "Milestone"),
    ("version", "Version"),
];

impl TransformationEngine {
    pub(crate) async fn issue_created(
        &self,
        payload: &Value,
    ) -> Result<Option<OutgoingMessage>, TransformError> {
        let kind = EventKind::IssueCreated;

        let author = self.embed_author(required(kind, payload, "actor")?);
        let mention = self.actor_mention(kind, payload).await?;
        let footer = self.repo_footer(kind, payload)?;

        let id = required(kind, payload, "issue.id")?;
        let title = required_str(kind, payload, "issue.title")?;
        let url = required_str(kind, payload, "issue.links.html.href")?;

        let mut lines = Vec::new();
        if let Some(assignee) = value_at(payload, "issue.assignee") {
            lines.push(format!("**Assignee:** {}", self.user_profile_link(assignee)));
        }
        lines.push(format!(
            "**State:** `{}`",
            title_case(optional_str(payload, "issue.state"))
        ));
        lines.push(format!(
            "**Kind:** `{}`",
            title_case(optional_str(payload, "issue.kind"))
        ));
        lines.push(format!(
            "**Priority:** `{}`",
            title_case(optional_str(payload, "issue.priority"))
        ));
        for (key, label) in OPTIONAL_ATTRIBUTES {
            if let Some(name) = optional_str(payload, &format!("issue.{}.name", key)) {
                lines.push(format!("**{}:** `{}`", label, name));
            }
        }

        let mut embed = EmbedBuilder::new()
            .author(author)
            .title(format!("#{} {}", id, title))
            .url(url)
            .footer(footer)
            .build();

        if let Some(raw) = optional_str(payload, "issue.content.raw").filter(|s| !s.is_empty()) {
            let rewritten = self
                .rewriter()
                .rewrite(&truncate(raw, REWRITE_LIMIT), &mut embed)
                .await;
            lines.push(rewritten);
        }
        embed.description = Some(lines.join("\n"));

        let mut builder = MessageBuilder::new();
        builder.finalize(embed, format!("{} created issue", mention));
        Ok(builder.finish())
    }

    pub(crate) async fn issue_updated(
        &self,
        payload: &Value,
    ) -> Result<Option<OutgoingMessage>, TransformError> {
        let kind = EventKind::IssueUpdated;

        let author = self.embed_author(required(kind, payload, "actor")?);
        let mention = self.actor_mention(kind, payload).await?;
        let footer = self.repo_footer(kind, payload)?;

        let id = required(kind, payload, "issue.id")?;
        let title = required_str(kind, payload, "issue.title")?;
        let url = required_str(kind, payload, "issue.links.html.href")?;

        let mut lines = Vec::new();

        // Assignment pairs render resolved mentions; a line where both sides
        // are unassigned is suppressed entirely.
        for (key, label) in [("assignee", "Assignee"), ("responsible", "Responsible")] {
            if let Some(change) = value_at(payload, &format!("changes.{}", key)) {
                let old = change.get("old").filter(|v| !v.is_null());
                let new = change.get("new").filter(|v| !v.is_null());
                if old.is_none() && new.is_none() {
                    continue;
                }

                let old = self.assignment_side(old).await;
                let new = self.assignment_side(new).await;
                lines.push(format!("**{}:** {} {} {}", label, old, CHANGE_ARROW, new));
            }
        }

        for (key, label) in SCALAR_CHANGES {
            if let Some(change) = payload.get("changes").and_then(|c| c.get(key)) {
                let old = title_case(change.get("old").and_then(Value::as_str));
                let new = title_case(change.get("new").and_then(Value::as_str));
                lines.push(format!(
                    "**{}:** `{}` {} `{}`",
                    label, old, CHANGE_ARROW, new
                ));
            }
        }

        let mut embed = EmbedBuilder::new()
            .author(author)
            .title(format!("#{} {}", id, title))
            .url(url)
            .footer(footer)
            .build();

        // A content change renders the new content, truncated before the
        // markdown rewrite.
        if value_at(payload, "changes.content").is_some() {
            let raw = optional_str(payload, "issue.content.raw").unwrap_or_default();
            let rewritten = self
                .rewriter()
                .rewrite(&truncate(raw, REWRITE_LIMIT), &mut embed)
                .await;
            lines.push(rewritten);
        }
        embed.description = Some(lines.join("\n"));

        let mut builder = MessageBuilder::new();
        builder.finalize(embed, format!("{} updated issue", mention));
        Ok(builder.finish())
    }

    /// Issue comments travel the raw-markdown path: truncate the raw body,
    /// then rewrite. No HTML stripping here, unlike commit and pull request
    /// comments.
    pub(crate) async fn issue_comment(
        &self,
        payload: &Value,
    ) -> Result<Option<OutgoingMessage>, TransformError> {
        let kind = EventKind::IssueCommentCreated;

        let author = self.embed_author(required(kind, payload, "actor")?);
        let mention = self.actor_mention(kind, payload).await?;
        let footer = self.repo_footer(kind, payload)?;

        let id = required(kind, payload, "issue.id")?;
        let title = required_str(kind, payload, "issue.title")?;
        let raw = required_str(kind, payload, "comment.content.raw")?;
        let url = required_str(kind, payload, "comment.links.html.href")?;

        let mut embed = EmbedBuilder::new()
            .author(author)
            .title(format!("New comment on issue #{}: {}", id, title))
            .url(url)
            .footer(footer)
            .build();

        let rewritten = self
            .rewriter()
            .rewrite(&truncate(raw, REWRITE_LIMIT), &mut embed)
            .await;
        embed.description = Some(rewritten);

        let mut builder = MessageBuilder::new();
        builder.finalize(embed, format!("{} commented on issue", mention));
        Ok(builder.finish())
    }

    /// Markdown profile link for a payload user record.
    fn user_profile_link(&self, user: &Value) -> String {
        let name = user
            .get("display_name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown");
        let username = user
            .get("nickname")
            .or_else(|| user.get("username"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        format!("[{}]({}{})", name, self.config().profile_base_url, username)
    }

    /// One side of an assignment change: a resolved mention, or
    /// `` `Unassigned` `` for a null side.
    async fn assignment_side(&self, user: Option<&Value>) -> String {
        match user {
            Some(user) => {
                let name = user
                    .get("display_name")
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown");
                self.resolver().resolve(name).await
            }
            None => "`Unassigned`".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;
