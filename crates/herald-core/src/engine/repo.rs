//! Rules for repository-level deliveries: fork, settings updates, commit
//! comments, and commit statuses.

use crate::{
    engine::{
        optional_str, required, required_str, short_hash, TransformError, TransformationEngine,
        value_at,
    },
    event::EventKind,
    message::{colors, EmbedBuilder, MessageBuilder, OutgoingMessage},
    sanitize::{strip_markup, truncate, DESCRIPTION_LIMIT},
};
use serde_json::Value;

/// Repository properties watched by the `repo:updated` rule, with their
/// display labels. Order is the rendering order.
const WATCHED_PROPERTIES: [(&str, &str); 4] = [
    ("name", "Name"),
    ("website", "Website"),
    ("language", "Language"),
    ("description", "Description"),
];

impl TransformationEngine {
    pub(crate) async fn fork(
        &self,
        payload: &Value,
    ) -> Result<Option<OutgoingMessage>, TransformError> {
        let kind = EventKind::Fork;

        let author = self.embed_author(required(kind, payload, "actor")?);
        let mention = self.actor_mention(kind, payload).await?;
        let footer = self.repo_footer(kind, payload)?;

        let source_name = required_str(kind, payload, "repository.full_name")?;
        let source_link = optional_str(payload, "repository.links.html.href").unwrap_or_default();
        let fork_name = required_str(kind, payload, "fork.full_name")?;
        let fork_link = optional_str(payload, "fork.links.html.href").unwrap_or_default();

        let embed = EmbedBuilder::new()
            .author(author)
            .title(format!("New fork: {}", fork_name))
            .url(fork_link)
            .description(format!(
                "[{}]({}) forked to [{}]({})",
                source_name, source_link, fork_name, fork_link
            ))
            .footer(footer)
            .build();

        let mut builder = MessageBuilder::new();
        builder.finalize(embed, format!("{} forked repository", mention));
        Ok(builder.finish())
    }

    /// Diff of the watched repository properties. A change set touching none
    /// of them yields an empty description.
    pub(crate) async fn repo_updated(
        &self,
        payload: &Value,
    ) -> Result<Option<OutgoingMessage>, TransformError> {
        let kind = EventKind::RepoUpdated;

        let author = self.embed_author(required(kind, payload, "actor")?);
        let mention = self.actor_mention(kind, payload).await?;
        let footer = self.repo_footer(kind, payload)?;
        let url = optional_str(payload, "repository.links.html.href").unwrap_or_default();

        let mut lines = Vec::new();
        for (key, label) in WATCHED_PROPERTIES {
            if let Some(change) = payload.get("changes").and_then(|c| c.get(key)) {
                let old = change.get("old").and_then(Value::as_str).unwrap_or_default();
                let new = change.get("new").and_then(Value::as_str).unwrap_or_default();
                lines.push(format!("**{}:** \"{}\" -> \"{}\"", label, old, new));
            }
        }

        let embed = EmbedBuilder::new()
            .author(author)
            .title("Repository updated")
            .url(url)
            .description(lines.join("\n"))
            .footer(footer)
            .build();

        let mut builder = MessageBuilder::new();
        builder.finalize(embed, format!("{} updated repository settings", mention));
        Ok(builder.finish())
    }

    pub(crate) async fn commit_comment(
        &self,
        payload: &Value,
    ) -> Result<Option<OutgoingMessage>, TransformError> {
        let kind = EventKind::CommitCommentCreated;

        let author = self.embed_author(required(kind, payload, "actor")?);
        let mention = self.actor_mention(kind, payload).await?;
        let footer = self.repo_footer(kind, payload)?;

        let hash = short_hash(required_str(kind, payload, "commit.hash")?);
        let html = required_str(kind, payload, "comment.content.html")?;
        let url = required_str(kind, payload, "comment.links.html.href")?;

        let embed = EmbedBuilder::new()
            .author(author)
            .title(format!("New comment on commit `{}`", hash))
            .url(url)
            .description(truncate(&strip_markup(html), DESCRIPTION_LIMIT))
            .footer(footer)
            .build();

        let mut builder = MessageBuilder::new();
        builder.finalize(embed, format!("{} commented on commit `{}`", mention, hash));
        Ok(builder.finish())
    }

    /// Commit status created/updated. The created variant deliberately omits
    /// the author block; the updated variant includes it.
    pub(crate) async fn commit_status(
        &self,
        payload: &Value,
        kind: EventKind,
    ) -> Result<Option<OutgoingMessage>, TransformError> {
        let updated = kind == EventKind::CommitStatusUpdated;
        let verb = if updated { "updated" } else { "created" };

        let mention = self.actor_mention(kind, payload).await?;
        let footer = self.repo_footer(kind, payload)?;

        let state = required_str(kind, payload, "commit_status.state")?;
        let status_description =
            optional_str(payload, "commit_status.description").unwrap_or_default();
        let name = optional_str(payload, "commit_status.name").unwrap_or("Commit status");
        let url = optional_str(payload, "commit_status.url").unwrap_or_default();

        let color = match state {
            "SUCCESSFUL" => colors::SUCCESS,
            "FAILED" | "STOPPED" => colors::FAILURE,
            "INPROGRESS" => colors::PENDING,
            _ => colors::DEFAULT,
        };

        let mut embed = EmbedBuilder::new()
            .title(name)
            .url(url)
            .description(format!("**State:** {}\n{}", state, status_description))
            .footer(footer)
            .color(color);
        if updated {
            if let Some(actor) = value_at(payload, "actor") {
                embed = embed.author(self.embed_author(actor));
            }
        }

        let mut builder = MessageBuilder::new();
        builder.finalize(
            embed.build(),
            format!("{} {} a commit status", mention, verb),
        );
        Ok(builder.finish())
    }
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;
