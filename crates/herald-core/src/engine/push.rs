//! Rule for `repo:push` deliveries.
//!
//! A push delivery carries a list of changes; each change is classified as a
//! branch deletion, a branch creation, or a commit push, and becomes its own
//! embed. Only the first few changes (default 4) are rendered.

use crate::{
    engine::{optional_str, required, required_str, short_hash, TransformError, TransformationEngine},
    event::EventKind,
    message::{colors, EmbedBuilder, EmbedField, MessageBuilder, OutgoingMessage},
};
use serde_json::Value;
use tracing::debug;

/// Reference type of one side of a push change.
fn ref_type(side: &Value) -> Option<&str> {
    side.get("type").and_then(Value::as_str)
}

impl TransformationEngine {
    pub(crate) async fn push(
        &self,
        payload: &Value,
    ) -> Result<Option<OutgoingMessage>, TransformError> {
        let kind = EventKind::Push;

        // `push` and `push.changes` are checked independently; a delivery
        // without either is a defined no-op, not an error.
        let push = match payload.get("push").filter(|p| !p.is_null()) {
            Some(push) => push,
            None => {
                debug!("Push delivery without push data; skipping");
                return Ok(None);
            }
        };
        let changes = match push.get("changes").and_then(Value::as_array) {
            Some(changes) => changes,
            None => {
                debug!("Push delivery without changes; skipping");
                return Ok(None);
            }
        };

        let mention = self.actor_mention(kind, payload).await?;
        let author = self.embed_author(required(kind, payload, "actor")?);
        let footer = self.repo_footer(kind, payload)?;

        let mut builder = MessageBuilder::new();
        for change in changes.iter().take(self.config().max_push_changes) {
            let old = change.get("old").filter(|v| !v.is_null());
            let new = change.get("new").filter(|v| !v.is_null());

            match (old, new) {
                (Some(old), None) if ref_type(old) == Some("branch") => {
                    let name = old
                        .get("name")
                        .and_then(Value::as_str)
                        .ok_or_else(|| TransformError::MissingField {
                            kind,
                            path: "push.changes.old.name".to_string(),
                        })?;

                    let embed = EmbedBuilder::new()
                        .author(author.clone())
                        .title(format!("Branch `{}` deleted", name))
                        .footer(footer.clone())
                        .color(colors::FAILURE)
                        .build();
                    builder.finalize(embed, format!("{} deleted branch `{}`", mention, name));
                }
                (None, Some(new)) if ref_type(new) == Some("branch") => {
                    let name = new
                        .get("name")
                        .and_then(Value::as_str)
                        .ok_or_else(|| TransformError::MissingField {
                            kind,
                            path: "push.changes.new.name".to_string(),
                        })?;

                    let mut embed = EmbedBuilder::new()
                        .author(author.clone())
                        .title(format!("Branch `{}` created", name))
                        .footer(footer.clone())
                        .color(colors::SUCCESS);
                    if let Some(link) = optional_str(new, "links.html.href") {
                        embed = embed.url(link);
                    }
                    builder.finalize(
                        embed.build(),
                        format!("{} pushed new branch `{}`", mention, name),
                    );
                }
                _ => {
                    // Commit push (also covers tags and truncated histories).
                    let name = new
                        .or(old)
                        .and_then(|s| s.get("name"))
                        .and_then(Value::as_str)
                        .unwrap_or("unknown");

                    let commits = change
                        .get("commits")
                        .and_then(Value::as_array)
                        .map(Vec::as_slice)
                        .unwrap_or(&[]);

                    let mut fields = Vec::with_capacity(commits.len());
                    for commit in commits {
                        let hash = required_str(kind, commit, "hash")?;
                        let link = required_str(kind, commit, "links.html.href")?;
                        let message = optional_str(commit, "message").unwrap_or_default();
                        fields.push(EmbedField::new(
                            "Commit",
                            format!("[`{}`]({}) {}", short_hash(hash), link, message.trim_end()),
                        ));
                    }

                    let mut embed = EmbedBuilder::new()
                        .author(author.clone())
                        .title(format!("Branch `{}` updated", name))
                        .footer(footer.clone())
                        .fields(fields);
                    if let Some(link) = optional_str(change, "links.html.href") {
                        embed = embed.url(link);
                    }
                    builder.finalize(
                        embed.build(),
                        format!(
                            "{} pushed {} commit(s) to `{}`",
                            mention,
                            commits.len(),
                            name
                        ),
                    );
                }
            }
        }

        Ok(builder.finish())
    }
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
