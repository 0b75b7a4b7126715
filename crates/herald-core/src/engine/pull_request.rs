//! Rules for `pullrequest:*` deliveries.
//!
//! The six lifecycle events (created, updated, approved, unapproved,
//! fulfilled, rejected) funnel through a single formatting step that differs
//! only in emoji, action phrase, and color. Comment events and
//! change-request events have their own, smaller shapes.

use crate::{
    engine::{
        optional_str, required, required_str, TransformError, TransformationEngine, value_at,
    },
    event::EventKind,
    message::{colors, EmbedBuilder, EmbedField, MessageBuilder, OutgoingMessage},
    sanitize::{strip_markup, truncate, DESCRIPTION_LIMIT},
};
use serde_json::Value;

/// Marker placed before an approving reviewer's mention.
const APPROVED_MARK: &str = "✅ ";

/// Per-action presentation for the pull request lifecycle rules.
struct PrAction {
    emoji: Option<&'static str>,
    phrase: &'static str,
    color: u32,
}

fn pr_action(kind: EventKind) -> PrAction {
    match kind {
        EventKind::PullRequestCreated => PrAction {
            emoji: None,
            phrase: "created pull request",
            color: colors::DEFAULT,
        },
        EventKind::PullRequestUpdated => PrAction {
            emoji: None,
            phrase: "updated pull request",
            color: colors::DEFAULT,
        },
        EventKind::PullRequestApproved => PrAction {
            emoji: Some(":thumbsup:"),
            phrase: "approved pull request",
            color: colors::SUCCESS,
        },
        EventKind::PullRequestUnapproved => PrAction {
            emoji: Some(":thumbsdown:"),
            phrase: "unapproved pull request",
            color: colors::PENDING,
        },
        EventKind::PullRequestMerged => PrAction {
            emoji: Some(":tada:"),
            phrase: "merged pull request",
            color: colors::SUCCESS,
        },
        EventKind::PullRequestDeclined => PrAction {
            emoji: Some(":no_entry:"),
            phrase: "declined pull request",
            color: colors::FAILURE,
        },
        // transform_kind only routes the six lifecycle kinds here.
        _ => PrAction {
            emoji: None,
            phrase: "updated pull request",
            color: colors::DEFAULT,
        },
    }
}

impl TransformationEngine {
    /// Common formatting step for the six pull request lifecycle events.
    pub(crate) async fn pull_request(
        &self,
        payload: &Value,
        kind: EventKind,
    ) -> Result<Option<OutgoingMessage>, TransformError> {
        let action = pr_action(kind);

        let author = self.extract_author(kind, payload, "pullrequest")?;
        let mention = self.actor_mention(kind, payload).await?;
        let footer = self.repo_footer(kind, payload)?;

        let id = required(kind, payload, "pullrequest.id")?;
        let title = required_str(kind, payload, "pullrequest.title")?;
        let url = required_str(kind, payload, "pullrequest.links.html.href")?;
        let source = required_str(kind, payload, "pullrequest.source.branch.name")?;
        let destination = required_str(kind, payload, "pullrequest.destination.branch.name")?;

        let mut description = format!("`{}` \u{2192} `{}`", source, destination);
        if let Some(reason) =
            optional_str(payload, "pullrequest.reason").filter(|r| !r.is_empty())
        {
            description.push('\n');
            description.push_str(&truncate(&strip_markup(reason), DESCRIPTION_LIMIT));
        }

        let fields = self.reviewer_fields(payload).await;

        let embed = EmbedBuilder::new()
            .author(author)
            .title(format!("#{} {}", id, title))
            .url(url)
            .description(description)
            .footer(footer)
            .fields(fields)
            .color(action.color)
            .build();

        let content = match action.emoji {
            Some(emoji) => format!("{} {} {}", emoji, mention, action.phrase),
            None => format!("{} {}", mention, action.phrase),
        };

        let mut builder = MessageBuilder::new();
        builder.finalize(embed, content);
        Ok(builder.finish())
    }

    /// Reviewer list: a constant header field, then one field per participant
    /// with role REVIEWER, in payload order. Approving reviewers get a
    /// checkmark before their mention.
    async fn reviewer_fields(&self, payload: &Value) -> Vec<EmbedField> {
        let participants = match value_at(payload, "pullrequest.participants")
            .and_then(Value::as_array)
        {
            Some(participants) => participants,
            None => return Vec::new(),
        };

        let reviewers: Vec<&Value> = participants
            .iter()
            .filter(|p| p.get("role").and_then(Value::as_str) == Some("REVIEWER"))
            .collect();
        if reviewers.is_empty() {
            return Vec::new();
        }

        let mut fields = vec![EmbedField::new("Reviewers", "―")];
        for reviewer in reviewers {
            let name = optional_str(reviewer, "user.display_name").unwrap_or("Unknown");
            let mention = self.resolver().resolve(name).await;
            let approved = reviewer
                .get("approved")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let mark = if approved { APPROVED_MARK } else { "" };
            fields.push(EmbedField::new(name, format!("{}{}", mark, mention)));
        }

        fields
    }

    /// Pull request comment created/updated/deleted. The three verbs share
    /// one output shape; only the title wording differs.
    pub(crate) async fn pull_request_comment(
        &self,
        payload: &Value,
        kind: EventKind,
    ) -> Result<Option<OutgoingMessage>, TransformError> {
        let verb = match kind {
            EventKind::PullRequestCommentCreated => "created",
            EventKind::PullRequestCommentDeleted => "deleted",
            _ => "updated",
        };

        let author = self.extract_author(kind, payload, "pullrequest")?;
        let mention = self.actor_mention(kind, payload).await?;
        let footer = self.repo_footer(kind, payload)?;

        let title = required_str(kind, payload, "pullrequest.title")?;
        let html = required_str(kind, payload, "comment.content.html")?;
        let url = required_str(kind, payload, "comment.links.html.href")?;

        let embed = EmbedBuilder::new()
            .author(author)
            .title(format!("Comment {} on pull request: {}", verb, title))
            .url(url)
            .description(truncate(&strip_markup(html), DESCRIPTION_LIMIT))
            .footer(footer)
            .build();

        let mut builder = MessageBuilder::new();
        builder.finalize(
            embed,
            format!("{} {} comment on pull request", mention, verb),
        );
        Ok(builder.finish())
    }

    /// Change-request created/removed: a minimal embed (author, title, url).
    /// A created request forces the pending color; removal leaves the
    /// default.
    pub(crate) async fn changes_request(
        &self,
        payload: &Value,
        kind: EventKind,
    ) -> Result<Option<OutgoingMessage>, TransformError> {
        let created = kind == EventKind::ChangesRequestCreated;

        let author = self.extract_author(kind, payload, "pullrequest")?;
        let mention = self.actor_mention(kind, payload).await?;
        let footer = self.repo_footer(kind, payload)?;

        let id = required(kind, payload, "pullrequest.id")?;
        let title = required_str(kind, payload, "pullrequest.title")?;
        let url = required_str(kind, payload, "pullrequest.links.html.href")?;

        let mut embed = EmbedBuilder::new()
            .author(author)
            .title(format!("#{} {}", id, title))
            .url(url)
            .footer(footer);
        if created {
            embed = embed.color(colors::PENDING);
        }

        let content = if created {
            format!("{} requested changes on pull request", mention)
        } else {
            format!("{} removed change request on pull request", mention)
        };

        let mut builder = MessageBuilder::new();
        builder.finalize(embed.build(), content);
        Ok(builder.finish())
    }
}

#[cfg(test)]
#[path = "pull_request_tests.rs"]
mod tests;
