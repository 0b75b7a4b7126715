//! # Notification Message Module
//!
//! The Discord-shaped message model produced by the transformation engine:
//! [`Embed`] with its author/footer/field parts, the [`OutgoingMessage`]
//! handed to the delivery client, and the builders the rules assemble them
//! with.

use serde::{Deserialize, Serialize};

// ============================================================================
// Colors
// ============================================================================

/// 24-bit embed color constants, one per semantic outcome.
pub mod colors {
    /// Neutral blue used when a rule does not override the color.
    pub const DEFAULT: u32 = 0x3498db;

    /// Success green (approvals, merges, branch creation, passing builds).
    pub const SUCCESS: u32 = 0x2db83d;

    /// Failure red (declines, branch deletion, failing builds).
    pub const FAILURE: u32 = 0xff3030;

    /// Pending orange (in-progress builds, requested changes).
    pub const PENDING: u32 = 0xffa500;
}

// ============================================================================
// Embed model
// ============================================================================

/// Author block of an embed: display name plus avatar and profile links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
    pub icon_url: String,
    pub url: String,
}

/// Footer block of an embed. Always carries the repository full name and the
/// repository avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: String,
}

/// A single named value inside an embed. Field order is significant: a
/// reviewer list, for example, is a header field followed by one field per
/// reviewer in payload order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: None,
        }
    }
}

/// Image attachment on an embed. Set only as a side effect of markdown
/// rewriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedImage {
    pub url: String,
}

/// A structured, styled message block attached to a chat notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    pub color: u32,
}

impl Default for Embed {
    fn default() -> Self {
        Self {
            author: None,
            title: None,
            url: None,
            description: None,
            footer: None,
            image: None,
            fields: Vec::new(),
            color: colors::DEFAULT,
        }
    }
}

/// The complete notification handed to the delivery client: a one-line
/// summary plus the ordered embeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub content: String,
    pub embeds: Vec<Embed>,
}

// ============================================================================
// Builders
// ============================================================================

/// Pure builder for a single [`Embed`].
///
/// Every setter consumes and returns the builder, so an embed under
/// construction is threaded through a rule as a value rather than mutated
/// through a shared instance field. `build()` yields the immutable result.
#[derive(Debug, Clone, Default)]
pub struct EmbedBuilder {
    embed: Embed,
}

impl EmbedBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn author(mut self, author: EmbedAuthor) -> Self {
        self.embed.author = Some(author);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.embed.title = Some(title.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.embed.url = Some(url.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.embed.description = Some(description.into());
        self
    }

    pub fn footer(mut self, footer: EmbedFooter) -> Self {
        self.embed.footer = Some(footer);
        self
    }

    pub fn field(mut self, field: EmbedField) -> Self {
        self.embed.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = EmbedField>) -> Self {
        self.embed.fields.extend(fields);
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.embed.color = color;
        self
    }

    pub fn build(self) -> Embed {
        self.embed
    }
}

/// Accumulator for one transformation invocation.
///
/// Rules finalize each completed embed together with its one-line content
/// summary; `finish()` yields the [`OutgoingMessage`]. Every rule finalizes
/// exactly one embed except the push rule, which may finalize up to four (one
/// per change).
#[derive(Debug, Default)]
pub struct MessageBuilder {
    content_lines: Vec<String>,
    embeds: Vec<Embed>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a completed embed and its content summary line.
    pub fn finalize(&mut self, embed: Embed, content_line: impl Into<String>) {
        self.embeds.push(embed);
        self.content_lines.push(content_line.into());
    }

    /// Number of embeds finalized so far.
    pub fn len(&self) -> usize {
        self.embeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeds.is_empty()
    }

    /// Produce the outgoing message, or `None` when nothing was finalized
    /// (the defined no-op for e.g. a push event without push data).
    pub fn finish(self) -> Option<OutgoingMessage> {
        if self.embeds.is_empty() {
            return None;
        }

        Some(OutgoingMessage {
            content: self.content_lines.join("\n"),
            embeds: self.embeds,
        })
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
