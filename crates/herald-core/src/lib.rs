//! # herald-core
//!
//! Core transformation engine for `bitbucket-herald`: converts Bitbucket
//! Cloud webhook deliveries into normalized chat notifications (a one-line
//! summary plus structured embeds).
//!
//! The pipeline is: resolve the event kind from the delivery headers
//! ([`EventKind`]), route it through the exhaustive rule match in
//! [`TransformationEngine`], and hand the finished [`OutgoingMessage`] to the
//! delivery client. The HTTP listener, signature verification, the delivery
//! client, user-name resolution, and markdown rewriting all live outside this
//! crate; the last two are injected through the [`UserResolver`] and
//! [`MarkdownRewriter`] seams.
//!
//! # Examples
//!
//! ```rust,no_run
//! use herald_core::{
//!     EngineConfig, EventHeaders, PassthroughRewriter, PlainResolver, RawEvent,
//!     TransformationEngine,
//! };
//! use std::{collections::HashMap, sync::Arc};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let engine = TransformationEngine::new(
//!     Arc::new(PlainResolver),
//!     Arc::new(PassthroughRewriter),
//!     EngineConfig::default(),
//! );
//!
//! let mut headers = HashMap::new();
//! headers.insert("x-event-key".to_string(), "repo:push".to_string());
//! let event = RawEvent::new(
//!     EventHeaders::from_http_headers(&headers),
//!     serde_json::json!({ /* delivery body */ }),
//! );
//!
//! if let Some(message) = engine.transform(&event).await? {
//!     // hand `message` to the delivery client
//!     println!("{}", message.content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod event;
pub mod message;
pub mod resolve;
pub mod sanitize;

pub use config::{ConfigError, EngineConfig};
pub use engine::{TransformError, TransformationEngine};
pub use event::{EventHeaders, EventKind, RawEvent};
pub use message::{
    colors, Embed, EmbedAuthor, EmbedBuilder, EmbedField, EmbedFooter, EmbedImage,
    MessageBuilder, OutgoingMessage,
};
pub use resolve::{MarkdownRewriter, PassthroughRewriter, PlainResolver, UserResolver};
