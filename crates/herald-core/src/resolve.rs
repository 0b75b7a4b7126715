//! # Collaborator Seams
//!
//! Trait boundaries for the two external services the engine calls during a
//! transformation: user-name resolution and markdown rewriting. Both are
//! injected as `Arc<dyn ...>` so deployments can swap implementations and
//! tests can substitute fakes.

use crate::message::Embed;
use async_trait::async_trait;

/// Maps a platform display name to a chat-mention string.
///
/// Implementations must not fail: an unknown name yields fallback text (for
/// example the display name itself), never an error.
#[async_trait]
pub trait UserResolver: Send + Sync {
    async fn resolve(&self, display_name: &str) -> String;
}

/// Rewrites raw markdown/image references into the chat platform's markup.
///
/// May attach an image to the embed under construction as a side effect while
/// returning the rewritten text.
#[async_trait]
pub trait MarkdownRewriter: Send + Sync {
    async fn rewrite(&self, text: &str, embed: &mut Embed) -> String;
}

/// Resolver that passes display names through unchanged.
///
/// Useful for tests and for deployments without a name-mapping service.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainResolver;

#[async_trait]
impl UserResolver for PlainResolver {
    async fn resolve(&self, display_name: &str) -> String {
        display_name.to_string()
    }
}

/// Rewriter that returns the text unchanged and attaches nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRewriter;

#[async_trait]
impl MarkdownRewriter for PassthroughRewriter {
    async fn rewrite(&self, text: &str, _embed: &mut Embed) -> String {
        text.to_string()
    }
}
