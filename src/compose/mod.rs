//! Estimate content composition.
//!
//! A [`ContentBackend`] drafts content when one is configured; its reply is
//! sanitized, and anything unusable falls back to the line-pattern
//! [`FallbackParser`].

mod backend;
mod fallback;

pub use backend::{
    compose_content, parse_backend_reply, ContentBackend, ContentRequest, ReplySanitizer,
    StyleHint, REFERENCE_TEXT_MAX_CHARS,
};
pub use fallback::{parse_fallback, FallbackParser};
