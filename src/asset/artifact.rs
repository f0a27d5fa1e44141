//! The unit of compiled output.

use std::path::PathBuf;

use crate::template::{EngineKind, Renderer};

/// What an artifact serves.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Finished bytes, served verbatim.
    Static(Vec<u8>),
    /// Rendered per request.
    Template(Renderer),
}

/// A compiled, servable file.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Path the artifact is served under (`/blog/post.html`).
    pub public_path: String,
    pub content_type: &'static str,
    pub payload: Payload,
    /// Engine that compiled a template payload.
    pub engine: Option<EngineKind>,
    /// Absolute path of the source file.
    pub source_path: PathBuf,
}

impl Artifact {
    pub const fn is_template(&self) -> bool {
        matches!(self.payload, Payload::Template(_))
    }

    /// Static bytes, if this is not a template.
    pub fn content(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Static(bytes) => Some(bytes),
            Payload::Template(_) => None,
        }
    }

    pub fn renderer(&self) -> Option<&Renderer> {
        match &self.payload {
            Payload::Template(renderer) => Some(renderer),
            Payload::Static(_) => None,
        }
    }
}
