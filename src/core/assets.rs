//! Embedded seed templates.
//!
//! Template content is baked into the binary at compile time so that
//! scaffolding and repair work without any external files.

use sha2::{Digest, Sha256};

pub const TEMPLATE_WORKSPACE: &str = include_str!("../../templates/WORKSPACE.md");
pub const TEMPLATE_INBOX: &str = include_str!("../../templates/INBOX.md");
pub const TEMPLATE_CONTEXT: &str = include_str!("../../templates/CONTEXT.md");
pub const TEMPLATE_ARCHIVE: &str = include_str!("../../templates/ARCHIVE.md");

pub fn get_template(name: &str) -> Option<&'static str> {
    match name {
        "WORKSPACE.md" => Some(TEMPLATE_WORKSPACE),
        "INBOX.md" => Some(TEMPLATE_INBOX),
        "CONTEXT.md" => Some(TEMPLATE_CONTEXT),
        "ARCHIVE.md" => Some(TEMPLATE_ARCHIVE),
        _ => None,
    }
}

/// Hex sha256 of a content string, used to recognize an unmodified
/// template on disk before overwriting it.
pub fn content_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
