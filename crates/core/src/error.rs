//! Error types for slide spec generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning scraped pages into slide specs.
///
/// Every variant is page-scoped: callers log it against the page and move on
/// to the next one.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The page's content tree is empty or unreadable.
    #[error("Missing page content: {0}")]
    MissingContent(String),

    /// No image manifest is available for the page.
    #[error("Missing image manifest: {0}")]
    MissingManifest(String),

    /// The image manifest exists but could not be parsed.
    #[error("Malformed image manifest: {0}")]
    MalformedManifest(String),

    /// A previously written slide spec could not be parsed.
    #[error("Malformed slide spec: {0}")]
    MalformedSpec(String),

    /// A replacement rule table could not be parsed.
    #[error("Invalid rule set: {0}")]
    InvalidRules(String),

    /// The HTML backend could not produce a content tree.
    #[error("HTML parsing error: {0}")]
    HtmlParseError(String),

    /// Reading or writing a CSV index failed.
    #[error("Index error: {0}")]
    IndexError(String),
}
