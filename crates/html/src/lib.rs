//! HTML parser backend for slide spec generation.
//!
//! Parses rendered page HTML into the [`slidespec_core::ContentNode`] tree the
//! sectionizer walks.

pub mod parser;

pub use parser::HtmlParser;
