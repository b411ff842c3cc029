//! HTML to content tree conversion.

use ego_tree::iter::Edge;
use scraper::{Html, Node};
use slidespec_core::{ContentNode, ElementNode, Error, Result};
use std::io::Read;

/// Elements whose text is never visible on the page.
const INVISIBLE_TAGS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Parser for rendered page HTML.
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML from a reader.
    pub fn parse_reader<R: Read>(&self, mut reader: R, page: &str) -> Result<ContentNode> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        // Fetcher output is UTF-8; stray bytes are replaced, not fatal.
        let html = String::from_utf8_lossy(&bytes);
        self.parse(&html, page)
    }

    /// Parse an HTML document or fragment.
    ///
    /// `page` names the page in errors. Returns `MissingContent` for empty
    /// input or a document with no visible content.
    pub fn parse(&self, html: &str, page: &str) -> Result<ContentNode> {
        if html.trim().is_empty() {
            return Err(Error::MissingContent(format!("{}: empty HTML", page)));
        }

        let document = Html::parse_document(html);
        if !document.errors.is_empty() {
            log::debug!("{}: {} HTML parse errors (recovered)", page, document.errors.len());
        }

        let root = convert(&document)?;
        if root.is_empty() {
            return Err(Error::MissingContent(format!("{}: no visible content", page)));
        }
        Ok(root)
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert the parsed document into an owned tree rooted at `<html>`.
///
/// Uses the open/close edge walk so nesting depth never grows the call stack.
fn convert(document: &Html) -> Result<ContentNode> {
    let mut stack: Vec<ElementNode> = Vec::new();
    let mut finished: Option<ElementNode> = None;
    // Depth inside an invisible element; its whole subtree is skipped.
    let mut skip_depth = 0usize;

    for edge in document.root_element().traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(element) => {
                    if skip_depth > 0 || INVISIBLE_TAGS.contains(&element.name()) {
                        skip_depth += 1;
                        continue;
                    }
                    stack.push(ElementNode {
                        tag: element.name().to_lowercase(),
                        attributes: element
                            .attrs()
                            .map(|(k, v)| (k.to_string(), v.to_string()))
                            .collect(),
                        children: Vec::new(),
                    });
                }
                Node::Text(text) => {
                    if skip_depth > 0 {
                        continue;
                    }
                    let text: &str = text;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(ContentNode::text(text));
                    }
                }
                _ => {}
            },
            Edge::Close(node) => {
                if !matches!(node.value(), Node::Element(_)) {
                    continue;
                }
                if skip_depth > 0 {
                    skip_depth -= 1;
                    continue;
                }
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::HtmlParseError("unbalanced element tree".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(ContentNode::Element(element)),
                    None => finished = Some(element),
                }
            }
        }
    }

    finished
        .map(ContentNode::Element)
        .ok_or_else(|| Error::HtmlParseError("document has no root element".to_string()))
}
