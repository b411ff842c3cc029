//! Read-only content tree handed over by the page fetcher.
//!
//! All walks here use an explicit stack so arbitrarily deep pages never
//! exhaust the call stack. That includes dropping, cloning and comparing
//! trees. Iteration order is document (pre-)order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node of a rendered page: either an element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentNode {
    Element(ElementNode),
    Text { text: String },
}

/// Elements that count as content even without any text.
const CONTENT_BEARING_TAGS: &[&str] = &["img"];

/// An element with a lowercase tag name, attributes and ordered children.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ElementNode {
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    /// Create an element node with no attributes and no children.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element(ElementNode {
            tag: tag.into().to_lowercase(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        })
    }

    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Builder: add an attribute (no-op on text nodes).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Element(el) = &mut self {
            el.attributes.insert(name.into(), value.into());
        }
        self
    }

    /// Builder: append a child (no-op on text nodes).
    pub fn with_child(mut self, child: ContentNode) -> Self {
        if let Self::Element(el) = &mut self {
            el.children.push(child);
        }
        self
    }

    /// Builder: append a text child.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Self::text(text))
    }

    /// Tag name for elements, `None` for text.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element(el) => Some(el.tag.as_str()),
            Self::Text { .. } => None,
        }
    }

    /// Whether this is an element with one of the given tags.
    pub fn is_one_of(&self, tags: &[&str]) -> bool {
        self.tag().map(|t| tags.contains(&t)).unwrap_or(false)
    }

    /// Attribute value on an element.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Self::Element(el) => el.attributes.get(name).map(String::as_str),
            Self::Text { .. } => None,
        }
    }

    /// Direct children (empty for text).
    pub fn children(&self) -> &[ContentNode] {
        match self {
            Self::Element(el) => &el.children,
            Self::Text { .. } => &[],
        }
    }

    /// Whether the node has nothing visible: no non-whitespace text and no
    /// content-bearing element such as `img`, itself or below.
    pub fn is_empty(&self) -> bool {
        let hollow = |n: &ContentNode| match n {
            Self::Text { text } => text.trim().is_empty(),
            Self::Element(el) => !CONTENT_BEARING_TAGS.contains(&el.tag.as_str()),
        };
        hollow(self) && self.descendants().all(hollow)
    }

    /// All descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&ContentNode> = self.children().iter().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// Descendant elements with one of the given tags, in document order.
    pub fn find_all<'a>(&'a self, tags: &'a [&'a str]) -> impl Iterator<Item = &'a ContentNode> + 'a {
        self.descendants().filter(move |n| n.is_one_of(tags))
    }

    /// First descendant element with the given tag.
    pub fn find_first(&self, tag: &str) -> Option<&ContentNode> {
        self.descendants().find(|n| n.tag() == Some(tag))
    }

    /// Visible text: every descendant text run trimmed, empty runs skipped,
    /// joined with `separator`.
    pub fn text_content(&self, separator: &str) -> String {
        let runs: Vec<&str> = match self {
            Self::Text { text } => vec![text.trim()],
            Self::Element(_) => self
                .descendants()
                .filter_map(|n| match n {
                    Self::Text { text } => Some(text.trim()),
                    Self::Element(_) => None,
                })
                .collect(),
        };

        runs.into_iter()
            .filter(|r| !r.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl ElementNode {
    /// Copy of tag and attributes without children.
    fn shallow_clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            attributes: self.attributes.clone(),
            children: Vec::with_capacity(self.children.len()),
        }
    }
}

impl Drop for ElementNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let ContentNode::Element(mut el) = node {
                pending.append(&mut el.children);
            }
        }
    }
}

impl Clone for ElementNode {
    fn clone(&self) -> Self {
        // Frames are (source, copy under construction, next child index).
        let mut stack = vec![(self, self.shallow_clone(), 0usize)];
        let mut finished = None;

        while let Some((src, mut copy, next)) = stack.pop() {
            match src.children.get(next) {
                Some(ContentNode::Text { text }) => {
                    copy.children.push(ContentNode::text(text.clone()));
                    stack.push((src, copy, next + 1));
                }
                Some(ContentNode::Element(child)) => {
                    stack.push((src, copy, next + 1));
                    stack.push((child, child.shallow_clone(), 0));
                }
                None => match stack.last_mut() {
                    Some((_, parent, _)) => parent.children.push(ContentNode::Element(copy)),
                    None => finished = Some(copy),
                },
            }
        }

        finished.unwrap_or_default()
    }
}

impl PartialEq for ElementNode {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.tag != b.tag
                || a.attributes != b.attributes
                || a.children.len() != b.children.len()
            {
                return false;
            }
            for pair in a.children.iter().zip(&b.children) {
                match pair {
                    (ContentNode::Text { text: x }, ContentNode::Text { text: y }) => {
                        if x != y {
                            return false;
                        }
                    }
                    (ContentNode::Element(x), ContentNode::Element(y)) => stack.push((x, y)),
                    _ => return false,
                }
            }
        }
        true
    }
}

impl Eq for ElementNode {}

/// Pre-order iterator over a subtree, driven by an explicit stack.
pub struct Descendants<'a> {
    stack: Vec<&'a ContentNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a ContentNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContentNode {
        ContentNode::element("div")
            .with_child(ContentNode::element("h2").with_text(" Title "))
            .with_child(
                ContentNode::element("p")
                    .with_text("Hello ")
                    .with_child(ContentNode::element("b").with_text("bold"))
                    .with_text(" world"),
            )
    }

    #[test]
    fn test_descendants_preorder() {
        let tree = sample();
        let tags: Vec<&str> = tree.descendants().filter_map(|n| n.tag()).collect();
        assert_eq!(tags, vec!["h2", "p", "b"]);
    }

    #[test]
    fn test_text_content_strips_runs() {
        let tree = sample();
        assert_eq!(tree.text_content(" "), "Title Hello bold world");
        assert_eq!(tree.text_content(""), "TitleHelloboldworld");
    }

    #[test]
    fn test_find_first_and_attr() {
        let tree = ContentNode::element("div")
            .with_child(ContentNode::element("img").with_attr("alt", "A"));
        let img = tree.find_first("img").unwrap();
        assert_eq!(img.attr("alt"), Some("A"));
        assert_eq!(img.attr("src"), None);
        assert!(tree.find_first("p").is_none());
    }

    fn deep(levels: usize) -> ContentNode {
        let mut node = ContentNode::element("p").with_text("deep");
        for _ in 0..levels {
            node = ContentNode::element("div").with_child(node);
        }
        node
    }

    #[test]
    fn test_deep_tree_does_not_overflow() {
        let node = deep(200_000);
        assert_eq!(node.descendants().count(), 200_001);
        assert_eq!(node.text_content(" "), "deep");

        let copy = node.clone();
        assert!(copy == node);
        drop(copy);
        drop(node);
    }

    #[test]
    fn test_deep_trees_compare_by_content() {
        let a = deep(100_000);
        let b = deep(100_000).with_attr("class", "x");
        let c = deep(99_999);
        assert!(a != b);
        assert!(a != c);
    }

    #[test]
    fn test_clone_preserves_structure() {
        let tree = sample();
        let copy = tree.clone();
        assert_eq!(copy, tree);
        assert_eq!(copy.text_content(" "), "Title Hello bold world");
        let tags: Vec<&str> = copy.descendants().filter_map(|n| n.tag()).collect();
        assert_eq!(tags, vec!["h2", "p", "b"]);
    }

    #[test]
    fn test_is_empty() {
        assert!(ContentNode::element("div").with_text("   ").is_empty());
        assert!(ContentNode::element("html")
            .with_child(ContentNode::element("head"))
            .with_child(ContentNode::element("body").with_child(ContentNode::element("div").with_text(" ")))
            .is_empty());
        assert!(ContentNode::text(" \n ").is_empty());
        assert!(!ContentNode::element("div")
            .with_child(ContentNode::element("img"))
            .is_empty());
        assert!(!ContentNode::element("img").is_empty());
        assert!(!ContentNode::element("div")
            .with_child(ContentNode::element("span").with_text("x"))
            .is_empty());
    }
}
