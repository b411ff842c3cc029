//! Picks the densest sub-tree of a rendered page as its main content.

use crate::tree::ContentNode;

const CANDIDATE_TAGS: &[&str] = &["article", "main", "section", "div"];
const DENSE_TAGS: &[&str] = &["p", "li"];

/// Weight of one paragraph or list item relative to one character of text.
const DENSE_WEIGHT: usize = 10;

/// Density-scoring container selector.
///
/// Score = `10 × (p + li descendants) + visible text length`. The first
/// candidate in document order wins ties.
#[derive(Debug, Clone)]
pub struct ContainerSelector {
    candidate_tags: Vec<String>,
    dense_tags: Vec<String>,
}

impl Default for ContainerSelector {
    fn default() -> Self {
        Self {
            candidate_tags: CANDIDATE_TAGS.iter().map(|s| s.to_string()).collect(),
            dense_tags: DENSE_TAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Per-node tallies gathered in one pre-order pass.
struct Tally<'a> {
    node: &'a ContentNode,
    parent: Option<usize>,
    own_dense: usize,
    dense: usize,
    text_len: usize,
}

impl ContainerSelector {
    /// Create a selector with the default candidate tags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tags considered block-like containers.
    pub fn with_candidate_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidate_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Return the highest-scoring candidate below `root`, or `root` itself
    /// when there is none.
    pub fn select<'a>(&self, root: &'a ContentNode) -> &'a ContentNode {
        let tallies = self.tally(root);

        let mut best: Option<(usize, usize)> = None;
        for (i, t) in tallies.iter().enumerate().skip(1) {
            if !self.is_candidate(t.node) {
                continue;
            }
            let score = DENSE_WEIGHT * (t.dense - t.own_dense) + t.text_len;
            // Strict comparison keeps the earliest node among equal scores.
            if best.map(|(_, s)| score > s).unwrap_or(true) {
                best = Some((i, score));
            }
        }

        match best {
            Some((i, score)) => {
                log::debug!(
                    "Selected <{}> container with score {}",
                    tallies[i].node.tag().unwrap_or("?"),
                    score
                );
                tallies[i].node
            }
            None => root,
        }
    }

    /// Score of a single node, computed directly.
    pub fn score(&self, node: &ContentNode) -> usize {
        let dense = node
            .descendants()
            .filter(|n| self.is_dense(n))
            .count();
        DENSE_WEIGHT * dense + node.text_content("").chars().count()
    }

    fn is_candidate(&self, node: &ContentNode) -> bool {
        node.tag()
            .map(|t| self.candidate_tags.iter().any(|c| c == t))
            .unwrap_or(false)
    }

    fn is_dense(&self, node: &ContentNode) -> bool {
        node.tag()
            .map(|t| self.dense_tags.iter().any(|c| c == t))
            .unwrap_or(false)
    }

    /// Flatten the tree in pre-order and fold subtree totals bottom-up.
    fn tally<'a>(&self, root: &'a ContentNode) -> Vec<Tally<'a>> {
        let mut tallies: Vec<Tally<'a>> = Vec::new();
        let mut stack: Vec<(&'a ContentNode, Option<usize>)> = vec![(root, None)];

        while let Some((node, parent)) = stack.pop() {
            let own_dense = usize::from(self.is_dense(node));
            let text_len = match node {
                ContentNode::Text { text } => text.trim().chars().count(),
                ContentNode::Element(_) => 0,
            };
            let index = tallies.len();
            tallies.push(Tally {
                node,
                parent,
                own_dense,
                dense: own_dense,
                text_len,
            });
            for child in node.children().iter().rev() {
                stack.push((child, Some(index)));
            }
        }

        // Children always come after their parent in pre-order.
        for i in (1..tallies.len()).rev() {
            if let Some(p) = tallies[i].parent {
                let (dense, text_len) = (tallies[i].dense, tallies[i].text_len);
                tallies[p].dense += dense;
                tallies[p].text_len += text_len;
            }
        }

        tallies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> ContentNode {
        ContentNode::element("p").with_text(text)
    }

    #[test]
    fn test_picks_densest_container() {
        let nav = ContentNode::element("div").with_text("Home Products Support Contact");
        let article = ContentNode::element("article")
            .with_child(para("One"))
            .with_child(para("Two"))
            .with_child(para("Three"));
        let root = ContentNode::element("body").with_child(nav).with_child(article.clone());

        let selector = ContainerSelector::new();
        assert_eq!(selector.select(&root), &article);
    }

    #[test]
    fn test_defaults_to_root_without_candidates() {
        let root = ContentNode::element("body").with_child(para("Lonely"));
        let selector = ContainerSelector::new();
        assert_eq!(selector.select(&root), &root);
    }

    #[test]
    fn test_tie_goes_to_first_in_document_order() {
        let first = ContentNode::element("section").with_child(para("abc"));
        let second = ContentNode::element("div").with_child(para("xyz"));
        let root = ContentNode::element("body")
            .with_child(first.clone().with_attr("id", "first"))
            .with_child(second.with_attr("id", "second"));

        let selector = ContainerSelector::new();
        assert_eq!(selector.select(&root).attr("id"), Some("first"));
    }

    #[test]
    fn test_outer_wrapper_outscores_inner() {
        // A wrapper scores at least as high as anything inside it, and it
        // comes first in document order.
        let inner = ContentNode::element("div")
            .with_attr("id", "inner")
            .with_child(para("Body text"));
        let outer = ContentNode::element("main")
            .with_attr("id", "outer")
            .with_child(inner);
        let root = ContentNode::element("body").with_child(outer);

        assert_eq!(ContainerSelector::new().select(&root).attr("id"), Some("outer"));
    }

    #[test]
    fn test_score_matches_tally() {
        let node = ContentNode::element("div")
            .with_child(ContentNode::element("ul").with_child(
                ContentNode::element("li").with_text(" item "),
            ))
            .with_child(para("hello"));
        // 2 dense descendants, "item" + "hello" = 9 chars.
        assert_eq!(ContainerSelector::new().score(&node), 29);
    }

    #[test]
    fn test_custom_candidate_tags() {
        let aside = ContentNode::element("aside")
            .with_attr("id", "aside")
            .with_child(para("Text"));
        let root = ContentNode::element("body").with_child(aside);
        let selector = ContainerSelector::new().with_candidate_tags(["aside"]);
        assert_eq!(selector.select(&root).attr("id"), Some("aside"));
    }
}
