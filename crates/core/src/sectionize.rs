//! Splits a content container into titled sections at h2/h3/h4 headings.

use crate::normalize::clean_line;
use crate::rules::BoilerplateRules;
use crate::tree::ContentNode;
use crate::types::{HeadingLevel, ImageSlot, Section};

/// Attribute the fetcher stamps on every image with its DOM-order index.
pub const DEFAULT_IMAGE_INDEX_ATTR: &str = "data-x-img-idx";

/// Title used when a heading has no text.
const FALLBACK_TITLE: &str = "Section";

/// Content tags that open an Overview section when no heading came first.
const CONTENT_TAGS: &[&str] = &["p", "ul", "ol", "table", "img"];

/// Walks a container in document order and groups its content into sections.
#[derive(Debug, Clone)]
pub struct Sectionizer {
    rules: BoilerplateRules,
    image_index_attr: String,
}

impl Default for Sectionizer {
    fn default() -> Self {
        Self {
            rules: BoilerplateRules::default(),
            image_index_attr: DEFAULT_IMAGE_INDEX_ATTR.to_string(),
        }
    }
}

impl Sectionizer {
    /// Create a sectionizer with the default boilerplate rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the boilerplate filter.
    pub fn with_rules(mut self, rules: BoilerplateRules) -> Self {
        self.rules = rules;
        self
    }

    /// Use a different attribute for image indices.
    pub fn with_image_index_attr(mut self, attr: impl Into<String>) -> Self {
        self.image_index_attr = attr.into();
        self
    }

    /// Split `container` into sections.
    ///
    /// Every descendant element is visited once in document order, nested
    /// ones included. Images attach to whatever section is open when they are
    /// reached. Sections that collected nothing are discarded.
    pub fn sectionize(&self, container: &ContentNode) -> Vec<Section> {
        let mut sections: Vec<Section> = Vec::new();

        for node in container.descendants() {
            let Some(tag) = node.tag() else {
                continue;
            };

            if let Some(level) = HeadingLevel::from_tag(tag) {
                let title = clean_line(&node.text_content(" "));
                let title = if title.is_empty() {
                    FALLBACK_TITLE.to_string()
                } else {
                    title
                };
                sections.push(Section::new(title, level));
                continue;
            }

            if !CONTENT_TAGS.contains(&tag) {
                continue;
            }

            if sections.is_empty() {
                sections.push(Section::overview());
            }
            let Some(current) = sections.last_mut() else {
                continue;
            };

            match tag {
                "p" => {
                    if let Some(text) = self.keep_text(node) {
                        current.paragraphs.push(text);
                    }
                }
                "ul" | "ol" => {
                    let items: Vec<String> = node
                        .children()
                        .iter()
                        .filter(|child| child.tag() == Some("li"))
                        .filter_map(|li| self.keep_text(li))
                        .collect();
                    if !items.is_empty() {
                        current.lists.push(items);
                    }
                }
                "table" => {
                    let rows = table_rows(node);
                    if !rows.is_empty() {
                        current.tables.push(rows);
                    }
                }
                "img" => current.images.push(self.image_slot(node)),
                _ => {}
            }
        }

        sections.retain(|s| !s.is_empty());
        sections
    }

    /// Cleaned text of a node, unless it is empty or boilerplate.
    fn keep_text(&self, node: &ContentNode) -> Option<String> {
        let text = clean_line(&node.text_content(" "));
        if self.rules.should_strip(&text) {
            None
        } else {
            Some(text)
        }
    }

    fn image_slot(&self, node: &ContentNode) -> ImageSlot {
        let idx = node
            .attr(&self.image_index_attr)
            .map(str::trim)
            .filter(|v| !v.is_empty() && v.chars().all(|c| c.is_ascii_digit()))
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&n| n > 0);
        let alt = node.attr("alt").unwrap_or_default().trim();
        ImageSlot::new(idx, alt)
    }
}

/// Every `tr` below the table as `| a | b |`, skipping rows with no text.
fn table_rows(table: &ContentNode) -> Vec<String> {
    table
        .find_all(&["tr"])
        .filter_map(|tr| {
            let cells: Vec<String> = tr
                .find_all(&["th", "td"])
                .map(|cell| clean_line(&cell.text_content(" ")))
                .collect();
            if cells.iter().any(|c| !c.is_empty()) {
                Some(format!("| {} |", cells.join(" | ")))
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(tag: &str, text: &str) -> ContentNode {
        ContentNode::element(tag).with_text(text)
    }

    fn img(idx: Option<&str>, alt: &str) -> ContentNode {
        let node = ContentNode::element("img").with_attr("alt", alt);
        match idx {
            Some(i) => node.with_attr(DEFAULT_IMAGE_INDEX_ATTR, i),
            None => node,
        }
    }

    fn list(tag: &str, items: &[&str]) -> ContentNode {
        items
            .iter()
            .fold(ContentNode::element(tag), |l, item| l.with_child(el("li", item)))
    }

    #[test]
    fn test_overview_for_leading_content() {
        let container = ContentNode::element("div")
            .with_child(el("p", "Intro text"))
            .with_child(el("h2", "Details"))
            .with_child(el("p", "More"));

        let sections = Sectionizer::new().sectionize(&container);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Overview");
        assert_eq!(sections[0].level, HeadingLevel::H2);
        assert_eq!(sections[0].paragraphs, vec!["Intro text"]);
        assert_eq!(sections[1].title, "Details");
        assert_eq!(sections[1].paragraphs, vec!["More"]);
    }

    #[test]
    fn test_no_overview_when_heading_first() {
        let container = ContentNode::element("div")
            .with_child(el("h3", "First"))
            .with_child(el("p", "Body"));

        let sections = Sectionizer::new().sectionize(&container);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "First");
        assert_eq!(sections[0].level, HeadingLevel::H3);
        assert!(sections.iter().all(|s| s.title != "Overview"));
    }

    #[test]
    fn test_empty_heading_gets_fallback_title() {
        let container = ContentNode::element("div")
            .with_child(el("h4", "   "))
            .with_child(el("p", "Body"));

        let sections = Sectionizer::new().sectionize(&container);
        assert_eq!(sections[0].title, "Section");
        assert_eq!(sections[0].level, HeadingLevel::H4);
    }

    #[test]
    fn test_empty_sections_are_discarded() {
        let container = ContentNode::element("div")
            .with_child(el("h2", "Empty"))
            .with_child(el("h2", "Share"))
            .with_child(el("p", "Share on Facebook"))
            .with_child(el("h2", "Kept"))
            .with_child(el("p", "Real content"));

        let sections = Sectionizer::new().sectionize(&container);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Kept"]);
    }

    #[test]
    fn test_lists_collect_direct_items_only() {
        let nested = ContentNode::element("li")
            .with_text("Parent")
            .with_child(list("ul", &["Child"]));
        let container = ContentNode::element("div").with_child(
            ContentNode::element("ul")
                .with_child(el("li", "  One  "))
                .with_child(el("li", "Yes"))
                .with_child(nested),
        );

        let sections = Sectionizer::new().sectionize(&container);
        assert_eq!(sections.len(), 1);
        // Outer list, then the nested list reached later in the walk.
        assert_eq!(
            sections[0].lists,
            vec![
                vec!["One".to_string(), "Parent Child".to_string()],
                vec!["Child".to_string()],
            ]
        );
    }

    #[test]
    fn test_table_rows_pipe_joined() {
        let table = ContentNode::element("table")
            .with_child(
                ContentNode::element("tr")
                    .with_child(el("th", "Key"))
                    .with_child(el("th", "Action")),
            )
            .with_child(
                ContentNode::element("tr")
                    .with_child(el("td", " "))
                    .with_child(el("td", "")),
            )
            .with_child(
                ContentNode::element("tr")
                    .with_child(el("td", "F1"))
                    .with_child(el("td", "Help")),
            );
        let container = ContentNode::element("div")
            .with_child(el("h2", "Keys"))
            .with_child(table);

        let sections = Sectionizer::new().sectionize(&container);
        assert_eq!(
            sections[0].tables,
            vec![vec!["| Key | Action |".to_string(), "| F1 | Help |".to_string()]]
        );
    }

    #[test]
    fn test_images_bind_to_open_section() {
        let container = ContentNode::element("div")
            .with_child(img(Some("1"), " Logo "))
            .with_child(el("h2", "A"))
            .with_child(el("p", "Text A"))
            .with_child(el("h2", "B"))
            .with_child(img(Some("2"), "Shot"))
            .with_child(img(Some("x3"), ""))
            .with_child(img(None, ""));

        let sections = Sectionizer::new().sectionize(&container);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].title, "Overview");
        assert_eq!(sections[0].images, vec![ImageSlot::new(Some(1), "Logo")]);
        assert!(sections[1].images.is_empty());
        assert_eq!(
            sections[2].images,
            vec![
                ImageSlot::new(Some(2), "Shot"),
                ImageSlot::new(None, ""),
                ImageSlot::new(None, ""),
            ]
        );
    }

    #[test]
    fn test_idx_values_strictly_increasing() {
        let mut container = ContentNode::element("div").with_child(el("h2", "Shots"));
        for i in 1..=5 {
            container = container.with_child(img(Some(&i.to_string()), ""));
        }

        let sections = Sectionizer::new().sectionize(&container);
        let idx: Vec<u32> = sections
            .iter()
            .flat_map(|s| s.images.iter().filter_map(|i| i.idx))
            .collect();
        assert_eq!(idx, vec![1, 2, 3, 4, 5]);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_zero_idx_is_none() {
        let container = ContentNode::element("div").with_child(img(Some("0"), ""));
        let sections = Sectionizer::new().sectionize(&container);
        assert_eq!(sections[0].images[0].idx, None);
    }

    #[test]
    fn test_custom_rules_and_attr() {
        let container = ContentNode::element("div")
            .with_child(el("p", "Share this"))
            .with_child(
                ContentNode::element("img").with_attr("data-idx", "7"),
            );

        let sections = Sectionizer::new()
            .with_rules(BoilerplateRules::empty())
            .with_image_index_attr("data-idx")
            .sectionize(&container);
        assert_eq!(sections[0].paragraphs, vec!["Share this"]);
        assert_eq!(sections[0].images[0].idx, Some(7));
    }

    #[test]
    fn test_sectionize_is_deterministic() {
        let container = ContentNode::element("div")
            .with_child(el("p", "A"))
            .with_child(list("ol", &["x", "y"]))
            .with_child(el("h2", "B"))
            .with_child(img(Some("1"), "i"));

        let sectionizer = Sectionizer::new();
        assert_eq!(
            sectionizer.sectionize(&container),
            sectionizer.sectionize(&container)
        );
    }
}
