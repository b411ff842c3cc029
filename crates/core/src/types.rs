//! Domain types for sections, slides and page slide specs.

use serde::{Deserialize, Serialize};

/// Heading level that opens a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    /// Detect a section heading from an element tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "h2" => Some(Self::H2),
            "h3" => Some(Self::H3),
            "h4" => Some(Self::H4),
            _ => None,
        }
    }
}

/// An image reference discovered while sectionizing, in DOM order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSlot {
    /// DOM-order index stamped by the fetcher, if present and numeric.
    pub idx: Option<u32>,

    /// Alt text, trimmed.
    pub alt: String,

    /// Downloaded file bound to this slot. `None` until binding succeeds.
    pub filename: Option<String>,
}

impl ImageSlot {
    /// Create an unresolved slot.
    pub fn new(idx: Option<u32>, alt: impl Into<String>) -> Self {
        Self {
            idx,
            alt: alt.into(),
            filename: None,
        }
    }
}

/// A titled run of page content between two headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub level: HeadingLevel,
    pub paragraphs: Vec<String>,
    pub lists: Vec<Vec<String>>,
    pub tables: Vec<Vec<String>>,
    pub images: Vec<ImageSlot>,
}

impl Section {
    /// Title of the section synthesized for content before the first heading.
    pub const OVERVIEW_TITLE: &'static str = "Overview";

    /// Create an empty section.
    pub fn new(title: impl Into<String>, level: HeadingLevel) -> Self {
        Self {
            title: title.into(),
            level,
            paragraphs: Vec::new(),
            lists: Vec::new(),
            tables: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Create the implicit Overview section.
    pub fn overview() -> Self {
        Self::new(Self::OVERVIEW_TITLE, HeadingLevel::H2)
    }

    /// True when nothing was collected into this section.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
            && self.lists.is_empty()
            && self.tables.is_empty()
            && self.images.is_empty()
    }
}

/// A picture placed on a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideImage {
    /// Path relative to the page directory, e.g. `images/img_02.png`.
    pub path: String,

    /// Caption taken from the image's alt text.
    #[serde(default)]
    pub caption: String,
}

/// One slide, derived from one non-empty section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub bullets: Vec<String>,

    #[serde(default)]
    pub images: Vec<SlideImage>,

    /// Speaker notes, `Source: <url>` or empty.
    #[serde(default)]
    pub notes: String,
}

impl Slide {
    /// Whether any image carries a non-empty path.
    pub fn has_resolved_image(&self) -> bool {
        self.images.iter().any(|img| !img.path.is_empty())
    }
}

/// The slide specification for one scraped page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    #[serde(default)]
    pub page_title: String,

    #[serde(default)]
    pub source_url: String,

    #[serde(default)]
    pub slides: Vec<Slide>,
}

impl PageSpec {
    /// Create a page spec without slides.
    pub fn new(page_title: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            page_title: page_title.into(),
            source_url: source_url.into(),
            slides: Vec::new(),
        }
    }

    /// Parse a previously written spec.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::Error::MalformedSpec(e.to_string()))
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| crate::Error::MalformedSpec(e.to_string()))
    }
}

/// One row of the corpus index, one per page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRow {
    pub folder: String,
    pub page_title: String,
    pub source_url: String,
    /// Location of the page's `slidespec.json`.
    #[serde(rename = "slidespec")]
    pub slidespec_location: String,
    pub num_slides: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_from_tag() {
        assert_eq!(HeadingLevel::from_tag("h2"), Some(HeadingLevel::H2));
        assert_eq!(HeadingLevel::from_tag("H4"), Some(HeadingLevel::H4));
        assert_eq!(HeadingLevel::from_tag("h1"), None);
        assert_eq!(HeadingLevel::from_tag("h5"), None);
    }

    #[test]
    fn test_section_is_empty() {
        let mut section = Section::overview();
        assert!(section.is_empty());
        section.images.push(ImageSlot::new(None, ""));
        assert!(!section.is_empty());
    }

    #[test]
    fn test_page_spec_json_shape() {
        let mut spec = PageSpec::new("Title", "https://example.com/a");
        spec.slides.push(Slide {
            title: "Intro".to_string(),
            bullets: vec!["Überblick".to_string()],
            images: vec![SlideImage {
                path: "images/img_01.png".to_string(),
                caption: "Ribbon".to_string(),
            }],
            notes: "Source: https://example.com/a".to_string(),
        });

        let json = spec.to_json_pretty().unwrap();
        assert!(json.contains("\"page_title\": \"Title\""));
        assert!(json.contains("Überblick"));
        assert_eq!(PageSpec::from_json(&json).unwrap(), spec);
    }

    #[test]
    fn test_page_spec_tolerates_missing_fields() {
        let spec = PageSpec::from_json(r#"{"slides":[{"title":"A"}]}"#).unwrap();
        assert_eq!(spec.page_title, "");
        assert_eq!(spec.slides[0].bullets.len(), 0);
    }

    #[test]
    fn test_malformed_spec() {
        let err = PageSpec::from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::Error::MalformedSpec(_)));
    }
}
