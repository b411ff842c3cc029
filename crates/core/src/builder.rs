//! Composes sections into a page slide spec, and wires the per-page pipeline.

use crate::binder::ImageBinder;
use crate::bullets::BulletFlattener;
use crate::container::ContainerSelector;
use crate::manifest::ImageManifest;
use crate::normalize::clean_line;
use crate::rules::{ChromeRules, Rules};
use crate::sectionize::Sectionizer;
use crate::tree::ContentNode;
use crate::types::{PageSpec, Section, Slide, SlideImage};
use crate::{Error, Result};

/// Turns bound sections into slides.
#[derive(Debug, Clone, Default)]
pub struct PageSpecBuilder {
    flattener: BulletFlattener,
    chrome: ChromeRules,
}

impl PageSpecBuilder {
    /// Create a builder with default rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific bullet flattener.
    pub fn with_flattener(mut self, flattener: BulletFlattener) -> Self {
        self.flattener = flattener;
        self
    }

    /// Replace the chrome filename markers.
    pub fn with_chrome_rules(mut self, chrome: ChromeRules) -> Self {
        self.chrome = chrome;
        self
    }

    /// Build the page spec. Sections yielding no bullets and no images
    /// produce no slide; slide order follows section order.
    pub fn build(&self, page_title: &str, source_url: &str, sections: &[Section]) -> PageSpec {
        let mut spec = PageSpec::new(page_title, source_url);
        spec.slides = sections
            .iter()
            .filter_map(|section| self.build_slide(section, source_url))
            .collect();
        spec
    }

    fn build_slide(&self, section: &Section, source_url: &str) -> Option<Slide> {
        let bullets = self
            .flattener
            .flatten(&section.paragraphs, &section.lists, &section.tables);

        let images: Vec<SlideImage> = section
            .images
            .iter()
            .filter_map(|slot| {
                let filename = slot.filename.as_deref()?;
                if self.chrome.is_chrome(filename) {
                    return None;
                }
                Some(SlideImage {
                    path: format!("images/{}", filename),
                    caption: clean_line(&slot.alt),
                })
            })
            .collect();

        if bullets.is_empty() && images.is_empty() {
            return None;
        }

        Some(Slide {
            title: section.title.clone(),
            bullets,
            images,
            notes: if source_url.is_empty() {
                String::new()
            } else {
                format!("Source: {}", source_url)
            },
        })
    }
}

/// Everything the fetcher left behind for one page.
#[derive(Debug, Clone)]
pub struct PageInput<'a> {
    /// Rendered content tree of the page.
    pub tree: &'a ContentNode,
    /// Title override; when `None` the first `h1` or `fallback_title` is used.
    pub page_title: Option<&'a str>,
    /// Title when neither an override nor an `h1` exists (usually the folder name).
    pub fallback_title: &'a str,
    pub source_url: &'a str,
    pub manifest: Option<&'a ImageManifest>,
    /// Downloaded image filenames for the fallback queue.
    pub files: &'a [String],
}

/// Container selection, sectionizing, binding and slide building for a page.
///
/// Holds no per-page state; one instance can process pages concurrently.
#[derive(Debug, Clone, Default)]
pub struct PagePipeline {
    selector: ContainerSelector,
    sectionizer: Sectionizer,
    binder: ImageBinder,
    builder: PageSpecBuilder,
}

impl PagePipeline {
    /// Create a pipeline with the default rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline from a rule set.
    pub fn with_rules(rules: &Rules) -> Self {
        Self {
            selector: ContainerSelector::new(),
            sectionizer: Sectionizer::new().with_rules(rules.boilerplate.clone()),
            binder: ImageBinder::new().with_chrome_rules(rules.chrome.clone()),
            builder: PageSpecBuilder::new()
                .with_flattener(BulletFlattener::new().with_rules(rules.boilerplate.clone()))
                .with_chrome_rules(rules.chrome.clone()),
        }
    }

    /// Replace the sectionizer (e.g. to change the image index attribute).
    pub fn with_sectionizer(mut self, sectionizer: Sectionizer) -> Self {
        self.sectionizer = sectionizer;
        self
    }

    /// Run the whole per-page pipeline.
    pub fn process(&self, input: &PageInput<'_>) -> Result<PageSpec> {
        if input.tree.is_empty() {
            return Err(Error::MissingContent(input.fallback_title.to_string()));
        }

        let container = self.selector.select(input.tree);
        let mut sections = self.sectionizer.sectionize(container);
        self.binder.bind(&mut sections, input.manifest, input.files);

        let page_title = match input.page_title {
            Some(title) if !title.trim().is_empty() => clean_line(title),
            _ => page_title_from(input.tree).unwrap_or_else(|| input.fallback_title.to_string()),
        };

        let spec = self.builder.build(&page_title, input.source_url, &sections);
        log::debug!(
            "Page '{}': {} sections -> {} slides",
            page_title,
            sections.len(),
            spec.slides.len()
        );
        Ok(spec)
    }
}

/// Text of the first `h1` in the tree, if it has any.
pub fn page_title_from(tree: &ContentNode) -> Option<String> {
    tree.find_first("h1")
        .map(|h1| clean_line(&h1.text_content(" ")))
        .filter(|t| !t.is_empty())
}
