//! Markdown outline output for reviewing slide specs.
//!
//! Renders one `##` block per slide with bullets as a list, images as
//! Markdown image links and notes as a trailing quote.

use crate::types::{PageSpec, Slide};

/// Formatter for reviewable Markdown outlines.
#[derive(Debug, Clone)]
pub struct OutlineFormatter {
    /// Whether image links are emitted.
    include_images: bool,
    /// Whether speaker notes are emitted.
    include_notes: bool,
}

impl Default for OutlineFormatter {
    fn default() -> Self {
        Self {
            include_images: true,
            include_notes: false,
        }
    }
}

impl OutlineFormatter {
    /// Create a formatter that includes images but not notes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether image links are emitted.
    pub fn with_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }

    /// Set whether speaker notes are emitted.
    pub fn with_notes(mut self, include: bool) -> Self {
        self.include_notes = include;
        self
    }

    /// Format a whole page, with its title as the `#` heading.
    ///
    /// # Example output
    /// ```text
    /// # What's New
    ///
    /// ## Ribbon
    ///
    /// - Icon relocated to Quick Access
    ///
    /// ![The ribbon](images/img_02.png)
    /// ```
    pub fn format(&self, spec: &PageSpec) -> String {
        let mut blocks = vec![format!("# {}", spec.page_title)];
        blocks.extend(spec.slides.iter().map(|slide| self.format_slide(slide)));
        format!("{}\n", blocks.join("\n\n"))
    }

    /// Format a single slide.
    pub fn format_slide(&self, slide: &Slide) -> String {
        let mut parts = vec![format!("## {}", slide.title)];

        if !slide.bullets.is_empty() {
            parts.push(
                slide
                    .bullets
                    .iter()
                    .map(|b| format!("- {}", b))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }

        if self.include_images && !slide.images.is_empty() {
            parts.push(
                slide
                    .images
                    .iter()
                    .map(|img| format!("![{}]({})", img.caption, img.path))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }

        if self.include_notes && !slide.notes.is_empty() {
            parts.push(format!("> {}", slide.notes));
        }

        parts.join("\n\n")
    }
}
