//! Flattens a section's lists, paragraphs and tables into slide bullets.

use crate::normalize::{clean_line, dedup_case_insensitive, split_sentences};
use crate::rules::BoilerplateRules;

/// Paragraphs longer than this (in characters) are split into sentences.
pub const DEFAULT_LONG_PARAGRAPH: usize = 300;

/// Orders and deduplicates bullet text.
///
/// List items come first, then paragraphs, then table rows.
#[derive(Debug, Clone)]
pub struct BulletFlattener {
    rules: BoilerplateRules,
    long_paragraph: usize,
}

impl Default for BulletFlattener {
    fn default() -> Self {
        Self {
            rules: BoilerplateRules::default(),
            long_paragraph: DEFAULT_LONG_PARAGRAPH,
        }
    }
}

impl BulletFlattener {
    /// Create a flattener with the default rules and split threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the boilerplate filter.
    pub fn with_rules(mut self, rules: BoilerplateRules) -> Self {
        self.rules = rules;
        self
    }

    /// Set the paragraph length above which sentences become separate bullets.
    pub fn with_long_paragraph(mut self, chars: usize) -> Self {
        self.long_paragraph = chars;
        self
    }

    /// Flatten section content into bullets.
    pub fn flatten(
        &self,
        paragraphs: &[String],
        lists: &[Vec<String>],
        tables: &[Vec<String>],
    ) -> Vec<String> {
        let mut bullets: Vec<String> = Vec::new();

        for item in lists.iter().flatten() {
            if !self.rules.should_strip(item) {
                bullets.push(item.clone());
            }
        }

        for paragraph in paragraphs {
            if self.rules.should_strip(paragraph) {
                continue;
            }
            if paragraph.chars().count() > self.long_paragraph {
                bullets.extend(split_sentences(paragraph));
            } else {
                bullets.push(paragraph.clone());
            }
        }

        for row in tables.iter().flatten() {
            let row = clean_line(row);
            if !self.rules.should_strip(&row) {
                bullets.push(row);
            }
        }

        dedup_case_insensitive(bullets)
    }
}
