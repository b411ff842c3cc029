//! Corpus-level cleaning: cross-page dedup followed by Overview collapse.
//!
//! Both counting passes observe the complete, untouched corpus before any
//! page is filtered.

use crate::dedupe::DuplicateIndex;
use crate::normalize::TextNormalizer;
use crate::overview::BoilerplateCore;
use crate::types::{IndexRow, PageSpec};

/// A page spec together with the name of the folder it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusPage {
    pub name: String,
    pub spec: PageSpec,
}

/// Per-page numbers from a cleaning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCleanStats {
    pub name: String,
    pub slides_before: usize,
    pub slides_after: usize,
    pub duplicates_removed: usize,
    pub overview_bullets_removed: usize,
    pub overviews_dropped: usize,
}

/// Summary of a cleaning run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Distinct display keys found on two or more slides.
    pub duplicate_keys: usize,
    /// Size of the Overview boilerplate core.
    pub boilerplate_core: usize,
    pub pages: Vec<PageCleanStats>,
}

/// Every page processed together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    pages: Vec<CorpusPage>,
}

impl Corpus {
    /// Build a corpus; pages are kept in case-insensitive name order.
    pub fn new(pages: Vec<CorpusPage>) -> Self {
        let mut pages = pages;
        pages.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        Self { pages }
    }

    pub fn pages(&self) -> &[CorpusPage] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<CorpusPage> {
        self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Remove cross-page duplicates and Overview boilerplate.
    pub fn clean(&mut self) -> CleanReport {
        self.clean_with(TextNormalizer::new())
    }

    /// Clean using a specific normalizer.
    pub fn clean_with(&mut self, normalizer: TextNormalizer) -> CleanReport {
        // Pass A: both tallies read the untouched corpus.
        let duplicates =
            DuplicateIndex::build_with(self.pages.iter().map(|p| &p.spec), normalizer.clone());
        let core = BoilerplateCore::compute_with(self.pages.iter().map(|p| &p.spec), normalizer);

        // Pass B: filter each page against the frozen tallies.
        let pages = self
            .pages
            .iter_mut()
            .map(|page| {
                let slides_before = page.spec.slides.len();
                let duplicates_removed = duplicates.remove_from(&mut page.spec);
                let outcome = core.collapse(&mut page.spec);

                let stats = PageCleanStats {
                    name: page.name.clone(),
                    slides_before,
                    slides_after: page.spec.slides.len(),
                    duplicates_removed,
                    overview_bullets_removed: outcome.bullets_removed,
                    overviews_dropped: outcome.slides_dropped,
                };
                log::debug!(
                    "{}: {} -> {} slides (overview core={}, dup-keys={})",
                    stats.name,
                    stats.slides_before,
                    stats.slides_after,
                    core.len(),
                    duplicates.len()
                );
                stats
            })
            .collect();

        CleanReport {
            duplicate_keys: duplicates.len(),
            boilerplate_core: core.len(),
            pages,
        }
    }

    /// Index rows in page order. `locate` maps a page name to its folder and
    /// slide spec locations.
    pub fn index_rows<F>(&self, mut locate: F) -> Vec<IndexRow>
    where
        F: FnMut(&str) -> (String, String),
    {
        self.pages
            .iter()
            .map(|page| {
                let (folder, slidespec_location) = locate(&page.name);
                IndexRow {
                    folder,
                    page_title: page.spec.page_title.clone(),
                    source_url: page.spec.source_url.clone(),
                    slidespec_location,
                    num_slides: page.spec.slides.len(),
                }
            })
            .collect()
    }
}
