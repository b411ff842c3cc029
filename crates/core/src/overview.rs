//! Strips boilerplate shared by every page's Overview slide.
//!
//! The boilerplate core is the intersection of all Overview bullet sets in
//! the corpus. It is computed once and only read while pages are filtered.

use crate::dedupe::is_overview;
use crate::normalize::TextNormalizer;
use crate::types::PageSpec;
use std::collections::HashSet;

/// Titles an emptied Overview may carry and still be dropped.
const DROPPABLE_TITLES: &[&str] = &["", "overview"];

/// Outcome of collapsing one page's Overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollapseOutcome {
    /// Bullets removed as boilerplate.
    pub bullets_removed: usize,
    /// Overview slides dropped after becoming empty.
    pub slides_dropped: usize,
}

/// Normalized bullets present in every Overview slide of the corpus.
#[derive(Debug, Clone, Default)]
pub struct BoilerplateCore {
    normalizer: TextNormalizer,
    core: HashSet<String>,
}

impl BoilerplateCore {
    /// Intersect the Overview bullet sets of all pages.
    pub fn compute(pages: &[PageSpec]) -> Self {
        Self::compute_with(pages.iter(), TextNormalizer::new())
    }

    /// Intersect using a specific normalizer.
    pub fn compute_with<'a, I>(pages: I, normalizer: TextNormalizer) -> Self
    where
        I: IntoIterator<Item = &'a PageSpec>,
    {
        let mut overview_sets = pages
            .into_iter()
            .flat_map(|p| p.slides.iter())
            .filter(|slide| is_overview(slide, &normalizer))
            .map(|slide| {
                normalizer
                    .normalize_all(&slide.bullets)
                    .into_iter()
                    .collect::<HashSet<String>>()
            });

        let mut core = overview_sets.next().unwrap_or_default();
        for set in overview_sets {
            if core.is_empty() {
                break;
            }
            core.retain(|b| set.contains(b));
        }

        Self { normalizer, core }
    }

    /// Number of boilerplate bullets.
    pub fn len(&self) -> usize {
        self.core.len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    /// Whether a normalized bullet belongs to the core.
    pub fn contains(&self, normalized: &str) -> bool {
        self.core.contains(normalized)
    }

    /// Remove boilerplate bullets from the page's Overview slides and drop
    /// the ones left with nothing to show. Other slides are untouched.
    ///
    /// An emptied Overview survives if it still has a resolved image, or if
    /// its title normalizes to something other than empty/"overview".
    pub fn collapse(&self, page: &mut PageSpec) -> CollapseOutcome {
        let mut outcome = CollapseOutcome::default();

        page.slides.retain_mut(|slide| {
            if !is_overview(slide, &self.normalizer) {
                return true;
            }

            let before = slide.bullets.len();
            slide
                .bullets
                .retain(|b| !self.core.contains(&self.normalizer.normalize(b)));
            outcome.bullets_removed += before - slide.bullets.len();

            let title = self.normalizer.normalize(&slide.title);
            let keep = !slide.bullets.is_empty()
                || slide.has_resolved_image()
                || !DROPPABLE_TITLES.contains(&title.as_str());
            if !keep {
                outcome.slides_dropped += 1;
            }
            keep
        });

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Slide, SlideImage};

    fn slide(title: &str, bullets: &[&str]) -> Slide {
        Slide {
            title: title.to_string(),
            bullets: bullets.iter().map(|s| s.to_string()).collect(),
            images: Vec::new(),
            notes: String::new(),
        }
    }

    fn page(slides: Vec<Slide>) -> PageSpec {
        let mut spec = PageSpec::new("P", "");
        spec.slides = slides;
        spec
    }

    #[test]
    fn test_core_is_intersection() {
        let pages = vec![
            page(vec![slide("Overview", &["Learn more at the Help Center", "Feature A"])]),
            page(vec![slide("Overview", &["learn more at the help center", "Feature B"])]),
            page(vec![slide("Details", &["Feature A"])]),
        ];

        let core = BoilerplateCore::compute(&pages);
        assert_eq!(core.len(), 1);
        assert!(core.contains("learn more at the help center"));
    }

    #[test]
    fn test_no_overviews_gives_empty_core() {
        let pages = vec![page(vec![slide("Intro", &["x"])])];
        assert!(BoilerplateCore::compute(&pages).is_empty());
        assert!(BoilerplateCore::compute(&[]).is_empty());
    }

    #[test]
    fn test_single_overview_core_is_its_own_set() {
        let mut pages = vec![page(vec![slide("Overview", &["A", "B"]), slide("Other", &["A"])])];

        let core = BoilerplateCore::compute(&pages);
        assert_eq!(core.len(), 2);

        let outcome = core.collapse(&mut pages[0]);
        assert_eq!(outcome.bullets_removed, 2);
        assert_eq!(outcome.slides_dropped, 1);
        assert_eq!(pages[0].slides, vec![slide("Other", &["A"])]);
    }

    #[test]
    fn test_emptied_overview_kept_with_image() {
        let mut with_image = slide("Overview", &["Common"]);
        with_image.images.push(SlideImage {
            path: "images/img_01.png".to_string(),
            caption: String::new(),
        });
        let mut pages = vec![page(vec![with_image]), page(vec![slide("Overview", &["Common"])])];

        let core = BoilerplateCore::compute(&pages);
        let first = core.collapse(&mut pages[0]);
        let second = core.collapse(&mut pages[1]);

        assert_eq!(first.slides_dropped, 0);
        assert!(pages[0].slides[0].bullets.is_empty());
        assert_eq!(second.slides_dropped, 1);
        assert!(pages[1].slides.is_empty());
    }

    #[test]
    fn test_empty_image_path_does_not_keep_overview() {
        let mut blank_image = slide("Overview", &["Common"]);
        blank_image.images.push(SlideImage {
            path: String::new(),
            caption: "x".to_string(),
        });
        let mut pages = vec![page(vec![blank_image]), page(vec![slide("Overview", &["Common"])])];

        let core = BoilerplateCore::compute(&pages);
        assert_eq!(core.collapse(&mut pages[0]).slides_dropped, 1);
    }

    #[test]
    fn test_non_overview_slides_untouched() {
        let mut pages = vec![
            page(vec![slide("Overview", &["Common"]), slide("Steps", &["Common"])]),
            page(vec![slide("Overview", &["Common", "Own"])]),
        ];

        let core = BoilerplateCore::compute(&pages);
        core.collapse(&mut pages[0]);
        core.collapse(&mut pages[1]);

        assert_eq!(pages[0].slides, vec![slide("Steps", &["Common"])]);
        assert_eq!(pages[1].slides, vec![slide("Overview", &["Own"])]);
    }

    #[test]
    fn test_bullet_unique_to_one_page_survives() {
        let mut pages = vec![
            page(vec![slide("OVERVIEW", &["Shared", "Only here"])]),
            page(vec![slide("overview ", &["shared"])]),
        ];

        let core = BoilerplateCore::compute(&pages);
        core.collapse(&mut pages[0]);
        assert_eq!(pages[0].slides[0].bullets, vec!["Only here"]);
    }
}
