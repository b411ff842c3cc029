//! Removes non-Overview slides whose displayed text repeats across the corpus.
//!
//! Counting happens once over the whole corpus ([`DuplicateIndex::build`]);
//! the resulting index is read-only while pages are filtered. Every
//! occurrence of a repeated key is removed, so page order never matters.

use crate::normalize::TextNormalizer;
use crate::types::{PageSpec, Slide};
use std::collections::{HashMap, HashSet};

/// Separator between title and bullets in a display key.
pub const KEY_SEPARATOR: &str = " || ";

/// Normalized title of the synthesized Overview slide.
const OVERVIEW_KEY: &str = "overview";

/// Whether a slide is a page's Overview slide.
pub fn is_overview(slide: &Slide, normalizer: &TextNormalizer) -> bool {
    normalizer.normalize(&slide.title) == OVERVIEW_KEY
}

/// Normalized title plus normalized non-empty bullets, joined by
/// [`KEY_SEPARATOR`]. `None` when both title and bullets are empty.
pub fn display_key(slide: &Slide, normalizer: &TextNormalizer) -> Option<String> {
    let title = normalizer.normalize(&slide.title);
    let bullets = normalizer.normalize_all(&slide.bullets);

    if title.is_empty() && bullets.is_empty() {
        return None;
    }

    let mut parts = Vec::with_capacity(bullets.len() + 1);
    parts.push(title);
    parts.extend(bullets);
    Some(parts.join(KEY_SEPARATOR))
}

/// Keys occurring on two or more non-Overview slides corpus-wide.
#[derive(Debug, Clone, Default)]
pub struct DuplicateIndex {
    normalizer: TextNormalizer,
    duplicates: HashSet<String>,
}

impl DuplicateIndex {
    /// Count display keys over every slide of every page.
    pub fn build(pages: &[PageSpec]) -> Self {
        Self::build_with(pages.iter(), TextNormalizer::new())
    }

    /// Count display keys using a specific normalizer.
    pub fn build_with<'a, I>(pages: I, normalizer: TextNormalizer) -> Self
    where
        I: IntoIterator<Item = &'a PageSpec>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();

        for slide in pages.into_iter().flat_map(|p| p.slides.iter()) {
            if is_overview(slide, &normalizer) {
                continue;
            }
            if let Some(key) = display_key(slide, &normalizer) {
                *counts.entry(key).or_insert(0) += 1;
            }
        }

        let duplicates = counts
            .into_iter()
            .filter(|(_, n)| *n >= 2)
            .map(|(key, _)| key)
            .collect();

        Self {
            normalizer,
            duplicates,
        }
    }

    /// Number of distinct duplicated keys.
    pub fn len(&self) -> usize {
        self.duplicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }

    /// Whether a slide carries a duplicated key. Overview slides never do.
    pub fn is_duplicate(&self, slide: &Slide) -> bool {
        if is_overview(slide, &self.normalizer) {
            return false;
        }
        display_key(slide, &self.normalizer)
            .map(|key| self.duplicates.contains(&key))
            .unwrap_or(false)
    }

    /// Drop every duplicated slide from a page. Returns how many were removed.
    pub fn remove_from(&self, page: &mut PageSpec) -> usize {
        let before = page.slides.len();
        page.slides.retain(|slide| !self.is_duplicate(slide));
        before - page.slides.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_display_key() {
        let normalizer = TextNormalizer::new();
        let s = slide(" New  Ribbon Icon", &["Icon relocated https://x.y/z", "  "]);
        assert_eq!(
            display_key(&s, &normalizer).as_deref(),
            Some("new ribbon icon || icon relocated")
        );
        assert_eq!(display_key(&slide("", &[]), &normalizer), None);
        assert_eq!(display_key(&slide("", &[" "]), &normalizer), None);
        assert_eq!(
            display_key(&slide("", &["Only"]), &normalizer).as_deref(),
            Some(" || only")
        );
    }

    #[test]
    fn test_all_occurrences_removed() {
        let dup = slide("New Ribbon Icon", &["Icon relocated to Quick Access"]);
        let mut pages = vec![
            page(vec![slide("Unique A", &["a"]), dup.clone()]),
            page(vec![dup.clone(), slide("Unique B", &["b"])]),
        ];

        let index = DuplicateIndex::build(&pages);
        assert_eq!(index.len(), 1);

        let removed: usize = pages.iter_mut().map(|p| index.remove_from(p)).sum();
        assert_eq!(removed, 2);
        assert_eq!(pages[0].slides, vec![slide("Unique A", &["a"])]);
        assert_eq!(pages[1].slides, vec![slide("Unique B", &["b"])]);
    }

    #[test]
    fn test_duplicates_on_same_page_count() {
        let dup = slide("Tip", &["Press F1"]);
        let mut pages = vec![page(vec![dup.clone(), dup.clone(), slide("Other", &[])])];

        let index = DuplicateIndex::build(&pages);
        index.remove_from(&mut pages[0]);
        assert_eq!(pages[0].slides, vec![slide("Other", &[])]);
    }

    #[test]
    fn test_match_ignores_case_urls_and_spacing() {
        let pages = vec![
            page(vec![slide("Ribbon", &["See https://a.example/x  now"])]),
            page(vec![slide("RIBBON", &["see   now"])]),
        ];
        assert_eq!(DuplicateIndex::build(&pages).len(), 1);
    }

    #[test]
    fn test_overview_slides_excluded() {
        let overview = slide("Overview", &["Learn more"]);
        let mut pages = vec![page(vec![overview.clone()]), page(vec![overview.clone()])];

        let index = DuplicateIndex::build(&pages);
        assert!(index.is_empty());
        assert_eq!(index.remove_from(&mut pages[0]), 0);
        assert_eq!(pages[0].slides.len(), 1);
    }

    #[test]
    fn test_keyless_slides_never_removed() {
        let blank = slide("", &[]);
        let mut pages = vec![page(vec![blank.clone()]), page(vec![blank.clone()])];
        let index = DuplicateIndex::build(&pages);
        assert_eq!(index.remove_from(&mut pages[1]), 0);
    }

    #[test]
    fn test_result_independent_of_page_order() {
        let dup = slide("Same", &["x"]);
        let a = page(vec![dup.clone(), slide("A", &["1"])]);
        let b = page(vec![slide("B", &["2"]), dup.clone()]);

        let mut forward = vec![a.clone(), b.clone()];
        let mut backward = vec![b, a];
        let fi = DuplicateIndex::build(&forward);
        let bi = DuplicateIndex::build(&backward);
        forward.iter_mut().for_each(|p| {
            fi.remove_from(p);
        });
        backward.iter_mut().for_each(|p| {
            bi.remove_from(p);
        });

        assert_eq!(forward[0], backward[1]);
        assert_eq!(forward[1], backward[0]);
    }
}
