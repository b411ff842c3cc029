//! Resolves image slots to downloaded files.
//!
//! Pass 1 binds by the fetcher's DOM-order index. Pass 2 hands the remaining
//! non-chrome files, sorted by name, to the remaining slots in order.

use crate::manifest::ImageManifest;
use crate::rules::ChromeRules;
use crate::types::Section;
use std::collections::HashSet;

/// Counts from one binding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindReport {
    /// Slots bound through the manifest index.
    pub exact: usize,
    /// Slots bound from the fallback queue.
    pub fallback: usize,
    /// Slots left without a file.
    pub unresolved: usize,
}

/// Two-pass image binder.
#[derive(Debug, Clone, Default)]
pub struct ImageBinder {
    chrome: ChromeRules,
}

impl ImageBinder {
    /// Create a binder with the default chrome markers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the chrome filename markers.
    pub fn with_chrome_rules(mut self, chrome: ChromeRules) -> Self {
        self.chrome = chrome;
        self
    }

    /// Bind every slot in `sections`.
    ///
    /// `manifest` is `None` when the page has no manifest, in which case only
    /// the fallback pass runs. `files` lists the page's downloaded files;
    /// when empty the manifest filenames stand in for it.
    pub fn bind(
        &self,
        sections: &mut [Section],
        manifest: Option<&ImageManifest>,
        files: &[String],
    ) -> BindReport {
        let mut report = BindReport::default();

        // Pass 1: exact index match.
        if let Some(manifest) = manifest {
            for slot in sections.iter_mut().flat_map(|s| s.images.iter_mut()) {
                let Some(idx) = slot.idx else {
                    continue;
                };
                if let Some(filename) = manifest.filename_for(idx) {
                    slot.filename = Some(filename.to_string());
                    report.exact += 1;
                }
            }
        }

        // Pass 2: order fallback over what is left.
        let used: HashSet<String> = sections
            .iter()
            .flat_map(|s| s.images.iter())
            .filter_map(|slot| slot.filename.clone())
            .collect();

        let mut queue: Vec<String> = if files.is_empty() {
            manifest.map(ImageManifest::filenames).unwrap_or_default()
        } else {
            files.to_vec()
        };
        queue.retain(|f| !self.chrome.is_chrome(f) && !used.contains(f));
        queue.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
        queue.dedup();

        let mut queue = queue.into_iter();
        for slot in sections
            .iter_mut()
            .flat_map(|s| s.images.iter_mut())
            .filter(|slot| slot.filename.is_none())
        {
            match queue.next() {
                Some(filename) => {
                    slot.filename = Some(filename);
                    report.fallback += 1;
                }
                None => report.unresolved += 1,
            }
        }

        log::debug!(
            "Bound images: {} exact, {} fallback, {} unresolved",
            report.exact,
            report.fallback,
            report.unresolved
        );

        report
    }
}
