//! Image manifest written by the page fetcher (`images_map.json`).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One downloaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageManifestEntry {
    /// DOM-order index matching the image node's index attribute.
    pub idx: u32,
    pub filename: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

/// Lenient on-disk shape; unusable entries are dropped while loading.
#[derive(Deserialize)]
struct RawEntry {
    idx: Option<serde_json::Value>,
    filename: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    alt: Option<String>,
}

/// The images successfully downloaded for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageManifest {
    pub entries: Vec<ImageManifestEntry>,
}

impl ImageManifest {
    /// Wrap already-validated entries.
    pub fn new(entries: Vec<ImageManifestEntry>) -> Self {
        Self { entries }
    }

    /// Parse `images_map.json`.
    ///
    /// Entries without a positive `idx` or without a filename are skipped.
    /// `idx` may be a number or a numeric string.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawEntry> =
            serde_json::from_str(json).map_err(|e| Error::MalformedManifest(e.to_string()))?;

        let entries = raw
            .into_iter()
            .filter_map(|entry| {
                let idx = entry.idx.as_ref().and_then(parse_idx)?;
                let filename = entry.filename.filter(|f| !f.is_empty())?;
                Some(ImageManifestEntry {
                    idx,
                    filename,
                    url: entry.url.unwrap_or_default(),
                    alt: entry.alt.unwrap_or_default(),
                })
            })
            .collect();

        Ok(Self { entries })
    }

    /// Filename recorded for an index, if any.
    pub fn filename_for(&self, idx: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.idx == idx)
            .map(|e| e.filename.as_str())
    }

    /// All filenames, in manifest order.
    pub fn filenames(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.filename.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_idx(value: &serde_json::Value) -> Option<u32> {
    let idx = match value {
        serde_json::Value::Number(n) => n.as_u64()?,
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(idx).ok().filter(|&n| n > 0)
}
