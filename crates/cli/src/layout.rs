//! On-disk page layout shared with the fetcher and the deck writer.
//!
//! ```text
//! <root>/index.csv              fetcher manifest (folder,url,...)
//! <root>/<page>/raw.html        rendered content
//! <root>/<page>/images_map.json image manifest
//! <root>/<page>/images/         downloaded images
//! <root>/<page>/slidespec.json  slide spec (written here)
//! <root>/slidespec_index.csv    corpus index (written here)
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use slidespec_core::{Error, ImageManifest, PageSpec};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const RAW_HTML: &str = "raw.html";
pub const IMAGES_MAP: &str = "images_map.json";
pub const IMAGES_DIR: &str = "images";
pub const SLIDESPEC: &str = "slidespec.json";
pub const FETCH_INDEX: &str = "index.csv";
pub const SLIDESPEC_INDEX: &str = "slidespec_index.csv";

/// Files copied next to a page's spec so it stays traceable.
const REFERENCE_FILES: &[&str] = &[RAW_HTML, "content.md", IMAGES_MAP];

/// Folder name of a page directory.
pub fn page_name(page_dir: &Path) -> String {
    page_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Subdirectories of `root` that contain `marker`, sorted case-insensitively.
pub fn discover_pages(root: &Path, marker: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root)
        .with_context(|| format!("Failed to read directory {}", root.display()))?;

    let mut pages: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir() && path.join(marker).is_file())
        .collect();

    pages.sort_by(|a, b| {
        let (na, nb) = (page_name(a), page_name(b));
        na.to_lowercase().cmp(&nb.to_lowercase()).then_with(|| na.cmp(&nb))
    });
    Ok(pages)
}

#[derive(Debug, Deserialize)]
struct FetchRow {
    #[serde(default)]
    folder: String,
    #[serde(default)]
    url: String,
}

/// Map of page folder name to source URL, from the fetcher's `index.csv`.
///
/// A missing or unreadable index yields an empty map.
pub fn load_url_lookup(root: &Path) -> HashMap<String, String> {
    let path = root.join(FETCH_INDEX);
    if !path.is_file() {
        return HashMap::new();
    }

    let mut reader = match csv::Reader::from_path(&path) {
        Ok(reader) => reader,
        Err(e) => {
            log::warn!("Ignoring unreadable {}: {}", path.display(), e);
            return HashMap::new();
        }
    };

    reader
        .deserialize::<FetchRow>()
        .filter_map(|row| match row {
            Ok(row) => Some(row),
            Err(e) => {
                log::warn!("Skipping bad row in {}: {}", path.display(), e);
                None
            }
        })
        .map(|row| (page_name(Path::new(&row.folder)), row.url))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

/// Load a page's image manifest.
pub fn load_manifest(page_dir: &Path) -> slidespec_core::Result<ImageManifest> {
    let path = page_dir.join(IMAGES_MAP);
    if !path.is_file() {
        return Err(Error::MissingManifest(page_name(page_dir)));
    }
    let json = fs::read_to_string(&path)?;
    ImageManifest::from_json(&json).map_err(|e| match e {
        Error::MalformedManifest(msg) => {
            Error::MalformedManifest(format!("{}: {}", page_name(page_dir), msg))
        }
        other => other,
    })
}

/// Files in the page's `images/` directory.
pub fn list_images(page_dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(page_dir.join(IMAGES_DIR)) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect()
}

/// Read a page's slide spec.
pub fn read_spec(page_dir: &Path) -> slidespec_core::Result<PageSpec> {
    let json = fs::read_to_string(page_dir.join(SLIDESPEC))?;
    PageSpec::from_json(&json).map_err(|e| match e {
        Error::MalformedSpec(msg) => Error::MalformedSpec(format!("{}: {}", page_name(page_dir), msg)),
        other => other,
    })
}

/// Write a page's slide spec, returning its path.
pub fn write_spec(page_dir: &Path, spec: &PageSpec) -> Result<PathBuf> {
    fs::create_dir_all(page_dir)
        .with_context(|| format!("Failed to create directory {}", page_dir.display()))?;
    let path = page_dir.join(SLIDESPEC);
    let json = spec.to_json_pretty()?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Copy reference files and the images directory from `src` to `dst`.
///
/// An existing `images/` at the destination is left alone.
pub fn copy_reference_files(src: &Path, dst: &Path) -> Result<()> {
    if same_dir(src, dst) {
        return Ok(());
    }
    fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create directory {}", dst.display()))?;

    for name in REFERENCE_FILES {
        let from = src.join(name);
        if from.is_file() {
            fs::copy(&from, dst.join(name))
                .with_context(|| format!("Failed to copy {}", from.display()))?;
        }
    }

    let images = src.join(IMAGES_DIR);
    let target = dst.join(IMAGES_DIR);
    if images.is_dir() && !target.exists() {
        copy_dir(&images, &target)?;
    }
    Ok(())
}

/// Whether two paths name the same directory.
pub fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Copy a directory tree without recursing on the call stack.
fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    let mut pending = vec![(src.to_path_buf(), dst.to_path_buf())];
    while let Some((from, to)) = pending.pop() {
        fs::create_dir_all(&to)
            .with_context(|| format!("Failed to create directory {}", to.display()))?;
        for entry in fs::read_dir(&from)
            .with_context(|| format!("Failed to read directory {}", from.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            let target = to.join(entry.file_name());
            if path.is_dir() {
                pending.push((path, target));
            } else {
                fs::copy(&path, &target)
                    .with_context(|| format!("Failed to copy {}", path.display()))?;
            }
        }
    }
    Ok(())
}
