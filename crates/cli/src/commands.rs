//! The `build` and `clean` stages.

use crate::index::write_index;
use crate::layout::{self, RAW_HTML, SLIDESPEC, SLIDESPEC_INDEX};
use anyhow::{Context, Result};
use rayon::prelude::*;
use slidespec_core::{
    CleanReport, Corpus, CorpusPage, Error, ImageManifest, IndexRow, OutlineFormatter, PageInput,
    PagePipeline, Rules,
};
use slidespec_html::HtmlParser;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Markdown preview written next to each spec with `--preview`.
pub const PREVIEW_FILE: &str = "slides.md";

/// Settings for the build stage.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub in_dir: PathBuf,
    pub out_dir: PathBuf,
    pub rules: Rules,
    pub preview: bool,
    /// Worker threads; `None` uses rayon's default pool.
    pub jobs: Option<usize>,
}

/// What a build run produced.
#[derive(Debug)]
pub struct BuildSummary {
    pub written: usize,
    pub skipped: usize,
    pub index_path: PathBuf,
}

/// What a clean run produced.
#[derive(Debug)]
pub struct CleanSummary {
    pub report: CleanReport,
    pub written: usize,
    pub skipped: usize,
    pub index_path: PathBuf,
}

/// Load a replacement rule set from a JSON file.
pub fn load_rules(path: &Path) -> Result<Rules> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules {}", path.display()))?;
    Ok(Rules::from_json(&json)?)
}

/// Turn every page directory with a `raw.html` into a slide spec.
///
/// Pages are independent, so they are processed in parallel. A page that
/// fails is logged and left out of the index.
pub fn run_build(opts: &BuildOptions) -> Result<BuildSummary> {
    let pages = layout::discover_pages(&opts.in_dir, RAW_HTML)?;
    fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("Failed to create directory {}", opts.out_dir.display()))?;

    let urls = layout::load_url_lookup(&opts.in_dir);
    let parser = HtmlParser::new();
    let pipeline = PagePipeline::with_rules(&opts.rules);
    let outline = opts.preview.then(OutlineFormatter::new);

    log::info!("Building {} pages from {}", pages.len(), opts.in_dir.display());

    let results: Vec<Result<IndexRow>> = with_pool(opts.jobs, || {
        pages
            .par_iter()
            .map(|page_dir| {
                build_page(page_dir, &opts.out_dir, &urls, &parser, &pipeline, outline.as_ref())
            })
            .collect()
    })?;

    let mut rows = Vec::with_capacity(results.len());
    let mut skipped = 0;
    for (page_dir, result) in pages.iter().zip(results) {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                log::warn!("Skipping {}: {:#}", layout::page_name(page_dir), e);
                skipped += 1;
            }
        }
    }

    let index_path = opts.out_dir.join(SLIDESPEC_INDEX);
    write_index(&index_path, &rows)?;

    Ok(BuildSummary {
        written: rows.len(),
        skipped,
        index_path,
    })
}

/// Build one page's spec and write it under `out_root/<page>/`.
fn build_page(
    page_dir: &Path,
    out_root: &Path,
    urls: &HashMap<String, String>,
    parser: &HtmlParser,
    pipeline: &PagePipeline,
    outline: Option<&OutlineFormatter>,
) -> Result<IndexRow> {
    let name = layout::page_name(page_dir);
    let html_path = page_dir.join(RAW_HTML);
    let file = File::open(&html_path)
        .with_context(|| format!("Failed to open {}", html_path.display()))?;
    let tree = parser.parse_reader(BufReader::new(file), &name)?;

    let manifest = load_manifest_lenient(page_dir);
    let files = layout::list_images(page_dir);
    let source_url = urls.get(&name).map(String::as_str).unwrap_or("");

    let spec = pipeline.process(&PageInput {
        tree: &tree,
        page_title: None,
        fallback_title: &name,
        source_url,
        manifest: manifest.as_ref(),
        files: &files,
    })?;

    let out_dir = out_root.join(&name);
    layout::copy_reference_files(page_dir, &out_dir)?;
    let spec_path = layout::write_spec(&out_dir, &spec)?;

    if let Some(formatter) = outline {
        let preview = out_dir.join(PREVIEW_FILE);
        fs::write(&preview, formatter.format(&spec))
            .with_context(|| format!("Failed to write {}", preview.display()))?;
    }

    log::debug!("{}: {} slides -> {}", name, spec.slides.len(), spec_path.display());

    Ok(IndexRow {
        folder: out_dir.display().to_string(),
        page_title: spec.page_title,
        source_url: spec.source_url,
        slidespec_location: spec_path.display().to_string(),
        num_slides: spec.slides.len(),
    })
}

/// The page's manifest, or `None` with a warning when it is missing or broken.
fn load_manifest_lenient(page_dir: &Path) -> Option<ImageManifest> {
    match layout::load_manifest(page_dir) {
        Ok(manifest) => Some(manifest),
        Err(e @ Error::MissingManifest(_)) => {
            log::info!("{}", e);
            None
        }
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    }
}

/// Run `op` on a dedicated pool when a thread count is given.
fn with_pool<T, F>(jobs: Option<usize>, op: F) -> Result<T>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    match jobs {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("Failed to start worker pool")?;
            Ok(pool.install(op))
        }
        None => Ok(op()),
    }
}

/// Clean every spec under `in_dir` as one corpus and write the result to
/// `out_dir`, with reference files mirrored alongside.
pub fn run_clean(in_dir: &Path, out_dir: &Path) -> Result<CleanSummary> {
    let page_dirs = layout::discover_pages(in_dir, SLIDESPEC)?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create directory {}", out_dir.display()))?;

    let mut skipped = 0;
    let mut pages = Vec::with_capacity(page_dirs.len());
    for page_dir in &page_dirs {
        match layout::read_spec(page_dir) {
            Ok(spec) => pages.push(CorpusPage {
                name: layout::page_name(page_dir),
                spec,
            }),
            Err(e) => {
                log::warn!("Skipping {}: {}", layout::page_name(page_dir), e);
                skipped += 1;
            }
        }
    }

    let mut corpus = Corpus::new(pages);
    let report = corpus.clean();
    log::info!(
        "Cleaning {} pages: {} duplicate keys, overview core of {}",
        corpus.len(),
        report.duplicate_keys,
        report.boilerplate_core
    );

    let mut written = Vec::with_capacity(corpus.len());
    for page in corpus.pages() {
        match write_clean_page(in_dir, out_dir, page) {
            Ok(()) => written.push(page.clone()),
            Err(e) => {
                log::warn!("Skipping {}: {:#}", page.name, e);
                skipped += 1;
            }
        }
    }

    let written = Corpus::new(written);
    let rows = written.index_rows(|name| {
        let folder = out_dir.join(name);
        let spec = folder.join(SLIDESPEC);
        (folder.display().to_string(), spec.display().to_string())
    });
    let index_path = out_dir.join(SLIDESPEC_INDEX);
    write_index(&index_path, &rows)?;

    let fetch_index = in_dir.join(layout::FETCH_INDEX);
    if fetch_index.is_file() && !layout::same_dir(in_dir, out_dir) {
        fs::copy(&fetch_index, out_dir.join(layout::FETCH_INDEX))
            .with_context(|| format!("Failed to copy {}", fetch_index.display()))?;
    }

    Ok(CleanSummary {
        report,
        written: written.len(),
        skipped,
        index_path,
    })
}

fn write_clean_page(in_dir: &Path, out_dir: &Path, page: &CorpusPage) -> Result<()> {
    let dst = out_dir.join(&page.name);
    layout::copy_reference_files(&in_dir.join(&page.name), &dst)?;
    layout::write_spec(&dst, &page.spec)?;
    Ok(())
}
