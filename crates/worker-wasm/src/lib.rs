//! WASM-compatible wrapper for slide spec generation.
//!
//! This crate exposes page building and corpus cleaning to JavaScript
//! for use in Cloudflare Workers.

use serde::{Deserialize, Serialize};
use slidespec_core::{
    Corpus, CorpusPage, Error, ImageManifest, OutlineFormatter, PageInput, PagePipeline, PageSpec,
    Rules,
};
use slidespec_html::HtmlParser;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of building one page.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildResult {
    /// The page's slide spec.
    pub spec: PageSpec,
    /// Number of slides in the spec.
    pub slide_count: usize,
    /// Warning message if the image manifest could not be used.
    pub warning: Option<String>,
}

/// A named page, as passed to and returned from [`clean_corpus`].
#[derive(Debug, Serialize, Deserialize)]
pub struct NamedSpec {
    pub name: String,
    pub spec: PageSpec,
}

/// Result of cleaning a corpus.
#[derive(Debug, Serialize, Deserialize)]
pub struct CleanResult {
    /// Cleaned pages, in case-insensitive name order.
    pub pages: Vec<NamedSpec>,
    /// Distinct display keys removed as cross-page duplicates.
    pub duplicate_keys: usize,
    /// Size of the shared Overview boilerplate.
    pub boilerplate_core: usize,
    /// One message per page left out because its spec was unreadable.
    pub warnings: Vec<String>,
}

/// Build a slide spec from a page's rendered HTML.
///
/// # Arguments
/// * `html` - The page's `raw.html` content
/// * `name` - Folder name, used as the title when the page has no `h1`
/// * `source_url` - Original page URL (may be empty)
/// * `page_title` - Optional title; overrides the page's `h1`
/// * `manifest_json` - Optional `images_map.json` content
/// * `rules_json` - Optional replacement rule set
///
/// # Returns
/// A JavaScript object with the build result, or throws on error.
#[wasm_bindgen]
pub fn build_slidespec(
    html: &str,
    name: &str,
    source_url: &str,
    page_title: Option<String>,
    manifest_json: Option<String>,
    rules_json: Option<String>,
) -> Result<JsValue, JsValue> {
    let result = build_slidespec_impl(
        html,
        name,
        source_url,
        page_title.as_deref(),
        manifest_json.as_deref(),
        rules_json.as_deref(),
    )
    .map_err(|e| JsValue::from_str(&e))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn build_slidespec_impl(
    html: &str,
    name: &str,
    source_url: &str,
    page_title: Option<&str>,
    manifest_json: Option<&str>,
    rules_json: Option<&str>,
) -> Result<BuildResult, String> {
    let rules = match rules_json {
        Some(json) => Rules::from_json(json).map_err(|e| e.to_string())?,
        None => Rules::default(),
    };

    let tree = HtmlParser::new()
        .parse(html, name)
        .map_err(|e| e.to_string())?;

    let (manifest, warning) = match manifest_json.map(ImageManifest::from_json) {
        Some(Ok(manifest)) => (Some(manifest), None),
        Some(Err(e)) => (None, Some(e.to_string())),
        None => (None, None),
    };

    // No directory listing here; binding falls back to manifest filenames.
    let spec = PagePipeline::with_rules(&rules)
        .process(&PageInput {
            tree: &tree,
            page_title,
            fallback_title: name,
            source_url,
            manifest: manifest.as_ref(),
            files: &[],
        })
        .map_err(|e| match e {
            Error::MissingContent(_) => format!("Page has no content: {}", e),
            other => other.to_string(),
        })?;

    Ok(BuildResult {
        slide_count: spec.slides.len(),
        spec,
        warning,
    })
}

/// Remove cross-page duplicates and shared Overview boilerplate.
///
/// # Arguments
/// * `pages` - Array of `{ name, spec }` objects covering the whole corpus
///
/// # Returns
/// A JavaScript object with the cleaned pages. Pages whose spec cannot be
/// read are left out and named in `warnings`.
#[wasm_bindgen]
pub fn clean_corpus(pages: JsValue) -> Result<JsValue, JsValue> {
    let pages: Vec<serde_json::Value> = serde_wasm_bindgen::from_value(pages)
        .map_err(|e| JsValue::from_str(&format!("Invalid pages array: {}", e)))?;

    let result = clean_corpus_impl(pages);

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn clean_corpus_impl(pages: Vec<serde_json::Value>) -> CleanResult {
    let mut warnings = Vec::new();
    let mut corpus_pages = Vec::with_capacity(pages.len());

    for (position, page) in pages.into_iter().enumerate() {
        let name = page
            .get("name")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("page #{}", position));

        match serde_json::from_value::<NamedSpec>(page) {
            Ok(named) => corpus_pages.push(CorpusPage {
                name: named.name,
                spec: named.spec,
            }),
            Err(e) => {
                let error = Error::MalformedSpec(format!("{}: {}", name, e));
                warnings.push(error.to_string());
            }
        }
    }

    let mut corpus = Corpus::new(corpus_pages);
    let report = corpus.clean();

    CleanResult {
        pages: corpus
            .into_pages()
            .into_iter()
            .map(|p| NamedSpec {
                name: p.name,
                spec: p.spec,
            })
            .collect(),
        duplicate_keys: report.duplicate_keys,
        boilerplate_core: report.boilerplate_core,
        warnings,
    }
}

/// Render a slide spec as a Markdown outline for review.
///
/// # Arguments
/// * `spec` - A slide spec object
/// * `include_notes` - Whether speaker notes are rendered
#[wasm_bindgen]
pub fn format_outline(spec: JsValue, include_notes: bool) -> Result<String, JsValue> {
    let spec: PageSpec = serde_wasm_bindgen::from_value(spec)
        .map_err(|e| JsValue::from_str(&format!("Invalid slide spec: {}", e)))?;

    Ok(format_outline_impl(&spec, include_notes))
}

fn format_outline_impl(spec: &PageSpec, include_notes: bool) -> String {
    OutlineFormatter::new()
        .with_notes(include_notes)
        .format(spec)
}
