//! Core domain types, sectionizing, image binding and cross-page cleaning
//! for turning scraped help-center pages into slide specs.

pub mod binder;
pub mod builder;
pub mod bullets;
pub mod container;
pub mod corpus;
pub mod dedupe;
pub mod error;
pub mod manifest;
pub mod normalize;
pub mod outline;
pub mod overview;
pub mod rules;
pub mod sectionize;
pub mod tree;
pub mod types;

pub use binder::{BindReport, ImageBinder};
pub use builder::{page_title_from, PageInput, PagePipeline, PageSpecBuilder};
pub use bullets::BulletFlattener;
pub use container::ContainerSelector;
pub use corpus::{CleanReport, Corpus, CorpusPage, PageCleanStats};
pub use dedupe::{display_key, is_overview, DuplicateIndex};
pub use error::{Error, Result};
pub use manifest::{ImageManifest, ImageManifestEntry};
pub use normalize::TextNormalizer;
pub use outline::OutlineFormatter;
pub use overview::{BoilerplateCore, CollapseOutcome};
pub use rules::{BoilerplateRules, ChromeRules, Rules};
pub use sectionize::{Sectionizer, DEFAULT_IMAGE_INDEX_ATTR};
pub use tree::{ContentNode, ElementNode};
pub use types::{HeadingLevel, ImageSlot, IndexRow, PageSpec, Section, Slide, SlideImage};
