//! Replaceable rule tables for boilerplate text and chrome images.
//!
//! The defaults mirror the help-center layout the pipeline was built for.
//! Callers can swap them wholesale through [`Rules::from_json`].

use crate::normalize::clean_line;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_EXACT: &[&str] = &["email", "facebook", "twitter", "linkedin", "yes", "no"];

const DEFAULT_SUBSTRINGS: &[&str] = &[
    "share",
    "feedback",
    "was this helpful",
    "teilen",
    "bewertung",
    "rückmeldung",
];

const DEFAULT_CHROME_MARKERS: &[&str] = &["logo", "header"];

/// Social/share/feedback UI text that never becomes slide content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoilerplateRules {
    /// Whole-line tokens, matched after lowercasing.
    pub exact: Vec<String>,
    /// Substrings, matched anywhere in the lowercased line.
    pub substrings: Vec<String>,
}

impl Default for BoilerplateRules {
    fn default() -> Self {
        Self {
            exact: DEFAULT_EXACT.iter().map(|s| s.to_string()).collect(),
            substrings: DEFAULT_SUBSTRINGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl BoilerplateRules {
    /// Rules that only drop empty lines.
    pub fn empty() -> Self {
        Self {
            exact: Vec::new(),
            substrings: Vec::new(),
        }
    }

    /// Whether a line should be dropped: empty after cleaning, an exact
    /// token, or containing any substring.
    pub fn should_strip(&self, line: &str) -> bool {
        let line = clean_line(line).to_lowercase();
        if line.is_empty() {
            return true;
        }
        if self.exact.iter().any(|t| t.to_lowercase() == line) {
            return true;
        }
        self.substrings
            .iter()
            .any(|s| line.contains(s.to_lowercase().as_str()))
    }
}

/// Filename markers for decorative site furniture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeRules {
    pub markers: Vec<String>,
}

impl Default for ChromeRules {
    fn default() -> Self {
        Self {
            markers: DEFAULT_CHROME_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ChromeRules {
    /// Whether a downloaded file is a chrome image (case-insensitive).
    pub fn is_chrome(&self, filename: &str) -> bool {
        let name = filename.to_lowercase();
        self.markers
            .iter()
            .any(|m| name.contains(m.to_lowercase().as_str()))
    }
}

/// All policy tables in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub boilerplate: BoilerplateRules,
    pub chrome: ChromeRules,
}

impl Rules {
    /// Load rules from JSON. Missing tables keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidRules(e.to_string()))
    }
}
