//! Prompt templates keyed by language and scenario, loaded from a JSON file.
//!
//! File shape:
//!
//! ```json
//! { "ru": { "reject": "...", "hire": "...", "remind": "..." }, "en": { ... } }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub mod store;
pub mod validation;

pub use store::PromptStore;

/// What kind of message the user wants generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    Reject,
    Hire,
    Remind,
}

impl Scenario {
    /// Every prompt entry must define all of these.
    pub const ALL: [Scenario; 3] = [Scenario::Reject, Scenario::Hire, Scenario::Remind];

    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::Reject => "reject",
            Scenario::Hire => "hire",
            Scenario::Remind => "remind",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sc| sc.as_str() == s)
            .ok_or_else(|| format!("unknown scenario '{s}'"))
    }
}

/// language code → scenario key → template text.
///
/// Only ever constructed through `validation::parse_table`, so every language
/// carries all of `Scenario::ALL` with non-empty text.
pub type PromptTable = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompts file not found: {0}")]
    NotFound(String),

    #[error("Failed to read prompts file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Prompts file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid prompts format: {0}")]
    Invalid(String),

    #[error("No prompt found for scenario='{scenario}' in any language")]
    MissingScenario { scenario: Scenario },
}
