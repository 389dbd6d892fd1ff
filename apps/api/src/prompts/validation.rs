use std::collections::BTreeMap;

use serde_json::Value;
use tracing::warn;

use super::{PromptError, PromptTable, Scenario};

/// Parses raw file contents into a `PromptTable`, rejecting the whole table
/// if any language entry is malformed.
pub fn parse_table(raw: &str) -> Result<PromptTable, PromptError> {
    let value: Value = serde_json::from_str(raw)?;
    validate(value)
}

fn validate(value: Value) -> Result<PromptTable, PromptError> {
    let Value::Object(root) = value else {
        return Err(PromptError::Invalid(
            "prompts root must be an object".to_string(),
        ));
    };

    let mut table = PromptTable::new();

    for (lang, mapping) in root {
        let Value::Object(mapping) = mapping else {
            return Err(PromptError::Invalid(format!(
                "prompts['{lang}'] must be an object"
            )));
        };

        for scenario in Scenario::ALL {
            let key = scenario.as_str();
            let ok = matches!(mapping.get(key), Some(Value::String(s)) if !s.trim().is_empty());
            if !ok {
                return Err(PromptError::Invalid(format!(
                    "prompts['{lang}']['{key}'] must be a non-empty string"
                )));
            }
        }

        let mut entries = BTreeMap::new();
        for (key, text) in mapping {
            match text {
                Value::String(text) => {
                    entries.insert(key, text);
                }
                _ => warn!("Ignoring non-string prompt entry prompts['{lang}']['{key}']"),
            }
        }
        table.insert(lang, entries);
    }

    Ok(table)
}
