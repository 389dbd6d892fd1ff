//! Process-wide prompt cache with lazy, modification-time-driven reload.
//!
//! Readers clone an `Arc` of the current table under a short read lock; a
//! successful reload swaps the whole `Arc`, so a request sees either the old
//! table or the new one. A failed reload leaves the cached table in place.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::validation::parse_table;
use super::{PromptError, PromptTable, Scenario};
use crate::language::Language;

#[derive(Default)]
struct Cached {
    table: Option<Arc<PromptTable>>,
    modified: Option<SystemTime>,
}

pub struct PromptStore {
    path: PathBuf,
    auto_reload: bool,
    cached: RwLock<Cached>,
}

/// Load state reported by `/debug/env`.
#[derive(Debug, Clone)]
pub struct PromptStatus {
    pub path: String,
    pub loaded: bool,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Languages and scenario keys, without template text.
#[derive(Debug, Clone)]
pub struct PromptSummary {
    pub languages: Vec<String>,
    pub scenarios_by_lang: BTreeMap<String, Vec<String>>,
}

impl PromptStore {
    pub fn new(path: impl Into<PathBuf>, auto_reload: bool) -> Self {
        Self {
            path: path.into(),
            auto_reload,
            cached: RwLock::new(Cached::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file if forced, if nothing is cached yet, or (with
    /// auto-reload on) if its modification time is newer than the cached one.
    pub fn load(&self, force: bool) -> Result<(), PromptError> {
        let display = self.path.display().to_string();

        let metadata = std::fs::metadata(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PromptError::NotFound(display.clone()),
            _ => PromptError::Io {
                path: display.clone(),
                source: e,
            },
        })?;
        let modified = metadata.modified().map_err(|e| PromptError::Io {
            path: display.clone(),
            source: e,
        })?;

        if !force {
            let cached = self.read();
            if cached.table.is_some() {
                if !self.auto_reload {
                    return Ok(());
                }
                if cached.modified.is_some_and(|m| m >= modified) {
                    return Ok(());
                }
            }
        }

        let raw = std::fs::read_to_string(&self.path).map_err(|e| PromptError::Io {
            path: display.clone(),
            source: e,
        })?;
        let table = parse_table(&raw)?;

        info!(
            "Loaded prompts from {} ({} languages)",
            self.path.display(),
            table.len()
        );

        let mut cached = self.write();
        cached.table = Some(Arc::new(table));
        cached.modified = Some(modified);
        Ok(())
    }

    /// Returns the template for `language`/`scenario`, falling back through
    /// `Language::ALL` when the requested language lacks it.
    pub fn get(&self, language: &str, scenario: Scenario) -> Result<String, PromptError> {
        let table = self.refreshed()?;
        let key = scenario.as_str();

        if let Some(text) = table.get(language).and_then(|m| m.get(key)) {
            return Ok(text.clone());
        }

        Language::ALL
            .iter()
            .find_map(|fallback| table.get(fallback.code()).and_then(|m| m.get(key)))
            .cloned()
            .ok_or(PromptError::MissingScenario { scenario })
    }

    /// Like `get`'s refresh step, but any reload error is reported.
    pub fn summary(&self) -> Result<PromptSummary, PromptError> {
        self.load(false)?;
        let table = self.snapshot().unwrap_or_default();

        Ok(PromptSummary {
            languages: table.keys().cloned().collect(),
            scenarios_by_lang: table
                .iter()
                .map(|(lang, entries)| (lang.clone(), entries.keys().cloned().collect()))
                .collect(),
        })
    }

    pub fn snapshot(&self) -> Option<Arc<PromptTable>> {
        self.read().table.clone()
    }

    pub fn status(&self) -> PromptStatus {
        let cached = self.read();
        PromptStatus {
            path: self.path.display().to_string(),
            loaded: cached.table.is_some(),
            modified_at: cached.modified.map(DateTime::<Utc>::from),
        }
    }

    /// Non-forced reload; a failure only matters if there is nothing cached.
    fn refreshed(&self) -> Result<Arc<PromptTable>, PromptError> {
        if let Err(e) = self.load(false) {
            match self.snapshot() {
                Some(_) => warn!("Prompts reload failed, serving cached table: {e}"),
                None => return Err(e),
            }
        }
        Ok(self.snapshot().unwrap_or_default())
    }

    fn read(&self) -> RwLockReadGuard<'_, Cached> {
        self.cached.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Cached> {
        self.cached.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::TempDir;

    const RU_EN: &str = r#"{
        "ru": {"reject": "ru-reject", "hire": "ru-hire", "remind": "ru-remind"},
        "en": {"reject": "en-reject", "hire": "en-hire", "remind": "en-remind"}
    }"#;

    /// Writes `contents` and pushes the mtime `offset_secs` into the future so
    /// successive writes are always seen as newer.
    fn write_prompts(dir: &TempDir, contents: &str, offset_secs: u64) -> PathBuf {
        let path = dir.path().join("prompts.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(offset_secs))
            .unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = PromptStore::new(dir.path().join("nope.json"), true);

        assert!(matches!(store.load(true), Err(PromptError::NotFound(_))));
        assert!(matches!(
            store.get("en", Scenario::Hire),
            Err(PromptError::NotFound(_))
        ));
        assert!(!store.status().loaded);
    }

    #[test]
    fn test_get_loads_lazily_and_looks_up_directly() {
        let dir = TempDir::new().unwrap();
        let store = PromptStore::new(write_prompts(&dir, RU_EN, 0), true);

        assert_eq!(store.get("en", Scenario::Remind).unwrap(), "en-remind");
        let status = store.status();
        assert!(status.loaded);
        assert!(status.modified_at.is_some());
    }

    #[test]
    fn test_absent_language_falls_back_to_primary() {
        let dir = TempDir::new().unwrap();
        let store = PromptStore::new(write_prompts(&dir, RU_EN, 0), true);

        assert_eq!(store.get("de", Scenario::Hire).unwrap(), "ru-hire");
        assert_eq!(store.get("es", Scenario::Reject).unwrap(), "ru-reject");
    }

    #[test]
    fn test_fallback_skips_missing_primary() {
        let dir = TempDir::new().unwrap();
        let only_es = r#"{"es": {"reject": "es-reject", "hire": "es-hire", "remind": "es-remind"}}"#;
        let store = PromptStore::new(write_prompts(&dir, only_es, 0), true);

        assert_eq!(store.get("en", Scenario::Hire).unwrap(), "es-hire");
    }

    #[test]
    fn test_no_language_supplies_scenario() {
        let dir = TempDir::new().unwrap();
        let store = PromptStore::new(write_prompts(&dir, "{}", 0), true);

        assert!(matches!(
            store.get("ru", Scenario::Remind),
            Err(PromptError::MissingScenario {
                scenario: Scenario::Remind
            })
        ));
    }

    #[test]
    fn test_reloads_when_mtime_advances() {
        let dir = TempDir::new().unwrap();
        let path = write_prompts(&dir, RU_EN, 0);
        let store = PromptStore::new(&path, true);
        assert_eq!(store.get("en", Scenario::Hire).unwrap(), "en-hire");

        let updated = RU_EN.replace("en-hire", "en-hire-v2");
        write_prompts(&dir, &updated, 60);

        assert_eq!(store.get("en", Scenario::Hire).unwrap(), "en-hire-v2");
    }

    #[test]
    fn test_invalid_reload_keeps_cached_table() {
        let dir = TempDir::new().unwrap();
        let store = PromptStore::new(write_prompts(&dir, RU_EN, 0), true);
        store.load(true).unwrap();

        let broken = r#"{"en": {"reject": "r", "remind": "m"}}"#;
        write_prompts(&dir, broken, 60);

        match store.load(false) {
            Err(PromptError::Invalid(msg)) => {
                assert_eq!(msg, "prompts['en']['hire'] must be a non-empty string")
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        // Lookups keep serving the previous table.
        assert_eq!(store.get("en", Scenario::Hire).unwrap(), "en-hire");
        assert!(store.status().loaded);
    }

    #[test]
    fn test_invalid_first_load_propagates() {
        let dir = TempDir::new().unwrap();
        let store = PromptStore::new(write_prompts(&dir, "[1, 2]", 0), true);

        assert!(matches!(
            store.get("ru", Scenario::Hire),
            Err(PromptError::Invalid(_))
        ));
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_reload_disabled_ignores_changes_until_forced() {
        let dir = TempDir::new().unwrap();
        let store = PromptStore::new(write_prompts(&dir, RU_EN, 0), false);
        assert_eq!(store.get("ru", Scenario::Hire).unwrap(), "ru-hire");

        write_prompts(&dir, &RU_EN.replace("ru-hire", "ru-hire-v2"), 60);
        assert_eq!(store.get("ru", Scenario::Hire).unwrap(), "ru-hire");

        store.load(true).unwrap();
        assert_eq!(store.get("ru", Scenario::Hire).unwrap(), "ru-hire-v2");
    }

    #[test]
    fn test_summary_lists_languages_and_scenarios() {
        let dir = TempDir::new().unwrap();
        let store = PromptStore::new(write_prompts(&dir, RU_EN, 0), true);

        let summary = store.summary().unwrap();
        assert_eq!(summary.languages, vec!["en", "ru"]);
        for lang in ["en", "ru"] {
            assert_eq!(
                summary.scenarios_by_lang[lang],
                vec!["hire", "reject", "remind"]
            );
        }
    }
}
