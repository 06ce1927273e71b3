//! Reconciliation settings and the optional JSON config file

use crate::error::{Result, TabreconError};
use crate::keys::KeyCandidates;
use crate::normalize::{NormalizeOptions, DEFAULT_DATE_SERIAL_MAX, DEFAULT_DATE_SERIAL_MIN};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything one reconciliation run depends on besides its two tables
#[derive(Debug, Clone, Default)]
pub struct ReconcileConfig {
    /// Explicit join columns; `None` means automatic selection
    pub explicit_keys: Option<Vec<String>>,
    pub key_candidates: KeyCandidates,
    pub normalize: NormalizeOptions,
}

impl ReconcileConfig {
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.explicit_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.normalize.case_insensitive = case_insensitive;
        self
    }

    pub fn with_key_candidates(mut self, candidates: KeyCandidates) -> Self {
        self.key_candidates = candidates;
        self
    }

    pub fn case_insensitive(&self) -> bool {
        self.normalize.case_insensitive
    }
}

/// On-disk configuration; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub keys: Option<Vec<String>>,
    pub case_insensitive: Option<bool>,
    pub detect_dates: Option<bool>,
    pub key_candidates: Option<KeyCandidates>,
    pub placeholder_pattern: Option<String>,
    pub date_serial_min: Option<f64>,
    pub date_serial_max: Option<f64>,
}

impl ConfigFile {
    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TabreconError::config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        let config: ConfigFile = serde_json::from_str(&content).map_err(|e| {
            TabreconError::config(format!("Invalid config file {}: {}", path.display(), e))
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply this file on top of the defaults
    pub fn into_config(self) -> Result<ReconcileConfig> {
        let mut config = ReconcileConfig::default();

        if let Some(keys) = self.keys {
            if keys.is_empty() {
                return Err(TabreconError::config("'keys' must not be empty when given"));
            }
            config.explicit_keys = Some(keys);
        }

        if let Some(candidates) = self.key_candidates {
            if let Some(group) = candidates.groups().iter().find(|g| g.synonyms.is_empty()) {
                return Err(TabreconError::config(format!(
                    "Key candidate group '{}' has no synonyms",
                    group.name
                )));
            }
            config.key_candidates = candidates;
        }

        if let Some(pattern) = self.placeholder_pattern {
            config.normalize.placeholder_pattern = Regex::new(&pattern)?;
        }

        let min = self.date_serial_min.unwrap_or(DEFAULT_DATE_SERIAL_MIN);
        let max = self.date_serial_max.unwrap_or(DEFAULT_DATE_SERIAL_MAX);
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(TabreconError::config(format!(
                "Invalid date serial window {}..={}",
                min, max
            )));
        }
        config.normalize.date_serial_range = min..=max;

        if let Some(case_insensitive) = self.case_insensitive {
            config.normalize.case_insensitive = case_insensitive;
        }
        if let Some(detect_dates) = self.detect_dates {
            config.normalize.detect_dates = detect_dates;
        }

        Ok(config)
    }
}
