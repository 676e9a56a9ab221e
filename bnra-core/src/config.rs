//! Configuration file support
//!
//! Loads divergence thresholds and weighting defaults from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.bnrarc.json` in the working directory
//! 3. `bnra.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::divergence::{DivergenceBand, DivergenceThresholds};
use crate::weights::DEFAULT_QUALITY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BnraConfig {
    /// Custom divergence band thresholds
    #[serde(default)]
    pub thresholds: Option<ThresholdConfig>,

    /// Weight for answers without a quality rating (default: 2.5)
    #[serde(default)]
    pub default_quality: Option<f64>,

    /// Lowest band shown in reports (default: low, show everything)
    #[serde(default)]
    pub min_band: Option<DivergenceBand>,
}

/// Custom divergence band thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    /// Divergence from which discussion is advised (default: 0.2)
    pub medium: Option<f64>,
    /// Divergence from which discussion is required (default: 0.4)
    pub high: Option<f64>,
}

/// Resolved configuration with defaults filled in
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub thresholds: DivergenceThresholds,
    pub default_quality: f64,
    pub min_band: DivergenceBand,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl BnraConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref t) = self.thresholds {
            let defaults = DivergenceThresholds::default();
            let medium = t.medium.unwrap_or(defaults.medium);
            let high = t.high.unwrap_or(defaults.high);

            for (name, value) in [("medium", medium), ("high", high)] {
                if value <= 0.0 {
                    anyhow::bail!("thresholds.{} must be positive (got {})", name, value);
                }
                if value > 1.5 {
                    anyhow::bail!("thresholds.{} must be at most 1.5 (got {})", name, value);
                }
            }
            if medium >= high {
                anyhow::bail!(
                    "thresholds.medium ({}) must be less than thresholds.high ({})",
                    medium,
                    high
                );
            }
        }

        if let Some(q) = self.default_quality {
            if q <= 0.0 || q > 5.0 {
                anyhow::bail!("default_quality must be in (0, 5] (got {})", q);
            }
        }

        Ok(())
    }

    /// Resolve config into the form used by the engine
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let defaults = DivergenceThresholds::default();
        let thresholds = match &self.thresholds {
            Some(t) => DivergenceThresholds {
                medium: t.medium.unwrap_or(defaults.medium),
                high: t.high.unwrap_or(defaults.high),
            },
            None => defaults,
        };

        Ok(ResolvedConfig {
            thresholds,
            default_quality: self.default_quality.unwrap_or(DEFAULT_QUALITY),
            min_band: self.min_band.unwrap_or(DivergenceBand::Low),
            config_path: None,
        })
    }
}

/// Discover and load a config file from a directory
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(root: &Path) -> Result<Option<(BnraConfig, PathBuf)>> {
    for name in [".bnrarc.json", "bnra.config.json"] {
        let path = root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<BnraConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: BnraConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in `root`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(root)? {
            Some((config, path)) => (config, Some(path)),
            None => (BnraConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_is_valid() {
        let config = BnraConfig::default();
        config.validate().expect("default config should be valid");
        let resolved = config.resolve().expect("default config should resolve");
        assert_eq!(resolved.thresholds.medium, 0.2);
        assert_eq!(resolved.thresholds.high, 0.4);
        assert_eq!(resolved.default_quality, 2.5);
        assert_eq!(resolved.min_band, DivergenceBand::Low);
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "thresholds": {"medium": 0.25, "high": 0.5},
            "default_quality": 3.0,
            "min_band": "medium"
        }"#;
        let config: BnraConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.thresholds.medium, 0.25);
        assert_eq!(resolved.thresholds.high, 0.5);
        assert_eq!(resolved.default_quality, 3.0);
        assert_eq!(resolved.min_band, DivergenceBand::Medium);
    }

    #[test]
    fn test_reject_unknown_fields() {
        let json = r#"{"unknown_field": true}"#;
        let result: Result<BnraConfig, _> = serde_json::from_str(json);
        assert!(result.is_err(), "unknown fields should be rejected");
    }

    #[test]
    fn test_reject_unordered_thresholds() {
        let json = r#"{"thresholds": {"medium": 0.5, "high": 0.3}}"#;
        let config: BnraConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_non_positive_threshold() {
        let json = r#"{"thresholds": {"medium": 0.0}}"#;
        let config: BnraConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_zero_default_quality() {
        let json = r#"{"default_quality": 0.0}"#;
        let config: BnraConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_thresholds_use_defaults_for_rest() {
        let json = r#"{"thresholds": {"high": 0.6}}"#;
        let config: BnraConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.thresholds.medium, 0.2); // default
        assert_eq!(resolved.thresholds.high, 0.6);
    }

    #[test]
    fn test_discover_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".bnrarc.json"), r#"{"default_quality": 1.0}"#).unwrap();
        fs::write(
            dir.path().join("bnra.config.json"),
            r#"{"default_quality": 2.0}"#,
        )
        .unwrap();

        let (config, path) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.default_quality, Some(1.0));
        assert_eq!(path, dir.path().join(".bnrarc.json"));
    }

    #[test]
    fn test_discover_config_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bnra.config.json"), r#"{"min_band": "high"}"#).unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.min_band, Some(DivergenceBand::High));
    }

    #[test]
    fn test_no_config_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_and_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.json");
        fs::write(&config_path, r#"{"thresholds": {"medium": 0.1}}"#).unwrap();

        let resolved = load_and_resolve(dir.path(), Some(&config_path)).unwrap();
        assert_eq!(resolved.thresholds.medium, 0.1);
        assert_eq!(resolved.config_path, Some(config_path));
    }

    #[test]
    fn test_load_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".bnrarc.json");
        fs::write(&config_path, r#"{"thresholds": {"medium": 0.9, "high": 0.4}}"#).unwrap();

        let err = load_and_resolve(dir.path(), None).unwrap_err();
        assert!(format!("{:#}", err).contains(".bnrarc.json"));
    }
}
