// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Split configuration

use crate::tolerance::{Tolerance, DEFAULT_ANGULAR, DEFAULT_PARALLEL_LIMIT};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up by `SplitConfig::load`
pub const CONFIG_FILE: &str = "panelcut.toml";

/// Split configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Linear tolerance; `None` defers to the document, then the default
    pub tolerance: Option<f64>,
    /// Colinearity threshold on unit edge directions
    pub colinear_tolerance: f64,
    /// |n1 · n2| above which a cutter counts as parallel
    pub parallel_limit: f64,
    /// Plan panels on the rayon pool
    pub parallel: bool,
    /// Move openings onto the fragments that hold them
    pub transfer_openings: bool,
    /// Delete the source panel once at least two fragments exist
    pub delete_source: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            tolerance: None,
            colinear_tolerance: DEFAULT_ANGULAR,
            parallel_limit: DEFAULT_PARALLEL_LIMIT,
            parallel: true,
            transfer_openings: true,
            delete_source: true,
        }
    }
}

impl SplitConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: SplitConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `panelcut.toml` if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `PANELCUT_*` environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(tolerance) = std::env::var("PANELCUT_TOLERANCE") {
            let value = tolerance
                .parse()
                .with_context(|| format!("Invalid PANELCUT_TOLERANCE: {}", tolerance))?;
            self.tolerance = Some(value);
        }

        if let Ok(parallel) = std::env::var("PANELCUT_PARALLEL") {
            self.parallel = parallel.parse().unwrap_or(self.parallel);
        }

        if let Ok(transfer) = std::env::var("PANELCUT_TRANSFER_OPENINGS") {
            self.transfer_openings = transfer.parse().unwrap_or(self.transfer_openings);
        }

        self.validate()
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(tolerance) = self.tolerance {
            if !(tolerance.is_finite() && tolerance > 0.0) {
                bail!("tolerance must be a positive finite number, got {}", tolerance);
            }
        }
        if !(self.colinear_tolerance.is_finite() && self.colinear_tolerance > 0.0) {
            bail!(
                "colinear_tolerance must be a positive finite number, got {}",
                self.colinear_tolerance
            );
        }
        if !(self.parallel_limit > 0.0 && self.parallel_limit <= 1.0) {
            bail!("parallel_limit must lie in (0, 1], got {}", self.parallel_limit);
        }
        Ok(())
    }

    /// Tolerance policy for a resolved linear tolerance
    pub fn tolerance_policy(&self, linear: f64) -> Tolerance {
        Tolerance::new(linear)
            .with_angular(self.colinear_tolerance)
            .with_parallel_limit(self.parallel_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: SplitConfig = toml::from_str("tolerance = 0.001\nparallel = false\n").unwrap();
        assert_eq!(config.tolerance, Some(0.001));
        assert!(!config.parallel);
        assert!(config.transfer_openings);
        assert_eq!(config.parallel_limit, DEFAULT_PARALLEL_LIMIT);
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();
        let config = SplitConfig {
            tolerance: Some(1e-4),
            delete_source: false,
            ..SplitConfig::default()
        };
        config.save(file.path()).unwrap();
        assert_eq!(SplitConfig::from_file(file.path()).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = SplitConfig {
            tolerance: Some(-1.0),
            ..SplitConfig::default()
        };
        assert!(bad.validate().is_err());

        let bad = SplitConfig {
            parallel_limit: 1.5,
            ..SplitConfig::default()
        };
        assert!(bad.validate().is_err());
        assert!(SplitConfig::default().validate().is_ok());
    }

    #[test]
    fn test_tolerance_policy() {
        let config = SplitConfig {
            parallel_limit: 0.99,
            ..SplitConfig::default()
        };
        let tol = config.tolerance_policy(0.01);
        assert_eq!(tol.linear, 0.01);
        assert_eq!(tol.parallel_limit, 0.99);
    }
}
