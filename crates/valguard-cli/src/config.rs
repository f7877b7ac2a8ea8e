//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! wrap_value: true   # expose record outputs as { value: .. }
//! strict: true       # `mutate` stops at the first rejected write
//! ```
//!
//! Command-line flags override the file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use valguard_core::ValidatedOptions;

/// Settings read from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Force the wrapped representation for record outputs.
    pub wrap_value: Option<bool>,
    /// Default for `mutate --strict`.
    pub strict: bool,
}

impl CliConfig {
    /// Read a configuration file. No path means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(config = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Apply the `--wrap-value` flag on top of the file. An absent flag
    /// keeps the file's setting.
    pub fn with_wrap_value(mut self, wrap_value: Option<bool>) -> Self {
        if wrap_value.is_some() {
            self.wrap_value = wrap_value;
        }
        self
    }

    /// Options for every validated type the CLI builds.
    pub fn options(&self) -> ValidatedOptions {
        ValidatedOptions {
            wrap_value: self.wrap_value,
        }
    }
}
