//! Engine configuration
//!
//! Loaded from TOML; every key is optional and unknown keys are rejected.
//!
//! ```toml
//! max_title_len = 255
//! max_display_order_len = 10
//! max_columns = 64
//! max_cells = 4096
//! header_id_prefix = "h"
//! body_id_prefix = "r"
//! default_align = "left"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use spectab_model::Align;

use crate::error::ConfigError;

/// Limits and naming rules applied by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Longest accepted title, in characters
    pub max_title_len: usize,
    /// Longest accepted display order, in characters
    pub max_display_order_len: usize,
    /// Widest accepted table
    pub max_columns: usize,
    /// Most declared cells accepted across headers and body
    pub max_cells: usize,
    /// Prefix of generated header cell ids
    pub header_id_prefix: String,
    /// Prefix of generated body cell ids
    pub body_id_prefix: String,
    /// Alignment for cells that declare none
    pub default_align: Align,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_title_len: 255,
            max_display_order_len: 10,
            max_columns: 64,
            max_cells: 4096,
            header_id_prefix: "h".to_string(),
            body_id_prefix: "r".to_string(),
            default_align: Align::Left,
        }
    }
}

impl EngineConfig {
    /// Parse and check a TOML document
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for bad TOML or unknown keys and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`EngineConfig::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_title_len == 0 {
            return Err(ConfigError::Invalid("max_title_len must be positive".into()));
        }
        if self.max_display_order_len == 0 {
            return Err(ConfigError::Invalid(
                "max_display_order_len must be positive".into(),
            ));
        }
        if self.max_columns == 0 {
            return Err(ConfigError::Invalid("max_columns must be positive".into()));
        }
        if self.max_cells == 0 {
            return Err(ConfigError::Invalid("max_cells must be positive".into()));
        }
        for (key, prefix) in [
            ("header_id_prefix", &self.header_id_prefix),
            ("body_id_prefix", &self.body_id_prefix),
        ] {
            if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
                return Err(ConfigError::Invalid(format!(
                    "{key} must be non-empty and contain no whitespace"
                )));
            }
        }
        Ok(())
    }
}
