//! Combined layout and render settings.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "layout": { "h_spacing": 30 }, "render": { "padding": 24 }, "not_glyph": "!" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DiagramError, Result};
use crate::layout::LayoutConfig;
use crate::render::RenderConfig;

/// All settings of the normalize → layout → render pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    /// Inversion glyph overriding the response's notation style
    pub not_glyph: Option<String>,
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DiagramError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Check every numeric setting.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.render.validate()?;
        if self.not_glyph.as_deref() == Some("") {
            return Err(DiagramError::invalid_config("not_glyph must not be empty"));
        }
        Ok(())
    }
}
