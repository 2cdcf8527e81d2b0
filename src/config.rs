//! Engine configuration, parsed from an optional JSON object supplied by the host.
//!
//! Every field is optional; missing fields take the defaults in
//! [`crate::consts`]. For example:
//!
//! ```json
//! { "cell_size": 16, "min_scale": 0.5, "initial_color": "#3366ff" }
//! ```

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::color::Color;
use crate::consts::{
    CELL_SIZE, DEFAULT_BACKGROUND, DEFAULT_COLOR, DEFAULT_GRID_LINE_COLOR, DEFAULT_HOVER_COLOR, GRID_COLS, GRID_ROWS,
    MAX_SCALE, MIN_SCALE, SHADE_STEP, ZOOM_SENSITIVITY,
};
use crate::grid::GridGeometry;

/// Error returned by [`GridConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid scale bounds: min {min} must be positive and not exceed max {max}")]
    ScaleBounds { min: f64, max: f64 },
    #[error("{field} must be a positive finite number")]
    NonPositive { field: &'static str },
    #[error("grid extent must be at least one cell in each direction")]
    EmptyGrid,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub cell_size: f64,
    pub grid_cols: u32,
    pub grid_rows: u32,
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_sensitivity: f64,
    pub shade_step: u8,
    pub initial_color: Color,
    pub background: Color,
    pub grid_line_color: Color,
    pub hover_color: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            grid_cols: GRID_COLS,
            grid_rows: GRID_ROWS,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            zoom_sensitivity: ZOOM_SENSITIVITY,
            shade_step: SHADE_STEP,
            initial_color: DEFAULT_COLOR,
            background: DEFAULT_BACKGROUND,
            grid_line_color: DEFAULT_GRID_LINE_COLOR,
            hover_color: DEFAULT_HOVER_COLOR.to_string(),
        }
    }
}

impl GridConfig {
    /// Parse and validate a JSON config. Blank input yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on malformed JSON or out-of-range values.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("cell_size", self.cell_size)?;
        positive("zoom_sensitivity", self.zoom_sensitivity)?;
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale && self.max_scale.is_finite()) {
            return Err(ConfigError::ScaleBounds { min: self.min_scale, max: self.max_scale });
        }
        if self.grid_cols == 0 || self.grid_rows == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        Ok(())
    }

    #[must_use]
    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::new(self.cell_size, self.grid_cols, self.grid_rows)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field })
    }
}
