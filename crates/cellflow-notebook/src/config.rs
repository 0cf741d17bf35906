//! Notebook configuration
//!
//! Every field has a default, so a JSON document only needs the settings it
//! changes:
//!
//! ```rust
//! use cellflow_notebook::NotebookConfig;
//!
//! let config = NotebookConfig::from_json_str(r#"{ "seed": 7, "samples": { "value": 500 } }"#).unwrap();
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.samples.value, 500);
//! assert_eq!(config.samples.max, 1000);
//! ```

use crate::error::{Error, Result};
use cellflow_core::{Widget, WidgetDomain};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Integer slider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntSliderConfig {
    pub label: String,
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub value: i64,
}

impl Default for IntSliderConfig {
    fn default() -> Self {
        Self {
            label: "Number of samples (n)".to_string(),
            min: 50,
            max: 1000,
            step: 1,
            value: 300,
        }
    }
}

impl IntSliderConfig {
    /// Build the widget
    pub fn widget(&self, id: &str) -> Result<Widget> {
        let domain = WidgetDomain::IntSlider {
            min: self.min,
            max: self.max,
            step: self.step,
        };
        Ok(Widget::new(id, self.label.as_str(), domain, self.value)?)
    }
}

/// Float slider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatSliderConfig {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

impl Default for FloatSliderConfig {
    fn default() -> Self {
        Self {
            label: "Noise standard deviation (σ)".to_string(),
            min: 0.0,
            max: 5.0,
            step: 0.1,
            value: 1.0,
        }
    }
}

impl FloatSliderConfig {
    /// Build the widget
    pub fn widget(&self, id: &str) -> Result<Widget> {
        let domain = WidgetDomain::float_slider(self.min, self.max, self.step);
        Ok(Widget::new(id, self.label.as_str(), domain, self.value)?)
    }
}

/// Settings of the regression notebook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotebookConfig {
    /// Seed of the synthetic data stream, reused on every execution
    pub seed: u64,
    /// Sample count slider
    pub samples: IntSliderConfig,
    /// Noise standard deviation slider
    pub noise: FloatSliderConfig,
    /// Slope of the generating model
    pub true_slope: f64,
    /// Intercept of the generating model
    pub true_intercept: f64,
    /// Points on the plotted fitted line
    pub line_resolution: usize,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            samples: IntSliderConfig::default(),
            noise: FloatSliderConfig::default(),
            true_slope: 2.0,
            true_intercept: 3.0,
            line_resolution: 100,
        }
    }
}

impl NotebookConfig {
    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check settings that widget construction does not cover
    pub fn validate(&self) -> Result<()> {
        if self.line_resolution < 2 {
            return Err(Error::InvalidConfig(format!(
                "line_resolution must be at least 2, got {}",
                self.line_resolution
            )));
        }
        if !self.true_slope.is_finite() || !self.true_intercept.is_finite() {
            return Err(Error::InvalidConfig(
                "true_slope and true_intercept must be finite".to_string(),
            ));
        }
        if self.samples.min < 0 {
            return Err(Error::InvalidConfig(format!(
                "samples.min must be non-negative, got {}",
                self.samples.min
            )));
        }
        Ok(())
    }
}
