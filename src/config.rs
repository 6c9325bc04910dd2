//! Runtime configuration
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides. Files are YAML or JSON, chosen by extension.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Pan/zoom limits, grid and placement band of the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale change per wheel notch
    pub wheel_step: f64,
    /// Scale change per zoom button press
    pub button_step: f64,
    /// Snapping cell size in world units
    pub grid_size: f64,
    pub placement_radius_min: f64,
    pub placement_radius_max: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 3.0,
            wheel_step: 0.1,
            button_step: 0.2,
            grid_size: 50.0,
            placement_radius_min: 300.0,
            placement_radius_max: 500.0,
            viewport_width: 1280.0,
            viewport_height: 720.0,
        }
    }
}

impl CanvasConfig {
    /// Check scale range, grid size and placement band
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.min_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "canvas.min_scale must be positive, got {}",
                self.min_scale
            )));
        }
        if self.min_scale > self.max_scale {
            return Err(ConfigError::Invalid(format!(
                "canvas.min_scale ({}) exceeds canvas.max_scale ({})",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.grid_size > 0.0 && self.grid_size.is_finite()) {
            return Err(ConfigError::Invalid("canvas.grid_size must be positive".to_string()));
        }
        if !(self.placement_radius_min >= 0.0) || self.placement_radius_min > self.placement_radius_max {
            return Err(ConfigError::Invalid(format!(
                "placement band [{}, {}] is not ordered",
                self.placement_radius_min, self.placement_radius_max
            )));
        }
        Ok(())
    }
}

/// Node box size, used for edge geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub vertex_width: f64,
    pub vertex_height: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            vertex_width: 80.0,
            vertex_height: 80.0,
        }
    }
}

/// Limits and vocabulary of the recommendation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    pub similar_limit: usize,
    pub complementary_limit: usize,
    pub development_limit: usize,
    /// Size of the trending-tags, common-mistakes and top-events lists
    pub summary_limit: usize,
    /// Tags of the virtual "ideal self" profile
    pub center_profile_tags: Vec<String>,
    /// Lower-case tag -> development direction, checked in event tag order
    pub directions: IndexMap<String, String>,
    pub default_direction: String,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        let directions = [
            ("#hackathon", "Technical skills"),
            ("#meetup", "Networking"),
            ("#conference", "Professional growth"),
            ("#workshop", "Practical skills"),
            ("#lecture", "Theoretical knowledge"),
            ("#marathon", "Endurance and persistence"),
            ("#competition", "Competitive skills"),
            ("#exhibition", "Creative approach"),
            ("#training", "Personal growth"),
            ("#challenge", "Problem solving"),
            ("#event", "Event organization"),
        ]
        .into_iter()
        .map(|(tag, direction)| (tag.to_string(), direction.to_string()))
        .collect();

        Self {
            similar_limit: 5,
            complementary_limit: 3,
            development_limit: 5,
            summary_limit: 5,
            center_profile_tags: vec![
                "#development".to_string(),
                "#direction".to_string(),
                "#potential".to_string(),
            ],
            directions,
            default_direction: "General development".to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub canvas: CanvasConfig,
    pub graph: GraphConfig,
    pub recommend: RecommendConfig,
}

impl FolioConfig {
    /// Load from a `.json`, `.yaml` or `.yml` file and validate
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json(&text)?
        } else {
            Self::from_yaml(&text)?
        };
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> ConfigResult<Self> {
        let config: FolioConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let config: FolioConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.canvas.validate()?;
        if !(self.graph.vertex_width > 0.0 && self.graph.vertex_height > 0.0) {
            return Err(ConfigError::Invalid("vertex size must be positive".to_string()));
        }
        debug!("Configuration validated");
        Ok(())
    }
}
