//! Canvas configuration.

use crate::error::{CanvasError, CanvasResult};
use crate::grid::GRID_SIZE;
use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Whether occupied cells block placement and moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupancyPolicy {
    /// Placements and moves onto claimed cells are rejected.
    #[default]
    Enforce,
    /// Cells are tracked but never block anything.
    Advisory,
}

impl OccupancyPolicy {
    /// Check if collisions reject placements and moves.
    pub fn is_enforced(self) -> bool {
        self == OccupancyPolicy::Enforce
    }
}

/// Configuration fixed for the lifetime of a canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Grid cell size in world units.
    pub grid_size: f64,
    /// Minimum zoom scale.
    pub min_zoom: f64,
    /// Maximum zoom scale.
    pub max_zoom: f64,
    /// Initial screen width in pixels.
    pub screen_width: f64,
    /// Initial screen height in pixels.
    pub screen_height: f64,
    /// World bounds as a multiple of the initial screen size.
    pub world_scale: f64,
    /// Multiplicative step applied by `zoom_in`.
    pub zoom_in_step: f64,
    /// Multiplicative step applied by `zoom_out`.
    pub zoom_out_step: f64,
    /// Collision behavior.
    pub occupancy: OccupancyPolicy,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            min_zoom: 0.5,
            max_zoom: 3.0,
            screen_width: 1280.0,
            screen_height: 800.0,
            world_scale: 5.0,
            zoom_in_step: 1.2,
            zoom_out_step: 0.8,
            occupancy: OccupancyPolicy::default(),
        }
    }
}

impl CanvasConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant the engine relies on.
    pub fn validate(&self) -> CanvasResult<()> {
        fn positive(name: &str, value: f64) -> CanvasResult<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(CanvasError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )))
            }
        }

        positive("grid_size", self.grid_size)?;
        positive("min_zoom", self.min_zoom)?;
        positive("max_zoom", self.max_zoom)?;
        positive("screen_width", self.screen_width)?;
        positive("screen_height", self.screen_height)?;
        positive("zoom_in_step", self.zoom_in_step)?;
        positive("zoom_out_step", self.zoom_out_step)?;

        if self.min_zoom > self.max_zoom {
            return Err(CanvasError::InvalidConfig(format!(
                "min_zoom ({}) exceeds max_zoom ({})",
                self.min_zoom, self.max_zoom
            )));
        }
        if !self.world_scale.is_finite() || self.world_scale < 1.0 {
            return Err(CanvasError::InvalidConfig(format!(
                "world_scale must be at least 1, got {}",
                self.world_scale
            )));
        }
        Ok(())
    }

    /// Initial screen size.
    pub fn screen_size(&self) -> Size {
        Size::new(self.screen_width, self.screen_height)
    }

    /// World rectangle that the viewport may show.
    pub fn world_bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.screen_width * self.world_scale,
            self.screen_height * self.world_scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CanvasConfig::default().validate().is_ok());
    }

    #[test]
    fn test_world_bounds() {
        let config = CanvasConfig::default();
        let bounds = config.world_bounds();
        assert!((bounds.width() - 6400.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 4000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_bad_grid() {
        let config = CanvasConfig {
            grid_size: 0.0,
            ..CanvasConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CanvasError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_inverted_zoom() {
        let config = CanvasConfig {
            min_zoom: 4.0,
            max_zoom: 2.0,
            ..CanvasConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = CanvasConfig::from_json(r#"{ "grid_size": 10, "occupancy": "advisory" }"#)
            .unwrap();
        assert!((config.grid_size - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.occupancy, OccupancyPolicy::Advisory);
        assert!((config.max_zoom - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            CanvasConfig::from_json("{ grid_size"),
            Err(CanvasError::ConfigParse(_))
        ));
    }
}
