//! Camera director configuration.
//!
//! Loaded once when a combat scene starts and validated before any region
//! exists. All distances are in world units unless noted otherwise.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::NormRect;

/// Hard space kept between framed entities and the edge of their frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Buffers {
    pub top: f32,
    pub bottom: f32,
    /// Applied to both the left and the right side.
    pub side: f32,
}

impl Default for Buffers {
    fn default() -> Self {
        Self {
            top: 2.0,
            bottom: 1.0,
            side: 2.0,
        }
    }
}

/// Fixed-range radar view pinned to the primary entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// World units of width always visible on the radar.
    pub range: f32,
    /// Horizontal distance kept between the tracked entity and the frame edge.
    pub edge_buffer_x: f32,
    /// Vertical distance kept between the tracked entity and the frame bottom.
    pub edge_buffer_y: f32,
    /// Screen area the radar renders into (never subdivided).
    pub zone: NormRect,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            range: 200.0,
            edge_buffer_x: 6.0,
            edge_buffer_y: 4.0,
            zone: NormRect::new(0.35, 0.02, 0.3, 0.12),
        }
    }
}

/// Screen shake settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    /// Globally disables shake when false (player accessibility setting).
    pub enabled: bool,
    /// Seed for the deterministic shake noise.
    pub seed: u64,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: 12345,
        }
    }
}

/// Complete configuration of the camera director.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Number of region slots (primary, radar and opponent regions all take one).
    pub max_concurrent_regions: usize,
    /// Horizontal distance below which an opponent region becomes active.
    pub engagement_distance: f32,
    /// Horizontal distance below which an opponent is folded into the primary region.
    pub share_distance: f32,
    pub buffers: Buffers,
    /// Gap between adjacent opponent regions, in canvas units.
    pub separator_width: f32,
    /// Canvas width used to convert `separator_width` into normalized units.
    pub canvas_reference_width: f32,
    /// Low-pass rate (per second) for the horizontal follow offset.
    pub horizontal_offset_smoothing: f32,
    pub minimum_zoom: f32,
    /// Screen area of the primary region.
    pub primary_zone: NormRect,
    /// Screen area shared by the active opponent regions.
    pub engagement_zone: NormRect,
    pub radar: Option<RadarConfig>,
    pub shake: ShakeConfig,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            max_concurrent_regions: 6,
            engagement_distance: 60.0,
            share_distance: 25.0,
            buffers: Buffers::default(),
            separator_width: 16.0,
            canvas_reference_width: 1920.0,
            horizontal_offset_smoothing: 6.0,
            minimum_zoom: 4.0,
            primary_zone: NormRect::FULL,
            engagement_zone: NormRect::new(0.02, 0.6, 0.96, 0.38),
            radar: Some(RadarConfig::default()),
            shake: ShakeConfig::default(),
        }
    }
}

impl CameraConfig {
    /// Parses a config from JSON and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CameraConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Separator width converted to normalized screen units.
    pub fn separator_normalized(&self) -> f32 {
        self.separator_width / self.canvas_reference_width
    }

    /// Rejects configurations that would break runtime invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_regions == 0 {
            return Err(ConfigError::NoRegionSlots);
        }

        non_negative("engagement_distance", self.engagement_distance)?;
        non_negative("share_distance", self.share_distance)?;
        non_negative("buffers.top", self.buffers.top)?;
        non_negative("buffers.bottom", self.buffers.bottom)?;
        non_negative("buffers.side", self.buffers.side)?;
        non_negative("separator_width", self.separator_width)?;
        non_negative("horizontal_offset_smoothing", self.horizontal_offset_smoothing)?;
        positive("canvas_reference_width", self.canvas_reference_width)?;
        positive("minimum_zoom", self.minimum_zoom)?;

        if self.share_distance >= self.engagement_distance {
            return Err(ConfigError::NoHysteresis {
                share: self.share_distance,
                engagement: self.engagement_distance,
            });
        }

        if !self.primary_zone.is_normalized() {
            return Err(ConfigError::ZoneOutOfBounds {
                name: "primary_zone",
            });
        }
        self.check_engagement_zone(self.engagement_zone)?;

        if let Some(radar) = &self.radar {
            positive("radar.range", radar.range)?;
            non_negative("radar.edge_buffer_x", radar.edge_buffer_x)?;
            non_negative("radar.edge_buffer_y", radar.edge_buffer_y)?;
            if !radar.zone.is_normalized() {
                return Err(ConfigError::ZoneOutOfBounds { name: "radar.zone" });
            }
        }

        Ok(())
    }

    /// Checks that `zone` lies on screen and leaves room for every opponent
    /// region once the separators are taken out.
    pub fn check_engagement_zone(&self, zone: NormRect) -> Result<(), ConfigError> {
        if !zone.is_normalized() {
            return Err(ConfigError::ZoneOutOfBounds {
                name: "engagement_zone",
            });
        }

        let separators = self.separator_normalized() * self.max_concurrent_regions as f32;
        if self.separator_width > 0.0 && separators >= zone.width {
            return Err(ConfigError::NotPositive {
                name: "engagement_zone.width minus separators",
                value: zone.width - separators,
            });
        }
        Ok(())
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeValue { name, value })
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CameraConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_missing_hysteresis() {
        let config = CameraConfig {
            engagement_distance: 10.0,
            share_distance: 10.0,
            ..CameraConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoHysteresis { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_share_distance() {
        let config = CameraConfig {
            share_distance: -1.0,
            ..CameraConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeValue {
                name: "share_distance",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_zero_slots_and_zoom() {
        let config = CameraConfig {
            max_concurrent_regions: 0,
            ..CameraConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoRegionSlots)));

        let config = CameraConfig {
            minimum_zoom: 0.0,
            ..CameraConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { name: "minimum_zoom", .. })
        ));
    }

    #[test]
    fn test_rejects_zone_outside_screen() {
        let config = CameraConfig {
            engagement_zone: NormRect::new(0.5, 0.5, 0.6, 0.2),
            ..CameraConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZoneOutOfBounds {
                name: "engagement_zone"
            })
        ));
    }

    #[test]
    fn test_separator_conversion() {
        let config = CameraConfig {
            separator_width: 38.4,
            canvas_reference_width: 1920.0,
            ..CameraConfig::default()
        };
        assert!((config.separator_normalized() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_from_json_partial() {
        let config = CameraConfig::from_json_str(
            r#"{ "engagement_distance": 10.0, "share_distance": 3.0, "radar": null }"#,
        )
        .unwrap();
        assert_eq!(config.engagement_distance, 10.0);
        assert_eq!(config.share_distance, 3.0);
        assert!(config.radar.is_none());
        assert_eq!(config.buffers, Buffers::default());
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let result = CameraConfig::from_json_str(
            r#"{ "engagement_distance": 3.0, "share_distance": 10.0 }"#,
        );
        assert!(matches!(result, Err(ConfigError::NoHysteresis { .. })));
        assert!(matches!(
            CameraConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
