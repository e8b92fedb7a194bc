//! # Engine Configuration
//!
//! One place for every tunable of a playback session: tick period, field and
//! screen geometry, arrow scale, colors and the column mapping.
//!
//! ## Presets
//! ```rust
//! use gridiron_core::config::EngineConfig;
//!
//! let continuous = EngineConfig::continuous();
//! let snapshot = EngineConfig::snapshot();
//! assert!(snapshot.vector_scale > continuous.vector_scale);
//! ```

use crate::coords::{
    CoordinateMapper, FieldSpec, ScreenSpec, CONTINUOUS_VECTOR_SCALE, SNAPSHOT_VECTOR_SCALE,
};
use crate::error::{EngineError, Result};
use crate::ingest::ColumnMapping;
use crate::playback::DEFAULT_INTERVAL_MS;
use crate::render::{FrameComposer, Palette};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Tick period while playing (default: 100)
    pub interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { interval_ms: DEFAULT_INTERVAL_MS }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub playback: PlaybackConfig,
    pub field: FieldSpec,
    pub screen: ScreenSpec,
    /// Pixels of arrow per unit of speed (default: 0.5)
    pub vector_scale: f64,
    pub palette: Palette,
    pub columns: ColumnMapping,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            field: FieldSpec::default(),
            screen: ScreenSpec::default(),
            vector_scale: CONTINUOUS_VECTOR_SCALE,
            palette: Palette::default(),
            columns: ColumnMapping::default(),
        }
    }
}

impl EngineConfig {
    /// Animated playback (default)
    pub fn continuous() -> Self {
        Self::default()
    }

    /// Single still view: longer arrows, brown ball
    pub fn snapshot() -> Self {
        Self { vector_scale: SNAPSHOT_VECTOR_SCALE, palette: Palette::snapshot(), ..Self::default() }
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.playback.interval_ms == 0 {
            return Err(EngineError::InvalidConfig("playback.interval_ms must be positive".into()));
        }
        let dimensions = [
            ("field.width_units", self.field.width_units),
            ("field.height_units", self.field.height_units),
            ("screen.width_px", self.screen.width_px),
            ("screen.height_px", self.screen.height_px),
        ];
        for (name, value) in dimensions {
            if !(value.is_finite() && value > 0.0) {
                return Err(EngineError::InvalidConfig(format!("{name} must be positive, got {value}")));
            }
        }
        if !self.vector_scale.is_finite() {
            return Err(EngineError::InvalidConfig(format!(
                "vector_scale must be finite, got {}",
                self.vector_scale
            )));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.playback.interval_ms)
    }

    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::builder()
            .field(self.field)
            .screen_size(self.screen.width_px, self.screen.height_px)
            .vector_scale(self.vector_scale)
            .build()
    }

    pub fn composer(&self) -> FrameComposer {
        FrameComposer::new(self.mapper(), self.palette)
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Rgb;

    #[test]
    fn test_default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.playback.interval_ms, 100);
        assert!((cfg.field.width_units - 120.0).abs() < 1e-9);
        assert!((cfg.field.height_units - 53.3).abs() < 1e-9);
        assert!((cfg.vector_scale - 0.5).abs() < 1e-9);
        assert_eq!(cfg.columns, ColumnMapping::default());
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_snapshot_preset() {
        let cfg = EngineConfig::snapshot();
        assert!((cfg.vector_scale - 2.0).abs() < 1e-9);
        assert_eq!(cfg.palette.ball, Rgb::SADDLE_BROWN);
        assert_eq!(cfg.playback, EngineConfig::continuous().playback);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let cfg = EngineConfig::from_yaml_str(
            "playback:\n  interval_ms: 40\ncolumns:\n  entity_name: displayName\n",
        )
        .unwrap();
        assert_eq!(cfg.playback.interval_ms, 40);
        assert_eq!(cfg.columns.entity_name, "displayName");
        assert_eq!(cfg.columns.play_id, "playId");
        assert!((cfg.screen.width_px - 960.0).abs() < 1e-9);
    }

    #[test]
    fn test_json_round_trip() {
        let cfg = EngineConfig::snapshot();
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), cfg);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = EngineConfig::from_json_str(r#"{"playback": {"interval_ms": 0}}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));

        let err = EngineConfig::from_json_str(r#"{"screen": {"width_px": -5.0}}"#).unwrap_err();
        assert!(err.to_string().contains("screen.width_px"));
    }

    #[test]
    fn test_malformed_input_is_a_parse_error() {
        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
        let err = EngineConfig::from_yaml_str("playback: [1, 2").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn test_composer_uses_geometry() {
        let mut cfg = EngineConfig::default();
        cfg.screen = ScreenSpec { width_px: 1200.0, height_px: 533.0 };
        let mapper = *cfg.composer().mapper();
        let p = mapper.project(120.0, 53.3);
        assert!((p.x - 1200.0).abs() < 1e-9);
        assert!((p.y - 533.0).abs() < 1e-9);
    }
}
