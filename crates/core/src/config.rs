//! Tunable layout and interaction constants of the timeline view.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// View configuration. Every field has a default, so a JSON file only needs
/// to list the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Y of the first lane; the band above holds the info text.
    pub lane_y_begin: f64,
    pub lane_height: f64,
    pub collapsed_lane_height: f64,
    /// Vertical inset of event marks inside a lane.
    pub event_inset_y: f64,

    /// Maximum pointer-to-event distance for hover, in pixels.
    pub hover_distance_px: f64,
    /// Scale of the per-mark alpha boost in the density renderer.
    pub intensity_factor: f64,

    pub wheel_zoom_factor: f64,
    pub mouse_zoom_factor: f64,
    pub key_zoom_factor: f64,
    /// Fraction of the event span added on each side by zoom-all.
    pub zoom_all_padding: f64,
    pub zoom_to_selection_scale: f64,

    /// Above this many selected events only a total is reported.
    pub max_list_events: usize,
    /// Minimum spacing of time grid lines, in pixels.
    pub min_grid_size: f64,

    /// Pointer-down at `x < collapse_zone_width` toggles the lane.
    pub collapse_zone_width: f64,
    /// Pointer-down before `rename_zone_width` requests a rename.
    pub rename_zone_width: f64,

    pub label_height: f64,
    pub label_inset_x: f64,
    pub label_inset_y: f64,
    pub label_padding: f64,
    pub label_corner_radius: f64,
    pub label_font_size: f64,
    pub info_font_size: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            lane_y_begin: 20.0,
            lane_height: 50.0,
            collapsed_lane_height: 20.0,
            event_inset_y: 6.0,
            hover_distance_px: 10.0,
            intensity_factor: 0.3,
            wheel_zoom_factor: 1.5,
            mouse_zoom_factor: 4.5,
            key_zoom_factor: 1.3,
            zoom_all_padding: 0.5,
            zoom_to_selection_scale: 0.9,
            max_list_events: 150,
            min_grid_size: 5.0,
            collapse_zone_width: 20.0,
            rename_zone_width: 40.0,
            label_height: 18.0,
            label_inset_x: 6.0,
            label_inset_y: 1.0,
            label_padding: 10.0,
            label_corner_radius: 7.0,
            label_font_size: 11.0,
            info_font_size: 10.0,
        }
    }
}

impl ViewConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Height of a lane in its current collapse state.
    pub fn lane_height_for(&self, collapsed: bool) -> f64 {
        if collapsed {
            self.collapsed_lane_height
        } else {
            self.lane_height
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ViewConfig::from_json_str(r#"{ "hover_distance_px": 4, "max_list_events": 10 }"#)
            .unwrap();
        assert_eq!(config.hover_distance_px, 4.0);
        assert_eq!(config.max_list_events, 10);
        assert_eq!(config.lane_height, 50.0);
        assert_eq!(config.intensity_factor, 0.3);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(ViewConfig::from_json_str("{}").unwrap(), ViewConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = ViewConfig::from_json_str("{ lane_height: }").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ViewConfig::from_json_file("/nonexistent/tracelane.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tracelane.json"));
    }

    #[test]
    fn collapsed_lanes_are_shorter() {
        let config = ViewConfig::default();
        assert_eq!(config.lane_height_for(false), 50.0);
        assert_eq!(config.lane_height_for(true), 20.0);
    }

    #[test]
    fn round_trips_through_json() {
        let config = ViewConfig {
            wheel_zoom_factor: 2.0,
            ..ViewConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ViewConfig::from_json_str(&json).unwrap(), config);
    }
}
