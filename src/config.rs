use serde_derive::{Deserialize, Serialize};

use crate::classifier::Primitive;
use crate::lanes::LaneTopology;

/// Inclusive `diff_angle` bands, in degrees.
///
/// The gaps between bands (30..60, 120..165 and their mirrors) deliberately
/// classify as unknown: the tangent-angle signal is ambiguous there and
/// guessing a boundary was judged worse than reporting uncertainty.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct AngleBands {
    pub left: (f32, f32),
    pub right: (f32, f32),
    pub forward: (f32, f32),
    /// Absolute angle at or beyond which the maneuver is a u-turn.
    pub u_turn: f32,
}

impl Default for AngleBands {
    fn default() -> Self {
        Self {
            left: (-120.0, -60.0),
            right: (60.0, 120.0),
            forward: (-30.0, 30.0),
            u_turn: 165.0,
        }
    }
}

impl AngleBands {
    pub fn label(&self, diff_angle: f32) -> Primitive {
        if diff_angle >= self.left.0 && diff_angle <= self.left.1 {
            Primitive::Left
        } else if diff_angle >= self.right.0 && diff_angle <= self.right.1 {
            Primitive::Right
        } else if diff_angle >= self.forward.0 && diff_angle <= self.forward.1 {
            Primitive::Forward
        } else if diff_angle <= -self.u_turn || diff_angle >= self.u_turn {
            Primitive::UTurn
        } else {
            Primitive::Unknown
        }
    }
}

/// Raster window for trajectory plots, in scene coordinates.
///
/// The y axis is drawn in image convention (row grows downward), matching
/// the camera frames the scene coordinates come from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PlotWindow {
    pub width: u32,
    pub height: u32,
    pub min: (f32, f32),
    pub max: (f32, f32),
}

impl Default for PlotWindow {
    fn default() -> Self {
        Self {
            width: 650,
            height: 400,
            min: (-100.0, -100.0),
            max: (1100.0, 1100.0),
        }
    }
}

/// Tuned constants for one camera/scene calibration.
///
/// The defaults below come from a fixed traffic-intersection camera; the
/// distance threshold in particular is in scene distance units and must be
/// re-tuned for a different calibration.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum valid samples before a spline fit is attempted.
    pub min_valid_states: usize,
    /// Net begin-to-end displacement below which a trajectory is stopped.
    pub stop_distance: f32,
    pub angle_bands: AngleBands,
    pub lanes: LaneTopology,
    /// Simulated timesteps covered by one playback run.
    pub time_horizon: usize,
    pub plot: PlotWindow,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_valid_states: 20,
            stop_distance: 100.0,
            angle_bands: AngleBands::default(),
            lanes: LaneTopology::default(),
            time_horizon: 500,
            plot: PlotWindow::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds() {
        let config = AnalysisConfig::default();
        assert_eq!(config.min_valid_states, 20);
        assert_eq!(config.stop_distance, 100.0);
        assert_eq!(config.angle_bands.u_turn, 165.0);
        assert_eq!(config.time_horizon, 500);
    }

    #[test]
    fn band_edges_are_inclusive() {
        let bands = AngleBands::default();
        assert_eq!(bands.label(-120.0), Primitive::Left);
        assert_eq!(bands.label(-60.0), Primitive::Left);
        assert_eq!(bands.label(60.0), Primitive::Right);
        assert_eq!(bands.label(120.0), Primitive::Right);
        assert_eq!(bands.label(-30.0), Primitive::Forward);
        assert_eq!(bands.label(30.0), Primitive::Forward);
        assert_eq!(bands.label(165.0), Primitive::UTurn);
        assert_eq!(bands.label(-165.0), Primitive::UTurn);
    }

    #[test]
    fn gaps_between_bands_are_unknown() {
        let bands = AngleBands::default();
        assert_eq!(bands.label(45.0), Primitive::Unknown);
        assert_eq!(bands.label(-45.0), Primitive::Unknown);
        assert_eq!(bands.label(150.0), Primitive::Unknown);
        assert_eq!(bands.label(-140.0), Primitive::Unknown);
    }

    #[test]
    fn un_normalized_angles_beyond_180_are_u_turns() {
        let bands = AngleBands::default();
        assert_eq!(bands.label(200.0), Primitive::UTurn);
        assert_eq!(bands.label(-250.0), Primitive::UTurn);
    }

    #[test]
    fn deserializes_partial_override() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "stop_distance": 40.0, "lanes": { "left": { "2": 7 } } }"#)
                .unwrap();
        assert_eq!(config.stop_distance, 40.0);
        assert_eq!(config.min_valid_states, 20);
        assert_eq!(config.lanes.left.get(&2), Some(&7));
    }
}
