use log::debug;
use nalgebra as na;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

use crate::config::AnalysisConfig;
use crate::error::Error;
use crate::math;
use crate::trajectory::Trajectory;

/// Coarse maneuver label for a trajectory.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Primitive {
    Forward,
    Left,
    Right,
    UTurn,
    Stopped,
    /// Too little data, or an angular signature in none of the bands.
    Unknown,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Primitive::Forward => "forward",
            Primitive::Left => "left",
            Primitive::Right => "right",
            Primitive::UTurn => "u-turn",
            Primitive::Stopped => "stopped",
            Primitive::Unknown => "unknown",
        })
    }
}

/// Labels a trajectory with one maneuver primitive.
///
/// Signal precedence: net displacement first (a nearly stationary trajectory
/// has no reliable tangent signal), then the symbolic lane transition when
/// both endpoints carry one, then the tangent-angle bands. Holds only a
/// borrow of the scene configuration; classification is a pure function of
/// the trajectory and the config.
pub struct PrimitiveClassifier<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> PrimitiveClassifier<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// `Err` only on a degenerate curve fit; everything else is a label.
    pub fn classify(&self, trajectory: &Trajectory) -> Result<Primitive, Error> {
        let valid_len = trajectory.valid_len();
        if valid_len < self.config.min_valid_states {
            debug!("trajectory too short with length {}", valid_len);
            return Ok(Primitive::Unknown);
        }

        let spline = trajectory.fit_spline()?;
        let u_len = spline.u_len() as isize;

        let begin_angle = math::mean_heading_degrees(&spline.smoothed_points(0, u_len / 10));
        let end_angle = math::mean_heading_degrees(&spline.smoothed_points(-(u_len / 10), -1));
        let diff_angle = end_angle - begin_angle;

        // valid_len passed the gate, so both endpoints exist
        let (first, last) = match (trajectory.first_timestep(), trajectory.last_timestep()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Ok(Primitive::Unknown),
        };
        let (begin_pose, end_pose) =
            match (trajectory.mean_pose_at(first), trajectory.mean_pose_at(last)) {
                (Some(begin), Some(end)) => (begin, end),
                _ => return Ok(Primitive::Unknown),
            };

        let dist = na::distance(&begin_pose, &end_pose);
        if dist < self.config.stop_distance {
            debug!("displacement {:.1} below stop threshold", dist);
            return Ok(Primitive::Stopped);
        }

        let begin_lane = trajectory.lane_at(first);
        let end_lane = trajectory.lane_at(last);
        debug!("lanes: {:?} -> {:?}", begin_lane, end_lane);

        if let (Some(begin), Some(end)) = (begin_lane, end_lane) {
            if let Some(label) = self
                .config
                .lanes
                .maneuver(begin.lane_index, end.lane_index)
            {
                return Ok(label);
            }
        }

        debug!(
            "angles: {:.2} - {:.2} = {:.2}",
            end_angle, begin_angle, diff_angle
        );
        Ok(self.config.angle_bands.label(diff_angle))
    }
}
