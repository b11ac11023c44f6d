use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::error::Error;
use crate::math;
use crate::spline::TrajectorySpline;

/// Lane membership within a fixed road-network topology.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lane {
    pub lane_index: u32,
}

/// One observed agent at one timestep.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct AgentState {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub heading: Option<f32>,
    #[serde(default)]
    pub lane: Option<Lane>,
}

impl AgentState {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            heading: None,
            lane: None,
        }
    }

    pub fn with_lane(x: f32, y: f32, lane_index: u32) -> Self {
        Self {
            x,
            y,
            heading: None,
            lane: Some(Lane { lane_index }),
        }
    }

    #[inline(always)]
    pub fn pos(&self) -> na::Point2<f32> {
        na::Point2::new(self.x, self.y)
    }
}

/// Time-ordered sequence of observed agent states.
///
/// Slot index is the discrete timestep. A slot may be empty (a missing or
/// invalid observation) or hold several states when the upstream association
/// merged detections; position queries over a timestep always average over
/// the states it holds. The playback cursor is the only mutable part and is
/// untouched by classification.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Trajectory {
    slots: Vec<Vec<AgentState>>,
    #[serde(skip)]
    cursor: Option<usize>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a state at `timestep`, growing the timeline as needed.
    /// Skipped timesteps stay empty and count as invalid.
    pub fn push(&mut self, timestep: usize, state: AgentState) {
        if self.slots.len() <= timestep {
            self.slots.resize_with(timestep + 1, Vec::new);
        }
        self.slots[timestep].push(state);
    }

    /// Number of timesteps holding at least one valid state.
    pub fn valid_len(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.valid_len() == 0
    }

    /// First timestep holding a valid state.
    pub fn first_timestep(&self) -> Option<usize> {
        self.slots.iter().position(|s| !s.is_empty())
    }

    /// Last timestep holding a valid state.
    pub fn last_timestep(&self) -> Option<usize> {
        self.slots.iter().rposition(|s| !s.is_empty())
    }

    pub fn states_at(&self, timestep: usize) -> &[AgentState] {
        self.slots
            .get(timestep)
            .map(|s| s.as_slice())
            .unwrap_or(&[])
    }

    /// Averaged position over every agent observed at `timestep`.
    pub fn mean_pose_at(&self, timestep: usize) -> Option<na::Point2<f32>> {
        math::mean_point(self.states_at(timestep).iter().map(AgentState::pos))
    }

    /// Lane descriptor at `timestep`, taken from the first agent.
    pub fn lane_at(&self, timestep: usize) -> Option<Lane> {
        self.states_at(timestep).first()?.lane
    }

    /// Averaged positions of the valid timesteps, in time order.
    pub fn points(&self) -> impl Iterator<Item = na::Point2<f32>> + '_ {
        self.slots
            .iter()
            .filter_map(|s| math::mean_point(s.iter().map(AgentState::pos)))
    }

    /// Fits a smoothing parametric curve to the valid positions.
    pub fn fit_spline(&self) -> Result<TrajectorySpline, Error> {
        Ok(TrajectorySpline::fit(self.points().collect())?)
    }

    /// Resets the playback cursor to before the first valid timestep.
    pub fn rewind(&mut self) {
        self.cursor = None;
    }

    /// Steps the playback cursor forward one timestep and yields the averaged
    /// position there. `None` for a missing sample or past the end; the
    /// cursor still moves on a missing sample, keeping playback in sync with
    /// the simulated clock.
    pub fn advance(&mut self) -> Option<na::Point2<f32>> {
        let idx = match self.cursor {
            Some(c) => c + 1,
            None => self.first_timestep()?,
        };

        if idx >= self.slots.len() {
            return None;
        }

        self.cursor = Some(idx);
        self.mean_pose_at(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_gap() -> Trajectory {
        let mut t = Trajectory::new();
        t.push(2, AgentState::at(0.0, 0.0));
        t.push(3, AgentState::at(1.0, 0.0));
        // timestep 4 missing
        t.push(5, AgentState::at(3.0, 0.0));
        t
    }

    #[test]
    fn valid_len_ignores_gaps() {
        let t = with_gap();
        assert_eq!(t.len(), 6);
        assert_eq!(t.valid_len(), 3);
    }

    #[test]
    fn first_and_last_skip_invalid_slots() {
        let t = with_gap();
        assert_eq!(t.first_timestep(), Some(2));
        assert_eq!(t.last_timestep(), Some(5));
        assert_eq!(Trajectory::new().first_timestep(), None);
    }

    #[test]
    fn mean_pose_averages_merged_agents() {
        let mut t = Trajectory::new();
        t.push(0, AgentState::at(0.0, 0.0));
        t.push(0, AgentState::at(4.0, 2.0));
        assert_eq!(t.mean_pose_at(0), Some(nalgebra::Point2::new(2.0, 1.0)));
        assert_eq!(t.mean_pose_at(1), None);
    }

    #[test]
    fn lane_taken_from_first_agent() {
        let mut t = Trajectory::new();
        t.push(0, AgentState::with_lane(0.0, 0.0, 4));
        t.push(0, AgentState::with_lane(0.5, 0.0, 9));
        assert_eq!(t.lane_at(0), Some(Lane { lane_index: 4 }));
        assert_eq!(t.lane_at(1), None);
    }

    #[test]
    fn advance_starts_at_first_valid_timestep() {
        let mut t = with_gap();
        assert_eq!(t.advance(), Some(nalgebra::Point2::new(0.0, 0.0)));
        assert_eq!(t.advance(), Some(nalgebra::Point2::new(1.0, 0.0)));
    }

    #[test]
    fn advance_yields_none_for_gap_but_keeps_stepping() {
        let mut t = with_gap();
        t.advance();
        t.advance();
        assert_eq!(t.advance(), None); // the gap at timestep 4
        assert_eq!(t.advance(), Some(nalgebra::Point2::new(3.0, 0.0)));
        assert_eq!(t.advance(), None); // exhausted
        assert_eq!(t.advance(), None);
    }

    #[test]
    fn rewind_restarts_playback() {
        let mut t = with_gap();
        t.advance();
        t.advance();
        t.rewind();
        assert_eq!(t.advance(), Some(nalgebra::Point2::new(0.0, 0.0)));
    }
}
