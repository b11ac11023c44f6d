use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::classifier::Primitive;

/// Lane-index adjacency for one scene's road topology.
///
/// Each table maps an originating lane index to the lane index reached by a
/// particular maneuver. The tables are built once from static scene
/// configuration and are authoritative: when a trajectory carries lane
/// evidence at both endpoints, a matching transition decides the label
/// before any angle reasoning.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct LaneTopology {
    pub forward: HashMap<u32, u32>,
    pub left: HashMap<u32, u32>,
    pub right: HashMap<u32, u32>,
}

impl LaneTopology {
    pub fn new(
        forward: HashMap<u32, u32>,
        left: HashMap<u32, u32>,
        right: HashMap<u32, u32>,
    ) -> Self {
        Self {
            forward,
            left,
            right,
        }
    }

    /// The maneuver that takes `begin` to `end`, if any table maps it.
    /// Tables are consulted in forward, left, right order.
    pub fn maneuver(&self, begin: u32, end: u32) -> Option<Primitive> {
        if self.forward.get(&begin) == Some(&end) {
            Some(Primitive::Forward)
        } else if self.left.get(&begin) == Some(&end) {
            Some(Primitive::Left)
        } else if self.right.get(&begin) == Some(&end) {
            Some(Primitive::Right)
        } else {
            None
        }
    }
}
