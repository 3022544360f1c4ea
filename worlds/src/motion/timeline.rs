use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::action::MotionAction;
use crate::scene::NodeId;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    CameraMove,
    BackdropRotate,
    ClusterRotate,
    EndingCollapse,
}

impl PhaseKind {
    pub const ALL: [PhaseKind; 4] = [
        Self::CameraMove,
        Self::BackdropRotate,
        Self::ClusterRotate,
        Self::EndingCollapse,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::CameraMove => "camera-move",
            Self::BackdropRotate => "skybox-rotate",
            Self::ClusterRotate => "cluster-rotate",
            Self::EndingCollapse => "ending-collapse",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A span of the timeline plus the actions that realize it. Looping phases
/// declare the whole track as their duration; the runtime keeps them going
/// until teardown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub start: f32,
    pub duration: f32,
    pub looping: bool,
    pub assignments: Vec<(NodeId, MotionAction)>,
}

impl Phase {
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }
}

/// Ordered phases, all measured against one audio-track duration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub total_duration: f32,
    phases: IndexMap<PhaseKind, Phase>,
}

impl Timeline {
    pub fn new(total_duration: f32) -> Self {
        Self {
            total_duration,
            phases: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, kind: PhaseKind, phase: Phase) {
        self.phases.insert(kind, phase);
    }

    pub fn phase(&self, kind: PhaseKind) -> Option<&Phase> {
        self.phases.get(&kind)
    }

    pub fn phases(&self) -> impl Iterator<Item = (&PhaseKind, &Phase)> {
        self.phases.iter()
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Phase start as a fraction of the track.
    pub fn start_ratio(&self, kind: PhaseKind) -> Option<f32> {
        self.phase(kind).map(|p| p.start / self.total_duration)
    }

    pub fn duration_ratio(&self, kind: PhaseKind) -> Option<f32> {
        self.phase(kind).map(|p| p.duration / self.total_duration)
    }

    pub fn action_count(&self) -> usize {
        self.phases.values().map(|p| p.assignments.len()).sum()
    }

    /// Consumes the timeline into `(node, action)` pairs in phase order, ready
    /// to hand to the runtime.
    pub fn into_assignments(
        self,
    ) -> impl Iterator<Item = (NodeId, MotionAction)> {
        self.phases
            .into_values()
            .flat_map(|phase| phase.assignments.into_iter())
    }
}
