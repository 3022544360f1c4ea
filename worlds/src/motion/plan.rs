//! Turns an installed layout and the track length into a [`Timeline`].
//!
//! Structure is fixed: the camera travels out while tilting, the backdrops and
//! every cluster element spin forever, and every element waits out most of
//! the track before collapsing onto the origin. Only the per-node spin axes
//! and periods are random, drawn from the injected [`RandomRange`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::action::{MotionAction, SpinJitter};
use super::easing::Easing;
use super::timeline::{Phase, PhaseKind, Timeline};
use crate::core::error::{Result, WorldsError};
use crate::core::logging::debug;
use crate::core::random::RandomRange;
use crate::core::util::ensure_finite_positive;
use crate::scene::LayoutHandles;

pub const CAMERA_TARGET: Vec3 = Vec3::new(0.0, 30.0, 200.0);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanSettings {
    /// Fraction of the track the camera move takes (k₁).
    pub camera_travel_ratio: f32,
    pub camera_target: Vec3,
    /// Radians about X applied over the camera move.
    pub camera_tilt: f32,
    pub camera_easing: Easing,
    pub cluster_spin: SpinJitter,
    pub backdrop_spin: SpinJitter,
    /// Seconds before the end of the track the collapse begins.
    pub collapse_lead: f32,
    pub collapse_duration: f32,
    pub collapse_easing: Easing,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            camera_travel_ratio: 1.0,
            camera_target: CAMERA_TARGET,
            camera_tilt: -0.25,
            camera_easing: Easing::EaseIn,
            cluster_spin: SpinJitter::CLUSTER,
            backdrop_spin: SpinJitter::BACKDROP,
            collapse_lead: 2.0,
            collapse_duration: 1.0,
            collapse_easing: Easing::EaseIn,
        }
    }
}

impl PlanSettings {
    pub fn validate(&self) -> Result<()> {
        let ratio = ensure_finite_positive(
            "camera_travel_ratio",
            self.camera_travel_ratio,
        )?;
        if ratio > 1.0 {
            return Err(WorldsError::invalid(
                "camera_travel_ratio",
                format!("must not exceed 1.0, got {}", ratio),
            ));
        }
        if !self.camera_target.is_finite() {
            return Err(WorldsError::invalid(
                "camera_target",
                "must be finite",
            ));
        }
        if !self.camera_tilt.is_finite() {
            return Err(WorldsError::invalid("camera_tilt", "must be finite"));
        }
        self.cluster_spin.validate("cluster_spin")?;
        self.backdrop_spin.validate("backdrop_spin")?;
        ensure_finite_positive("collapse_lead", self.collapse_lead)?;
        ensure_finite_positive("collapse_duration", self.collapse_duration)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MotionPlan {
    settings: PlanSettings,
}

impl MotionPlan {
    pub fn new(settings: PlanSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PlanSettings {
        &self.settings
    }

    pub fn build(
        &self,
        handles: &LayoutHandles,
        total_duration: f32,
        rng: &mut dyn RandomRange,
    ) -> Result<Timeline> {
        let s = &self.settings;
        s.validate()?;
        ensure_finite_positive("total_duration", total_duration)?;

        let collapse_start = total_duration - s.collapse_lead;
        if collapse_start <= 0.0 {
            return Err(WorldsError::invalid(
                "total_duration",
                format!(
                    "{}s track is too short for a {}s collapse lead",
                    total_duration, s.collapse_lead
                ),
            ));
        }

        let mut timeline = Timeline::new(total_duration);

        let travel = total_duration * s.camera_travel_ratio;
        timeline.insert(
            PhaseKind::CameraMove,
            Phase {
                start: 0.0,
                duration: travel,
                looping: false,
                // Started together, not sequenced
                assignments: vec![
                    (
                        handles.camera,
                        MotionAction::move_to(
                            s.camera_target,
                            travel,
                            s.camera_easing,
                        ),
                    ),
                    (
                        handles.camera,
                        MotionAction::rotate_by(
                            Vec3::new(s.camera_tilt, 0.0, 0.0),
                            travel,
                            s.camera_easing,
                        ),
                    ),
                ],
            },
        );

        timeline.insert(
            PhaseKind::BackdropRotate,
            Phase {
                start: 0.0,
                duration: total_duration,
                looping: true,
                assignments: handles
                    .skyboxes
                    .iter()
                    .map(|&id| {
                        (id, MotionAction::spin(s.backdrop_spin, &mut *rng))
                    })
                    .collect(),
            },
        );

        timeline.insert(
            PhaseKind::ClusterRotate,
            Phase {
                start: 0.0,
                duration: total_duration,
                looping: true,
                assignments: handles
                    .elements
                    .iter()
                    .map(|&id| {
                        (id, MotionAction::spin(s.cluster_spin, &mut *rng))
                    })
                    .collect(),
            },
        );

        let collapse = MotionAction::sequence([
            MotionAction::wait(collapse_start),
            MotionAction::move_to(
                Vec3::ZERO,
                s.collapse_duration,
                s.collapse_easing,
            ),
        ]);
        timeline.insert(
            PhaseKind::EndingCollapse,
            Phase {
                start: collapse_start,
                duration: s.collapse_duration,
                looping: false,
                assignments: handles
                    .elements
                    .iter()
                    .map(|&id| (id, collapse.clone()))
                    .collect(),
            },
        );

        for (_, phase) in timeline.phases() {
            for (_, action) in &phase.assignments {
                action.validate()?;
            }
        }

        for (kind, phase) in timeline.phases() {
            debug!(
                "Phase {}: start {:.2}s, duration {:.2}s, {} actions",
                kind,
                phase.start,
                phase.duration,
                phase.assignments.len()
            );
        }
        debug!(
            "Built timeline: {} actions over {}s, collapse at {}s",
            timeline.action_count(),
            total_duration,
            collapse_start
        );

        Ok(timeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::SeededRandom;
    use crate::runtime::stage::Stage;
    use crate::scene::generate;

    fn handles() -> LayoutHandles {
        let mut stage = Stage::new();
        generate(32, 32, 50.0).unwrap().install(&mut stage).unwrap()
    }

    #[test]
    fn phases_in_order() {
        let timeline = MotionPlan::default()
            .build(&handles(), 160.0, &mut SeededRandom::new(1))
            .unwrap();

        let kinds: Vec<_> = timeline.phases().map(|(k, _)| *k).collect();
        assert_eq!(kinds, PhaseKind::ALL.to_vec());
    }

    #[test]
    fn camera_move_and_tilt_share_duration() {
        let handles = handles();
        let timeline = MotionPlan::default()
            .build(&handles, 160.0, &mut SeededRandom::new(1))
            .unwrap();
        let camera = timeline.phase(PhaseKind::CameraMove).unwrap();

        assert_eq!(camera.assignments.len(), 2);
        assert!(camera.assignments.iter().all(|(id, _)| *id == handles.camera));
        let durations: Vec<_> = camera
            .assignments
            .iter()
            .map(|(_, action)| action.duration())
            .collect();
        assert_eq!(durations, vec![Some(160.0), Some(160.0)]);
    }

    #[test]
    fn every_element_spins_and_collapses() {
        let handles = handles();
        let timeline = MotionPlan::default()
            .build(&handles, 160.0, &mut SeededRandom::new(1))
            .unwrap();

        let spin = timeline.phase(PhaseKind::ClusterRotate).unwrap();
        let collapse = timeline.phase(PhaseKind::EndingCollapse).unwrap();
        assert_eq!(spin.assignments.len(), handles.elements.len());
        assert_eq!(collapse.assignments.len(), handles.elements.len());
        assert_eq!(collapse.start, 158.0);

        for (_, action) in &collapse.assignments {
            let MotionAction::Sequence(steps) = action else {
                panic!("collapse must be a sequence");
            };
            assert_eq!(steps[0], MotionAction::wait(158.0));
            let MotionAction::MoveTo { target, .. } = &steps[1] else {
                panic!("collapse must end with a move");
            };
            assert_eq!(*target, Vec3::ZERO);
        }
    }

    #[test]
    fn spins_are_drawn_per_node() {
        let timeline = MotionPlan::default()
            .build(&handles(), 160.0, &mut SeededRandom::new(9))
            .unwrap();
        let spin = timeline.phase(PhaseKind::ClusterRotate).unwrap();

        let first = &spin.assignments[0].1;
        assert!(spin.assignments.iter().skip(1).any(|(_, a)| a != first));
    }

    #[test]
    fn same_seed_same_timeline() {
        let handles = handles();
        let plan = MotionPlan::default();
        let a = plan.build(&handles, 160.0, &mut SeededRandom::new(5)).unwrap();
        let b = plan.build(&handles, 160.0, &mut SeededRandom::new(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_bad_durations() {
        let handles = handles();
        let plan = MotionPlan::default();
        let mut rng = SeededRandom::new(0);

        assert!(plan.build(&handles, 0.0, &mut rng).is_err());
        assert!(plan.build(&handles, -3.0, &mut rng).is_err());
        assert!(plan.build(&handles, f32::NAN, &mut rng).is_err());
        assert!(plan.build(&handles, f32::INFINITY, &mut rng).is_err());
        // Shorter than the collapse lead
        assert!(plan.build(&handles, 1.5, &mut rng).is_err());
    }

    #[test]
    fn rejects_bad_settings() {
        let handles = handles();
        let mut rng = SeededRandom::new(0);

        let plan = MotionPlan::new(PlanSettings {
            collapse_duration: 0.0,
            ..PlanSettings::default()
        });
        assert!(plan.build(&handles, 160.0, &mut rng).is_err());

        let plan = MotionPlan::new(PlanSettings {
            camera_travel_ratio: 1.5,
            ..PlanSettings::default()
        });
        assert!(plan.build(&handles, 160.0, &mut rng).is_err());
    }

    #[test]
    fn phases_scale_with_track_length() {
        let handles = handles();
        let plan = MotionPlan::new(PlanSettings {
            camera_travel_ratio: 0.5,
            ..PlanSettings::default()
        });
        for total in [60.0, 160.0, 600.0] {
            let timeline =
                plan.build(&handles, total, &mut SeededRandom::new(0)).unwrap();
            assert_eq!(
                timeline.duration_ratio(PhaseKind::CameraMove),
                Some(0.5)
            );
            assert_eq!(
                timeline.start_ratio(PhaseKind::ClusterRotate),
                Some(0.0)
            );
        }
    }
}
