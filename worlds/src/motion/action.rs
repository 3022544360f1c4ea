//! Declarative motion descriptions and the playhead that advances one of them
//! against a node transform.
//!
//! Actions are immutable once built. A [`Playhead`] holds the only mutable
//! state (elapsed time, the position a move started from, the index inside a
//! sequence), so the same action can be applied to many nodes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::easing::Easing;
use crate::core::error::{Result, WorldsError};
use crate::core::random::RandomRange;
use crate::core::util::ensure_finite_positive;
use crate::scene::Transform;

/// Ranges a looping spin is drawn from: each axis component in
/// `[-axis_degrees, axis_degrees]`, the period in `[duration[0], duration[1])`
/// seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpinJitter {
    pub axis_degrees: f32,
    pub duration: [f32; 2],
}

impl SpinJitter {
    pub const CLUSTER: SpinJitter = SpinJitter {
        axis_degrees: 10.0,
        duration: [8.0, 13.0],
    };

    pub const BACKDROP: SpinJitter = SpinJitter {
        axis_degrees: 10.0,
        duration: [18.0, 23.0],
    };

    pub fn validate(&self, name: &'static str) -> Result<()> {
        let [min, max] = self.duration;
        ensure_finite_positive(name, min)?;
        ensure_finite_positive(name, max)?;
        if max <= min {
            return Err(WorldsError::invalid(
                name,
                format!("duration range [{}, {}) is empty", min, max),
            ));
        }
        if !self.axis_degrees.is_finite() || self.axis_degrees < 0.0 {
            return Err(WorldsError::invalid(
                name,
                format!(
                    "axis_degrees must be finite and >= 0, got {}",
                    self.axis_degrees
                ),
            ));
        }
        Ok(())
    }

    pub fn draw(&self, rng: &mut dyn RandomRange) -> RotationStep {
        let a = self.axis_degrees;
        let degrees = Vec3::new(
            rng.between_inclusive(-a, a),
            rng.between_inclusive(-a, a),
            rng.between_inclusive(-a, a),
        );
        let duration = rng.between(self.duration[0], self.duration[1]);
        RotationStep { degrees, duration }
    }
}

impl Default for SpinJitter {
    fn default() -> Self {
        Self::CLUSTER
    }
}

/// One cycle of a looping spin: rotate by `degrees` over `duration` seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotationStep {
    pub degrees: Vec3,
    pub duration: f32,
}

impl RotationStep {
    pub fn radians(&self) -> Vec3 {
        Vec3::new(
            self.degrees.x.to_radians(),
            self.degrees.y.to_radians(),
            self.degrees.z.to_radians(),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionAction {
    /// Repeats a linear [`RotationStep`] until the runtime drops it.
    RotateForever {
        step: RotationStep,
        jitter: SpinJitter,
    },
    MoveTo {
        target: Vec3,
        duration: f32,
        easing: Easing,
    },
    /// Relative rotation, `delta` in radians.
    RotateBy {
        delta: Vec3,
        duration: f32,
        easing: Easing,
    },
    Wait {
        duration: f32,
    },
    Sequence(Vec<MotionAction>),
}

impl MotionAction {
    pub fn move_to(target: Vec3, duration: f32, easing: Easing) -> Self {
        Self::MoveTo {
            target,
            duration,
            easing,
        }
    }

    pub fn rotate_by(delta: Vec3, duration: f32, easing: Easing) -> Self {
        Self::RotateBy {
            delta,
            duration,
            easing,
        }
    }

    pub fn wait(duration: f32) -> Self {
        Self::Wait { duration }
    }

    pub fn sequence(actions: impl IntoIterator<Item = MotionAction>) -> Self {
        Self::Sequence(actions.into_iter().collect())
    }

    pub fn spin(jitter: SpinJitter, rng: &mut dyn RandomRange) -> Self {
        Self::RotateForever {
            step: jitter.draw(rng),
            jitter,
        }
    }

    /// Total running time, `None` for actions that never finish.
    pub fn duration(&self) -> Option<f32> {
        match self {
            Self::RotateForever { .. } => None,
            Self::MoveTo { duration, .. }
            | Self::RotateBy { duration, .. }
            | Self::Wait { duration } => Some(*duration),
            Self::Sequence(actions) => actions
                .iter()
                .map(MotionAction::duration)
                .try_fold(0.0, |sum, d| d.map(|d| sum + d)),
        }
    }

    /// Every duration must be finite and positive and every target finite,
    /// otherwise the runtime could divide by zero or drift to NaN.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::RotateForever { step, .. } => {
                ensure_finite_positive(
                    "rotate_forever.duration",
                    step.duration,
                )?;
                ensure_finite_vec("rotate_forever.degrees", step.degrees)
            }
            Self::MoveTo {
                target, duration, ..
            } => {
                ensure_finite_positive("move_to.duration", *duration)?;
                ensure_finite_vec("move_to.target", *target)
            }
            Self::RotateBy {
                delta, duration, ..
            } => {
                ensure_finite_positive("rotate_by.duration", *duration)?;
                ensure_finite_vec("rotate_by.delta", *delta)
            }
            Self::Wait { duration } => {
                ensure_finite_positive("wait.duration", *duration).map(|_| ())
            }
            Self::Sequence(actions) => {
                actions.iter().try_for_each(MotionAction::validate)
            }
        }
    }
}

fn ensure_finite_vec(name: &'static str, value: Vec3) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(WorldsError::invalid(name, format!("{} is not finite", value)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Progress {
    Running,
    /// Finished with `leftover` seconds of the last step unused.
    Done { leftover: f32 },
}

impl Progress {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

/// Mutable cursor through one [`MotionAction`].
#[derive(Clone, Debug, PartialEq)]
pub enum Playhead {
    Timed { elapsed: f32, origin: Option<Vec3> },
    Sequence { index: usize, current: Box<Playhead> },
    Forever,
}

impl Playhead {
    pub fn new(action: &MotionAction) -> Self {
        match action {
            MotionAction::RotateForever { .. } => Self::Forever,
            MotionAction::Sequence(actions) => Self::Sequence {
                index: 0,
                current: Box::new(
                    actions.first().map_or(Self::Forever, Playhead::new),
                ),
            },
            _ => Self::Timed {
                elapsed: 0.0,
                origin: None,
            },
        }
    }

    pub fn advance(
        &mut self,
        action: &MotionAction,
        transform: &mut Transform,
        dt: f32,
    ) -> Progress {
        match (action, self) {
            (MotionAction::RotateForever { step, .. }, Self::Forever) => {
                if step.duration > 0.0 {
                    transform.rotation += step.radians() * (dt / step.duration);
                }
                Progress::Running
            }
            (
                MotionAction::MoveTo {
                    target,
                    duration,
                    easing,
                },
                Self::Timed { elapsed, origin },
            ) => {
                let start = *origin.get_or_insert(transform.position);
                let (t, progress) = step_timed(elapsed, *duration, dt);
                transform.position = if progress.is_done() {
                    *target
                } else {
                    start.lerp(*target, easing.apply(t))
                };
                progress
            }
            (
                MotionAction::RotateBy {
                    delta,
                    duration,
                    easing,
                },
                Self::Timed { elapsed, .. },
            ) => {
                let before = easing.apply(fraction(*elapsed, *duration));
                let (t, progress) = step_timed(elapsed, *duration, dt);
                let after = if progress.is_done() {
                    1.0
                } else {
                    easing.apply(t)
                };
                transform.rotation += *delta * (after - before);
                progress
            }
            (MotionAction::Wait { duration }, Self::Timed { elapsed, .. }) => {
                step_timed(elapsed, *duration, dt).1
            }
            (
                MotionAction::Sequence(actions),
                Self::Sequence { index, current },
            ) => {
                let mut dt = dt;
                loop {
                    let Some(child) = actions.get(*index) else {
                        return Progress::Done { leftover: dt };
                    };
                    match current.advance(child, transform, dt) {
                        Progress::Running => return Progress::Running,
                        Progress::Done { leftover } => {
                            *index += 1;
                            if let Some(next) = actions.get(*index) {
                                **current = Playhead::new(next);
                            }
                            dt = leftover;
                        }
                    }
                }
            }
            // A playhead built for a different action; treat as finished
            _ => Progress::Done { leftover: dt },
        }
    }
}

fn fraction(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).clamp(0.0, 1.0)
    }
}

fn step_timed(elapsed: &mut f32, duration: f32, dt: f32) -> (f32, Progress) {
    let duration = duration.max(0.0);
    let total = *elapsed + dt;

    if total >= duration {
        *elapsed = duration;
        (
            1.0,
            Progress::Done {
                leftover: total - duration,
            },
        )
    } else {
        *elapsed = total;
        (total / duration, Progress::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::SeededRandom;

    fn run(
        action: &MotionAction,
        transform: &mut Transform,
        dt: f32,
        steps: usize,
    ) -> Progress {
        let mut playhead = Playhead::new(action);
        let mut progress = Progress::Running;
        for _ in 0..steps {
            progress = playhead.advance(action, transform, dt);
        }
        progress
    }

    #[test]
    fn move_to_lands_exactly_on_target() {
        let action = MotionAction::move_to(
            Vec3::new(0.0, 30.0, 200.0),
            3.0,
            Easing::EaseIn,
        );
        let mut transform = Transform::at(Vec3::new(0.0, 0.0, 20.0));
        let progress = run(&action, &mut transform, 0.1, 31);

        assert!(progress.is_done());
        assert_eq!(transform.position, Vec3::new(0.0, 30.0, 200.0));
    }

    #[test]
    fn move_to_follows_easing() {
        let action = MotionAction::move_to(Vec3::X * 10.0, 2.0, Easing::EaseIn);
        let mut transform = Transform::default();
        let mut playhead = Playhead::new(&action);

        let progress = playhead.advance(&action, &mut transform, 1.0);
        assert_eq!(progress, Progress::Running);
        // ease_in(0.5) = 0.25
        assert!((transform.position.x - 2.5).abs() < 1e-5);
    }

    #[test]
    fn rotate_by_accumulates_to_delta() {
        let delta = Vec3::new(-0.25, 0.0, 0.0);
        let action = MotionAction::rotate_by(delta, 1.0, Easing::EaseInOut);
        let mut transform = Transform::default();
        let progress = run(&action, &mut transform, 1.0 / 60.0, 70);

        assert!(progress.is_done());
        assert!((transform.rotation.x - -0.25).abs() < 1e-5);
        assert_eq!(transform.rotation.y, 0.0);
    }

    #[test]
    fn sequence_carries_leftover_into_next_child() {
        let action = MotionAction::sequence([
            MotionAction::wait(1.0),
            MotionAction::move_to(Vec3::ZERO, 1.0, Easing::Linear),
        ]);
        let mut transform = Transform::at(Vec3::new(4.0, 0.0, 0.0));
        let mut playhead = Playhead::new(&action);

        assert_eq!(
            playhead.advance(&action, &mut transform, 0.5),
            Progress::Running
        );
        assert_eq!(transform.position.x, 4.0);

        assert_eq!(
            playhead.advance(&action, &mut transform, 1.0),
            Progress::Running
        );
        assert!((transform.position.x - 2.0).abs() < 1e-5);

        let progress = playhead.advance(&action, &mut transform, 1.0);
        assert_eq!(progress, Progress::Done { leftover: 0.5 });
        assert_eq!(transform.position, Vec3::ZERO);
    }

    #[test]
    fn forever_never_finishes() {
        let step = RotationStep {
            degrees: Vec3::new(10.0, 0.0, -10.0),
            duration: 10.0,
        };
        let action = MotionAction::RotateForever {
            step,
            jitter: SpinJitter::CLUSTER,
        };
        let mut transform = Transform::default();
        let progress = run(&action, &mut transform, 1.0, 20);

        assert_eq!(progress, Progress::Running);
        assert!((transform.rotation.x - 20f32.to_radians()).abs() < 1e-4);
        assert!((transform.rotation.z + 20f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn duration_sums_sequences() {
        let action = MotionAction::sequence([
            MotionAction::wait(158.0),
            MotionAction::move_to(Vec3::ZERO, 1.0, Easing::EaseIn),
        ]);
        assert_eq!(action.duration(), Some(159.0));

        let mut rng = SeededRandom::new(0);
        let spin = MotionAction::spin(SpinJitter::CLUSTER, &mut rng);
        assert_eq!(spin.duration(), None);
        assert_eq!(MotionAction::sequence([spin]).duration(), None);
    }

    #[test]
    fn validate_rejects_bad_numbers() {
        assert!(MotionAction::wait(0.0).validate().is_err());
        assert!(
            MotionAction::move_to(Vec3::ZERO, f32::NAN, Easing::Linear)
                .validate()
                .is_err()
        );
        assert!(
            MotionAction::move_to(
                Vec3::splat(f32::INFINITY),
                1.0,
                Easing::Linear
            )
            .validate()
            .is_err()
        );
        assert!(
            MotionAction::sequence([
                MotionAction::wait(1.0),
                MotionAction::wait(-1.0),
            ])
            .validate()
            .is_err()
        );
        assert!(MotionAction::wait(1.0).validate().is_ok());
    }

    #[test]
    fn jitter_rejects_empty_range() {
        let jitter = SpinJitter {
            axis_degrees: 10.0,
            duration: [13.0, 8.0],
        };
        assert!(jitter.validate("cluster_spin").is_err());
        assert!(SpinJitter::BACKDROP.validate("backdrop_spin").is_ok());
    }
}
