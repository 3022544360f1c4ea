//! Owns the session: builds the scene at construction, hands the motion plan
//! to the runtime on the start signal, and ends the session when the audio
//! collaborator reports playback finished.
//!
//! ```text
//! Idle --on_start--> Running --finished--> Finished
//! ```
//!
//! The audio track is the only clock that decides when the piece is over;
//! nothing here tracks elapsed time.

use std::sync::mpsc::TryRecvError;

use super::completion::{PlaybackCompletionHandler, Presentation};
use super::events::{PlaybackEvent, PlaybackEventReceiver, playback_channel};
use super::stage::SceneRuntime;
use crate::config::WorldsConfig;
use crate::core::error::{Result, WorldsError};
use crate::core::logging::{debug, info, warn};
use crate::core::random::RandomRange;
use crate::core::util::ensure_finite_positive;
use crate::io::audio::AudioPlayer;
use crate::motion::{MotionPlan, Timeline};
use crate::scene::LayoutHandles;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChoreographerState {
    Idle,
    Running,
    Finished,
}

pub struct Choreographer<R: SceneRuntime, A: AudioPlayer> {
    runtime: R,
    audio: A,
    rng: Box<dyn RandomRange>,
    plan: MotionPlan,
    handles: LayoutHandles,
    state: ChoreographerState,
    presentation: Presentation,
    completion: PlaybackCompletionHandler,
    events: PlaybackEventReceiver,
    prepared: Option<Timeline>,
    released: bool,
}

impl<R: SceneRuntime, A: AudioPlayer> Choreographer<R, A> {
    /// Validates everything that could fail later, installs the layout into
    /// `runtime` and prepares `audio`. Any error here is fatal: the session
    /// never reaches `Running`.
    pub fn new(
        config: &WorldsConfig,
        mut runtime: R,
        mut audio: A,
        rng: Box<dyn RandomRange>,
    ) -> Result<Self> {
        config.validate()?;

        let duration = audio.duration();
        ensure_finite_positive("audio.duration", duration)?;
        if duration <= config.motion.collapse_lead {
            return Err(WorldsError::invalid(
                "audio.duration",
                format!(
                    "{}s track is too short for a {}s collapse lead",
                    duration, config.motion.collapse_lead
                ),
            ));
        }

        let layout = config.layout.params().generate()?;
        let handles = layout.install(&mut runtime)?;
        info!(
            "Scene ready: {} elements, {} backdrops, {:.1}s track",
            handles.elements.len(),
            handles.skyboxes.len(),
            duration
        );

        let (sender, events) = playback_channel();
        audio.connect(sender);
        audio.prepare_to_play();

        Ok(Self {
            runtime,
            audio,
            rng,
            plan: MotionPlan::new(config.motion.clone()),
            handles,
            state: ChoreographerState::Idle,
            presentation: Presentation::new(
                config.presentation.fade_in,
                config.presentation.background,
            ),
            completion: PlaybackCompletionHandler,
            events,
            prepared: None,
            released: false,
        })
    }

    pub fn state(&self) -> ChoreographerState {
        self.state
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn handles(&self) -> &LayoutHandles {
        &self.handles
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// The host view became visible. Layout is already installed, so this
    /// only flips visibility; starting waits for an explicit signal.
    pub fn on_appear(&mut self) {
        if !self.presentation.visible {
            self.presentation.visible = true;
            debug!("View appeared in state {:?}", self.state);
        }
    }

    /// Start signal. Returns `Ok(false)` without side effects unless the
    /// session is `Idle` and not torn down.
    pub fn on_start(&mut self) -> Result<bool> {
        if self.state != ChoreographerState::Idle {
            debug!("Ignoring start signal while {:?}", self.state);
            return Ok(false);
        }
        if self.released {
            warn!("Ignoring start signal after teardown");
            return Ok(false);
        }

        let timeline = match self.prepared.take() {
            Some(timeline) => timeline,
            None => self.plan_timeline()?,
        };
        let count = timeline.action_count();
        for (node, action) in timeline.into_assignments() {
            if let Err(err) = self.runtime.apply_action(node, action) {
                // Nothing half-applied survives a failed start
                self.runtime.remove_all_actions();
                return Err(err);
            }
        }

        self.presentation.reveal_scene();
        self.audio.play();
        self.state = ChoreographerState::Running;
        info!("Running: {} actions dispatched", count);

        Ok(true)
    }

    /// The timeline the next `on_start` will apply, built on first call and
    /// kept until then. Repeated calls return the same timeline.
    pub fn prepare_timeline(&mut self) -> Result<&Timeline> {
        let timeline = match self.prepared.take() {
            Some(timeline) => timeline,
            None => self.plan_timeline()?,
        };
        Ok(self.prepared.insert(timeline))
    }

    fn plan_timeline(&mut self) -> Result<Timeline> {
        self.plan
            .build(&self.handles, self.audio.duration(), self.rng.as_mut())
    }

    /// Drains notifications delivered by the audio thread. Call from the
    /// thread that owns the scene, once per host-loop iteration.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.events.try_recv() {
                Ok(PlaybackEvent::Finished { successfully }) => {
                    self.on_playback_finished(successfully);
                    handled += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => {
                    return handled;
                }
            }
        }
    }

    /// Returns `true` when this notification ended the session.
    pub fn on_playback_finished(&mut self, successfully: bool) -> bool {
        self.completion.handle(
            &mut self.state,
            &mut self.presentation,
            successfully,
        )
    }

    /// Cancels every in-flight action and releases the audio resource.
    /// Idempotent; also runs on drop.
    pub fn stop(&mut self) {
        if self.released {
            return;
        }
        self.runtime.remove_all_actions();
        self.audio.stop();
        self.released = true;
        info!("Torn down in state {:?}", self.state);
    }
}

impl<R: SceneRuntime, A: AudioPlayer> Drop for Choreographer<R, A> {
    fn drop(&mut self) {
        self.stop();
    }
}
