#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::{Arc, Once};

use worlds::prelude::*;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

#[derive(Debug, Default)]
pub struct Calls {
    pub prepares: u32,
    pub plays: u32,
    pub stops: u32,
    events: Option<PlaybackEventSender>,
}

/// Shared view into a [`RecordingPlayer`] that outlives the choreographer
/// owning the player.
#[derive(Clone, Debug, Default)]
pub struct Probe(Arc<Mutex<Calls>>);

impl Probe {
    pub fn plays(&self) -> u32 {
        self.0.lock().plays
    }

    pub fn prepares(&self) -> u32 {
        self.0.lock().prepares
    }

    pub fn stops(&self) -> u32 {
        self.0.lock().stops
    }

    /// Delivers the finished notification the way an audio backend would.
    pub fn finish(&self, successfully: bool) {
        if let Some(events) = &self.0.lock().events {
            events
                .send(PlaybackEvent::Finished { successfully })
                .expect("choreographer dropped its receiver");
        }
    }
}

pub struct RecordingPlayer {
    duration: f32,
    probe: Probe,
}

impl RecordingPlayer {
    pub fn new(duration: f32) -> (Self, Probe) {
        let probe = Probe::default();
        (
            Self {
                duration,
                probe: probe.clone(),
            },
            probe,
        )
    }
}

impl AudioPlayer for RecordingPlayer {
    fn load(track: &TrackResource) -> Result<Self, LoadError> {
        check_track(track)?;
        Ok(Self::new(track.duration).0)
    }

    fn prepare_to_play(&mut self) {
        self.probe.0.lock().prepares += 1;
    }

    fn play(&mut self) {
        self.probe.0.lock().plays += 1;
    }

    fn stop(&mut self) {
        self.probe.0.lock().stops += 1;
    }

    fn duration(&self) -> f32 {
        self.duration
    }

    fn connect(&mut self, events: PlaybackEventSender) {
        self.probe.0.lock().events = Some(events);
    }
}

pub fn choreographer(
    config: &WorldsConfig,
    duration: f32,
) -> (Choreographer<Stage, RecordingPlayer>, Probe) {
    init_logger();
    let (player, probe) = RecordingPlayer::new(duration);
    let choreographer = Choreographer::new(
        config,
        Stage::new(),
        player,
        Box::new(SeededRandom::new(config.seed.unwrap_or(0))),
    )
    .expect("construct choreographer");
    (choreographer, probe)
}
