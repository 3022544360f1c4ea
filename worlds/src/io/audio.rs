//! The audio collaborator. Decoding and output belong to the host; the
//! choreography only needs to start playback, know the track length, and hear
//! once that playback ended.

use parking_lot::Mutex;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::core::logging::{debug, error, info};
use crate::runtime::events::{PlaybackEvent, PlaybackEventSender};

/// A track on disk plus its known length. Length comes from the host's
/// decoder (or config); this crate never decodes audio.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackResource {
    pub path: PathBuf,
    pub duration: f32,
}

impl TrackResource {
    pub fn new(path: impl Into<PathBuf>, duration: f32) -> Self {
        Self {
            path: path.into(),
            duration,
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    NotFound(PathBuf),
    Unreadable { path: PathBuf, source: io::Error },
    InvalidDuration(f32),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Audio track not found: {}", path.display())
            }
            Self::Unreadable { path, source } => write!(
                f,
                "Audio track {} is unreadable: {}",
                path.display(),
                source
            ),
            Self::InvalidDuration(duration) => write!(
                f,
                "Audio track duration must be finite and positive, got {}",
                duration
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unreadable { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub trait AudioPlayer {
    fn load(track: &TrackResource) -> Result<Self, LoadError>
    where
        Self: Sized;

    fn prepare_to_play(&mut self);

    fn play(&mut self);

    /// Stops playback and releases the underlying resource. No finished
    /// notification is sent for a stopped session.
    fn stop(&mut self);

    /// Track length in seconds.
    fn duration(&self) -> f32;

    /// Where to deliver the single finished notification for this session.
    fn connect(&mut self, events: PlaybackEventSender);
}

/// Verifies the file exists and can be opened.
pub fn check_track(track: &TrackResource) -> Result<(), LoadError> {
    if !track.duration.is_finite() || track.duration <= 0.0 {
        return Err(LoadError::InvalidDuration(track.duration));
    }
    check_readable(&track.path)
}

fn check_readable(path: &Path) -> Result<(), LoadError> {
    match File::open(path) {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(LoadError::NotFound(path.to_path_buf()))
        }
        Err(source) => Err(LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Silent stand-in for a real output device: "plays" for the track's
/// duration on a background thread, then reports completion. Useful for
/// headless runs where the host loop still needs an audio clock.
pub struct TimedPlayer {
    track: TrackResource,
    rate: f32,
    prepared: bool,
    events: Arc<Mutex<Option<PlaybackEventSender>>>,
    cancelled: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl TimedPlayer {
    /// Playback speed multiplier. `2.0` finishes a 160s track in 80s.
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = if rate.is_finite() && rate > 0.0 { rate } else { 1.0 };
        self
    }

    pub fn track(&self) -> &TrackResource {
        &self.track
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    fn wall_duration(&self) -> Duration {
        Duration::from_secs_f32(self.track.duration / self.rate)
    }
}

impl AudioPlayer for TimedPlayer {
    fn load(track: &TrackResource) -> Result<Self, LoadError> {
        check_track(track)?;
        Ok(Self {
            track: track.clone(),
            rate: 1.0,
            prepared: false,
            events: Arc::new(Mutex::new(None)),
            cancelled: Arc::new(AtomicBool::new(false)),
            worker: None,
        })
    }

    fn prepare_to_play(&mut self) {
        self.prepared = true;
        debug!("Prepared {}", self.track.path.display());
    }

    fn play(&mut self) {
        if self.worker.is_some() {
            return;
        }

        let deadline = Instant::now() + self.wall_duration();
        let events = self.events.clone();
        let cancelled = self.cancelled.clone();

        let spawned = thread::Builder::new()
            .name("timed-player".into())
            .spawn(move || {
                while !cancelled.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if now >= deadline {
                        // take() keeps the notification at-most-once
                        if let Some(sender) = events.lock().take() {
                            let _ = sender.send(PlaybackEvent::Finished {
                                successfully: true,
                            });
                        }
                        return;
                    }
                    let nap = (deadline - now).min(Duration::from_millis(20));
                    thread::sleep(nap);
                }
            });

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                info!(
                    "Playing {} ({:.1}s at {}x)",
                    self.track.path.display(),
                    self.track.duration,
                    self.rate
                );
            }
            Err(err) => {
                error!("Unable to start playback thread: {}", err);
                if let Some(sender) = self.events.lock().take() {
                    let _ = sender.send(PlaybackEvent::Finished {
                        successfully: false,
                    });
                }
            }
        }
    }

    fn stop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        self.events.lock().take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
            debug!("Playback stopped");
        }
    }

    fn duration(&self) -> f32 {
        self.track.duration
    }

    fn connect(&mut self, events: PlaybackEventSender) {
        *self.events.lock() = Some(events);
    }
}

impl Drop for TimedPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}
