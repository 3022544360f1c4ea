use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tick {
    pub frames_advanced: u32,
    /// Scene seconds to advance the stage by: whole frames times `rate`.
    pub scene_dt: f32,
}

impl Tick {
    pub fn should_render(&self) -> bool {
        self.frames_advanced > 0
    }
}

/// Fixed-step pacer for the host loop. Wall time accumulates and is paid out
/// in whole frames; `rate` scales how much scene time each frame represents.
#[derive(Debug)]
pub struct FrameClock {
    fps: f32,
    rate: f32,
    frame_count: u64,
    last_tick: Instant,
    accumulator: Duration,
}

impl FrameClock {
    pub fn new(fps: f32) -> Self {
        Self::with_start(fps, Instant::now())
    }

    pub fn with_start(fps: f32, now: Instant) -> Self {
        Self {
            fps: fps.max(1.0),
            rate: 1.0,
            frame_count: 0,
            last_tick: now,
            accumulator: Duration::ZERO,
        }
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.set_rate(rate);
        self
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = if rate.is_finite() { rate.max(0.0) } else { 1.0 };
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.fps)
    }

    pub fn next_deadline(&self) -> Instant {
        let remaining = self
            .frame_duration()
            .checked_sub(self.accumulator)
            .unwrap_or_default();
        self.last_tick + remaining
    }

    pub fn tick(&mut self, now: Instant) -> Tick {
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.accumulator += elapsed;

        let frame_duration = self.frame_duration();
        let mut advanced = 0u32;

        while self.accumulator >= frame_duration {
            self.accumulator -= frame_duration;
            self.frame_count += 1;
            advanced += 1;
        }

        let scene_dt =
            advanced as f32 * frame_duration.as_secs_f32() * self.rate;

        Tick {
            frames_advanced: advanced,
            scene_dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_on_full_interval() {
        let start = Instant::now();
        let mut clock = FrameClock::with_start(60.0, start);

        let half = start + clock.frame_duration() / 2;
        assert_eq!(clock.tick(half), Tick::default());

        let full = half + clock.frame_duration() / 2;
        let tick = clock.tick(full);
        assert!(tick.should_render());
        assert_eq!(tick.frames_advanced, 1);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn catches_up_when_lagging() {
        let start = Instant::now();
        let mut clock = FrameClock::with_start(30.0, start);
        let now = start + clock.frame_duration() * 3;

        let tick = clock.tick(now);
        assert_eq!(tick.frames_advanced, 3);
        assert!((tick.scene_dt - 0.1).abs() < 1e-4);
    }

    #[test]
    fn rate_scales_scene_time() {
        let start = Instant::now();
        let mut clock = FrameClock::with_start(10.0, start).with_rate(4.0);
        let tick = clock.tick(start + clock.frame_duration());

        assert_eq!(tick.frames_advanced, 1);
        assert!((tick.scene_dt - 0.4).abs() < 1e-5);
    }

    #[test]
    fn rejects_nonsense_rates() {
        let mut clock = FrameClock::new(60.0);
        clock.set_rate(f32::NAN);
        assert_eq!(clock.rate(), 1.0);
        clock.set_rate(-2.0);
        assert_eq!(clock.rate(), 0.0);
    }
}
