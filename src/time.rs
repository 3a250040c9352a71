//! Frame timing for the host loop.

use std::time::{Duration, Instant};

/// Seconds in a tick, taken from its whole milliseconds
pub fn tick_seconds(elapsed: Duration) -> f32 {
    elapsed.as_millis() as f32 / 1000.0
}

/// Measures the time between consecutive ticks
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }

    /// Seconds since the previous call (or construction)
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Only whole milliseconds are consumed; the remainder carries into the next tick
    fn tick_at(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.last);
        let consumed = Duration::from_millis(elapsed.as_millis() as u64);
        self.last += consumed;
        tick_seconds(consumed)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames-per-second over one-second windows
#[derive(Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    window: f32,
    fps: Option<u32>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a frame; returns the new rate whenever a window closes
    pub fn frame(&mut self, dt: f32) -> Option<u32> {
        self.frames += 1;
        self.window += dt;
        if self.window < 1.0 {
            return None;
        }
        let fps = (self.frames as f32 / self.window).round() as u32;
        self.fps = Some(fps);
        self.frames = 0;
        self.window = 0.0;
        Some(fps)
    }

    /// Last completed measurement
    pub fn fps(&self) -> Option<u32> {
        self.fps
    }
}
