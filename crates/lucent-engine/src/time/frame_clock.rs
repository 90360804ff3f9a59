use std::time::{Duration, Instant};

/// Source of monotonic time in milliseconds.
pub trait TimeSource {
    fn now_millis(&self) -> u64;
}

/// Monotonic clock anchored at its creation.
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Raw time since the previous tick (or since init for the first tick).
    pub delta_millis: u64,

    /// `delta_millis` in seconds, clamped to the clock's maximum step.
    pub dt: f32,

    /// Time since the clock was created.
    pub elapsed_millis: u64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock: time since init and per-frame delta.
///
/// The first tick measures from clock creation, so frame one never reports
/// time since an arbitrary epoch.
///
/// `dt` is clamped to `max_dt` to keep simulation stable after stalls
/// (debugger pauses, minimized windows); `delta_millis` stays raw.
#[derive(Debug, Clone)]
pub struct FrameClock<S: TimeSource = MonotonicTime> {
    source: S,
    start: u64,
    last_tick: u64,
    delta: u64,
    frame_index: u64,
    max_dt: Duration,
}

impl FrameClock<MonotonicTime> {
    pub fn new() -> Self {
        Self::with_source(MonotonicTime::new())
    }
}

impl Default for FrameClock<MonotonicTime> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TimeSource> FrameClock<S> {
    pub fn with_source(source: S) -> Self {
        let start = source.now_millis();
        Self {
            source,
            start,
            last_tick: start,
            delta: 0,
            frame_index: 0,
            max_dt: Duration::from_millis(250),
        }
    }

    pub fn with_max_dt(mut self, max_dt: Duration) -> Self {
        self.max_dt = max_dt;
        self
    }

    /// Rebases the delta baseline, e.g. after resuming from suspension.
    pub fn reset(&mut self) {
        self.last_tick = self.source.now_millis();
    }

    /// Advances the clock. Call once per frame.
    pub fn tick(&mut self) -> FrameTime {
        let now = self.source.now_millis();
        self.delta = now.saturating_sub(self.last_tick);
        self.last_tick = now;

        let dt = Duration::from_millis(self.delta).min(self.max_dt);

        let ft = FrameTime {
            delta_millis: self.delta,
            dt: dt.as_secs_f32(),
            elapsed_millis: now.saturating_sub(self.start),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.source.now_millis().saturating_sub(self.start)
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_millis() as f32 / 1000.0
    }

    pub fn delta_millis(&self) -> u64 {
        self.delta
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta as f32 / 1000.0
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}
