//! Time subsystem.
//!
//! One `FrameClock` per render loop; call `tick()` once per frame to obtain a
//! `FrameTime`. The clock reads a pluggable `TimeSource` so it can be driven
//! deterministically in tests.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime, MonotonicTime, TimeSource};
