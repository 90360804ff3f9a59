//! Core engine-facing contracts.
//!
//! This module defines the interface between the engine loop and application
//! code: the [`App`] callbacks and the contexts handed to them at init, on
//! every frame and at cleanup.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{CleanupCtx, FrameCtx, InitCtx, WindowCtx};
