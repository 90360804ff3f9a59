//! Window + engine loop.
//!
//! Owns the `winit` event loop and window, wires them to the GPU layer, the
//! input subsystem and the renderer, and drives the [`crate::core::App`].

mod config;
mod runtime;

pub use config::WindowConfig;
pub use runtime::Engine;
