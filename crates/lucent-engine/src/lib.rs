//! Lucent engine crate.
//!
//! A small real-time rendering engine on wgpu + winit: typed shader uniforms,
//! composite mesh trees, a frame clock, polled keyboard/mouse input and an
//! engine loop with a fixed startup and shutdown order.

pub mod config;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod mesh;
pub mod render;
pub mod shader;
pub mod time;
pub mod window;

pub use crate::config::{EngineConfig, Properties};
pub use crate::core::{App, AppControl};
pub use crate::window::Engine;
