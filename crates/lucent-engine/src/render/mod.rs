//! GPU rendering subsystem.
//!
//! Drawable nodes talk to the [`Graphics`] and [`MeshResources`] contracts;
//! [`Renderer`] implements them on top of wgpu.
//!
//! Convention:
//! - a program's uniforms live in one block at `@group(0) @binding(0)`
//! - a uniform location is its byte offset inside that block
//! - every draw gets its own copy of the block in the uniform arena

mod arena;
mod config;
mod graphics;
mod meshes;
mod pass;
mod pipeline;
mod renderer;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{FrameLimiter, RendererConfig};
pub use graphics::{Graphics, MeshHandle, MeshResources, UniformLocation, UniformSink};
pub use meshes::MeshAllocator;
pub use renderer::{ClearFlags, Renderer};
