//! Shader programs and typed uniforms.
//!
//! A program declares the uniforms it expects; each declaration is a
//! [`UniformSlot`] that validates assigned values against its declared
//! [`UniformType`] and uploads them through a [`crate::render::UniformSink`].

mod error;
mod layout;
mod library;
mod program;
mod slot;
mod value;

pub use error::{ShaderError, UniformError};
pub use layout::{LayoutEntry, UniformLayout, MAX_UNIFORM_BLOCK_SIZE};
pub use library::ShaderLibrary;
pub use program::{ShaderDesc, ShaderId, ShaderProgram};
pub use slot::UniformSlot;
pub use value::{UniformType, UniformValue};
