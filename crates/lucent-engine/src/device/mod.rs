//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating and configuring the Surface (swapchain) and the depth buffer
//! - acquiring frames and mapping surface errors to an action

mod context;
mod depth;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use depth::{DepthBuffer, DEPTH_FORMAT};
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
