//! Drawable meshes.
//!
//! [`Mesh`] is a leaf owning GPU buffers; [`MeshGroup`] aggregates nodes and
//! forwards every [`DrawableNode`] call to its children, so a multi-part model
//! is handled exactly like a single mesh.

mod group;
mod leaf;
mod node;
mod vertex;

pub use group::MeshGroup;
pub use leaf::Mesh;
pub use node::{DrawCtx, DrawableNode, NodeId};
pub use vertex::{Usage, Vertex};
