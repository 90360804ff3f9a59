use glam::{Vec2, Vec3, Vec4};

use crate::mesh::{Usage, Vertex};
use crate::shader::ShaderId;

/// Resolved location of a uniform inside a program.
///
/// For the wgpu backend this is the byte offset inside the program's uniform block.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub u32);

/// Handle to GPU vertex/index buffers owned by a mesh.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MeshHandle(pub(crate) u32);

/// Uniform lookup and typed upload calls.
///
/// Uploads target the program that owns the location; values persist with that
/// program until overwritten.
pub trait UniformSink {
    /// Returns `None` if `program` does not declare `name`.
    fn uniform_location(&mut self, program: ShaderId, name: &str) -> Option<UniformLocation>;

    fn uniform_i32(&mut self, location: UniformLocation, value: i32);
    fn uniform_f32(&mut self, location: UniformLocation, value: f32);
    fn uniform_vec2(&mut self, location: UniformLocation, value: Vec2);
    fn uniform_vec3(&mut self, location: UniformLocation, value: Vec3);
    fn uniform_vec4(&mut self, location: UniformLocation, value: Vec4);
    /// Column-major 4x4 matrix.
    fn uniform_mat4(&mut self, location: UniformLocation, cols: &[f32; 16]);
}

/// Per-frame drawing surface used by drawable nodes.
pub trait Graphics: UniformSink {
    /// Makes `program` current for subsequent uploads and draws.
    ///
    /// Returns `false` if the program is unknown or not yet compiled.
    fn use_program(&mut self, program: ShaderId) -> bool;

    /// Draws `mesh` with the current program and its staged uniforms.
    fn draw_mesh(&mut self, mesh: MeshHandle);
}

/// GPU buffer allocation for meshes.
pub trait MeshResources {
    fn create_mesh(&mut self, vertices: &[Vertex], indices: &[u32], usage: Usage) -> Option<MeshHandle>;

    /// Replaces the contents of a mutable mesh. Returns `false` if the handle is
    /// unknown or the mesh was allocated as [`Usage::Static`].
    fn update_mesh(&mut self, mesh: MeshHandle, vertices: &[Vertex], indices: &[u32]) -> bool;

    fn release_mesh(&mut self, mesh: MeshHandle);
}
