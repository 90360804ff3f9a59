//! Recording graphics backend for unit tests.

use std::collections::{HashMap, HashSet};

use glam::{Vec2, Vec3, Vec4};

use crate::mesh::{Usage, Vertex};
use crate::shader::ShaderId;

use super::graphics::{Graphics, MeshHandle, MeshResources, UniformLocation, UniformSink};

#[derive(Debug, Clone, PartialEq)]
pub enum Upload {
    I32(u32, i32),
    F32(u32, f32),
    Vec2(u32, Vec2),
    Vec3(u32, Vec3),
    Vec4(u32, Vec4),
    Mat4(u32, [f32; 16]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMesh {
    pub vertices: usize,
    pub indices: usize,
    pub usage: Usage,
}

#[derive(Debug, Default)]
pub struct RecordingGraphics {
    locations: HashMap<(ShaderId, String), u32>,
    unknown_programs: HashSet<ShaderId>,
    current: Option<ShaderId>,
    next_mesh: u32,

    pub location_queries: usize,
    pub uploads: Vec<Upload>,
    pub draws: Vec<(ShaderId, MeshHandle)>,
    pub meshes: HashMap<MeshHandle, RecordedMesh>,
    pub released: Vec<MeshHandle>,
}

impl RecordingGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uniform(mut self, program: ShaderId, name: &str, offset: u32) -> Self {
        self.declare(program, name, offset);
        self
    }

    pub fn declare(&mut self, program: ShaderId, name: &str, offset: u32) {
        self.locations.insert((program, name.to_string()), offset);
    }

    pub fn reject_program(&mut self, program: ShaderId) {
        self.unknown_programs.insert(program);
    }
}

impl UniformSink for RecordingGraphics {
    fn uniform_location(&mut self, program: ShaderId, name: &str) -> Option<UniformLocation> {
        self.location_queries += 1;
        self.locations
            .get(&(program, name.to_string()))
            .map(|&o| UniformLocation(o))
    }

    fn uniform_i32(&mut self, location: UniformLocation, value: i32) {
        self.uploads.push(Upload::I32(location.0, value));
    }

    fn uniform_f32(&mut self, location: UniformLocation, value: f32) {
        self.uploads.push(Upload::F32(location.0, value));
    }

    fn uniform_vec2(&mut self, location: UniformLocation, value: Vec2) {
        self.uploads.push(Upload::Vec2(location.0, value));
    }

    fn uniform_vec3(&mut self, location: UniformLocation, value: Vec3) {
        self.uploads.push(Upload::Vec3(location.0, value));
    }

    fn uniform_vec4(&mut self, location: UniformLocation, value: Vec4) {
        self.uploads.push(Upload::Vec4(location.0, value));
    }

    fn uniform_mat4(&mut self, location: UniformLocation, cols: &[f32; 16]) {
        self.uploads.push(Upload::Mat4(location.0, *cols));
    }
}

impl Graphics for RecordingGraphics {
    fn use_program(&mut self, program: ShaderId) -> bool {
        if self.unknown_programs.contains(&program) {
            return false;
        }
        self.current = Some(program);
        true
    }

    fn draw_mesh(&mut self, mesh: MeshHandle) {
        if let Some(program) = self.current {
            self.draws.push((program, mesh));
        }
    }
}

impl MeshResources for RecordingGraphics {
    fn create_mesh(&mut self, vertices: &[Vertex], indices: &[u32], usage: Usage) -> Option<MeshHandle> {
        self.next_mesh += 1;
        let handle = MeshHandle(self.next_mesh);
        self.meshes.insert(
            handle,
            RecordedMesh {
                vertices: vertices.len(),
                indices: indices.len(),
                usage,
            },
        );
        Some(handle)
    }

    fn update_mesh(&mut self, mesh: MeshHandle, vertices: &[Vertex], indices: &[u32]) -> bool {
        match self.meshes.get_mut(&mesh) {
            Some(m) if m.usage.is_mutable() => {
                m.vertices = vertices.len();
                m.indices = indices.len();
                true
            }
            _ => false,
        }
    }

    fn release_mesh(&mut self, mesh: MeshHandle) {
        self.meshes.remove(&mesh);
        self.released.push(mesh);
    }
}

/// Device on wgpu's noop backend: full validation, no GPU work.
pub fn noop_device() -> (wgpu::Device, wgpu::Queue) {
    wgpu::Device::noop(&wgpu::DeviceDescriptor::default())
}

/// Minimal program matching [`Vertex`] and the shared uniform binding.
pub const FLAT_WGSL: &str = r#"
struct Uniforms {
    u_tint: vec4<f32>,
};

@group(0) @binding(0) var<uniform> u: Uniforms;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) color: vec4<f32>) -> VsOut {
    var out: VsOut;
    out.clip = vec4<f32>(position, 1.0);
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return in.color * u.u_tint;
}
"#;
