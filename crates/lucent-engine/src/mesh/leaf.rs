use crate::render::{MeshHandle, MeshResources};
use crate::shader::{ShaderId, ShaderProgram, UniformError, UniformSlot, UniformValue};

use super::node::{DrawCtx, DrawableNode, NodeId};
use super::vertex::{Usage, Vertex};

/// A single drawable mesh.
///
/// Owns its CPU geometry, the handle of its GPU buffers and one uniform slot
/// per uniform declared by its shader.
#[derive(Debug)]
pub struct Mesh {
    id: NodeId,
    parent: Option<NodeId>,

    vertices: Vec<Vertex>,
    indices: Vec<u32>,

    usage: Usage,
    handle: Option<MeshHandle>,

    shader: Option<ShaderId>,
    params: Vec<UniformSlot>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            id: NodeId::next(),
            parent: None,
            vertices,
            indices,
            usage: Usage::Static,
            handle: None,
            shader: None,
            params: Vec::new(),
        }
    }

    /// Axis-aligned quad in the XY plane centered on the origin.
    pub fn quad(width: f32, height: f32, color: [f32; 4]) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        let vertices = vec![
            Vertex::new([-hw, -hh, 0.0], color, [0.0, 1.0]),
            Vertex::new([hw, -hh, 0.0], color, [1.0, 1.0]),
            Vertex::new([hw, hh, 0.0], color, [1.0, 0.0]),
            Vertex::new([-hw, hh, 0.0], color, [0.0, 0.0]),
        ];
        Self::new(vertices, vec![0, 1, 2, 0, 2, 3])
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn usage(&self) -> Usage {
        self.usage
    }

    pub fn handle(&self) -> Option<MeshHandle> {
        self.handle
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    pub fn params(&self) -> &[UniformSlot] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&UniformSlot> {
        self.params.iter().find(|p| p.name() == name)
    }

    /// Replaces the geometry, re-uploading it when the mesh was allocated
    /// with a mutable usage hint.
    pub fn set_geometry(
        &mut self,
        res: &mut dyn MeshResources,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
    ) {
        self.vertices = vertices;
        self.indices = indices;

        let Some(handle) = self.handle else { return };
        if !self.usage.is_mutable() {
            log::warn!("{}: geometry changed on a static mesh; call init again to upload", self.id);
            return;
        }
        if !res.update_mesh(handle, &self.vertices, &self.indices) {
            log::error!("{}: failed to update GPU buffers", self.id);
        }
    }
}

impl DrawableNode for Mesh {
    fn id(&self) -> NodeId {
        self.id
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn init(&mut self, res: &mut dyn MeshResources, usage: Usage, shader: &ShaderProgram) {
        if let Some(old) = self.handle.take() {
            res.release_mesh(old);
        }

        self.usage = usage;
        self.handle = res.create_mesh(&self.vertices, &self.indices, usage);
        if self.handle.is_none() {
            log::error!("{}: GPU buffer allocation failed", self.id);
        }

        self.set_shader(shader);
    }

    fn render(&mut self, ctx: &mut DrawCtx<'_>) {
        let Some(handle) = self.handle else {
            log::error!("{}: render called before init", self.id);
            return;
        };
        let Some(shader) = self.shader else {
            log::error!("{}: render called without a shader", self.id);
            return;
        };
        if !ctx.gfx.use_program(shader) {
            log::warn!("{}: {shader} is not ready; skipping draw", self.id);
            return;
        }

        if let Some(program) = ctx.shaders.get_mut(shader) {
            program.push_params(&mut *ctx.gfx);
        }
        for p in self.params.iter_mut().filter(|p| p.is_set()) {
            let _ = p.push_to_graphics(&mut *ctx.gfx);
        }

        ctx.gfx.draw_mesh(handle);
    }

    fn cleanup(&mut self, res: &mut dyn MeshResources) {
        if let Some(handle) = self.handle.take() {
            res.release_mesh(handle);
        }
    }

    fn set_shader(&mut self, shader: &ShaderProgram) {
        // Rebinding the same program keeps the current values.
        if self.shader == Some(shader.id()) {
            return;
        }
        self.shader = Some(shader.id());
        self.params = shader.instance_slots();
    }

    fn shader(&self) -> Option<ShaderId> {
        self.shader
    }

    fn set_param(&mut self, name: &str, value: UniformValue) {
        match self.params.iter_mut().find(|p| p.name() == name) {
            Some(slot) => {
                let _ = slot.set(value);
            }
            None => {
                let err = UniformError::UniformNotFound {
                    name: name.to_string(),
                    shader: self
                        .shader
                        .map_or_else(|| "<none>".to_string(), |s| s.to_string()),
                };
                log::error!("{}: {err}", self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};

    use super::*;
    use crate::render::testing::{RecordingGraphics, Upload};
    use crate::shader::{ShaderDesc, ShaderLibrary, UniformType};

    fn library() -> (ShaderLibrary, ShaderId) {
        let mut lib = ShaderLibrary::new();
        let id = lib
            .register(
                ShaderDesc::new("basic", "")
                    .uniform("u_tint", UniformType::Vec4)
                    .uniform("u_offset", UniformType::Vec3),
            )
            .unwrap();
        (lib, id)
    }

    fn gfx(id: ShaderId) -> RecordingGraphics {
        RecordingGraphics::new()
            .with_uniform(id, "u_tint", 0)
            .with_uniform(id, "u_offset", 16)
    }

    #[test]
    fn init_allocates_and_binds_shader() {
        let (lib, id) = library();
        let mut g = gfx(id);
        let mut mesh = Mesh::quad(1.0, 1.0, [1.0; 4]);

        mesh.init(&mut g, Usage::Dynamic, lib.get(id).unwrap());

        let handle = mesh.handle().unwrap();
        assert_eq!(g.meshes[&handle].vertices, 4);
        assert_eq!(g.meshes[&handle].indices, 6);
        assert_eq!(g.meshes[&handle].usage, Usage::Dynamic);
        assert_eq!(mesh.shader(), Some(id));
        assert_eq!(mesh.params().len(), 2);
        assert!(mesh.params().iter().all(|p| !p.is_set()));
    }

    #[test]
    fn render_pushes_set_params_then_draws() {
        let (mut lib, id) = library();
        let mut g = gfx(id);
        let mut mesh = Mesh::quad(1.0, 1.0, [1.0; 4]);
        mesh.init(&mut g, Usage::Static, lib.get(id).unwrap());
        mesh.set_param("u_offset", Vec3::new(1.0, 2.0, 3.0).into());

        mesh.render(&mut DrawCtx::new(&mut g, &mut lib));

        assert_eq!(g.uploads, vec![Upload::Vec3(16, Vec3::new(1.0, 2.0, 3.0))]);
        assert_eq!(g.draws, vec![(id, mesh.handle().unwrap())]);
    }

    #[test]
    fn program_values_are_pushed_before_mesh_values() {
        let (mut lib, id) = library();
        let mut g = gfx(id);
        let mut mesh = Mesh::quad(1.0, 1.0, [1.0; 4]);
        mesh.init(&mut g, Usage::Static, lib.get(id).unwrap());

        lib.get_mut(id).unwrap().set("u_tint", Vec4::ONE).unwrap();
        mesh.set_param("u_tint", Vec4::ZERO.into());

        mesh.render(&mut DrawCtx::new(&mut g, &mut lib));

        assert_eq!(g.uploads, vec![Upload::Vec4(0, Vec4::ONE), Upload::Vec4(0, Vec4::ZERO)]);
    }

    #[test]
    fn mismatched_param_is_ignored() {
        let (lib, id) = library();
        let mut g = gfx(id);
        let mut mesh = Mesh::quad(1.0, 1.0, [1.0; 4]);
        mesh.init(&mut g, Usage::Static, lib.get(id).unwrap());

        mesh.set_param("u_tint", UniformValue::Float(1.0));
        mesh.set_param("u_unknown", UniformValue::Float(1.0));

        assert!(mesh.params().iter().all(|p| !p.is_set()));
    }

    #[test]
    fn render_before_init_draws_nothing() {
        let (mut lib, id) = library();
        let mut g = gfx(id);
        let mut mesh = Mesh::quad(1.0, 1.0, [1.0; 4]);
        mesh.set_shader(lib.get(id).unwrap());

        mesh.render(&mut DrawCtx::new(&mut g, &mut lib));

        assert!(g.draws.is_empty());
    }

    #[test]
    fn unready_program_skips_draw() {
        let (mut lib, id) = library();
        let mut g = gfx(id);
        g.reject_program(id);
        let mut mesh = Mesh::quad(1.0, 1.0, [1.0; 4]);
        mesh.init(&mut g, Usage::Static, lib.get(id).unwrap());
        mesh.set_param("u_tint", Vec4::ONE.into());

        mesh.render(&mut DrawCtx::new(&mut g, &mut lib));

        assert!(g.draws.is_empty());
        assert!(g.uploads.is_empty());
    }

    #[test]
    fn rebinding_same_shader_keeps_values() {
        let (lib, id) = library();
        let program = lib.get(id).unwrap();
        let mut mesh = Mesh::quad(1.0, 1.0, [1.0; 4]);
        mesh.set_shader(program);
        mesh.set_param("u_tint", Vec4::ONE.into());

        mesh.set_shader(program);
        assert!(mesh.param("u_tint").unwrap().is_set());
    }

    #[test]
    fn reinit_releases_previous_buffers() {
        let (lib, id) = library();
        let mut g = gfx(id);
        let mut mesh = Mesh::quad(1.0, 1.0, [1.0; 4]);
        mesh.init(&mut g, Usage::Static, lib.get(id).unwrap());
        let first = mesh.handle().unwrap();

        mesh.init(&mut g, Usage::Static, lib.get(id).unwrap());

        assert_eq!(g.released, vec![first]);
        assert_ne!(mesh.handle(), Some(first));
    }

    #[test]
    fn geometry_updates_reach_mutable_buffers_only() {
        let (lib, id) = library();
        let mut g = gfx(id);

        let mut dynamic = Mesh::quad(1.0, 1.0, [1.0; 4]);
        dynamic.init(&mut g, Usage::Stream, lib.get(id).unwrap());
        let tri = vec![Vertex::new([0.0; 3], [1.0; 4], [0.0; 2]); 3];
        dynamic.set_geometry(&mut g, tri.clone(), vec![0, 1, 2]);
        assert_eq!(g.meshes[&dynamic.handle().unwrap()].vertices, 3);

        let mut fixed = Mesh::quad(1.0, 1.0, [1.0; 4]);
        fixed.init(&mut g, Usage::Static, lib.get(id).unwrap());
        fixed.set_geometry(&mut g, tri, vec![0, 1, 2]);
        assert_eq!(g.meshes[&fixed.handle().unwrap()].vertices, 4);
        assert_eq!(fixed.vertices().len(), 3);
    }

    #[test]
    fn cleanup_releases_handle_once() {
        let (lib, id) = library();
        let mut g = gfx(id);
        let mut mesh = Mesh::quad(1.0, 1.0, [1.0; 4]);
        mesh.init(&mut g, Usage::Static, lib.get(id).unwrap());
        let handle = mesh.handle().unwrap();

        mesh.cleanup(&mut g);

        assert_eq!(g.released, vec![handle]);
        assert!(!mesh.is_initialized());
    }
}
