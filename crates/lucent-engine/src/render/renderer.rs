use std::collections::{HashMap, HashSet};

use glam::Vec4;
use winit::window::Window;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::mesh::{DrawCtx, DrawableNode, Usage};
use crate::shader::{ShaderDesc, ShaderError, ShaderId, ShaderLibrary};

use super::arena::{self, UniformArena};
use super::config::{FrameLimiter, RendererConfig};
use super::meshes::{MeshAllocator, MeshStore};
use super::pass::{FramePass, FrameRecording, ProgramState};
use super::pipeline::build_pipeline;

/// Which attachments are cleared at the start of a presented frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ClearFlags {
    pub color: bool,
    pub depth: bool,
}

impl Default for ClearFlags {
    fn default() -> Self {
        Self {
            color: true,
            depth: true,
        }
    }
}

/// Graphics manager: shader programs, their pipelines, mesh buffers and the
/// per-frame uniform arena.
///
/// Draws are recorded during the frame and submitted in one render pass by
/// [`Renderer::present`].
pub struct Renderer {
    shaders: ShaderLibrary,
    programs: HashMap<ShaderId, ProgramState>,
    pipelines: HashMap<ShaderId, wgpu::RenderPipeline>,
    /// Programs whose pipeline failed to compile; never retried.
    rejected: HashSet<ShaderId>,

    uniform_layout: wgpu::BindGroupLayout,
    arena: UniformArena,
    meshes: MeshStore,
    frame: FrameRecording,

    surface_format: wgpu::TextureFormat,
    limiter: FrameLimiter,
    clear_color: Vec4,
    clear: ClearFlags,
}

impl Renderer {
    pub fn new(gpu: &Gpu<'_>, config: &RendererConfig) -> Self {
        Self::with_device(gpu.device(), gpu.surface_format(), config)
    }

    pub(crate) fn with_device(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        config: &RendererConfig,
    ) -> Self {
        let uniform_layout = arena::bind_group_layout(device);
        let arena = UniformArena::new(device, &uniform_layout);

        Self {
            shaders: ShaderLibrary::new(),
            programs: HashMap::new(),
            pipelines: HashMap::new(),
            rejected: HashSet::new(),
            uniform_layout,
            arena,
            meshes: MeshStore::default(),
            frame: FrameRecording::default(),
            surface_format,
            limiter: FrameLimiter::new(config.max_fps),
            clear_color: config.clear_color,
            clear: ClearFlags::default(),
        }
    }

    pub fn shaders(&self) -> &ShaderLibrary {
        &self.shaders
    }

    pub fn shaders_mut(&mut self) -> &mut ShaderLibrary {
        &mut self.shaders
    }

    /// Registers a program. Its pipeline is compiled on the next [`Renderer::update`].
    pub fn register_shader(&mut self, desc: ShaderDesc) -> Result<ShaderId, ShaderError> {
        self.shaders.register(desc)
    }

    /// Compiles pipelines for programs registered since the last call.
    ///
    /// A program that fails to compile is logged and left out; draws using it
    /// are skipped.
    pub fn update(&mut self, device: &wgpu::Device) {
        for program in self.shaders.iter() {
            let id = program.id();
            if self.programs.contains_key(&id) || self.rejected.contains(&id) {
                continue;
            }
            match build_pipeline(device, self.surface_format, &self.uniform_layout, program) {
                Ok(pipeline) => {
                    log::debug!("compiled pipeline for `{}` ({id})", program.name());
                    self.pipelines.insert(id, pipeline);
                    self.programs.insert(id, ProgramState::new(program.layout().clone()));
                }
                Err(err) => {
                    log::error!("shader `{}` ({id}) failed to compile: {err}", program.name());
                    self.rejected.insert(id);
                }
            }
        }
    }

    /// Whether `id` has a compiled pipeline.
    pub fn is_ready(&self, id: ShaderId) -> bool {
        self.pipelines.contains_key(&id)
    }

    /// Starts recording a new frame; draws left from a skipped frame are dropped.
    pub fn begin_frame(&mut self) {
        self.frame.clear();
    }

    /// Runs `draw` against the frame being recorded.
    pub fn record<F>(&mut self, draw: F)
    where
        F: FnOnce(&mut DrawCtx<'_>),
    {
        let mut pass = FramePass::new(&mut self.programs, &mut self.frame);
        let mut ctx = DrawCtx::new(&mut pass, &mut self.shaders);
        draw(&mut ctx);
    }

    /// Mesh buffer allocation against `gpu`.
    pub fn resources<'a>(&'a mut self, gpu: &'a Gpu<'_>) -> MeshAllocator<'a> {
        self.allocator(gpu.device(), gpu.queue())
    }

    pub(crate) fn allocator<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
    ) -> MeshAllocator<'a> {
        MeshAllocator::new(device, queue, &mut self.meshes)
    }

    /// Allocates buffers for `node` and binds the program `shader`.
    pub fn init_node(
        &mut self,
        gpu: &Gpu<'_>,
        node: &mut dyn DrawableNode,
        usage: Usage,
        shader: ShaderId,
    ) -> bool {
        let Some(program) = self.shaders.get(shader) else {
            log::error!("{}: cannot init with unknown {shader}", node.id());
            return false;
        };
        let mut res = MeshAllocator::new(gpu.device(), gpu.queue(), &mut self.meshes);
        node.init(&mut res, usage, program);
        true
    }

    /// Frame cap check; consumes the presentation slot when it returns `true`.
    pub fn should_render(&mut self, now_millis: u64) -> bool {
        self.limiter.should_render(now_millis)
    }

    pub fn background_color(&self) -> Vec4 {
        self.clear_color
    }

    pub fn set_background_color(&mut self, color: Vec4) {
        self.clear_color = color;
    }

    pub fn clear_flags(&self) -> ClearFlags {
        self.clear
    }

    pub fn set_clear_flags(&mut self, flags: ClearFlags) {
        self.clear = flags;
    }

    /// Submits the recorded draws and presents the frame.
    pub fn present(&mut self, gpu: &mut Gpu<'_>, window: &Window) -> Result<(), SurfaceErrorAction> {
        let mut frame = match gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::warn!("surface acquisition failed: {err}");
                return Err(gpu.handle_surface_error(err));
            }
        };

        self.arena
            .ensure_capacity(gpu.device(), &self.uniform_layout, self.frame.slots());
        self.arena.upload(gpu.queue(), &self.frame.arena);

        let c = self.clear_color.as_dvec4();
        let color_load = if self.clear.color {
            wgpu::LoadOp::Clear(wgpu::Color { r: c.x, g: c.y, b: c.z, a: c.w })
        } else {
            wgpu::LoadOp::Load
        };
        let depth_load = if self.clear.depth {
            wgpu::LoadOp::Clear(1.0)
        } else {
            wgpu::LoadOp::Load
        };

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("lucent mesh pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: gpu.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for call in &self.frame.calls {
                let (Some(pipeline), Some(mesh)) =
                    (self.pipelines.get(&call.program), self.meshes.get(call.mesh))
                else {
                    log::warn!("dropping draw of released mesh {}", call.mesh.0);
                    continue;
                };

                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(0, self.arena.bind_group(), &[call.offset]);
                rpass.set_vertex_buffer(0, mesh.vertex.slice(..));
                rpass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        window.pre_present_notify();
        gpu.submit(frame);
        self.frame.clear();
        Ok(())
    }

    /// Drops every GPU object owned by the renderer. Must run before the
    /// device is destroyed. Returns how many meshes were still allocated.
    pub fn release_all(&mut self) -> usize {
        let leaked = self.meshes.clear();
        if leaked > 0 {
            log::warn!("{leaked} mesh(es) were not cleaned up by their owners");
        }
        self.frame.clear();
        self.pipelines.clear();
        self.programs.clear();
        self.rejected.clear();
        log::debug!("renderer resources released");
        leaked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use crate::render::testing::{noop_device, RecordingGraphics, FLAT_WGSL};
    use crate::shader::UniformType;

    fn renderer(device: &wgpu::Device) -> Renderer {
        Renderer::with_device(device, wgpu::TextureFormat::Rgba8UnormSrgb, &RendererConfig::default())
    }

    fn flat(name: &str, source: &str) -> ShaderDesc {
        ShaderDesc::new(name, source).uniform("u_tint", UniformType::Vec4)
    }

    #[test]
    fn broken_program_is_skipped_without_panicking() {
        let (device, _queue) = noop_device();
        let mut renderer = renderer(&device);
        let good = renderer.register_shader(flat("flat", FLAT_WGSL)).unwrap();
        let bad = renderer.register_shader(flat("broken", "this is not wgsl")).unwrap();

        renderer.update(&device);
        assert!(renderer.is_ready(good));
        assert!(!renderer.is_ready(bad));

        // Not retried on later updates.
        renderer.update(&device);
        assert!(!renderer.is_ready(bad));
        assert!(renderer.rejected.contains(&bad));
    }

    #[test]
    fn draws_with_a_broken_program_are_dropped() {
        let (device, _queue) = noop_device();
        let mut renderer = renderer(&device);
        let good = renderer.register_shader(flat("flat", FLAT_WGSL)).unwrap();
        let bad = renderer.register_shader(flat("broken", "fn vs_main(")).unwrap();
        renderer.update(&device);

        let mut res = RecordingGraphics::new();
        let mut drawn = Mesh::quad(1.0, 1.0, [1.0; 4]);
        drawn.init(&mut res, Usage::Static, renderer.shaders().get(good).unwrap());
        let mut skipped = Mesh::quad(1.0, 1.0, [1.0; 4]);
        skipped.init(&mut res, Usage::Static, renderer.shaders().get(bad).unwrap());

        renderer.begin_frame();
        renderer.record(|draw| {
            skipped.render(draw);
            drawn.render(draw);
        });

        assert_eq!(renderer.frame.calls.len(), 1);
        assert_eq!(renderer.frame.calls[0].program, good);
    }

    #[test]
    fn release_all_forgets_rejected_programs() {
        let (device, _queue) = noop_device();
        let mut renderer = renderer(&device);
        renderer.register_shader(flat("broken", "nope")).unwrap();
        renderer.update(&device);
        assert_eq!(renderer.rejected.len(), 1);

        assert_eq!(renderer.release_all(), 0);
        assert!(renderer.rejected.is_empty());
        assert!(renderer.pipelines.is_empty());
    }
}
