use glam::Vec4;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::config::Properties;
use crate::device::Gpu;
use crate::input::Input;
use crate::mesh::{DrawCtx, DrawableNode, Usage};
use crate::render::{ClearFlags, MeshAllocator, Renderer};
use crate::shader::{ShaderDesc, ShaderError, ShaderId, ShaderLibrary};
use crate::time::FrameTime;

/// Window handle and derived metadata.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Width over height of the drawable area; `1.0` while minimized.
    pub fn aspect_ratio(&self) -> f32 {
        aspect_ratio(self.window.inner_size())
    }
}

fn aspect_ratio(size: PhysicalSize<u32>) -> f32 {
    if size.width == 0 || size.height == 0 {
        1.0
    } else {
        size.width as f32 / size.height as f32
    }
}

/// Context passed to [`super::App::init`].
pub struct InitCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub properties: &'a Properties,
    gpu: &'a Gpu<'w>,
    renderer: &'a mut Renderer,
}

impl<'a, 'w> InitCtx<'a, 'w> {
    pub(crate) fn new(
        window: &'a Window,
        properties: &'a Properties,
        gpu: &'a Gpu<'w>,
        renderer: &'a mut Renderer,
    ) -> Self {
        Self {
            window: WindowCtx { window },
            properties,
            gpu,
            renderer,
        }
    }

    pub fn register_shader(&mut self, desc: ShaderDesc) -> Result<ShaderId, ShaderError> {
        self.renderer.register_shader(desc)
    }

    pub fn shaders(&self) -> &ShaderLibrary {
        self.renderer.shaders()
    }

    pub fn shaders_mut(&mut self) -> &mut ShaderLibrary {
        self.renderer.shaders_mut()
    }

    /// Allocates GPU buffers for `node` (and its children) and binds `shader`.
    ///
    /// Returns `false` if `shader` is not registered.
    pub fn init_node(&mut self, node: &mut dyn DrawableNode, usage: Usage, shader: ShaderId) -> bool {
        self.renderer.init_node(self.gpu, node, usage, shader)
    }

    pub fn resources(&mut self) -> MeshAllocator<'_> {
        self.renderer.resources(self.gpu)
    }

    pub fn set_background_color(&mut self, color: Vec4) {
        self.renderer.set_background_color(color);
    }
}

/// Per-frame context passed to [`super::App::on_frame`].
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub input: &'a Input,
    pub time: FrameTime,
    pub properties: &'a Properties,
    gpu: &'a Gpu<'w>,
    renderer: &'a mut Renderer,
    shutdown: &'a mut bool,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    pub(crate) fn new(
        window: &'a Window,
        input: &'a Input,
        time: FrameTime,
        properties: &'a Properties,
        gpu: &'a Gpu<'w>,
        renderer: &'a mut Renderer,
        shutdown: &'a mut bool,
    ) -> Self {
        Self {
            window: WindowCtx { window },
            input,
            time,
            properties,
            gpu,
            renderer,
            shutdown,
        }
    }

    /// Records draws for this frame. May be called several times; draws are
    /// submitted together when the frame ends.
    pub fn render<F>(&mut self, draw: F)
    where
        F: FnOnce(&mut DrawCtx<'_>),
    {
        self.renderer.record(draw);
    }

    pub fn register_shader(&mut self, desc: ShaderDesc) -> Result<ShaderId, ShaderError> {
        self.renderer.register_shader(desc)
    }

    pub fn shaders(&self) -> &ShaderLibrary {
        self.renderer.shaders()
    }

    pub fn shaders_mut(&mut self) -> &mut ShaderLibrary {
        self.renderer.shaders_mut()
    }

    pub fn init_node(&mut self, node: &mut dyn DrawableNode, usage: Usage, shader: ShaderId) -> bool {
        self.renderer.init_node(self.gpu, node, usage, shader)
    }

    /// Mesh buffer allocation, e.g. for [`crate::mesh::Mesh::set_geometry`].
    pub fn resources(&mut self) -> MeshAllocator<'_> {
        self.renderer.resources(self.gpu)
    }

    pub fn set_background_color(&mut self, color: Vec4) {
        self.renderer.set_background_color(color);
    }

    /// Whether the color attachment is cleared before drawing.
    pub fn clear_screen(&mut self, clear: bool) {
        let flags = self.renderer.clear_flags();
        self.renderer.set_clear_flags(ClearFlags { color: clear, ..flags });
    }

    /// Whether the depth buffer is cleared before drawing.
    pub fn clear_depth_buffer(&mut self, clear: bool) {
        let flags = self.renderer.clear_flags();
        self.renderer.set_clear_flags(ClearFlags { depth: clear, ..flags });
    }

    /// Ends the run after this frame.
    pub fn request_shutdown(&mut self) {
        *self.shutdown = true;
    }

    pub fn is_shutdown_requested(&self) -> bool {
        *self.shutdown
    }
}

/// Context passed to [`super::App::cleanup`]; the GPU device is still alive.
pub struct CleanupCtx<'a, 'w> {
    gpu: &'a Gpu<'w>,
    renderer: &'a mut Renderer,
}

impl<'a, 'w> CleanupCtx<'a, 'w> {
    pub(crate) fn new(gpu: &'a Gpu<'w>, renderer: &'a mut Renderer) -> Self {
        Self { gpu, renderer }
    }

    /// Releases the buffers of `node` and its children.
    pub fn cleanup_node(&mut self, node: &mut dyn DrawableNode) {
        node.cleanup(&mut self.renderer.resources(self.gpu));
    }
}
