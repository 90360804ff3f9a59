use winit::event::WindowEvent;

use super::ctx::{CleanupCtx, FrameCtx, InitCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`crate::window::Engine`].
pub trait App {
    /// Called once after the window, GPU context and renderer exist and
    /// before the window is shown. Register shaders and build meshes here.
    ///
    /// An error aborts startup; the engine still runs its shutdown sequence.
    fn init(&mut self, ctx: &mut InitCtx<'_, '_>) -> anyhow::Result<()>;

    /// Called for every window event, after input state has seen it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Release GPU resources owned by the app (mesh trees).
    fn cleanup(&mut self, ctx: &mut CleanupCtx<'_, '_>) {
        let _ = ctx;
    }
}
