use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::{EngineConfig, Properties};
use crate::core::{App, AppControl, CleanupCtx, FrameCtx, InitCtx};
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::platform::translate_window_event;
use crate::input::Input;
use crate::logging::SYSTEM_TARGET;
use crate::render::Renderer;
use crate::time::FrameClock;

use super::config::select_monitor;

/// Entry point: owns the event loop and drives the [`App`].
pub struct Engine;

impl Engine {
    /// Runs `app` until shutdown.
    ///
    /// Failing to create the event loop is returned immediately. A failure
    /// during window/GPU/app initialization is logged, the shutdown sequence
    /// still runs, and the error is returned once the loop has exited.
    pub fn run<A>(config: EngineConfig, properties: Properties, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        log::info!(
            target: SYSTEM_TARGET,
            "lucent engine {} started (wgpu + winit)",
            env!("CARGO_PKG_VERSION")
        );

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = EngineState::new(config, properties, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        log::info!(target: SYSTEM_TARGET, "lucent engine exit");

        match state.startup_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Everything created when the application resumes.
struct Session {
    entry: WindowEntry,
    input: Option<Input>,
    clock: FrameClock,
    renderer: Option<Renderer>,
}

struct EngineState<A>
where
    A: App + 'static,
{
    config: EngineConfig,
    properties: Properties,
    app: A,

    session: Option<Session>,
    shutdown_requested: bool,
    finished: bool,
    startup_error: Option<anyhow::Error>,
}

impl<A> EngineState<A>
where
    A: App + 'static,
{
    fn new(config: EngineConfig, properties: Properties, app: A) -> Self {
        Self {
            config,
            properties,
            app,
            session: None,
            shutdown_requested: false,
            finished: false,
            startup_error: None,
        }
    }

    fn window_id(&self) -> Option<WindowId> {
        self.session
            .as_ref()
            .map(|s| s.entry.with_window(|w| w.id()))
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let cfg = &self.config;

        let monitor = select_monitor(event_loop, cfg.window.monitor);
        let window = event_loop
            .create_window(cfg.window.attributes(monitor.as_ref()))
            .context("failed to create window")?;

        let gpu_init = cfg.gpu.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let input = Input::default();
        log::debug!("input attached");

        let clock = FrameClock::new();
        let mut renderer = Renderer::new(entry.borrow_gpu(), &cfg.renderer);

        let (app, properties) = (&mut self.app, &self.properties);
        let init = entry.with(|fields| {
            let mut ctx = InitCtx::new(fields.window, properties, fields.gpu, &mut renderer);
            app.init(&mut ctx)
        });
        if let Err(e) = init {
            return Err(abandon_init(&mut renderer, e));
        }
        renderer.update(entry.borrow_gpu().device());

        entry.with_window(|w| {
            w.set_visible(true);
            w.focus_window();
            w.request_redraw();
        });
        log::info!(target: SYSTEM_TARGET, "window shown: {}", cfg.window.title);

        self.session = Some(Session {
            entry,
            input: Some(input),
            clock,
            renderer: Some(renderer),
        });
        Ok(())
    }

    fn frame(&mut self) {
        let Some(session) = self.session.as_mut() else { return };
        let Session {
            entry,
            input,
            clock,
            renderer,
        } = session;
        let (Some(input), Some(renderer)) = (input.as_mut(), renderer.as_mut()) else { return };

        let time = clock.tick();
        input.update();

        let (app, properties) = (&mut self.app, &self.properties);
        let mut shutdown = self.shutdown_requested;

        entry.with_mut(|fields| {
            renderer.update(fields.gpu.device());
            renderer.begin_frame();

            let control = {
                let mut ctx = FrameCtx::new(
                    fields.window,
                    input,
                    time,
                    properties,
                    fields.gpu,
                    renderer,
                    &mut shutdown,
                );
                app.on_frame(&mut ctx)
            };
            if control == AppControl::Exit {
                shutdown = true;
            }
            if shutdown || !renderer.should_render(time.elapsed_millis) {
                return;
            }

            if let Err(action) = renderer.present(fields.gpu, fields.window) {
                if action == SurfaceErrorAction::Fatal {
                    log::error!("unrecoverable surface error; shutting down");
                    shutdown = true;
                }
            }
        });

        self.shutdown_requested = shutdown;
    }

    /// Tears everything down in a fixed order: app + renderer resources while
    /// the device is alive, input, GPU surface and window, event loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if self.finished {
            return;
        }
        self.finished = true;
        log::info!(target: SYSTEM_TARGET, "shutting down");

        if let Some(mut session) = self.session.take() {
            if let Some(mut renderer) = session.renderer.take() {
                let app = &mut self.app;
                session.entry.with_gpu(|gpu| {
                    let mut ctx = CleanupCtx::new(gpu, &mut renderer);
                    app.cleanup(&mut ctx);
                });
                renderer.release_all();
            }

            session.input = None;
            log::debug!("input detached");

            // Drops the GPU context before the window it borrows.
            drop(session);
            log::debug!("window destroyed");
        }

        event_loop.exit();
    }
}

/// Releases what the app allocated before its `init` failed.
fn abandon_init(renderer: &mut Renderer, err: anyhow::Error) -> anyhow::Error {
    renderer.release_all();
    err.context("application init failed")
}

impl<A> ApplicationHandler for EngineState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.finished {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.clock.reset();
            return;
        }

        if let Err(e) = self.start(event_loop) {
            log::error!("startup failed: {e:#}");
            self.startup_error = Some(e);
            self.shutdown(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.shutdown_requested {
            self.shutdown(event_loop);
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; the renderer's frame cap decides what is presented.
        if let Some(session) = &self.session {
            session.entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.finished || self.window_id() != Some(window_id) {
            return;
        }

        if let Some(session) = self.session.as_mut() {
            let Session { entry, input, .. } = session;
            if let Some(input) = input.as_mut() {
                if let Some(ev) = entry.with_window(|w| translate_window_event(w, &event)) {
                    input.apply(ev);
                }
            }
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.shutdown_requested = true;
        }

        match &event {
            WindowEvent::CloseRequested => {
                log::info!(target: SYSTEM_TARGET, "window close requested");
                self.shutdown_requested = true;
            }

            WindowEvent::Resized(new_size) => {
                if let Some(session) = self.session.as_mut() {
                    session.entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    session.entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(session) = self.session.as_mut() {
                    let new_size = session.entry.with_window(|w| w.inner_size());
                    session.entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    session.entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => {
                if !self.shutdown_requested {
                    self.frame();
                }
            }

            _ => {}
        }

        if self.shutdown_requested {
            self.shutdown(event_loop);
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        // Reached without a shutdown request when the platform ends the loop.
        self.shutdown(event_loop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Usage, Vertex};
    use crate::render::testing::noop_device;
    use crate::render::{MeshResources, RendererConfig};

    #[test]
    fn failed_init_releases_allocated_meshes() {
        let (device, queue) = noop_device();
        let mut renderer =
            Renderer::with_device(&device, wgpu::TextureFormat::Rgba8UnormSrgb, &RendererConfig::default());

        let triangle = [
            Vertex::new([0.0, 0.0, 0.0], [1.0; 4], [0.0, 0.0]),
            Vertex::new([1.0, 0.0, 0.0], [1.0; 4], [1.0, 0.0]),
            Vertex::new([0.0, 1.0, 0.0], [1.0; 4], [0.0, 1.0]),
        ];
        let handle = renderer
            .allocator(&device, &queue)
            .create_mesh(&triangle, &[0, 1, 2], Usage::Static);
        assert!(handle.is_some());

        let err = abandon_init(&mut renderer, anyhow::anyhow!("scene missing"));
        assert_eq!(format!("{err:#}"), "application init failed: scene missing");
        assert_eq!(renderer.release_all(), 0);
    }
}
