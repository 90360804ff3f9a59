use glam::{Mat4, Quat, Vec3, Vec4};

use lucent_engine::core::{CleanupCtx, FrameCtx, InitCtx};
use lucent_engine::input::{Key, MouseButton};
use lucent_engine::logging::{init_logging, LoggingConfig};
use lucent_engine::mesh::{DrawableNode, Mesh, MeshGroup, NodeId, Usage};
use lucent_engine::shader::{ShaderDesc, UniformType, UniformValue};
use lucent_engine::{App, AppControl, Engine, EngineConfig, Properties};

const PROPERTIES_PATH: &str = "lucent.json";

/// One spinning quad of the demo scene.
struct Panel {
    id: NodeId,
    offset: Vec3,
    spin: f32,
}

#[derive(Default)]
struct Demo {
    scene: MeshGroup,
    panels: Vec<Panel>,
    highlight: bool,
}

impl Demo {
    fn build_scene(&mut self) {
        let placements = [
            (Vec3::new(-0.55, 0.0, 0.0), [0.95, 0.35, 0.30, 1.0], 0.8),
            (Vec3::new(0.0, 0.0, 0.0), [0.30, 0.85, 0.45, 1.0], -1.1),
            (Vec3::new(0.55, 0.0, 0.0), [0.30, 0.50, 0.95, 1.0], 1.6),
        ];

        for (offset, color, spin) in placements {
            let id = self.scene.push(Mesh::quad(0.4, 0.4, color));
            self.panels.push(Panel { id, offset, spin });
        }
    }
}

impl App for Demo {
    fn init(&mut self, ctx: &mut InitCtx<'_, '_>) -> anyhow::Result<()> {
        let shader = ctx.register_shader(
            ShaderDesc::new("tinted", include_str!("../shaders/tinted.wgsl"))
                .uniform("u_model", UniformType::Mat4)
                .uniform("u_tint", UniformType::Vec4)
                .uniform("u_time", UniformType::Float)
                .uniform("u_highlight", UniformType::Bool),
        )?;

        // Program-wide defaults; meshes override per draw.
        if let Some(program) = ctx.shaders_mut().get_mut(shader) {
            program.set("u_tint", Vec4::ONE)?;
            program.set("u_highlight", false)?;
        }

        self.build_scene();
        if !ctx.init_node(&mut self.scene, Usage::Static, shader) {
            anyhow::bail!("scene could not be initialized");
        }

        log::info!("demo scene ready: {} meshes", self.scene.len());
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let keyboard = &ctx.input.keyboard;
        if keyboard.was_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        if keyboard.was_pressed(Key::Space) || ctx.input.mouse.was_pressed(MouseButton::Left) {
            self.highlight = !self.highlight;
            self.scene.set_param("u_highlight", UniformValue::from(self.highlight));
        }

        let t = ctx.time.elapsed_millis as f32 / 1000.0;
        if let Some(program) = ctx.shaders_mut().by_name_mut("tinted") {
            let _ = program.set("u_time", t);
        }

        let aspect = ctx.window.aspect_ratio();
        let projection = Mat4::orthographic_rh(-aspect, aspect, -1.0, 1.0, -1.0, 1.0);
        for panel in &self.panels {
            let Some(node) = self.scene.child_mut(panel.id) else { continue };
            let model = projection
                * Mat4::from_rotation_translation(Quat::from_rotation_z(t * panel.spin), panel.offset);
            node.set_param("u_model", model.into());

            let fade = 0.75 + 0.25 * (t + panel.offset.x * 3.0).sin();
            node.set_param("u_tint", Vec4::new(fade, fade, fade, 1.0).into());
        }

        let scene = &mut self.scene;
        ctx.render(|draw| scene.render(draw));

        AppControl::Continue
    }

    fn cleanup(&mut self, ctx: &mut CleanupCtx<'_, '_>) {
        ctx.cleanup_node(&mut self.scene);
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let properties = Properties::load_or_default(PROPERTIES_PATH)?;
    let config = EngineConfig::from_properties(&properties);

    Engine::run(config, properties, Demo::default())
}
