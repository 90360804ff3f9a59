//! Engine configuration.
//!
//! `Properties` is the raw sectioned key/value source; `EngineConfig` is the
//! typed view the engine consumes at startup.

mod properties;

pub use properties::{ConfigError, Properties};

use crate::device::GpuInit;
use crate::render::RendererConfig;
use crate::window::WindowConfig;

/// Everything the engine reads at startup.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub gpu: GpuInit,
    pub renderer: RendererConfig,
}

impl EngineConfig {
    /// Reads the `window` and `graphics` sections; absent keys keep defaults.
    pub fn from_properties(props: &Properties) -> Self {
        let defaults = Self::default();

        let window = WindowConfig {
            title: props.get_str("window", "title", &defaults.window.title).to_string(),
            width: clamp_u32(props.get_int("window", "width", defaults.window.width.into()), 1),
            height: clamp_u32(props.get_int("window", "height", defaults.window.height.into()), 1),
            monitor: usize::try_from(props.get_int("window", "monitor", 0)).unwrap_or(0),
            fullscreen: props.get_bool("window", "fullscreen", defaults.window.fullscreen),
        };

        let vsync = props.get_bool("graphics", "vsync", true);
        let gpu = GpuInit {
            present_mode: if vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            ..defaults.gpu
        };

        let renderer = RendererConfig {
            max_fps: clamp_u32(props.get_int("graphics", "max_fps", 0), 0),
            ..defaults.renderer
        };

        Self { window, gpu, renderer }
    }
}

/// Saturates an integer property into `min..=u32::MAX`.
fn clamp_u32(value: i64, min: u32) -> u32 {
    value.clamp(min.into(), u32::MAX.into()) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_properties_are_empty() {
        let cfg = EngineConfig::from_properties(&Properties::new());
        assert_eq!(cfg.window.monitor, 0);
        assert_eq!((cfg.window.width, cfg.window.height), (1280, 720));
        assert!(!cfg.window.fullscreen);
        assert_eq!(cfg.gpu.present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(cfg.renderer.max_fps, 0);
    }

    #[test]
    fn reads_window_and_graphics_sections() {
        let props = Properties::from_json_str(
            r#"{
                "window": { "monitor": 1, "width": 800, "height": -5, "title": "t" },
                "graphics": { "vsync": 0, "max_fps": 144 }
            }"#,
        )
        .unwrap();
        let cfg = EngineConfig::from_properties(&props);
        assert_eq!(cfg.window.monitor, 1);
        assert_eq!(cfg.window.width, 800);
        assert_eq!(cfg.window.height, 1);
        assert_eq!(cfg.window.title, "t");
        assert_eq!(cfg.gpu.present_mode, wgpu::PresentMode::AutoNoVsync);
        assert_eq!(cfg.renderer.max_fps, 144);
    }

    #[test]
    fn out_of_range_integers_saturate() {
        let props = Properties::from_json_str(
            r#"{
                "window": { "monitor": -2, "width": 5000000000, "height": 0 },
                "graphics": { "max_fps": -30 }
            }"#,
        )
        .unwrap();
        let cfg = EngineConfig::from_properties(&props);
        assert_eq!(cfg.window.width, u32::MAX);
        assert_eq!(cfg.window.height, 1);
        assert_eq!(cfg.window.monitor, 0);
        assert_eq!(cfg.renderer.max_fps, 0);
    }
}
