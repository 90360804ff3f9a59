use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event_loop::ActiveEventLoop;
use winit::monitor::MonitorHandle;
use winit::window::{Fullscreen, Window, WindowAttributes};

use crate::logging::SYSTEM_TARGET;

/// Window settings read at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    /// Logical size.
    pub width: u32,
    pub height: u32,
    /// Index into the platform's monitor list.
    pub monitor: usize,
    /// Borderless fullscreen on the selected monitor.
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "lucent".to_string(),
            width: 1280,
            height: 720,
            monitor: 0,
            fullscreen: false,
        }
    }
}

impl WindowConfig {
    /// Attributes for a hidden window placed on `monitor`.
    ///
    /// The window is shown once initialization has finished.
    pub(crate) fn attributes(&self, monitor: Option<&MonitorHandle>) -> WindowAttributes {
        let size = LogicalSize::new(self.width as f64, self.height as f64);
        let mut attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(size)
            .with_visible(false);

        if let Some(m) = monitor {
            if self.fullscreen {
                attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(Some(m.clone()))));
            } else {
                let physical: PhysicalSize<u32> = size.to_physical(m.scale_factor());
                let (x, y) = centered_origin(m.position(), m.size(), physical);
                attrs = attrs.with_position(PhysicalPosition::new(x, y));
            }
        } else if self.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        attrs
    }
}

/// Picks monitor `index`, falling back to the primary monitor, then to the
/// first one. `None` when the platform reports no monitors.
pub(crate) fn select_monitor(event_loop: &ActiveEventLoop, index: usize) -> Option<MonitorHandle> {
    let monitors: Vec<MonitorHandle> = event_loop.available_monitors().collect();
    log::info!(target: SYSTEM_TARGET, "{} monitor(s) available", monitors.len());

    let picked = pick_monitor(&monitors, index, event_loop.primary_monitor());
    match &picked {
        Some(m) => log::info!(
            target: SYSTEM_TARGET,
            "using monitor {} ({})",
            index,
            m.name().unwrap_or_else(|| "unnamed".to_string())
        ),
        None => log::warn!("no monitor available; letting the platform place the window"),
    }
    picked
}

fn pick_monitor<T: Clone>(monitors: &[T], index: usize, primary: Option<T>) -> Option<T> {
    if let Some(m) = monitors.get(index) {
        return Some(m.clone());
    }
    if !monitors.is_empty() {
        log::warn!("monitor {index} not found ({} available); using primary", monitors.len());
    }
    primary.or_else(|| monitors.first().cloned())
}

/// Top-left corner that centers a window of `window` size on a monitor.
fn centered_origin(
    monitor_pos: PhysicalPosition<i32>,
    monitor_size: PhysicalSize<u32>,
    window: PhysicalSize<u32>,
) -> (i32, i32) {
    let dx = (monitor_size.width as i64 - window.width as i64) / 2;
    let dy = (monitor_size.height as i64 - window.height as i64) / 2;
    (
        monitor_pos.x.saturating_add(dx.max(0) as i32),
        monitor_pos.y.saturating_add(dy.max(0) as i32),
    )
}
