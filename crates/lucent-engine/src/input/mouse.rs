use std::collections::HashSet;

use glam::Vec2;

use super::types::{ButtonState, MouseButton};

/// Polled mouse state.
///
/// Follows the same buffering rules as [`super::Keyboard`]. Cursor motion and
/// scrolling are accumulated between updates and exposed as per-frame deltas.
#[derive(Debug, Default)]
pub struct Mouse {
    position: Option<Vec2>,
    frame_start: Option<Vec2>,
    delta: Vec2,
    scroll: Vec2,
    pending_scroll: Vec2,

    down: HashSet<MouseButton>,
    pressed: HashSet<MouseButton>,
    released: HashSet<MouseButton>,
    pending_pressed: HashSet<MouseButton>,
    pending_released: HashSet<MouseButton>,
}

impl Mouse {
    pub(crate) fn handle_move(&mut self, x: f32, y: f32) {
        self.position = Some(Vec2::new(x, y));
    }

    pub(crate) fn handle_leave(&mut self) {
        self.position = None;
    }

    pub(crate) fn handle_button(&mut self, button: MouseButton, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                if self.down.insert(button) {
                    self.pending_pressed.insert(button);
                }
            }
            ButtonState::Released => {
                if self.down.remove(&button) {
                    self.pending_released.insert(button);
                }
            }
        }
    }

    pub(crate) fn handle_scroll(&mut self, x: f32, y: f32) {
        self.pending_scroll += Vec2::new(x, y);
    }

    pub(crate) fn release_all(&mut self) {
        self.pending_released.extend(self.down.drain());
    }

    pub(crate) fn update(&mut self) {
        // No delta across enter/leave; the jump is not motion.
        self.delta = match (self.frame_start, self.position) {
            (Some(prev), Some(now)) => now - prev,
            _ => Vec2::ZERO,
        };
        self.frame_start = self.position;

        self.scroll = std::mem::take(&mut self.pending_scroll);

        std::mem::swap(&mut self.pressed, &mut self.pending_pressed);
        std::mem::swap(&mut self.released, &mut self.pending_released);
        self.pending_pressed.clear();
        self.pending_released.clear();
    }

    /// Cursor position in logical pixels, `None` while outside the window.
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Cursor motion over the last frame.
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Scroll accumulated over the last frame.
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    pub fn is_down(&self, button: MouseButton) -> bool {
        self.down.contains(&button)
    }

    pub fn was_pressed(&self, button: MouseButton) -> bool {
        self.pressed.contains(&button)
    }

    pub fn was_released(&self, button: MouseButton) -> bool {
        self.released.contains(&button)
    }
}
