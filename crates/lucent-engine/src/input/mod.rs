//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates window events into [`InputEvent`]s, feeds them to
//! [`Input::apply`] as they arrive and calls [`Input::update`] once per frame.

mod keyboard;
mod mouse;
pub(crate) mod platform;
mod types;

pub use keyboard::Keyboard;
pub use mouse::Mouse;
pub use types::{ButtonState, InputEvent, Key, Modifiers, MouseButton};

/// Keyboard and mouse state attached to one window.
#[derive(Debug, Default)]
pub struct Input {
    pub keyboard: Keyboard,
    pub mouse: Mouse,
    focused: bool,
}

impl Input {
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key { key, state, .. } => self.keyboard.handle_key(key, state),
            InputEvent::ModifiersChanged(m) => self.keyboard.set_modifiers(m),
            InputEvent::CursorMoved { x, y } => self.mouse.handle_move(x, y),
            InputEvent::CursorLeft => self.mouse.handle_leave(),
            InputEvent::MouseButton { button, state } => self.mouse.handle_button(button, state),
            InputEvent::Scroll { x, y } => self.mouse.handle_scroll(x, y),
            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // Avoid stuck keys/buttons when focus changes mid-press.
                    self.keyboard.release_all();
                    self.mouse.release_all();
                }
            }
        }
    }

    /// Publishes the transitions buffered since the previous call.
    pub fn update(&mut self) {
        self.keyboard.update();
        self.mouse.update();
    }

    pub fn focused(&self) -> bool {
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_loss_releases_everything() {
        let mut input = Input::default();
        input.apply(InputEvent::Focused(true));
        input.apply(InputEvent::Key { key: Key::W, state: ButtonState::Pressed, repeat: false });
        input.apply(InputEvent::MouseButton { button: MouseButton::Right, state: ButtonState::Pressed });
        input.update();

        input.apply(InputEvent::Focused(false));
        input.update();

        assert!(!input.focused());
        assert!(!input.keyboard.is_down(Key::W));
        assert!(input.keyboard.was_released(Key::W));
        assert!(!input.mouse.is_down(MouseButton::Right));
    }

    #[test]
    fn events_route_to_devices() {
        let mut input = Input::default();
        input.apply(InputEvent::ModifiersChanged(Modifiers { ctrl: true, ..Default::default() }));
        input.apply(InputEvent::CursorMoved { x: 4.0, y: 2.0 });
        input.apply(InputEvent::Scroll { x: 0.0, y: -1.0 });
        input.update();

        assert!(input.keyboard.modifiers().ctrl);
        assert_eq!(input.mouse.position(), Some(glam::Vec2::new(4.0, 2.0)));
        assert_eq!(input.mouse.scroll().y, -1.0);
    }
}
