use std::collections::HashSet;

use super::types::{ButtonState, Key, Modifiers};

/// Polled keyboard state.
///
/// Events are buffered as they arrive; `update()` (once per frame) publishes
/// the buffered press/release transitions for that frame. `is_down` always
/// reflects the latest event.
#[derive(Debug, Default)]
pub struct Keyboard {
    down: HashSet<Key>,
    pressed: HashSet<Key>,
    released: HashSet<Key>,
    pending_pressed: HashSet<Key>,
    pending_released: HashSet<Key>,
    modifiers: Modifiers,
}

impl Keyboard {
    pub(crate) fn handle_key(&mut self, key: Key, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                // Key repeat does not produce a new press.
                if self.down.insert(key) {
                    self.pending_pressed.insert(key);
                }
            }
            ButtonState::Released => {
                if self.down.remove(&key) {
                    self.pending_released.insert(key);
                }
            }
        }
    }

    pub(crate) fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Releases every held key, e.g. on focus loss.
    pub(crate) fn release_all(&mut self) {
        self.pending_released.extend(self.down.drain());
    }

    pub(crate) fn update(&mut self) {
        std::mem::swap(&mut self.pressed, &mut self.pending_pressed);
        std::mem::swap(&mut self.released, &mut self.pending_released);
        self.pending_pressed.clear();
        self.pending_released.clear();
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    /// Pressed since the previous frame.
    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Released since the previous frame.
    pub fn was_released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn keys_down(&self) -> impl Iterator<Item = Key> + '_ {
        self.down.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_become_visible_on_update() {
        let mut kb = Keyboard::default();
        kb.handle_key(Key::W, ButtonState::Pressed);

        assert!(kb.is_down(Key::W));
        assert!(!kb.was_pressed(Key::W));

        kb.update();
        assert!(kb.was_pressed(Key::W));

        kb.update();
        assert!(!kb.was_pressed(Key::W));
        assert!(kb.is_down(Key::W));
    }

    #[test]
    fn repeat_press_is_not_a_new_press() {
        let mut kb = Keyboard::default();
        kb.handle_key(Key::A, ButtonState::Pressed);
        kb.update();
        kb.handle_key(Key::A, ButtonState::Pressed);
        kb.update();
        assert!(!kb.was_pressed(Key::A));
    }

    #[test]
    fn tap_within_one_frame_reports_both_edges() {
        let mut kb = Keyboard::default();
        kb.handle_key(Key::Space, ButtonState::Pressed);
        kb.handle_key(Key::Space, ButtonState::Released);
        kb.update();
        assert!(kb.was_pressed(Key::Space));
        assert!(kb.was_released(Key::Space));
        assert!(!kb.is_down(Key::Space));
    }

    #[test]
    fn release_all_clears_held_keys() {
        let mut kb = Keyboard::default();
        kb.handle_key(Key::Shift, ButtonState::Pressed);
        kb.handle_key(Key::D, ButtonState::Pressed);
        kb.release_all();
        kb.update();
        assert_eq!(kb.keys_down().count(), 0);
        assert!(kb.was_released(Key::D));
    }
}
