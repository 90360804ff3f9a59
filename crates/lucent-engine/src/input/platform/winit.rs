use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::Window;

use crate::input::{ButtonState, InputEvent, Key, Modifiers, MouseButton};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events not represented by the input subsystem.
pub(crate) fn translate_window_event(window: &Window, event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => Some(InputEvent::Key {
            key: map_key(event.physical_key),
            state: map_state(event.state),
            repeat: event.repeat,
        }),
        WindowEvent::ModifiersChanged(m) => Some(InputEvent::ModifiersChanged(map_modifiers(m.state()))),
        WindowEvent::Focused(focused) => Some(InputEvent::Focused(*focused)),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = logical(window, *position);
            Some(InputEvent::CursorMoved { x, y })
        }
        WindowEvent::CursorLeft { .. } => Some(InputEvent::CursorLeft),

        WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::MouseButton {
            button: map_mouse_button(*button),
            state: map_state(*state),
        }),

        WindowEvent::MouseWheel { delta, .. } => {
            let (x, y) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                MouseScrollDelta::PixelDelta(p) => logical(window, *p),
            };
            Some(InputEvent::Scroll { x, y })
        }

        _ => None,
    }
}

fn map_state(state: ElementState) -> ButtonState {
    if state.is_pressed() {
        ButtonState::Pressed
    } else {
        ButtonState::Released
    }
}

/// Physical pixels to logical pixels at the window's current scale.
fn logical(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let pos = pos.to_logical::<f32>(window.scale_factor());
    (pos.x, pos.y)
}

fn map_modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

fn map_mouse_button(button: WinitMouseButton) -> MouseButton {
    use WinitMouseButton as W;
    match button {
        W::Left => MouseButton::Left,
        W::Right => MouseButton::Right,
        W::Middle => MouseButton::Middle,
        W::Back => MouseButton::Back,
        W::Forward => MouseButton::Forward,
        W::Other(code) => MouseButton::Other(code),
    }
}

fn map_key(physical: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = physical else {
        return Key::Unknown(0);
    };

    macro_rules! keymap {
        ($($from:ident => $to:ident),* $(,)?) => {
            match code {
                $(KeyCode::$from => Key::$to,)*
                KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
                KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
                KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
                KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,
                other => Key::Unknown(other as u32),
            }
        };
    }

    keymap! {
        Escape => Escape, Enter => Enter, Tab => Tab, Backspace => Backspace, Space => Space,
        Insert => Insert, Delete => Delete, Home => Home, End => End,
        PageUp => PageUp, PageDown => PageDown,
        ArrowUp => ArrowUp, ArrowDown => ArrowDown, ArrowLeft => ArrowLeft, ArrowRight => ArrowRight,

        KeyA => A, KeyB => B, KeyC => C, KeyD => D, KeyE => E, KeyF => F, KeyG => G,
        KeyH => H, KeyI => I, KeyJ => J, KeyK => K, KeyL => L, KeyM => M, KeyN => N,
        KeyO => O, KeyP => P, KeyQ => Q, KeyR => R, KeyS => S, KeyT => T, KeyU => U,
        KeyV => V, KeyW => W, KeyX => X, KeyY => Y, KeyZ => Z,

        Digit0 => Digit0, Digit1 => Digit1, Digit2 => Digit2, Digit3 => Digit3, Digit4 => Digit4,
        Digit5 => Digit5, Digit6 => Digit6, Digit7 => Digit7, Digit8 => Digit8, Digit9 => Digit9,

        F1 => F1, F2 => F2, F3 => F3, F4 => F4, F5 => F5, F6 => F6,
        F7 => F7, F8 => F8, F9 => F9, F10 => F10, F11 => F11, F12 => F12,
    }
}
