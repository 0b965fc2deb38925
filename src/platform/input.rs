use std::collections::HashSet;

use cgmath::Vector2;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::{Input, Key, MouseButton};

/// Tracks keyboard and mouse state from window events.
#[derive(Debug, Clone)]
pub struct InputState {
    keys_down: HashSet<Key>,
    buttons_down: HashSet<MouseButton>,
    cursor: Vector2<f32>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            keys_down: HashSet::new(),
            buttons_down: HashSet::new(),
            cursor: Vector2::new(0.0, 0.0),
        }
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Space => Key::Space,
        KeyCode::Enter => Key::Enter,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        _ => return None,
    })
}

fn map_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(key) = map_key(code) {
                        self.set_key(key, event.state == ElementState::Pressed);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = map_button(*button) {
                    self.set_button(button, *state == ElementState::Pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.set_cursor(Vector2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::Focused(false) => {
                self.keys_down.clear();
                self.buttons_down.clear();
            }
            _ => {}
        }
    }

    pub fn set_key(&mut self, key: Key, down: bool) {
        if down {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
    }

    pub fn set_button(&mut self, button: MouseButton, down: bool) {
        if down {
            self.buttons_down.insert(button);
        } else {
            self.buttons_down.remove(&button);
        }
    }

    pub fn set_cursor(&mut self, position: Vector2<f32>) {
        self.cursor = position;
    }
}

impl Input for InputState {
    fn key_pressed(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    fn mouse_position(&self) -> Vector2<f32> {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_held_until_released() {
        let mut input = InputState::new();
        input.set_key(Key::Escape, true);
        assert!(input.key_pressed(Key::Escape));
        assert!(!input.key_pressed(Key::Space));
        input.set_key(Key::Escape, false);
        assert!(!input.key_pressed(Key::Escape));
    }

    #[test]
    fn cursor_and_buttons() {
        let mut input = InputState::new();
        input.set_cursor(Vector2::new(512.0, 384.0));
        input.set_button(MouseButton::Left, true);
        assert!(input.mouse_pressed(MouseButton::Left));
        assert_eq!(input.mouse_position(), Vector2::new(512.0, 384.0));
    }

    #[test]
    fn losing_focus_releases_everything() {
        let mut input = InputState::new();
        input.set_key(Key::W, true);
        input.set_button(MouseButton::Right, true);
        input.handle_event(&WindowEvent::Focused(false));
        assert!(!input.key_pressed(Key::W));
        assert!(!input.mouse_pressed(MouseButton::Right));
    }

    #[test]
    fn winit_codes_map_to_keys() {
        assert_eq!(map_key(KeyCode::Escape), Some(Key::Escape));
        assert_eq!(map_key(KeyCode::KeyD), Some(Key::D));
        assert_eq!(map_key(KeyCode::F1), None);
        assert_eq!(
            map_button(winit::event::MouseButton::Left),
            Some(MouseButton::Left)
        );
    }
}
