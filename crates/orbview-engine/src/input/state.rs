use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButtonEvent,
    PointerMoveEvent,
};

/// Logical pixels per wheel "line" when a device reports pixel deltas.
const PIXELS_PER_LINE: f32 = 40.0;

/// Immediate-mode input queries.
///
/// The camera controller reads input through this trait rather than through a
/// concrete window type, so tests can drive it with a plain `InputState`.
pub trait InputSource {
    /// Pointer position in logical pixels, `None` when outside the window.
    fn pointer_position(&self) -> Option<(f32, f32)>;

    fn is_button_down(&self, button: MouseButton) -> bool;

    fn is_key_down(&self, key: Key) -> bool;
}

/// Current input state for a single window.
///
/// Holds "is down" information and current pointer position.
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Conservative behavior: on focus loss, clear "down" sets.
                    // Avoids stuck keys/buttons when focus changes mid-press.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
                ..
            } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        let inserted = self.keys_down.insert(*key);
                        if inserted {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        let removed = self.keys_down.remove(key);
                        if removed {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent {
                                          button,
                                          state,
                                          x,
                                          y,
                                          modifiers,
                                      }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;

                match state {
                    MouseButtonState::Pressed => {
                        let inserted = self.buttons_down.insert(*button);
                        if inserted {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    MouseButtonState::Released => {
                        let removed = self.buttons_down.remove(button);
                        if removed {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }

            InputEvent::MouseWheel { delta, modifiers } => {
                self.modifiers = *modifiers;
                let (dx, dy) = match *delta {
                    MouseWheelDelta::Line { x, y } => (x, y),
                    MouseWheelDelta::Pixel { x, y } => (x / PIXELS_PER_LINE, y / PIXELS_PER_LINE),
                };
                frame.wheel.0 += dx;
                frame.wheel.1 += dy;
            }

        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}
impl InputSource for InputState {
    fn pointer_position(&self) -> Option<(f32, f32)> {
        self.pointer_pos
    }

    fn is_button_down(&self, button: MouseButton) -> bool {
        self.button_down(button)
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.key_down(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            code: 0,
            repeat: false,
        }
    }

    fn button(button: MouseButton, state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn key_press_is_recorded_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, press(Key::W));
        state.apply_event(&mut frame, press(Key::W));
        assert!(state.is_key_down(Key::W));
        assert_eq!(frame.keys_pressed.len(), 1);
        assert_eq!(frame.events.len(), 2);
    }

    #[test]
    fn button_tracks_pointer_position() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, button(MouseButton::Left, MouseButtonState::Pressed, 4.0, 8.0));
        assert!(state.is_button_down(MouseButton::Left));
        assert_eq!(state.pointer_position(), Some((4.0, 8.0)));

        state.apply_event(&mut frame, button(MouseButton::Left, MouseButtonState::Released, 4.0, 8.0));
        assert!(!state.is_button_down(MouseButton::Left));
        assert!(frame.buttons_released.contains(&MouseButton::Left));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, press(Key::A));
        state.apply_event(&mut frame, button(MouseButton::Left, MouseButtonState::Pressed, 0.0, 0.0));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.is_key_down(Key::A));
        assert!(!state.is_button_down(MouseButton::Left));
    }

    #[test]
    fn wheel_accumulates_in_lines() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let m = Modifiers::default();
        state.apply_event(&mut frame, InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: 1.0 },
            modifiers: m,
        });
        state.apply_event(&mut frame, InputEvent::MouseWheel {
            delta: MouseWheelDelta::Pixel { x: 0.0, y: PIXELS_PER_LINE },
            modifiers: m,
        });
        assert_eq!(frame.wheel_lines(), 2.0);

        frame.clear();
        assert_eq!(frame.wheel_lines(), 0.0);
    }
}
