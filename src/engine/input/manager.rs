// Input manager - routes winit keyboard events into the player's input state

use super::action::{Action, InputSource};
use super::config::InputConfig;
use super::player::PlayerInput;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::PhysicalKey;

/// Owns the key bindings and the local player's input state
#[derive(Debug)]
pub struct InputManager {
    config: InputConfig,
    player: PlayerInput,
}

impl InputManager {
    /// Create a new input manager with the default bindings
    pub fn new() -> Self {
        Self::with_config(InputConfig::with_defaults())
    }

    pub fn with_config(config: InputConfig) -> Self {
        Self {
            config,
            player: PlayerInput::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            // Key repeats must not produce new press edges
            if event.repeat {
                return;
            }
            self.apply(InputSource::key(key_code), event.state);
        }
    }

    /// Apply a press or release of `source`
    pub fn apply(&mut self, source: InputSource, state: ElementState) {
        let Some(action) = self.config.get_action(source) else {
            return;
        };

        match state {
            ElementState::Pressed => self.player.press(action),
            ElementState::Released => self.player.release(action),
        }
    }

    /// Prepare input for the frame's variable tick
    pub fn begin_frame(&mut self, dt: f32) {
        self.player.update_axis(dt);
    }

    /// Clear per-frame edges once the frame's logic has consumed them
    pub fn end_frame(&mut self) {
        self.player.end_frame();
    }

    pub fn player(&self) -> &PlayerInput {
        &self.player
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.player.just_pressed(action)
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut InputConfig {
        &mut self.config
    }

    /// Drop all held keys (e.g. when the window loses focus)
    pub fn reset(&mut self) {
        self.player.reset();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
