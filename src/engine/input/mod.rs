// Input handling system
//
// Keyboard input for the local player, with rebindable keys and a smoothed
// horizontal axis.
//
// ## Architecture
//
// - `action`: Game actions and default key bindings
// - `config`: Binding map and remapping
// - `player`: Pressed/edge state and axis smoothing
// - `manager`: Routes winit events into the player state
//
// ## Frame order
//
// ```rust,ignore
// // In the event loop, process keyboard events as they arrive
// input_manager.process_keyboard_event(&key_event);
//
// // Once per frame: smooth the axis, run the character, clear edges
// input_manager.begin_frame(dt);
// controller.on_variable_tick(dt, input_manager.player());
// input_manager.end_frame();
// ```

pub mod action;
pub mod config;
pub mod manager;
pub mod player;

pub use action::{Action, InputSource};
pub use config::InputConfig;
pub use manager::InputManager;
pub use player::PlayerInput;

/// Per-frame input the character controller polls
pub trait InputSampler {
    /// Horizontal axis in [-1, 1]
    fn axis(&self) -> f32;

    /// True for exactly one frame per physical press of jump
    fn jump_pressed_this_frame(&self) -> bool;

    /// True while jump is held down
    fn jump_held(&self) -> bool;
}

/// A fixed input sample, for scripted input and replays
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub axis: f32,
    pub jump_pressed: bool,
    pub jump_held: bool,
}

impl InputSnapshot {
    /// Holding a direction, jump untouched
    pub fn axis(axis: f32) -> Self {
        Self {
            axis,
            ..Self::default()
        }
    }

    /// The frame jump goes down (pressed and held)
    pub fn jump_press() -> Self {
        Self {
            axis: 0.0,
            jump_pressed: true,
            jump_held: true,
        }
    }

    /// Jump kept held after the press frame
    pub fn jump_hold() -> Self {
        Self {
            axis: 0.0,
            jump_pressed: false,
            jump_held: true,
        }
    }
}

impl InputSampler for InputSnapshot {
    fn axis(&self) -> f32 {
        self.axis.clamp(-1.0, 1.0)
    }

    fn jump_pressed_this_frame(&self) -> bool {
        self.jump_pressed
    }

    fn jump_held(&self) -> bool {
        self.jump_held
    }
}
