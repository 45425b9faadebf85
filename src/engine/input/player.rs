// Player input state: pressed/edge tracking plus a smoothed horizontal axis

use super::action::Action;
use super::InputSampler;
use crate::core::math::move_towards;
use std::collections::HashSet;

/// How fast the axis moves toward a held direction (units per second)
const AXIS_SENSITIVITY: f32 = 3.0;

/// How fast the axis falls back to zero with no direction held (units per second)
const AXIS_GRAVITY: f32 = 3.0;

/// Input state for the local player
#[derive(Debug, Default)]
pub struct PlayerInput {
    /// Actions that are currently pressed
    pressed: HashSet<Action>,

    /// Actions that were pressed since the last `end_frame`
    just_pressed: HashSet<Action>,

    /// Actions that were released since the last `end_frame`
    just_released: HashSet<Action>,

    /// Smoothed horizontal axis in [-1, 1]
    axis: f32,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Register an action press
    pub(crate) fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub(crate) fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Unsmoothed horizontal direction from the held movement keys
    pub fn raw_axis(&self) -> f32 {
        let mut horizontal = 0.0;
        if self.is_pressed(Action::MoveLeft) {
            horizontal -= 1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            horizontal += 1.0;
        }
        horizontal
    }

    /// Advance axis smoothing by `dt`. Call once per frame, before the
    /// character reads the axis.
    pub fn update_axis(&mut self, dt: f32) {
        let raw = self.raw_axis();
        if raw == 0.0 {
            self.axis = move_towards(self.axis, 0.0, AXIS_GRAVITY * dt);
            return;
        }

        // Snap through zero when the direction reverses
        if self.axis != 0.0 && self.axis.signum() != raw.signum() {
            self.axis = 0.0;
        }
        self.axis = move_towards(self.axis, raw, AXIS_SENSITIVITY * dt);
    }

    /// Clear per-frame edges. Call once per frame after the character ran.
    pub(crate) fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
        self.axis = 0.0;
    }
}

impl InputSampler for PlayerInput {
    fn axis(&self) -> f32 {
        self.axis
    }

    fn jump_pressed_this_frame(&self) -> bool {
        self.just_pressed(Action::Jump)
    }

    fn jump_held(&self) -> bool {
        self.is_pressed(Action::Jump)
    }
}
