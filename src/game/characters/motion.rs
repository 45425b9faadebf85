// Per-character motion state

use glam::Vec2;

/// Velocity, facing and contact flags for one character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub velocity: Vec2,
    pub facing_right: bool,
    /// Surface directly below this tick
    pub grounded: bool,
    /// Surface directly above this tick
    pub ceiled: bool,
    /// Moving upward from a jump or a bounce
    pub jumping: bool,
    /// Horizontal axis as sampled this tick
    pub input_axis: f32,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            facing_right: true,
            grounded: false,
            ceiled: false,
            jumping: false,
            input_axis: 0.0,
        }
    }
}

impl MotionState {
    /// Moving horizontally or asked to
    pub fn running(&self) -> bool {
        self.velocity.x.abs() > 0.0 || self.input_axis.abs() > 0.0
    }

    /// Turn around if the input points the other way.
    ///
    /// Returns true when the facing changed. Calling again with the same
    /// input is a no-op.
    pub fn face_input(&mut self, axis: f32) -> bool {
        let turn = (self.facing_right && axis < 0.0) || (!self.facing_right && axis > 0.0);
        if turn {
            self.facing_right = !self.facing_right;
        }
        turn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_state() {
        let motion = MotionState::default();
        assert!(motion.facing_right);
        assert!(!motion.running());
        assert!(!motion.jumping);
    }

    #[test]
    fn test_running_from_velocity_or_input() {
        let mut motion = MotionState::default();
        motion.velocity.x = -0.01;
        assert!(motion.running());

        motion.velocity.x = 0.0;
        motion.input_axis = 0.2;
        assert!(motion.running());
    }

    #[test]
    fn test_face_input_flips_once() {
        let mut motion = MotionState::default();

        assert!(motion.face_input(-1.0));
        assert!(!motion.facing_right);

        // Same direction again: no second toggle
        assert!(!motion.face_input(-1.0));
        assert!(!motion.facing_right);

        assert!(motion.face_input(0.5));
        assert!(motion.facing_right);
    }

    #[test]
    fn test_neutral_input_keeps_facing() {
        let mut motion = MotionState::default();
        motion.face_input(-1.0);
        assert!(!motion.face_input(0.0));
        assert!(!motion.facing_right);
    }
}
