// Character tuning
//
// Designers pick the apex height and the time the whole jump takes; the
// launch velocity and gravity follow from those two numbers.

/// Rejected tuning values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be finite and greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("{name} must be finite and not negative, got {value}")]
    Negative { name: &'static str, value: f32 },
}

/// Character movement tunables
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterConfig {
    /// Top horizontal speed (units/second)
    pub move_speed: f32,
    /// Apex height of a full jump (units)
    pub jump_height: f32,
    /// Duration of a full jump, take-off to landing at the same height (seconds)
    pub jump_time: f32,
    /// Horizontal acceleration as a fraction of `move_speed` per second
    pub acceleration: f32,
}

/// Reference tuning
pub const BASE_CONFIG: CharacterConfig = CharacterConfig {
    move_speed: 8.0,
    jump_height: 4.0,
    jump_time: 1.0,
    acceleration: 1.0,
};

impl Default for CharacterConfig {
    fn default() -> Self {
        BASE_CONFIG
    }
}

impl CharacterConfig {
    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }

    pub fn with_jump(mut self, jump_height: f32, jump_time: f32) -> Self {
        self.jump_height = jump_height;
        self.jump_time = jump_time;
        self
    }

    pub fn with_acceleration(mut self, acceleration: f32) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Check every tunable; derived values are only meaningful after this passes
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("jump_height", self.jump_height)?;
        positive("jump_time", self.jump_time)?;
        non_negative("move_speed", self.move_speed)?;
        non_negative("acceleration", self.acceleration)?;

        // Guard against overflow in the derived constants
        for (name, value) in [("jump_force", self.jump_force()), ("gravity", self.gravity())] {
            if !value.is_finite() {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        Ok(())
    }

    /// Launch velocity reaching `jump_height` at `jump_time / 2`
    pub fn jump_force(&self) -> f32 {
        4.0 * self.jump_height / self.jump_time
    }

    /// Downward acceleration (negative) matching `jump_force`
    pub fn gravity(&self) -> f32 {
        -8.0 * self.jump_height / (self.jump_time * self.jump_time)
    }

    /// Fastest allowed fall speed (negative)
    pub fn terminal_velocity(&self) -> f32 {
        self.gravity() / 1.5
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
