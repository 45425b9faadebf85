// Animation state derived from character motion

use super::motion::MotionState;

/// Vertical speed beyond which the character reads as jumping or falling
pub const AIRBORNE_SPEED_THRESHOLD: f32 = 1.5;

/// Animation the presentation layer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Running,
    Jumping,
    Falling,
}

impl AnimationState {
    /// Map motion to an animation. Pure; recomputed every tick.
    pub fn from_motion(motion: &MotionState) -> Self {
        let vy = motion.velocity.y;
        if vy > AIRBORNE_SPEED_THRESHOLD {
            Self::Jumping
        } else if vy < -AIRBORNE_SPEED_THRESHOLD {
            Self::Falling
        } else if motion.running() {
            Self::Running
        } else {
            Self::Idle
        }
    }

    /// Index used by sprite animators
    pub fn index(&self) -> i32 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::Jumping => 2,
            Self::Falling => 3,
        }
    }

    /// Get the animation clip name for this state
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "run",
            Self::Jumping => "jump",
            Self::Falling => "fall",
        }
    }
}

/// Follows the animation state across ticks so presentation code can react
/// to transitions
#[derive(Debug, Default)]
pub struct AnimationTracker {
    current: AnimationState,
    previous: AnimationState,
    /// Seconds spent in the current state
    state_time: f32,
}

impl AnimationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this tick's state; returns true if it changed
    pub fn update(&mut self, state: AnimationState, dt: f32) -> bool {
        if state == self.current {
            self.state_time += dt;
            return false;
        }

        log::debug!(
            "Animation {} -> {} (index {}) after {:.2}s",
            self.current.animation_name(),
            state.animation_name(),
            state.index(),
            self.state_time
        );
        self.previous = self.current;
        self.current = state;
        self.state_time = 0.0;
        true
    }

    pub fn current(&self) -> AnimationState {
        self.current
    }

    pub fn previous(&self) -> AnimationState {
        self.previous
    }
}
