// Character system
//
// This module contains everything related to the playable character:
// - Movement tuning and the values derived from it
// - Motion state (velocity, facing, contact flags)
// - The controller that turns input and contacts into movement
// - Contact classification and the level reset hook
// - Animation state for the presentation layer

pub mod animation;
pub mod config;
pub mod contact;
pub mod controller;
pub mod motion;

// Re-export commonly used types
pub use animation::{AnimationState, AnimationTracker};
pub use config::{CharacterConfig, ConfigError, BASE_CONFIG};
pub use contact::{
    ContactCategory, ContactEvent, ContactOutcome, HitDirection, LevelResetTrigger, RESET_DELAY,
};
pub use controller::{CharacterController, ControllerBuilder, ControllerError};
pub use motion::MotionState;
