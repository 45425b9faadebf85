// Collision events the character reacts to, and the reset hook it drives

use glam::Vec2;

use crate::core::math::direction_test;

/// Seconds between a death or finish and the level reload
pub const RESET_DELAY: f32 = 2.0;

/// What the character touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactCategory {
    Player,
    Enemy,
    Finish,
}

/// A contact delivered by the physics layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub category: ContactCategory,
    /// World position of the other object
    pub other_position: Vec2,
}

impl ContactEvent {
    pub fn new(category: ContactCategory, other_position: Vec2) -> Self {
        Self {
            category,
            other_position,
        }
    }
}

/// Where the other object sits relative to the character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitDirection {
    Below,
    Left,
    Right,
}

impl HitDirection {
    /// Classify a contact. Below is tested first, so a diagonal contact that
    /// is both below and to the side counts as below.
    pub fn classify(character: Vec2, other: Vec2) -> Option<Self> {
        if direction_test(character, other, Vec2::NEG_Y) {
            Some(Self::Below)
        } else if direction_test(character, other, Vec2::NEG_X) {
            Some(Self::Left)
        } else if direction_test(character, other, Vec2::X) {
            Some(Self::Right)
        } else {
            None
        }
    }
}

/// How the character responded to a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Landed on an enemy and bounced off it
    Stomped,
    /// Ran into an enemy; a reload is scheduled
    Killed,
    /// Reached the finish flag; a reload is scheduled
    Finished,
    /// Nothing happened
    Ignored,
}

/// Reloads the current level after a delay. Fire-and-forget: a scheduled
/// reload cannot be taken back.
pub trait LevelResetTrigger {
    fn schedule_reload(&mut self, delay: f32);
}
