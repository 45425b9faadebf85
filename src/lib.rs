// Rusted Platformer
//
// A 2D platformer character controller: input and contact queries in,
// velocity, position and an animation state out.

pub mod core;
pub mod engine;
pub mod game;
