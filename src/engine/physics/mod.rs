// Physics system using rapier2d
//
// The character is a kinematic body moved by its controller; rapier is used
// for ray queries against level geometry and for contact events.

pub mod body;
mod collision;
mod probe;
mod query;
mod world;

pub use body::{presets, BodyBuilder, ColliderBuilder2D};
pub use collision::{CollisionEvent, CollisionGroups, Contact, ContactPhase, ContactTracker};
pub use probe::{WorldCollider, WorldProbe};
pub use query::{CharacterCollider, CollisionShape, ContactProbe, ProbeDirection, QueryError};
pub use world::PhysicsWorld;

// Re-export commonly used rapier types for convenience
pub use rapier2d::prelude::{ColliderHandle, Real, RigidBodyHandle, Vector};
