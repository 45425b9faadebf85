// Contact-query capabilities consumed by the character controller

use glam::Vec2;

/// Errors from querying the physics world
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("rigid body is no longer in the physics world")]
    MissingBody,

    #[error("collider is no longer in the physics world")]
    MissingCollider,

    #[error("physics world is already mutably borrowed")]
    WorldBusy,
}

/// Axis directions a contact probe can test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeDirection {
    Down,
    Up,
    Left,
    Right,
}

impl ProbeDirection {
    /// Unit vector for this direction
    pub fn vector(self) -> Vec2 {
        match self {
            Self::Down => Vec2::NEG_Y,
            Self::Up => Vec2::Y,
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
        }
    }

    /// Horizontal direction matching the sign of `x`, if any
    pub fn horizontal(x: f32) -> Option<Self> {
        if x > 0.0 {
            Some(Self::Right)
        } else if x < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }

    /// Vertical direction matching the sign of `y`, if any
    pub fn vertical(y: f32) -> Option<Self> {
        if y > 0.0 {
            Some(Self::Up)
        } else if y < 0.0 {
            Some(Self::Down)
        } else {
            None
        }
    }
}

/// The character's collision footprint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionShape {
    /// Half width and half height of the bounding box
    pub half_extents: Vec2,
    /// False once the collider has been turned into a trigger
    pub solid: bool,
}

impl CollisionShape {
    pub fn new(half_width: f32, half_height: f32) -> Self {
        Self {
            half_extents: Vec2::new(half_width, half_height),
            solid: true,
        }
    }

    /// A shape is usable when both extents are finite and positive
    pub fn is_valid(&self) -> bool {
        self.half_extents.is_finite() && self.half_extents.min_element() > 0.0
    }
}

/// Reports whether a surface touches the character in a direction
pub trait ContactProbe {
    /// Probe from `origin` (the shape's centre) toward `direction`.
    ///
    /// The character's own collider is never reported. When
    /// `include_origin_colliders` is false, colliders that already contain a
    /// probe ray's starting point are ignored too.
    fn probe(
        &self,
        origin: Vec2,
        direction: ProbeDirection,
        shape: &CollisionShape,
        include_origin_colliders: bool,
    ) -> Result<bool, QueryError>;

    /// Gap between the shape's surface and the nearest surface toward
    /// `direction`, looking at most `max_distance` past the shape.
    ///
    /// The gap is negative when the shape already overlaps that surface.
    /// Colliders that contain a ray's starting point are ignored.
    fn sweep(
        &self,
        origin: Vec2,
        direction: ProbeDirection,
        shape: &CollisionShape,
        max_distance: f32,
    ) -> Result<Option<f32>, QueryError>;
}

/// Handle on the character's own collider
pub trait CharacterCollider {
    /// Half extents of the collider's bounding box
    fn half_extents(&self) -> Result<Vec2, QueryError>;

    /// Turn the collider into a sensor or back. A sensor character gets no
    /// contacts from hazards or the flag, which are sensors themselves.
    fn set_trigger(&mut self, trigger: bool) -> Result<(), QueryError>;
}
