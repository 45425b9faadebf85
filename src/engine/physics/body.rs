use super::collision::CollisionGroups;
use rapier2d::prelude::*;

/// Builder for rigid bodies used by level objects
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    can_sleep: bool,
    locked_axes: LockedAxes,
}

impl BodyBuilder {
    /// Create a new kinematic position-based body (moved explicitly, never by forces)
    pub fn new_kinematic_position_based() -> Self {
        Self {
            body_type: RigidBodyType::KinematicPositionBased,
            position: Isometry::identity(),
            can_sleep: false,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            position: Isometry::identity(),
            can_sleep: false,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Set the position
    pub fn position(mut self, x: Real, y: Real) -> Self {
        self.position = Isometry::translation(x, y);
        self
    }

    /// Set whether the body can sleep
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Lock rotation (common for characters)
    pub fn lock_rotation(mut self) -> Self {
        self.locked_axes |= LockedAxes::ROTATION_LOCKED;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .can_sleep(self.can_sleep)
            .locked_axes(self.locked_axes)
            .build()
    }
}

/// Builder for colliders with common configurations
pub struct ColliderBuilder2D {
    shape: SharedShape,
    collision_groups: CollisionGroups,
    is_sensor: bool,
    friction: Real,
    active_events: ActiveEvents,
    active_collision_types: ActiveCollisionTypes,
}

impl ColliderBuilder2D {
    fn with_shape(shape: SharedShape) -> Self {
        Self {
            shape,
            collision_groups: CollisionGroups::Platform,
            is_sensor: false,
            friction: 0.5,
            active_events: ActiveEvents::empty(),
            active_collision_types: ActiveCollisionTypes::default(),
        }
    }

    /// Create a box-shaped collider
    pub fn box_shape(half_width: Real, half_height: Real) -> Self {
        Self::with_shape(SharedShape::cuboid(half_width, half_height))
    }

    /// Create a capsule-shaped collider (good for characters)
    pub fn capsule(half_height: Real, radius: Real) -> Self {
        Self::with_shape(SharedShape::capsule_y(half_height, radius))
    }

    /// Set the collision groups for filtering
    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Make this a sensor (detects overlaps but doesn't block)
    pub fn sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    /// Set friction coefficient (0.0 = no friction, 1.0 = high friction)
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Report collision start/stop events for this collider
    pub fn collision_events(mut self) -> Self {
        self.active_events |= ActiveEvents::COLLISION_EVENTS;
        self
    }

    /// Also detect contacts against kinematic and fixed bodies.
    /// Rapier skips those pairs by default.
    pub fn detect_non_dynamic(mut self) -> Self {
        self.active_collision_types = ActiveCollisionTypes::all();
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        rapier2d::prelude::ColliderBuilder::new(self.shape)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .sensor(self.is_sensor)
            .friction(self.friction)
            .active_events(self.active_events)
            .active_collision_types(self.active_collision_types)
            .build()
    }
}

/// Rigid body and collider configurations for level objects
pub mod presets {
    use super::*;

    /// Character body: kinematic, moved by the character controller
    pub fn character_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_kinematic_position_based()
            .position(x, y)
            .lock_rotation()
            .can_sleep(false) // The character should never sleep
            .build()
    }

    /// Character collider (capsule shape)
    pub fn character_collider(width: Real, height: Real) -> Collider {
        let radius = width / 2.0;
        let half_height = ((height / 2.0) - radius).max(0.0); // Capsule half-height excludes the caps

        ColliderBuilder2D::capsule(half_height, radius)
            .collision_groups(CollisionGroups::Player)
            .friction(0.0)
            .collision_events()
            .detect_non_dynamic()
            .build()
    }

    /// Platform body (fixed/static)
    pub fn platform_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y).build()
    }

    /// Platform collider (box shape)
    pub fn platform_collider(width: Real, height: Real) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .collision_groups(CollisionGroups::Platform)
            .friction(0.3)
            .build()
    }

    /// Hazard body (enemies sit still in the level)
    pub fn hazard_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y).build()
    }

    /// Hazard collider. Enemies never block movement: a live character
    /// overlaps them and reacts through contact events. Once the character's
    /// own collider is a sensor, the pair stops reporting contacts.
    pub fn hazard_collider(width: Real, height: Real) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .collision_groups(CollisionGroups::Hazard)
            .sensor(true)
            .build()
    }

    /// Goal body (the finish flag)
    pub fn goal_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y).build()
    }

    /// Goal collider: a sensor zone around the flag
    pub fn goal_collider(width: Real, height: Real) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .collision_groups(CollisionGroups::Goal)
            .sensor(true)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_builder_fixed() {
        let body = BodyBuilder::new_fixed().position(10.0, 20.0).build();

        assert_eq!(body.body_type(), RigidBodyType::Fixed);
        assert_eq!(body.translation().x, 10.0);
        assert_eq!(body.translation().y, 20.0);
    }

    #[test]
    fn test_collider_builder_box() {
        let collider = ColliderBuilder2D::box_shape(1.0, 2.0).friction(0.3).build();

        assert!(!collider.is_sensor());
        assert_eq!(collider.friction(), 0.3);
    }

    #[test]
    fn test_character_preset() {
        let body = presets::character_body(0.0, 0.0);
        let collider = presets::character_collider(1.2, 2.0);

        assert_eq!(body.body_type(), RigidBodyType::KinematicPositionBased);
        assert!(body.is_rotation_locked());
        assert!(!collider.is_sensor());
        assert!(collider
            .active_collision_types()
            .contains(ActiveCollisionTypes::KINEMATIC_FIXED));
    }

    #[test]
    fn test_hazard_and_goal_are_sensors() {
        assert!(presets::goal_collider(1.0, 3.0).is_sensor());
        assert!(presets::hazard_collider(1.0, 1.0).is_sensor());
        assert!(!presets::platform_collider(4.0, 1.0).is_sensor());
    }
}
