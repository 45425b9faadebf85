// Rapier-backed implementations of the contact-query capabilities

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use rapier2d::prelude::*;

use super::collision::CollisionGroups;
use super::query::{CharacterCollider, CollisionShape, ContactProbe, ProbeDirection, QueryError};
use super::world::PhysicsWorld;

/// How far past the shape's surface a probe reaches
pub const PROBE_SKIN: f32 = 0.05;

/// Side rays sit this fraction of the way out from the centre line
const SIDE_RAY_SPREAD: f32 = 0.9;

/// Only platform geometry counts as a surface; hazards and the flag are
/// reported through contact events instead
fn surface_groups() -> InteractionGroups {
    InteractionGroups::new(
        Group::from_bits_truncate(CollisionGroups::Player as u32),
        Group::from_bits_truncate(CollisionGroups::Platform as u32),
    )
}

/// Probes the physics world with rays cast from inside the character's shape.
///
/// Three parallel rays start on the shape's centre line and reach
/// `PROBE_SKIN` past its surface, so a shallow penetration still reads as a
/// contact.
pub struct WorldProbe {
    world: Rc<RefCell<PhysicsWorld>>,
    body: RigidBodyHandle,
}

impl WorldProbe {
    pub fn new(world: Rc<RefCell<PhysicsWorld>>, body: RigidBodyHandle) -> Self {
        Self { world, body }
    }

    /// Smallest gap from the shape's surface to a platform along `direction`,
    /// over all three rays, or `None` when nothing lies within `past_surface`.
    fn nearest_gap(
        &self,
        origin: Vec2,
        direction: ProbeDirection,
        shape: &CollisionShape,
        past_surface: f32,
        include_origin_colliders: bool,
    ) -> Result<Option<f32>, QueryError> {
        let world = self.world.try_borrow().map_err(|_| QueryError::WorldBusy)?;
        if world.get_rigid_body(self.body).is_none() {
            return Err(QueryError::MissingBody);
        }

        let dir = direction.vector();
        let across = dir.perp();
        let (reach, spread) = if dir.x != 0.0 {
            (shape.half_extents.x, shape.half_extents.y)
        } else {
            (shape.half_extents.y, shape.half_extents.x)
        };
        let max_toi = reach + past_surface;

        let nearest = [-SIDE_RAY_SPREAD, 0.0, SIDE_RAY_SPREAD]
            .iter()
            .filter_map(|&t| {
                let ray_origin = origin + across * spread * t;
                let ray_point = point![ray_origin.x, ray_origin.y];
                let starts_outside = |_: ColliderHandle, collider: &Collider| {
                    !collider.shape().contains_point(collider.position(), &ray_point)
                };

                let filter = QueryFilter::default()
                    .groups(surface_groups())
                    .exclude_rigid_body(self.body)
                    .exclude_sensors();
                let filter = if include_origin_colliders {
                    filter
                } else {
                    filter.predicate(&starts_outside)
                };

                world
                    .raycast(ray_origin, dir, max_toi, true, filter)
                    .map(|(_, toi)| toi)
            })
            .reduce(f32::min);

        Ok(nearest.map(|toi| toi - reach))
    }
}

impl ContactProbe for WorldProbe {
    fn probe(
        &self,
        origin: Vec2,
        direction: ProbeDirection,
        shape: &CollisionShape,
        include_origin_colliders: bool,
    ) -> Result<bool, QueryError> {
        let gap = self.nearest_gap(origin, direction, shape, PROBE_SKIN, include_origin_colliders)?;
        Ok(gap.is_some())
    }

    fn sweep(
        &self,
        origin: Vec2,
        direction: ProbeDirection,
        shape: &CollisionShape,
        max_distance: f32,
    ) -> Result<Option<f32>, QueryError> {
        self.nearest_gap(origin, direction, shape, max_distance.max(0.0) + PROBE_SKIN, false)
    }
}

/// The character's collider inside the physics world
pub struct WorldCollider {
    world: Rc<RefCell<PhysicsWorld>>,
    handle: ColliderHandle,
}

impl WorldCollider {
    pub fn new(world: Rc<RefCell<PhysicsWorld>>, handle: ColliderHandle) -> Self {
        Self { world, handle }
    }
}

impl CharacterCollider for WorldCollider {
    fn half_extents(&self) -> Result<Vec2, QueryError> {
        let world = self.world.try_borrow().map_err(|_| QueryError::WorldBusy)?;
        let collider = world
            .get_collider(self.handle)
            .ok_or(QueryError::MissingCollider)?;

        // Local bounding box, independent of where the body currently is
        let aabb = collider.shape().compute_local_aabb();
        let half = aabb.half_extents();
        Ok(Vec2::new(half.x, half.y))
    }

    fn set_trigger(&mut self, trigger: bool) -> Result<(), QueryError> {
        let mut world = self
            .world
            .try_borrow_mut()
            .map_err(|_| QueryError::WorldBusy)?;
        let collider = world
            .get_collider_mut(self.handle)
            .ok_or(QueryError::MissingCollider)?;
        collider.set_sensor(trigger);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::body::presets;
    use super::*;

    struct Fixture {
        world: Rc<RefCell<PhysicsWorld>>,
        body: RigidBodyHandle,
        collider: ColliderHandle,
    }

    /// A 20-wide floor whose top surface is y = 0, a wall at x = 3, and a
    /// character body at `spawn`
    fn fixture(spawn: Vec2) -> Fixture {
        let mut world = PhysicsWorld::new();

        let floor = world.add_rigid_body(presets::platform_body(0.0, -0.5));
        world.add_collider(presets::platform_collider(20.0, 1.0), floor);

        let wall = world.add_rigid_body(presets::platform_body(3.5, 2.0));
        world.add_collider(presets::platform_collider(1.0, 4.0), wall);

        let body = world.add_rigid_body(presets::character_body(spawn.x, spawn.y));
        let collider = world.add_collider(presets::character_collider(1.2, 2.0), body);

        // Populate the query pipeline
        world.step();

        Fixture {
            world: Rc::new(RefCell::new(world)),
            body,
            collider,
        }
    }

    fn shape() -> CollisionShape {
        CollisionShape::new(0.6, 1.0)
    }

    #[test]
    fn test_grounded_when_standing_on_floor() {
        let f = fixture(Vec2::new(0.0, 1.02));
        let probe = WorldProbe::new(f.world.clone(), f.body);
        let origin = Vec2::new(0.0, 1.02);

        assert_eq!(probe.probe(origin, ProbeDirection::Down, &shape(), false), Ok(true));
        assert_eq!(probe.probe(origin, ProbeDirection::Up, &shape(), false), Ok(false));
    }

    #[test]
    fn test_airborne_reports_nothing_below() {
        let f = fixture(Vec2::new(0.0, 5.0));
        let probe = WorldProbe::new(f.world.clone(), f.body);

        assert_eq!(
            probe.probe(Vec2::new(0.0, 5.0), ProbeDirection::Down, &shape(), false),
            Ok(false)
        );
    }

    #[test]
    fn test_wall_detected_only_in_its_direction() {
        let f = fixture(Vec2::new(2.38, 1.5));
        let probe = WorldProbe::new(f.world.clone(), f.body);
        let origin = Vec2::new(2.38, 1.5);

        assert_eq!(probe.probe(origin, ProbeDirection::Right, &shape(), false), Ok(true));
        assert_eq!(probe.probe(origin, ProbeDirection::Left, &shape(), false), Ok(false));
    }

    #[test]
    fn test_origin_inside_collider_is_ignored_unless_requested() {
        // Centre line starts inside the floor
        let f = fixture(Vec2::new(0.0, -0.2));
        let probe = WorldProbe::new(f.world.clone(), f.body);
        let origin = Vec2::new(0.0, -0.2);

        assert_eq!(probe.probe(origin, ProbeDirection::Down, &shape(), false), Ok(false));
        assert_eq!(probe.probe(origin, ProbeDirection::Down, &shape(), true), Ok(true));
    }

    #[test]
    fn test_sweep_measures_gap_to_floor() {
        let f = fixture(Vec2::new(0.0, 5.0));
        let probe = WorldProbe::new(f.world.clone(), f.body);
        let origin = Vec2::new(0.0, 5.0);

        let gap = probe.sweep(origin, ProbeDirection::Down, &shape(), 10.0).unwrap();
        assert!((gap.unwrap() - 4.0).abs() < 1e-4);

        // Floor beyond the requested distance
        assert_eq!(probe.sweep(origin, ProbeDirection::Down, &shape(), 1.0), Ok(None));
    }

    #[test]
    fn test_sweep_reports_overlap_as_negative_gap() {
        let f = fixture(Vec2::new(0.0, 0.98));
        let probe = WorldProbe::new(f.world.clone(), f.body);

        let gap = probe
            .sweep(Vec2::new(0.0, 0.98), ProbeDirection::Down, &shape(), 0.5)
            .unwrap();
        assert!((gap.unwrap() + 0.02).abs() < 1e-4);
    }

    #[test]
    fn test_sweep_toward_wall() {
        let f = fixture(Vec2::new(1.0, 1.5));
        let probe = WorldProbe::new(f.world.clone(), f.body);
        let origin = Vec2::new(1.0, 1.5);

        let gap = probe.sweep(origin, ProbeDirection::Right, &shape(), 2.0).unwrap();
        assert!((gap.unwrap() - 1.4).abs() < 1e-4);
        assert_eq!(probe.sweep(origin, ProbeDirection::Left, &shape(), 2.0), Ok(None));
    }

    #[test]
    fn test_hazards_are_not_surfaces() {
        let f = fixture(Vec2::new(-5.0, 1.02));
        {
            let mut world = f.world.borrow_mut();
            let enemy = world.add_rigid_body(presets::hazard_body(-3.9, 1.0));
            world.add_collider(presets::hazard_collider(1.0, 2.0), enemy);
            world.step();
        }
        let probe = WorldProbe::new(f.world.clone(), f.body);

        assert_eq!(
            probe.probe(Vec2::new(-5.0, 1.02), ProbeDirection::Right, &shape(), false),
            Ok(false)
        );
    }

    #[test]
    fn test_missing_body_is_an_error() {
        let f = fixture(Vec2::new(0.0, 5.0));
        f.world.borrow_mut().remove_rigid_body(f.body);
        let probe = WorldProbe::new(f.world.clone(), f.body);

        assert_eq!(
            probe.probe(Vec2::new(0.0, 5.0), ProbeDirection::Down, &shape(), false),
            Err(QueryError::MissingBody)
        );
    }

    #[test]
    fn test_collider_extents_and_trigger() {
        let f = fixture(Vec2::new(0.0, 5.0));
        let mut collider = WorldCollider::new(f.world.clone(), f.collider);

        let half = collider.half_extents().unwrap();
        assert!((half.x - 0.6).abs() < 1e-4);
        assert!((half.y - 1.0).abs() < 1e-4);

        collider.set_trigger(true).unwrap();
        assert!(f.world.borrow().get_collider(f.collider).unwrap().is_sensor());
    }
}
