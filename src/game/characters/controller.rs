// Character controller: input and contact queries in, velocity and position out

use glam::Vec2;

use crate::core::math::{clamp_or_center, move_towards};
use crate::engine::camera::{ViewportCorner, ViewportProjector};
use crate::engine::input::InputSampler;
use crate::engine::physics::{
    CharacterCollider, CollisionShape, ContactProbe, ProbeDirection, QueryError,
};

use super::animation::AnimationState;
use super::config::{CharacterConfig, ConfigError};
use super::contact::{
    ContactCategory, ContactEvent, ContactOutcome, HitDirection, LevelResetTrigger, RESET_DELAY,
};
use super::motion::MotionState;

/// Errors raised while building a controller
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("character controller needs a {0}")]
    MissingDependency(&'static str),

    #[error("collision shape must have finite, positive extents, got {0:?}")]
    InvalidShape(Vec2),

    #[error("spawn position must be finite, got {0:?}")]
    InvalidSpawn(Vec2),

    #[error("could not read the character collider: {0}")]
    Collider(#[from] QueryError),

    #[error("invalid character config: {0}")]
    Config(#[from] ConfigError),
}

/// Builder for [`CharacterController`]. Every collaborator is required;
/// `build` refuses to produce a controller that would run with missing
/// physics.
#[derive(Default)]
pub struct ControllerBuilder {
    config: CharacterConfig,
    spawn: Vec2,
    probe: Option<Box<dyn ContactProbe>>,
    viewport: Option<Box<dyn ViewportProjector>>,
    collider: Option<Box<dyn CharacterCollider>>,
    reset: Option<Box<dyn LevelResetTrigger>>,
}

impl ControllerBuilder {
    pub fn config(mut self, config: CharacterConfig) -> Self {
        self.config = config;
        self
    }

    /// Starting position (centre of the collision shape)
    pub fn spawn(mut self, position: Vec2) -> Self {
        self.spawn = position;
        self
    }

    pub fn probe(mut self, probe: impl ContactProbe + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    pub fn viewport(mut self, viewport: impl ViewportProjector + 'static) -> Self {
        self.viewport = Some(Box::new(viewport));
        self
    }

    pub fn collider(mut self, collider: impl CharacterCollider + 'static) -> Self {
        self.collider = Some(Box::new(collider));
        self
    }

    pub fn reset_trigger(mut self, reset: impl LevelResetTrigger + 'static) -> Self {
        self.reset = Some(Box::new(reset));
        self
    }

    pub fn build(self) -> Result<CharacterController, ControllerError> {
        self.config.validate()?;

        let probe = self
            .probe
            .ok_or(ControllerError::MissingDependency("contact probe"))?;
        let viewport = self
            .viewport
            .ok_or(ControllerError::MissingDependency("camera viewport"))?;
        let collider = self
            .collider
            .ok_or(ControllerError::MissingDependency("character collider"))?;
        let reset = self
            .reset
            .ok_or(ControllerError::MissingDependency("level reset trigger"))?;

        let half_extents = collider.half_extents()?;
        let shape = CollisionShape {
            half_extents,
            solid: true,
        };
        if !shape.is_valid() {
            return Err(ControllerError::InvalidShape(half_extents));
        }
        if !self.spawn.is_finite() {
            return Err(ControllerError::InvalidSpawn(self.spawn));
        }

        Ok(CharacterController {
            jump_force: self.config.jump_force(),
            gravity: self.config.gravity(),
            terminal_velocity: self.config.terminal_velocity(),
            config: self.config,
            motion: MotionState::default(),
            position: self.spawn,
            shape,
            input_enabled: true,
            reset_armed: false,
            level_complete: false,
            probe,
            viewport,
            collider,
            reset,
        })
    }
}

/// Drives one platformer character.
///
/// The simulation loop calls [`on_variable_tick`](Self::on_variable_tick)
/// once per rendered frame and [`on_fixed_tick`](Self::on_fixed_tick) zero
/// or more times per frame at a constant rate. Contacts reported by the
/// physics layer arrive through [`on_contact_start`](Self::on_contact_start)
/// and [`on_contact_sustained`](Self::on_contact_sustained).
pub struct CharacterController {
    config: CharacterConfig,
    jump_force: f32,
    gravity: f32,
    terminal_velocity: f32,

    motion: MotionState,
    position: Vec2,
    shape: CollisionShape,

    /// Cleared on death or finish; the character then ignores the player
    input_enabled: bool,
    /// Set once a reload has been requested
    reset_armed: bool,
    level_complete: bool,

    probe: Box<dyn ContactProbe>,
    viewport: Box<dyn ViewportProjector>,
    collider: Box<dyn CharacterCollider>,
    reset: Box<dyn LevelResetTrigger>,
}

impl CharacterController {
    pub fn builder() -> ControllerBuilder {
        ControllerBuilder::default()
    }

    /// Per-frame update: contacts, jumping, gravity and horizontal movement
    pub fn on_variable_tick(&mut self, dt: f32, input: &dyn InputSampler) -> AnimationState {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        let (axis, jump_pressed, jump_held) = if self.input_enabled {
            let axis = input.axis();
            let axis = if axis.is_finite() {
                axis.clamp(-1.0, 1.0)
            } else {
                0.0
            };
            (axis, input.jump_pressed_this_frame(), input.jump_held())
        } else {
            (0.0, false, false)
        };

        self.resolve_vertical_contacts(jump_pressed);
        self.apply_gravity(jump_held, dt);
        self.move_horizontally(axis, dt);

        self.current_animation_state()
    }

    /// Fixed-rate update: integrate position and keep the character on screen.
    ///
    /// A solid character moves one axis at a time and stops flush against
    /// any platform in its path, however many fixed steps a frame runs.
    pub fn on_fixed_tick(&mut self, fixed_dt: f32) {
        if !fixed_dt.is_finite() || fixed_dt <= 0.0 {
            return;
        }

        let step = self.motion.velocity * fixed_dt;
        if self.shape.solid {
            self.position.x += self.sweep_axis(step.x, ProbeDirection::horizontal(step.x));
            self.position.y += self.sweep_axis(step.y, ProbeDirection::vertical(step.y));
        } else {
            self.position += step;
        }

        self.clamp_to_camera();
    }

    /// First frame of a contact
    pub fn on_contact_start(&mut self, event: &ContactEvent) -> ContactOutcome {
        if self.reset_armed {
            return ContactOutcome::Ignored;
        }

        match event.category {
            ContactCategory::Finish => {
                self.finish();
                ContactOutcome::Finished
            }
            ContactCategory::Enemy | ContactCategory::Player => ContactOutcome::Ignored,
        }
    }

    /// Every frame a contact persists
    pub fn on_contact_sustained(&mut self, event: &ContactEvent) -> ContactOutcome {
        if self.reset_armed {
            return ContactOutcome::Ignored;
        }

        match event.category {
            ContactCategory::Enemy => self.resolve_enemy_contact(event.other_position),
            ContactCategory::Finish | ContactCategory::Player => ContactOutcome::Ignored,
        }
    }

    fn resolve_vertical_contacts(&mut self, jump_pressed: bool) {
        if self.shape.solid {
            self.motion.grounded = self.touching(ProbeDirection::Down);
            self.motion.ceiled = self.touching(ProbeDirection::Up);
        } else {
            self.motion.grounded = false;
            self.motion.ceiled = false;
        }

        if self.motion.ceiled {
            self.motion.velocity.y = self.motion.velocity.y.min(0.0);
        }

        if self.motion.grounded {
            self.motion.velocity.y = self.motion.velocity.y.max(0.0);
            self.grounded_jump(jump_pressed);
        }
    }

    fn grounded_jump(&mut self, jump_pressed: bool) {
        self.motion.jumping = self.motion.velocity.y > 0.0;

        if jump_pressed {
            log::debug!("Jump from {:?}", self.position);
            self.motion.velocity.y = self.jump_force;
            self.motion.jumping = true;
        }
    }

    fn apply_gravity(&mut self, jump_held: bool, dt: f32) {
        let vy = self.motion.velocity.y;
        // Falling or jump released: double gravity cuts the arc short
        let falling = vy < 0.0 || !jump_held;
        let multiplier = if falling { 2.0 } else { 1.0 };

        let vy = vy + self.gravity * multiplier * dt;
        self.motion.velocity.y = vy.max(self.terminal_velocity);
    }

    fn move_horizontally(&mut self, axis: f32, dt: f32) {
        self.motion.input_axis = axis;

        let target = axis * self.config.move_speed;
        let max_delta = self.config.acceleration * self.config.move_speed * dt;
        self.motion.velocity.x = move_towards(self.motion.velocity.x, target, max_delta);

        if self.shape.solid {
            if let Some(direction) = ProbeDirection::horizontal(self.motion.velocity.x) {
                if self.touching(direction) {
                    self.motion.velocity.x = 0.0;
                }
            }
        }

        self.motion.face_input(axis);
    }

    fn clamp_to_camera(&mut self) {
        let left = self
            .viewport
            .world_point_for_viewport_corner(ViewportCorner::BottomLeft)
            .x;
        let right = self
            .viewport
            .world_point_for_viewport_corner(ViewportCorner::TopRight)
            .x;
        let margin = self.shape.half_extents.x;

        self.position.x = clamp_or_center(self.position.x, left + margin, right - margin);
    }

    fn resolve_enemy_contact(&mut self, enemy: Vec2) -> ContactOutcome {
        match HitDirection::classify(self.position, enemy) {
            Some(HitDirection::Below) => {
                log::debug!("Stomped enemy at {:?}", enemy);
                self.motion.velocity.y = self.jump_force / 2.0;
                self.motion.jumping = true;
                ContactOutcome::Stomped
            }
            // Both sides react the same way
            Some(HitDirection::Left) | Some(HitDirection::Right) => {
                self.die();
                ContactOutcome::Killed
            }
            None => ContactOutcome::Ignored,
        }
    }

    fn die(&mut self) {
        log::info!("Character hit an enemy at {:?}", self.position);
        self.motion.velocity.y = self.jump_force;

        self.shape.solid = false;
        if let Err(err) = self.collider.set_trigger(true) {
            log::warn!("Could not make the character collider a trigger: {}", err);
        }

        self.input_enabled = false;
        self.arm_reset();
    }

    fn finish(&mut self) {
        log::info!("Character reached the finish flag");
        self.input_enabled = false;
        self.level_complete = true;
        self.arm_reset();
    }

    fn arm_reset(&mut self) {
        self.reset_armed = true;
        self.reset.schedule_reload(RESET_DELAY);
    }

    /// Probe failures count as "no contact" for this tick
    fn touching(&self, direction: ProbeDirection) -> bool {
        match self
            .probe
            .probe(self.position, direction, &self.shape, false)
        {
            Ok(hit) => hit,
            Err(err) => {
                log::warn!("Contact probe {:?} failed: {}", direction, err);
                false
            }
        }
    }

    /// Distance actually travelled for `delta` along one axis
    fn sweep_axis(&self, delta: f32, direction: Option<ProbeDirection>) -> f32 {
        let Some(direction) = direction else {
            return delta;
        };

        match self
            .probe
            .sweep(self.position, direction, &self.shape, delta.abs())
        {
            Ok(Some(gap)) if gap < delta.abs() => gap * delta.signum(),
            Ok(_) => delta,
            Err(err) => {
                log::warn!("Sweep {:?} failed: {}", direction, err);
                // Without a distance, at least never push into a surface already touched
                let blocked = match direction {
                    ProbeDirection::Down => self.motion.grounded,
                    ProbeDirection::Up => self.motion.ceiled,
                    ProbeDirection::Left | ProbeDirection::Right => false,
                };
                if blocked {
                    0.0
                } else {
                    delta
                }
            }
        }
    }

    pub fn current_animation_state(&self) -> AnimationState {
        AnimationState::from_motion(&self.motion)
    }

    pub fn facing_right(&self) -> bool {
        self.motion.facing_right
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.motion.velocity
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    pub fn config(&self) -> &CharacterConfig {
        &self.config
    }

    /// False once the collider became a trigger
    pub fn is_solid(&self) -> bool {
        self.shape.solid
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Whether the completion marker should be shown
    pub fn level_complete(&self) -> bool {
        self.level_complete
    }

    /// Whether a level reload has been requested
    pub fn reset_pending(&self) -> bool {
        self.reset_armed
    }
}
