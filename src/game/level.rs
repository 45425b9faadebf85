// Level: physics world, camera and character wired together
//
// The level owns everything that is rebuilt on a reload. A reload requested
// by the character goes through the scheduler as a `LevelCommand` tagged
// with the generation it was armed in, so a reload that fires after the
// level has already been rebuilt does nothing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;

use crate::engine::camera::Camera;
use crate::engine::game_loop::{FrameTiming, FIXED_TIMESTEP};
use crate::engine::input::InputSampler;
use crate::engine::physics::{
    presets, ColliderHandle, Contact, ContactPhase, ContactTracker, PhysicsWorld,
    RigidBodyHandle, WorldCollider, WorldProbe,
};
use crate::engine::scheduler::Scheduler;

use super::characters::{
    AnimationTracker, CharacterConfig, CharacterController, ContactCategory, ContactEvent,
    ContactOutcome, ControllerError, LevelResetTrigger,
};

/// Errors raised while loading a level
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("level layout is invalid: {0}")]
    InvalidLayout(&'static str),

    #[error("failed to build the character: {0}")]
    Character(#[from] ControllerError),
}

/// An axis-aligned box in the level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub center: Vec2,
    pub size: Vec2,
}

impl Block {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            center: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    fn is_valid(&self) -> bool {
        self.center.is_finite() && self.size.is_finite() && self.size.min_element() > 0.0
    }
}

/// Everything needed to (re)build a level
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub spawn: Vec2,
    /// Width and height of the character's capsule
    pub character_size: Vec2,
    pub character: CharacterConfig,
    pub platforms: Vec<Block>,
    pub enemies: Vec<Block>,
    pub flag: Option<Block>,
    /// Centre of the (fixed) camera
    pub camera_center: Vec2,
    /// Viewport size in pixels
    pub viewport: Vec2,
    pub units_per_pixel: f32,
}

impl Default for LevelLayout {
    /// A short demo course: a floor, two ledges, one enemy and the flag.
    /// The camera shows 32 x 18 units at 1280 x 720.
    fn default() -> Self {
        Self {
            spawn: Vec2::new(2.0, 2.02),
            character_size: Vec2::new(1.2, 2.0),
            character: CharacterConfig::default(),
            platforms: vec![
                Block::new(16.0, 0.5, 32.0, 1.0),
                Block::new(10.0, 4.25, 4.0, 0.5),
                Block::new(18.0, 7.25, 4.0, 0.5),
            ],
            enemies: vec![Block::new(14.0, 1.5, 1.0, 1.0)],
            flag: Some(Block::new(29.0, 2.5, 1.0, 3.0)),
            camera_center: Vec2::new(16.0, 9.0),
            viewport: Vec2::new(1280.0, 720.0),
            units_per_pixel: 0.025,
        }
    }
}

impl LevelLayout {
    fn validate(&self) -> Result<(), LevelError> {
        if !self.spawn.is_finite() {
            return Err(LevelError::InvalidLayout("spawn must be finite"));
        }
        if !(self.character_size.is_finite() && self.character_size.min_element() > 0.0) {
            return Err(LevelError::InvalidLayout("character size must be positive"));
        }
        let blocks = self.platforms.iter().chain(&self.enemies).chain(&self.flag);
        if !blocks.into_iter().all(Block::is_valid) {
            return Err(LevelError::InvalidLayout("blocks need finite, positive sizes"));
        }
        if !(self.units_per_pixel.is_finite() && self.units_per_pixel > 0.0) {
            return Err(LevelError::InvalidLayout("units per pixel must be positive"));
        }
        Ok(())
    }
}

/// Commands the level runs when a scheduled task comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelCommand {
    Reload { generation: u64 },
}

/// Schedules a reload of the generation it was created for
pub struct ReloadTrigger {
    scheduler: Rc<RefCell<Scheduler<LevelCommand>>>,
    generation: u64,
}

impl ReloadTrigger {
    pub fn new(scheduler: Rc<RefCell<Scheduler<LevelCommand>>>, generation: u64) -> Self {
        Self {
            scheduler,
            generation,
        }
    }
}

impl LevelResetTrigger for ReloadTrigger {
    fn schedule_reload(&mut self, delay: f32) {
        let task = self.scheduler.borrow_mut().schedule(
            delay,
            LevelCommand::Reload {
                generation: self.generation,
            },
        );
        log::debug!("Level reload {:?} in {}s", task, delay);
    }
}

/// Per-load state, dropped wholesale on reload
struct Stage {
    world: Rc<RefCell<PhysicsWorld>>,
    body: RigidBodyHandle,
    controller: CharacterController,
    tracker: ContactTracker,
    categories: HashMap<ColliderHandle, ContactCategory>,
    animation: AnimationTracker,
}

/// A playable level
pub struct Level {
    layout: LevelLayout,
    camera: Rc<RefCell<Camera>>,
    scheduler: Rc<RefCell<Scheduler<LevelCommand>>>,
    generation: u64,
    stage: Stage,
}

impl Level {
    /// Build the level described by `layout`
    pub fn load(layout: LevelLayout) -> Result<Self, LevelError> {
        layout.validate()?;

        let camera = Rc::new(RefCell::new(Camera::with_scale(
            layout.camera_center,
            layout.viewport.x,
            layout.viewport.y,
            layout.units_per_pixel,
        )));
        let scheduler = Rc::new(RefCell::new(Scheduler::new()));
        let stage = build_stage(&layout, &camera, &scheduler, 0)?;

        log::info!(
            "Level loaded: {} platforms, {} enemies",
            layout.platforms.len(),
            layout.enemies.len()
        );

        Ok(Self {
            layout,
            camera,
            scheduler,
            generation: 0,
            stage,
        })
    }

    /// Rebuild the level from its layout. Reloads armed before this call
    /// become stale.
    pub fn reload(&mut self) -> Result<(), LevelError> {
        let generation = self.generation + 1;
        self.stage = build_stage(&self.layout, &self.camera, &self.scheduler, generation)?;
        self.generation = generation;
        self.camera.borrow_mut().set_position(self.layout.camera_center);

        log::info!("Level reloaded (generation {})", generation);
        Ok(())
    }

    /// Run one rendered frame: the variable tick, then `fixed_steps` fixed ticks
    pub fn update(
        &mut self,
        timing: FrameTiming,
        input: &dyn InputSampler,
    ) -> Result<(), LevelError> {
        let state = self
            .stage
            .controller
            .on_variable_tick(timing.variable_dt, input);
        self.stage.animation.update(state, timing.variable_dt);

        for _ in 0..timing.fixed_steps {
            self.fixed_step(FIXED_TIMESTEP)?;
        }
        Ok(())
    }

    fn fixed_step(&mut self, dt: f32) -> Result<(), LevelError> {
        self.stage.controller.on_fixed_tick(dt);

        let events = {
            let mut world = self.stage.world.borrow_mut();
            world.move_kinematic(self.stage.body, self.stage.controller.position());
            world.step();
            world.get_collision_events()
        };

        for contact in self.stage.tracker.process(&events) {
            self.dispatch(contact);
        }

        let due = self.scheduler.borrow_mut().advance(dt);
        for command in due {
            self.run(command)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, contact: Contact) {
        let Some(&category) = self.stage.categories.get(&contact.other) else {
            return;
        };
        let position = self.stage.world.borrow().collider_position(contact.other);
        let Some(position) = position else {
            return;
        };

        let event = ContactEvent::new(category, position);
        let outcome = match contact.phase {
            ContactPhase::Started => self.stage.controller.on_contact_start(&event),
            ContactPhase::Sustained => self.stage.controller.on_contact_sustained(&event),
        };
        if outcome != ContactOutcome::Ignored {
            log::debug!("{:?} contact with {:?}: {:?}", contact.phase, category, outcome);
        }
    }

    fn run(&mut self, command: LevelCommand) -> Result<(), LevelError> {
        match command {
            LevelCommand::Reload { generation } if generation == self.generation => self.reload(),
            LevelCommand::Reload { generation } => {
                log::debug!(
                    "Ignoring reload for generation {} (now {})",
                    generation,
                    self.generation
                );
                Ok(())
            }
        }
    }

    /// Resize the camera viewport (in pixels)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.borrow_mut().resize(width, height);
    }

    pub fn controller(&self) -> &CharacterController {
        &self.stage.controller
    }

    pub fn animation(&self) -> &AnimationTracker {
        &self.stage.animation
    }

    pub fn camera(&self) -> Rc<RefCell<Camera>> {
        self.camera.clone()
    }

    /// Number of times the level has been rebuilt
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn layout(&self) -> &LevelLayout {
        &self.layout
    }
}

fn build_stage(
    layout: &LevelLayout,
    camera: &Rc<RefCell<Camera>>,
    scheduler: &Rc<RefCell<Scheduler<LevelCommand>>>,
    generation: u64,
) -> Result<Stage, LevelError> {
    let mut world = PhysicsWorld::new();
    let mut categories = HashMap::new();

    for block in &layout.platforms {
        let body = world.add_rigid_body(presets::platform_body(block.center.x, block.center.y));
        world.add_collider(presets::platform_collider(block.size.x, block.size.y), body);
    }

    for block in &layout.enemies {
        let body = world.add_rigid_body(presets::hazard_body(block.center.x, block.center.y));
        let collider =
            world.add_collider(presets::hazard_collider(block.size.x, block.size.y), body);
        categories.insert(collider, ContactCategory::Enemy);
    }

    if let Some(block) = &layout.flag {
        let body = world.add_rigid_body(presets::goal_body(block.center.x, block.center.y));
        let collider = world.add_collider(presets::goal_collider(block.size.x, block.size.y), body);
        categories.insert(collider, ContactCategory::Finish);
    }

    let body = world.add_rigid_body(presets::character_body(layout.spawn.x, layout.spawn.y));
    let collider = world.add_collider(
        presets::character_collider(layout.character_size.x, layout.character_size.y),
        body,
    );

    // Populate the query pipeline before the first probe
    world.step();
    let world = Rc::new(RefCell::new(world));

    let controller = CharacterController::builder()
        .config(layout.character.clone())
        .spawn(layout.spawn)
        .probe(WorldProbe::new(world.clone(), body))
        .viewport(camera.clone())
        .collider(WorldCollider::new(world.clone(), collider))
        .reset_trigger(ReloadTrigger::new(scheduler.clone(), generation))
        .build()?;

    Ok(Stage {
        world,
        body,
        controller,
        tracker: ContactTracker::new(collider),
        categories,
        animation: AnimationTracker::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::InputSnapshot;
    use crate::game::characters::AnimationState;
    use approx::assert_relative_eq;

    fn frame() -> FrameTiming {
        FrameTiming {
            variable_dt: FIXED_TIMESTEP,
            fixed_steps: 1,
        }
    }

    /// Floor whose top is y = 1, character standing at x = 2
    fn flat_layout() -> LevelLayout {
        LevelLayout {
            platforms: vec![Block::new(16.0, 0.5, 32.0, 1.0)],
            enemies: Vec::new(),
            flag: None,
            ..LevelLayout::default()
        }
    }

    fn run_frames(level: &mut Level, input: InputSnapshot, frames: usize) {
        for _ in 0..frames {
            level.update(frame(), &input).unwrap();
        }
    }

    #[test]
    fn test_character_rests_on_floor() {
        let mut level = Level::load(flat_layout()).unwrap();
        run_frames(&mut level, InputSnapshot::default(), 60);

        let controller = level.controller();
        assert!(controller.motion().grounded);
        // Spawned just above the floor, then settled flush on it
        assert_relative_eq!(controller.position().y, 2.0, epsilon = 1e-4);
        assert_eq!(level.animation().current(), AnimationState::Idle);
    }

    #[test]
    fn test_jump_leaves_and_returns_to_floor() {
        let mut level = Level::load(flat_layout()).unwrap();
        run_frames(&mut level, InputSnapshot::default(), 2);

        run_frames(&mut level, InputSnapshot::jump_press(), 1);
        run_frames(&mut level, InputSnapshot::jump_hold(), 20);
        assert!(level.controller().position().y > 4.0);
        assert_eq!(level.animation().current(), AnimationState::Jumping);

        run_frames(&mut level, InputSnapshot::default(), 120);
        assert!(level.controller().motion().grounded);
        assert_relative_eq!(level.controller().position().y, 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_landing_height_independent_of_frame_rate() {
        for steps in [1, 3, 5] {
            let mut layout = flat_layout();
            layout.spawn = Vec2::new(2.0, 12.0);
            let mut level = Level::load(layout).unwrap();
            let timing = FrameTiming {
                variable_dt: FIXED_TIMESTEP * steps as f32,
                fixed_steps: steps,
            };

            for _ in 0..240 {
                level.update(timing, &InputSnapshot::default()).unwrap();
            }

            let controller = level.controller();
            assert!(controller.motion().grounded, "{} steps per frame", steps);
            assert_relative_eq!(controller.position().y, 2.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_side_hit_reloads_after_delay() {
        let mut layout = flat_layout();
        // Enemy centred at the character's height, so the hit is from the side
        layout.enemies = vec![Block::new(5.0, 2.0, 1.0, 2.0)];
        let mut level = Level::load(layout).unwrap();

        let mut frames = 0;
        while level.controller().is_solid() && frames < 180 {
            run_frames(&mut level, InputSnapshot::axis(1.0), 1);
            frames += 1;
        }
        assert!(!level.controller().is_solid(), "character never hit the enemy");
        assert!(level.controller().reset_pending());
        assert_eq!(level.generation(), 0);

        run_frames(&mut level, InputSnapshot::default(), 125);
        assert_eq!(level.generation(), 1);
        assert!(level.controller().is_solid());
        assert!(level.controller().input_enabled());
        assert_relative_eq!(level.controller().position().x, 2.0, epsilon = 0.2);
    }

    #[test]
    fn test_stomp_bounces_without_reload() {
        let mut layout = flat_layout();
        layout.spawn = Vec2::new(5.0, 6.0);
        layout.enemies = vec![Block::new(5.0, 1.5, 1.0, 1.0)];
        let mut level = Level::load(layout).unwrap();

        let mut bounced = false;
        for _ in 0..120 {
            run_frames(&mut level, InputSnapshot::default(), 1);
            let controller = level.controller();
            if controller.velocity().y > 0.0 && !controller.motion().grounded {
                bounced = true;
                break;
            }
        }

        assert!(bounced);
        assert!(level.controller().is_solid());
        assert!(!level.controller().reset_pending());
    }

    #[test]
    fn test_flag_completes_level() {
        let mut layout = flat_layout();
        layout.flag = Some(Block::new(4.5, 2.5, 1.0, 3.0));
        let mut level = Level::load(layout).unwrap();

        let mut frames = 0;
        while !level.controller().level_complete() && frames < 180 {
            run_frames(&mut level, InputSnapshot::axis(1.0), 1);
            frames += 1;
        }
        assert!(level.controller().level_complete());
        assert!(!level.controller().input_enabled());

        run_frames(&mut level, InputSnapshot::default(), 125);
        assert_eq!(level.generation(), 1);
        assert!(!level.controller().level_complete());
    }

    #[test]
    fn test_stale_reload_is_ignored() {
        let mut level = Level::load(flat_layout()).unwrap();
        level
            .scheduler
            .borrow_mut()
            .schedule(0.5, LevelCommand::Reload { generation: 0 });

        level.reload().unwrap();
        assert_eq!(level.generation(), 1);

        run_frames(&mut level, InputSnapshot::default(), 60);
        assert_eq!(level.generation(), 1);
        assert_eq!(level.scheduler.borrow().pending_count(), 0);
    }

    #[test]
    fn test_character_stays_on_screen() {
        let mut level = Level::load(flat_layout()).unwrap();
        run_frames(&mut level, InputSnapshot::axis(-1.0), 120);

        let bounds = level.camera().borrow().viewport_bounds();
        assert_relative_eq!(level.controller().position().x, bounds.min.x + 0.6, epsilon = 1e-3);
    }

    #[test]
    fn test_invalid_layout_rejected() {
        let mut layout = flat_layout();
        layout.platforms.push(Block::new(0.0, 0.0, 0.0, 1.0));
        assert!(matches!(
            Level::load(layout),
            Err(LevelError::InvalidLayout(_))
        ));

        let mut layout = flat_layout();
        layout.character = CharacterConfig::default().with_jump(-1.0, 1.0);
        assert!(matches!(Level::load(layout), Err(LevelError::Character(_))));
    }
}
