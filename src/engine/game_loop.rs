/// Two-rate game loop timing
///
/// Every rendered frame runs one variable-rate tick with the real frame
/// delta, followed by zero or more fixed-rate ticks drained from an
/// accumulator. Position integration lives on the fixed ticks so it stays
/// deterministic regardless of frame rate.
use std::time::{Duration, Instant};

/// Target fixed tick rate (60 ticks per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of fixed ticks per frame to prevent spiral of death
const MAX_FIXED_STEPS: u32 = 5;

/// Longest frame delta handed to the variable tick (hitches after a stall)
const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Timing for a single rendered frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// Delta for the variable-rate tick, in seconds
    pub variable_dt: f32,
    /// How many fixed-rate ticks to run this frame
    pub fixed_steps: u32,
}

/// Game loop timing state
pub struct GameLoop {
    /// Accumulated time for fixed timestep updates
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Whether the simulation is paused
    paused: bool,

    /// Current frame number
    frame_count: u64,

    /// Total fixed ticks executed
    fixed_tick_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            frame_count: 0,
            fixed_tick_count: 0,
        }
    }

    /// Begin a new frame using the wall clock
    pub fn begin_frame(&mut self) -> FrameTiming {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Begin a new frame with an explicit frame duration
    pub fn advance(&mut self, frame_time: Duration) -> FrameTiming {
        self.frame_count += 1;
        let frame_time = frame_time.min(MAX_FRAME_DELTA);

        // Paused frames neither accumulate time nor run ticks
        if self.paused {
            return FrameTiming {
                variable_dt: 0.0,
                fixed_steps: 0,
            };
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && steps < MAX_FIXED_STEPS {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            steps += 1;
        }

        // Drop the backlog we refused to simulate
        if steps == MAX_FIXED_STEPS && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::debug!(
                "Dropping {:?} of simulation backlog",
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }

        self.fixed_tick_count += steps as u64;
        FrameTiming {
            variable_dt: frame_time.as_secs_f32(),
            fixed_steps: steps,
        }
    }

    /// Get the fixed timestep (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Get the interpolation alpha for smooth rendering between fixed ticks
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / FIXED_TIMESTEP
    }

    /// Get total number of frames begun
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of fixed ticks executed
    pub fn fixed_tick_count(&self) -> u64 {
        self.fixed_tick_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Simulation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_loop_creation() {
        let game_loop = GameLoop::new();
        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.fixed_tick_count(), 0);
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_fixed_timestep() {
        let game_loop = GameLoop::new();
        assert!((game_loop.fixed_timestep() - 1.0 / 60.0).abs() < 0.0001);
    }

    #[test]
    fn test_short_frame_runs_no_fixed_tick() {
        let mut game_loop = GameLoop::new();
        let timing = game_loop.advance(Duration::from_millis(5));
        assert_eq!(timing.fixed_steps, 0);
        assert!((timing.variable_dt - 0.005).abs() < 1e-6);
    }

    #[test]
    fn test_accumulator_carries_between_frames() {
        let mut game_loop = GameLoop::new();
        assert_eq!(game_loop.advance(Duration::from_millis(10)).fixed_steps, 0);
        assert_eq!(game_loop.advance(Duration::from_millis(10)).fixed_steps, 1);
        assert_eq!(game_loop.fixed_tick_count(), 1);
    }

    #[test]
    fn test_slow_frame_runs_several_fixed_ticks() {
        let mut game_loop = GameLoop::new();
        let timing = game_loop.advance(Duration::from_millis(51));
        assert_eq!(timing.fixed_steps, 3);
    }

    #[test]
    fn test_max_fixed_steps_limit() {
        let mut game_loop = GameLoop::new();
        let timing = game_loop.advance(Duration::from_millis(300));
        assert_eq!(timing.fixed_steps, MAX_FIXED_STEPS);
        // Backlog is dropped rather than replayed next frame
        assert_eq!(game_loop.advance(Duration::ZERO).fixed_steps, 0);
    }

    #[test]
    fn test_paused_no_updates() {
        let mut game_loop = GameLoop::new();
        game_loop.pause();

        let timing = game_loop.advance(Duration::from_millis(50));
        assert_eq!(timing.fixed_steps, 0);
        assert_eq!(timing.variable_dt, 0.0);
    }

    #[test]
    fn test_toggle_pause() {
        let mut game_loop = GameLoop::new();
        game_loop.toggle_pause();
        assert!(game_loop.is_paused());
        game_loop.toggle_pause();
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_alpha_range() {
        let mut game_loop = GameLoop::new();
        game_loop.advance(Duration::from_millis(20));
        let alpha = game_loop.alpha();
        assert!((0.0..1.0).contains(&alpha));
    }
}
