// Engine modules: camera, timing, input, physics, scheduling

pub mod camera;
pub mod game_loop;
pub mod input;
pub mod physics;
pub mod scheduler;
