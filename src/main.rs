use anyhow::Result;
use log::{debug, error, info};
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

use rusted_platformer::engine::game_loop::GameLoop;
use rusted_platformer::engine::input::{Action, InputManager};
use rusted_platformer::game::level::{Level, LevelLayout};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rusted Platformer...");

    let layout = LevelLayout::default();

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Rusted Platformer")
        .with_inner_size(winit::dpi::PhysicalSize::new(
            layout.viewport.x as u32,
            layout.viewport.y as u32,
        ))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");

    let mut level = Level::load(layout)?;
    let mut input = InputManager::new();
    let mut game_loop = GameLoop::new();
    let mut shown = (level.animation().current(), false);

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::Resized(physical_size),
                ..
            } => {
                info!("Window resized to {:?}", physical_size);
                level.resize(physical_size.width as f32, physical_size.height as f32);
            }
            Event::WindowEvent {
                event: WindowEvent::Focused(false),
                ..
            } => input.reset(),
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => input.process_keyboard_event(&event),
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                if input.just_pressed(Action::Quit) {
                    elwt.exit();
                    return;
                }
                if input.just_pressed(Action::Pause) {
                    game_loop.toggle_pause();
                }

                let timing = game_loop.begin_frame();
                input.begin_frame(timing.variable_dt);
                if !game_loop.is_paused() {
                    if let Err(err) = level.update(timing, input.player()) {
                        error!("Level update failed: {}", err);
                        elwt.exit();
                        return;
                    }
                }
                input.end_frame();

                let animation = level.animation();
                let complete = level.controller().level_complete();
                if (animation.current(), complete) != shown {
                    shown = (animation.current(), complete);
                    debug!(
                        "Showing {} after {}",
                        animation.current().animation_name(),
                        animation.previous().animation_name()
                    );
                    let mut title =
                        format!("Rusted Platformer - {}", animation.current().animation_name());
                    if complete {
                        title.push_str(" - Level complete!");
                    }
                    window.set_title(&title);
                }
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
