use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use std::time::{Duration, Instant};

mod constants;
mod crossing;
mod game;
mod geometry;
mod pedestrian;
mod renderer;
mod vehicle;

pub use constants::{CAR_SPAWN_COOLDOWN_MS, FPS, ROAD_WIDTH, WINDOW_HEIGHT, WINDOW_WIDTH};
use game::Game;

fn main() -> Result<(), String> {
    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let window = video_subsystem
        .window("Pedestrian Crossing", WINDOW_WIDTH, WINDOW_HEIGHT)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let canvas = window
        .into_canvas()
        .accelerated()
        .present_vsync()
        .build()
        .map_err(|e| e.to_string())?;

    let mut game = Game::new(canvas)?;
    let mut event_pump = sdl_context.event_pump()?;
    let mut running = true;
    let mut last_frame = Instant::now();

    print_controls();

    while running {
        let now = Instant::now();
        let dt_ms = now.duration_since(last_frame).as_secs_f32() * 1000.0;
        last_frame = now;

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => running = false,
                Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => running = false,
                _ => game.handle_event(&event),
            }
        }

        game.update(dt_ms);
        game.render()?;

        let frame_time = now.elapsed();
        let frame_budget = Duration::from_millis(1000 / FPS as u64);
        if frame_time < frame_budget {
            std::thread::sleep(frame_budget - frame_time);
        }
    }

    Ok(())
}

fn print_controls() {
    println!("=== Pedestrian Crossing Simulation ===");
    println!("C:   Spawn a car");
    println!("R:   Toggle continuous car spawning");
    println!("Esc: Exit");
    println!();
    println!("The pedestrian waits at the kerb until a car has stopped");
    println!("nearby long enough, crosses, lingers on the far side, then");
    println!("heads back. Cars yield to its collision polygon.");
}
