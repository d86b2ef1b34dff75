use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::render::Canvas;
use sdl2::video::Window;

use rand::Rng;

use crate::crossing::Crossing;
use crate::geometry::Vec2;
use crate::pedestrian::{Pedestrian, PedestrianConfig};
use crate::renderer::Renderer;
use crate::vehicle::Car;
use crate::{CAR_SPAWN_COOLDOWN_MS, ROAD_WIDTH, WINDOW_HEIGHT, WINDOW_WIDTH};

/// Margin past the window edge at which departed cars are culled.
const CULL_MARGIN: f32 = 100.0;

pub struct Game {
    canvas: Canvas<Window>,
    crossing: Crossing,
    pedestrian: Pedestrian,
    cars: Vec<Car>,
    renderer: Renderer,
    continuous_spawn: bool,
    current_cooldown_ms: f32,
}

impl Game {
    pub fn new(canvas: Canvas<Window>) -> Result<Self, String> {
        let center = Vec2::new(WINDOW_WIDTH as f32 / 2.0, WINDOW_HEIGHT as f32 / 2.0);
        let crossing =
            Crossing::new(center, Vec2::new(1.0, 0.0), ROAD_WIDTH).map_err(|e| e.to_string())?;
        let pedestrian = Pedestrian::new(
            &crossing,
            PedestrianConfig::default(),
            &mut rand::thread_rng(),
        );

        Ok(Game {
            canvas,
            crossing,
            pedestrian,
            cars: Vec::new(),
            renderer: Renderer::new(),
            continuous_spawn: true,
            current_cooldown_ms: 0.0,
        })
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::KeyDown {
                keycode: Some(keycode),
                repeat: false,
                ..
            } => match keycode {
                Keycode::C => self.spawn_car(),
                Keycode::R => {
                    self.continuous_spawn = !self.continuous_spawn;
                    println!(
                        "Continuous car spawning: {}",
                        if self.continuous_spawn { "on" } else { "off" }
                    );
                }
                _ => {}
            },
            _ => {}
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        if self.current_cooldown_ms > 0.0 {
            self.current_cooldown_ms = (self.current_cooldown_ms - dt_ms).max(0.0);
        }
        if self.continuous_spawn && self.current_cooldown_ms == 0.0 {
            self.spawn_car();
        }

        // Cars react to the polygon exported this tick, then the pedestrian
        // reacts to the cars' fresh snapshots.
        let polygon = self.pedestrian.collision_polygon();
        for car in &mut self.cars {
            car.update(dt_ms, &polygon);
        }

        let snapshots: Vec<_> = self.cars.iter().map(|car| car.snapshot()).collect();
        let state_before = self.pedestrian.state();
        self.pedestrian.update(&snapshots, dt_ms);
        let state_after = self.pedestrian.state();

        if state_before != state_after {
            println!(
                "pedestrian: {:?} -> {:?} at ({:.0}, {:.0}) (direction {:?}, progress {:.2}, returning: {})",
                state_before,
                state_after,
                self.pedestrian.position().x,
                self.pedestrian.position().y,
                self.pedestrian.direction(),
                self.pedestrian.progress(),
                self.pedestrian.ready_to_return(),
            );
        }

        self.cars.retain(|car| {
            car.position.x > -CULL_MARGIN && car.position.x < WINDOW_WIDTH as f32 + CULL_MARGIN
        });
    }

    pub fn render(&mut self) -> Result<(), String> {
        self.canvas.set_draw_color(Color::RGB(80, 140, 80));
        self.canvas.clear();

        self.renderer.render_road(&mut self.canvas, &self.crossing)?;
        for car in &self.cars {
            self.renderer.render_car(&mut self.canvas, car)?;
        }
        self.pedestrian.draw(&mut self.canvas)?;

        self.canvas.present();
        Ok(())
    }

    fn spawn_car(&mut self) {
        let mut rng = rand::thread_rng();
        let from_left = rng.gen_bool(0.5);
        // One lane per direction, offset from the road center line.
        let lane_offset = ROAD_WIDTH / 4.0;
        let (x, heading, lane) = if from_left {
            (-Car::WIDTH, Vec2::new(1.0, 0.0), lane_offset)
        } else {
            (
                WINDOW_WIDTH as f32 + Car::WIDTH,
                Vec2::new(-1.0, 0.0),
                -lane_offset,
            )
        };
        let y = self.crossing.center.y + lane;
        self.cars.push(Car::new(Vec2::new(x, y), heading));
        self.current_cooldown_ms = CAR_SPAWN_COOLDOWN_MS;
    }
}
