// src/renderer.rs - Primitive-shape rendering for the road, the marked
// crossing and cars; pedestrians draw themselves via fill_circle
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;

use crate::crossing::Crossing;
use crate::geometry::Vec2;
use crate::vehicle::{Car, CarState};
use crate::WINDOW_WIDTH;

const ROAD_COLOR: Color = Color::RGB(50, 50, 50);
const KERB_COLOR: Color = Color::RGB(200, 200, 200);
const STRIPE_COLOR: Color = Color::RGB(230, 230, 230);

const STRIPE_WIDTH: u32 = 12;
const STRIPE_GAP: u32 = 14;
const STRIPE_COUNT: i32 = 3;
const KERB_THICKNESS: u32 = 4;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Renderer
    }

    /// Draw the road band and the zebra stripes of the crossing. The demo
    /// road runs horizontally through the crossing center; the crossing
    /// width is the breadth of the band.
    pub fn render_road(&self, canvas: &mut Canvas<Window>, crossing: &Crossing) -> Result<(), String> {
        let road_top = (crossing.center.y - crossing.width / 2.0) as i32;
        let road_height = crossing.width as u32;

        canvas.set_draw_color(ROAD_COLOR);
        canvas.fill_rect(Rect::new(0, road_top, WINDOW_WIDTH, road_height))?;

        // Kerb lines at both road edges
        canvas.set_draw_color(KERB_COLOR);
        canvas.fill_rect(Rect::new(0, road_top - KERB_THICKNESS as i32, WINDOW_WIDTH, KERB_THICKNESS))?;
        canvas.fill_rect(Rect::new(0, road_top + road_height as i32, WINDOW_WIDTH, KERB_THICKNESS))?;

        // Zebra stripes centered on the crossing, spanning the full band
        canvas.set_draw_color(STRIPE_COLOR);
        let pitch = (STRIPE_WIDTH + STRIPE_GAP) as i32;
        for i in -STRIPE_COUNT..=STRIPE_COUNT {
            let x = crossing.center.x as i32 + i * pitch - (STRIPE_WIDTH / 2) as i32;
            canvas.fill_rect(Rect::new(x, road_top, STRIPE_WIDTH, road_height))?;
        }

        Ok(())
    }

    pub fn render_car(&self, canvas: &mut Canvas<Window>, car: &Car) -> Result<(), String> {
        let color = match car.state {
            CarState::Driving => Color::RGB(100, 100, 255),
            CarState::Yielding => Color::RGB(255, 100, 100),
        };
        canvas.set_draw_color(color);
        canvas.fill_rect(Rect::new(
            (car.position.x - Car::WIDTH / 2.0) as i32,
            (car.position.y - Car::HEIGHT / 2.0) as i32,
            Car::WIDTH as u32,
            Car::HEIGHT as u32,
        ))
    }
}

/// Filled circle via horizontal scanlines; plain sdl2 has no circle
/// primitive.
pub fn fill_circle(
    canvas: &mut Canvas<Window>,
    center: Vec2,
    radius: f32,
    color: Color,
) -> Result<(), String> {
    canvas.set_draw_color(color);
    let cx = center.x as i32;
    let cy = center.y as i32;
    let r = radius.max(0.0) as i32;
    for dy in -r..=r {
        let half_width = (((r * r - dy * dy) as f32).sqrt()) as i32;
        canvas.fill_rect(Rect::new(
            cx - half_width,
            cy + dy,
            (half_width * 2 + 1) as u32,
            1,
        ))?;
    }
    Ok(())
}
