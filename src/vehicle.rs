// src/vehicle.rs - Read-only vehicle snapshots plus the demo car that
// drives the road and yields to the pedestrian's collision polygon
use crate::geometry::Vec2;

/// The per-tick view of a vehicle the pedestrian consumes: where it is and
/// how fast it is going. Read-only for the duration of an update call.
#[derive(Debug, Clone, Copy)]
pub struct VehicleSnapshot {
    pub position: Vec2,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarState {
    Driving,
    Yielding,
}

/// A deliberately simple car: straight line along the road axis, speed eased
/// toward a target, position assigned directly. It exists to exercise the
/// pedestrian's stopped-car gate and collision polygon, not to model traffic.
pub struct Car {
    pub position: Vec2,
    pub speed: f32,
    pub state: CarState,
    heading: Vec2,
    target_speed: f32,
}

impl Car {
    pub const CRUISE_SPEED: f32 = 60.0;
    pub const WIDTH: f32 = 44.0;
    pub const HEIGHT: f32 = 22.0;

    const ACCELERATION: f32 = 40.0;
    const DECELERATION: f32 = 120.0;
    /// How far ahead a polygon corner must be (along the heading) to make
    /// the car brake.
    const YIELD_DISTANCE: f32 = 90.0;
    /// Lateral slack for the ahead-check; wider than the car so it brakes
    /// for a pedestrian at the curb, not only one dead ahead.
    const YIELD_HALF_WIDTH: f32 = 60.0;

    pub fn new(position: Vec2, heading: Vec2) -> Self {
        Car {
            position,
            speed: Self::CRUISE_SPEED,
            state: CarState::Driving,
            heading: heading.normalized(),
            target_speed: Self::CRUISE_SPEED,
        }
    }

    pub fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot {
            position: self.position,
            speed: self.speed,
        }
    }

    /// One tick. `obstacle` is the pedestrian's current collision polygon;
    /// an empty slice means the road is clear.
    pub fn update(&mut self, dt_ms: f32, obstacle: &[Vec2]) {
        let dt = dt_ms.max(0.0) / 1000.0;

        if self.obstacle_ahead(obstacle) {
            self.target_speed = 0.0;
            self.state = CarState::Yielding;
        } else {
            self.target_speed = Self::CRUISE_SPEED;
            self.state = CarState::Driving;
        }

        let diff = self.target_speed - self.speed;
        if diff > 1.0 {
            self.speed += Self::ACCELERATION * dt;
        } else if diff < -1.0 {
            self.speed -= Self::DECELERATION * dt;
        } else {
            self.speed = self.target_speed;
        }
        self.speed = self.speed.max(0.0);

        self.position = self.position + self.heading * (self.speed * dt);
    }

    fn obstacle_ahead(&self, polygon: &[Vec2]) -> bool {
        let lateral_axis = self.heading.perpendicular();
        polygon.iter().any(|corner| {
            let rel = *corner - self.position;
            let ahead = rel.x * self.heading.x + rel.y * self.heading.y;
            let lateral = rel.x * lateral_axis.x + rel.y * lateral_axis.y;
            ahead > 0.0 && ahead < Self::YIELD_DISTANCE && lateral.abs() < Self::YIELD_HALF_WIDTH
        })
    }
}
