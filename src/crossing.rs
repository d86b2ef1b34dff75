// src/crossing.rs - Marked crossing descriptor and derived waypoint geometry
use thiserror::Error;

use crate::geometry::Vec2;

/// Direction vectors shorter than this are considered degenerate; their
/// perpendicular would be meaningless and would poison every derived point.
const MIN_DIRECTION_LENGTH: f32 = 1e-6;

#[derive(Debug, Error, PartialEq)]
pub enum CrossingError {
    #[error("crossing direction vector has (near-)zero magnitude")]
    DegenerateDirection,
    #[error("crossing width must be positive, got {0}")]
    InvalidWidth(f32),
}

/// A fixed-width marked crossing over a road. Read-only after creation.
#[derive(Debug, Clone, Copy)]
pub struct Crossing {
    pub center: Vec2,
    pub direction_vector: Vec2,
    pub width: f32,
}

impl Crossing {
    pub fn new(center: Vec2, direction_vector: Vec2, width: f32) -> Result<Self, CrossingError> {
        if direction_vector.length() < MIN_DIRECTION_LENGTH {
            return Err(CrossingError::DegenerateDirection);
        }
        if width <= 0.0 || !width.is_finite() {
            return Err(CrossingError::InvalidWidth(width));
        }
        Ok(Crossing {
            center,
            direction_vector,
            width,
        })
    }
}

/// Fixed waypoints derived once from a crossing: the two road-edge points a
/// pedestrian walks between, and the two off-road points it waits at.
/// Separating "edge" from "off-road" keeps idle pedestrians out of traffic.
#[derive(Debug, Clone, Copy)]
pub struct Waypoints {
    pub edge_a: Vec2,
    pub edge_b: Vec2,
    pub off_road_a: Vec2,
    pub off_road_b: Vec2,
}

impl Waypoints {
    pub fn derive(crossing: &Crossing, off_road_margin: f32) -> Self {
        let perp = crossing.direction_vector.normalized().perpendicular();
        let edge_offset = crossing.width / 2.0;
        let off_road_offset = edge_offset + off_road_margin;

        Waypoints {
            edge_a: crossing.center + perp * edge_offset,
            edge_b: crossing.center + perp * -edge_offset,
            off_road_a: crossing.center + perp * off_road_offset,
            off_road_b: crossing.center + perp * -off_road_offset,
        }
    }
}
