// src/pedestrian.rs - Pedestrian actor: waypoint geometry, crossing state
// machine, traffic-safety checks, rendering and collision export
use rand::Rng;
use sdl2::pixels::Color;
use sdl2::render::Canvas;
use sdl2::video::Window;

use crate::crossing::{Crossing, Waypoints};
use crate::geometry::Vec2;
use crate::renderer;
use crate::vehicle::VehicleSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PedestrianState {
    WaitingAtEdge,
    Crossing,
    WaitingAtOtherSide,
}

/// Which leg of the round trip the pedestrian is on. `AToB` walks the
/// crossing from `edge_a` to `edge_b` (progress 0 -> 1), `BToA` the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossDirection {
    AToB,
    BToA,
}

impl CrossDirection {
    pub fn sign(self) -> f32 {
        match self {
            CrossDirection::AToB => 1.0,
            CrossDirection::BToA => -1.0,
        }
    }

    pub fn flip(self) -> Self {
        match self {
            CrossDirection::AToB => CrossDirection::BToA,
            CrossDirection::BToA => CrossDirection::AToB,
        }
    }

    fn start_progress(self) -> f32 {
        match self {
            CrossDirection::AToB => 0.0,
            CrossDirection::BToA => 1.0,
        }
    }
}

/// Tuning knobs for the pedestrian. Defaults reproduce the original
/// simulation values.
#[derive(Debug, Clone, Copy)]
pub struct PedestrianConfig {
    /// Walking speed, in progress units per tick before `progress_step_scale`.
    pub speed: f32,
    /// Visual radius; also the basis of the collision square.
    pub size: f32,
    /// Range of the stopped-car gate: only cars closer than this can
    /// invite the pedestrian to cross.
    pub proximity_radius: f32,
    /// Range of the immediate-danger check, deliberately shorter than
    /// `proximity_radius` so a car decelerating at range does not flap
    /// the pedestrian between starting and aborting.
    pub danger_radius: f32,
    /// Below this speed magnitude a nearby car counts as stopped.
    pub stopped_speed_threshold: f32,
    /// Above this speed magnitude a car inside `danger_radius` makes
    /// crossing unsafe.
    pub danger_speed_threshold: f32,
    /// How long (ms) a nearby car must stay stopped before crossing begins.
    pub required_stop_duration: f32,
    /// How long (ms) to linger on the far side before heading back.
    pub far_side_dwell_duration: f32,
    /// Distance beyond the road edge of the off-road waiting points.
    pub off_road_margin: f32,
    /// Collision square half-extent is `size * collision_extent_multiplier`.
    pub collision_extent_multiplier: f32,
    /// Fixed fraction tying `speed` to progress advanced per tick.
    pub progress_step_scale: f32,
    /// When true, progress freezes (never reverses) on any tick where the
    /// immediate-danger check fails mid-crossing. When false the
    /// pedestrian commits to the crossing once started.
    pub pause_for_danger: bool,
}

impl Default for PedestrianConfig {
    fn default() -> Self {
        PedestrianConfig {
            speed: 0.8,
            size: 8.0,
            proximity_radius: 200.0,
            danger_radius: 150.0,
            stopped_speed_threshold: 0.5,
            danger_speed_threshold: 0.1,
            required_stop_duration: 100.0,
            far_side_dwell_duration: 10_000.0,
            off_road_margin: 30.0,
            collision_extent_multiplier: 4.0,
            progress_step_scale: 0.01,
            pause_for_danger: false,
        }
    }
}

pub struct Pedestrian {
    state: PedestrianState,
    direction: CrossDirection,
    progress: f32,
    position: Vec2,
    wait_time: f32,
    car_stopped_time: f32,
    ready_to_return: bool,
    waypoints: Waypoints,
    config: PedestrianConfig,
}

/// World position for a state triple. Pure so the position invariant can be
/// checked without mutating an actor; `Pedestrian::update` goes through here
/// and nothing else ever writes `position`.
pub fn resolve_position(
    waypoints: &Waypoints,
    state: PedestrianState,
    direction: CrossDirection,
    progress: f32,
) -> Vec2 {
    match state {
        PedestrianState::WaitingAtEdge => match direction {
            CrossDirection::AToB => waypoints.off_road_a,
            CrossDirection::BToA => waypoints.off_road_b,
        },
        PedestrianState::Crossing => Vec2::lerp(waypoints.edge_a, waypoints.edge_b, progress),
        PedestrianState::WaitingAtOtherSide => match direction {
            CrossDirection::AToB => waypoints.off_road_b,
            CrossDirection::BToA => waypoints.off_road_a,
        },
    }
}

impl Pedestrian {
    const WAITING_COLOR: Color = Color::RGB(210, 105, 30);
    const CROSSING_COLOR: Color = Color::RGB(51, 51, 51);
    const OTHER_SIDE_COLOR: Color = Color::RGB(139, 69, 19);
    const OUTLINE_COLOR: Color = Color::RGB(255, 255, 255);
    const OUTLINE_WIDTH: f32 = 2.0;

    pub fn new(crossing: &Crossing, config: PedestrianConfig, rng: &mut impl Rng) -> Self {
        let waypoints = Waypoints::derive(crossing, config.off_road_margin);
        let direction = if rng.gen_bool(0.5) {
            CrossDirection::AToB
        } else {
            CrossDirection::BToA
        };
        let state = PedestrianState::WaitingAtEdge;
        let progress = direction.start_progress();
        let position = resolve_position(&waypoints, state, direction, progress);

        Pedestrian {
            state,
            direction,
            progress,
            position,
            wait_time: 0.0,
            car_stopped_time: 0.0,
            ready_to_return: false,
            waypoints,
            config,
        }
    }

    pub fn state(&self) -> PedestrianState {
        self.state
    }

    pub fn direction(&self) -> CrossDirection {
        self.direction
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn ready_to_return(&self) -> bool {
        self.ready_to_return
    }

    #[allow(dead_code)]
    pub fn car_stopped_time(&self) -> f32 {
        self.car_stopped_time
    }

    /// Advance the state machine by one tick of `dt_ms` simulated
    /// milliseconds. Negative deltas clamp to zero so timers never rewind.
    pub fn update(&mut self, vehicles: &[VehicleSnapshot], dt_ms: f32) {
        let dt_ms = dt_ms.max(0.0);

        match self.state {
            PedestrianState::WaitingAtEdge => {
                if self.stopped_car_gate(vehicles, dt_ms) {
                    self.state = PedestrianState::Crossing;
                    self.car_stopped_time = 0.0;
                }
            }
            PedestrianState::Crossing => {
                let paused = self.config.pause_for_danger && !self.is_safe_to_cross(vehicles);
                if !paused {
                    let step =
                        self.config.speed * self.direction.sign() * self.config.progress_step_scale;
                    self.progress = (self.progress + step).clamp(0.0, 1.0);
                }

                let arrived = match self.direction {
                    CrossDirection::AToB => self.progress >= 1.0,
                    CrossDirection::BToA => self.progress <= 0.0,
                };
                if arrived {
                    self.state = PedestrianState::WaitingAtOtherSide;
                    self.wait_time = 0.0;
                }
            }
            PedestrianState::WaitingAtOtherSide => {
                self.wait_time += dt_ms;
                if self.wait_time >= self.config.far_side_dwell_duration {
                    self.ready_to_return = true;
                    self.state = PedestrianState::WaitingAtEdge;
                    self.direction = self.direction.flip();
                }
            }
        }

        self.position = resolve_position(&self.waypoints, self.state, self.direction, self.progress);
    }

    /// Long-range gate: accumulate time while some car inside
    /// `proximity_radius` is stopped, reset the moment none is. Returns true
    /// once the accumulated time reaches `required_stop_duration`, which
    /// filters out momentary near-zero speed readings.
    fn stopped_car_gate(&mut self, vehicles: &[VehicleSnapshot], dt_ms: f32) -> bool {
        let stopped_car_nearby = vehicles.iter().any(|car| {
            car.position.distance_to(self.position) < self.config.proximity_radius
                && car.speed.abs() < self.config.stopped_speed_threshold
        });

        if stopped_car_nearby {
            self.car_stopped_time += dt_ms;
            self.car_stopped_time >= self.config.required_stop_duration
        } else {
            self.car_stopped_time = 0.0;
            false
        }
    }

    /// Short-range abort signal: false when any car inside `danger_radius`
    /// is moving faster than `danger_speed_threshold`. Stricter and shorter
    /// ranged than the stopped-car gate; only wired into the state machine
    /// when `pause_for_danger` is set.
    pub fn is_safe_to_cross(&self, vehicles: &[VehicleSnapshot]) -> bool {
        !vehicles.iter().any(|car| {
            car.position.distance_to(self.position) < self.config.danger_radius
                && car.speed.abs() > self.config.danger_speed_threshold
        })
    }

    /// Collision square exported to the vehicle subsystem, corners in
    /// clockwise order. Empty exactly while waiting on the far side: a
    /// pedestrian at the curb or on the road must be yielded to, one fully
    /// clear of it must not block traffic. The square is deliberately larger
    /// than the sprite to give cars a conservative margin.
    pub fn collision_polygon(&self) -> Vec<Vec2> {
        if self.state == PedestrianState::WaitingAtOtherSide {
            return Vec::new();
        }

        let half = self.config.size * self.config.collision_extent_multiplier;
        vec![
            Vec2::new(self.position.x - half, self.position.y - half),
            Vec2::new(self.position.x + half, self.position.y - half),
            Vec2::new(self.position.x + half, self.position.y + half),
            Vec2::new(self.position.x - half, self.position.y + half),
        ]
    }

    /// Filled circle at the current position, colored by state, with a white
    /// outline for visibility. Read-only.
    pub fn draw(&self, canvas: &mut Canvas<Window>) -> Result<(), String> {
        let fill = match self.state {
            PedestrianState::WaitingAtEdge => Self::WAITING_COLOR,
            PedestrianState::Crossing => Self::CROSSING_COLOR,
            PedestrianState::WaitingAtOtherSide => Self::OTHER_SIDE_COLOR,
        };

        renderer::fill_circle(
            canvas,
            self.position,
            self.config.size + Self::OUTLINE_WIDTH,
            Self::OUTLINE_COLOR,
        )?;
        renderer::fill_circle(canvas, self.position, self.config.size, fill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TICK_MS: f32 = 16.0;
    const EPS: f32 = 1e-4;

    fn test_crossing() -> Crossing {
        Crossing::new(Vec2::ZERO, Vec2::new(1.0, 0.0), 100.0).unwrap()
    }

    // Deterministic actor for state-machine tests; `new` keeps its random
    // direction for the simulation itself.
    fn ped(direction: CrossDirection) -> Pedestrian {
        let config = PedestrianConfig::default();
        let waypoints = Waypoints::derive(&test_crossing(), config.off_road_margin);
        let state = PedestrianState::WaitingAtEdge;
        let progress = direction.start_progress();
        let position = resolve_position(&waypoints, state, direction, progress);
        Pedestrian {
            state,
            direction,
            progress,
            position,
            wait_time: 0.0,
            car_stopped_time: 0.0,
            ready_to_return: false,
            waypoints,
            config,
        }
    }

    fn stopped_car(x: f32, y: f32) -> VehicleSnapshot {
        VehicleSnapshot {
            position: Vec2::new(x, y),
            speed: 0.0,
        }
    }

    fn moving_car(x: f32, y: f32, speed: f32) -> VehicleSnapshot {
        VehicleSnapshot {
            position: Vec2::new(x, y),
            speed,
        }
    }

    #[test]
    fn new_pedestrian_waits_off_road_consistent_with_its_direction() {
        let mut rng = StdRng::seed_from_u64(7);
        let p = Pedestrian::new(&test_crossing(), PedestrianConfig::default(), &mut rng);
        assert_eq!(p.state(), PedestrianState::WaitingAtEdge);
        let expected = match p.direction() {
            CrossDirection::AToB => (0.0, p.waypoints.off_road_a),
            CrossDirection::BToA => (1.0, p.waypoints.off_road_b),
        };
        assert_eq!(p.progress(), expected.0);
        assert!(p.position().distance_to(expected.1) < EPS);
    }

    #[test]
    fn seeded_rng_reaches_both_initial_directions() {
        let crossing = test_crossing();
        let mut seen_a = false;
        let mut seen_b = false;
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let p = Pedestrian::new(&crossing, PedestrianConfig::default(), &mut rng);
            match p.direction() {
                CrossDirection::AToB => seen_a = true,
                CrossDirection::BToA => seen_b = true,
            }
        }
        assert!(seen_a && seen_b);
    }

    #[test]
    fn no_vehicles_means_waiting_forever() {
        let mut p = ped(CrossDirection::AToB);
        for _ in 0..1_000 {
            p.update(&[], TICK_MS);
        }
        assert_eq!(p.state(), PedestrianState::WaitingAtEdge);
        assert_eq!(p.car_stopped_time(), 0.0);
    }

    #[test]
    fn crossing_starts_on_the_tick_the_stop_threshold_is_reached() {
        // Required stop duration is 100ms; 20ms ticks reach it on the fifth.
        let mut p = ped(CrossDirection::AToB);
        let cars = [stopped_car(0.0, 40.0)];
        for _ in 0..4 {
            p.update(&cars, 20.0);
            assert_eq!(p.state(), PedestrianState::WaitingAtEdge);
        }
        p.update(&cars, 20.0);
        assert_eq!(p.state(), PedestrianState::Crossing);
        assert_eq!(p.car_stopped_time(), 0.0);
    }

    #[test]
    fn stop_timer_resets_when_the_car_moves_off() {
        let mut p = ped(CrossDirection::AToB);
        let stopped = [stopped_car(0.0, 40.0)];
        for _ in 0..4 {
            p.update(&stopped, 20.0);
        }
        assert!(p.car_stopped_time() > 0.0);

        // Same car pulls away: accumulated time must drop back to zero.
        let driving = [moving_car(0.0, 40.0, 3.0)];
        p.update(&driving, 20.0);
        assert_eq!(p.car_stopped_time(), 0.0);
        assert_eq!(p.state(), PedestrianState::WaitingAtEdge);
    }

    #[test]
    fn distant_stopped_car_does_not_open_the_gate() {
        let mut p = ped(CrossDirection::AToB);
        let cars = [stopped_car(500.0, 80.0)];
        for _ in 0..20 {
            p.update(&cars, 20.0);
        }
        assert_eq!(p.state(), PedestrianState::WaitingAtEdge);
        assert_eq!(p.car_stopped_time(), 0.0);
    }

    #[test]
    fn progress_stays_in_bounds_and_on_the_crossing_segment() {
        let mut p = ped(CrossDirection::AToB);
        p.state = PedestrianState::Crossing;
        for _ in 0..500 {
            p.update(&[], TICK_MS);
            assert!((0.0..=1.0).contains(&p.progress()));
            if p.state() == PedestrianState::Crossing {
                // Edges are (0,50) and (0,-50): on-segment means x == 0 and
                // y within the span.
                assert!(p.position().x.abs() < EPS);
                assert!(p.position().y.abs() <= 50.0 + EPS);
            }
        }
        assert_eq!(p.state(), PedestrianState::WaitingAtOtherSide);
        assert_eq!(p.progress(), 1.0);
        assert!(p.position().distance_to(p.waypoints.off_road_b) < EPS);
    }

    #[test]
    fn reverse_leg_ends_at_progress_zero() {
        let mut p = ped(CrossDirection::BToA);
        p.state = PedestrianState::Crossing;
        for _ in 0..500 {
            p.update(&[], TICK_MS);
        }
        assert_eq!(p.state(), PedestrianState::WaitingAtOtherSide);
        assert_eq!(p.progress(), 0.0);
        assert!(p.position().distance_to(p.waypoints.off_road_a) < EPS);
    }

    #[test]
    fn far_side_dwell_runs_its_full_duration_then_flips_direction() {
        let mut p = ped(CrossDirection::AToB);
        p.state = PedestrianState::WaitingAtOtherSide;
        p.progress = 1.0;
        for _ in 0..9 {
            p.update(&[], 1_000.0);
            assert_eq!(p.state(), PedestrianState::WaitingAtOtherSide);
        }
        p.update(&[], 1_000.0);
        assert_eq!(p.state(), PedestrianState::WaitingAtEdge);
        assert_eq!(p.direction(), CrossDirection::BToA);
        assert!(p.ready_to_return());
    }

    #[test]
    fn full_round_trip_flips_direction_exactly_once() {
        let mut p = ped(CrossDirection::AToB);
        let cars = [stopped_car(0.0, 60.0)];
        let mut ticks = 0;

        while p.state() != PedestrianState::Crossing {
            p.update(&cars, TICK_MS);
            ticks += 1;
            assert!(ticks < 100, "gate never opened");
        }
        while p.state() != PedestrianState::WaitingAtOtherSide {
            p.update(&cars, TICK_MS);
            ticks += 1;
            assert!(ticks < 1_000, "crossing never completed");
        }
        assert_eq!(p.direction(), CrossDirection::AToB);
        while p.state() != PedestrianState::WaitingAtEdge {
            p.update(&cars, TICK_MS);
            ticks += 1;
            assert!(ticks < 2_000, "dwell never expired");
        }
        assert_eq!(p.direction(), CrossDirection::BToA);
        assert!(p.ready_to_return());
    }

    #[test]
    fn negative_delta_never_rewinds_timers() {
        let mut p = ped(CrossDirection::AToB);
        p.state = PedestrianState::WaitingAtOtherSide;
        p.progress = 1.0;
        p.update(&[], 500.0);
        assert_eq!(p.wait_time, 500.0);
        p.update(&[], -250.0);
        assert_eq!(p.wait_time, 500.0);
        assert_eq!(p.state(), PedestrianState::WaitingAtOtherSide);
    }

    #[test]
    fn collision_polygon_is_empty_exactly_on_the_far_side() {
        let mut p = ped(CrossDirection::AToB);
        assert_eq!(p.collision_polygon().len(), 4);

        p.state = PedestrianState::Crossing;
        p.progress = 0.5;
        p.position = resolve_position(&p.waypoints, p.state, p.direction, p.progress);
        assert_eq!(p.collision_polygon().len(), 4);

        p.state = PedestrianState::WaitingAtOtherSide;
        assert!(p.collision_polygon().is_empty());
    }

    #[test]
    fn collision_polygon_is_a_square_around_the_position() {
        let p = ped(CrossDirection::AToB);
        let half = p.config.size * p.config.collision_extent_multiplier;
        let c = p.position();
        let polygon = p.collision_polygon();
        assert_eq!(polygon[0], Vec2::new(c.x - half, c.y - half));
        assert_eq!(polygon[1], Vec2::new(c.x + half, c.y - half));
        assert_eq!(polygon[2], Vec2::new(c.x + half, c.y + half));
        assert_eq!(polygon[3], Vec2::new(c.x - half, c.y + half));
    }

    #[test]
    fn danger_check_trips_only_on_close_fast_cars() {
        let p = ped(CrossDirection::AToB);
        // Waiting at (0, 80). Close and moving: unsafe.
        assert!(!p.is_safe_to_cross(&[moving_car(0.0, 40.0, 2.0)]));
        // Close but effectively stopped: safe.
        assert!(p.is_safe_to_cross(&[moving_car(0.0, 40.0, 0.05)]));
        // Fast but outside the danger radius: safe.
        assert!(p.is_safe_to_cross(&[moving_car(0.0, -200.0, 5.0)]));
        assert!(p.is_safe_to_cross(&[]));
    }

    #[test]
    fn pause_for_danger_freezes_progress_without_reversing() {
        let mut p = ped(CrossDirection::AToB);
        p.config.pause_for_danger = true;
        p.state = PedestrianState::Crossing;
        p.progress = 0.4;

        let danger = [moving_car(0.0, 10.0, 4.0)];
        p.update(&danger, TICK_MS);
        assert_eq!(p.progress(), 0.4);
        assert_eq!(p.state(), PedestrianState::Crossing);

        p.update(&[], TICK_MS);
        assert!(p.progress() > 0.4);
    }

    #[test]
    fn committed_crossing_ignores_danger_by_default() {
        let mut p = ped(CrossDirection::AToB);
        p.state = PedestrianState::Crossing;
        p.progress = 0.4;
        let danger = [moving_car(0.0, 10.0, 4.0)];
        p.update(&danger, TICK_MS);
        assert!(p.progress() > 0.4);
    }
}
