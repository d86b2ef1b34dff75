pub const WINDOW_WIDTH: u32 = 1024;
pub const WINDOW_HEIGHT: u32 = 768;
pub const FPS: u32 = 60;

/// Breadth of the demo road band, which doubles as the crossing width.
pub const ROAD_WIDTH: f32 = 120.0;
pub const CAR_SPAWN_COOLDOWN_MS: f32 = 2500.0;
