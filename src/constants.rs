// --- Arena ---
pub const ARENA_WIDTH: f64 = 900.0;
pub const ARENA_HEIGHT: f64 = 720.0;
pub const DEFAULT_ASTEROID_COUNT: usize = 15;
pub const MIN_ARENA_EXTENT: f64 = 100.0; // Room for the ship plus spawn margins

// --- Timing ---
pub const TICK_MILLIS: u64 = 20; // ~50 Hz, fixed regardless of real elapsed time
pub const HOLD_WINDOW_TICKS: u64 = 15; // Held key expires without a repeat (non-enhanced terminals)

// --- Ship ---
pub const SHIP_START_FACING: f64 = 270.0; // Degrees, pointing up the screen
pub const SHIP_ROTATION_STEP: f64 = 5.0; // Degrees per tick
pub const SHIP_THRUST_SCALE: f64 = 0.1;
pub const SHIP_OUTLINE: [(f64, f64); 4] = [(-13.0, -15.0), (14.0, 0.0), (-13.0, 15.0), (-5.0, 0.0)];
pub const SHIP_NOSE: (f64, f64) = (14.0, 0.0);
pub const STARTING_LIVES: u32 = 3;
pub const RESPAWN_GRACE_TICKS: u64 = 100; // 2 seconds without ship collisions after a hit

// --- Asteroids ---
pub const ASTEROID_SPAWN_MARGIN: f64 = 40.0; // Keeps spawns off the far edges
pub const ASTEROID_SPAWN_CLEARANCE: f64 = 60.0; // Minimum distance from the ship's start position
pub const ASTEROID_SPAWN_ATTEMPTS: usize = 32;
pub const ASTEROID_SIZE: f64 = 18.0;
pub const ASTEROID_TEMPLATE_RADIUS: f64 = 18.0;
pub const ASTEROID_MAX_DRIFT: f64 = 1.5;
pub const ASTEROID_OUTLINE: [(f64, f64); 12] = [
    (-8.0, -15.5), (-1.0, -10.5), (8.0, -14.5), (16.0, -7.5),
    (9.0, -2.5), (18.0, 4.5), (8.0, 15.5), (-4.0, 12.5),
    (-10.0, 15.5), (-17.0, 6.5), (-13.0, 0.5), (-17.0, -8.5),
];

// --- Lasers ---
pub const LASER_SPEED: f64 = 10.0;
pub const LASER_OUTLINE: [(f64, f64); 4] = [(-3.0, -1.0), (3.0, -1.0), (3.0, 1.0), (-3.0, 1.0)];

// --- Scoring ---
pub const POINTS_PER_ASTEROID: u32 = 10;
