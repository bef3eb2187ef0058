use crate::constants::*;
use crate::geometry::polygons_overlap;
use crate::types::{Arena, Vector2D, wrap_degrees};
use rand::Rng;
use log::debug;

/// Shared shape of everything that lives in the arena.
pub trait Entity {
    fn position(&self) -> Vector2D;

    fn is_on_screen(&self) -> bool;

    /// Outline in arena coordinates, already rotated and translated.
    fn outline(&self) -> Vec<Vector2D>;

    fn overlaps(&self, other: &impl Entity) -> bool
    where
        Self: Sized,
    {
        polygons_overlap(&self.outline(), &other.outline())
    }
}

fn place(shape: &[Vector2D], position: Vector2D, facing: f64) -> Vec<Vector2D> {
    shape
        .iter()
        .map(|offset| position.add(offset.rotate_degrees(facing)))
        .collect()
}

// --- Ship ---

/// One control per tick, resolved from whichever key is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Idle,
    RotateRight,
    RotateLeft,
    Thrust,
    Brake,
    Stop,
}

pub struct Ship {
    pub position: Vector2D,
    pub velocity: Vector2D, // No friction: only thrust, brake and stop change it
    facing: f64,            // Degrees in [0, 360)
    moving_angle: f64,      // Facing captured at the last thrust or brake
    pub interaction: bool,
    shape: Vec<Vector2D>,
}

impl Ship {
    pub fn new(position: Vector2D) -> Self {
        Ship {
            position,
            velocity: Vector2D::default(),
            facing: SHIP_START_FACING,
            moving_angle: SHIP_START_FACING,
            interaction: false,
            shape: SHIP_OUTLINE.iter().copied().map(Vector2D::from).collect(),
        }
    }

    pub fn facing(&self) -> f64 {
        self.facing
    }

    pub fn moving_angle(&self) -> f64 {
        self.moving_angle
    }

    pub fn set_facing(&mut self, degrees: f64) {
        self.facing = wrap_degrees(degrees);
    }

    pub fn increase_rotation_angle(&mut self) {
        self.facing = wrap_degrees(self.facing + SHIP_ROTATION_STEP);
    }

    pub fn decrease_rotation_angle(&mut self) {
        self.facing = wrap_degrees(self.facing - SHIP_ROTATION_STEP);
    }

    pub fn increase_velocity(&mut self, delta: Vector2D) {
        self.velocity = self.velocity.add(delta);
    }

    pub fn decrease_velocity(&mut self, delta: Vector2D) {
        self.velocity = self.velocity.sub(delta);
    }

    pub fn thrust(&mut self) {
        self.moving_angle = self.facing;
        self.increase_velocity(Vector2D::from_degrees(self.moving_angle).scale(SHIP_THRUST_SCALE));
        debug!("Thrusting: Angle = {}, Velocity = ({}, {})", self.moving_angle, self.velocity.x, self.velocity.y);
    }

    pub fn brake(&mut self) {
        self.moving_angle = self.facing;
        self.decrease_velocity(Vector2D::from_degrees(self.moving_angle).scale(SHIP_THRUST_SCALE));
        debug!("Braking: Angle = {}, Velocity = ({}, {})", self.moving_angle, self.velocity.x, self.velocity.y);
    }

    pub fn stop(&mut self) {
        self.velocity = Vector2D::default();
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Idle => {}
            Command::RotateRight => self.increase_rotation_angle(),
            Command::RotateLeft => self.decrease_rotation_angle(),
            Command::Thrust => self.thrust(),
            Command::Brake => self.brake(),
            Command::Stop => self.stop(),
        }
    }

    /// Inertial drift. Does nothing until the player has touched a control.
    pub fn advance(&mut self, arena: &Arena) {
        if !self.interaction {
            return;
        }
        self.position = arena.wrap(self.position.add(self.velocity));
    }

    /// Forward tip in arena coordinates, where lasers spawn.
    pub fn nose(&self) -> Vector2D {
        self.position.add(Vector2D::from(SHIP_NOSE).rotate_degrees(self.facing))
    }

    /// Back to the start pose after an explosion. `interaction` survives.
    pub fn respawn(&mut self, position: Vector2D) {
        self.position = position;
        self.velocity = Vector2D::default();
        self.facing = SHIP_START_FACING;
        self.moving_angle = SHIP_START_FACING;
    }
}

impl Entity for Ship {
    fn position(&self) -> Vector2D {
        self.position
    }

    fn is_on_screen(&self) -> bool {
        true
    }

    fn outline(&self) -> Vec<Vector2D> {
        place(&self.shape, self.position, self.facing)
    }
}

// --- Asteroids ---

/// What happens to an asteroid that drifts past the arena edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    #[default]
    Vanish,
    Wrap,
}

/// What an asteroid ran into this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Impact {
    Ship,
    Laser,
}

pub struct Asteroid {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub size: f64,
    pub on_screen: bool,
    shape: Vec<Vector2D>, // Template scaled by size, centred on position
}

impl Asteroid {
    pub fn new(position: Vector2D, velocity: Vector2D, size: f64) -> Self {
        let factor = size / ASTEROID_TEMPLATE_RADIUS;
        let shape = ASTEROID_OUTLINE
            .iter()
            .map(|&(dx, dy)| Vector2D::new(dx * factor, dy * factor))
            .collect();
        Asteroid { position, velocity, size, on_screen: true, shape }
    }

    /// Random spot in `[1, w-40) x [1, h-40)` with a small random drift. The spot is
    /// re-rolled while it lands within `ASTEROID_SPAWN_CLEARANCE` of `keep_clear`,
    /// up to `ASTEROID_SPAWN_ATTEMPTS` tries.
    pub fn spawn(arena: &Arena, rng: &mut impl Rng, size: f64, keep_clear: Vector2D) -> Self {
        let mut position = Self::random_position(arena, rng);
        for _ in 1..ASTEROID_SPAWN_ATTEMPTS {
            if position.sub(keep_clear).length() >= ASTEROID_SPAWN_CLEARANCE {
                break;
            }
            position = Self::random_position(arena, rng);
        }
        let velocity = Vector2D::new(
            rng.gen_range(-ASTEROID_MAX_DRIFT..=ASTEROID_MAX_DRIFT),
            rng.gen_range(-ASTEROID_MAX_DRIFT..=ASTEROID_MAX_DRIFT),
        );
        Asteroid::new(position, velocity, size)
    }

    fn random_position(arena: &Arena, rng: &mut impl Rng) -> Vector2D {
        let x = rng.gen_range(1.0..(arena.width - ASTEROID_SPAWN_MARGIN).max(1.0 + f64::EPSILON));
        let y = rng.gen_range(1.0..(arena.height - ASTEROID_SPAWN_MARGIN).max(1.0 + f64::EPSILON));
        Vector2D::new(x, y)
    }

    /// Drift, then test against the ship and every live laser.
    ///
    /// A laser hit marks that laser off-screen. Only the first overlapping laser
    /// counts, and a ship hit takes precedence over lasers in the same tick.
    /// Either way the asteroid itself ends up off-screen. `ship` is `None` while
    /// the ship cannot be hit; the asteroid then passes over it.
    pub fn advance(&mut self, arena: &Arena, edges: EdgePolicy, ship: Option<&Ship>, lasers: &mut [Laser]) -> Option<Impact> {
        if !self.on_screen {
            return None;
        }

        self.position = self.position.add(self.velocity);
        match edges {
            EdgePolicy::Wrap => self.position = arena.wrap(self.position),
            EdgePolicy::Vanish => {
                if !arena.contains(self.position) {
                    self.on_screen = false;
                    return None;
                }
            }
        }

        if ship.is_some_and(|ship| self.overlaps(ship)) {
            self.on_screen = false;
            return Some(Impact::Ship);
        }

        let outline = self.outline();
        let hit = lasers
            .iter_mut()
            .filter(|laser| laser.on_screen)
            .find(|laser| polygons_overlap(&outline, &laser.outline()));
        if let Some(laser) = hit {
            laser.on_screen = false;
            self.on_screen = false;
            return Some(Impact::Laser);
        }
        None
    }
}

impl Entity for Asteroid {
    fn position(&self) -> Vector2D {
        self.position
    }

    fn is_on_screen(&self) -> bool {
        self.on_screen
    }

    fn outline(&self) -> Vec<Vector2D> {
        place(&self.shape, self.position, 0.0)
    }
}

// --- Lasers ---

pub struct Laser {
    pub position: Vector2D,
    pub heading: f64, // Fixed at fire time
    pub on_screen: bool,
}

impl Laser {
    pub fn fire(origin: Vector2D, heading: f64) -> Self {
        Laser { position: origin, heading: wrap_degrees(heading), on_screen: true }
    }

    pub fn velocity(&self) -> Vector2D {
        Vector2D::from_degrees(self.heading).scale(LASER_SPEED)
    }

    pub fn advance(&mut self, arena: &Arena) {
        self.position = self.position.add(self.velocity());
        if !arena.contains(self.position) {
            self.on_screen = false;
        }
    }
}

impl Entity for Laser {
    fn position(&self) -> Vector2D {
        self.position
    }

    fn is_on_screen(&self) -> bool {
        self.on_screen
    }

    fn outline(&self) -> Vec<Vector2D> {
        let shape: Vec<Vector2D> = LASER_OUTLINE.iter().copied().map(Vector2D::from).collect();
        place(&shape, self.position, self.heading)
    }
}
