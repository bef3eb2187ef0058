use log::{debug, info};
use rand::Rng;

use crate::audio::SoundCue;
use crate::constants::*;
use crate::entities::{Asteroid, Command, EdgePolicy, Entity, Impact, Laser, Ship};
use crate::snapshot::{Frame, ShipView};
use crate::types::Arena;

/// Everything fixed for the lifetime of a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameConfig {
    pub arena: Arena,
    pub asteroid_count: usize,
    pub asteroid_size: f64,
    pub sound_on: bool,
    pub edges: EdgePolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            arena: Arena::new(ARENA_WIDTH, ARENA_HEIGHT),
            asteroid_count: DEFAULT_ASTEROID_COUNT,
            asteroid_size: ASTEROID_SIZE,
            sound_on: true,
            edges: EdgePolicy::Vanish,
        }
    }
}

/// Keys the core cares about while held. Firing is a separate one-shot event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Thrust,
    Brake,
    RotateRight,
    RotateLeft,
    Stop,
}

impl Key {
    pub fn command(self) -> Command {
        match self {
            Key::Thrust => Command::Thrust,
            Key::Brake => Command::Brake,
            Key::RotateRight => Command::RotateRight,
            Key::RotateLeft => Command::RotateLeft,
            Key::Stop => Command::Stop,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp,
    Fire,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Playing,
    GameOver,
    Cleared,
}

/// End-of-round tallies. Replaced wholesale on restart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub shots_fired: u32,
    pub asteroids_destroyed: u32,
    pub times_exploded: u32,
}

impl Tally {
    /// Percentage of shots that destroyed an asteroid, to two decimals. 0 when nothing was fired.
    pub fn accuracy(&self) -> f64 {
        if self.shots_fired == 0 {
            return 0.0;
        }
        // Hundredths of a percent; ties go to the even neighbour
        let hundredths = self.asteroids_destroyed as f64 * 10_000.0 / self.shots_fired as f64;
        hundredths.round_ties_even() / 100.0
    }

    pub fn report(&self) -> String {
        format!(
            "Times Exploded: {}  Asteroids Destroyed: {}  Shots Fired: {}  Accuracy: {}%",
            self.times_exploded,
            self.asteroids_destroyed,
            self.shots_fired,
            self.accuracy()
        )
    }
}

pub struct Session {
    config: GameConfig,
    ship: Ship,
    asteroids: Vec<Asteroid>, // Sized at start, never grows; dead rocks stay flagged off-screen
    lasers: Vec<Laser>,
    held: Option<Key>,
    score: u32,
    tally: Tally,
    lives: u32,
    status: Status,
    tick: u64,
    last_hit_tick: Option<u64>,
    pending_sounds: Vec<SoundCue>,
}

impl Session {
    pub fn start(config: GameConfig, rng: &mut impl Rng) -> Self {
        let asteroids = (0..config.asteroid_count)
            .map(|_| Asteroid::spawn(&config.arena, rng, config.asteroid_size, config.arena.center()))
            .collect();
        info!(
            "Starting session: {} asteroids in a {}x{} arena, sound {}",
            config.asteroid_count,
            config.arena.width,
            config.arena.height,
            if config.sound_on { "on" } else { "off" }
        );
        Session::with_asteroids(config, asteroids)
    }

    /// Start from a hand-placed asteroid field.
    pub fn with_asteroids(config: GameConfig, asteroids: Vec<Asteroid>) -> Self {
        Session {
            config,
            ship: Ship::new(config.arena.center()),
            asteroids,
            lasers: Vec::new(),
            held: None,
            score: 0,
            tally: Tally::default(),
            lives: STARTING_LIVES,
            status: Status::Playing,
            tick: 0,
            last_hit_tick: None,
            pending_sounds: Vec::new(),
        }
    }

    /// Fresh session with the same configuration; every counter starts from zero.
    pub fn restart(&mut self, rng: &mut impl Rng) {
        info!("Restarting session. Previous result: {}", self.tally.report());
        *self = Session::start(self.config, rng);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn ship_mut(&mut self) -> &mut Ship {
        &mut self.ship
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn lasers(&self) -> &[Laser] {
        &self.lasers
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// True for `RESPAWN_GRACE_TICKS` ticks after the ship was last hit.
    pub fn ship_shielded(&self) -> bool {
        self.last_hit_tick.is_some_and(|hit| self.tick - hit <= RESPAWN_GRACE_TICKS)
    }

    pub fn held_command(&self) -> Command {
        self.held.map(Key::command).unwrap_or(Command::Idle)
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.key_down(key),
            InputEvent::KeyUp => self.key_up(),
            InputEvent::Fire => self.fire(),
        }
    }

    /// Last key pressed wins. Stop is the one key that does not count as interaction.
    pub fn key_down(&mut self, key: Key) {
        if self.status != Status::Playing {
            return;
        }
        if key != Key::Stop {
            self.ship.interaction = true;
        }
        if key == Key::Thrust {
            self.cue(SoundCue::Thrust);
        }
        debug!("Key down: {:?}", key);
        self.held = Some(key);
    }

    pub fn key_up(&mut self) {
        self.held = None;
    }

    /// One laser from the ship's nose per call. Counted as a shot whether or not it ever hits.
    pub fn fire(&mut self) {
        if self.status != Status::Playing {
            return;
        }
        self.ship.interaction = true;
        self.cue(SoundCue::Laser);
        self.lasers.push(Laser::fire(self.ship.nose(), self.ship.facing()));
        self.tally.shots_fired += 1;
    }

    fn cue(&mut self, sound: SoundCue) {
        if self.config.sound_on {
            self.pending_sounds.push(sound);
        }
    }

    /// One fixed-step frame: asteroids and their collisions, held control, ship, lasers, round status.
    pub fn tick(&mut self) {
        if self.status != Status::Playing {
            return;
        }
        self.tick += 1;
        let arena = self.config.arena;
        let mut shielded = self.ship_shielded();

        for asteroid in self.asteroids.iter_mut() {
            let target = if shielded { None } else { Some(&self.ship) };
            match asteroid.advance(&arena, self.config.edges, target, &mut self.lasers) {
                Some(Impact::Laser) => {
                    self.score += POINTS_PER_ASTEROID;
                    self.tally.asteroids_destroyed += 1;
                    info!("Asteroid destroyed at tick {}. Score: {}", self.tick, self.score);
                }
                Some(Impact::Ship) => {
                    self.tally.times_exploded += 1;
                    self.lives = self.lives.saturating_sub(1);
                    self.ship.respawn(arena.center());
                    self.last_hit_tick = Some(self.tick);
                    shielded = true;
                    info!("Ship exploded at tick {}. Lives left: {}", self.tick, self.lives);
                    if self.lives == 0 {
                        break;
                    }
                }
                None => {}
            }
        }

        let command = self.held_command();
        self.ship.apply(command);
        self.ship.advance(&arena);

        for laser in self.lasers.iter_mut().filter(|laser| laser.on_screen) {
            laser.advance(&arena);
        }
        self.lasers.retain(|laser| laser.on_screen);

        self.update_status();
    }

    fn update_status(&mut self) {
        if self.lives == 0 {
            self.status = Status::GameOver;
        } else if !self.asteroids.is_empty() && self.asteroids.iter().all(|a| !a.on_screen) {
            self.status = Status::Cleared;
        }
        if self.status != Status::Playing {
            info!("Round over ({:?}). {}", self.status, self.tally.report());
        }
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    /// The tally line, only once the round has ended.
    pub fn results_text(&self) -> Option<String> {
        match self.status {
            Status::Playing => None,
            Status::GameOver | Status::Cleared => Some(self.tally.report()),
        }
    }

    /// Immutable copy of what the renderer needs. Drains queued sound cues.
    pub fn snapshot(&mut self) -> Frame {
        Frame {
            tick: self.tick,
            arena: self.config.arena,
            ship: ShipView {
                outline: self.ship.outline(),
                position: self.ship.position,
                facing: self.ship.facing(),
                nose: self.ship.nose(),
            },
            asteroids: self
                .asteroids
                .iter()
                .filter(|a| a.on_screen)
                .map(|a| a.outline())
                .collect(),
            lasers: self
                .lasers
                .iter()
                .filter(|l| l.on_screen)
                .map(|l| l.outline())
                .collect(),
            score: self.score,
            lives: self.lives,
            status: self.status,
            tally: self.tally,
            score_text: self.score_text(),
            results_text: self.results_text(),
            sounds: std::mem::take(&mut self.pending_sounds),
        }
    }
}
