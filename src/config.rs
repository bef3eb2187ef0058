use clap::{Parser, ValueEnum};

use crate::constants::*;
use crate::entities::EdgePolicy;
use crate::game::GameConfig;
use crate::types::Arena;

#[derive(Parser, Debug)]
#[command(name = "asteroid-arena")]
#[command(about = "Terminal Asteroids: rotate, thrust and shoot drifting rocks")]
pub struct Cli {
    /// Number of asteroids placed at the start of each session
    #[arg(long, default_value_t = DEFAULT_ASTEROID_COUNT)]
    pub asteroids: usize,

    /// Disable sound cues (the terminal bell)
    #[arg(long)]
    pub mute: bool,

    /// Asteroids wrap around the arena edges instead of drifting away
    #[arg(long)]
    pub wrap_asteroids: bool,

    /// Arena width in world units
    #[arg(long, default_value_t = ARENA_WIDTH, value_parser = parse_extent)]
    pub arena_width: f64,

    /// Arena height in world units
    #[arg(long, default_value_t = ARENA_HEIGHT, value_parser = parse_extent)]
    pub arena_height: f64,

    /// Seed for asteroid placement; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Headless run: scripted input, frames written to the log instead of the terminal
    #[arg(long)]
    pub debug: bool,

    /// Screen width used in debug mode
    #[arg(long, default_value_t = 80)]
    pub width: u16,

    /// Screen height used in debug mode
    #[arg(long, default_value_t = 24)]
    pub height: u16,

    /// Stop after this many ticks
    #[arg(long)]
    pub frames: Option<u64>,

    /// Log file path
    #[arg(long, default_value = "asteroid-arena.log")]
    pub log_file: String,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

fn parse_extent(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if value.is_finite() && value >= MIN_ARENA_EXTENT {
        Ok(value)
    } else {
        Err(format!("must be a finite size of at least {MIN_ARENA_EXTENT}"))
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Cli {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            arena: Arena::new(self.arena_width, self.arena_height),
            asteroid_count: self.asteroids,
            asteroid_size: ASTEROID_SIZE,
            sound_on: !self.mute,
            edges: if self.wrap_asteroids { EdgePolicy::Wrap } else { EdgePolicy::Vanish },
        }
    }

    /// Debug runs are bounded even when no frame limit is given.
    pub fn max_frames(&self) -> Option<u64> {
        match (self.debug, self.frames) {
            (_, Some(frames)) => Some(frames),
            (true, None) => Some(40),
            (false, None) => None,
        }
    }
}
