pub mod audio;
pub mod config;
pub mod constants;
pub mod driver;
pub mod entities;
pub mod game;
pub mod geometry;
pub mod rendering;
pub mod snapshot;
pub mod terminal_io;
pub mod types;
