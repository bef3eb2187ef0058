use crate::audio::SoundCue;
use crate::game::{Status, Tally};
use crate::types::{Arena, Vector2D};

#[derive(Clone, Debug, PartialEq)]
pub struct ShipView {
    pub outline: Vec<Vector2D>,
    pub position: Vector2D,
    pub facing: f64,
    pub nose: Vector2D,
}

/// One tick's worth of render data, handed from the simulation thread to the renderer.
/// All geometry is in arena coordinates; nothing is camera-relative.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub tick: u64,
    pub arena: Arena,
    pub ship: ShipView,
    pub asteroids: Vec<Vec<Vector2D>>,
    pub lasers: Vec<Vec<Vector2D>>,
    pub score: u32,
    pub lives: u32,
    pub status: Status,
    pub tally: Tally,
    pub score_text: String,
    pub results_text: Option<String>,
    pub sounds: Vec<SoundCue>,
}
