use std::io::{self, Write};
use log::debug;

/// Fire-and-forget sound notifications raised by player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Thrust,
    Laser,
}

/// Platform audio seam. The terminal build only has the bell to work with.
pub trait Audio {
    fn play(&mut self, cue: SoundCue) -> io::Result<()>;
}

pub struct Muted;

impl Audio for Muted {
    fn play(&mut self, cue: SoundCue) -> io::Result<()> {
        debug!("Muted sound cue: {:?}", cue);
        Ok(())
    }
}

/// Rings the terminal bell for laser shots. Thrust is too frequent to be worth a bell.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        TerminalBell { out }
    }
}

impl<W: Write> Audio for TerminalBell<W> {
    fn play(&mut self, cue: SoundCue) -> io::Result<()> {
        match cue {
            SoundCue::Laser => {
                self.out.write_all(b"\x07")?;
                self.out.flush()
            }
            SoundCue::Thrust => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bell_rings_only_for_lasers() {
        let mut bell = TerminalBell::new(Vec::new());
        bell.play(SoundCue::Thrust).unwrap();
        assert!(bell.out.is_empty());
        bell.play(SoundCue::Laser).unwrap();
        assert_eq!(bell.out, vec![0x07]);
    }
}
