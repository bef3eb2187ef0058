//! The simulation thread: owns the session, applies input, ticks on a fixed
//! schedule and hands every frame to the renderer.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

use log::info;
use rand::Rng;

use crate::game::{InputEvent, Session, Status};
use crate::snapshot::Frame;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverMsg {
    Input(InputEvent),
    Restart,
    Quit,
}

/// Where the driver gets its messages from, polled once per tick.
pub trait InputSource {
    fn poll(&mut self, tick: u64) -> Vec<DriverMsg>;
}

pub struct DriverOptions {
    pub period: Duration,
    pub max_ticks: Option<u64>,
}

/// Runs until `Quit`, until the frame receiver hangs up, or until `max_ticks`.
///
/// Tick `n` is due at `start + n * period`, so a slow tick is caught up rather
/// than pushing every later tick back. Elapsed time never scales the simulation.
pub fn run<I: InputSource, R: Rng>(
    mut session: Session,
    rng: &mut R,
    input: &mut I,
    frames: &Sender<Frame>,
    options: &DriverOptions,
) -> Session {
    let start = Instant::now();
    let mut ticks_run: u64 = 0;

    'clock: loop {
        for msg in input.poll(ticks_run) {
            match msg {
                DriverMsg::Input(event) => session.handle(event),
                DriverMsg::Restart => {
                    if session.status() != Status::Playing {
                        session.restart(rng);
                    }
                }
                DriverMsg::Quit => {
                    info!("Quit requested after {} ticks.", ticks_run);
                    break 'clock;
                }
            }
        }

        session.tick();
        ticks_run += 1;

        if frames.send(session.snapshot()).is_err() {
            info!("Renderer hung up; stopping the clock.");
            break;
        }
        if options.max_ticks.is_some_and(|max| ticks_run >= max) {
            info!("Reached the frame limit of {} ticks.", ticks_run);
            break;
        }

        let due = start + options.period.saturating_mul(u32::try_from(ticks_run).unwrap_or(u32::MAX));
        let now = Instant::now();
        if due > now {
            thread::sleep(due - now);
        }
    }

    session
}
