use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Duration;

use asteroid_arena::constants::ASTEROID_SIZE;
use asteroid_arena::driver::{self, DriverMsg, DriverOptions};
use asteroid_arena::entities::Asteroid;
use asteroid_arena::game::{GameConfig, InputEvent, Key, Session, Status};
use asteroid_arena::rendering::{OutputTarget, Renderer, ScreenBuffer};
use asteroid_arena::snapshot::Frame;
use asteroid_arena::types::Vector2D;
use asteroid_arena::terminal_io::SimulatedInput;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn options(max_ticks: u64) -> DriverOptions {
    DriverOptions { period: Duration::ZERO, max_ticks: Some(max_ticks) }
}

fn empty_session(rng: &mut StdRng) -> Session {
    Session::start(GameConfig { asteroid_count: 0, ..GameConfig::default() }, rng)
}

#[test]
fn emits_one_frame_per_tick() {
    let mut rng = StdRng::seed_from_u64(1);
    let session = empty_session(&mut rng);
    let (tx, rx) = mpsc::channel::<Frame>();
    let mut input = SimulatedInput::new(HashMap::new());

    let session = driver::run(session, &mut rng, &mut input, &tx, &options(5));
    drop(tx);

    let ticks: Vec<u64> = rx.iter().map(|frame| frame.tick).collect();
    assert_eq!(ticks, vec![1, 2, 3, 4, 5]);
    assert_eq!(session.tick_count(), 5);
}

#[test]
fn scripted_input_reaches_the_session() {
    let mut rng = StdRng::seed_from_u64(1);
    let session = empty_session(&mut rng);
    let (tx, rx) = mpsc::channel::<Frame>();
    let mut events = HashMap::new();
    events.insert(0, vec![DriverMsg::Input(InputEvent::Fire), DriverMsg::Input(InputEvent::Fire)]);
    events.insert(2, vec![DriverMsg::Input(InputEvent::KeyDown(Key::RotateRight))]);
    let mut input = SimulatedInput::new(events);

    let session = driver::run(session, &mut rng, &mut input, &tx, &options(4));
    drop(tx);

    assert_eq!(session.tally().shots_fired, 2);
    assert!((session.ship().facing() - 280.0).abs() < 1e-9);
    assert_eq!(rx.iter().count(), 4);
}

#[test]
fn quit_stops_before_the_next_tick() {
    let mut rng = StdRng::seed_from_u64(1);
    let session = empty_session(&mut rng);
    let (tx, rx) = mpsc::channel::<Frame>();
    let mut events = HashMap::new();
    events.insert(3, vec![DriverMsg::Quit]);
    let mut input = SimulatedInput::new(events);

    let session = driver::run(session, &mut rng, &mut input, &tx, &options(100));
    drop(tx);

    assert_eq!(session.tick_count(), 3);
    assert_eq!(rx.iter().count(), 3);
}

#[test]
fn stops_when_the_renderer_hangs_up() {
    let mut rng = StdRng::seed_from_u64(1);
    let session = empty_session(&mut rng);
    let (tx, rx) = mpsc::channel::<Frame>();
    drop(rx);
    let mut input = SimulatedInput::new(HashMap::new());

    let session = driver::run(session, &mut rng, &mut input, &tx, &options(100));
    assert_eq!(session.tick_count(), 1);
}

#[test]
fn restart_is_ignored_mid_round() {
    let mut rng = StdRng::seed_from_u64(1);
    let session = empty_session(&mut rng);
    let (tx, _rx) = mpsc::channel::<Frame>();
    let mut events = HashMap::new();
    events.insert(0, vec![DriverMsg::Input(InputEvent::Fire)]);
    events.insert(2, vec![DriverMsg::Restart]);
    let mut input = SimulatedInput::new(events);

    let session = driver::run(session, &mut rng, &mut input, &tx, &options(4));
    assert_eq!(session.status(), Status::Playing);
    assert_eq!(session.tally().shots_fired, 1);
    assert_eq!(session.tick_count(), 4);
}

#[test]
fn headless_render_shows_score_and_ship() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut session = Session::start(GameConfig { asteroid_count: 4, ..GameConfig::default() }, &mut rng);
    session.tick();
    let frame = session.snapshot();

    let mut renderer = Renderer::new(OutputTarget::ScreenBuffer(ScreenBuffer::new(80, 24)), 80, 24);
    renderer.draw(&frame).unwrap();

    let OutputTarget::ScreenBuffer(sb) = &renderer.target else {
        panic!("expected a screen buffer");
    };
    assert!(sb.row(0).starts_with("Score: 0  Lives: 3"));
    let screen: String = (0..24).map(|y| sb.row(y)).collect();
    assert!(screen.contains('^'));
    assert!(screen.contains('+'));
    assert!(screen.contains('@'));
}

#[test]
fn drifted_away_field_is_not_announced_as_cleared() {
    let drifter = Asteroid::new(Vector2D::new(899.0, 100.0), Vector2D::new(1.5, 0.0), ASTEROID_SIZE);
    let mut session = Session::with_asteroids(GameConfig { asteroid_count: 1, ..GameConfig::default() }, vec![drifter]);
    session.tick();
    assert_eq!(session.status(), Status::Cleared);
    let frame = session.snapshot();

    let mut renderer = Renderer::new(OutputTarget::ScreenBuffer(ScreenBuffer::new(80, 24)), 80, 24);
    renderer.draw(&frame).unwrap();

    let OutputTarget::ScreenBuffer(sb) = &renderer.target else {
        panic!("expected a screen buffer");
    };
    let screen: String = (0..24).map(|y| sb.row(y)).collect();
    assert!(screen.contains("FIELD EMPTY"));
    assert!(!screen.contains("ARENA CLEARED"));
}
