use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, size, supports_keyboard_enhancement, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use rand::{SeedableRng, rngs::StdRng};

use asteroid_arena::audio::{Audio, Muted, TerminalBell};
use asteroid_arena::config::Cli;
use asteroid_arena::constants::TICK_MILLIS;
use asteroid_arena::driver::{self, DriverMsg, DriverOptions};
use asteroid_arena::game::{Session, Tally};
use asteroid_arena::rendering::{OutputTarget, Renderer, ScreenBuffer};
use asteroid_arena::snapshot::Frame;
use asteroid_arena::terminal_io::{ChannelInput, SimulatedInput, translate};

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    simple_logging::log_to_file(&cli.log_file, cli.log_level.into())?;
    info!("Starting asteroid-arena.");

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let tally = if cli.debug {
        run_headless(&cli, rng)?
    } else {
        run_terminal(&cli, rng)?
    };

    if let Some(tally) = tally {
        println!("{}", tally.report());
        info!("Final result: {}", tally.report());
    }
    Ok(())
}

fn run_headless(cli: &Cli, mut rng: StdRng) -> io::Result<Option<Tally>> {
    info!("Debug mode enabled. Resolution set to {}x{}", cli.width, cli.height);
    let mut renderer = Renderer::new(
        OutputTarget::ScreenBuffer(ScreenBuffer::new(cli.width, cli.height)),
        cli.width,
        cli.height,
    );
    let mut audio = Muted;

    let session = Session::start(cli.game_config(), &mut rng);
    let options = DriverOptions { period: Duration::from_millis(TICK_MILLIS), max_ticks: cli.max_frames() };
    let (frame_tx, frame_rx) = mpsc::channel::<Frame>();
    let sim = thread::spawn(move || {
        let mut input = SimulatedInput::demo_script();
        driver::run(session, &mut rng, &mut input, &frame_tx, &options)
    });

    let mut outcome = Ok(());
    for frame in frame_rx.iter() {
        if let Err(e) = renderer.draw(&frame) {
            error!("Failed to draw frame {}: {}", frame.tick, e);
            outcome = Err(e);
            break;
        }
        if let OutputTarget::ScreenBuffer(sb) = &renderer.target {
            sb.print_to_log();
        }
        for cue in &frame.sounds {
            audio.play(*cue)?;
        }
    }
    drop(frame_rx);

    let session = sim.join().map_err(|_| io::Error::other("simulation thread panicked"))?;
    outcome.map(|_| Some(session.tally()))
}

fn run_terminal(cli: &Cli, rng: StdRng) -> io::Result<Option<Tally>> {
    info!("Attempting to enable raw mode.");
    enable_raw_mode().map_err(|e| { error!("Failed to enable raw mode: {}", e); e })?;
    let mut stdout = io::stdout();

    let release_events = supports_keyboard_enhancement().unwrap_or(false)
        && execute!(stdout, PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)).is_ok();
    info!("Key release events {}", if release_events { "available" } else { "unavailable; held keys expire" });

    let result = execute!(stdout, EnterAlternateScreen, Hide)
        .map_err(|e| { error!("Failed to prepare the screen: {}", e); e })
        .and_then(|_| play(cli, rng, release_events));

    // Always restore the terminal
    if release_events {
        let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    }
    let _ = execute!(stdout, Show, LeaveAlternateScreen);
    let _ = disable_raw_mode();
    let _ = stdout.flush();
    result
}

fn play(cli: &Cli, mut rng: StdRng, release_events: bool) -> io::Result<Option<Tally>> {
    let (width, height) = size().map_err(|e| { error!("Failed to get terminal size: {}", e); e })?;
    info!("Terminal size: {}x{}", width, height);
    let mut renderer = Renderer::new(OutputTarget::Stdout(io::stdout()), width, height);

    // Blocking reads live on their own thread so the clock never waits on I/O
    let (event_tx, event_rx) = mpsc::channel::<Event>();
    let (resize_tx, resize_rx) = mpsc::channel::<(u16, u16)>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(Event::Resize(w, h)) => {
                if resize_tx.send((w, h)).is_err() {
                    break;
                }
            }
            Ok(ev) => {
                if event_tx.send(ev).is_err() {
                    break; // receiver dropped -> program exiting
                }
            }
            Err(e) => {
                error!("Failed to read event: {}", e);
                break;
            }
        }
    });

    renderer.show_title_screen()?;
    loop {
        match event_rx.recv() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if translate(&Event::Key(key)) == Some(DriverMsg::Quit) {
                    return Ok(None);
                }
                break;
            }
            Ok(_) => continue,
            Err(_) => return Ok(None),
        }
    }

    let session = Session::start(cli.game_config(), &mut rng);
    let options = DriverOptions { period: Duration::from_millis(TICK_MILLIS), max_ticks: cli.max_frames() };
    let (frame_tx, frame_rx) = mpsc::channel::<Frame>();
    let sim = thread::spawn(move || {
        let mut input = ChannelInput::new(event_rx, release_events);
        driver::run(session, &mut rng, &mut input, &frame_tx, &options)
    });

    let mut audio: Box<dyn Audio> = if cli.mute {
        Box::new(Muted)
    } else {
        Box::new(TerminalBell::new(io::stdout()))
    };
    let outcome = render_loop(&mut renderer, &frame_rx, &resize_rx, audio.as_mut());
    drop(frame_rx);

    let session = sim.join().map_err(|_| io::Error::other("simulation thread panicked"))?;
    outcome.map(|_| Some(session.tally()))
}

/// Draws the newest frame available, playing the sound cues of every frame received.
fn render_loop(
    renderer: &mut Renderer,
    frames: &Receiver<Frame>,
    resizes: &Receiver<(u16, u16)>,
    audio: &mut dyn Audio,
) -> io::Result<()> {
    while let Ok(mut frame) = frames.recv() {
        let mut sounds = std::mem::take(&mut frame.sounds);
        while let Ok(mut newer) = frames.try_recv() {
            sounds.append(&mut newer.sounds);
            frame = newer;
        }

        if let Some((width, height)) = resizes.try_iter().last() {
            info!("Terminal resized to {}x{}", width, height);
            renderer.resize(width, height);
            renderer.clear_screen()?;
        }

        renderer.draw(&frame).map_err(|e| { error!("Failed to draw frame {}: {}", frame.tick, e); e })?;
        for cue in sounds {
            audio.play(cue)?;
        }
    }
    Ok(())
}
