use std::collections::HashMap;
use std::env;
use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event},
    terminal::{disable_raw_mode, enable_raw_mode, size},
};
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Write;

mod audio;
mod collision;
mod constants;
mod entities;
mod game;
mod rendering;
mod shapes;
mod terminal_io;
mod types;

use audio::LogAudio;
use constants::{FRAME_MS, WORLD_HEIGHT, WORLD_WIDTH};
use game::World;
use rendering::{GameGrid, OutputTarget, ScreenBuffer, TerminalRenderer};
use terminal_io::{Key, KeyboardInput, ScriptedInput};
use types::Point;

fn main() -> io::Result<()> {
    simple_logging::log_to_file("retroids.log", log::LevelFilter::Info)
        .map_err(|e| { error!("Failed to open log file: {}", e); e })?;
    info!("Starting retroids.");

    let args: Vec<String> = env::args().collect();
    let debug_mode_active = args.len() > 1 && args[1] == "--debug";

    if debug_mode_active {
        run_headless(&args)
    } else {
        run_interactive()
    }
}

/// Headless run for debugging: scripted input, synthetic clock, frames dumped
/// to the log. `--debug [width] [height] [max_frames]`.
fn run_headless(args: &[String]) -> io::Result<()> {
    info!("Debug mode enabled.");
    let mut cols: u16 = 80;
    let mut rows: u16 = 24;
    if args.len() >= 4 {
        cols = args[2].parse::<u16>().unwrap_or(80);
        rows = args[3].parse::<u16>().unwrap_or(24);
    }
    let max_frames: u64 = args
        .get(4)
        .and_then(|a| a.parse::<u64>().ok())
        .unwrap_or(300);
    info!("Debug resolution {}x{}, {} frames", cols, rows, max_frames);

    let world_size = Point::new(WORLD_WIDTH, WORLD_HEIGHT);
    let renderer = TerminalRenderer::new(
        cols,
        rows,
        world_size,
        OutputTarget::ScreenBuffer(ScreenBuffer::new(cols, rows)),
    );

    let mut script = HashMap::new();
    for frame in 5..25 {
        script.insert(frame, vec![Key::Thrust]);
    }
    for frame in 25..40 {
        script.insert(frame, vec![Key::Left, Key::Fire]);
    }
    for frame in 60..80 {
        script.insert(frame, vec![Key::Fire]);
    }
    let mut input = ScriptedInput::new(script);

    let mut world = World::new(
        world_size,
        true,
        Box::new(renderer),
        Box::new(LogAudio),
        StdRng::from_entropy(),
    );
    world.spawn_initial_scene();

    for frame in 0..max_frames {
        input.advance(frame);
        world.tick(frame * FRAME_MS, &input)?;
    }

    info!("Headless run finished after {} frames.", max_frames);
    Ok(())
}

fn run_interactive() -> io::Result<()> {
    info!("Attempting to enable raw mode.");
    enable_raw_mode().map_err(|e| { error!("Failed to enable raw mode: {}", e); e })?;
    let (cols, rows) = size().map_err(|e| { error!("Failed to get terminal size: {}", e); e })?;
    info!("Terminal size: {}x{}", cols, rows);

    let result = play(cols, rows);

    // Teardown runs even when the game loop errored.
    let mut stdout = OutputTarget::Stdout(io::stdout());
    stdout
        .execute_other_command(Show)
        .map_err(|e| { error!("Failed to show cursor on exit: {}", e); e })?;
    disable_raw_mode().map_err(|e| { error!("Failed to disable raw mode on exit: {}", e); e })?;
    info!("Exiting.");
    result
}

fn play(cols: u16, rows: u16) -> io::Result<()> {
    let mut stdout = OutputTarget::Stdout(io::stdout());
    stdout.execute_other_command(Hide)?;
    show_title_screen(&mut stdout, cols, rows)?;

    let world_size = Point::new(WORLD_WIDTH, WORLD_HEIGHT);
    let renderer = TerminalRenderer::new(cols, rows, world_size, OutputTarget::Stdout(io::stdout()));
    let mut world = World::new(
        world_size,
        false,
        Box::new(renderer),
        Box::new(LogAudio),
        StdRng::from_entropy(),
    );
    world.spawn_initial_scene();

    let start = Instant::now();
    let mut input = KeyboardInput::new();
    info!("Starting game loop.");
    while !input.quit_requested() {
        // The poll budget doubles as the frame pacing sleep.
        input.pump(Duration::from_millis(FRAME_MS))?;
        let now_ms = start.elapsed().as_millis() as u64;
        world.tick(now_ms, &input)?;
    }
    info!("Quit requested. Leaving game loop.");
    Ok(())
}

fn show_title_screen(stdout: &mut OutputTarget, cols: u16, rows: u16) -> io::Result<()> {
    let grid = GameGrid::new(cols, rows);
    grid.clear_screen_manual(stdout, cols, rows)
        .map_err(|e| { error!("Failed to clear screen: {}", e); e })?;

    let title_art = [
        r" ____  _____ _____ ____   ___ ___ ____  ____",
        r"|  _ \| ____|_   _|  _ \ / _ \_ _|  _ \/ ___|",
        r"| |_) |  _|   | | | |_) | | | | || | | \___ \",
        r"|  _ <| |___  | | |  _ <| |_| | || |_| |___) |",
        r"|_| \_\_____| |_| |_| \_\\___/___|____/|____/",
    ];
    let title_start_y = (rows / 2).saturating_sub(title_art.len() as u16 / 2);
    for (i, line) in title_art.iter().enumerate() {
        let x = (cols / 2).saturating_sub(line.len() as u16 / 2);
        stdout.execute_move_to(MoveTo(x, title_start_y + i as u16))?;
        write!(stdout, "{}", line)?;
    }

    let controls = "arrows/wasd steer, space fires, q quits";
    let start_msg = "Press any key to start...";
    for (dy, msg) in [(3, controls), (5, start_msg)] {
        let x = (cols / 2).saturating_sub(msg.len() as u16 / 2);
        stdout.execute_move_to(MoveTo(x, title_start_y + title_art.len() as u16 + dy))?;
        write!(stdout, "{}", msg)?;
    }
    stdout.flush()?;
    info!("Title screen displayed. Waiting for key press.");

    // Block until any key arrives, then hand the screen to the game.
    loop {
        if let Event::Key(_) = event::read().map_err(|e| { error!("Failed to read event: {}", e); e })? {
            break;
        }
    }
    grid.clear_screen_manual(stdout, cols, rows)?;
    stdout.flush()?;
    info!("Title screen cleared. Starting game.");
    Ok(())
}
