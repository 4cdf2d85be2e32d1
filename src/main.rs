//! Terminal blockfall runner (default binary).
//!
//! Physics runs at a fixed 60 Hz step driven by an accumulator; every loop
//! iteration renders one frame through the framebuffer renderer.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use crossterm::event::{self, Event};
use log::info;

use blockfall::core::rng::clock_seed;
use blockfall::core::{Game, GameSnapshot};
use blockfall::input::{should_quit, KeyTracker};
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use blockfall::types::PHYSICS_STEP;

const FRAME: Duration = Duration::from_millis(16);

// After a long stall (suspend, debugger) the backlog is dropped instead of replayed.
const MAX_STEPS_PER_FRAME: u32 = 8;

const USAGE: &str = "\
Usage: blockfall [OPTIONS]

Options:
  --seed <N>         Seed the piece sequence (default: wall clock)
  --log-file <PATH>  Write logs to PATH; RUST_LOG selects levels (default: debug)
  -h, --help         Print this help
";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    seed: Option<u32>,
    log_file: Option<PathBuf>,
}

/// Parse command-line arguments; `None` means help was requested
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Args>> {
    let mut parsed = Args::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--seed" => {
                let value = args.next().ok_or_else(|| anyhow!("--seed needs a value"))?;
                let seed = value
                    .parse()
                    .with_context(|| format!("invalid seed {value:?}"))?;
                parsed.seed = Some(seed);
            }
            "--log-file" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("--log-file needs a path"))?;
                parsed.log_file = Some(PathBuf::from(value));
            }
            other => bail!("unknown argument {other:?}\n\n{USAGE}"),
        }
    }

    Ok(Some(parsed))
}

/// Route `log` output to a file so it does not tear the terminal UI.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let Some(args) = parse_args(std::env::args().skip(1))? else {
        print!("{USAGE}");
        return Ok(());
    };

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let seed = args.seed.unwrap_or_else(clock_seed);
    info!("starting with seed {seed}");

    let mut term = TerminalRenderer::new();
    let result = term.enter().and_then(|()| run(&mut term, seed));

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, seed: u32) -> Result<()> {
    let mut game = Game::with_seed(seed);
    let view = GameView::default();
    let mut tracker = KeyTracker::new().with_release_events(term.release_events());
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut sim_time = 0.0_f64;
    let mut accumulator = 0.0_f64;
    let mut last_frame = Instant::now();

    loop {
        // Input with timeout until the next frame.
        let timeout = FRAME.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            loop {
                match event::read()? {
                    Event::Key(key) => {
                        if should_quit(key) {
                            info!("quit at score {}", game.board().score());
                            return Ok(());
                        }
                        tracker.handle_key(key, Instant::now());
                    }
                    Event::Resize(..) => term.invalidate(),
                    _ => {}
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        let now = Instant::now();
        accumulator += now.duration_since(last_frame).as_secs_f64();
        last_frame = now;
        tracker.expire(now);

        for command in tracker.take_commands() {
            game.apply(command);
        }

        let mut steps = 0;
        while accumulator >= PHYSICS_STEP {
            if steps == MAX_STEPS_PER_FRAME {
                accumulator = 0.0;
                break;
            }
            sim_time += PHYSICS_STEP;
            game.tick(&tracker, sim_time, PHYSICS_STEP);
            accumulator -= PHYSICS_STEP;
            steps += 1;
        }

        // Render.
        game.snapshot_into(&mut snap);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;
    }
}
