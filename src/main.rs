//! # Digit Clock Application Entry Point
//!
//! This binary drives the clock engine with a frame loop and shows the face in
//! the terminal. It supports an in-place terminal display (default) and a
//! plain development mode (`--stdout`) that appends one frame per change.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::{bail, Context};
use digit_clock_lib::{
    config::{Config, CONFIG_FILE},
    engine::Engine,
    face::{ClockFace, Face, FaceStyle},
    renderer::render_ascii,
    scene::SceneBackend,
    time_source::LocalClock,
};
use std::env;
use std::path::PathBuf;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// ANSI sequence: move the cursor home and clear the screen.
const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

const USAGE: &str =
    "usage: digit-clock [--style flip|needle] [--stdout] [--frames N] [--config PATH]";

/// Command line options.
#[derive(Debug, PartialEq)]
struct Options {
    style: FaceStyle,
    /// Development mode: append frames instead of redrawing in place
    stdout: bool,
    /// Stop after this many ticks
    frames: Option<u64>,
    config: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            style: FaceStyle::default(),
            stdout: false,
            frames: None,
            config: PathBuf::from(CONFIG_FILE),
        }
    }
}

impl Options {
    /// Parse flags, without the program name.
    fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut options = Options::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--stdout" => options.stdout = true,
                "--style" => {
                    let value = args.next().context("--style needs a value")?;
                    options.style = value.parse()?;
                }
                "--frames" => {
                    let value = args.next().context("--frames needs a value")?;
                    options.frames = Some(
                        value
                            .parse()
                            .with_context(|| format!("invalid frame count {value:?}"))?,
                    );
                }
                "--config" => {
                    options.config = args.next().context("--config needs a path")?.into();
                }
                other => bail!("unknown argument {other:?}\n{USAGE}"),
            }
        }
        Ok(options)
    }
}

/// Initialize logging to stderr so stdout only carries the clock face.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print the current face, either appended or redrawn in place.
fn present(scene: &SceneBackend, face: &Face, append: bool) {
    let frame = render_ascii(scene, face.page());
    if append {
        println!("{frame}\n");
    } else {
        println!("{CLEAR_SCREEN}{frame}");
    }
}

/// Run the frame loop until Ctrl-C or the frame limit.
async fn run(options: Options, config: Config) -> anyhow::Result<()> {
    let mut scene = SceneBackend::new();
    let face = Face::build(options.style, &config, &mut scene);
    let mut engine = Engine::new(LocalClock, face);

    let mut interval = tokio::time::interval(config.frame.interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();

    engine.start(&mut scene);
    present(&scene, engine.face(), options.stdout);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result.context("listening for Ctrl-C")?;
                info!("interrupted, stopping clock");
                break;
            }
            now = interval.tick() => {
                let mut redraw = false;
                for animation in scene.advance(now - last_frame) {
                    redraw |= engine.animation_finished(animation, &mut scene);
                }
                last_frame = now;

                if scene.take_frame_request() {
                    redraw |= !engine.tick(&mut scene).is_empty();
                }
                if redraw {
                    present(&scene, engine.face(), options.stdout);
                }
                if options.frames.is_some_and(|limit| engine.ticks() >= limit) {
                    debug!(ticks = engine.ticks(), "frame limit reached");
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    init_tracing();

    let options = match Options::parse(env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    let config = Config::load_from_path(&options.config);
    info!(style = ?options.style, fps = config.frame.frames_per_second, "starting digit clock");

    // Single-threaded runtime: every engine mutation happens on this thread
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(run(options, config))
}
