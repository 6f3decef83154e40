//! Runtimer CLI: speedrun timer math and overlay rendering from the shell.
//!
//! Usage:
//!   runtimer format <SECONDS>       Format a duration in one or all layouts
//!   runtimer elapsed [OPTIONS]      Compute RTA/LRT at a frame
//!   runtimer overlay [OPTIONS]      Render the timer overlay to PNG
//!   runtimer preview <DIR>          Preview a frame of an image sequence
//!   runtimer config                 Show or initialize the configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use runtimer_common::config::AppConfig;
use runtimer_run_model::style::TimeFormat;

mod commands;

use commands::{StyleArgs, TimingArgs};

#[derive(Parser)]
#[command(
    name = "runtimer",
    about = "Speedrun timer overlay: RTA and load-removed time on video frames",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format a duration in seconds
    Format {
        /// Duration in seconds (negative values display as zero)
        #[arg(allow_negative_numbers = true)]
        seconds: f64,

        /// Layout key (HHMMSSmmm, HHMMSS, MMSSmmm, MMSS, MMSScc, MMSScc_pad, SSmmm).
        /// All layouts are printed when omitted.
        #[arg(short, long)]
        format: Option<TimeFormat>,
    },

    /// Compute RTA and LRT at one frame
    Elapsed {
        #[command(flatten)]
        timing: TimingArgs,

        /// Frame to evaluate
        #[arg(long, conflicts_with = "at")]
        frame: Option<u64>,

        /// Presentation time in seconds to evaluate (nearest frame)
        #[arg(long)]
        at: Option<f64>,

        /// Display layout
        #[arg(short, long)]
        format: Option<TimeFormat>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Render the timer overlay for one frame, or for a whole export
    Overlay {
        #[command(flatten)]
        timing: TimingArgs,

        #[command(flatten)]
        style: StyleArgs,

        /// Overlay width in pixels
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Overlay height in pixels
        #[arg(long, default_value = "1080")]
        height: u32,

        /// Frame to render
        #[arg(long, conflicts_with = "at")]
        frame: Option<u64>,

        /// Presentation time in seconds to render
        #[arg(long)]
        at: Option<f64>,

        /// Image to draw the timer onto (its size overrides width/height)
        #[arg(long)]
        background: Option<PathBuf>,

        /// Output PNG path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render one transparent PNG per output frame into this directory
        #[arg(long, conflicts_with_all = ["frame", "at", "background", "output"])]
        sequence: Option<PathBuf>,

        /// Output frame rate for --sequence (defaults to the video frame rate)
        #[arg(long, requires = "sequence")]
        out_fps: Option<f64>,
    },

    /// Decode one frame of an image sequence and composite the timer
    Preview {
        /// Directory of frames (png, jpg, bmp), sorted by name
        frames: PathBuf,

        /// Playback frame rate of the sequence
        #[arg(long, default_value = "30")]
        fps: f64,

        /// Frame to preview
        #[arg(long, default_value = "0")]
        frame: u64,

        /// Run start frame
        #[arg(long)]
        start: Option<u64>,

        /// Run end frame
        #[arg(long)]
        end: Option<u64>,

        /// Load segment as START-END frames (repeatable)
        #[arg(long = "load", value_parser = commands::parse_segment)]
        loads: Vec<runtimer_run_model::segment::LoadSegment>,

        #[command(flatten)]
        style: StyleArgs,

        /// Output PNG path
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,
    },

    /// Show the configuration file and its effective contents
    Config {
        /// Write the default configuration if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    runtimer_common::logging::init_logging(&logging);
    tracing::debug!(
        config = %runtimer_common::config::config_file_path().display(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Format { seconds, format } => commands::format::run(seconds, format),
        Commands::Elapsed {
            timing,
            frame,
            at,
            format,
            json,
        } => commands::elapsed::run(&config, timing, frame, at, format, json),
        Commands::Overlay {
            timing,
            style,
            width,
            height,
            frame,
            at,
            background,
            output,
            sequence,
            out_fps,
        } => {
            let style = style.build(&config.overlay)?;
            match sequence {
                Some(dir) => {
                    commands::overlay::run_sequence(timing, style, width, height, dir, out_fps)
                }
                None => commands::overlay::run(
                    timing, style, width, height, frame, at, background, output,
                ),
            }
        }
        Commands::Preview {
            frames,
            fps,
            frame,
            start,
            end,
            loads,
            style,
            output,
        } => {
            let style = style.build(&config.overlay)?;
            commands::preview::run(frames, fps, frame, start, end, loads, style, output).await
        }
        Commands::Config { init } => commands::config::run(&config, init),
    }
}
