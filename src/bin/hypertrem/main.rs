//! hypertrem - harmonic tremolo host
//!
//! Run with: cargo run -- play
//!       or: cargo run -- render --output out.wav --source sweep

mod app;
mod render;
mod source;
mod ui;

use std::{fs::File, path::PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use env_logger::{Env, Target};
use hyper_tremolo::params::Preset;

use render::RenderArgs;
use source::SourceSpec;

#[derive(Parser, Debug)]
#[command(name = "hypertrem", version, about = "Two-band harmonic tremolo")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a source through the effect with a live terminal UI
    Play {
        /// JSON preset to start from
        #[arg(long)]
        preset: Option<PathBuf>,
        /// sweep, noise, sine:<hz> or a path to a WAV file
        #[arg(long, default_value = "sweep")]
        source: SourceSpec,
        /// Write log output here instead of discarding it
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Process a source offline into a 32-bit float WAV file
    Render(RenderArgs),
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            preset,
            source,
            log_file,
        } => {
            init_file_logging(log_file.as_ref())?;
            let params = load_params(preset.as_ref())?;
            app::run(params, source)
        }
        Command::Render(args) => {
            env_logger::Builder::from_env(Env::default().default_filter_or("info"))
                .target(Target::Stderr)
                .init();
            let params = load_params(args.preset.as_ref())?;
            render::run(&args, params)
        }
    }
}

/// The TUI owns the terminal, so live logging only goes to a file.
fn init_file_logging(path: Option<&PathBuf>) -> EyreResult<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("debug"));

    match path {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }

    builder.init();
    Ok(())
}

fn load_params(path: Option<&PathBuf>) -> EyreResult<hyper_tremolo::Parameters> {
    match path {
        Some(path) => {
            let preset = Preset::load(path)
                .wrap_err_with(|| format!("failed to load preset {}", path.display()))?;
            Ok(preset.params)
        }
        None => Ok(hyper_tremolo::Parameters::default()),
    }
}
