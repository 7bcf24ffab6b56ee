mod viewer;

use cathode_core::diagnostics::{format_config_error, format_runtime_error};
use cathode_core::{parse_config, run_frames, FrameContext, ScopeConfig};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cathode")]
#[command(about = "Cathode - a deflection tube beam simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tube headless for a fixed number of frames
    Run {
        /// JSON config file (defaults are used when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of visual frames to simulate
        #[arg(short, long, default_value_t = 600)]
        frames: u64,
        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f64,
        /// Print the final particle snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Open the interactive viewer
    View {
        /// JSON config file, reloaded when it changes on disk
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            frames,
            dt,
            json,
        } => run(config.as_deref(), frames, dt, json),
        Commands::View { config } => view(config),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Load a config file, or fall back to defaults
fn read_config(path: Option<&Path>) -> Result<ScopeConfig, String> {
    match path {
        None => Ok(ScopeConfig::default()),
        Some(path) => {
            let source = fs::read_to_string(path)
                .map_err(|e| format!("Error reading {}: {}", path.display(), e))?;
            parse_config(&source).map_err(|e| format_config_error(&e, &source))
        }
    }
}

fn run(config: Option<&Path>, frames: u64, dt: f64, json: bool) -> Result<(), String> {
    let config = read_config(config)?;
    let (ctx, summary) = run_frames(config, frames, dt).map_err(|e| format_runtime_error(&e))?;

    log::info!(
        "ran {} frames ({:.2}s simulated), peak population {}",
        summary.frames,
        summary.elapsed,
        summary.peak_live
    );

    if json {
        let out = serde_json::to_string_pretty(&ctx.snapshot()).map_err(|e| format_runtime_error(&e))?;
        println!("{}", out);
    } else {
        println!("frames = {}", summary.frames);
        println!("elapsed = {:.4}", summary.elapsed);
        println!("live = {}", summary.live);
        println!("pruned = {}", summary.pruned);
        println!("on_screen = {}", summary.on_screen);
    }

    Ok(())
}

fn view(config_path: Option<PathBuf>) -> Result<(), String> {
    let config = read_config(config_path.as_deref())?;
    let sim = FrameContext::new(config).map_err(|e| format_runtime_error(&e))?;

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "cathode",
        options,
        Box::new(move |cc| Ok(Box::new(viewer::ScopeApp::new(sim, config_path, cc)))),
    )
    .map_err(|e| format_runtime_error(&e))
}
