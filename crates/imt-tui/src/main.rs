//! Standalone TUI binary for the initiative tracker.

use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use imt_core::{DEFAULT_NAMESPACE, TrackerConfig};
use imt_scene::SceneHost;

#[derive(Parser)]
#[command(
    name = "imt-tui",
    about = "Initiative tracker with modifiers for a shared scene",
    version
)]
struct Args {
    /// Scene file (JSON) acting as the host canvas and document store
    #[arg(long)]
    scene: PathBuf,

    /// Metadata key the tracker state is stored under
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// RNG seed for reproducible initiative rolls
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is owned by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let host = SceneHost::open(&args.scene).map_err(|e| e.to_string())?;

    let mut config = TrackerConfig::default().with_namespace(args.namespace);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let app = imt_tui::app::TuiApp::new(host, config);
    imt_tui::terminal::run(app)
}

/// Route tracing output to a log file.
fn init_logging(path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let directives = env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&directives))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

/// Filter from `RUST_LOG`-style directives; `info` when none are given.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}
