use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use motes_core::{MotesConfig, Session};

mod headless;

const DEFAULT_CONFIG: &str = "motes.toml";

#[derive(Parser)]
#[command(name = "motes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Drifting particle cloud with a live command console", long_about = None)]
struct Cli {
    /// Config file (defaults to ./motes.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read commands from stdin instead of opening a window
    #[arg(long)]
    headless: bool,

    /// RNG seed, overrides `[simulation] seed`
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let mut config = load_config(cli.config.as_deref())?;
    if cli.seed.is_some() {
        config.simulation.seed = cli.seed;
    }

    info!("Motes starting");
    let session = Session::from_config(&config).context("invalid [defaults] in config")?;

    if cli.headless {
        headless::run_headless(session, &config.headless)
    } else {
        motes_ui::run_console(session, &config.window).map_err(|e| anyhow::anyhow!("window failed: {e}"))
    }
}

fn load_config(explicit: Option<&Path>) -> Result<MotesConfig> {
    match explicit {
        Some(path) => MotesConfig::load(path).with_context(|| format!("loading {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).is_file() => {
            MotesConfig::load(Path::new(DEFAULT_CONFIG)).context("loading motes.toml")
        }
        None => Ok(MotesConfig::default()),
    }
}
