use anyhow::{Context, Result};
use spair_debug::config::Config;
use std::{env, path::PathBuf};
use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, prelude::*, EnvFilter};

#[derive(Debug, Clone, StructOpt)]
/// Render the debug views of random inputs
struct Args {
    #[structopt(long, default_value = "spair-debug.json5")]
    /// configuration file
    pub config_file: PathBuf,
    #[structopt(long, default_value = "1")]
    /// number of steps to render
    pub steps: usize,
}

pub fn main() -> Result<()> {
    // setup tracing
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true).compact();
    let filter_layer = {
        let filter = EnvFilter::from_default_env();
        if env::var("RUST_LOG").is_err() {
            filter.add_directive(LevelFilter::INFO.into())
        } else {
            filter
        }
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    // parse arguments
    let Args { config_file, steps } = Args::from_args();
    let config = Config::open(&config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;

    spair_debug::start(&config, steps)?;

    Ok(())
}
