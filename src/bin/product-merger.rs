use product_merger::{config::Config, merger};
use thiserror::Error;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Merge Error: {0}")]
    Merge(#[from] merger::Error),
}

fn main() -> Result<(), Error> {
    // Loaded first so a RUST_LOG in `.env` reaches the filter.
    let config = Config::load();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter)
        .init();

    info!("Merging product data under {}", config.base_root.display());

    merger::run(&config)?;

    Ok(())
}
