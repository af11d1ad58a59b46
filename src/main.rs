// File: src/main.rs

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mxtrace::cli::{run, CliArgs};

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mxtrace=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// An `Err` from `run` exits non-zero with the error chain on stderr.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging();

    run(
        args,
        |key| std::env::var(key).ok(),
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )?;
    Ok(())
}
