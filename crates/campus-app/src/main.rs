use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use campus_app::cli::{self, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let snapshot = cli::run(&args)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
