use anyhow::Result;
use clap::Parser;
use hemo::{shell, Registry, DEFAULT_FILE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Path to the donor data file.
    #[arg(long, default_value = DEFAULT_FILE)]
    file: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut registry = Registry::open(&args.file)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    shell::run(&mut registry, stdin.lock(), stdout.lock())
}
