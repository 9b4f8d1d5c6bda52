//! Command-line interface for the jianghu combat engine.
//!
//! Headless by construction: there is no graphical mode to switch out of,
//! so the arguments only cover what a host needs to run one battle and
//! print its outcome.

use clap::Parser;
use std::path::PathBuf;

/// Deterministic wuxia tactical combat simulator
#[derive(Parser, Debug)]
#[command(name = "jianghu")]
#[command(about = "Deterministic wuxia tactical combat simulator")]
#[command(version)]
pub struct Args {
    /// JSON config file describing the roster, skill catalog and run knobs
    #[arg(value_name = "CONFIG_FILE")]
    pub config: PathBuf,

    /// Stop printing after this many events (0 means unlimited)
    #[arg(long, default_value = "0")]
    pub max_events: u32,

    /// Print narrated text instead of raw event records
    #[arg(long)]
    pub narrate: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}
