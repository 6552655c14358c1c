// Desktop/tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod doc;
mod script;
mod test;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "TAS2505 driver development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the driver builds for host and for a no_std Cortex-M target
    Check,
    /// Run all tests (unit, integration, and doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Document the driver for host and embedded targets
    Doc {
        /// Open documentation in browser
        #[arg(long)]
        open: bool,
    },
    /// Print the bring-up script for a sample rate as a register table
    Script {
        /// Sample rate in Hz (omit for the built-in 22.05 kHz script)
        #[arg(long)]
        sample_rate: Option<u32>,
        /// Word length in bits: 16, 20, 24 or 32
        #[arg(long, default_value_t = 16)]
        word_length: u8,
        /// Serial format
        #[arg(long, value_enum, default_value_t = script::Format::I2s)]
        format: script::Format,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Doc { open } => doc::run(open),
        Commands::Script {
            sample_rate,
            word_length,
            format,
        } => script::run(sample_rate, word_length, format),
    }
}
