//! # sirsim-cli
//!
//! The main entry point for the sirsim binary. It parses command-line
//! arguments, initializes logging, and dispatches to the appropriate
//! subcommand handler.

#![forbid(unsafe_code)]

use crate::args::{Cli, Command};
use anyhow::Result;
use clap::Parser;

mod args;
mod calibrate;
mod commands;
mod export;
mod logging;
mod runner;

fn main() -> Result<()> {
    let args = Cli::parse();
    logging::init(args.log);

    match args.command {
        Command::Run(opts) => commands::run::exec(opts),
        Command::Validate { scenario } => commands::validate::exec(&scenario),
        Command::Calibrate(opts) => commands::calibrate::exec(opts),
    }
}
