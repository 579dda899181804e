//! `superlists` - CLI for the to-do list application
//!
//! Runs the web server and offers a few maintenance commands that work on
//! the same database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use superlists::cli::handlers::{handle_config, handle_items, serve_config};
use superlists::cli::{Cli, Command};
use superlists::{init_logging, web, Config};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match cli.command {
        Command::Serve(serve_cmd) => {
            let config = serve_config(cli.config, &serve_cmd)?;
            let runtime =
                tokio::runtime::Runtime::new().context("failed to start async runtime")?;
            runtime.block_on(web::serve(&config))?;
        }
        Command::Items(items_cmd) => {
            let config = Config::load_raw(cli.config)?;
            handle_items(&config, items_cmd, &mut std::io::stdout().lock())?;
        }
        Command::Config(config_cmd) => {
            handle_config(cli.config, config_cmd, &mut std::io::stdout().lock())?;
        }
    }
    Ok(())
}
