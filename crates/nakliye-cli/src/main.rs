//! nakliye - container haulage desk
//!
//! A CLI for the trucking back office: tickets with live wait pricing, the
//! truck pool, facilities and customer accounts, and an HTTP front.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use nakliye_app::config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    // diagnostics stay quiet unless serving or asked for
    let level = if cli.verbose {
        "debug"
    } else if matches!(cli.command, Commands::Serve { .. }) {
        "info"
    } else {
        "warn"
    };
    nakliye_server::init_tracing(config.log_json, level);

    if let Err(e) = commands::execute(cli, config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
