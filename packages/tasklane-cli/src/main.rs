mod cli;
mod commands;
mod config;
mod error;

use clap::Parser;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config: config::CliConfig =
        tasklane_core::config::load_config(&config::default_config_path());
    let stdout = std::io::stdout();
    if let Err(e) = commands::run(&cli, &config, &mut stdout.lock()) {
        log::warn!("[tasklane.cli] Command failed: {}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
