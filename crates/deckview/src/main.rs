mod app;
mod banner;
mod cli;
mod commands;
mod config;
mod deck;
mod nav;
mod notes;
mod sync;
mod theme;
mod timer;
mod watch;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli::log_filter(cli.verbose, cli.quiet)),
    )
    .init();

    cli.run()
}
