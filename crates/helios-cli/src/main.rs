use clap::Parser;
use tracing_subscriber::FmtSubscriber;

use helios_cli::cli::Cli;
use helios_cli::commands;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to install tracing subscriber");
    }

    if let Err(err) = commands::handle(&cli.command) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
