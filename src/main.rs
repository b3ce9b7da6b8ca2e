//! Solera CLI — dual-syntax infrastructure configuration front end.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "solera",
    version,
    about = "Dual-syntax infrastructure configuration front end — scripted and declarative files, one canonical resource model"
)]
struct Cli {
    #[command(subcommand)]
    command: solera::cli::Commands,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = solera::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
