#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use clap::Parser;

mod commands;
mod tensors;

/// Convert and inspect florascan model checkpoints
#[derive(Parser)]
#[clap(name = "florascan-cli", version)]
struct Cli {
	#[clap(subcommand)]
	command: commands::Command,
}

fn main() {
	let cli = Cli::parse();

	if let Err(error) = commands::exec(cli.command) {
		eprintln!("error: {error:#}");
		std::process::exit(1);
	}
}
