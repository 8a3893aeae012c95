use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

mod convert;
mod inspect;

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Convert a legacy checkpoint into a safetensors checkpoint
	Convert {
		/// Legacy artifact (.ot, .npz, TorchScript .pt, or .safetensors)
		input: PathBuf,

		/// Output safetensors path
		output: PathBuf,

		/// JSON file with the class-name array to embed
		#[clap(short, long)]
		labels: Option<PathBuf>,
	},

	/// Print a checkpoint's structure and diagnostics
	Inspect {
		/// Checkpoint path
		path: PathBuf,
	},
}

pub fn exec(command: Command) -> Result<()> {
	match command {
		Command::Convert {
			input,
			output,
			labels,
		} => convert::handle(&input, &output, labels.as_deref()),
		Command::Inspect { path } => inspect::handle(&path),
	}
}
