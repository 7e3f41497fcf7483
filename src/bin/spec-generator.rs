//! This tool will generate a JSON representation of the service's OpenAPI specification.
//! Running it without any arguments will simply emit the spec to stdout.

use std::path::PathBuf;
use std::{fs, process};

use anyhow::Context;
use clap::Parser;
use quiz_leaderboard::openapi::Spec;

#[allow(clippy::missing_docs_in_private_items)]
#[derive(Debug, Parser)]
struct Args {
	/// Output the spec into a file instead of stdout.
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// Compare the spec against the file at the specified path.
	///
	/// If the file differs, the program exits with a non-0 exit code.
	#[arg(long, name = "PATH")]
	check: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();
	let spec = Spec::new().as_json().context("serialize spec")?;

	if let Some(path) = args.check {
		let other = fs::read_to_string(&path)
			.with_context(|| format!("read `{}` to compare against", path.display()))?;

		if other.trim_end() != spec.trim_end() {
			eprintln!("`{}` is out of date; regenerate it with `--output`.", path.display());
			process::exit(1);
		}

		return Ok(());
	}

	let Some(output) = args.output else {
		println!("{spec}");
		return Ok(());
	};

	fs::write(&output, spec.into_bytes())
		.with_context(|| format!("write spec to `{}`", output.display()))?;

	Ok(())
}
