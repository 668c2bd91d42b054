use super::DecodeOptions;
use anyhow::Result;
use std::io::{Write, stdout};
use svgimage_core::PixelBuffer;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// image reference: a path, a file:// URL or a data: URI
	#[arg(required = true)]
	reference: String,

	#[command(flatten)]
	options: DecodeOptions,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let pixels = arguments.options.decode(&arguments.reference)?;
	write_summary(&pixels, &mut stdout().lock())
}

fn write_summary(pixels: &PixelBuffer, out: &mut impl Write) -> Result<()> {
	writeln!(out, "format: {}", pixels.source_format())?;
	writeln!(out, "size:   {}x{}", pixels.width(), pixels.height())?;
	writeln!(out, "opaque: {}", pixels.is_opaque())?;
	Ok(())
}
