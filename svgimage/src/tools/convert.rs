use super::DecodeOptions;
use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use svgimage_core::PixelBuffer;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// image reference: a path, a file:// URL or a data: URI
	#[arg()]
	reference: String,

	/// PNG file to write
	#[arg()]
	output_file: PathBuf,

	#[command(flatten)]
	options: DecodeOptions,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let pixels = arguments.options.decode(&arguments.reference)?;
	log::info!(
		"writing {}x{} image to {}",
		pixels.width(),
		pixels.height(),
		arguments.output_file.display()
	);
	write_png(&pixels, &arguments.output_file)
}

/// Writes straight RGBA, undoing premultiplication and the BGRA channel order.
fn write_png(pixels: &PixelBuffer, path: &Path) -> Result<()> {
	let image = RgbaImage::from_raw(pixels.width(), pixels.height(), pixels.to_rgba())
		.context("pixel buffer does not match its dimensions")?;
	image
		.save_with_format(path, image::ImageFormat::Png)
		.with_context(|| format!("writing {}", path.display()))
}
