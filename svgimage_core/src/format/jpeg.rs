//! JPEG decoding into the canonical pixel layout.
//!
//! JPEG has no transparency, so every pixel is written with alpha 255 and no premultiplication
//! pass is needed.

use super::{DecodeAttempt, FormatDecoder, ImageFormat};
use crate::{
	DecodeConfig, ImageError, PixelBuffer,
	pixel::{SampleLayout, write_bgra_row},
};
use jpeg_decoder::{Decoder, PixelFormat};

/// The start-of-image marker every JPEG stream begins with.
pub const START_OF_IMAGE: [u8; 2] = [0xff, 0xd8];

pub(crate) struct JpegDecoder;

impl FormatDecoder for JpegDecoder {
	fn format(&self) -> ImageFormat {
		ImageFormat::Jpeg
	}

	fn decode(&self, bytes: &[u8], config: &DecodeConfig) -> DecodeAttempt {
		decode(bytes, config)
	}
}

pub(crate) fn decode(bytes: &[u8], config: &DecodeConfig) -> DecodeAttempt {
	if !bytes.starts_with(&START_OF_IMAGE) {
		return DecodeAttempt::NotThisFormat;
	}
	decode_jpeg(bytes, config).into()
}

fn decode_jpeg(bytes: &[u8], config: &DecodeConfig) -> Result<PixelBuffer, ImageError> {
	let mut decoder = Decoder::new(bytes);
	decoder.read_info().map_err(map_error)?;
	let info = decoder
		.info()
		.ok_or_else(|| ImageError::parse("JPEG header carries no frame information"))?;

	let layout = sample_layout(info.pixel_format)?;
	let (width, height) = (usize::from(info.width), usize::from(info.height));
	let line_size = width * layout.samples_per_pixel();
	if line_size.saturating_mul(height) > config.max_decoder_bytes {
		return Err(ImageError::out_of_memory(format!(
			"decoding a {width}x{height} JPEG (decoder limit is {} bytes)",
			config.max_decoder_bytes
		)));
	}

	let mut buffer = PixelBuffer::allocate(u32::from(info.width), u32::from(info.height), ImageFormat::Jpeg, config)?;

	decoder.set_max_decoding_buffer_size(config.max_decoder_bytes);
	let samples = decoder.decode().map_err(map_error)?;
	if line_size == 0 || samples.len() < line_size * height {
		return Err(ImageError::parse(format!(
			"JPEG produced {} bytes for a {width}x{height} image",
			samples.len()
		)));
	}

	for (y, scanline) in samples.chunks_exact(line_size).take(height).enumerate() {
		write_bgra_row(scanline, layout, buffer.row_mut(y)?)?;
	}

	Ok(buffer)
}

/// Chooses how decoded samples map onto BGRA.
///
/// One component is gray, three are RGB. Any other component count is read through the
/// three-component path, using the first three samples of each pixel.
fn sample_layout(pixel_format: PixelFormat) -> Result<SampleLayout, ImageError> {
	match pixel_format {
		PixelFormat::L8 => Ok(SampleLayout::Gray),
		PixelFormat::RGB24 => Ok(SampleLayout::Rgb),
		PixelFormat::L16 => Err(ImageError::parse("16-bit JPEG samples are not supported")),
		PixelFormat::CMYK32 => {
			log::debug!("JPEG with CMYK samples is read as RGB");
			Ok(SampleLayout::LeadingRgb(PixelFormat::CMYK32.pixel_bytes()))
		}
	}
}

fn map_error(err: jpeg_decoder::Error) -> ImageError {
	ImageError::parse(format!("corrupt JPEG data: {err}"))
}
