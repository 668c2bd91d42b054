//! PNG decoding into the canonical pixel layout.
//!
//! The `png` crate takes care of the container-level transformations: palette expansion,
//! expansion of 1/2/4-bit gray, promotion of a `tRNS` chunk to an alpha channel, reduction
//! of 16-bit samples to their high byte, unpacking of sub-byte pixels, and Adam7
//! de-interlacing. What remains, gray to RGB, swizzling to BGR, alpha synthesis and
//! premultiplication, is done here row by row.

use super::{DecodeAttempt, FormatDecoder, ImageFormat};
use crate::{
	DecodeConfig, ImageError, PixelBuffer,
	pixel::{SampleLayout, premultiply_row, write_bgra_row},
};
use ::png::{BitDepth, ColorType, Decoder, DecodingError, Limits, Reader, Transformations};
use std::io::Cursor;

/// The eight bytes every PNG stream starts with.
pub const SIGNATURE: [u8; 8] = *b"\x89PNG\r\n\x1a\n";

pub(crate) struct PngDecoder;

impl FormatDecoder for PngDecoder {
	fn format(&self) -> ImageFormat {
		ImageFormat::Png
	}

	fn decode(&self, bytes: &[u8], config: &DecodeConfig) -> DecodeAttempt {
		decode(bytes, config)
	}
}

pub(crate) fn decode(bytes: &[u8], config: &DecodeConfig) -> DecodeAttempt {
	if !bytes.starts_with(&SIGNATURE) {
		return DecodeAttempt::NotThisFormat;
	}
	decode_png(bytes, config).into()
}

fn decode_png(bytes: &[u8], config: &DecodeConfig) -> Result<PixelBuffer, ImageError> {
	let mut decoder = Decoder::new_with_limits(
		Cursor::new(bytes),
		Limits {
			bytes: config.max_decoder_bytes,
		},
	);
	decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

	let mut reader = decoder.read_info().map_err(map_error)?;
	let (width, height) = (reader.info().width, reader.info().height);
	let layout = match reader.output_color_type() {
		(ColorType::Grayscale, BitDepth::Eight) => SampleLayout::Gray,
		(ColorType::GrayscaleAlpha, BitDepth::Eight) => SampleLayout::GrayAlpha,
		(ColorType::Rgb, BitDepth::Eight) => SampleLayout::Rgb,
		(ColorType::Rgba, BitDepth::Eight) => SampleLayout::Rgba,
		(color_type, bit_depth) => {
			return Err(ImageError::parse(format!(
				"PNG decodes to unsupported {color_type:?} at {bit_depth:?}"
			)));
		}
	};
	log::trace!(
		"PNG {width}x{height}, {:?} {:?}, interlaced: {}",
		reader.info().color_type,
		reader.info().bit_depth,
		reader.info().interlaced
	);

	let mut buffer = PixelBuffer::allocate(width, height, ImageFormat::Png, config)?;

	if reader.info().interlaced {
		read_deinterlaced(&mut reader, layout, &mut buffer)?;
	} else {
		for y in 0..height as usize {
			let line = reader
				.next_row()
				.map_err(map_error)?
				.ok_or_else(|| ImageError::parse(format!("PNG ends after {y} of {height} rows")))?;
			let row = buffer.row_mut(y)?;
			write_bgra_row(line.data(), layout, row)?;
			premultiply_row(row);
		}
	}

	Ok(buffer)
}

/// Adam7 rows only become whole after the last pass, so interlaced images go through a full frame.
fn read_deinterlaced(
	reader: &mut Reader<Cursor<&[u8]>>,
	layout: SampleLayout,
	buffer: &mut PixelBuffer,
) -> Result<(), ImageError> {
	let (width, height) = (buffer.width(), buffer.height());
	let frame_size = reader
		.output_buffer_size()
		.ok_or_else(|| ImageError::out_of_memory(format!("sizing the {width}x{height} PNG frame")))?;
	let mut frame = Vec::new();
	frame
		.try_reserve_exact(frame_size)
		.map_err(|_| ImageError::out_of_memory(format!("allocating {frame_size} bytes for a PNG frame")))?;
	frame.resize(frame_size, 0);

	let output = reader.next_frame(&mut frame).map_err(map_error)?;
	if output.line_size == 0 {
		return Err(ImageError::parse("PNG frame has empty scanlines"));
	}

	for (y, line) in frame.chunks_exact(output.line_size).take(height as usize).enumerate() {
		let row = buffer.row_mut(y)?;
		write_bgra_row(line, layout, row)?;
		premultiply_row(row);
	}
	Ok(())
}

fn map_error(err: DecodingError) -> ImageError {
	match err {
		DecodingError::LimitsExceeded => ImageError::out_of_memory("decoding PNG data (decoder limit exceeded)"),
		other => ImageError::parse(format!("corrupt PNG data: {other}")),
	}
}
