//! The canonical pixel buffer and the per-pixel normalization shared by all decoders.
//!
//! Every decoder produces the same layout: rows top to bottom, 4 bytes per pixel in the order
//! blue, green, red, alpha, stride `width * 4`, color channels premultiplied by alpha.

use crate::{DecodeConfig, ImageError, ImageFormat};
use std::fmt::Debug;

pub const BYTES_PER_PIXEL: usize = 4;

/// Decoded image in canonical premultiplied BGRA layout.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
	width: u32,
	height: u32,
	format: ImageFormat,
	data: Vec<u8>,
}

impl PixelBuffer {
	/// Allocates a zeroed buffer for a `width` x `height` image.
	///
	/// Fails with [`ImageError::OutOfMemory`] when the image exceeds `config.max_pixels` or when the
	/// allocation itself cannot be satisfied.
	pub(crate) fn allocate(width: u32, height: u32, format: ImageFormat, config: &DecodeConfig) -> Result<Self, ImageError> {
		let pixels = u64::from(width) * u64::from(height);
		if pixels > config.max_pixels {
			return Err(ImageError::out_of_memory(format!(
				"decoding a {width}x{height} {format} image (limit is {} pixels)",
				config.max_pixels
			)));
		}

		let len = usize::try_from(pixels)
			.ok()
			.and_then(|p| p.checked_mul(BYTES_PER_PIXEL))
			.ok_or_else(|| ImageError::out_of_memory(format!("sizing a {width}x{height} pixel buffer")))?;

		let mut data = Vec::new();
		data
			.try_reserve_exact(len)
			.map_err(|_| ImageError::out_of_memory(format!("allocating {len} bytes for a {width}x{height} image")))?;
		data.resize(len, 0);

		Ok(Self {
			width,
			height,
			format,
			data,
		})
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	/// Number of bytes per row.
	pub fn stride(&self) -> usize {
		self.width as usize * BYTES_PER_PIXEL
	}

	/// The codec the pixels were decoded from.
	pub fn source_format(&self) -> ImageFormat {
		self.format
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}

	pub fn into_vec(self) -> Vec<u8> {
		self.data
	}

	/// Returns the `[b, g, r, a]` bytes of one pixel, or `None` outside the image.
	pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
		if x >= self.width || y >= self.height {
			return None;
		}
		let offset = y as usize * self.stride() + x as usize * BYTES_PER_PIXEL;
		let mut out = [0u8; 4];
		out.copy_from_slice(&self.data[offset..offset + BYTES_PER_PIXEL]);
		Some(out)
	}

	/// Mutable access to row `y`, checked against the buffer height.
	pub(crate) fn row_mut(&mut self, y: usize) -> Result<&mut [u8], ImageError> {
		let stride = self.stride();
		let start = y
			.checked_mul(stride)
			.filter(|start| start + stride <= self.data.len())
			.ok_or_else(|| ImageError::parse(format!("row {y} is outside a {}-row image", self.height)))?;
		Ok(&mut self.data[start..start + stride])
	}

	/// `true` if every alpha byte is 255.
	pub fn is_opaque(&self) -> bool {
		self.data.chunks_exact(BYTES_PER_PIXEL).all(|p| p[3] == u8::MAX)
	}

	/// Converts back to straight (non-premultiplied) RGBA, e.g. for re-encoding.
	pub fn to_rgba(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(self.data.len());
		for p in self.data.chunks_exact(BYTES_PER_PIXEL) {
			let a = p[3];
			let unpremultiply = |c: u8| -> u8 {
				if a == 0 {
					0
				} else {
					((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8
				}
			};
			out.extend_from_slice(&[unpremultiply(p[2]), unpremultiply(p[1]), unpremultiply(p[0]), a]);
		}
		out
	}
}

impl Debug for PixelBuffer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PixelBuffer")
			.field("width", &self.width)
			.field("height", &self.height)
			.field("format", &self.format)
			.field("bytes", &self.data.len())
			.finish()
	}
}

/// How the samples of one decoded source pixel are arranged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SampleLayout {
	Gray,
	GrayAlpha,
	Rgb,
	Rgba,
	/// `n` samples per pixel, of which the first three are read as red, green, blue.
	LeadingRgb(usize),
}

impl SampleLayout {
	pub(crate) fn samples_per_pixel(self) -> usize {
		match self {
			SampleLayout::Gray => 1,
			SampleLayout::GrayAlpha => 2,
			SampleLayout::Rgb => 3,
			SampleLayout::Rgba => 4,
			SampleLayout::LeadingRgb(n) => n,
		}
	}
}

/// Writes one source row as BGRA into `dst`. Sources without alpha get alpha 255.
///
/// `dst` must hold exactly `width * 4` bytes and `src` at least `width` source pixels.
pub(crate) fn write_bgra_row(src: &[u8], layout: SampleLayout, dst: &mut [u8]) -> Result<(), ImageError> {
	let samples = layout.samples_per_pixel();
	let width = dst.len() / BYTES_PER_PIXEL;
	if samples < layout_min_samples(layout) || src.len() < width * samples {
		return Err(ImageError::parse(format!(
			"short scanline: {} bytes for {width} pixels of {samples} samples",
			src.len()
		)));
	}

	let pixels = src.chunks_exact(samples).zip(dst.chunks_exact_mut(BYTES_PER_PIXEL));
	match layout {
		SampleLayout::Gray => pixels.for_each(|(s, d)| d.copy_from_slice(&[s[0], s[0], s[0], u8::MAX])),
		SampleLayout::GrayAlpha => pixels.for_each(|(s, d)| d.copy_from_slice(&[s[0], s[0], s[0], s[1]])),
		SampleLayout::Rgb | SampleLayout::LeadingRgb(_) => {
			pixels.for_each(|(s, d)| d.copy_from_slice(&[s[2], s[1], s[0], u8::MAX]))
		}
		SampleLayout::Rgba => pixels.for_each(|(s, d)| d.copy_from_slice(&[s[2], s[1], s[0], s[3]])),
	}
	Ok(())
}

fn layout_min_samples(layout: SampleLayout) -> usize {
	match layout {
		SampleLayout::LeadingRgb(_) => 3,
		other => other.samples_per_pixel(),
	}
}

/// Scales blue, green and red of every BGRA pixel in `row` by its alpha, truncating.
pub(crate) fn premultiply_row(row: &mut [u8]) {
	for p in row.chunks_exact_mut(BYTES_PER_PIXEL) {
		let a = u32::from(p[3]);
		for c in &mut p[..3] {
			*c = (u32::from(*c) * a / 255) as u8;
		}
	}
}
