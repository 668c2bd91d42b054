//! Small encoded images for tests.

use flate2::{Compression, Crc, write::ZlibEncoder};
use image::{ExtendedColorType, ImageEncoder, codecs::jpeg::JpegEncoder};
use png::{BitDepth, ColorType, Encoder};
use std::io::Write;

#[allow(clippy::too_many_arguments)]
pub fn png(
	width: u32,
	height: u32,
	color: ColorType,
	depth: BitDepth,
	data: &[u8],
	palette: Option<&[u8]>,
	trns: Option<&[u8]>,
) -> Vec<u8> {
	let mut out = Vec::new();
	{
		let mut encoder = Encoder::new(&mut out, width, height);
		encoder.set_color(color);
		encoder.set_depth(depth);
		if let Some(palette) = palette {
			encoder.set_palette(palette.to_vec());
		}
		if let Some(trns) = trns {
			encoder.set_trns(trns.to_vec());
		}
		let mut writer = encoder.write_header().unwrap();
		writer.write_image_data(data).unwrap();
		writer.finish().unwrap();
	}
	out
}

/// A PNG where every pixel has the same straight RGBA color.
pub fn png_rgba(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
	let data = rgba.repeat((width * height) as usize);
	png(width, height, ColorType::Rgba, BitDepth::Eight, &data, None, None)
}

pub fn jpeg_rgb(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
	let data = rgb.repeat((width * height) as usize);
	let mut out = Vec::new();
	JpegEncoder::new_with_quality(&mut out, 100)
		.write_image(&data, width, height, ExtendedColorType::Rgb8)
		.unwrap();
	out
}

pub fn jpeg_gray(width: u32, height: u32, gray: u8) -> Vec<u8> {
	let data = vec![gray; (width * height) as usize];
	let mut out = Vec::new();
	JpegEncoder::new_with_quality(&mut out, 100)
		.write_image(&data, width, height, ExtendedColorType::L8)
		.unwrap();
	out
}

/// A 2x2 8-bit gray PNG stored with Adam7 interlacing. `values` are in row-major order.
///
/// Only passes 1, 6 and 7 contain pixels at this size, each scanline prefixed with filter type 0.
pub fn interlaced_gray_png_2x2(values: [u8; 4]) -> Vec<u8> {
	let [top_left, top_right, bottom_left, bottom_right] = values;
	let raw = [0, top_left, 0, top_right, 0, bottom_left, bottom_right];

	let mut zlib = ZlibEncoder::new(Vec::new(), Compression::default());
	zlib.write_all(&raw).unwrap();
	let idat = zlib.finish().unwrap();

	let mut ihdr = Vec::new();
	ihdr.extend_from_slice(&2u32.to_be_bytes());
	ihdr.extend_from_slice(&2u32.to_be_bytes());
	// bit depth 8, grayscale, deflate, adaptive filtering, Adam7
	ihdr.extend_from_slice(&[8, 0, 0, 0, 1]);

	let mut out = crate::format::PNG_SIGNATURE.to_vec();
	push_chunk(&mut out, b"IHDR", &ihdr);
	push_chunk(&mut out, b"IDAT", &idat);
	push_chunk(&mut out, b"IEND", &[]);
	out
}

fn push_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
	out.extend_from_slice(&u32::try_from(data.len()).unwrap().to_be_bytes());
	out.extend_from_slice(kind);
	out.extend_from_slice(data);
	let mut crc = Crc::new();
	crc.update(kind);
	crc.update(data);
	out.extend_from_slice(&crc.sum().to_be_bytes());
}

/// A baseline Adobe JPEG with four components, `8 * mcus` pixels wide and 8 high.
///
/// Every block has a zero DC difference and no AC coefficients, so each component decodes to a flat
/// mid-level sample. Both Huffman tables hold the single one-bit code `0`, which makes a whole MCU
/// one zero byte of entropy coded data.
pub fn jpeg_cmyk(mcus: u16) -> Vec<u8> {
	let mut out = vec![0xff, 0xd8];

	// APP14 "Adobe", version 100, no flags, transform 0 (no color transform)
	push_segment(&mut out, 0xee, &[b'A', b'd', b'o', b'b', b'e', 0, 100, 0, 0, 0, 0, 0]);

	let mut dqt = vec![0];
	dqt.extend_from_slice(&[1; 64]);
	push_segment(&mut out, 0xdb, &dqt);

	let mut sof = vec![8];
	sof.extend_from_slice(&8u16.to_be_bytes());
	sof.extend_from_slice(&(8 * mcus).to_be_bytes());
	sof.push(4);
	for id in 1..=4 {
		sof.extend_from_slice(&[id, 0x11, 0]);
	}
	push_segment(&mut out, 0xc0, &sof);

	let mut dht = Vec::new();
	for class in [0x00, 0x10] {
		dht.push(class);
		dht.push(1);
		dht.extend_from_slice(&[0; 15]);
		dht.push(0);
	}
	push_segment(&mut out, 0xc4, &dht);

	let mut sos = vec![4];
	for id in 1..=4 {
		sos.extend_from_slice(&[id, 0]);
	}
	sos.extend_from_slice(&[0, 63, 0]);
	push_segment(&mut out, 0xda, &sos);

	out.extend(std::iter::repeat_n(0, usize::from(mcus)));
	out.extend_from_slice(&[0xff, 0xd9]);
	out
}

fn push_segment(out: &mut Vec<u8>, marker: u8, data: &[u8]) {
	out.extend_from_slice(&[0xff, marker]);
	out.extend_from_slice(&u16::try_from(data.len() + 2).unwrap().to_be_bytes());
	out.extend_from_slice(data);
}
