use super::{ImageFormat, jpeg::JpegDecoder, png::PngDecoder};
use crate::{DecodeConfig, ImageError, PixelBuffer, ResourceHandle};
use std::fmt::Debug;

/// Outcome of handing bytes to a single codec.
///
/// `NotThisFormat` only steers the dispatch loop and has no conversion into [`ImageError`].
pub(crate) enum DecodeAttempt {
	Decoded(PixelBuffer),
	NotThisFormat,
	Failed(ImageError),
}

impl From<Result<PixelBuffer, ImageError>> for DecodeAttempt {
	fn from(result: Result<PixelBuffer, ImageError>) -> Self {
		match result {
			Ok(buffer) => DecodeAttempt::Decoded(buffer),
			Err(err) => DecodeAttempt::Failed(err),
		}
	}
}

pub(crate) trait FormatDecoder {
	fn format(&self) -> ImageFormat;
	fn decode(&self, bytes: &[u8], config: &DecodeConfig) -> DecodeAttempt;
}

fn decoder_for(format: ImageFormat) -> Box<dyn FormatDecoder> {
	match format {
		ImageFormat::Png => Box::new(PngDecoder),
		ImageFormat::Jpeg => Box::new(JpegDecoder),
	}
}

/// Tries the available codecs in order until one of them claims the data.
pub struct FormatDispatcher {
	config: DecodeConfig,
	decoders: Vec<Box<dyn FormatDecoder>>,
}

impl FormatDispatcher {
	pub fn new(config: DecodeConfig) -> Self {
		let decoders = ImageFormat::PROBE_ORDER.into_iter().map(decoder_for).collect();
		Self::with_decoders(config, decoders)
	}

	/// `decoders` must be listed in fallback order.
	pub(crate) fn with_decoders(config: DecodeConfig, decoders: Vec<Box<dyn FormatDecoder>>) -> Self {
		Self { config, decoders }
	}

	pub fn config(&self) -> &DecodeConfig {
		&self.config
	}

	/// The hinted codec first, then the others in fallback order.
	fn candidates(&self, hint: Option<ImageFormat>) -> impl Iterator<Item = &dyn FormatDecoder> {
		let hinted = self.decoders.iter().filter(move |d| Some(d.format()) == hint);
		let rest = self.decoders.iter().filter(move |d| Some(d.format()) != hint);
		hinted.chain(rest).map(|d| &**d)
	}

	/// Decodes an in-memory image. `hint` is usually derived from a mime type.
	pub fn decode_bytes(&self, bytes: &[u8], hint: Option<ImageFormat>) -> Result<PixelBuffer, ImageError> {
		for decoder in self.candidates(hint) {
			match decoder.decode(bytes, &self.config) {
				DecodeAttempt::Decoded(buffer) => {
					log::debug!(
						"decoded {}x{} {} image from {} bytes",
						buffer.width(),
						buffer.height(),
						decoder.format(),
						bytes.len()
					);
					return Ok(buffer);
				}
				DecodeAttempt::NotThisFormat => {
					log::trace!("{} decoder does not recognize the data", decoder.format());
				}
				DecodeAttempt::Failed(err) => {
					log::debug!("{} decoder failed: {err}", decoder.format());
					return Err(err);
				}
			}
		}
		Err(ImageError::unsupported_image())
	}

	/// Reads the resource behind `handle` and decodes it like [`Self::decode_bytes`].
	pub fn decode_resource(&self, handle: &ResourceHandle, hint: Option<ImageFormat>) -> Result<PixelBuffer, ImageError> {
		let bytes = handle.read()?;
		self.decode_bytes(&bytes, hint)
	}
}

impl Default for FormatDispatcher {
	fn default() -> Self {
		Self::new(DecodeConfig::default())
	}
}

impl Debug for FormatDispatcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let formats: Vec<ImageFormat> = self.decoders.iter().map(|d| d.format()).collect();
		f.debug_struct("FormatDispatcher")
			.field("config", &self.config)
			.field("decoders", &formats)
			.finish()
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use crate::{Status, fixtures};
	use rstest::rstest;
	use std::{cell::Cell, rc::Rc};

	/// Wraps a decoder and counts how often it is asked to decode.
	struct Counting {
		inner: Box<dyn FormatDecoder>,
		calls: Rc<Cell<usize>>,
	}

	impl Counting {
		fn new(inner: impl FormatDecoder + 'static) -> (Self, Rc<Cell<usize>>) {
			let calls = Rc::new(Cell::new(0));
			(
				Self {
					inner: Box::new(inner),
					calls: calls.clone(),
				},
				calls,
			)
		}
	}

	impl FormatDecoder for Counting {
		fn format(&self) -> ImageFormat {
			self.inner.format()
		}
		fn decode(&self, bytes: &[u8], config: &DecodeConfig) -> DecodeAttempt {
			self.calls.set(self.calls.get() + 1);
			self.inner.decode(bytes, config)
		}
	}

	/// A decoder that always fails hard.
	struct Broken(ImageFormat);

	impl FormatDecoder for Broken {
		fn format(&self) -> ImageFormat {
			self.0
		}
		fn decode(&self, _bytes: &[u8], _config: &DecodeConfig) -> DecodeAttempt {
			DecodeAttempt::Failed(ImageError::out_of_memory("testing"))
		}
	}

	/// The default decoders, each wrapped in a call counter (PNG, JPEG).
	pub(crate) fn counting_dispatcher() -> (FormatDispatcher, Rc<Cell<usize>>, Rc<Cell<usize>>) {
		let (png, png_calls) = Counting::new(PngDecoder);
		let (jpeg, jpeg_calls) = Counting::new(JpegDecoder);
		let dispatcher = FormatDispatcher::with_decoders(DecodeConfig::default(), vec![Box::new(png) as Box<dyn FormatDecoder>, Box::new(jpeg)]);
		(dispatcher, png_calls, jpeg_calls)
	}

	#[test]
	fn jpeg_hint_never_touches_png() {
		let (dispatcher, png_calls, jpeg_calls) = counting_dispatcher();
		let buffer = dispatcher
			.decode_bytes(&fixtures::jpeg_rgb(4, 3, [10, 20, 30]), Some(ImageFormat::Jpeg))
			.unwrap();
		assert_eq!(buffer.source_format(), ImageFormat::Jpeg);
		assert_eq!((png_calls.get(), jpeg_calls.get()), (0, 1));
	}

	#[rstest]
	#[case::png_no_hint(fixtures::png_rgba(2, 2, [1, 2, 3, 255]), None, ImageFormat::Png, (1, 0))]
	#[case::png_png_hint(fixtures::png_rgba(2, 2, [1, 2, 3, 255]), Some(ImageFormat::Png), ImageFormat::Png, (1, 0))]
	#[case::png_jpeg_hint(fixtures::png_rgba(2, 2, [1, 2, 3, 255]), Some(ImageFormat::Jpeg), ImageFormat::Png, (1, 1))]
	#[case::jpeg_no_hint(fixtures::jpeg_rgb(2, 2, [1, 2, 3]), None, ImageFormat::Jpeg, (1, 1))]
	#[case::jpeg_png_hint(fixtures::jpeg_rgb(2, 2, [1, 2, 3]), Some(ImageFormat::Png), ImageFormat::Jpeg, (1, 1))]
	fn falls_back_in_order(
		#[case] bytes: Vec<u8>,
		#[case] hint: Option<ImageFormat>,
		#[case] expected: ImageFormat,
		#[case] calls: (usize, usize),
	) {
		let (dispatcher, png_calls, jpeg_calls) = counting_dispatcher();
		let buffer = dispatcher.decode_bytes(&bytes, hint).unwrap();
		assert_eq!(buffer.source_format(), expected);
		assert_eq!(buffer.as_bytes().len(), 2 * 2 * 4);
		assert_eq!((png_calls.get(), jpeg_calls.get()), calls);
	}

	#[rstest]
	#[case::text(b"GIF89a not an image".to_vec())]
	#[case::empty(Vec::new())]
	#[case::short_png_prefix(b"\x89PN".to_vec())]
	fn unknown_data_is_a_generic_parse_error(#[case] bytes: Vec<u8>) {
		let (dispatcher, png_calls, jpeg_calls) = counting_dispatcher();
		let err = dispatcher.decode_bytes(&bytes, None).unwrap_err();
		assert_eq!(err, ImageError::unsupported_image());
		assert_eq!((png_calls.get(), jpeg_calls.get()), (1, 1));
	}

	#[test]
	fn hard_error_stops_dispatch() {
		let (jpeg, jpeg_calls) = Counting::new(JpegDecoder);
		let dispatcher = FormatDispatcher::with_decoders(
			DecodeConfig::default(),
			vec![Box::new(Broken(ImageFormat::Png)) as Box<dyn FormatDecoder>, Box::new(jpeg)],
		);
		let err = dispatcher.decode_bytes(&fixtures::jpeg_rgb(2, 2, [0, 0, 0]), None).unwrap_err();
		assert_eq!(err.status(), Status::OutOfMemory);
		assert_eq!(jpeg_calls.get(), 0);
	}

	#[test]
	fn corrupt_png_does_not_fall_back_to_jpeg() {
		let (dispatcher, png_calls, jpeg_calls) = counting_dispatcher();
		let mut bytes = fixtures::png_rgba(4, 4, [1, 2, 3, 4]);
		bytes.truncate(30);
		let err = dispatcher.decode_bytes(&bytes, None).unwrap_err();
		assert_eq!(err.status(), Status::ParseError);
		assert_ne!(err, ImageError::unsupported_image());
		assert_eq!((png_calls.get(), jpeg_calls.get()), (1, 0));
	}

	#[test]
	fn decodes_resources_from_disk() {
		let dir = assert_fs::TempDir::new().unwrap();
		let path = dir.path().join("pixel.png");
		std::fs::write(&path, fixtures::png_rgba(3, 1, [9, 8, 7, 255])).unwrap();

		let dispatcher = FormatDispatcher::default();
		let buffer = dispatcher.decode_resource(&ResourceHandle::new(&path), None).unwrap();
		assert_eq!((buffer.width(), buffer.height()), (3, 1));
		assert_eq!(buffer.pixel(2, 0), Some([7, 8, 9, 255]));

		let missing = ResourceHandle::new(dir.path().join("missing.png"));
		let err = dispatcher.decode_resource(&missing, None).unwrap_err();
		assert_eq!(err.status(), Status::FileNotFound);
	}

	#[test]
	fn debug_lists_decoders() {
		let text = format!("{:?}", FormatDispatcher::default());
		assert!(text.contains("decoders: [Png, Jpeg]"), "{text}");
	}
}
