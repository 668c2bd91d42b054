//! Errors that cross the boundary of the image pipeline.
//!
//! Every public operation reports failure through [`ImageError`]. The three variants map
//! one-to-one onto the status codes the surrounding renderer understands ([`Status`]).
//! The "not this format" outcome of probing a decoder is not an error. It lives in
//! `format::dispatch` and has no conversion into `ImageError`.

use std::fmt::{Display, Formatter};

/// Failure reported by the image pipeline.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
	/// The external resource could not be located or opened.
	#[error("image resource not found: {reference}")]
	FileNotFound { reference: String },

	/// An allocation failed or a configured memory limit was exceeded.
	#[error("out of memory while {context}")]
	OutOfMemory { context: String },

	/// Malformed, corrupt or unsupported image data, or invalid geometry.
	#[error("parse error: {message}")]
	ParseError { message: String },
}

impl ImageError {
	pub fn file_not_found(reference: impl Into<String>) -> Self {
		ImageError::FileNotFound {
			reference: reference.into(),
		}
	}

	pub fn out_of_memory(context: impl Into<String>) -> Self {
		ImageError::OutOfMemory {
			context: context.into(),
		}
	}

	pub fn parse(message: impl Into<String>) -> Self {
		ImageError::ParseError {
			message: message.into(),
		}
	}

	/// The error returned once every candidate decoder rejected the data.
	pub fn unsupported_image() -> Self {
		ImageError::parse("unsupported or corrupt image")
	}

	pub fn status(&self) -> Status {
		match self {
			ImageError::FileNotFound { .. } => Status::FileNotFound,
			ImageError::OutOfMemory { .. } => Status::OutOfMemory,
			ImageError::ParseError { .. } => Status::ParseError,
		}
	}
}

/// Status codes as seen by the rendering engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Status {
	Success,
	FileNotFound,
	OutOfMemory,
	ParseError,
}

impl Status {
	pub fn as_str(&self) -> &'static str {
		match self {
			Status::Success => "success",
			Status::FileNotFound => "file not found",
			Status::OutOfMemory => "out of memory",
			Status::ParseError => "parse error",
		}
	}

	pub fn is_success(&self) -> bool {
		*self == Status::Success
	}
}

impl Display for Status {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl<T> From<&Result<T, ImageError>> for Status {
	fn from(result: &Result<T, ImageError>) -> Self {
		match result {
			Ok(_) => Status::Success,
			Err(err) => err.status(),
		}
	}
}
