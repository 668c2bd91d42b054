//! External references: handles to files and the resolvers that produce them.

use crate::ImageError;
use percent_encoding::percent_decode_str;
use std::{
	fs::File,
	io::Read,
	path::{Path, PathBuf},
};

/// A located external resource, not yet opened.
///
/// The file is only opened by [`ResourceHandle::read`] and closed again before it returns,
/// on success and on every error path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
	path: PathBuf,
}

impl ResourceHandle {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Reads the whole resource into memory.
	pub fn read(&self) -> Result<Vec<u8>, ImageError> {
		let mut file = File::open(&self.path).map_err(|err| {
			log::debug!("cannot open {}: {err}", self.path.display());
			ImageError::file_not_found(self.path.display().to_string())
		})?;

		let mut bytes = Vec::new();
		if let Ok(metadata) = file.metadata() {
			let len = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
			bytes
				.try_reserve_exact(len)
				.map_err(|_| ImageError::out_of_memory(format!("reading {len} bytes from {}", self.path.display())))?;
		}
		file
			.read_to_end(&mut bytes)
			.map_err(|err| ImageError::parse(format!("reading {}: {err}", self.path.display())))?;

		log::trace!("read {} bytes from {}", bytes.len(), self.path.display());
		Ok(bytes)
	}
}

/// Turns an external reference into a [`ResourceHandle`].
///
/// Implemented by [`FileResolver`] and by any `Fn(&str) -> Result<ResourceHandle, ImageError>`, so
/// tests and embedders can inject their own lookup.
pub trait ResourceResolver {
	fn resolve(&self, reference: &str) -> Result<ResourceHandle, ImageError>;
}

impl<F> ResourceResolver for F
where
	F: Fn(&str) -> Result<ResourceHandle, ImageError>,
{
	fn resolve(&self, reference: &str) -> Result<ResourceHandle, ImageError> {
		self(reference)
	}
}

/// Resolves plain paths and `file:` URLs against the local filesystem.
///
/// Relative paths are joined to the base directory when one is set. URLs with any other scheme
/// cannot be fetched and resolve to [`ImageError::FileNotFound`].
#[derive(Debug, Clone, Default)]
pub struct FileResolver {
	base_dir: Option<PathBuf>,
}

impl FileResolver {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
		Self {
			base_dir: Some(base_dir.into()),
		}
	}

	pub fn base_dir(&self) -> Option<&Path> {
		self.base_dir.as_deref()
	}

	fn to_path(&self, reference: &str) -> Result<PathBuf, ImageError> {
		if reference.is_empty() {
			return Err(ImageError::file_not_found(reference));
		}

		let path = match url_scheme(reference) {
			None => PathBuf::from(reference),
			Some(scheme) if scheme.eq_ignore_ascii_case("file") => file_url_to_path(reference)?,
			Some(scheme) => {
				log::warn!("cannot fetch {scheme}: reference {reference:?}");
				return Err(ImageError::file_not_found(reference));
			}
		};

		Ok(match &self.base_dir {
			Some(base) if path.is_relative() => base.join(path),
			_ => path,
		})
	}
}

impl ResourceResolver for FileResolver {
	fn resolve(&self, reference: &str) -> Result<ResourceHandle, ImageError> {
		let path = self.to_path(reference)?;
		log::debug!("resolved {reference:?} to {}", path.display());
		Ok(ResourceHandle::new(path))
	}
}

/// Returns the URL scheme of `reference`, if it has one.
///
/// Single letter schemes are treated as Windows drive letters, not as URLs.
fn url_scheme(reference: &str) -> Option<&str> {
	let (scheme, _) = reference.split_once(':')?;
	let mut chars = scheme.chars();
	let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
		&& chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
	(valid && scheme.len() > 1).then_some(scheme)
}

fn file_url_to_path(url: &str) -> Result<PathBuf, ImageError> {
	let rest = &url["file:".len()..];
	let rest = rest.split(['?', '#']).next().unwrap_or_default();

	let encoded = match rest.strip_prefix("//") {
		Some(authority_and_path) => {
			let (host, path) = match authority_and_path.find('/') {
				Some(i) => authority_and_path.split_at(i),
				None => (authority_and_path, ""),
			};
			if !(host.is_empty() || host.eq_ignore_ascii_case("localhost")) {
				log::warn!("file URL {url:?} points to remote host {host:?}");
				return Err(ImageError::file_not_found(url));
			}
			path
		}
		None => rest,
	};

	if encoded.is_empty() {
		return Err(ImageError::file_not_found(url));
	}

	let decoded = percent_decode_str(encoded)
		.decode_utf8()
		.map_err(|_| ImageError::file_not_found(url))?;
	Ok(PathBuf::from(decoded.as_ref()))
}
