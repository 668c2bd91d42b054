//! Parsing of inline `data:` references.

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = "base64,";

/// The parts of a `data:` reference that carry a base64 payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
	/// Text between `data:` and the first `;`, or `None` when it is empty or there is no `;`.
	pub mime: Option<&'a str>,
	/// Everything after the first `base64,` marker, still encoded.
	pub payload: &'a str,
}

impl<'a> DataUri<'a> {
	/// Splits `reference` into mime and payload.
	///
	/// Returns `None` if the reference does not start with `data:` or has no `base64,` marker.
	/// Callers treat such references as external.
	pub fn parse(reference: &'a str) -> Option<Self> {
		let rest = reference.strip_prefix(SCHEME)?;
		let mime = rest.split_once(';').map(|(mime, _)| mime).filter(|mime| !mime.is_empty());
		let (_, payload) = reference.split_once(BASE64_MARKER)?;
		Some(Self { mime, payload })
	}
}
