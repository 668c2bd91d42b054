//! The `<image>` element: attribute binding, lazy decoding and rendering.
//!
//! A node goes through these states:
//!
//! ```text
//! Unbound --apply_attributes--> Bound --render--> Decoded
//!    |                            |
//!    +--------negative size-------+----error----> Failed
//! ```
//!
//! A bound node with zero width or height renders nothing and never decodes. `Decoded` and
//! `Failed` are final: later renders reuse the cached pixels or return the same error.

mod length;

pub use length::{Length, LengthUnit, Orientation};

use crate::{ImageError, ImageLoader, PixelBuffer};

const DEFAULT_ASPECT_RATIO: &str = "xMidYMid meet";

/// Placement of an image in user space, as bound from markup.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Geometry {
	pub x: Length,
	pub y: Length,
	pub width: Length,
	pub height: Length,
}

impl Geometry {
	pub fn is_zero_area(&self) -> bool {
		self.width.is_zero() || self.height.is_zero()
	}
}

impl Default for Geometry {
	fn default() -> Self {
		Self {
			x: Length::zero(Orientation::Horizontal),
			y: Length::zero(Orientation::Vertical),
			width: Length::zero(Orientation::Horizontal),
			height: Length::zero(Orientation::Vertical),
		}
	}
}

/// Receives decoded images for drawing.
pub trait RenderEngine {
	fn render_image(&mut self, pixels: &PixelBuffer, geometry: &Geometry) -> Result<(), ImageError>;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum NodeState {
	#[default]
	Unbound,
	Bound,
	Decoded(PixelBuffer),
	Failed(ImageError),
}

impl NodeState {
	pub fn as_str(&self) -> &'static str {
		match self {
			NodeState::Unbound => "unbound",
			NodeState::Bound => "bound",
			NodeState::Decoded(_) => "decoded",
			NodeState::Failed(_) => "failed",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageNode {
	geometry: Geometry,
	reference: String,
	aspect_ratio: String,
	state: NodeState,
}

impl ImageNode {
	pub fn new() -> Self {
		Self {
			geometry: Geometry::default(),
			reference: String::new(),
			aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
			state: NodeState::Unbound,
		}
	}

	/// Binds geometry and reference from `(name, value)` attribute pairs.
	///
	/// Missing lengths default to `0` and a missing reference to the empty string. `xlink:href` takes
	/// precedence over `href`. Malformed or negative lengths move the node to [`NodeState::Failed`].
	pub fn apply_attributes<'a>(&mut self, attributes: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<(), ImageError> {
		if !matches!(self.state, NodeState::Unbound) {
			return Err(ImageError::parse(format!("image attributes bound twice (node is {})", self.state.as_str())));
		}

		let mut geometry = Geometry::default();
		let mut xlink_href = None;
		let mut href = None;
		let mut aspect_ratio = None;
		let mut first_error = None;

		for (name, value) in attributes {
			let target = match name {
				"x" => Some((&mut geometry.x, Orientation::Horizontal)),
				"y" => Some((&mut geometry.y, Orientation::Vertical)),
				"width" => Some((&mut geometry.width, Orientation::Horizontal)),
				"height" => Some((&mut geometry.height, Orientation::Vertical)),
				"xlink:href" => {
					xlink_href = Some(value);
					None
				}
				"href" => {
					href = Some(value);
					None
				}
				"preserveAspectRatio" => {
					aspect_ratio = Some(value);
					None
				}
				_ => None,
			};
			if let Some((slot, orientation)) = target {
				match Length::parse(value, orientation) {
					Ok(length) => *slot = length,
					Err(err) => {
						first_error.get_or_insert(err);
					}
				}
			}
		}

		self.geometry = geometry;
		self.reference = xlink_href.or(href).unwrap_or_default().to_string();
		self.aspect_ratio = aspect_ratio.unwrap_or(DEFAULT_ASPECT_RATIO).to_string();

		if first_error.is_none() && (geometry.width.is_negative() || geometry.height.is_negative()) {
			first_error = Some(ImageError::parse(format!(
				"negative image size {}x{}",
				geometry.width, geometry.height
			)));
		}

		if let Some(err) = first_error {
			log::warn!("image {:?} failed to bind: {err}", self.reference);
			self.state = NodeState::Failed(err.clone());
			return Err(err);
		}
		self.state = NodeState::Bound;
		Ok(())
	}

	pub fn geometry(&self) -> &Geometry {
		&self.geometry
	}

	pub fn reference(&self) -> &str {
		&self.reference
	}

	/// The `preserveAspectRatio` value. Stored, but not applied to the placement.
	pub fn aspect_ratio(&self) -> &str {
		&self.aspect_ratio
	}

	pub fn state(&self) -> &NodeState {
		&self.state
	}

	/// The cached pixels, once a render has decoded them.
	pub fn pixels(&self) -> Option<&PixelBuffer> {
		match &self.state {
			NodeState::Decoded(buffer) => Some(buffer),
			_ => None,
		}
	}

	/// Decodes the image on first use and hands it to `engine`.
	pub fn render(&mut self, loader: &dyn ImageLoader, engine: &mut dyn RenderEngine) -> Result<(), ImageError> {
		match &self.state {
			NodeState::Unbound => return Err(ImageError::parse("image rendered before its attributes were bound")),
			NodeState::Failed(err) => return Err(err.clone()),
			NodeState::Bound | NodeState::Decoded(_) => {}
		}

		if self.geometry.is_zero_area() {
			log::trace!("skipping zero-area image {:?}", self.reference);
			return Ok(());
		}

		if matches!(self.state, NodeState::Bound) {
			match loader.load(&self.reference) {
				Ok(buffer) => self.state = NodeState::Decoded(buffer),
				Err(err) => {
					log::warn!("image {:?} failed to decode: {err}", self.reference);
					self.state = NodeState::Failed(err.clone());
					return Err(err);
				}
			}
		} else {
			log::debug!("reusing decoded image {:?}", self.reference);
		}

		match &self.state {
			NodeState::Decoded(buffer) => engine.render_image(buffer, &self.geometry),
			_ => Ok(()),
		}
	}
}

impl Default for ImageNode {
	fn default() -> Self {
		Self::new()
	}
}
