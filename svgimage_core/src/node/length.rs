use crate::ImageError;
use std::fmt::{Display, Formatter};

/// Axis a length is measured along, needed to resolve percentages.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
	Horizontal,
	Vertical,
	#[default]
	Other,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LengthUnit {
	#[default]
	Px,
	Pt,
	Pc,
	Cm,
	Mm,
	In,
	Em,
	Ex,
	Percent,
}

impl LengthUnit {
	const ALL: [LengthUnit; 9] = [
		LengthUnit::Px,
		LengthUnit::Pt,
		LengthUnit::Pc,
		LengthUnit::Cm,
		LengthUnit::Mm,
		LengthUnit::In,
		LengthUnit::Em,
		LengthUnit::Ex,
		LengthUnit::Percent,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			LengthUnit::Px => "px",
			LengthUnit::Pt => "pt",
			LengthUnit::Pc => "pc",
			LengthUnit::Cm => "cm",
			LengthUnit::Mm => "mm",
			LengthUnit::In => "in",
			LengthUnit::Em => "em",
			LengthUnit::Ex => "ex",
			LengthUnit::Percent => "%",
		}
	}

	fn from_suffix(suffix: &str) -> Option<Self> {
		if suffix.is_empty() {
			return Some(LengthUnit::Px);
		}
		Self::ALL.into_iter().find(|unit| unit.as_str() == suffix)
	}
}

/// A length as written in markup. Unit conversion is left to the rendering engine.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Length {
	pub value: f64,
	pub unit: LengthUnit,
	pub orientation: Orientation,
}

impl Length {
	pub fn new(value: f64, unit: LengthUnit, orientation: Orientation) -> Self {
		Self {
			value,
			unit,
			orientation,
		}
	}

	pub fn zero(orientation: Orientation) -> Self {
		Self::new(0.0, LengthUnit::Px, orientation)
	}

	/// Parses a number with an optional unit suffix, e.g. `12`, `-1.5e2mm`, `50%`.
	///
	/// Surrounding whitespace is ignored; a missing unit means user units (`px`).
	pub fn parse(text: &str, orientation: Orientation) -> Result<Self, ImageError> {
		let trimmed = text.trim();
		let split = number_len(trimmed.as_bytes());
		let (number, suffix) = trimmed.split_at(split);

		let value: f64 = number
			.parse()
			.map_err(|_| ImageError::parse(format!("invalid length {text:?}")))?;
		if !value.is_finite() {
			return Err(ImageError::parse(format!("length {text:?} is out of range")));
		}
		let unit =
			LengthUnit::from_suffix(suffix).ok_or_else(|| ImageError::parse(format!("unknown unit in length {text:?}")))?;

		Ok(Self::new(value, unit, orientation))
	}

	pub fn is_zero(&self) -> bool {
		self.value == 0.0
	}

	pub fn is_negative(&self) -> bool {
		self.value < 0.0
	}
}

impl Display for Length {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}{}", self.value, self.unit.as_str())
	}
}

/// Length of the leading floating point number in `bytes`.
///
/// An `e` only starts an exponent when digits follow, so `2em` ends the number before the unit.
fn number_len(bytes: &[u8]) -> usize {
	let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

	let mut i = 0;
	if matches!(bytes.first(), Some(b'+' | b'-')) {
		i += 1;
	}
	i += digits(i);
	if bytes.get(i) == Some(&b'.') {
		i += 1;
		i += digits(i);
	}
	if matches!(bytes.get(i), Some(b'e' | b'E')) {
		let mut j = i + 1;
		if matches!(bytes.get(j), Some(b'+' | b'-')) {
			j += 1;
		}
		let exponent = digits(j);
		if exponent > 0 {
			i = j + exponent;
		}
	}
	i
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("0", 0.0, LengthUnit::Px)]
	#[case("12", 12.0, LengthUnit::Px)]
	#[case(" 12px ", 12.0, LengthUnit::Px)]
	#[case("-3.5pt", -3.5, LengthUnit::Pt)]
	#[case("+.5in", 0.5, LengthUnit::In)]
	#[case("4.", 4.0, LengthUnit::Px)]
	#[case("1e2mm", 100.0, LengthUnit::Mm)]
	#[case("1E-1cm", 0.1, LengthUnit::Cm)]
	#[case("2em", 2.0, LengthUnit::Em)]
	#[case("2ex", 2.0, LengthUnit::Ex)]
	#[case("3e1em", 30.0, LengthUnit::Em)]
	#[case("6pc", 6.0, LengthUnit::Pc)]
	#[case("50%", 50.0, LengthUnit::Percent)]
	fn parses(#[case] text: &str, #[case] value: f64, #[case] unit: LengthUnit) {
		let length = Length::parse(text, Orientation::Vertical).unwrap();
		assert_eq!(length, Length::new(value, unit, Orientation::Vertical));
	}

	#[rstest]
	#[case::empty("")]
	#[case::blank("  ")]
	#[case::unit_only("px")]
	#[case::unknown_unit("12qq")]
	#[case::uppercase_unit("12PX")]
	#[case::inner_space("12 px")]
	#[case::sign_only("-")]
	#[case::overflow("1e999")]
	#[case::dangling_exponent("1e")]
	fn rejects(#[case] text: &str) {
		assert!(Length::parse(text, Orientation::Horizontal).is_err(), "{text:?} parsed");
	}

	#[test]
	fn predicates_and_display() {
		let length = Length::parse("-2mm", Orientation::Other).unwrap();
		assert!(length.is_negative());
		assert!(!length.is_zero());
		assert_eq!(length.to_string(), "-2mm");
		assert!(Length::zero(Orientation::Horizontal).is_zero());
	}
}
