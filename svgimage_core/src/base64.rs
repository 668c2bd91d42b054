//! Lenient base64 decoding for `data:` payloads.
//!
//! Payloads embedded in markup are frequently wrapped, indented, or carry stray padding, so
//! whitespace and `=` are skipped wherever they appear. Anything else outside the standard
//! alphabet rejects the whole payload: the decoder never returns a partial result.

const INVALID: u8 = 0xff;

static REVERSE: [u8; 256] = {
	let mut table = [INVALID; 256];
	let mut i = 0;
	while i < 26 {
		table[b'A' as usize + i] = i as u8;
		table[b'a' as usize + i] = 26 + i as u8;
		i += 1;
	}
	let mut i = 0;
	while i < 10 {
		table[b'0' as usize + i] = 52 + i as u8;
		i += 1;
	}
	table[b'+' as usize] = 62;
	table[b'/' as usize] = 63;
	table
};

/// Whitespace as understood by C's `isspace`, which includes vertical tab.
fn is_skippable(byte: u8) -> bool {
	byte.is_ascii_whitespace() || byte == 0x0b || byte == b'='
}

/// Decodes `input` with the standard alphabet.
///
/// Returns an empty vector if `input` contains any byte that is neither whitespace, `=`, nor a
/// base64 symbol, and also if `input` holds no symbols at all. Callers must treat an empty result
/// as a failed decode.
pub fn decode_lenient(input: &[u8]) -> Vec<u8> {
	let mut output = Vec::with_capacity(input.len() / 4 * 3 + 3);
	let mut accumulator: u32 = 0;
	let mut bits: u32 = 0;

	for &byte in input {
		if is_skippable(byte) {
			continue;
		}
		let value = REVERSE[byte as usize];
		if value == INVALID {
			log::trace!("base64 payload rejected at byte {byte:#04x}");
			return Vec::new();
		}
		accumulator = ((accumulator << 6) | u32::from(value)) & 0x3fff;
		bits += 6;
		if bits >= 8 {
			bits -= 8;
			output.push((accumulator >> bits) as u8);
		}
	}

	output
}
