//! String formatting helpers for hex values and log output.

/// Shortens a hash or address for log fields.
///
/// Keeps the first 10 characters (`0x` plus 8 digits) of longer strings.
pub fn truncate_id(id: &str) -> String {
	match id.char_indices().nth(10) {
		Some((cut, _)) => format!("{}..", &id[..cut]),
		None => id.to_string(),
	}
}

/// Adds a `0x` prefix unless one is already present.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.starts_with("0x") || hex_str.starts_with("0X") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Strips a leading `0x` or `0X`, if any.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_truncate_id() {
		assert_eq!(truncate_id("0x12345678"), "0x12345678");
		assert_eq!(
			truncate_id("0x4e3a3754410177e6937ef1f84bba68ea139e8d1a2258c5f85db9f1cd715a1bdd"),
			"0x4e3a3754.."
		);
	}

	#[test]
	fn test_truncate_id_counts_characters() {
		assert_eq!(truncate_id("ééééééééééé"), "éééééééééé..");
		assert_eq!(truncate_id("0x1234567€"), "0x1234567€");
		assert_eq!(truncate_id("0x12345678€"), "0x12345678..");
	}

	#[test]
	fn test_prefix_helpers() {
		assert_eq!(with_0x_prefix("bb8"), "0xbb8");
		assert_eq!(with_0x_prefix("0xbb8"), "0xbb8");
		assert_eq!(with_0x_prefix("0Xbb8"), "0Xbb8");
		assert_eq!(without_0x_prefix("0xbb8"), "bb8");
		assert_eq!(without_0x_prefix("0Xbb8"), "bb8");
		assert_eq!(without_0x_prefix("bb8"), "bb8");
		assert_eq!(without_0x_prefix("0x"), "");
	}
}
