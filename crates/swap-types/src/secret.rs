//! Redacting wrapper for signing key material.
//!
//! Keys loaded from configuration are held in zeroizing memory and never
//! printed: `Debug`, `Display` and `Serialize` all emit a placeholder.

use crate::utils::without_0x_prefix;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroizing;

const REDACTED: &str = "***REDACTED***";

/// Hex-encoded secp256k1 private key.
#[derive(Clone)]
pub struct SecretKey(Zeroizing<String>);

impl SecretKey {
	pub fn new(key: impl Into<String>) -> Self {
		Self(Zeroizing::new(key.into()))
	}

	/// Gives `f` scoped access to the key text.
	pub fn with_exposed<F, R>(&self, f: F) -> R
	where
		F: FnOnce(&str) -> R,
	{
		f(&self.0)
	}

	/// True when the key is 32 bytes of hex, with or without `0x`.
	pub fn is_well_formed(&self) -> bool {
		let digits = without_0x_prefix(&self.0);
		digits.len() == 64 && digits.chars().all(|c| c.is_ascii_hexdigit())
	}
}

impl fmt::Debug for SecretKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SecretKey({})", REDACTED)
	}
}

impl fmt::Display for SecretKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl Serialize for SecretKey {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(REDACTED)
	}
}

impl<'de> Deserialize<'de> for SecretKey {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		String::deserialize(deserializer).map(SecretKey::new)
	}
}
