// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret wrapper type that prevents accidental logging of sensitive values.
//!
//! [`SecretString`] holds API keys and bearer tokens. Its `Debug` and
//! `Display` implementations print `[REDACTED]`, so a secret can only leak
//! through an explicit call to [`SecretString::expose`]. The inner value is
//! zeroized when the wrapper is dropped.

use zeroize::Zeroize;

/// A string whose value is hidden from `Debug`/`Display` output.
///
/// # Example
///
/// ```
/// use roster_common_secret::SecretString;
///
/// let key = SecretString::new("service-role-key".to_string());
/// assert_eq!(format!("{key:?}"), "SecretString([REDACTED])");
/// assert_eq!(key.expose(), "service-role-key");
/// ```
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
	/// Wrap a sensitive value.
	pub fn new(value: String) -> Self {
		Self(value)
	}

	/// Access the underlying value.
	///
	/// Call sites of this method are the audit surface for secret handling;
	/// never pass the result to a logging macro.
	pub fn expose(&self) -> &String {
		&self.0
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

impl std::fmt::Debug for SecretString {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("SecretString([REDACTED])")
	}
}

impl std::fmt::Display for SecretString {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("[REDACTED]")
	}
}

impl Drop for SecretString {
	fn drop(&mut self) {
		self.0.zeroize();
	}
}

#[cfg(feature = "serde")]
impl serde::Serialize for SecretString {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(&self.0)
	}
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SecretString {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		String::deserialize(deserializer).map(SecretString::new)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn debug_output_is_redacted() {
		let secret = SecretString::new("super_secret_value".to_string());
		let debug = format!("{secret:?}");
		assert!(!debug.contains("super_secret_value"));
		assert!(debug.contains("[REDACTED]"));
	}

	#[test]
	fn display_output_is_redacted() {
		let secret = SecretString::new("super_secret_value".to_string());
		assert_eq!(secret.to_string(), "[REDACTED]");
	}

	#[test]
	fn expose_returns_inner_value() {
		let secret = SecretString::new("value".to_string());
		assert_eq!(secret.expose(), "value");
	}

	#[test]
	fn nested_debug_is_redacted() {
		#[derive(Debug)]
		#[allow(dead_code)]
		struct Config {
			api_key: SecretString,
		}

		let config = Config {
			api_key: SecretString::new("key-123".to_string()),
		};
		let debug = format!("{config:?}");
		assert!(!debug.contains("key-123"));
		assert!(debug.contains("[REDACTED]"));
	}

	#[cfg(feature = "serde")]
	#[test]
	fn serde_roundtrips_plain_string() {
		let secret = SecretString::new("token-abc".to_string());
		let json = serde_json::to_string(&secret).unwrap();
		assert_eq!(json, "\"token-abc\"");

		let back: SecretString = serde_json::from_str(&json).unwrap();
		assert_eq!(back.expose(), "token-abc");
	}
}

#[cfg(test)]
mod proptests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		/// The inner value must never appear in Debug output, whatever it is.
		#[test]
		fn secret_never_in_debug(value in "[a-zA-Z0-9_-]{5,64}") {
			prop_assume!(!value.contains("REDACTED"));

			let secret = SecretString::new(value.clone());
			let debug = format!("{secret:?}");
			prop_assert!(!debug.contains(&value));
		}

		/// Display output is constant regardless of the inner value.
		#[test]
		fn display_is_constant(value in "\\PC{0,64}") {
			let secret = SecretString::new(value);
			prop_assert_eq!(secret.to_string(), "[REDACTED]");
		}

		/// expose() always returns exactly what was stored.
		#[test]
		fn expose_roundtrips(value in "\\PC{0,64}") {
			let secret = SecretString::new(value.clone());
			prop_assert_eq!(secret.expose(), &value);
		}
	}
}
