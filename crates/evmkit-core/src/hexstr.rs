//! Hex string normalization.
//!
//! User input arrives with or without `0x`, in either case, and often with
//! stray whitespace from copy/paste. Everything leaving this module is
//! lowercase and `0x`-prefixed.

use crate::error::HexError;

/// Removes every whitespace character (spaces, tabs, newlines).
pub fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Prefixes `0x` when absent. Blank input stays empty.
pub fn normalize_0x(value: &str) -> String {
    if value.trim().is_empty() {
        return String::new();
    }
    if has_0x(value) {
        value.to_string()
    } else {
        format!("0x{value}")
    }
}

/// Returns the hex body without a leading `0x` / `0X`.
pub fn strip_0x(value: &str) -> &str {
    if has_0x(value) {
        &value[2..]
    } else {
        value
    }
}

fn has_0x(value: &str) -> bool {
    value.starts_with("0x") || value.starts_with("0X")
}

/// Lowercase `0x`-prefixed hex of `bytes`.
pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decodes user hex: whitespace stripped, `0x` optional.
///
/// An empty body (`""` or `"0x"`) decodes to no bytes.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, HexError> {
    let cleaned = strip_whitespace(value);
    let body = strip_0x(&cleaned);
    if !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(HexError::NotHex {
            input: value.to_string(),
        });
    }
    if body.len() % 2 != 0 {
        return Err(HexError::OddLength { digits: body.len() });
    }
    hex::decode(body).map_err(|_| HexError::NotHex {
        input: value.to_string(),
    })
}

/// Decodes non-empty user hex; `expected` pins the exact byte length.
pub fn decode_hex_strict(value: &str, expected: Option<usize>) -> Result<Vec<u8>, HexError> {
    let cleaned = strip_whitespace(value);
    let body = strip_0x(&cleaned);
    if body.is_empty() {
        return Err(HexError::Empty);
    }
    if !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(HexError::NotHex {
            input: value.to_string(),
        });
    }
    if let Some(expected) = expected {
        if body.len() != expected * 2 {
            return Err(HexError::WrongLength {
                expected,
                got: body.len(),
            });
        }
    }
    decode_hex(body)
}

/// Validates that `value` is exactly `expected` bytes of hex and returns them.
pub fn validate_hex_length(value: &str, expected: usize) -> Result<Vec<u8>, HexError> {
    decode_hex_strict(value, Some(expected))
}
