//! The keccak256 tool: hash text or hex input.

use std::str::FromStr;

use evmkit_core::{error::HexError, hexstr, keccak256};
use serde::{Deserialize, Serialize};

/// How the input string is turned into bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashMode {
    /// UTF-8 bytes of the input.
    #[default]
    Text,
    /// Hex-decoded bytes.
    Hex,
}

impl FromStr for HashMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "utf8" => Ok(HashMode::Text),
            "hex" => Ok(HashMode::Hex),
            other => Err(format!("unknown hash mode '{other}' (expected text or hex)")),
        }
    }
}

/// Keccak256 of `input` as `0x` hex; empty string for blank input.
///
/// In hex mode `remove_whitespace` strips spaces and newlines before
/// decoding and `0x` alone hashes to nothing (empty result). In text mode
/// the input is hashed as typed, including surrounding whitespace.
pub fn compute_keccak(input: &str, mode: HashMode, remove_whitespace: bool) -> Result<String, HexError> {
    if input.trim().is_empty() {
        return Ok(String::new());
    }
    let bytes = match mode {
        HashMode::Text => input.as_bytes().to_vec(),
        HashMode::Hex => {
            let source = if remove_whitespace {
                hexstr::strip_whitespace(input)
            } else {
                let trimmed = input.trim();
                if trimmed.chars().any(char::is_whitespace) {
                    return Err(HexError::NotHex {
                        input: input.to_string(),
                    });
                }
                trimmed.to_string()
            };
            let normalized = hexstr::normalize_0x(&source);
            if normalized == "0x" {
                return Ok(String::new());
            }
            hexstr::decode_hex_strict(&normalized, None)?
        }
    };
    Ok(hexstr::encode_hex(keccak256(bytes)))
}
