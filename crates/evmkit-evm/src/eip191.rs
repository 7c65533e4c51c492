//! EIP-191 personal-message hashing (`personal_sign`) and verification.
//!
//! digest = keccak256("\x19Ethereum Signed Message:\n" ++ len(message) ++ message)
//! where `len` is the decimal byte length.

use alloy_primitives::eip191_hash_message;
use evmkit_core::{
    error::{HexError, SignatureError},
    hexstr,
};
use serde::Serialize;

use crate::signature::{RecoverableSignature, Verification};

/// How the message text is turned into bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageInput<'a> {
    /// UTF-8 bytes of the trimmed text.
    Text(&'a str),
    /// Hex-decoded bytes (`0x` optional, whitespace ignored).
    Hex(&'a str),
}

impl MessageInput<'_> {
    /// Message bytes, or `None` when the input is blank. A bare `0x` counts
    /// as blank in hex mode.
    pub fn to_bytes(&self) -> Result<Option<Vec<u8>>, HexError> {
        match self {
            MessageInput::Text(text) => {
                let trimmed = text.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.as_bytes().to_vec()))
            }
            MessageInput::Hex(hex) => {
                if hexstr::strip_0x(&hexstr::strip_whitespace(hex)).is_empty() {
                    return Ok(None);
                }
                hexstr::decode_hex(hex).map(Some)
            }
        }
    }
}

/// The EIP-191 digest of `message`.
pub fn hash_message(message: &[u8]) -> [u8; 32] {
    eip191_hash_message(message).0
}

/// Hash output for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip191Hash {
    /// Empty when the input was blank.
    pub digest: String,
    pub byte_length: usize,
    /// The hashed message bytes as `0x` hex.
    pub message_bytes: String,
}

/// Hash a personal message. Blank input yields an empty result, not an error.
pub fn compute_eip191_hash(input: MessageInput<'_>) -> Result<Eip191Hash, HexError> {
    let Some(bytes) = input.to_bytes()? else {
        return Ok(Eip191Hash::default());
    };
    Ok(Eip191Hash {
        digest: hexstr::encode_hex(hash_message(&bytes)),
        byte_length: bytes.len(),
        message_bytes: hexstr::encode_hex(&bytes),
    })
}

/// Recover the signer of a personal message and optionally compare it to
/// `expected`. The digest is always re-derived from `input`.
pub fn verify_eip191_signature(
    input: MessageInput<'_>,
    signature: &str,
    expected: Option<&str>,
) -> Result<Verification, SignatureError> {
    let signature = RecoverableSignature::from_hex(signature)?;
    let bytes = input
        .to_bytes()
        .map_err(|e| SignatureError::format("message", e))?
        .ok_or_else(|| SignatureError::format("message", "message is empty"))?;
    let recovered = signature.recover_address(&hash_message(&bytes))?;
    Ok(Verification::new(recovered, expected))
}
