//! EIP-55 address validation and checksumming.

use alloy_primitives::Address;
use evmkit_core::hexstr;
use serde::Serialize;

/// Result of [`analyze_address`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressReport {
    pub input: String,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    /// Whether the input already equals its checksummed form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_checksummed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Validate an address and compute its EIP-55 checksum.
///
/// `0x` is optional. All-lowercase and all-uppercase bodies are accepted as
/// is; a mixed-case body must match its checksum exactly.
pub fn analyze_address(input: &str) -> AddressReport {
    let trimmed = input.trim();
    let invalid = |reason: &str| AddressReport {
        input: trimmed.to_string(),
        is_valid: false,
        error: Some(reason.to_string()),
        ..AddressReport::default()
    };

    if trimmed.is_empty() {
        return invalid("enter an address");
    }
    let body = hexstr::strip_0x(trimmed);
    if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return invalid("expected 20 bytes of hex (40 characters)");
    }
    let Ok(bytes) = hexstr::decode_hex(body) else {
        return invalid("expected 20 bytes of hex (40 characters)");
    };
    let checksum = Address::from_slice(&bytes).to_checksum(None);

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && body != &checksum[2..] {
        return invalid("bad address checksum");
    }

    AddressReport {
        input: trimmed.to_string(),
        is_valid: true,
        already_checksummed: Some(trimmed == checksum),
        checksum: Some(checksum),
        error: None,
    }
}
