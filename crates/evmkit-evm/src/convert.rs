//! Text ↔ hex and decimal ↔ hex conversion.
//!
//! Blank input always produces an empty result rather than an error.
//! Numbers are capped at 256 bits.

use alloy_primitives::U256;
use evmkit_core::{
    error::{ConvertError, HexError},
    hexstr,
};
use serde::Serialize;

/// Bytes viewed as hex and, when they decode, as UTF-8 text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HexConversion {
    pub hex: String,
    pub text: String,
    pub byte_length: usize,
}

/// A non-negative integer in both bases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NumberConversion {
    pub decimal: String,
    pub hex: String,
}

/// UTF-8 bytes of `text` as `0x` hex. Text is used verbatim.
pub fn text_to_hex(text: &str) -> HexConversion {
    if text.is_empty() {
        return HexConversion::default();
    }
    HexConversion {
        hex: hexstr::encode_hex(text.as_bytes()),
        text: text.to_string(),
        byte_length: text.len(),
    }
}

/// Decode hex to UTF-8 text. `0x` alone decodes to empty text.
pub fn hex_to_text(hex: &str) -> Result<HexConversion, ConvertError> {
    if hex.trim().is_empty() {
        return Ok(HexConversion::default());
    }
    let bytes = hexstr::decode_hex(hex)?;
    let text = String::from_utf8(bytes.clone()).map_err(|e| ConvertError::Utf8(e.to_string()))?;
    Ok(HexConversion {
        hex: hexstr::encode_hex(&bytes),
        text,
        byte_length: bytes.len(),
    })
}

/// Byte length of a hex string.
pub fn hex_byte_length(hex: &str) -> Result<usize, ConvertError> {
    Ok(hexstr::decode_hex(hex)?.len())
}

/// Decimal digits → `0x` hex (lowercase, no padding).
pub fn decimal_to_hex(decimal: &str) -> Result<NumberConversion, ConvertError> {
    let trimmed = decimal.trim();
    if trimmed.is_empty() {
        return Ok(NumberConversion::default());
    }
    if trimmed.starts_with('-') {
        return Err(ConvertError::Negative);
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConvertError::InvalidNumber {
            input: trimmed.to_string(),
        });
    }
    let value = U256::from_str_radix(trimmed, 10).map_err(|_| ConvertError::Overflow)?;
    Ok(NumberConversion {
        decimal: value.to_string(),
        hex: format!("{value:#x}"),
    })
}

/// `0x` hex (prefix optional, whitespace ignored) → decimal digits.
pub fn hex_to_decimal(hex: &str) -> Result<NumberConversion, ConvertError> {
    if hex.trim().is_empty() {
        return Ok(NumberConversion::default());
    }
    let cleaned = hexstr::strip_whitespace(hex);
    let body = hexstr::strip_0x(&cleaned);
    if body.is_empty() {
        return Err(HexError::Empty.into());
    }
    if !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(HexError::NotHex {
            input: hex.to_string(),
        }
        .into());
    }
    let value = U256::from_str_radix(body, 16).map_err(|_| ConvertError::Overflow)?;
    Ok(NumberConversion {
        decimal: value.to_string(),
        hex: format!("{value:#x}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_round_trip_through_hex() {
        let h = text_to_hex("hi ✓");
        assert_eq!(h.hex, "0x686920e29c93");
        assert_eq!(h.byte_length, 6);
        assert_eq!(hex_to_text(&h.hex).unwrap().text, "hi ✓");
    }

    #[test]
    fn bare_prefix_is_empty_text() {
        let h = hex_to_text("0x").unwrap();
        assert_eq!(h.text, "");
        assert_eq!(h.byte_length, 0);
    }

    #[test]
    fn invalid_utf8_and_odd_hex() {
        assert!(matches!(hex_to_text("0xff"), Err(ConvertError::Utf8(_))));
        assert!(matches!(
            hex_to_text("0xabc"),
            Err(ConvertError::Hex(HexError::OddLength { digits: 3 }))
        ));
        assert_eq!(hex_byte_length("0x dead beef").unwrap(), 4);
    }

    #[test]
    fn decimal_and_hex_numbers() {
        assert_eq!(
            decimal_to_hex("255").unwrap(),
            NumberConversion {
                decimal: "255".into(),
                hex: "0xff".into()
            }
        );
        assert_eq!(hex_to_decimal("0xFF").unwrap().decimal, "255");
        assert_eq!(hex_to_decimal("ff").unwrap().hex, "0xff");
        assert_eq!(decimal_to_hex("0").unwrap().hex, "0x0");
    }

    #[test]
    fn number_errors() {
        assert_eq!(decimal_to_hex("-1"), Err(ConvertError::Negative));
        assert!(matches!(decimal_to_hex("1.5"), Err(ConvertError::InvalidNumber { .. })));
        assert_eq!(decimal_to_hex(&"9".repeat(80)), Err(ConvertError::Overflow));
        assert!(matches!(hex_to_decimal("0x"), Err(ConvertError::Hex(HexError::Empty))));
        assert!(matches!(hex_to_decimal("0xgg"), Err(ConvertError::Hex(HexError::NotHex { .. }))));
        assert_eq!(decimal_to_hex(" ").unwrap(), NumberConversion::default());
    }
}
