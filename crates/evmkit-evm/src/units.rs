//! Ether denomination conversion (wei / gwei / ether).
//!
//! Scaling and formatting go through `alloy_primitives::utils`; this module
//! adds input validation (no silent truncation, no wrapping) and the display
//! rule of keeping at least one fractional digit.

use std::{fmt, str::FromStr};

use alloy_primitives::{
    utils::{ParseUnits, Unit as AlloyUnit},
    U256,
};
use evmkit_core::{error::ConvertError, hexstr};
use serde::{Deserialize, Serialize};

/// A denomination and its number of decimals relative to wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Wei,
    Gwei,
    Ether,
}

impl Unit {
    fn alloy(self) -> AlloyUnit {
        match self {
            Unit::Wei => AlloyUnit::WEI,
            Unit::Gwei => AlloyUnit::GWEI,
            Unit::Ether => AlloyUnit::ETHER,
        }
    }

    pub fn decimals(self) -> usize {
        usize::from(self.alloy().get())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Unit::Wei => "wei",
            Unit::Gwei => "gwei",
            Unit::Ether => "ether",
        })
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wei" => Ok(Unit::Wei),
            "gwei" => Ok(Unit::Gwei),
            "ether" | "eth" => Ok(Unit::Ether),
            other => Err(format!("unknown unit '{other}' (expected wei, gwei or ether)")),
        }
    }
}

/// One amount rendered in every unit. All fields are empty for blank input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitValues {
    pub wei: String,
    pub gwei: String,
    pub ether: String,
}

impl UnitValues {
    fn from_wei(wei: U256) -> Self {
        Self {
            wei: wei.to_string(),
            gwei: format_units(wei, Unit::Gwei),
            ether: format_units(wei, Unit::Ether),
        }
    }
}

/// Convert `raw` expressed in `unit` to all units.
///
/// `raw` is a non-negative decimal (`1.5`) or a `0x` hex integer. Hex input
/// is read as wei when `treat_hex_as_wei` is set or the unit is wei;
/// otherwise its integer value is scaled by the unit.
pub fn convert_units(raw: &str, unit: Unit, treat_hex_as_wei: bool) -> Result<UnitValues, ConvertError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(UnitValues::default());
    }
    if trimmed.starts_with('-') {
        return Err(ConvertError::Negative);
    }

    let wei = if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        let value = parse_hex_integer(trimmed)?;
        if treat_hex_as_wei || unit == Unit::Wei {
            value
        } else {
            value
                .checked_mul(unit.alloy().wei())
                .ok_or(ConvertError::Overflow)?
        }
    } else {
        parse_units(trimmed, unit)?
    };
    Ok(UnitValues::from_wei(wei))
}

/// Parse a decimal amount in `unit` to wei.
pub fn parse_units(text: &str, unit: Unit) -> Result<U256, ConvertError> {
    let invalid = || ConvertError::InvalidNumber {
        input: text.to_string(),
    };
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) if !f.is_empty() => (w, f),
        Some(_) => return Err(invalid()),
        None => (text, ""),
    };
    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() || !digits_only(whole) || !digits_only(fraction) {
        return Err(invalid());
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > unit.decimals() {
        return Err(ConvertError::TooManyDecimals {
            unit: unit.to_string(),
            max: unit.decimals(),
        });
    }
    // alloy scales with wrapping arithmetic
    U256::from_str_radix(whole, 10)
        .ok()
        .and_then(|w| w.checked_mul(unit.alloy().wei()))
        .ok_or(ConvertError::Overflow)?;

    let normalized = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    };
    match ParseUnits::parse_units(&normalized, unit.alloy()) {
        Ok(ParseUnits::U256(wei)) => Ok(wei),
        Ok(ParseUnits::I256(_)) => Err(ConvertError::Negative),
        Err(_) => Err(ConvertError::Overflow),
    }
}

/// Format wei in `unit`, trimming trailing zeros but always keeping at least
/// one fractional digit (`1.0`, `0.5`).
pub fn format_units(wei: U256, unit: Unit) -> String {
    let formatted = ParseUnits::U256(wei).format_units(unit.alloy());
    let Some((whole, fraction)) = formatted.split_once('.') else {
        return formatted;
    };
    let fraction = fraction.trim_end_matches('0');
    let fraction = if fraction.is_empty() { "0" } else { fraction };
    format!("{whole}.{fraction}")
}

fn parse_hex_integer(text: &str) -> Result<U256, ConvertError> {
    let cleaned = hexstr::strip_whitespace(text);
    let body = hexstr::strip_0x(&cleaned);
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConvertError::InvalidNumber {
            input: text.to_string(),
        });
    }
    U256::from_str_radix(body, 16).map_err(|_| ConvertError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(wei: &str, gwei: &str, ether: &str) -> UnitValues {
        UnitValues {
            wei: wei.into(),
            gwei: gwei.into(),
            ether: ether.into(),
        }
    }

    #[test]
    fn one_and_a_half_ether() {
        assert_eq!(
            convert_units("1.5", Unit::Ether, false).unwrap(),
            values("1500000000000000000", "1500000000.0", "1.5")
        );
    }

    #[test]
    fn gwei_input() {
        assert_eq!(
            convert_units("21", Unit::Gwei, false).unwrap(),
            values("21000000000", "21.0", "0.000000021")
        );
    }

    #[test]
    fn hex_is_wei_when_asked() {
        assert_eq!(
            convert_units("0x3b9aca00", Unit::Ether, true).unwrap(),
            values("1000000000", "1.0", "0.000000001")
        );
        // without the flag the hex integer is scaled by the unit
        assert_eq!(
            convert_units("0x1", Unit::Ether, false).unwrap().wei,
            "1000000000000000000"
        );
    }

    #[test]
    fn blank_is_empty_result() {
        assert_eq!(convert_units("  ", Unit::Wei, false).unwrap(), UnitValues::default());
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(convert_units("-1", Unit::Wei, false), Err(ConvertError::Negative));
        assert!(matches!(
            convert_units("1.2.3", Unit::Ether, false),
            Err(ConvertError::InvalidNumber { .. })
        ));
        assert!(matches!(
            convert_units("1.", Unit::Ether, false),
            Err(ConvertError::InvalidNumber { .. })
        ));
        assert_eq!(
            convert_units("0.5", Unit::Wei, false),
            Err(ConvertError::TooManyDecimals {
                unit: "wei".into(),
                max: 0
            })
        );
        assert!(matches!(
            convert_units("0xzz", Unit::Wei, false),
            Err(ConvertError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn trailing_zero_decimals_are_fine() {
        assert_eq!(convert_units("2.000", Unit::Wei, false).unwrap().wei, "2");
    }

    #[test]
    fn format_zero_and_small_values() {
        assert_eq!(format_units(U256::ZERO, Unit::Ether), "0.0");
        assert_eq!(format_units(U256::from(1u8), Unit::Ether), "0.000000000000000001");
        assert_eq!(format_units(U256::from(10u8).pow(U256::from(18)), Unit::Ether), "1.0");
        assert_eq!(format_units(U256::from(1_500_000_000u64), Unit::Gwei), "1.5");
    }

    #[test]
    fn amounts_past_256_bits_overflow() {
        let huge = "1".repeat(70);
        assert_eq!(convert_units(&huge, Unit::Ether, false), Err(ConvertError::Overflow));
        assert_eq!(
            convert_units(&format!("0x{}", "f".repeat(64)), Unit::Gwei, false),
            Err(ConvertError::Overflow)
        );
    }

    #[test]
    fn decimals_follow_alloy_units() {
        assert_eq!(Unit::Wei.decimals(), 0);
        assert_eq!(Unit::Gwei.decimals(), 9);
        assert_eq!(Unit::Ether.decimals(), 18);
    }

    #[test]
    fn unit_names_parse() {
        assert_eq!("ETH".parse::<Unit>().unwrap(), Unit::Ether);
        assert!("finney".parse::<Unit>().is_err());
    }
}
