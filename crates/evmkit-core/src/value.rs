//! Typed values ready for ABI encoding, and the integer literal they carry.

use alloy_primitives::{Address, U256};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A value whose shape mirrors a [`TypeDescriptor`](crate::types::TypeDescriptor).
///
/// `Int` serves both `intN` and `uintN`; `Bytes` serves `bytes`, `bytesN`
/// and `function`. Arrays and tuples are ordered sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Address(Address),
    Bool(bool),
    Int(Integer),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<AbiValue>),
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    /// Family name for shape-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            AbiValue::Address(_) => "address",
            AbiValue::Bool(_) => "bool",
            AbiValue::Int(_) => "integer",
            AbiValue::Bytes(_) => "bytes",
            AbiValue::String(_) => "string",
            AbiValue::Array(_) => "array",
            AbiValue::Tuple(_) => "tuple",
        }
    }
}

impl fmt::Display for AbiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiValue::Address(a) => write!(f, "{}", a.to_checksum(None)),
            AbiValue::Bool(b) => write!(f, "{b}"),
            AbiValue::Int(i) => write!(f, "{i}"),
            AbiValue::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            AbiValue::String(s) => write!(f, "{s}"),
            AbiValue::Array(items) | AbiValue::Tuple(items) => {
                let parts: Vec<_> = items.iter().map(|x| x.to_string()).collect();
                if matches!(self, AbiValue::Array(_)) {
                    write!(f, "[{}]", parts.join(", "))
                } else {
                    write!(f, "({})", parts.join(", "))
                }
            }
        }
    }
}

/// An arbitrary-precision integer literal.
///
/// Stored as a sign and a canonical decimal digit string (no leading zeros,
/// no negative zero), so any `^-?\d+$` input parses regardless of size.
/// Range checks against a declared bit width happen at encode time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Integer {
    negative: bool,
    digits: String,
}

/// Input did not match `^-?\d+$`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidInteger;

impl fmt::Display for InvalidInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "only integer literals are allowed")
    }
}

impl std::error::Error for InvalidInteger {}

impl FromStr for Integer {
    type Err = InvalidInteger;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidInteger);
        }
        let trimmed = body.trim_start_matches('0');
        let digits = if trimmed.is_empty() { "0" } else { trimmed };
        Ok(Self {
            negative: negative && digits != "0",
            digits: digits.to_string(),
        })
    }
}

impl Integer {
    pub fn zero() -> Self {
        Self {
            negative: false,
            digits: "0".into(),
        }
    }

    /// Build from a sign and a 256-bit magnitude.
    pub fn from_u256(negative: bool, magnitude: U256) -> Self {
        Self {
            negative: negative && !magnitude.is_zero(),
            digits: magnitude.to_string(),
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Decimal digits of the absolute value.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Absolute value, or `None` when it exceeds 256 bits.
    pub fn magnitude(&self) -> Option<U256> {
        U256::from_str_radix(&self.digits, 10).ok()
    }

    /// The 32-byte ABI word for this value as `intN` (`signed`) or `uintN`.
    ///
    /// Returns `None` when the value is out of range for the width.
    pub fn to_word(&self, signed: bool, bits: usize) -> Option<[u8; 32]> {
        let magnitude = self.magnitude()?;
        if !signed {
            if self.negative || magnitude.bit_len() > bits {
                return None;
            }
            return Some(magnitude.to_be_bytes::<32>());
        }
        let limit = U256::from(1u8) << (bits - 1);
        if self.negative {
            if magnitude > limit {
                return None;
            }
            Some(U256::ZERO.wrapping_sub(magnitude).to_be_bytes::<32>())
        } else {
            if magnitude >= limit {
                return None;
            }
            Some(magnitude.to_be_bytes::<32>())
        }
    }

    /// Inverse of [`Integer::to_word`]; `None` when the word is not a
    /// canonical encoding for the width (dirty high bits, bad sign extension).
    pub fn from_word(word: &[u8; 32], signed: bool, bits: usize) -> Option<Self> {
        let raw = U256::from_be_bytes(*word);
        if !signed {
            return (raw.bit_len() <= bits).then(|| Self::from_u256(false, raw));
        }
        let negative = raw.bit(255);
        let magnitude = if negative {
            U256::ZERO.wrapping_sub(raw)
        } else {
            raw
        };
        let limit = U256::from(1u8) << (bits - 1);
        let in_range = if negative {
            magnitude <= limit
        } else {
            magnitude < limit
        };
        in_range.then(|| Self::from_u256(negative, magnitude))
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.digits)
        } else {
            write!(f, "{}", self.digits)
        }
    }
}

impl Serialize for Integer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<u64> for Integer {
    fn from(v: u64) -> Self {
        Self::from_u256(false, U256::from(v))
    }
}

impl From<i64> for Integer {
    fn from(v: i64) -> Self {
        Self::from_u256(v < 0, U256::from(v.unsigned_abs()))
    }
}
