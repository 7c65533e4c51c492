//! Error types for the EvmKit parse / encode / decode / hash pipeline.
//!
//! Every public operation reports failure as data. None of these errors is
//! fatal: callers render them next to the input that produced them.

use thiserror::Error;

/// Errors from hex normalization and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("hex value is empty")]
    Empty,

    #[error("not a hex string: {input:?}")]
    NotHex { input: String },

    #[error("hex string has an odd number of digits ({digits})")]
    OddLength { digits: usize },

    #[error("expected {expected} bytes ({} hex characters), got {got} hex characters", .expected * 2)]
    WrongLength { expected: usize, got: usize },
}

/// Malformed user text against the Solidity type grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid type '{ty}': {reason}")]
    InvalidType { ty: String, reason: String },

    #[error("{field}: value is empty")]
    Empty { field: String },

    #[error("{field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("{field}: expected {expected} elements, got {got}")]
    LengthMismatch {
        field: String,
        expected: usize,
        got: usize,
    },

    #[error("invalid function signature '{signature}': {reason}")]
    InvalidSignature { signature: String, reason: String },

    #[error("invalid ABI JSON: {reason}")]
    InvalidAbi { reason: String },
}

/// A parsed value that cannot be put on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("argument count mismatch: signature has {expected}, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("{field}: value {value} does not fit in {ty}")]
    IntegerOverflow {
        field: String,
        value: String,
        ty: String,
    },

    #[error("{field}: expected a value of type {expected}, got {got}")]
    ShapeMismatch {
        field: String,
        expected: String,
        got: String,
    },
}

/// Malformed ABI binary input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid calldata hex: {0}")]
    InvalidHex(#[from] HexError),

    #[error("calldata truncated: need {needed} bytes at offset {offset}, have {available}")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("invalid offset {offset} read at byte {at}")]
    InvalidOffset { at: usize, offset: String },

    #[error("invalid {ty} value at byte {offset}: {reason}")]
    InvalidValue {
        offset: usize,
        ty: String,
        reason: String,
    },

    #[error("selector mismatch: expected {expected}, got {got}")]
    SelectorMismatch { expected: String, got: String },
}

/// Failures of the EIP-712 build and hash stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypedDataError {
    #[error("domain: {0}")]
    DomainParse(String),

    #[error("types: {0}")]
    TypesParse(String),

    #[error("message: {0}")]
    MessageParse(String),

    #[error("primary type: {0}")]
    PrimaryTypeMissing(String),

    #[error("hash: {0}")]
    HashCompute(String),
}

/// Failures of signature parsing and public-key recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("{field}: {reason}")]
    Format { field: String, reason: String },

    #[error("recovery failed: {0}")]
    Recovery(String),
}

impl SignatureError {
    pub fn format(field: impl Into<String>, reason: impl ToString) -> Self {
        SignatureError::Format {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

/// Failures of typed-data signature verification: either the document
/// cannot be hashed or the signature cannot be recovered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error(transparent)]
    TypedData(#[from] TypedDataError),

    #[error(transparent)]
    Signature(#[from] SignatureError),
}

/// Failures of the unit / number / text conversion tools.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("negative values are not allowed")]
    Negative,

    #[error("invalid number: {input:?}")]
    InvalidNumber { input: String },

    #[error("too many decimal places for {unit} (max {max})")]
    TooManyDecimals { unit: String, max: usize },

    #[error("value exceeds 256 bits")]
    Overflow,

    #[error(transparent)]
    Hex(#[from] HexError),

    #[error("bytes are not valid UTF-8: {0}")]
    Utf8(String),
}
