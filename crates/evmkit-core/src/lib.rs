//! # evmkit-core
//!
//! Types and primitives shared by the EvmKit crates: the Solidity type
//! grammar, the value model the ABI codec works on, the error taxonomy,
//! and the hex / keccak helpers every tool leans on.

pub mod error;
pub mod hash;
pub mod hexstr;
pub mod types;
pub mod value;

pub use error::{
    ConvertError, DecodeError, EncodeError, HexError, ParseError, SignatureError, TypedDataError,
    VerifyError,
};
pub use hash::{keccak256, keccak256_concat};
pub use types::{Component, TypeDescriptor};
pub use value::{AbiValue, Integer};

pub use alloy_primitives::{Address, U256};
