//! # evmkit-evm
//!
//! The EVM side of EvmKit: function signatures, the ABI calldata codec,
//! display normalization, EIP-712 typed data, EIP-191 personal messages,
//! signer recovery and the small conversion tools around them.
//!
//! ## Implementation notes
//! - The codec works on `evmkit_core::TypeDescriptor` / `AbiValue` and does
//!   its own head/tail layout; `alloy-json-abi` is only used to read ABI JSON
//! - Integers are arbitrary-precision literals until encode time, where they
//!   are range-checked against the declared width
//! - Recovery uses `k256` and rejects high-s signatures

pub mod abi;
pub mod address;
pub mod convert;
pub mod decoder;
pub mod eip191;
pub mod eip712;
pub mod encoder;
pub mod keccak;
pub mod normalizer;
pub mod parser;
pub mod recover;
pub mod signature;
pub mod units;

pub use abi::{AbiInterface, FunctionEntry, FunctionSignature};
pub use address::{analyze_address, AddressReport};
pub use decoder::{decode_arguments, decode_call, decode_hex_arguments, DecodedCall, DecodedParam};
pub use eip191::{compute_eip191_hash, hash_message, verify_eip191_signature, Eip191Hash, MessageInput};
pub use eip712::{
    evaluate, verify_typed_signature, TypedDataDocument, TypedDataHash, TypedDataInputs,
    TypedDataReport, TypedField,
};
pub use encoder::{encode, encode_arguments, encode_call, EncodedCall};
pub use keccak::{compute_keccak, HashMode};
pub use normalizer::{to_display, DisplayValue};
pub use parser::{parse_param, parse_value};
pub use recover::{recover_from_digest, recover_from_parts, RecoveredAddress};
pub use signature::{Parity, RecoverableSignature, Verification};
pub use units::{convert_units, Unit, UnitValues};
