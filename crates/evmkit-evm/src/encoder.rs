//! ABI encoder: typed values → calldata.
//!
//! Standard head/tail layout. Static values sit inline in the head; each
//! dynamic value gets a 32-byte offset in the head (relative to the start of
//! the enclosing tuple) and its body in the tail.
//!
//! # Usage
//! ```ignore
//! let sig = FunctionSignature::parse("transfer(address to,uint256 amount)")?;
//! let call = encode_call(&sig, &["0xd8dA...6045", "1000000"])?;
//! assert_eq!(call.selector_hex(), "0xa9059cbb");
//! ```

use alloy_primitives::U256;
use evmkit_core::{
    error::EncodeError,
    hexstr,
    types::{Component, TypeDescriptor, FUNCTION_TYPE_BYTES},
    value::AbiValue,
};
use serde::Serialize;

use crate::{abi::FunctionSignature, parser};

/// Result of encoding one function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCall {
    /// `selector ++ encoded arguments`
    pub calldata: Vec<u8>,
    pub selector: [u8; 4],
    /// Total calldata length in bytes.
    pub length: usize,
}

impl EncodedCall {
    pub fn calldata_hex(&self) -> String {
        hexstr::encode_hex(&self.calldata)
    }

    pub fn selector_hex(&self) -> String {
        hexstr::encode_hex(self.selector)
    }
}

impl Serialize for EncodedCall {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire {
            calldata: String,
            selector: String,
            length: usize,
        }
        Wire {
            calldata: self.calldata_hex(),
            selector: self.selector_hex(),
            length: self.length,
        }
        .serialize(serializer)
    }
}

/// Parse one raw text input per parameter, then encode the call.
///
/// `raw_inputs` must have exactly one entry per parameter; empty entries are
/// reported as [`ParseError::Empty`](evmkit_core::ParseError::Empty).
pub fn encode_call<S: AsRef<str>>(
    signature: &FunctionSignature,
    raw_inputs: &[S],
) -> Result<EncodedCall, EncodeError> {
    if raw_inputs.len() != signature.inputs.len() {
        return Err(EncodeError::ArityMismatch {
            expected: signature.inputs.len(),
            got: raw_inputs.len(),
        });
    }
    let values = signature
        .inputs
        .iter()
        .zip(raw_inputs)
        .map(|(param, raw)| parser::parse_param(param, raw.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    encode(signature, &values)
}

/// Encode already-typed values as `selector ++ args`.
pub fn encode(
    signature: &FunctionSignature,
    values: &[AbiValue],
) -> Result<EncodedCall, EncodeError> {
    let selector = signature.selector();
    let args = encode_arguments(&signature.inputs, values)?;

    let mut calldata = Vec::with_capacity(4 + args.len());
    calldata.extend_from_slice(&selector);
    calldata.extend_from_slice(&args);

    tracing::debug!(
        function = %signature.canonical(),
        bytes = calldata.len(),
        "encoded call"
    );
    let length = calldata.len();
    Ok(EncodedCall {
        calldata,
        selector,
        length,
    })
}

/// Encode a parameter list as a tuple, without a selector.
pub fn encode_arguments(
    params: &[Component],
    values: &[AbiValue],
) -> Result<Vec<u8>, EncodeError> {
    if params.len() != values.len() {
        return Err(EncodeError::ArityMismatch {
            expected: params.len(),
            got: values.len(),
        });
    }
    let items: Vec<Item<'_>> = params
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (param, value))| Item {
            path: if param.name.is_empty() {
                format!("arg{i}")
            } else {
                param.name.clone()
            },
            ty: &param.ty,
            value,
        })
        .collect();
    encode_sequence(&items)
}

// ─── Internals ───────────────────────────────────────────────────────────────

struct Item<'a> {
    path: String,
    ty: &'a TypeDescriptor,
    value: &'a AbiValue,
}

fn encode_sequence(items: &[Item<'_>]) -> Result<Vec<u8>, EncodeError> {
    let head_len: usize = items.iter().map(|item| item.ty.head_size()).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for item in items {
        let encoded = encode_value(item.ty, item.value, &item.path)?;
        if item.ty.is_dynamic() {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            tail.extend_from_slice(&encoded);
        } else {
            head.extend_from_slice(&encoded);
        }
    }

    head.extend_from_slice(&tail);
    Ok(head)
}

fn encode_value(ty: &TypeDescriptor, value: &AbiValue, path: &str) -> Result<Vec<u8>, EncodeError> {
    match (ty, value) {
        (TypeDescriptor::Address, AbiValue::Address(addr)) => {
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(addr.as_slice());
            Ok(word.to_vec())
        }

        (TypeDescriptor::Bool, AbiValue::Bool(b)) => Ok(usize_word(usize::from(*b)).to_vec()),

        (TypeDescriptor::Uint(bits), AbiValue::Int(int))
        | (TypeDescriptor::Int(bits), AbiValue::Int(int)) => {
            let signed = matches!(ty, TypeDescriptor::Int(_));
            int.to_word(signed, *bits)
                .map(|w| w.to_vec())
                .ok_or_else(|| EncodeError::IntegerOverflow {
                    field: path.to_string(),
                    value: int.to_string(),
                    ty: ty.to_string(),
                })
        }

        (TypeDescriptor::FixedBytes(size), AbiValue::Bytes(bytes)) => {
            fixed_bytes_word(bytes, *size, ty, path)
        }
        (TypeDescriptor::Function, AbiValue::Bytes(bytes)) => {
            fixed_bytes_word(bytes, FUNCTION_TYPE_BYTES, ty, path)
        }

        (TypeDescriptor::Bytes, AbiValue::Bytes(bytes)) => Ok(length_prefixed(bytes)),
        (TypeDescriptor::String, AbiValue::String(s)) => Ok(length_prefixed(s.as_bytes())),

        (TypeDescriptor::Array { element, length }, AbiValue::Array(elements)) => {
            if let Some(expected) = length {
                if elements.len() != *expected {
                    return Err(shape(path, ty, format!("{} elements", elements.len())));
                }
            }
            let items: Vec<Item<'_>> = elements
                .iter()
                .enumerate()
                .map(|(i, value)| Item {
                    path: format!("{path}[{i}]"),
                    ty: element,
                    value,
                })
                .collect();
            let body = encode_sequence(&items)?;
            if length.is_some() {
                return Ok(body);
            }
            let mut out = usize_word(elements.len()).to_vec();
            out.extend_from_slice(&body);
            Ok(out)
        }

        (TypeDescriptor::Tuple(components), AbiValue::Tuple(members)) => {
            if components.len() != members.len() {
                return Err(shape(path, ty, format!("{} members", members.len())));
            }
            let items: Vec<Item<'_>> = components
                .iter()
                .zip(members)
                .enumerate()
                .map(|(i, (component, value))| Item {
                    path: if component.name.is_empty() {
                        format!("{path}.{i}")
                    } else {
                        format!("{path}.{}", component.name)
                    },
                    ty: &component.ty,
                    value,
                })
                .collect();
            encode_sequence(&items)
        }

        _ => Err(shape(path, ty, value.kind())),
    }
}

fn fixed_bytes_word(
    bytes: &[u8],
    size: usize,
    ty: &TypeDescriptor,
    path: &str,
) -> Result<Vec<u8>, EncodeError> {
    if bytes.len() != size {
        return Err(shape(path, ty, format!("{} bytes", bytes.len())));
    }
    let mut word = [0u8; 32];
    word[..size].copy_from_slice(bytes);
    Ok(word.to_vec())
}

/// `len ++ data`, data right-padded to a word boundary.
fn length_prefixed(data: &[u8]) -> Vec<u8> {
    let padded = data.len().div_ceil(32) * 32;
    let mut out = Vec::with_capacity(32 + padded);
    out.extend_from_slice(&usize_word(data.len()));
    out.extend_from_slice(data);
    out.resize(32 + padded, 0);
    out
}

fn usize_word(n: usize) -> [u8; 32] {
    U256::from(n).to_be_bytes::<32>()
}

fn shape(path: &str, ty: &TypeDescriptor, got: impl Into<String>) -> EncodeError {
    EncodeError::ShapeMismatch {
        field: path.to_string(),
        expected: ty.to_string(),
        got: got.into(),
    }
}
