//! ABI decoder: calldata → typed values.
//!
//! Mirrors the encoder's head/tail walk and validates strictly: offsets and
//! lengths must stay inside the buffer, words must be canonical for their
//! type (clean address padding, bool in {0,1}, integers sign-extended to
//! exactly their width), strings must be UTF-8.
//!
//! # How it works
//! - `decode_call` checks the 4-byte selector, then decodes the rest
//! - `decode_arguments` takes selector-stripped data only

use alloy_primitives::{Address, U256};
use evmkit_core::{
    error::DecodeError,
    hexstr,
    types::{TypeDescriptor, FUNCTION_TYPE_BYTES},
    value::{AbiValue, Integer},
};
use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    abi::FunctionSignature,
    normalizer::{self, DisplayValue},
};

/// One decoded parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedParam {
    /// Declared name, or `arg{i}` when unnamed.
    pub name: String,
    pub ty: TypeDescriptor,
    pub value: AbiValue,
}

/// Decoded arguments of one function call, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCall {
    pub signature: String,
    pub params: Vec<DecodedParam>,
}

impl DecodedCall {
    pub fn values(&self) -> Vec<AbiValue> {
        self.params.iter().map(|p| p.value.clone()).collect()
    }

    pub fn param(&self, name: &str) -> Option<&DecodedParam> {
        self.params.iter().find(|p| p.name == name)
    }

    /// `{ name: display value }` in declaration order.
    pub fn to_display(&self) -> IndexMap<String, DisplayValue> {
        self.params
            .iter()
            .map(|p| (p.name.clone(), normalizer::to_display(&p.value, &p.ty)))
            .collect()
    }
}

impl Serialize for DecodedCall {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            signature: &'a str,
            args: IndexMap<String, DisplayValue>,
        }
        Wire {
            signature: &self.signature,
            args: self.to_display(),
        }
        .serialize(serializer)
    }
}

/// Decode full calldata (`selector ++ args`) against `signature`.
pub fn decode_call(
    signature: &FunctionSignature,
    calldata: &[u8],
) -> Result<DecodedCall, DecodeError> {
    if calldata.len() < 4 {
        return Err(DecodeError::Truncated {
            offset: 0,
            needed: 4,
            available: calldata.len(),
        });
    }
    let expected = signature.selector();
    if calldata[..4] != expected {
        return Err(DecodeError::SelectorMismatch {
            expected: hexstr::encode_hex(expected),
            got: hexstr::encode_hex(&calldata[..4]),
        });
    }
    decode_arguments(signature, &calldata[4..])
}

/// Decode selector-stripped argument data.
///
/// A signature with no parameters decodes any input (including `0x`) to an
/// empty list. Trailing bytes past the last value are ignored.
pub fn decode_arguments(
    signature: &FunctionSignature,
    data: &[u8],
) -> Result<DecodedCall, DecodeError> {
    let types: Vec<&TypeDescriptor> = signature.inputs.iter().map(|c| &c.ty).collect();
    let values = decode_sequence(data, 0, &types)?;

    let params = signature
        .inputs
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (component, value))| DecodedParam {
            name: signature.input_name(i),
            ty: component.ty.clone(),
            value,
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        function = %signature.canonical(),
        bytes = data.len(),
        params = params.len(),
        "decoded arguments"
    );
    Ok(DecodedCall {
        signature: signature.canonical(),
        params,
    })
}

/// Decode selector-stripped argument data given as user hex.
pub fn decode_hex_arguments(
    signature: &FunctionSignature,
    data_hex: &str,
) -> Result<DecodedCall, DecodeError> {
    let data = hexstr::decode_hex(data_hex)?;
    decode_arguments(signature, &data)
}

// ─── Internals ───────────────────────────────────────────────────────────────

/// Decode a tuple body. `base` is the absolute position of `data[0]`,
/// used only for error reporting.
fn decode_sequence(
    data: &[u8],
    base: usize,
    types: &[&TypeDescriptor],
) -> Result<Vec<AbiValue>, DecodeError> {
    let mut values = Vec::with_capacity(types.len());
    let mut head = 0usize;
    for ty in types {
        if ty.is_dynamic() {
            let offset = read_offset(data, head, base)?;
            values.push(decode_value(&data[offset..], base + offset, ty)?);
            head += 32;
        } else {
            let size = ty.head_size();
            if head.checked_add(size).map_or(true, |end| end > data.len()) {
                return Err(truncated(data, head, base, size));
            }
            values.push(decode_value(&data[head..], base + head, ty)?);
            head += size;
        }
    }
    Ok(values)
}

fn decode_value(data: &[u8], base: usize, ty: &TypeDescriptor) -> Result<AbiValue, DecodeError> {
    match ty {
        TypeDescriptor::Address => {
            let word = read_word(data, 0, base)?;
            if word[..12].iter().any(|b| *b != 0) {
                return Err(invalid(base, ty, "dirty high bytes in address"));
            }
            Ok(AbiValue::Address(Address::from_slice(&word[12..])))
        }

        TypeDescriptor::Bool => {
            let word = read_word(data, 0, base)?;
            match U256::from_be_bytes(word) {
                v if v.is_zero() => Ok(AbiValue::Bool(false)),
                v if v == U256::from(1u8) => Ok(AbiValue::Bool(true)),
                _ => Err(invalid(base, ty, "bool must be 0 or 1")),
            }
        }

        TypeDescriptor::Uint(bits) | TypeDescriptor::Int(bits) => {
            let word = read_word(data, 0, base)?;
            let signed = matches!(ty, TypeDescriptor::Int(_));
            Integer::from_word(&word, signed, *bits)
                .map(AbiValue::Int)
                .ok_or_else(|| invalid(base, ty, "value does not fit the declared width"))
        }

        TypeDescriptor::FixedBytes(size) => fixed_bytes(data, base, ty, *size),
        TypeDescriptor::Function => fixed_bytes(data, base, ty, FUNCTION_TYPE_BYTES),

        TypeDescriptor::Bytes => read_length_prefixed(data, base, ty).map(|b| AbiValue::Bytes(b.to_vec())),
        TypeDescriptor::String => {
            let bytes = read_length_prefixed(data, base, ty)?;
            String::from_utf8(bytes.to_vec())
                .map(AbiValue::String)
                .map_err(|_| invalid(base, ty, "string is not valid UTF-8"))
        }

        TypeDescriptor::Array { element, length } => {
            let (count, body, body_base) = match length {
                Some(n) => (*n, data, base),
                None => {
                    let n = read_length(data, base, ty)?;
                    (n, &data[32..], base + 32)
                }
            };
            // Every element needs at least its head slot; bail before allocating.
            let min = count.checked_mul(element.head_size());
            if min.map_or(true, |m| m > body.len()) {
                return Err(DecodeError::Truncated {
                    offset: body_base,
                    needed: min.unwrap_or(usize::MAX),
                    available: body.len(),
                });
            }
            let types = vec![&**element; count];
            decode_sequence(body, body_base, &types).map(AbiValue::Array)
        }

        TypeDescriptor::Tuple(components) => {
            let types: Vec<&TypeDescriptor> = components.iter().map(|c| &c.ty).collect();
            decode_sequence(data, base, &types).map(AbiValue::Tuple)
        }
    }
}

fn fixed_bytes(
    data: &[u8],
    base: usize,
    ty: &TypeDescriptor,
    size: usize,
) -> Result<AbiValue, DecodeError> {
    let word = read_word(data, 0, base)?;
    if word[size..].iter().any(|b| *b != 0) {
        return Err(invalid(base, ty, "non-zero padding"));
    }
    Ok(AbiValue::Bytes(word[..size].to_vec()))
}

fn read_word(data: &[u8], pos: usize, base: usize) -> Result<[u8; 32], DecodeError> {
    data.get(pos..pos + 32)
        .and_then(|slice| <[u8; 32]>::try_from(slice).ok())
        .ok_or_else(|| truncated(data, pos, base, 32))
}

/// Offset word at `pos`, checked to land inside `data`.
fn read_offset(data: &[u8], pos: usize, base: usize) -> Result<usize, DecodeError> {
    let raw = U256::from_be_bytes(read_word(data, pos, base)?);
    usize::try_from(raw)
        .ok()
        .filter(|offset| *offset <= data.len())
        .ok_or_else(|| DecodeError::InvalidOffset {
            at: base + pos,
            offset: raw.to_string(),
        })
}

/// Length word at the start of `data`, checked against the bytes that follow.
fn read_length(data: &[u8], base: usize, ty: &TypeDescriptor) -> Result<usize, DecodeError> {
    let raw = U256::from_be_bytes(read_word(data, 0, base)?);
    usize::try_from(raw)
        .ok()
        .filter(|len| *len <= data.len())
        .ok_or_else(|| invalid(base, ty, format!("length {raw} exceeds the calldata")))
}

fn read_length_prefixed<'a>(
    data: &'a [u8],
    base: usize,
    ty: &TypeDescriptor,
) -> Result<&'a [u8], DecodeError> {
    let len = read_length(data, base, ty)?;
    data.get(32..32 + len)
        .ok_or_else(|| truncated(data, 32, base, len))
}

fn truncated(data: &[u8], pos: usize, base: usize, needed: usize) -> DecodeError {
    DecodeError::Truncated {
        offset: base + pos,
        needed,
        available: data.len().saturating_sub(pos),
    }
}

fn invalid(offset: usize, ty: &TypeDescriptor, reason: impl Into<String>) -> DecodeError {
    DecodeError::InvalidValue {
        offset,
        ty: ty.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode_call;

    fn sig(s: &str) -> FunctionSignature {
        FunctionSignature::parse(s).unwrap()
    }

    fn word(n: u64) -> String {
        format!("{n:064x}")
    }

    #[test]
    fn huge_fixed_array_heads_are_truncation_errors() {
        let s = sig("f(uint256 a,uint256[576460752303423487] b)");
        let err = decode_arguments(&s, &[0u8; 64]).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { offset: 32, .. }));
    }

    #[test]
    fn decodes_what_the_encoder_produced() {
        let s = sig("swap((address token,uint24 fee)[] path,int256 delta,string memo,bytes32 salt)");
        let inputs = [
            r#"[["0x000000000000000000000000000000000000dEaD", 3000], {"token": "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045", "fee": "500"}]"#,
            "-42",
            "héllo",
            "0x0000000000000000000000000000000000000000000000000000000000000001",
        ];
        let call = encode_call(&s, &inputs).unwrap();
        let decoded = decode_call(&s, &call.calldata).unwrap();
        assert_eq!(decoded.signature, "swap((address,uint24)[],int256,string,bytes32)");
        assert_eq!(decoded.params.len(), 4);
        assert_eq!(decoded.param("delta").unwrap().value.to_string(), "-42");
        assert_eq!(
            decoded.param("memo").unwrap().value,
            AbiValue::String("héllo".into())
        );
    }

    #[test]
    fn zero_params_with_empty_data() {
        let decoded = decode_hex_arguments(&sig("ping()"), "0x").unwrap();
        assert!(decoded.params.is_empty());
    }

    #[test]
    fn empty_data_with_params_is_truncated() {
        let err = decode_hex_arguments(&sig("f(uint256)"), "0x").unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { offset: 0, needed: 32, available: 0 }));
    }

    #[test]
    fn selector_mismatch() {
        let s = sig("transfer(address,uint256)");
        let mut data = hex::decode("095ea7b3").unwrap();
        data.extend(vec![0u8; 64]);
        let err = decode_call(&s, &data).unwrap_err();
        assert_eq!(
            err,
            DecodeError::SelectorMismatch {
                expected: "0xa9059cbb".into(),
                got: "0x095ea7b3".into()
            }
        );
    }

    #[test]
    fn offset_out_of_bounds() {
        let data = hex::decode(word(0x1000)).unwrap();
        let err = decode_arguments(&sig("f(bytes)"), &data).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidOffset {
                at: 0,
                offset: "4096".into()
            }
        );
    }

    #[test]
    fn length_past_end() {
        let data = hex::decode(format!("{}{}{}", word(0x20), word(100), "00".repeat(10))).unwrap();
        let err = decode_arguments(&sig("f(string)"), &data).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidValue { .. }));
    }

    #[test]
    fn rejects_non_canonical_words() {
        // bool = 2
        let err = decode_hex_arguments(&sig("f(bool)"), &word(2)).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidValue { .. }));

        // address with dirty high bytes
        let dirty = format!("ff{}", &word(1)[2..]);
        assert!(decode_hex_arguments(&sig("f(address)"), &dirty).is_err());

        // uint8 = 256
        assert!(decode_hex_arguments(&sig("f(uint8)"), &word(256)).is_err());

        // bytes1 with trailing garbage
        let dirty = format!("aabb{}", "00".repeat(30));
        assert!(decode_hex_arguments(&sig("f(bytes1)"), &dirty).is_err());
    }

    #[test]
    fn invalid_utf8_string() {
        let data = format!("{}{}{}{}", word(0x20), word(2), "fffe", "00".repeat(30));
        let err = decode_hex_arguments(&sig("f(string)"), &data).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn huge_array_length_does_not_allocate() {
        let data = format!("{}{}", word(0x20), word(u64::MAX));
        assert!(decode_hex_arguments(&sig("f(uint256[])"), &data).is_err());
    }

    #[test]
    fn invalid_hex_input() {
        let err = decode_hex_arguments(&sig("f(uint256)"), "0xzz").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidHex(_)));
    }

    #[test]
    fn unnamed_params_get_positional_names() {
        let decoded = decode_hex_arguments(&sig("f(uint256,bool)"), &format!("{}{}", word(7), word(1))).unwrap();
        let display = decoded.to_display();
        let keys: Vec<_> = display.keys().cloned().collect();
        assert_eq!(keys, ["arg0", "arg1"]);
        assert_eq!(display["arg0"], DisplayValue::Text("7".into()));
        assert_eq!(display["arg1"], DisplayValue::Bool(true));
    }
}
