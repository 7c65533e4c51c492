//! Free-form user text → typed ABI values.
//!
//! Every parameter arrives as one string. Scalars are read directly; arrays
//! and tuples are JSON text whose elements are re-serialized and parsed
//! recursively against the element type:
//!
//! - strings are passed through verbatim
//! - `null` becomes the empty string (and then fails as an empty value)
//! - anything else is re-serialized as compact JSON
//!
//! So `[1,2,3]` and `["1","2","3"]` are equivalent for a `uint256[]`, and a
//! tuple member that is itself an array may be given either as a nested JSON
//! array or as a string containing one.
//!
//! Numbers above 2^64 lose precision as JSON numbers; quote them.

use alloy_primitives::Address;
use evmkit_core::{
    error::{HexError, ParseError},
    hexstr,
    types::{Component, TypeDescriptor, FUNCTION_TYPE_BYTES},
    value::{AbiValue, Integer},
};
use serde_json::Value;

/// Parse `raw` against `ty`. Error paths are rooted at `"value"`.
pub fn parse_value(ty: &TypeDescriptor, raw: &str) -> Result<AbiValue, ParseError> {
    parse_at(ty, raw, "value")
}

/// Parse `raw` for a named parameter. Error paths are rooted at the
/// parameter name, e.g. `orders[1].amount`.
pub fn parse_param(param: &Component, raw: &str) -> Result<AbiValue, ParseError> {
    let root = if param.name.is_empty() {
        "value"
    } else {
        param.name.as_str()
    };
    parse_at(&param.ty, raw, root)
}

fn parse_at(ty: &TypeDescriptor, raw: &str, path: &str) -> Result<AbiValue, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty {
            field: path.to_string(),
        });
    }

    match ty {
        TypeDescriptor::Array { element, length } => {
            let items = match parse_json(trimmed, path)? {
                Value::Array(items) => items,
                _ => return Err(invalid(path, "expected a JSON array, e.g. [1,2,3]")),
            };
            if let Some(expected) = length {
                if items.len() != *expected {
                    return Err(ParseError::LengthMismatch {
                        field: path.to_string(),
                        expected: *expected,
                        got: items.len(),
                    });
                }
            }
            items
                .iter()
                .enumerate()
                .map(|(i, item)| parse_at(element, &element_text(item), &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(AbiValue::Array)
        }

        TypeDescriptor::Tuple(components) => {
            let json = parse_json(trimmed, path)?;
            let members = components
                .iter()
                .enumerate()
                .map(|(i, component)| {
                    let item = match &json {
                        Value::Array(items) => items.get(i),
                        Value::Object(map) => map.get(&component.name),
                        _ => {
                            return Err(invalid(
                                path,
                                "expected a JSON array or object for a tuple",
                            ))
                        }
                    };
                    let text = item.map(element_text).unwrap_or_default();
                    parse_at(&component.ty, &text, &member_path(path, component, i))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AbiValue::Tuple(members))
        }

        TypeDescriptor::Address => {
            let body = hexstr::strip_0x(trimmed);
            if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid(path, "not a valid address"));
            }
            let bytes = hexstr::decode_hex(body).map_err(|e| invalid(path, e))?;
            Ok(AbiValue::Address(Address::from_slice(&bytes)))
        }

        TypeDescriptor::Bool => match trimmed.to_ascii_lowercase().as_str() {
            "true" => Ok(AbiValue::Bool(true)),
            "false" => Ok(AbiValue::Bool(false)),
            _ => Err(invalid(path, "bool must be true or false")),
        },

        TypeDescriptor::Int(_) | TypeDescriptor::Uint(_) => trimmed
            .parse::<Integer>()
            .map(AbiValue::Int)
            .map_err(|e| invalid(path, e)),

        TypeDescriptor::FixedBytes(size) => {
            parse_hex_bytes(trimmed, *size, path).map(AbiValue::Bytes)
        }
        TypeDescriptor::Function => {
            parse_hex_bytes(trimmed, FUNCTION_TYPE_BYTES, path).map(AbiValue::Bytes)
        }
        TypeDescriptor::Bytes => hexstr::decode_hex(trimmed)
            .map(AbiValue::Bytes)
            .map_err(|e| invalid(path, e)),

        TypeDescriptor::String => Ok(AbiValue::String(trimmed.to_string())),
    }
}

fn parse_json(text: &str, path: &str) -> Result<Value, ParseError> {
    serde_json::from_str(text).map_err(|e| invalid(path, format!("invalid JSON: {e}")))
}

fn parse_hex_bytes(text: &str, size: usize, path: &str) -> Result<Vec<u8>, ParseError> {
    hexstr::decode_hex_strict(text, Some(size)).map_err(|e| match e {
        HexError::WrongLength { expected, .. } => {
            invalid(path, format!("expected exactly {expected} bytes of hex"))
        }
        other => invalid(path, other),
    })
}

/// Text handed to the element parser for one JSON array/object member.
fn element_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn member_path(parent: &str, component: &Component, index: usize) -> String {
    if component.name.is_empty() {
        format!("{parent}.{index}")
    } else {
        format!("{parent}.{}", component.name)
    }
}

fn invalid(path: &str, reason: impl ToString) -> ParseError {
    ParseError::InvalidValue {
        field: path.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(s: &str) -> TypeDescriptor {
        TypeDescriptor::parse(s).unwrap()
    }

    fn int(s: &str) -> AbiValue {
        AbiValue::Int(s.parse().unwrap())
    }

    #[test]
    fn scalars() {
        assert_eq!(parse_value(&ty("uint256"), " 42 ").unwrap(), int("42"));
        assert_eq!(parse_value(&ty("int8"), "-5").unwrap(), int("-5"));
        assert_eq!(parse_value(&ty("bool"), "TRUE").unwrap(), AbiValue::Bool(true));
        assert_eq!(
            parse_value(&ty("string"), "  hello  ").unwrap(),
            AbiValue::String("hello".into())
        );
        assert_eq!(
            parse_value(&ty("bytes"), "0xDEad").unwrap(),
            AbiValue::Bytes(vec![0xde, 0xad])
        );
    }

    #[test]
    fn address_accepts_any_case_without_checksum_check() {
        let lower = parse_value(&ty("address"), "0xd8da6bf26964af9d7eed9e03e53415d37aa96045").unwrap();
        // deliberately wrong mixed case
        let mixed = parse_value(&ty("address"), "0xD8da6bf26964af9d7eed9e03e53415d37aa96045").unwrap();
        assert_eq!(lower, mixed);
        assert!(parse_value(&ty("address"), "0x1234").is_err());
    }

    #[test]
    fn integer_rejects_non_literals() {
        for bad in ["1.5", "0x10", "1e18", "abc"] {
            let err = parse_value(&ty("uint256"), bad).unwrap_err();
            assert!(matches!(err, ParseError::InvalidValue { .. }), "{bad}");
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        let param = Component::new("amount", ty("uint256"));
        assert_eq!(
            parse_param(&param, "   ").unwrap_err(),
            ParseError::Empty {
                field: "amount".into()
            }
        );
    }

    #[test]
    fn bare_prefix_is_empty_dynamic_bytes() {
        assert_eq!(parse_value(&ty("bytes"), "0x").unwrap(), AbiValue::Bytes(vec![]));
        assert!(parse_value(&ty("bytes1"), "0x").is_err());
        assert!(parse_value(&ty("bytes"), "0xabc").is_err());
        assert!(matches!(
            parse_value(&ty("bytes"), "  "),
            Err(ParseError::Empty { .. })
        ));
    }

    #[test]
    fn fixed_bytes_length_is_exact() {
        assert!(parse_value(&ty("bytes4"), "0xa9059cbb").is_ok());
        let err = parse_value(&ty("bytes4"), "0xa9059c").unwrap_err();
        assert!(err.to_string().contains("exactly 4 bytes"));
    }

    #[test]
    fn array_elements_accept_numbers_or_strings() {
        let t = ty("uint256[]");
        let a = parse_value(&t, "[1,2,3]").unwrap();
        let b = parse_value(&t, r#"["1","2","3"]"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, AbiValue::Array(vec![int("1"), int("2"), int("3")]));
        assert_eq!(parse_value(&t, "[]").unwrap(), AbiValue::Array(vec![]));
    }

    #[test]
    fn fixed_array_length_mismatch() {
        let err = parse_value(&ty("uint8[2]"), "[1,2,3]").unwrap_err();
        assert_eq!(
            err,
            ParseError::LengthMismatch {
                field: "value".into(),
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn non_array_json_for_array_type() {
        let err = parse_value(&ty("uint256[]"), r#"{"a":1}"#).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
        assert!(parse_value(&ty("uint256[]"), "[1,").is_err());
    }

    #[test]
    fn nested_arrays() {
        let v = parse_value(&ty("uint256[][]"), "[[1,2],[3]]").unwrap();
        assert_eq!(
            v,
            AbiValue::Array(vec![
                AbiValue::Array(vec![int("1"), int("2")]),
                AbiValue::Array(vec![int("3")]),
            ])
        );
        // inner array given as a string
        let w = parse_value(&ty("uint256[][]"), r#"["[1,2]", [3]]"#).unwrap();
        assert_eq!(v, w);
    }

    #[test]
    fn tuple_from_array_or_object() {
        let t = ty("(address to,uint256 amount)");
        let from_array = parse_value(
            &t,
            r#"["0x000000000000000000000000000000000000dead", 5]"#,
        )
        .unwrap();
        let from_object = parse_value(
            &t,
            r#"{"amount": "5", "to": "0x000000000000000000000000000000000000dEaD"}"#,
        )
        .unwrap();
        assert_eq!(from_array, from_object);
    }

    #[test]
    fn missing_tuple_member_reports_nested_path() {
        let param = Component::new("orders", ty("(address maker,uint256 amount)[]"));
        let raw = r#"[
            {"maker": "0x000000000000000000000000000000000000dead", "amount": 1},
            {"maker": "0x000000000000000000000000000000000000dead"}
        ]"#;
        let err = parse_param(&param, raw).unwrap_err();
        assert_eq!(
            err,
            ParseError::Empty {
                field: "orders[1].amount".into()
            }
        );
    }

    #[test]
    fn null_element_is_empty() {
        let err = parse_value(&ty("string[]"), r#"["a", null]"#).unwrap_err();
        assert_eq!(
            err,
            ParseError::Empty {
                field: "value[1]".into()
            }
        );
    }

    #[test]
    fn unnamed_tuple_members_use_index_in_path() {
        let err = parse_value(&ty("(uint8,uint8)"), "[1, 300]").unwrap();
        // parsing succeeds; range is an encode-time concern
        assert_eq!(err, AbiValue::Tuple(vec![int("1"), int("300")]));
        let err = parse_value(&ty("(uint8,bool)"), r#"[1, "maybe"]"#).unwrap_err();
        assert!(err.to_string().starts_with("value.1:"));
    }

    #[test]
    fn function_type_is_24_bytes() {
        let raw = format!("0x{}", "ab".repeat(24));
        assert_eq!(
            parse_value(&ty("function"), &raw).unwrap(),
            AbiValue::Bytes(vec![0xab; 24])
        );
        assert!(parse_value(&ty("function"), "0xabcd").is_err());
    }
}
