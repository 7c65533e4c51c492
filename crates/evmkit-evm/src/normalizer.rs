//! Decoded ABI values → display-safe values.
//!
//! Integers become decimal strings (so JSON never loses precision), addresses
//! are EIP-55 checksummed, byte values are lowercase `0x` hex, and tuples
//! become ordered records keyed by component name. Unnamed components are
//! keyed `_0`, `_1`, ... by position.

use evmkit_core::{
    hexstr,
    types::{Component, TypeDescriptor},
    value::AbiValue,
};
use indexmap::IndexMap;
use serde::Serialize;

/// A JSON-serializable rendering of an [`AbiValue`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Text(String),
    Bool(bool),
    List(Vec<DisplayValue>),
    Record(IndexMap<String, DisplayValue>),
}

/// Convert `value` (decoded as `ty`) for display.
pub fn to_display(value: &AbiValue, ty: &TypeDescriptor) -> DisplayValue {
    match (value, ty) {
        (AbiValue::Bool(b), _) => DisplayValue::Bool(*b),
        (AbiValue::Address(a), _) => DisplayValue::Text(a.to_checksum(None)),
        (AbiValue::Int(i), _) => DisplayValue::Text(i.to_string()),
        (AbiValue::Bytes(b), _) => DisplayValue::Text(hexstr::encode_hex(b)),
        (AbiValue::String(s), _) => DisplayValue::Text(s.clone()),

        (AbiValue::Array(items), TypeDescriptor::Array { element, .. }) => {
            DisplayValue::List(items.iter().map(|v| to_display(v, element)).collect())
        }

        (AbiValue::Tuple(members), TypeDescriptor::Tuple(components))
            if members.len() == components.len() =>
        {
            DisplayValue::Record(record(components, members))
        }

        // Shape does not match the declared type; keep the raw rendering.
        (other, _) => DisplayValue::Text(other.to_string()),
    }
}

/// Ordered record of `components` zipped with `values`.
pub fn record(components: &[Component], values: &[AbiValue]) -> IndexMap<String, DisplayValue> {
    components
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (component, value))| (field_key(component, i), to_display(value, &component.ty)))
        .collect()
}

fn field_key(component: &Component, index: usize) -> String {
    if component.name.is_empty() {
        format!("_{index}")
    } else {
        component.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    fn ty(s: &str) -> TypeDescriptor {
        TypeDescriptor::parse(s).unwrap()
    }

    #[test]
    fn address_is_checksummed() {
        let addr: Address = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045".parse().unwrap();
        assert_eq!(
            to_display(&AbiValue::Address(addr), &TypeDescriptor::Address),
            DisplayValue::Text("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".into())
        );
    }

    #[test]
    fn large_integers_stay_exact() {
        let v = AbiValue::Int("115792089237316195423570985008687907853269984665640564039457584007913129639935".parse().unwrap());
        let json = serde_json::to_string(&to_display(&v, &ty("uint256"))).unwrap();
        assert_eq!(
            json,
            "\"115792089237316195423570985008687907853269984665640564039457584007913129639935\""
        );
    }

    #[test]
    fn bytes_are_lowercase_hex() {
        let v = AbiValue::Bytes(vec![0xAB, 0xCD]);
        assert_eq!(to_display(&v, &ty("bytes2")), DisplayValue::Text("0xabcd".into()));
    }

    #[test]
    fn tuples_become_ordered_records() {
        let t = ty("(uint256 b,address a,bool)");
        let v = AbiValue::Tuple(vec![
            AbiValue::Int(7u64.into()),
            AbiValue::Address(Address::ZERO),
            AbiValue::Bool(false),
        ]);
        let DisplayValue::Record(rec) = to_display(&v, &t) else {
            panic!("expected record");
        };
        let keys: Vec<_> = rec.keys().cloned().collect();
        assert_eq!(keys, ["b", "a", "_2"]);
        assert_eq!(
            serde_json::to_string(&DisplayValue::Record(rec)).unwrap(),
            r#"{"b":"7","a":"0x0000000000000000000000000000000000000000","_2":false}"#
        );
    }

    #[test]
    fn arrays_of_tuples() {
        let t = ty("(string name)[]");
        let v = AbiValue::Array(vec![AbiValue::Tuple(vec![AbiValue::String("x".into())])]);
        let json = serde_json::to_value(to_display(&v, &t)).unwrap();
        assert_eq!(json, serde_json::json!([{"name": "x"}]));
    }
}
