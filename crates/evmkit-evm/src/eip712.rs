//! EIP-712 typed structured data: build, hash, verify.
//!
//! The pipeline has three stages with separate outcomes:
//!
//! 1. **Build**: parse the `domain`, `types` and `message` JSON sections and
//!    resolve the primary type ([`TypedDataDocument::build`]).
//! 2. **Hash**: `digest = keccak256(0x19 0x01 ‖ domainSeparator ‖ hashStruct(message))`
//!    ([`TypedDataDocument::hash`]).
//! 3. **Verify**: recover the signer of the digest, re-derived from the
//!    document every time ([`verify_typed_signature`]).
//!
//! `encodeType` lists the primary type first and every referenced struct
//! type after it, sorted by name. Struct members hash recursively, arrays
//! hash the concatenation of their encoded elements, `string`/`bytes` hash
//! their contents. Recursive type references are rejected.
//!
//! # Reference
//! <https://eips.ethereum.org/EIPS/eip-712>

use std::collections::BTreeSet;

use alloy_primitives::{Address, U256};
use evmkit_core::{
    error::{TypedDataError, VerifyError},
    hexstr, keccak256, keccak256_concat,
    types::TypeDescriptor,
    value::Integer,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::signature::{RecoverableSignature, Verification};

/// Name of the domain struct type.
pub const DOMAIN_TYPE: &str = "EIP712Domain";

/// Domain fields in canonical order, with their EIP-712 types.
const DOMAIN_FIELDS: [(&str, &str); 5] = [
    ("name", "string"),
    ("version", "string"),
    ("chainId", "uint256"),
    ("verifyingContract", "address"),
    ("salt", "bytes32"),
];

/// A single field within an EIP-712 type definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypedField {
    pub name: String,
    /// Solidity type string (e.g. "address", "uint256", "Person[]")
    #[serde(rename = "type")]
    pub ty: String,
}

impl TypedField {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Struct name → ordered fields, in declaration order.
pub type TypeTable = IndexMap<String, Vec<TypedField>>;

/// A validated typed-data document, ready to hash.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedDataDocument {
    domain: Map<String, Value>,
    types: TypeTable,
    message: Map<String, Value>,
    primary_type: String,
}

/// Hash-stage output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataHash {
    pub primary_type: String,
    pub encoded_type: String,
    pub domain_separator: String,
    pub struct_hash: String,
    pub digest: String,
}

impl TypedDataDocument {
    /// Build a document from its three JSON sections. A blank section reads
    /// as `{}`.
    ///
    /// `primary_type` wins when non-blank; otherwise the first declared type
    /// other than `EIP712Domain` is used.
    pub fn build(
        domain_json: &str,
        types_json: &str,
        message_json: &str,
        primary_type: Option<&str>,
    ) -> Result<Self, TypedDataError> {
        let domain = parse_domain(or_empty_object(domain_json))?;
        let types = parse_types(or_empty_object(types_json))?;
        let message = match serde_json::from_str::<Value>(or_empty_object(message_json)) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(TypedDataError::MessageParse("must be a JSON object".into())),
            Err(e) => return Err(TypedDataError::MessageParse(format!("invalid JSON: {e}"))),
        };

        let primary_type = match primary_type.map(str::trim).filter(|p| !p.is_empty()) {
            Some(explicit) => explicit.to_string(),
            None => types
                .keys()
                .find(|name| name.as_str() != DOMAIN_TYPE)
                .cloned()
                .ok_or_else(|| {
                    TypedDataError::PrimaryTypeMissing(
                        "set primaryType or declare at least one struct type".into(),
                    )
                })?,
        };
        if !types.contains_key(&primary_type) {
            return Err(TypedDataError::PrimaryTypeMissing(format!(
                "'{primary_type}' is not declared in types"
            )));
        }

        tracing::debug!(%primary_type, types = types.len(), "built typed data document");
        Ok(Self {
            domain,
            types,
            message,
            primary_type,
        })
    }

    /// Parse a full `eth_signTypedData_v4` payload
    /// (`{types, primaryType, domain, message}`).
    pub fn from_payload(json: &str) -> Result<Self, TypedDataError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Payload {
            #[serde(default)]
            types: TypeTable,
            primary_type: Option<String>,
            #[serde(default)]
            domain: Map<String, Value>,
            #[serde(default)]
            message: Map<String, Value>,
        }

        let payload: Payload = serde_json::from_str(json)
            .map_err(|e| TypedDataError::TypesParse(format!("invalid payload: {e}")))?;
        let types = serde_json::to_string(&payload.types)
            .map_err(|e| TypedDataError::TypesParse(e.to_string()))?;
        Self::build(
            &Value::Object(payload.domain).to_string(),
            &types,
            &Value::Object(payload.message).to_string(),
            payload.primary_type.as_deref(),
        )
    }

    pub fn primary_type(&self) -> &str {
        &self.primary_type
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn domain(&self) -> &Map<String, Value> {
        &self.domain
    }

    pub fn message(&self) -> &Map<String, Value> {
        &self.message
    }

    /// `encodeType(name)`, e.g. `Mail(Person from,Person to,string contents)Person(string name,address wallet)`.
    pub fn encode_type(&self, name: &str) -> Result<String, TypedDataError> {
        StructEncoder::new(&self.types)
            .encode_type(name)
            .map_err(TypedDataError::HashCompute)
    }

    /// `keccak256(encodeType(name))`
    pub fn type_hash(&self, name: &str) -> Result<[u8; 32], TypedDataError> {
        StructEncoder::new(&self.types)
            .type_hash(name)
            .map_err(TypedDataError::HashCompute)
    }

    /// `hashStruct(name, value)`
    pub fn hash_struct(&self, name: &str, value: &Value) -> Result<[u8; 32], TypedDataError> {
        StructEncoder::new(&self.types)
            .hash_struct(name, value, name)
            .map_err(TypedDataError::HashCompute)
    }

    /// `hashStruct(EIP712Domain, domain)`.
    ///
    /// If the types declare `EIP712Domain`, its fields are used in declared
    /// order, restricted to those present in the domain. Otherwise the type
    /// is derived from the present fields in canonical order.
    pub fn domain_separator(&self) -> Result<[u8; 32], TypedDataError> {
        let fields: Vec<TypedField> = match self.types.get(DOMAIN_TYPE) {
            Some(declared) => declared
                .iter()
                .filter(|f| self.domain.contains_key(&f.name))
                .cloned()
                .collect(),
            None => DOMAIN_FIELDS
                .iter()
                .filter(|(name, _)| self.domain.contains_key(*name))
                .map(|(name, ty)| TypedField::new(*name, *ty))
                .collect(),
        };
        let table: TypeTable = IndexMap::from([(DOMAIN_TYPE.to_string(), fields)]);
        StructEncoder::new(&table)
            .hash_struct(DOMAIN_TYPE, &Value::Object(self.domain.clone()), "domain")
            .map_err(TypedDataError::HashCompute)
    }

    /// `hashStruct(primaryType, message)`
    pub fn struct_hash(&self) -> Result<[u8; 32], TypedDataError> {
        StructEncoder::new(&self.types)
            .hash_struct(
                &self.primary_type,
                &Value::Object(self.message.clone()),
                "message",
            )
            .map_err(TypedDataError::HashCompute)
    }

    /// The signing digest.
    pub fn digest(&self) -> Result<[u8; 32], TypedDataError> {
        Ok(signing_digest(&self.domain_separator()?, &self.struct_hash()?))
    }

    /// Run the hash stage, keeping the intermediate values.
    pub fn hash(&self) -> Result<TypedDataHash, TypedDataError> {
        let encoded_type = self.encode_type(&self.primary_type)?;
        let domain_separator = self.domain_separator()?;
        let struct_hash = self.struct_hash()?;
        let digest = signing_digest(&domain_separator, &struct_hash);

        tracing::debug!(
            primary_type = %self.primary_type,
            digest = %hexstr::encode_hex(digest),
            "hashed typed data"
        );
        Ok(TypedDataHash {
            primary_type: self.primary_type.clone(),
            encoded_type,
            domain_separator: hexstr::encode_hex(domain_separator),
            struct_hash: hexstr::encode_hex(struct_hash),
            digest: hexstr::encode_hex(digest),
        })
    }
}

/// `keccak256(0x19 0x01 ‖ domainSeparator ‖ structHash)`
pub fn signing_digest(domain_separator: &[u8; 32], struct_hash: &[u8; 32]) -> [u8; 32] {
    keccak256_concat([&[0x19u8, 0x01][..], &domain_separator[..], &struct_hash[..]])
}

// ─── Verify ──────────────────────────────────────────────────────────────────

/// Recover the signer of `document` and optionally compare it to `expected`.
///
/// The signature format is checked first; the digest is then re-derived
/// from the document, never taken from an earlier hash result.
pub fn verify_typed_signature(
    document: &TypedDataDocument,
    signature: &str,
    expected: Option<&str>,
) -> Result<Verification, VerifyError> {
    let signature = RecoverableSignature::from_hex(signature)?;
    let digest = document.digest()?;
    let recovered = signature.recover_address(&digest)?;
    Ok(Verification::new(recovered, expected))
}

// ─── Whole pipeline ──────────────────────────────────────────────────────────

/// Raw text inputs of the typed-data tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedDataInputs<'a> {
    pub domain: &'a str,
    pub types: &'a str,
    pub message: &'a str,
    pub primary_type: Option<&'a str>,
    pub signature: Option<&'a str>,
    pub expected_address: Option<&'a str>,
}

/// Per-stage outcomes. A later stage is `None` when it did not run.
#[derive(Debug, Clone)]
pub struct TypedDataReport {
    pub document: Result<TypedDataDocument, TypedDataError>,
    pub hash: Option<Result<TypedDataHash, TypedDataError>>,
    /// Runs only when a non-blank signature was supplied.
    pub verification: Option<Result<Verification, VerifyError>>,
}

/// Build, hash and (when a signature is given) verify in one pass.
pub fn evaluate(inputs: &TypedDataInputs<'_>) -> TypedDataReport {
    let document = TypedDataDocument::build(
        inputs.domain,
        inputs.types,
        inputs.message,
        inputs.primary_type,
    );
    let (hash, verification) = match &document {
        Ok(doc) => {
            let signature = inputs.signature.map(str::trim).filter(|s| !s.is_empty());
            (
                Some(doc.hash()),
                signature.map(|sig| verify_typed_signature(doc, sig, inputs.expected_address)),
            )
        }
        Err(e) => {
            tracing::debug!(error = %e, "typed data build failed");
            (None, None)
        }
    };
    TypedDataReport {
        document,
        hash,
        verification,
    }
}

impl Serialize for TypedDataReport {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(untagged)]
        enum Outcome<'a, T: Serialize> {
            Ok(&'a T),
            Err { error: String },
        }

        fn outcome<T: Serialize, E: std::fmt::Display>(r: &Result<T, E>) -> Outcome<'_, T> {
            match r {
                Ok(v) => Outcome::Ok(v),
                Err(e) => Outcome::Err {
                    error: e.to_string(),
                },
            }
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Built<'a> {
            primary_type: &'a str,
        }

        #[derive(Serialize)]
        struct Wire<'a> {
            build: Outcome<'a, Built<'a>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            hash: Option<Outcome<'a, TypedDataHash>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            verification: Option<Outcome<'a, Verification>>,
        }

        let built = self.document.as_ref().map(|doc| Built {
            primary_type: doc.primary_type(),
        });
        Wire {
            build: outcome(&built),
            hash: self.hash.as_ref().map(outcome),
            verification: self.verification.as_ref().map(outcome),
        }
        .serialize(serializer)
    }
}

// ─── Section parsing ─────────────────────────────────────────────────────────

fn or_empty_object(text: &str) -> &str {
    if text.trim().is_empty() {
        "{}"
    } else {
        text
    }
}

fn parse_domain(json: &str) -> Result<Map<String, Value>, TypedDataError> {
    let map = match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Err(TypedDataError::DomainParse("must be a JSON object".into())),
        Err(e) => return Err(TypedDataError::DomainParse(format!("invalid JSON: {e}"))),
    };

    let empty = TypeTable::new();
    let checker = StructEncoder::new(&empty);
    let mut domain = Map::new();
    for (key, value) in map {
        if value.is_null() {
            continue;
        }
        let Some((_, ty)) = DOMAIN_FIELDS.iter().find(|(name, _)| *name == key) else {
            return Err(TypedDataError::DomainParse(format!(
                "unsupported field '{key}' (expected name, version, chainId, verifyingContract or salt)"
            )));
        };
        checker
            .encode_field(ty, &value, &key)
            .map_err(TypedDataError::DomainParse)?;
        domain.insert(key, value);
    }
    Ok(domain)
}

fn parse_types(json: &str) -> Result<TypeTable, TypedDataError> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(_)) => {}
        Ok(_) => {
            return Err(TypedDataError::TypesParse(
                "must be a JSON object mapping type names to field lists".into(),
            ))
        }
        Err(e) => return Err(TypedDataError::TypesParse(format!("invalid JSON: {e}"))),
    }
    // Second pass into an IndexMap keeps declaration order.
    let table: TypeTable =
        serde_json::from_str(json).map_err(|e| TypedDataError::TypesParse(e.to_string()))?;

    for (name, fields) in &table {
        if !is_identifier(name) {
            return Err(TypedDataError::TypesParse(format!(
                "invalid type name '{name}'"
            )));
        }
        let mut seen = BTreeSet::new();
        for field in fields {
            if !seen.insert(field.name.as_str()) {
                return Err(TypedDataError::TypesParse(format!(
                    "duplicate field '{}' in {name}",
                    field.name
                )));
            }
        }
    }
    Ok(table)
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// ─── Struct encoding ─────────────────────────────────────────────────────────

struct StructEncoder<'a> {
    types: &'a TypeTable,
}

impl<'a> StructEncoder<'a> {
    fn new(types: &'a TypeTable) -> Self {
        Self { types }
    }

    fn fields(&self, name: &str) -> Result<&'a [TypedField], String> {
        self.types
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| format!("type '{name}' is not declared"))
    }

    fn encode_type(&self, name: &str) -> Result<String, String> {
        let mut deps = BTreeSet::new();
        self.collect_deps(name, &mut Vec::new(), &mut deps)?;
        deps.remove(name);

        let mut out = self.type_signature(name)?;
        for dep in &deps {
            out.push_str(&self.type_signature(dep)?);
        }
        Ok(out)
    }

    fn type_signature(&self, name: &str) -> Result<String, String> {
        let members: Vec<String> = self
            .fields(name)?
            .iter()
            .map(|f| format!("{} {}", f.ty, f.name))
            .collect();
        Ok(format!("{name}({})", members.join(",")))
    }

    /// Depth-first walk collecting every struct reachable from `name`.
    /// `stack` holds the current path so recursion can be detected.
    fn collect_deps(
        &self,
        name: &str,
        stack: &mut Vec<String>,
        found: &mut BTreeSet<String>,
    ) -> Result<(), String> {
        if stack.iter().any(|s| s == name) {
            return Err(format!(
                "circular type reference: {} -> {name}",
                stack.join(" -> ")
            ));
        }
        if found.contains(name) {
            return Ok(());
        }
        let fields = self.fields(name)?;
        found.insert(name.to_string());
        stack.push(name.to_string());
        for field in fields {
            let base = base_type(&field.ty);
            if self.types.contains_key(base) {
                self.collect_deps(base, stack, found)?;
            } else if !is_elementary(base) {
                return Err(format!(
                    "{name}.{}: type '{base}' is not declared",
                    field.name
                ));
            }
        }
        stack.pop();
        Ok(())
    }

    fn type_hash(&self, name: &str) -> Result<[u8; 32], String> {
        Ok(keccak256(self.encode_type(name)?))
    }

    fn hash_struct(&self, name: &str, value: &Value, path: &str) -> Result<[u8; 32], String> {
        let object = value
            .as_object()
            .ok_or_else(|| format!("{path}: expected an object for {name}"))?;
        let mut words = vec![self.type_hash(name)?];
        for field in self.fields(name)? {
            let member = format!("{path}.{}", field.name);
            let item = object
                .get(&field.name)
                .filter(|v| !v.is_null())
                .ok_or_else(|| format!("{member}: missing value"))?;
            words.push(self.encode_field(&field.ty, item, &member)?);
        }
        Ok(keccak256_concat(words.iter().map(|w| w.as_slice())))
    }

    /// The 32-byte `encodeData` word of one member.
    fn encode_field(&self, ty: &str, value: &Value, path: &str) -> Result<[u8; 32], String> {
        if let Some((inner, length)) = split_array(ty)? {
            let items = value
                .as_array()
                .ok_or_else(|| format!("{path}: expected an array for {ty}"))?;
            if let Some(expected) = length {
                if items.len() != expected {
                    return Err(format!(
                        "{path}: expected {expected} elements, got {}",
                        items.len()
                    ));
                }
            }
            let words = items
                .iter()
                .enumerate()
                .map(|(i, item)| self.encode_field(inner, item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(keccak256_concat(words.iter().map(|w| w.as_slice())));
        }

        if self.types.contains_key(ty) {
            return self.hash_struct(ty, value, path);
        }

        let mismatch = |expected: &str| format!("{path}: expected {expected} for {ty}");
        match TypeDescriptor::elementary(ty).filter(|t| *t != TypeDescriptor::Function) {
            Some(TypeDescriptor::String) => value
                .as_str()
                .map(keccak256)
                .ok_or_else(|| mismatch("a string")),
            Some(TypeDescriptor::Bytes) => {
                let text = value.as_str().ok_or_else(|| mismatch("a hex string"))?;
                let bytes = hexstr::decode_hex(text).map_err(|e| format!("{path}: {e}"))?;
                Ok(keccak256(bytes))
            }
            Some(TypeDescriptor::FixedBytes(size)) => {
                let text = value.as_str().ok_or_else(|| mismatch("a hex string"))?;
                let bytes = hexstr::decode_hex_strict(text, Some(size))
                    .map_err(|e| format!("{path}: {e}"))?;
                let mut word = [0u8; 32];
                word[..size].copy_from_slice(&bytes);
                Ok(word)
            }
            Some(TypeDescriptor::Address) => {
                let text = value.as_str().ok_or_else(|| mismatch("an address string"))?;
                let body = hexstr::strip_0x(text.trim());
                if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(mismatch("a 20-byte address"));
                }
                let bytes = hexstr::decode_hex(body).map_err(|e| format!("{path}: {e}"))?;
                let address = Address::try_from(bytes.as_slice())
                    .map_err(|_| mismatch("a 20-byte address"))?;
                let mut word = [0u8; 32];
                word[12..].copy_from_slice(address.as_slice());
                Ok(word)
            }
            Some(TypeDescriptor::Bool) => match value {
                Value::Bool(b) => Ok(U256::from(u8::from(*b)).to_be_bytes::<32>()),
                Value::String(s) if s == "true" || s == "false" => {
                    Ok(U256::from(u8::from(s == "true")).to_be_bytes::<32>())
                }
                _ => Err(mismatch("a boolean")),
            },
            Some(TypeDescriptor::Uint(bits)) | Some(TypeDescriptor::Int(bits)) => {
                let signed = ty.starts_with("int");
                let int = integer_value(value).ok_or_else(|| mismatch("an integer"))?;
                int.to_word(signed, bits)
                    .ok_or_else(|| format!("{path}: {int} does not fit in {ty}"))
            }
            _ => Err(format!("{path}: unsupported type '{ty}'")),
        }
    }
}

/// `"Person[][2]"` → `Some(("Person[]", Some(2)))`; `None` when not an array.
fn split_array(ty: &str) -> Result<Option<(&str, Option<usize>)>, String> {
    let Some(without_close) = ty.strip_suffix(']') else {
        return Ok(None);
    };
    let open = without_close
        .rfind('[')
        .ok_or_else(|| format!("malformed array type '{ty}'"))?;
    let dims = &without_close[open + 1..];
    let length = if dims.is_empty() {
        None
    } else {
        Some(
            dims.parse::<usize>()
                .map_err(|_| format!("malformed array length in '{ty}'"))?,
        )
    };
    Ok(Some((&ty[..open], length)))
}

fn base_type(ty: &str) -> &str {
    ty.split('[').next().unwrap_or(ty)
}

/// Elementary types allowed in EIP-712 (no `function`).
fn is_elementary(ty: &str) -> bool {
    !matches!(
        TypeDescriptor::elementary(ty),
        None | Some(TypeDescriptor::Function)
    )
}

/// JSON number, decimal string or `0x` hex string.
fn integer_value(value: &Value) -> Option<Integer> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(Integer::from)
            .or_else(|| n.as_i64().map(Integer::from)),
        Value::String(s) => {
            let s = s.trim();
            let (negative, body) = match s.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, s),
            };
            match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
                Some(digits) if !digits.is_empty() => U256::from_str_radix(digits, 16)
                    .ok()
                    .map(|m| Integer::from_u256(negative, m)),
                Some(_) => None,
                None => s.parse().ok(),
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIL_TYPES: &str = r#"{
        "EIP712Domain": [
            {"name": "name", "type": "string"},
            {"name": "version", "type": "string"},
            {"name": "chainId", "type": "uint256"},
            {"name": "verifyingContract", "type": "address"}
        ],
        "Person": [
            {"name": "name", "type": "string"},
            {"name": "wallet", "type": "address"}
        ],
        "Mail": [
            {"name": "from", "type": "Person"},
            {"name": "to", "type": "Person"},
            {"name": "contents", "type": "string"}
        ]
    }"#;
    const MAIL_DOMAIN: &str = r#"{
        "name": "Ether Mail",
        "version": "1",
        "chainId": 1,
        "verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
    }"#;
    const MAIL_MESSAGE: &str = r#"{
        "from": {"name": "Cow", "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"},
        "to": {"name": "Bob", "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB"},
        "contents": "Hello, Bob!"
    }"#;
    const MAIL_SIG: &str = "0x4355c47d63924e8a72e509b65029052eb6c299d53a04e167c5775fd466751c9d07299936d304c153f6443dfa05f40ff007d72911b6f72307f996231605b915621c";

    fn mail() -> TypedDataDocument {
        TypedDataDocument::build(MAIL_DOMAIN, MAIL_TYPES, MAIL_MESSAGE, None).unwrap()
    }

    fn hex32(bytes: [u8; 32]) -> String {
        hex::encode(bytes)
    }

    #[test]
    fn ether_mail_vectors() {
        let doc = mail();
        assert_eq!(doc.primary_type(), "Person");
        let doc = TypedDataDocument::build(MAIL_DOMAIN, MAIL_TYPES, MAIL_MESSAGE, Some("Mail")).unwrap();
        assert_eq!(
            doc.encode_type("Mail").unwrap(),
            "Mail(Person from,Person to,string contents)Person(string name,address wallet)"
        );
        assert_eq!(
            hex32(doc.type_hash("Mail").unwrap()),
            "a0cedeb2dc280ba39b857546d74f5549c3a1d7bdc2dd96bf881f76108e23dac2"
        );
        assert_eq!(
            hex32(doc.domain_separator().unwrap()),
            "f2cee375fa42b42143804025fc449deafd50cc031ca257e0b194a650a912090f"
        );
        assert_eq!(
            hex32(doc.struct_hash().unwrap()),
            "c52c0ee5d84264471806290a3f2c4cecfc5490626bf912d01f240d7a274b371e"
        );
        let summary = doc.hash().unwrap();
        assert_eq!(
            summary.digest,
            "0xbe609aee343fb3c4b28e1df9e632fca64fcfaede20f02e86244efddf30957bd2"
        );
    }

    #[test]
    fn verify_ether_mail_signature() {
        let doc = TypedDataDocument::build(MAIL_DOMAIN, MAIL_TYPES, MAIL_MESSAGE, Some("Mail")).unwrap();
        let v = verify_typed_signature(
            &doc,
            MAIL_SIG,
            Some("0xcd2a3d9f938e13cd947ec05abc7fe734df8dd826"),
        )
        .unwrap();
        assert_eq!(v.address, "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826");
        assert_eq!(v.matches, Some(true));
    }

    #[test]
    fn primary_type_defaults_to_first_non_domain_type() {
        let types = r#"{"EIP712Domain": [], "Mail": [{"name": "contents", "type": "string"}], "Other": []}"#;
        let doc = TypedDataDocument::build("{}", types, r#"{"contents": "x"}"#, Some("  ")).unwrap();
        assert_eq!(doc.primary_type(), "Mail");
    }

    #[test]
    fn derived_domain_type_and_message_edit() {
        let domain = r#"{"name": "MyDApp", "version": "1", "chainId": 1}"#;
        let types = r#"{"Mail": [{"name": "from", "type": "address"}, {"name": "contents", "type": "string"}]}"#;
        let message = |contents: &str| {
            format!(
                r#"{{"from": "0x0000000000000000000000000000000000000000", "contents": "{contents}"}}"#
            )
        };
        let hi = TypedDataDocument::build(domain, types, &message("hi"), None).unwrap();
        assert_eq!(
            hex32(hi.domain_separator().unwrap()),
            "dafad08c5be1f4c75af0fa803c46c3a2d9446e0d6e415b8d22ec1a450c54e837"
        );
        assert_eq!(
            hex32(hi.digest().unwrap()),
            "e99964d28573ce938484971a4a43b40c8648ab9501cc0678b2336e0f1a9ab6ac"
        );
        let hj = TypedDataDocument::build(domain, types, &message("hj"), None).unwrap();
        assert_eq!(
            hex32(hj.digest().unwrap()),
            "9167d6ada2420edd9ffbaeff23d7ffd9b8019a6286d967938b697123da64e39d"
        );
    }

    #[test]
    fn declared_domain_type_limited_to_present_fields() {
        let types = r#"{
            "EIP712Domain": [
                {"name": "chainId", "type": "uint256"},
                {"name": "name", "type": "string"}
            ],
            "Ping": []
        }"#;
        let domain = r#"{"name": "X", "version": "2", "chainId": "5"}"#;
        let doc = TypedDataDocument::build(domain, types, "{}", None).unwrap();
        assert_eq!(
            hex32(doc.domain_separator().unwrap()),
            "656129f9093b97a58b173ec434f9e815b7c1f027d61fc9a4fee223551fc6928b"
        );
    }

    #[test]
    fn domain_salt() {
        let domain = format!(r#"{{"name": "Salty", "salt": "0x{}"}}"#, "11".repeat(32));
        let doc = TypedDataDocument::build(&domain, r#"{"Ping": []}"#, "{}", None).unwrap();
        assert_eq!(
            hex32(doc.domain_separator().unwrap()),
            "fc6d2c26c62f87eb26f3fe5704fda2bb45bc5c3bae8e81740451fb8b2a26893c"
        );
    }

    #[test]
    fn arrays_of_structs() {
        let types = r#"{
            "EIP712Domain": [
                {"name": "name", "type": "string"},
                {"name": "version", "type": "string"},
                {"name": "chainId", "type": "uint256"},
                {"name": "verifyingContract", "type": "address"}
            ],
            "Person": [
                {"name": "name", "type": "string"},
                {"name": "wallets", "type": "address[]"}
            ],
            "Mail": [
                {"name": "from", "type": "Person"},
                {"name": "to", "type": "Person[]"},
                {"name": "contents", "type": "string"}
            ],
            "Group": [
                {"name": "name", "type": "string"},
                {"name": "members", "type": "Person[]"}
            ]
        }"#;
        let message = r#"{
            "from": {"name": "Cow", "wallets": ["0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826", "0xDeaDbeefdEAdbeefdEadbEEFdeadbeEFdEaDbeeF"]},
            "to": [{"name": "Bob", "wallets": ["0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB", "0xB0BdaBea57B0BDABeA57b0bdABEA57b0BDabEa57", "0xB0B0b0b0b0b0B000000000000000000000000000"]}],
            "contents": "Hello, Bob!"
        }"#;
        let doc = TypedDataDocument::build(MAIL_DOMAIN, types, message, Some("Mail")).unwrap();
        let summary = doc.hash().unwrap();
        assert_eq!(
            summary.encoded_type,
            "Mail(Person from,Person[] to,string contents)Person(string name,address[] wallets)"
        );
        assert_eq!(
            summary.digest,
            "0xa85c2e2b118698e88db68a8105b794a8cc7cec074e89ef991cb4f5f533819cc2"
        );
    }

    #[test]
    fn scalar_members() {
        let types = r#"{"Order": [
            {"name": "maker", "type": "address"},
            {"name": "amount", "type": "int256"},
            {"name": "data", "type": "bytes"},
            {"name": "flag", "type": "bool"},
            {"name": "tag", "type": "bytes4"},
            {"name": "ids", "type": "uint8[2]"}
        ]}"#;
        let message = r#"{
            "maker": "0x000000000000000000000000000000000000dEaD",
            "amount": -5,
            "data": "0xdeadbeef",
            "flag": true,
            "tag": "0x01020304",
            "ids": [1, "0xff"]
        }"#;
        let doc = TypedDataDocument::build(r#"{"chainId": 137}"#, types, message, None).unwrap();
        assert_eq!(
            hex32(doc.digest().unwrap()),
            "af8297b3fd73fd5c7996d1513774604af0b559b7091df6445bb69e85c6b59dc7"
        );
    }

    #[test]
    fn build_errors_name_their_section() {
        assert!(matches!(
            TypedDataDocument::build("{", MAIL_TYPES, MAIL_MESSAGE, None),
            Err(TypedDataError::DomainParse(_))
        ));
        assert!(matches!(
            TypedDataDocument::build(r#"{"foo": 1}"#, MAIL_TYPES, MAIL_MESSAGE, None),
            Err(TypedDataError::DomainParse(_))
        ));
        assert!(matches!(
            TypedDataDocument::build(r#"{"chainId": "abc"}"#, MAIL_TYPES, MAIL_MESSAGE, None),
            Err(TypedDataError::DomainParse(_))
        ));
        assert!(matches!(
            TypedDataDocument::build(MAIL_DOMAIN, "[]", MAIL_MESSAGE, None),
            Err(TypedDataError::TypesParse(_))
        ));
        assert!(matches!(
            TypedDataDocument::build(MAIL_DOMAIN, MAIL_TYPES, "[1]", None),
            Err(TypedDataError::MessageParse(_))
        ));
        assert!(matches!(
            TypedDataDocument::build(MAIL_DOMAIN, r#"{"EIP712Domain": []}"#, "{}", None),
            Err(TypedDataError::PrimaryTypeMissing(_))
        ));
        assert!(matches!(
            TypedDataDocument::build(MAIL_DOMAIN, MAIL_TYPES, MAIL_MESSAGE, Some("Letter")),
            Err(TypedDataError::PrimaryTypeMissing(_))
        ));
    }

    #[test]
    fn blank_sections_read_as_empty_objects() {
        let doc = TypedDataDocument::build("", r#"{"Ping":[]}"#, "  ", None).unwrap();
        assert!(doc.domain().is_empty());
        assert!(doc.message().is_empty());
        assert_eq!(doc.primary_type(), "Ping");
        assert!(doc.hash().is_ok());

        // no types at all still needs a primary type
        assert!(matches!(
            TypedDataDocument::build("", "\n", "", None),
            Err(TypedDataError::PrimaryTypeMissing(_))
        ));
    }

    #[test]
    fn address_with_inner_whitespace_is_rejected() {
        let spaced = format!("0x{}  {}", "00".repeat(10), "00".repeat(9));
        let types = r#"{"Mail": [{"name": "from", "type": "address"}]}"#;

        let message = format!(r#"{{"from": "{spaced}"}}"#);
        let doc = TypedDataDocument::build("{}", types, &message, None).unwrap();
        let err = doc.digest().unwrap_err();
        assert!(matches!(err, TypedDataError::HashCompute(ref m) if m.contains("message.from")));

        let domain = format!(r#"{{"verifyingContract": "{spaced}"}}"#);
        assert!(matches!(
            TypedDataDocument::build(&domain, types, "{}", None),
            Err(TypedDataError::DomainParse(_))
        ));
    }

    #[test]
    fn hash_errors() {
        let undefined = r#"{"Mail": [{"name": "to", "type": "Recipient"}]}"#;
        let doc = TypedDataDocument::build("{}", undefined, r#"{"to": {}}"#, None).unwrap();
        let err = doc.hash().unwrap_err();
        assert!(matches!(err, TypedDataError::HashCompute(ref m) if m.contains("Recipient")));

        let cyclic = r#"{"Node": [{"name": "next", "type": "Node[]"}]}"#;
        let doc = TypedDataDocument::build("{}", cyclic, r#"{"next": []}"#, None).unwrap();
        let err = doc.hash().unwrap_err();
        assert!(matches!(err, TypedDataError::HashCompute(ref m) if m.contains("circular")));

        let doc = TypedDataDocument::build(MAIL_DOMAIN, MAIL_TYPES, r#"{"from": {}}"#, Some("Mail")).unwrap();
        let err = doc.hash().unwrap_err();
        assert!(matches!(err, TypedDataError::HashCompute(ref m) if m.contains("message.from.name")));

        let overflow = r#"{"T": [{"name": "v", "type": "uint8"}]}"#;
        let doc = TypedDataDocument::build("{}", overflow, r#"{"v": 256}"#, None).unwrap();
        assert!(doc.digest().is_err());
    }

    #[test]
    fn evaluate_keeps_stage_outcomes_apart() {
        let ok = evaluate(&TypedDataInputs {
            domain: MAIL_DOMAIN,
            types: MAIL_TYPES,
            message: MAIL_MESSAGE,
            primary_type: Some("Mail"),
            signature: Some("0x1234"),
            expected_address: None,
        });
        assert!(ok.document.is_ok());
        assert!(matches!(ok.hash, Some(Ok(_))));
        assert!(matches!(
            ok.verification,
            Some(Err(VerifyError::Signature(_)))
        ));

        let broken = evaluate(&TypedDataInputs {
            domain: "{",
            ..TypedDataInputs::default()
        });
        assert!(broken.document.is_err());
        assert!(broken.hash.is_none());
        assert!(broken.verification.is_none());

        let json = serde_json::to_value(&broken).unwrap();
        assert!(json["build"]["error"].as_str().unwrap().starts_with("domain:"));
    }

    #[test]
    fn editing_the_message_changes_the_recovered_signer() {
        let edited = MAIL_MESSAGE.replace("Hello, Bob!", "Hello, Bob?");
        let doc = TypedDataDocument::build(MAIL_DOMAIN, MAIL_TYPES, &edited, Some("Mail")).unwrap();
        let v = verify_typed_signature(&doc, MAIL_SIG, Some("0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"));
        match v {
            Ok(v) => assert_eq!(v.matches, Some(false)),
            Err(e) => assert!(matches!(e, VerifyError::Signature(_))),
        }
    }

    #[test]
    fn from_payload_reads_all_sections() {
        let payload = format!(
            r#"{{"types": {MAIL_TYPES}, "primaryType": "Mail", "domain": {MAIL_DOMAIN}, "message": {MAIL_MESSAGE}}}"#
        );
        let doc = TypedDataDocument::from_payload(&payload).unwrap();
        assert_eq!(
            hex32(doc.digest().unwrap()),
            "be609aee343fb3c4b28e1df9e632fca64fcfaede20f02e86244efddf30957bd2"
        );
    }
}
