//! Function signatures and ABI JSON interfaces.
//!
//! A [`FunctionSignature`] is identified by its canonical string
//! `name(type1,type2,...)`: parameter names dropped, no spaces, tuples
//! expanded recursively. The 4-byte selector is the first four bytes of the
//! keccak256 of that string.

use alloy_json_abi::{AbiItem, Function, Param};
use evmkit_core::{
    error::ParseError,
    hexstr,
    keccak256,
    types::{Component, TypeDescriptor},
};
use serde::Serialize;

/// A function name plus its ordered, typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub inputs: Vec<Component>,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>, inputs: Vec<Component>) -> Self {
        Self {
            name: name.into(),
            inputs,
        }
    }

    /// Parse a human-readable signature such as
    /// `"transfer(address to, uint256 amount)"` or
    /// `"function swap((address,uint24)[] path)"`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let invalid = |reason: &str| ParseError::InvalidSignature {
            signature: text.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = text.trim();
        let trimmed = trimmed.strip_prefix("function ").unwrap_or(trimmed).trim_start();
        let open = trimmed.find('(').ok_or_else(|| invalid("missing '('"))?;
        let name = trimmed[..open].trim();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
            || name.starts_with(|c: char| c.is_ascii_digit())
        {
            return Err(invalid("function name must be an identifier"));
        }

        let params = &trimmed[open..];
        match TypeDescriptor::parse(params) {
            Ok(TypeDescriptor::Tuple(inputs)) => Ok(Self::new(name, inputs)),
            Ok(_) => Err(invalid("parameter list must be a single parenthesised group")),
            Err(e) => Err(invalid(&e.to_string())),
        }
    }

    /// Convert an `alloy-json-abi` function definition.
    pub fn from_json_function(func: &Function) -> Result<Self, ParseError> {
        let inputs = func
            .inputs
            .iter()
            .map(component_from_param)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(func.name.clone(), inputs))
    }

    /// `name(type1,type2,...)`, the selector preimage.
    pub fn canonical(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(|c| c.ty.to_string()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// First 4 bytes of `keccak256(canonical())`.
    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.canonical());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    /// Selector as `"0xaabbccdd"`.
    pub fn selector_hex(&self) -> String {
        hexstr::encode_hex(self.selector())
    }

    /// The parameter list viewed as one tuple type.
    pub fn input_tuple(&self) -> TypeDescriptor {
        TypeDescriptor::Tuple(self.inputs.clone())
    }

    /// Parameter name for display, `arg{i}` when unnamed.
    pub fn input_name(&self, index: usize) -> String {
        match self.inputs.get(index) {
            Some(c) if !c.name.is_empty() => c.name.clone(),
            _ => format!("arg{index}"),
        }
    }
}

fn component_from_param(param: &Param) -> Result<Component, ParseError> {
    let components = param
        .components
        .iter()
        .map(component_from_param)
        .collect::<Result<Vec<_>, _>>()?;
    let ty = TypeDescriptor::from_abi_param(&param.ty, components)?;
    Ok(Component::new(param.name.clone(), ty))
}

/// One row of [`AbiInterface::functions`].
#[derive(Debug, Clone, Serialize)]
pub struct FunctionEntry {
    pub signature: String,
    pub selector: String,
}

/// The functions of a contract ABI, parsed from its JSON form.
#[derive(Debug, Clone)]
pub struct AbiInterface {
    functions: Vec<FunctionSignature>,
}

impl AbiInterface {
    /// Parse a standard Ethereum ABI JSON document. The document must be a
    /// JSON array; non-function entries (events, errors, constructor) are
    /// accepted and skipped. Functions keep their declaration order.
    pub fn from_json(abi_json: &str) -> Result<Self, ParseError> {
        let value: serde_json::Value =
            serde_json::from_str(abi_json).map_err(|e| ParseError::InvalidAbi {
                reason: e.to_string(),
            })?;
        if !value.is_array() {
            return Err(ParseError::InvalidAbi {
                reason: "ABI must be a JSON array".into(),
            });
        }
        let items: Vec<AbiItem<'static>> =
            serde_json::from_value(value).map_err(|e| ParseError::InvalidAbi {
                reason: e.to_string(),
            })?;

        let functions = items
            .iter()
            .filter_map(|item| match item {
                AbiItem::Function(func) => Some(FunctionSignature::from_json_function(func)),
                _ => None,
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = functions.len(), "parsed ABI interface");
        Ok(Self { functions })
    }

    pub fn functions(&self) -> &[FunctionSignature] {
        &self.functions
    }

    /// Canonical signature + selector for every function.
    pub fn entries(&self) -> Vec<FunctionEntry> {
        self.functions
            .iter()
            .map(|f| FunctionEntry {
                signature: f.canonical(),
                selector: f.selector_hex(),
            })
            .collect()
    }

    /// Look up by canonical signature (`"transfer(address,uint256)"`),
    /// by selector hex, or by bare name (first match for overloads).
    pub fn function(&self, key: &str) -> Option<&FunctionSignature> {
        let key = key.trim();
        self.functions
            .iter()
            .find(|f| f.canonical() == key)
            .or_else(|| {
                self.functions
                    .iter()
                    .find(|f| f.selector_hex().eq_ignore_ascii_case(key))
            })
            .or_else(|| self.functions.iter().find(|f| f.name == key))
    }
}
