//! Solidity type grammar.
//!
//! A [`TypeDescriptor`] is the parsed form of an ABI type string such as
//! `uint256`, `bytes32[]` or `(address to,uint256 amount)[2]`. Parsing is a
//! small recursive descent over the grammar:
//!
//! ```text
//! type      := base suffix*
//! base      := "tuple"? "(" [component ("," component)*] ")" | elementary
//! component := type [name]
//! suffix    := "[" digits? "]"
//! ```

use crate::error::ParseError;
use serde::{Serialize, Serializer};
use std::fmt;

/// A parsed Solidity type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Address,
    Bool,
    String,
    /// Dynamic `bytes`
    Bytes,
    /// `bytes1` .. `bytes32`. Length in bytes.
    FixedBytes(usize),
    /// `int8` .. `int256`. Width in bits.
    Int(usize),
    /// `uint8` .. `uint256`. Width in bits.
    Uint(usize),
    /// External function reference: 20-byte address + 4-byte selector,
    /// handled as an opaque 24-byte blob.
    Function,
    /// `T[]` when `length` is `None`, `T[k]` otherwise.
    Array {
        element: Box<TypeDescriptor>,
        length: Option<usize>,
    },
    Tuple(Vec<Component>),
}

/// A named member of a tuple or a function parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    /// May be empty for unnamed parameters.
    pub name: String,
    pub ty: TypeDescriptor,
}

impl Component {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Byte width of the ABI `function` type.
pub const FUNCTION_TYPE_BYTES: usize = 24;

impl TypeDescriptor {
    /// Parse a type string, e.g. `"(address,uint256)[]"`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut cursor = Cursor::new(text);
        let ty = cursor.parse_type()?;
        cursor.skip_ws();
        if !cursor.at_end() {
            return Err(cursor.error("unexpected trailing input"));
        }
        Ok(ty)
    }

    /// Build from an ABI JSON parameter: `ty` is the raw `"type"` field
    /// (e.g. `"tuple[2][]"`), `components` its already-converted members.
    pub fn from_abi_param(ty: &str, components: Vec<Component>) -> Result<Self, ParseError> {
        let ty = ty.trim();
        match ty.strip_prefix("tuple") {
            Some(suffixes) if suffixes.is_empty() || suffixes.starts_with('[') => {
                let mut cursor = Cursor::new(suffixes);
                let wrapped = cursor.parse_suffixes(TypeDescriptor::Tuple(components))?;
                if !cursor.at_end() {
                    return Err(cursor.error("unexpected trailing input"));
                }
                Ok(wrapped)
            }
            _ => Self::parse(ty),
        }
    }

    /// Parse an elementary (non-composite) type name.
    pub fn elementary(name: &str) -> Option<Self> {
        let ty = match name {
            "address" => TypeDescriptor::Address,
            "bool" => TypeDescriptor::Bool,
            "string" => TypeDescriptor::String,
            "bytes" => TypeDescriptor::Bytes,
            "function" => TypeDescriptor::Function,
            "byte" => TypeDescriptor::FixedBytes(1),
            "uint" => TypeDescriptor::Uint(256),
            "int" => TypeDescriptor::Int(256),
            _ => {
                if let Some(n) = name.strip_prefix("bytes") {
                    let size = parse_width(n)?;
                    if !(1..=32).contains(&size) {
                        return None;
                    }
                    TypeDescriptor::FixedBytes(size)
                } else if let Some(n) = name.strip_prefix("uint") {
                    TypeDescriptor::Uint(int_width(n)?)
                } else if let Some(n) = name.strip_prefix("int") {
                    TypeDescriptor::Int(int_width(n)?)
                } else {
                    return None;
                }
            }
        };
        Some(ty)
    }

    /// True when the ABI encoding places this value in the tail.
    pub fn is_dynamic(&self) -> bool {
        match self {
            TypeDescriptor::Bytes | TypeDescriptor::String => true,
            TypeDescriptor::Array { length: None, .. } => true,
            TypeDescriptor::Array {
                element,
                length: Some(_),
            } => element.is_dynamic(),
            TypeDescriptor::Tuple(components) => components.iter().any(|c| c.ty.is_dynamic()),
            _ => false,
        }
    }

    /// Bytes this type occupies in the head of an enclosing tuple.
    /// Saturates at `usize::MAX` for absurdly large fixed arrays.
    pub fn head_size(&self) -> usize {
        self.checked_head_size().unwrap_or(usize::MAX)
    }

    /// [`head_size`](Self::head_size), or `None` when it does not fit a `usize`.
    pub fn checked_head_size(&self) -> Option<usize> {
        if self.is_dynamic() {
            return Some(32);
        }
        match self {
            TypeDescriptor::Array {
                element,
                length: Some(n),
            } => element.checked_head_size()?.checked_mul(*n),
            TypeDescriptor::Tuple(components) => components
                .iter()
                .try_fold(0usize, |acc, c| acc.checked_add(c.ty.checked_head_size()?)),
            _ => Some(32),
        }
    }

    /// Short family name used in error messages and display dispatch.
    pub fn base_name(&self) -> &'static str {
        match self {
            TypeDescriptor::Address => "address",
            TypeDescriptor::Bool => "bool",
            TypeDescriptor::String => "string",
            TypeDescriptor::Bytes | TypeDescriptor::FixedBytes(_) => "bytes",
            TypeDescriptor::Int(_) => "int",
            TypeDescriptor::Uint(_) => "uint",
            TypeDescriptor::Function => "function",
            TypeDescriptor::Array { .. } => "array",
            TypeDescriptor::Tuple(_) => "tuple",
        }
    }
}

fn parse_width(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) || digits.starts_with('0')
    {
        return None;
    }
    digits.parse().ok()
}

fn int_width(digits: &str) -> Option<usize> {
    if digits.is_empty() {
        return Some(256);
    }
    let bits = parse_width(digits)?;
    (bits % 8 == 0 && (8..=256).contains(&bits)).then_some(bits)
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Address => write!(f, "address"),
            TypeDescriptor::Bool => write!(f, "bool"),
            TypeDescriptor::String => write!(f, "string"),
            TypeDescriptor::Bytes => write!(f, "bytes"),
            TypeDescriptor::FixedBytes(n) => write!(f, "bytes{n}"),
            TypeDescriptor::Int(bits) => write!(f, "int{bits}"),
            TypeDescriptor::Uint(bits) => write!(f, "uint{bits}"),
            TypeDescriptor::Function => write!(f, "function"),
            TypeDescriptor::Array {
                element,
                length: None,
            } => write!(f, "{element}[]"),
            TypeDescriptor::Array {
                element,
                length: Some(n),
            } => write!(f, "{element}[{n}]"),
            TypeDescriptor::Tuple(components) => {
                write!(f, "(")?;
                for (i, c) in components.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", c.ty)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ─── Recursive descent ────────────────────────────────────────────────────────

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn error(&self, reason: &str) -> ParseError {
        ParseError::InvalidType {
            ty: self.src.to_string(),
            reason: format!("{reason} at position {}", self.pos),
        }
    }

    fn ident(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '$') {
                break;
            }
            self.pos += 1;
        }
        &src[start..self.pos]
    }

    fn parse_type(&mut self) -> Result<TypeDescriptor, ParseError> {
        self.skip_ws();
        let base = if self.peek() == Some('(') {
            self.parse_tuple()?
        } else {
            let start = self.pos;
            let name = self.ident();
            if name.is_empty() {
                return Err(self.error("expected a type name"));
            }
            if name == "tuple" && self.peek() == Some('(') {
                self.parse_tuple()?
            } else {
                TypeDescriptor::elementary(name).ok_or_else(|| ParseError::InvalidType {
                    ty: self.src.to_string(),
                    reason: format!("unknown type '{name}' at position {start}"),
                })?
            }
        };
        self.parse_suffixes(base)
    }

    fn parse_tuple(&mut self) -> Result<TypeDescriptor, ParseError> {
        self.eat('(');
        let mut components = Vec::new();
        self.skip_ws();
        if self.eat(')') {
            return Ok(TypeDescriptor::Tuple(components));
        }
        loop {
            let ty = self.parse_type()?;
            self.skip_ws();
            let name = self.ident().to_string();
            components.push(Component::new(name, ty));
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            if self.eat(')') {
                return Ok(TypeDescriptor::Tuple(components));
            }
            return Err(self.error("expected ',' or ')'"));
        }
    }

    fn parse_suffixes(&mut self, mut ty: TypeDescriptor) -> Result<TypeDescriptor, ParseError> {
        while self.eat('[') {
            let start = self.pos;
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
            let src = self.src;
            let digits = &src[start..self.pos];
            if !self.eat(']') {
                return Err(self.error("expected ']'"));
            }
            let length = if digits.is_empty() {
                None
            } else {
                let n: usize = digits
                    .parse()
                    .map_err(|_| self.error("array length out of range"))?;
                if n == 0 {
                    return Err(self.error("fixed array length must be at least 1"));
                }
                Some(n)
            };
            ty = TypeDescriptor::Array {
                element: Box::new(ty),
                length,
            };
            if ty.checked_head_size().is_none() {
                return Err(self.error("fixed array too large"));
            }
        }
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> TypeDescriptor {
        TypeDescriptor::parse(s).unwrap_or_else(|e| panic!("{s}: {e}"))
    }

    #[test]
    fn elementary_types_and_aliases() {
        assert_eq!(parse("uint"), TypeDescriptor::Uint(256));
        assert_eq!(parse("int8"), TypeDescriptor::Int(8));
        assert_eq!(parse("byte"), TypeDescriptor::FixedBytes(1));
        assert_eq!(parse("bytes32"), TypeDescriptor::FixedBytes(32));
        assert_eq!(parse("function"), TypeDescriptor::Function);
    }

    #[test]
    fn rejects_bad_widths() {
        for bad in ["uint7", "uint264", "bytes0", "bytes33", "int08", "fixed128x18", "uint256[0]"] {
            assert!(TypeDescriptor::parse(bad).is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn nested_arrays_apply_left_to_right() {
        // uint256[2][] is a dynamic array of uint256[2]
        let ty = parse("uint256[2][]");
        let TypeDescriptor::Array { element, length } = &ty else {
            panic!("expected array");
        };
        assert_eq!(*length, None);
        assert_eq!(
            **element,
            TypeDescriptor::Array {
                element: Box::new(TypeDescriptor::Uint(256)),
                length: Some(2)
            }
        );
        assert_eq!(ty.to_string(), "uint256[2][]");
    }

    #[test]
    fn named_tuple_components() {
        let ty = parse("(address to, uint256 amount)[]");
        assert_eq!(ty.to_string(), "(address,uint256)[]");
        let TypeDescriptor::Array { element, .. } = ty else {
            panic!("expected array");
        };
        let TypeDescriptor::Tuple(components) = *element else {
            panic!("expected tuple");
        };
        assert_eq!(components[0].name, "to");
        assert_eq!(components[1].name, "amount");
    }

    #[test]
    fn tuple_keyword_prefix() {
        assert_eq!(parse("tuple(bool,string)").to_string(), "(bool,string)");
        assert_eq!(parse("()").to_string(), "()");
    }

    #[test]
    fn abi_param_tuple_suffixes() {
        let comps = vec![
            Component::new("a", TypeDescriptor::Address),
            Component::new("b", TypeDescriptor::Bytes),
        ];
        let ty = TypeDescriptor::from_abi_param("tuple[2][]", comps).unwrap();
        assert_eq!(ty.to_string(), "(address,bytes)[2][]");
        assert!(TypeDescriptor::from_abi_param("tuple[", vec![]).is_err());
    }

    #[test]
    fn dynamic_classification_and_head_size() {
        assert!(!parse("uint256[3]").is_dynamic());
        assert_eq!(parse("uint256[3]").head_size(), 96);
        assert!(parse("string[2]").is_dynamic());
        assert_eq!(parse("string[2]").head_size(), 32);
        assert_eq!(parse("(address,uint256,bytes32)").head_size(), 96);
        assert!(parse("(address,bytes)").is_dynamic());
    }

    #[test]
    fn oversized_fixed_arrays_are_rejected() {
        let err = TypeDescriptor::parse("uint256[576460752303423488]").unwrap_err();
        assert!(matches!(err, ParseError::InvalidType { ref reason, .. } if reason.contains("too large")));
        assert!(TypeDescriptor::parse("uint256[4294967296][4294967296]").is_err());

        let built = TypeDescriptor::Array {
            element: Box::new(TypeDescriptor::Uint(256)),
            length: Some(usize::MAX),
        };
        assert_eq!(built.checked_head_size(), None);
        assert_eq!(built.head_size(), usize::MAX);
    }

    #[test]
    fn trailing_garbage_is_an_error() {
        let err = TypeDescriptor::parse("uint256 x").unwrap_err();
        assert!(matches!(err, ParseError::InvalidType { .. }));
    }
}
