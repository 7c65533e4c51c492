//! # evmkit-wasm
//!
//! WebAssembly (WASM) bindings for EvmKit.
//! Built with wasm-bindgen; runs in modern browsers and Node.js WASM runtime.
//!
//! Every export takes plain strings and returns a JSON string, so a browser
//! form can hand its field values over as typed and render the result.
//!
//! ## Usage (browser / Node.js WASM)
//! ```javascript
//! import init, { Abi, encodeCall, typedDataJson } from 'evmkit-wasm';
//!
//! await init();
//!
//! const call = JSON.parse(encodeCall(
//!   "transfer(address to, uint256 amount)",
//!   JSON.stringify(["0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045", "1000000"]),
//! ));
//! // call.calldata === "0xa9059cbb…"
//!
//! const abi = Abi.fromJson(abiText);
//! const decoded = JSON.parse(abi.decodeCall(call.calldata));
//!
//! const report = JSON.parse(typedDataJson(domain, types, message, undefined, sig, undefined));
//! // report.build / report.hash / report.verification, each {..} or {error}
//! ```

use std::fmt::Display;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use evmkit_core::hexstr;
use evmkit_evm::{
    analyze_address, compute_eip191_hash, compute_keccak, convert, convert_units, decode_call,
    encode_call as encode, evaluate, recover_from_digest, verify_eip191_signature, AbiInterface,
    FunctionEntry, FunctionSignature, HashMode, MessageInput, TypedDataInputs, Unit,
};

// ─── Panic hook setup ─────────────────────────────────────────────────────────

#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

type Outcome = Result<String, String>;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Outcome {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn err(e: impl Display) -> String {
    e.to_string()
}

fn js(outcome: Outcome) -> Result<String, JsError> {
    outcome.map_err(|e| JsError::new(&e))
}

/// Parameter values arrive as a JSON array of strings.
fn raw_args(args_json: &str) -> Result<Vec<String>, String> {
    serde_json::from_str(args_json)
        .map_err(|e| format!("arguments must be a JSON array of strings: {e}"))
}

// ─── ABI ──────────────────────────────────────────────────────────────────────

/// A parsed contract ABI.
#[wasm_bindgen]
pub struct Abi {
    inner: AbiInterface,
}

impl Abi {
    fn lookup(&self, key: &str) -> Result<&FunctionSignature, String> {
        self.inner
            .function(key)
            .ok_or_else(|| format!("no function '{key}' in the ABI"))
    }

    fn encode_inner(&self, function: &str, args_json: &str) -> Outcome {
        let sig = self.lookup(function)?;
        to_json(&encode(sig, &raw_args(args_json)?).map_err(err)?)
    }

    fn decode_inner(&self, calldata_hex: &str) -> Outcome {
        let data = hexstr::decode_hex(calldata_hex).map_err(err)?;
        if data.len() < 4 {
            return Err("calldata is shorter than a 4-byte selector".into());
        }
        let sig = self.lookup(&hexstr::encode_hex(&data[..4]))?;
        to_json(&decode_call(sig, &data).map_err(err)?)
    }
}

#[wasm_bindgen]
impl Abi {
    #[wasm_bindgen(js_name = "fromJson")]
    pub fn from_json(abi_json: &str) -> Result<Abi, JsError> {
        let inner = AbiInterface::from_json(abi_json).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { inner })
    }

    /// `[{signature, selector}, …]`
    #[wasm_bindgen(js_name = "functionsJson")]
    pub fn functions_json(&self) -> Result<String, JsError> {
        js(to_json(&self.inner.entries()))
    }

    /// Encode a call to the function named by `function` (name, canonical
    /// signature or selector).
    #[wasm_bindgen(js_name = "encodeCall")]
    pub fn encode_call(&self, function: &str, args_json: &str) -> Result<String, JsError> {
        js(self.encode_inner(function, args_json))
    }

    /// Decode calldata, choosing the function by its selector.
    #[wasm_bindgen(js_name = "decodeCall")]
    pub fn decode_call(&self, calldata_hex: &str) -> Result<String, JsError> {
        js(self.decode_inner(calldata_hex))
    }
}

fn selector_inner(signature: &str) -> Outcome {
    let sig = FunctionSignature::parse(signature).map_err(err)?;
    to_json(&FunctionEntry {
        signature: sig.canonical(),
        selector: sig.selector_hex(),
    })
}

fn encode_call_inner(signature: &str, args_json: &str) -> Outcome {
    let sig = FunctionSignature::parse(signature).map_err(err)?;
    to_json(&encode(&sig, &raw_args(args_json)?).map_err(err)?)
}

fn decode_call_inner(signature: &str, calldata_hex: &str) -> Outcome {
    let sig = FunctionSignature::parse(signature).map_err(err)?;
    let data = hexstr::decode_hex(calldata_hex).map_err(err)?;
    to_json(&decode_call(&sig, &data).map_err(err)?)
}

/// `{signature, selector}` for a human-readable function signature.
#[wasm_bindgen]
pub fn selector(signature: &str) -> Result<String, JsError> {
    js(selector_inner(signature))
}

/// `{calldata, selector, length}`
#[wasm_bindgen(js_name = "encodeCall")]
pub fn encode_call(signature: &str, args_json: &str) -> Result<String, JsError> {
    js(encode_call_inner(signature, args_json))
}

/// `{signature, args}` with display values.
#[wasm_bindgen(js_name = "decodeCall")]
pub fn decode_call_json(signature: &str, calldata_hex: &str) -> Result<String, JsError> {
    js(decode_call_inner(signature, calldata_hex))
}

// ─── EIP-712 ──────────────────────────────────────────────────────────────────

fn typed_data_inner(
    domain: &str,
    types: &str,
    message: &str,
    primary_type: Option<String>,
    signature: Option<String>,
    expected_address: Option<String>,
) -> Outcome {
    let report = evaluate(&TypedDataInputs {
        domain,
        types,
        message,
        primary_type: primary_type.as_deref(),
        signature: signature.as_deref(),
        expected_address: expected_address.as_deref(),
    });
    to_json(&report)
}

/// Build, hash and optionally verify typed data. Stage failures are
/// reported inside the JSON (`{"error": …}`), not thrown.
#[wasm_bindgen(js_name = "typedDataJson")]
pub fn typed_data_json(
    domain: &str,
    types: &str,
    message: &str,
    primary_type: Option<String>,
    signature: Option<String>,
    expected_address: Option<String>,
) -> Result<String, JsError> {
    js(typed_data_inner(
        domain,
        types,
        message,
        primary_type,
        signature,
        expected_address,
    ))
}

// ─── Signatures ───────────────────────────────────────────────────────────────

fn message(text: &str, hex: bool) -> MessageInput<'_> {
    if hex {
        MessageInput::Hex(text)
    } else {
        MessageInput::Text(text)
    }
}

fn personal_hash_inner(text: &str, hex: bool) -> Outcome {
    to_json(&compute_eip191_hash(message(text, hex)).map_err(err)?)
}

fn personal_verify_inner(text: &str, hex: bool, signature: &str, expected: Option<String>) -> Outcome {
    let verification =
        verify_eip191_signature(message(text, hex), signature, expected.as_deref()).map_err(err)?;
    to_json(&verification)
}

/// `{digest, byteLength}`; both empty for a blank message.
#[wasm_bindgen(js_name = "personalHash")]
pub fn personal_hash(text: &str, hex: bool) -> Result<String, JsError> {
    js(personal_hash_inner(text, hex))
}

/// `{address, matches?}`
#[wasm_bindgen(js_name = "personalVerify")]
pub fn personal_verify(
    text: &str,
    hex: bool,
    signature: &str,
    expected: Option<String>,
) -> Result<String, JsError> {
    js(personal_verify_inner(text, hex, signature, expected))
}

/// `{address, lower}` from a 32-byte digest and a 65-byte signature.
#[wasm_bindgen(js_name = "recoverAddress")]
pub fn recover_address(digest: &str, signature: &str) -> Result<String, JsError> {
    js(recover_from_digest(digest, signature)
        .map_err(err)
        .and_then(|r| to_json(&r)))
}

// ─── Small tools ──────────────────────────────────────────────────────────────

/// Address validity and EIP-55 checksum. Never throws; invalid input is
/// reported in the JSON.
#[wasm_bindgen(js_name = "addressJson")]
pub fn address_json(input: &str) -> Result<String, JsError> {
    js(to_json(&analyze_address(input)))
}

/// Keccak256 as `0x` hex, or `""` for blank input.
#[wasm_bindgen]
pub fn keccak(input: &str, hex: bool, remove_whitespace: bool) -> Result<String, JsError> {
    let mode = if hex { HashMode::Hex } else { HashMode::Text };
    js(compute_keccak(input, mode, remove_whitespace).map_err(err))
}

fn units_inner(amount: &str, unit: &str, hex_as_wei: bool) -> Outcome {
    let unit: Unit = unit.parse()?;
    to_json(&convert_units(amount, unit, hex_as_wei).map_err(err)?)
}

/// `{wei, gwei, ether}`
#[wasm_bindgen(js_name = "unitsJson")]
pub fn units_json(amount: &str, unit: &str, hex_as_wei: bool) -> Result<String, JsError> {
    js(units_inner(amount, unit, hex_as_wei))
}

#[wasm_bindgen(js_name = "textToHex")]
pub fn text_to_hex(text: &str) -> Result<String, JsError> {
    js(to_json(&convert::text_to_hex(text)))
}

#[wasm_bindgen(js_name = "hexToText")]
pub fn hex_to_text(hex: &str) -> Result<String, JsError> {
    js(convert::hex_to_text(hex).map_err(err).and_then(|c| to_json(&c)))
}

#[wasm_bindgen(js_name = "decimalToHex")]
pub fn decimal_to_hex(decimal: &str) -> Result<String, JsError> {
    js(convert::decimal_to_hex(decimal).map_err(err).and_then(|c| to_json(&c)))
}

#[wasm_bindgen(js_name = "hexToDecimal")]
pub fn hex_to_decimal(hex: &str) -> Result<String, JsError> {
    js(convert::hex_to_decimal(hex).map_err(err).and_then(|c| to_json(&c)))
}
