//! `evmkit functions | selector | encode-call | decode-call`

use anyhow::{anyhow, bail, Context, Result};
use evmkit_core::hexstr;
use evmkit_evm::{
    decode_arguments, decode_call as decode_full, encode_call as encode, AbiInterface,
    DecodedCall, DisplayValue, FunctionEntry, FunctionSignature,
};

use crate::{
    input::{document, print_json},
    FunctionSource,
};

pub fn functions(abi: &str, json: bool) -> Result<()> {
    let interface = load_abi(abi)?;
    let entries = interface.entries();
    if json {
        return print_json(&entries);
    }
    println!("{} functions", entries.len());
    for FunctionEntry {
        signature,
        selector,
    } in &entries
    {
        println!("  {selector}  {signature}");
    }
    Ok(())
}

pub fn selector(signature: &str, json: bool) -> Result<()> {
    let sig = FunctionSignature::parse(signature)?;
    let entry = FunctionEntry {
        signature: sig.canonical(),
        selector: sig.selector_hex(),
    };
    if json {
        return print_json(&entry);
    }
    println!("Signature: {}", entry.signature);
    println!("Selector:  {}", entry.selector);
    Ok(())
}

pub fn encode_call(source: &FunctionSource, args: &[String], json: bool) -> Result<()> {
    let sig = resolve(source, None)?;
    let call = encode(&sig, args).with_context(|| format!("encode {}", sig.canonical()))?;
    if json {
        return print_json(&call);
    }
    println!("{}", call.calldata_hex());
    Ok(())
}

pub fn decode_call(source: &FunctionSource, calldata: &str, args_only: bool, json: bool) -> Result<()> {
    let data = hexstr::decode_hex(calldata).context("invalid calldata hex")?;
    let selector = (!args_only && data.len() >= 4).then(|| hexstr::encode_hex(&data[..4]));
    let sig = resolve(source, selector.as_deref())?;

    let decoded = if args_only {
        decode_arguments(&sig, &data)?
    } else {
        decode_full(&sig, &data)?
    };
    if json {
        return print_json(&decoded);
    }
    print_decoded(&decoded);
    Ok(())
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn load_abi(arg: &str) -> Result<AbiInterface> {
    let text = document(arg)?;
    Ok(AbiInterface::from_json(&text)?)
}

/// The function named by `--signature`, or looked up in `--abi` by
/// `--function`, falling back to the calldata selector.
fn resolve(source: &FunctionSource, selector: Option<&str>) -> Result<FunctionSignature> {
    if let Some(signature) = &source.signature {
        return Ok(FunctionSignature::parse(signature)?);
    }
    let Some(abi) = &source.abi else {
        bail!("pass --signature or --abi");
    };
    let interface = load_abi(abi)?;
    let key = source
        .function
        .as_deref()
        .or(selector)
        .ok_or_else(|| anyhow!("--function is required with --abi here"))?;
    interface
        .function(key)
        .cloned()
        .ok_or_else(|| anyhow!("no function '{key}' in the ABI"))
}

fn print_decoded(decoded: &DecodedCall) {
    println!("Function: {}", decoded.signature);
    if decoded.params.is_empty() {
        println!("  (no arguments)");
    }
    for param in &decoded.params {
        let display = evmkit_evm::to_display(&param.value, &param.ty);
        println!("  {} ({}): {}", param.name, param.ty, render(&display));
    }
}

fn render(value: &DisplayValue) -> String {
    match value {
        DisplayValue::Text(text) => text.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
