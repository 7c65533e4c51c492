//! # encode_call
//!
//! Encodes calls from raw text inputs, the way a form in a browser would
//! hand them over: one string per parameter, arrays and tuples as JSON.
//!
//! Run with:
//! ```sh
//! cargo run --bin encode_call
//! ```

use anyhow::Result;
use evmkit_evm::{decode_call, encode_call, FunctionSignature};

fn main() -> Result<()> {
    println!("EvmKit: ABI Encoder");
    println!("═══════════════════════════════════════════════════════");

    // ── 1. A plain ERC-20 transfer ────────────────────────────────────────────
    let transfer = FunctionSignature::parse("transfer(address to, uint256 amount)")?;
    let call = encode_call(
        &transfer,
        &["0xd8da6bf26964af9d7eed9e03e53415d37aa96045", "1000000"],
    )?;

    println!("\n─── transfer() ──────────────────────────────────────");
    println!("  canonical: {}", transfer.canonical());
    println!("  selector:  {}", call.selector_hex());
    println!("  calldata:  {}", call.calldata_hex());
    println!("  length:    {} bytes  (4 selector + 32 address + 32 uint)", call.length);
    assert_eq!(call.selector_hex(), "0xa9059cbb");
    assert_eq!(call.length, 68);

    // ── 2. Nested dynamic types ───────────────────────────────────────────────
    let submit = FunctionSignature::parse(
        "submit((address maker, uint256 amount, bytes data)[] orders, string[2] tags)",
    )?;
    let orders = r#"[
        {"maker": "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23", "amount": "5", "data": "0xcafe"},
        ["0x000000000000000000000000000000000000dEaD", 7, "0x"]
    ]"#;
    let call = encode_call(&submit, &[orders, r#"["fast", "cheap"]"#])?;

    println!("\n─── submit() with a tuple array ─────────────────────");
    println!("  canonical: {}", submit.canonical());
    println!("  selector:  {}", call.selector_hex());
    for (i, word) in call.calldata[4..].chunks(32).enumerate() {
        println!("  [{:>3}] {}", i * 32, evmkit_core::hexstr::encode_hex(word));
    }

    // ── 3. Decode it back ─────────────────────────────────────────────────────
    let decoded = decode_call(&submit, &call.calldata)?;
    println!("\n─── Decoded back ────────────────────────────────────");
    println!("{}", serde_json::to_string_pretty(&decoded)?);

    // ── 4. Errors name the offending field ────────────────────────────────────
    println!("\n─── Input errors ────────────────────────────────────");
    let broken = r#"[{"maker": "0x000000000000000000000000000000000000dEaD", "data": "0x"}]"#;
    match encode_call(&submit, &[broken, r#"["a", "b"]"#]) {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  {e}"),
    }
    let small = FunctionSignature::parse("set(uint8 small)")?;
    match encode_call(&small, &["256"]) {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  {e}"),
    }

    println!("\n✓ Done");
    Ok(())
}
