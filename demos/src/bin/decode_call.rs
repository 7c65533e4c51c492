//! # decode_call
//!
//! Decodes calldata against functions looked up in an ABI JSON document,
//! choosing the function by the calldata's selector.
//!
//! Run with:
//! ```sh
//! cargo run --bin decode_call
//! ```

use anyhow::{anyhow, Result};
use evmkit_core::hexstr;
use evmkit_evm::{decode_call, AbiInterface};

const ERC20_ABI: &str = r#"[
    {
        "name": "transfer",
        "type": "function",
        "inputs": [
            {"name": "to",     "type": "address"},
            {"name": "amount", "type": "uint256"}
        ],
        "outputs": [{"name": "", "type": "bool"}],
        "stateMutability": "nonpayable"
    },
    {
        "name": "approve",
        "type": "function",
        "inputs": [
            {"name": "spender", "type": "address"},
            {"name": "amount",  "type": "uint256"}
        ],
        "outputs": [{"name": "", "type": "bool"}],
        "stateMutability": "nonpayable"
    },
    {
        "name": "Transfer",
        "type": "event",
        "inputs": [
            {"name": "from",  "type": "address", "indexed": true},
            {"name": "to",    "type": "address", "indexed": true},
            {"name": "value", "type": "uint256", "indexed": false}
        ],
        "anonymous": false
    }
]"#;

// approve(0x7a25…488d, 2^256-1): the classic unlimited allowance
const APPROVE_CALLDATA: &str = "0x095ea7b30000000000000000000000007a250d5630b4cf539739df2c5dacb4c659f2488dffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

fn main() -> Result<()> {
    let abi = AbiInterface::from_json(ERC20_ABI)?;

    println!("EvmKit: Calldata Decoder");
    println!("═══════════════════════════════════════════════════════");

    println!("\n─── ABI functions ───────────────────────────────────");
    for entry in abi.entries() {
        println!("  {}  {}", entry.selector, entry.signature);
    }

    let calldata = hexstr::decode_hex(APPROVE_CALLDATA)?;
    let selector = hexstr::encode_hex(&calldata[..4]);
    let function = abi
        .function(&selector)
        .ok_or_else(|| anyhow!("no function for selector {selector}"))?;

    let decoded = decode_call(function, &calldata)?;
    println!("\n─── Decoded {} ─────────────────────────", decoded.signature);
    for (name, value) in decoded.to_display() {
        println!("  {name:10} = {}", serde_json::to_string(&value)?);
    }

    // ── Truncated calldata is reported with the offset it ran out at ─────────
    println!("\n─── Truncated input ─────────────────────────────────");
    match decode_call(function, &calldata[..40]) {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  {e}"),
    }

    println!("\n✓ Done");
    Ok(())
}
