//! # with_observability
//!
//! Structured logging via `evmkit-observability`. The library crates emit
//! `debug!` events around encode, decode and hashing; this demo turns them
//! on for `evmkit_evm` and runs a few operations.
//!
//! Run with:
//! ```sh
//! cargo run --bin with_observability
//!
//! # With JSON logging:
//! LOG_JSON=1 cargo run --bin with_observability
//! ```

use anyhow::Result;
use evmkit_evm::{decode_call, encode_call, FunctionSignature, MessageInput};
use evmkit_observability::{init_tracing, LogConfig};
use tracing::{info, warn};

fn main() -> Result<()> {
    let config = LogConfig::default()
        .with_level("info")
        .with_component("evmkit-evm", "debug")
        .with_json(std::env::var("LOG_JSON").is_ok());
    init_tracing(&config)?;

    info!(directives = %config.directives(), "observability initialised");

    let sig = FunctionSignature::parse("approve(address spender, uint256 amount)")?;
    let call = encode_call(&sig, &["0x7a250d5630b4cf539739df2c5dacb4c659f2488d", "1"])?;
    let decoded = decode_call(&sig, &call.calldata)?;
    info!(function = %decoded.signature, params = decoded.params.len(), "round trip ok");

    if let Err(e) = decode_call(&sig, &call.calldata[..10]) {
        warn!(error = %e, "decode of truncated calldata failed as expected");
    }

    let hash = evmkit_evm::compute_eip191_hash(MessageInput::Text("logged"))?;
    info!(digest = %hash.digest, "personal_sign digest");
    Ok(())
}
