//! # personal_sign_verify
//!
//! EIP-191 `personal_sign` hashing, signer recovery from text and hex
//! messages, and recovery from a raw digest with split `r`/`s`/`v`.
//!
//! Run with:
//! ```sh
//! cargo run --bin personal_sign_verify
//! ```

use anyhow::Result;
use evmkit_evm::{
    compute_eip191_hash, recover_from_parts, verify_eip191_signature, MessageInput, Parity,
    RecoverableSignature,
};

const SIGNER: &str = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23";
const TEXT_SIGNATURE: &str = "0x9377c312145a5afb911bf9e8c067bcf6094c533603687850df502b61290bbf5e404b85e0845ce51df56fb47a97473197c603b75661020d42ca00504cda5254be1b";

fn main() -> Result<()> {
    println!("EvmKit: personal_sign");
    println!("═══════════════════════════════════════════════════════");

    // ── 1. Hash ───────────────────────────────────────────────────────────────
    let hash = compute_eip191_hash(MessageInput::Text("hello evmkit"))?;
    println!("\n─── Digest ──────────────────────────────────────────");
    println!("  message:     \"hello evmkit\"");
    println!("  digest:      {}", hash.digest);
    println!("  byte length: {}", hash.byte_length);

    // ── 2. Verify ─────────────────────────────────────────────────────────────
    let verification =
        verify_eip191_signature(MessageInput::Text("hello evmkit"), TEXT_SIGNATURE, Some(SIGNER))?;
    println!("\n─── Verify ──────────────────────────────────────────");
    println!("  signer:  {}", verification.address);
    println!("  matches: {:?}", verification.matches);
    assert_eq!(verification.matches, Some(true));

    // A different message recovers a different address rather than failing.
    let other =
        verify_eip191_signature(MessageInput::Text("hello evmkit!"), TEXT_SIGNATURE, Some(SIGNER))?;
    println!("  tampered message → {} (matches: {:?})", other.address, other.matches);

    // ── 3. Split signature against the raw digest ─────────────────────────────
    let signature = RecoverableSignature::from_hex(TEXT_SIGNATURE)?;
    let bytes = signature.to_bytes();
    let r = evmkit_core::hexstr::encode_hex(&bytes[..32]);
    let s = evmkit_core::hexstr::encode_hex(&bytes[32..64]);
    let recovered = recover_from_parts(&hash.digest, &r, &s, Parity::YParity(signature.v() - 27))?;
    println!("\n─── Raw digest + (r, s, yParity) ────────────────────");
    println!("  r:       {r}");
    println!("  s:       {s}");
    println!("  address: {}", recovered.address);

    println!("\n✓ Done");
    Ok(())
}
