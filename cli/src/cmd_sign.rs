//! `evmkit personal-hash | personal-verify | recover`

use anyhow::{bail, Result};
use evmkit_evm::{
    compute_eip191_hash, recover_from_digest, recover_from_parts, verify_eip191_signature,
    MessageInput, Parity,
};

use crate::input::print_json;

/// Signature flags of `evmkit recover`.
pub struct SignatureArgs {
    pub signature: Option<String>,
    pub r: Option<String>,
    pub s: Option<String>,
    pub v: Option<u64>,
    pub y_parity: Option<u8>,
}

fn message_input(message: &str, hex: bool) -> MessageInput<'_> {
    if hex {
        MessageInput::Hex(message)
    } else {
        MessageInput::Text(message)
    }
}

pub fn personal_hash(message: &str, hex: bool, json: bool) -> Result<()> {
    let hash = compute_eip191_hash(message_input(message, hex))?;
    if json {
        return print_json(&hash);
    }
    if hash.digest.is_empty() {
        println!("(empty message)");
        return Ok(());
    }
    println!("Digest:      {}", hash.digest);
    println!("Byte length: {}", hash.byte_length);
    println!("Message:     {}", hash.message_bytes);
    Ok(())
}

pub fn personal_verify(
    message: &str,
    signature: &str,
    expected: Option<&str>,
    hex: bool,
    json: bool,
) -> Result<()> {
    let verification = verify_eip191_signature(message_input(message, hex), signature, expected)?;
    if json {
        return print_json(&verification);
    }
    println!("Signer: {}", verification.address);
    match verification.matches {
        Some(true) => println!("Expected signer: ✓ match"),
        Some(false) => println!("Expected signer: ✗ mismatch"),
        None => {}
    }
    Ok(())
}

pub fn recover(digest: &str, args: SignatureArgs, json: bool) -> Result<()> {
    let recovered = match args {
        SignatureArgs {
            signature: Some(signature),
            ..
        } => recover_from_digest(digest, &signature)?,
        SignatureArgs {
            r: Some(r),
            s: Some(s),
            v,
            y_parity,
            ..
        } => {
            let parity = match (v, y_parity) {
                (Some(v), None) => Parity::V(v),
                (None, Some(y)) => Parity::YParity(y),
                _ => bail!("pass exactly one of --v or --y-parity with --r/--s"),
            };
            recover_from_parts(digest, &r, &s, parity)?
        }
        _ => bail!("pass --signature, or --r and --s with a parity"),
    };
    if json {
        return print_json(&recovered);
    }
    println!("Address:   {}", recovered.address);
    println!("Lowercase: {}", recovered.lower);
    Ok(())
}
