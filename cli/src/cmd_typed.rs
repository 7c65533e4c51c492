//! `evmkit typed-hash | typed-verify`: EIP-712 typed data.

use anyhow::{bail, Result};
use evmkit_evm::{verify_typed_signature, TypedDataDocument, TypedDataHash, Verification};
use serde::Serialize;

use crate::{
    input::{document, print_json},
    TypedSource,
};

pub fn hash(source: &TypedSource, json: bool) -> Result<()> {
    let doc = build(source)?;
    let hash = doc.hash()?;
    if json {
        return print_json(&hash);
    }
    print_hash(&hash);
    Ok(())
}

pub fn verify(source: &TypedSource, signature: &str, expected: Option<&str>, json: bool) -> Result<()> {
    #[derive(Serialize)]
    struct Output<'a> {
        hash: &'a TypedDataHash,
        verification: &'a Verification,
    }

    let doc = build(source)?;
    let hash = doc.hash()?;
    let verification = verify_typed_signature(&doc, signature, expected)?;
    if json {
        return print_json(&Output {
            hash: &hash,
            verification: &verification,
        });
    }
    print_hash(&hash);
    println!("Signer:           {}", verification.address);
    match verification.matches {
        Some(true) => println!("Expected signer:  ✓ match"),
        Some(false) => println!("Expected signer:  ✗ mismatch"),
        None => {}
    }
    Ok(())
}

fn build(source: &TypedSource) -> Result<TypedDataDocument> {
    if let Some(payload) = &source.payload {
        return Ok(TypedDataDocument::from_payload(&document(payload)?)?);
    }
    let (Some(domain), Some(types), Some(message)) = (&source.domain, &source.types, &source.message)
    else {
        bail!("pass --payload, or all of --domain, --types and --message");
    };
    Ok(TypedDataDocument::build(
        &document(domain)?,
        &document(types)?,
        &document(message)?,
        source.primary_type.as_deref(),
    )?)
}

fn print_hash(hash: &TypedDataHash) {
    println!("Primary type:     {}", hash.primary_type);
    println!("Encoded type:     {}", hash.encoded_type);
    println!("Domain separator: {}", hash.domain_separator);
    println!("Struct hash:      {}", hash.struct_hash);
    println!("Digest:           {}", hash.digest);
}
