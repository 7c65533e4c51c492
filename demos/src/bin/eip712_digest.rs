//! # eip712_digest
//!
//! Hashes EIP-712 typed data and recovers the signer, for the "Ether Mail"
//! example from EIP-712 and a Permit2 transfer request.
//!
//! Run with:
//! ```sh
//! cargo run --bin eip712_digest
//! ```

use anyhow::Result;
use evmkit_evm::{evaluate, TypedDataDocument, TypedDataInputs};

// ─── Example 1: the EIP-712 "Mail" message ──────────────────────────────────
const MAIL_EIP712: &str = r#"{
    "types": {
        "EIP712Domain": [
            {"name": "name",              "type": "string"},
            {"name": "version",           "type": "string"},
            {"name": "chainId",           "type": "uint256"},
            {"name": "verifyingContract", "type": "address"}
        ],
        "Person": [
            {"name": "name",   "type": "string"},
            {"name": "wallet", "type": "address"}
        ],
        "Mail": [
            {"name": "from",     "type": "Person"},
            {"name": "to",       "type": "Person"},
            {"name": "contents", "type": "string"}
        ]
    },
    "primaryType": "Mail",
    "domain": {
        "name": "Ether Mail",
        "version": "1",
        "chainId": 1,
        "verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
    },
    "message": {
        "from": {"name": "Cow", "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"},
        "to":   {"name": "Bob", "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB"},
        "contents": "Hello, Bob!"
    }
}"#;

const MAIL_SIGNATURE: &str = "0x4355c47d63924e8a72e509b65029052eb6c299d53a04e167c5775fd466751c9d07299936d304c153f6443dfa05f40ff007d72911b6f72307f996231605b915621c";

// ─── Example 2: Permit2 SignatureTransfer, entered section by section ────────
const PERMIT2_DOMAIN: &str = r#"{
    "name": "Permit2",
    "chainId": 1,
    "verifyingContract": "0x000000000022d473030f116ddee9f6b43ac78ba3"
}"#;

// No EIP712Domain entry: the domain type is derived from the fields present.
const PERMIT2_TYPES: &str = r#"{
    "PermitTransferFrom": [
        {"name": "permitted", "type": "TokenPermissions"},
        {"name": "spender",   "type": "address"},
        {"name": "nonce",     "type": "uint256"},
        {"name": "deadline",  "type": "uint256"}
    ],
    "TokenPermissions": [
        {"name": "token",  "type": "address"},
        {"name": "amount", "type": "uint256"}
    ]
}"#;

const PERMIT2_MESSAGE: &str = r#"{
    "permitted": {
        "token":  "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
        "amount": "115792089237316195423570985008687907853269984665640564039457584007913129639935"
    },
    "spender":  "0xDeaDBeef00000000000000000000000000000001",
    "nonce":    "12345",
    "deadline": "9999999999"
}"#;

fn main() -> Result<()> {
    println!("EvmKit: EIP-712 Typed Data");
    println!("═══════════════════════════════════════════════════════");

    // ── 1. Mail: hash and verify ──────────────────────────────────────────────
    let mail = TypedDataDocument::from_payload(MAIL_EIP712)?;
    let hash = mail.hash()?;

    println!("\n─── EIP-712 Mail Message ────────────────────────────");
    println!("  primaryType:      {}", hash.primary_type);
    println!("  encodeType:       {}", hash.encoded_type);
    println!("  domainSeparator:  {}", hash.domain_separator);
    println!("  hashStruct:       {}", hash.struct_hash);
    println!("  digest:           {}", hash.digest);
    assert_eq!(
        hash.digest,
        "0xbe609aee343fb3c4b28e1df9e632fca64fcfaede20f02e86244efddf30957bd2"
    );

    let verification = evmkit_evm::verify_typed_signature(
        &mail,
        MAIL_SIGNATURE,
        Some("0xcd2a3d9f938e13cd947ec05abc7fe734df8dd826"),
    )?;
    println!("  signer:           {}", verification.address);
    println!("  matches Cow:      {:?}", verification.matches);

    // ── 2. Permit2: the staged pipeline a form would run ─────────────────────
    let report = evaluate(&TypedDataInputs {
        domain: PERMIT2_DOMAIN,
        types: PERMIT2_TYPES,
        message: PERMIT2_MESSAGE,
        primary_type: None,
        ..Default::default()
    });

    println!("\n─── Permit2 PermitTransferFrom ──────────────────────");
    println!("{}", serde_json::to_string_pretty(&report)?);

    // ── 3. A missing field is reported with its path ─────────────────────────
    let report = evaluate(&TypedDataInputs {
        domain: PERMIT2_DOMAIN,
        types: PERMIT2_TYPES,
        message: r#"{"permitted": {"token": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"}}"#,
        primary_type: Some("PermitTransferFrom"),
        ..Default::default()
    });
    if let Some(Err(e)) = &report.hash {
        println!("\n─── Incomplete message ──────────────────────────────");
        println!("  {e}");
    }

    println!("\n✓ Done");
    Ok(())
}
