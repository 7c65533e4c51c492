//! Signer recovery from a raw 32-byte digest.

use evmkit_core::error::SignatureError;
use serde::Serialize;

use crate::signature::{parse_digest, Parity, RecoverableSignature};

/// A recovered signer in both display forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveredAddress {
    /// EIP-55 checksummed.
    pub address: String,
    pub lower: String,
}

/// Recover from a digest and a combined 65-byte signature.
pub fn recover_from_digest(digest: &str, signature: &str) -> Result<RecoveredAddress, SignatureError> {
    let digest = parse_digest(digest)?;
    let signature = RecoverableSignature::from_hex(signature)?;
    recovered(&signature, &digest)
}

/// Recover from a digest and split `r`, `s`, parity.
pub fn recover_from_parts(
    digest: &str,
    r: &str,
    s: &str,
    parity: Parity,
) -> Result<RecoveredAddress, SignatureError> {
    let digest = parse_digest(digest)?;
    let signature = RecoverableSignature::from_parts(r, s, parity)?;
    recovered(&signature, &digest)
}

fn recovered(
    signature: &RecoverableSignature,
    digest: &[u8; 32],
) -> Result<RecoveredAddress, SignatureError> {
    let address = signature.recover_address(digest)?.to_checksum(None);
    let lower = address.to_lowercase();
    Ok(RecoveredAddress { address, lower })
}
