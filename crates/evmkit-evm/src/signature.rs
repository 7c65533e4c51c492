//! secp256k1 recoverable signatures and signer recovery.
//!
//! Signatures come either combined (65 bytes `r ++ s ++ v`) or split into
//! `r`, `s` and a parity given as `v` or `yParity`. Both paths accept the
//! same parity set: `v` ∈ {0, 1, 27, 28}, `yParity` ∈ {0, 1}. High-s
//! signatures are rejected, matching what wallets produce.

use alloy_primitives::Address;
use evmkit_core::{error::SignatureError, hexstr, keccak256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::Serialize;

/// How the recovery bit of a split signature was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// Legacy `v`: 0, 1, 27 or 28.
    V(u64),
    /// `yParity`: 0 or 1.
    YParity(u8),
}

impl Parity {
    fn y_odd(self) -> Result<bool, SignatureError> {
        match self {
            Parity::V(0 | 27) | Parity::YParity(0) => Ok(false),
            Parity::V(1 | 28) | Parity::YParity(1) => Ok(true),
            Parity::V(v) => Err(SignatureError::format(
                "v",
                format!("{v} is not one of 0, 1, 27, 28"),
            )),
            Parity::YParity(y) => Err(SignatureError::format(
                "yParity",
                format!("{y} is not 0 or 1"),
            )),
        }
    }
}

/// A parsed `(r, s, yParity)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    r: [u8; 32],
    s: [u8; 32],
    y_odd: bool,
}

impl RecoverableSignature {
    /// Parse a combined 65-byte hex signature (`0x` optional, whitespace ignored).
    pub fn from_hex(signature: &str) -> Result<Self, SignatureError> {
        let bytes = hexstr::validate_hex_length(signature, 65)
            .map_err(|e| SignatureError::format("signature", e))?;
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        let y_odd = Parity::V(u64::from(bytes[64])).y_odd()?;
        Ok(Self { r, s, y_odd })
    }

    /// Build from separate 32-byte `r` and `s` hex values plus a parity.
    pub fn from_parts(r: &str, s: &str, parity: Parity) -> Result<Self, SignatureError> {
        let r = word("r", r)?;
        let s = word("s", s)?;
        let y_odd = parity.y_odd()?;
        Ok(Self { r, s, y_odd })
    }

    /// Legacy `v` (27 or 28).
    pub fn v(&self) -> u8 {
        27 + u8::from(self.y_odd)
    }

    /// Combined `r ++ s ++ v` form.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v();
        out
    }

    /// Recover the signing address for a 32-byte prehash.
    pub fn recover_address(&self, digest: &[u8; 32]) -> Result<Address, SignatureError> {
        let mut rs = [0u8; 64];
        rs[..32].copy_from_slice(&self.r);
        rs[32..].copy_from_slice(&self.s);
        let signature =
            Signature::from_slice(&rs).map_err(|e| SignatureError::Recovery(e.to_string()))?;
        if signature.normalize_s().is_some() {
            return Err(SignatureError::format(
                "s",
                "non-canonical (upper half of the curve order)",
            ));
        }
        let recovery_id = RecoveryId::new(self.y_odd, false);
        let key = VerifyingKey::recover_from_prehash(digest, &signature, recovery_id)
            .map_err(|e| SignatureError::Recovery(e.to_string()))?;

        let address = public_key_address(&key);
        tracing::trace!(%address, "recovered signer");
        Ok(address)
    }
}

/// Address of an uncompressed secp256k1 public key: last 20 bytes of
/// `keccak256(x ++ y)`.
pub fn public_key_address(key: &VerifyingKey) -> Address {
    let point = key.as_affine().to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

fn word(field: &str, value: &str) -> Result<[u8; 32], SignatureError> {
    let bytes =
        hexstr::validate_hex_length(value, 32).map_err(|e| SignatureError::format(field, e))?;
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Parse a 32-byte digest given as user hex.
pub fn parse_digest(digest: &str) -> Result<[u8; 32], SignatureError> {
    word("digest", digest)
}

/// Outcome of checking a signature against an optional expected signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    /// Recovered signer, EIP-55 checksummed.
    pub address: String,
    /// `None` when no expected address was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<bool>,
}

impl Verification {
    /// Compare `recovered` with `expected` case-insensitively. Blank
    /// `expected` counts as not supplied.
    pub fn new(recovered: Address, expected: Option<&str>) -> Self {
        let address = recovered.to_checksum(None);
        let matches = expected
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(|e| e.eq_ignore_ascii_case(&address));
        Self { address, matches }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // keccak256("\x19Ethereum Signed Message:\n11Hello World")
    const HELLO_DIGEST: &str = "a1de988600a42c4b4ab089b619297c17d53cffae5d5120d82d8a92d0bb3b78f2";

    // EIP-712 "Ether Mail" digest and Cow's signature from the EIP.
    const MAIL_DIGEST: &str = "be609aee343fb3c4b28e1df9e632fca64fcfaede20f02e86244efddf30957bd2";
    const MAIL_SIG: &str = "0x4355c47d63924e8a72e509b65029052eb6c299d53a04e167c5775fd466751c9d07299936d304c153f6443dfa05f40ff007d72911b6f72307f996231605b915621c";
    const COW: &str = "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826";

    #[test]
    fn recovers_eip712_example_signer() {
        let sig = RecoverableSignature::from_hex(MAIL_SIG).unwrap();
        let digest = parse_digest(MAIL_DIGEST).unwrap();
        let addr = sig.recover_address(&digest).unwrap();
        assert_eq!(addr.to_checksum(None), COW);
    }

    #[test]
    fn split_form_matches_combined() {
        let combined = RecoverableSignature::from_hex(MAIL_SIG).unwrap();
        let body = MAIL_SIG.trim_start_matches("0x");
        for parity in [Parity::V(28), Parity::V(1), Parity::YParity(1)] {
            let split = RecoverableSignature::from_parts(&body[..64], &body[64..128], parity).unwrap();
            assert_eq!(split, combined);
        }
    }

    #[test]
    fn v_zero_and_one_are_accepted_in_combined_form() {
        let body = &MAIL_SIG[2..130];
        let with_one = RecoverableSignature::from_hex(&format!("{body}01")).unwrap();
        let with_28 = RecoverableSignature::from_hex(MAIL_SIG).unwrap();
        assert_eq!(with_one, with_28);
        assert_eq!(with_one.v(), 28);
        assert_eq!(with_one.to_bytes()[64], 28);
    }

    #[test]
    fn rejects_out_of_range_parity() {
        let body = &MAIL_SIG[2..130];
        let err = RecoverableSignature::from_hex(&format!("{body}25")).unwrap_err();
        assert!(matches!(err, SignatureError::Format { ref field, .. } if field == "v"));
        let err = RecoverableSignature::from_parts(&body[..64], &body[64..], Parity::YParity(27))
            .unwrap_err();
        assert!(matches!(err, SignatureError::Format { ref field, .. } if field == "yParity"));
    }

    #[test]
    fn rejects_wrong_length() {
        let err = RecoverableSignature::from_hex("0x1234").unwrap_err();
        assert!(err.to_string().contains("65 bytes"));
        let err = parse_digest("0xabcd").unwrap_err();
        assert!(err.to_string().starts_with("digest:"));
    }

    #[test]
    fn rejects_high_s() {
        // s' = n - s flips to the upper half
        let sig = RecoverableSignature::from_hex(MAIL_SIG).unwrap();
        let n = alloy_primitives::U256::from_str_radix(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
            16,
        )
        .unwrap();
        let s = alloy_primitives::U256::from_be_bytes(sig.s);
        let high = (n - s).to_be_bytes::<32>();
        let flipped = RecoverableSignature {
            s: high,
            y_odd: !sig.y_odd,
            ..sig
        };
        let digest = parse_digest(MAIL_DIGEST).unwrap();
        assert!(flipped.recover_address(&digest).is_err());
    }

    #[test]
    fn different_digest_recovers_different_signer() {
        let sig = RecoverableSignature::from_hex(MAIL_SIG).unwrap();
        let digest = parse_digest(HELLO_DIGEST).unwrap();
        match sig.recover_address(&digest) {
            Ok(addr) => assert_ne!(addr.to_checksum(None), COW),
            Err(e) => assert!(matches!(e, SignatureError::Recovery(_))),
        }
    }

    #[test]
    fn verification_compares_case_insensitively() {
        let addr: Address = COW.parse().unwrap();
        let v = Verification::new(addr, Some(&COW.to_lowercase()));
        assert_eq!(v.matches, Some(true));
        assert_eq!(Verification::new(addr, Some("  ")).matches, None);
        assert_eq!(
            Verification::new(addr, Some("0x0000000000000000000000000000000000000000")).matches,
            Some(false)
        );
    }
}
