//! AccountId - canonical account identity across address formats
//!
//! The ledger surfaces accounts in two wire formats: 32-byte Substrate
//! account ids (hex or SS58-encoded) and 20-byte H160 addresses. The legacy
//! UI compared them via ad hoc string heuristics; here there is exactly one
//! value type, one equality, and one cross-format conversion.
//!
//! The conversion follows the runtime's unified-account mapping: an H160
//! embeds into a 32-byte id by padding with `0xEE`, and a 32-byte id carrying
//! that padding projects back to its H160. Equality compares the 32-byte
//! canonical form, so the same account parsed from either format is equal.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Padding byte of H160-derived 32-byte account ids
const EVM_SUFFIX: [u8; 12] = [0xEE; 12];

/// Errors related to account parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid hex encoding")]
    InvalidHex,

    #[error("Invalid base58 encoding")]
    InvalidBase58,

    #[error("Unsupported address length: {0} bytes")]
    UnsupportedLength(usize),

    #[error("Unrecognized account format: {0}")]
    UnrecognizedFormat(String),
}

/// Canonical account identity
#[derive(Debug, Clone, Copy)]
pub enum AccountId {
    /// 32-byte Substrate account id
    Substrate([u8; 32]),
    /// 20-byte H160 address
    Evm([u8; 20]),
}

impl AccountId {
    /// The canonical 32-byte form used for equality and hashing.
    ///
    /// H160 addresses embed via `0xEE` padding; 32-byte ids are already
    /// canonical.
    pub fn canonical_bytes(&self) -> [u8; 32] {
        match self {
            AccountId::Substrate(bytes) => *bytes,
            AccountId::Evm(bytes) => {
                let mut out = [0u8; 32];
                out[..20].copy_from_slice(bytes);
                out[20..].copy_from_slice(&EVM_SUFFIX);
                out
            }
        }
    }

    /// Project to an H160 when this account has one.
    ///
    /// Native H160 accounts always do; a Substrate id only when it carries
    /// the `0xEE` embedding suffix.
    pub fn as_evm(&self) -> Option<[u8; 20]> {
        match self {
            AccountId::Evm(bytes) => Some(*bytes),
            AccountId::Substrate(bytes) => {
                if bytes[20..] == EVM_SUFFIX {
                    let mut out = [0u8; 20];
                    out.copy_from_slice(&bytes[..20]);
                    Some(out)
                } else {
                    None
                }
            }
        }
    }

    /// Embed an H160 into the canonical 32-byte form.
    pub fn from_evm(bytes: [u8; 20]) -> Self {
        AccountId::Evm(bytes)
    }

    /// Parse from any supported wire format: `0x`-prefixed hex (20 or 32
    /// bytes) or an SS58-encoded 32-byte account id.
    ///
    /// SS58 validation is structural (base58 shape, prefix, body length);
    /// checksum verification belongs to the wallet layer that produced the
    /// address.
    pub fn parse(s: &str) -> Result<Self, AccountIdError> {
        let s = s.trim();
        if let Some(stripped) = s.strip_prefix("0x") {
            let bytes = hex::decode(stripped).map_err(|_| AccountIdError::InvalidHex)?;
            return Self::from_bytes(&bytes);
        }
        // SS58: base58(prefix | 32-byte body | 2-byte checksum)
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|_| AccountIdError::InvalidBase58)?;
        let body = match decoded.len() {
            35 => &decoded[1..33],  // 1-byte network prefix
            36 => &decoded[2..34],  // 2-byte network prefix
            other => return Err(AccountIdError::UnsupportedLength(other)),
        };
        let mut out = [0u8; 32];
        out.copy_from_slice(body);
        Ok(AccountId::Substrate(out))
    }

    /// Build from raw bytes (20 ⇒ H160, 32 ⇒ Substrate).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AccountIdError> {
        match bytes.len() {
            20 => {
                let mut out = [0u8; 20];
                out.copy_from_slice(bytes);
                Ok(AccountId::Evm(out))
            }
            32 => {
                let mut out = [0u8; 32];
                out.copy_from_slice(bytes);
                Ok(AccountId::Substrate(out))
            }
            other => Err(AccountIdError::UnsupportedLength(other)),
        }
    }
}

impl PartialEq for AccountId {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_bytes() == other.canonical_bytes()
    }
}

impl Eq for AccountId {}

impl std::hash::Hash for AccountId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.canonical_bytes().hash(state);
    }
}

impl PartialOrd for AccountId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AccountId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.canonical_bytes().cmp(&other.canonical_bytes())
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountId::Substrate(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            AccountId::Evm(bytes) => write!(f, "0x{}", hex::encode(bytes)),
        }
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AccountId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h160_hex() -> &'static str {
        "0xd43593c715fdd31c61141abd04a99fd6822c8558"
    }

    #[test]
    fn test_parse_h160() {
        let id = AccountId::parse(h160_hex()).unwrap();
        assert!(matches!(id, AccountId::Evm(_)));
        assert_eq!(id.to_string(), h160_hex());
    }

    #[test]
    fn test_parse_substrate_hex() {
        let hex32 = format!("0x{}", "ab".repeat(32));
        let id = AccountId::parse(&hex32).unwrap();
        assert!(matches!(id, AccountId::Substrate(_)));
    }

    #[test]
    fn test_parse_ss58() {
        // Alice's well-known SS58 address (prefix 42)
        let id = AccountId::parse("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY").unwrap();
        assert!(matches!(id, AccountId::Substrate(_)));
    }

    #[test]
    fn test_evm_embedding_equality() {
        let evm = AccountId::parse(h160_hex()).unwrap();
        let canonical = evm.canonical_bytes();
        let substrate = AccountId::Substrate(canonical);
        assert_eq!(evm, substrate);
        assert_eq!(substrate.as_evm(), evm.as_evm());
    }

    #[test]
    fn test_non_embedded_has_no_evm_projection() {
        let id = AccountId::Substrate([0xab; 32]);
        assert_eq!(id.as_evm(), None);
    }

    #[test]
    fn test_unrecognized_length_rejected() {
        let bad = format!("0x{}", "ab".repeat(16));
        assert_eq!(
            AccountId::parse(&bad),
            Err(AccountIdError::UnsupportedLength(16))
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let id = AccountId::parse(h160_hex()).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
