//! # Checksummed Identifiers & Addresses
//!
//! Two human-readable encodings live here, and they are deliberately not the
//! same scheme:
//!
//! - **Checksummed identifiers** (transaction ids, asset ids, node ids):
//!   base-58 over `payload ‖ trailer`, where the trailer is the last 4 bytes
//!   of `SHA-256(payload)`. A zero-length payload is valid — it still carries
//!   a 4-byte checksum over empty input.
//! - **Addresses**: `<chain-alias>-<bech32(hrp, payload)>`, e.g.
//!   `A-prism1qw508d6...`. The chain alias routes the address to a shard;
//!   the HRP binds it to a network; bech32 provides its own error detection.
//!
//! Corruption of either encoding is surfaced as an [`IdError`] and never
//! retried — a bad checksum means the caller is holding a damaged string,
//!   and no amount of retrying fixes that.

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::codec::Wire;
use crate::config::{self, Chain, ADDRESS_LENGTH, CHECKSUM_LENGTH};
use crate::error::{CodecError, IdError};

// ---------------------------------------------------------------------------
// Checksummed encoding
// ---------------------------------------------------------------------------

/// Last four bytes of `SHA-256(data)`.
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let digest = Sha256::digest(data);
    let mut trailer = [0u8; CHECKSUM_LENGTH];
    trailer.copy_from_slice(&digest[digest.len() - CHECKSUM_LENGTH..]);
    trailer
}

/// Encodes raw bytes as a base-58 string with an embedded integrity checksum.
pub fn encode_checksummed(bytes: &[u8]) -> String {
    let mut buf = Vec::with_capacity(bytes.len() + CHECKSUM_LENGTH);
    buf.extend_from_slice(bytes);
    buf.extend_from_slice(&checksum(bytes));
    bs58::encode(buf).into_string()
}

/// Decodes a checksummed base-58 string back to raw bytes, verifying the
/// 4-byte trailer.
pub fn decode_checksummed(s: &str) -> Result<Vec<u8>, IdError> {
    let full = bs58::decode(s)
        .into_vec()
        .map_err(|e| IdError::Base58(e.to_string()))?;
    if full.len() < CHECKSUM_LENGTH {
        return Err(IdError::DataTooShort { len: full.len() });
    }
    let (payload, trailer) = full.split_at(full.len() - CHECKSUM_LENGTH);
    if trailer != checksum(payload) {
        return Err(IdError::InvalidChecksum);
    }
    Ok(payload.to_vec())
}

// ---------------------------------------------------------------------------
// Identifier newtypes
// ---------------------------------------------------------------------------

/// Defines a fixed-width identifier wrapping `[u8; $len]` with checksummed
/// string encoding, wire codec, and serde (string form for human-readable
/// formats, raw bytes otherwise).
macro_rules! checksummed_id {
    ($(#[$doc:meta])* $name:ident, $len:expr) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; $len]);

        impl $name {
            /// Wraps raw identifier bytes.
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// The raw identifier bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Parses the checksummed base-58 string form.
            pub fn from_checksummed(s: &str) -> Result<Self, IdError> {
                let payload = decode_checksummed(s)?;
                let bytes: [u8; $len] =
                    payload
                        .try_into()
                        .map_err(|payload: Vec<u8>| IdError::InvalidLength {
                            expected: $len,
                            got: payload.len(),
                        })?;
                Ok(Self(bytes))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", encode_checksummed(&self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self)
            }
        }

        impl Wire for $name {
            fn write(&self, out: &mut Vec<u8>) {
                self.0.write(out);
            }

            fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
                let (bytes, rest) = <[u8; $len]>::read(input)?;
                Ok((Self(bytes), rest))
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&self.to_string())
                } else {
                    serializer.serialize_bytes(&self.0)
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let s = String::deserialize(deserializer)?;
                    Self::from_checksummed(&s).map_err(serde::de::Error::custom)
                } else {
                    let bytes = <Vec<u8>>::deserialize(deserializer)?;
                    let bytes: [u8; $len] = bytes.try_into().map_err(|b: Vec<u8>| {
                        serde::de::Error::custom(format!(
                            "expected {} bytes, got {}",
                            $len,
                            b.len()
                        ))
                    })?;
                    Ok(Self(bytes))
                }
            }
        }
    };
}

checksummed_id!(
    /// A transaction identifier: SHA-256 of the signed transaction bytes.
    TxId,
    32
);

checksummed_id!(
    /// An asset identifier: the ID of the transaction that created the asset.
    AssetId,
    32
);

checksummed_id!(
    /// A blockchain (shard) identifier.
    ChainId,
    32
);

checksummed_id!(
    /// A partition identifier for validator-set scoping.
    SubnetId,
    32
);

checksummed_id!(
    /// A validator node identifier (20-byte short hash of the staking key).
    NodeId,
    20
);

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// A shard-qualified account address.
///
/// String form: `<alias>-<bech32(hrp, payload)>`. The 20-byte payload is the
/// short hash of the account's public key; the same payload is a valid
/// address on every shard, distinguished only by the alias prefix.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Address {
    chain: Chain,
    hrp: String,
    payload: [u8; ADDRESS_LENGTH],
}

impl Address {
    /// Builds an address from its parts, with the HRP taken from the
    /// network ID.
    pub fn new(chain: Chain, network_id: u32, payload: [u8; ADDRESS_LENGTH]) -> Self {
        Self {
            chain,
            hrp: config::hrp_for_network(network_id).to_string(),
            payload,
        }
    }

    /// Parses an address string, validating the chain alias, the bech32
    /// checksum, and the payload length.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        let (alias, rest) = s
            .split_once('-')
            .ok_or_else(|| IdError::MalformedAddress(format!("missing '-' separator in '{s}'")))?;
        let chain =
            Chain::from_alias(alias).ok_or_else(|| IdError::UnknownChainAlias(alias.to_string()))?;

        let (hrp, data) =
            bech32::decode(rest).map_err(|e| IdError::Bech32Decode(e.to_string()))?;
        let payload: [u8; ADDRESS_LENGTH] =
            data.try_into().map_err(|data: Vec<u8>| IdError::InvalidLength {
                expected: ADDRESS_LENGTH,
                got: data.len(),
            })?;

        Ok(Self {
            chain,
            hrp: hrp.to_string(),
            payload,
        })
    }

    /// Parses an address and additionally requires it to belong to the given
    /// chain and network. This is the form the transfer orchestrator uses to
    /// resolve caller-supplied strings.
    pub fn parse_for(s: &str, chain: Chain, network_id: u32) -> Result<Self, IdError> {
        let addr = Self::parse(s)?;
        if addr.chain != chain {
            return Err(IdError::UnknownChainAlias(format!(
                "address is for the {} chain, expected {}",
                addr.chain, chain
            )));
        }
        let expected = config::hrp_for_network(network_id);
        if addr.hrp != expected {
            return Err(IdError::InvalidHrp {
                expected: expected.to_string(),
                got: addr.hrp,
            });
        }
        Ok(addr)
    }

    /// The shard this address lives on.
    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// The raw 20-byte account payload.
    pub fn payload(&self) -> [u8; ADDRESS_LENGTH] {
        self.payload
    }

    /// Renders the full address string.
    pub fn encode(&self) -> String {
        let hrp = Hrp::parse(&self.hrp).expect("stored HRP was validated at construction");
        let data = bech32::encode::<Bech32>(hrp, &self.payload)
            .expect("encoding a 20-byte payload should never fail");
        format!("{}-{}", self.chain.alias(), data)
    }

    /// The same account on a different shard.
    pub fn on_chain(&self, chain: Chain) -> Self {
        Self {
            chain,
            hrp: self.hrp.clone(),
            payload: self.payload,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encode())
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NETWORK_ID_MAINNET;

    #[test]
    fn checksummed_roundtrip() {
        for payload in [&[][..], &[0u8][..], &[1, 2, 3][..], &[0xFF; 32][..]] {
            let encoded = encode_checksummed(payload);
            assert_eq!(decode_checksummed(&encoded).unwrap(), payload);
        }
    }

    #[test]
    fn empty_payload_still_carries_checksum() {
        let encoded = encode_checksummed(&[]);
        // Four checksum bytes survive base-58; the string is non-empty.
        assert!(!encoded.is_empty());
        assert_eq!(decode_checksummed(&encoded).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn flipping_any_character_breaks_the_checksum() {
        let encoded = encode_checksummed(&[0xAB, 0xCD, 0xEF, 0x12, 0x34]);
        for i in 0..encoded.len() {
            let mut corrupted: Vec<char> = encoded.chars().collect();
            corrupted[i] = if corrupted[i] == '2' { '3' } else { '2' };
            let corrupted: String = corrupted.into_iter().collect();
            if corrupted == encoded {
                continue;
            }
            assert!(
                decode_checksummed(&corrupted).is_err(),
                "corruption at index {i} went undetected"
            );
        }
    }

    #[test]
    fn too_short_is_its_own_error() {
        // "2" decodes to a single byte — no room for the 4-byte trailer.
        assert_eq!(
            decode_checksummed("2"),
            Err(IdError::DataTooShort { len: 1 })
        );
    }

    #[test]
    fn tx_id_string_roundtrip() {
        let id = TxId::new([0x5A; 32]);
        let recovered = TxId::from_checksummed(&id.to_string()).unwrap();
        assert_eq!(id, recovered);
    }

    #[test]
    fn node_id_rejects_wrong_length() {
        let as_32 = encode_checksummed(&[1u8; 32]);
        assert_eq!(
            NodeId::from_checksummed(&as_32),
            Err(IdError::InvalidLength {
                expected: 20,
                got: 32
            })
        );
    }

    #[test]
    fn id_serde_human_readable_is_string() {
        let id = AssetId::new([9; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let recovered: AssetId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, recovered);
    }

    #[test]
    fn address_roundtrip() {
        let addr = Address::new(Chain::Asset, NETWORK_ID_MAINNET, [7; 20]);
        let s = addr.encode();
        assert!(s.starts_with("A-prism1"), "address was: {s}");
        let recovered = Address::parse(&s).unwrap();
        assert_eq!(addr, recovered);
    }

    #[test]
    fn address_alias_routes_to_chain() {
        let addr = Address::new(Chain::Staking, NETWORK_ID_MAINNET, [7; 20]);
        assert!(addr.encode().starts_with("S-"));
        assert_eq!(Address::parse(&addr.encode()).unwrap().chain(), Chain::Staking);
    }

    #[test]
    fn parse_for_rejects_wrong_chain() {
        let addr = Address::new(Chain::Asset, NETWORK_ID_MAINNET, [7; 20]).encode();
        assert!(Address::parse_for(&addr, Chain::Contract, NETWORK_ID_MAINNET).is_err());
    }

    #[test]
    fn parse_for_rejects_wrong_network() {
        let addr = Address::new(Chain::Asset, NETWORK_ID_MAINNET, [7; 20]).encode();
        let err = Address::parse_for(&addr, Chain::Asset, 5).unwrap_err();
        assert!(matches!(err, IdError::InvalidHrp { .. }));
    }

    #[test]
    fn unknown_alias_rejected() {
        let addr = Address::new(Chain::Asset, NETWORK_ID_MAINNET, [7; 20]).encode();
        let with_bad_alias = format!("Z{}", &addr[1..]);
        assert!(matches!(
            Address::parse(&with_bad_alias),
            Err(IdError::UnknownChainAlias(_))
        ));
    }

    #[test]
    fn corrupted_bech32_rejected() {
        let addr = Address::new(Chain::Asset, NETWORK_ID_MAINNET, [7; 20]).encode();
        let mut bytes = addr.into_bytes();
        let last = bytes.len() - 1;
        bytes[last] = if bytes[last] == b'q' { b'p' } else { b'q' };
        let corrupted = String::from_utf8(bytes).unwrap();
        assert!(Address::parse(&corrupted).is_err());
    }

    #[test]
    fn same_account_across_shards() {
        let a = Address::new(Chain::Asset, NETWORK_ID_MAINNET, [3; 20]);
        let c = a.on_chain(Chain::Contract);
        assert_eq!(a.payload(), c.payload());
        assert_ne!(a.encode(), c.encode());
    }
}
