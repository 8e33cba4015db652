//! # Protocol Configuration & Constants
//!
//! Every wire-format constant in the client lives here. The values in this
//! module are part of the consensus contract: an encoder that disagrees with
//! the network on any of them produces transactions the network will reject,
//! or worse, transactions that mean something else entirely.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{AssetId, ChainId};

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Mainnet network ID. Mistakes here cost real money.
pub const NETWORK_ID_MAINNET: u32 = 1;

/// Testnet network ID.
pub const NETWORK_ID_TESTNET: u32 = 5;

/// Human-readable bech32 prefixes for addresses, per network.
pub const MAINNET_HRP: &str = "prism";
pub const TESTNET_HRP: &str = "tprism";

/// Returns the address HRP for a network ID. Unknown network IDs fall back
/// to the testnet prefix so that devnets produce obviously-non-mainnet
/// addresses.
pub fn hrp_for_network(network_id: u32) -> &'static str {
    if network_id == NETWORK_ID_MAINNET {
        MAINNET_HRP
    } else {
        TESTNET_HRP
    }
}

// ---------------------------------------------------------------------------
// Codec Parameters
// ---------------------------------------------------------------------------

/// Codec version prefix on every signed transaction and UTXO. There has only
/// ever been one codec; the field exists so there can someday be two.
pub const CODEC_VERSION: u16 = 0;

/// secp256k1 recoverable signature length in bytes (r ‖ s ‖ recovery id).
pub const SIGNATURE_LENGTH: usize = 65;

/// Raw address payload length in bytes (ripemd-style short hash).
pub const ADDRESS_LENGTH: usize = 20;

/// Transaction / asset / chain identifier length in bytes.
pub const ID_LENGTH: usize = 32;

/// Checksum trailer length for human-readable identifier encoding.
pub const CHECKSUM_LENGTH: usize = 4;

/// Maximum memo length in bytes. Enforced at build time, not by the codec.
pub const MEMO_MAX_LENGTH: usize = 256;

// ---------------------------------------------------------------------------
// UTXO Retrieval
// ---------------------------------------------------------------------------

/// Server-side page cap for `get_utxos`. A page with this many entries (or
/// more) means more data may exist and pagination must continue.
pub const UTXO_PAGE_LIMIT: usize = 1024;

/// Hard cap on UTXOs accumulated by a single fetch-all call. Hitting it
/// mid-pagination returns a partial, best-effort set.
pub const UTXO_FETCH_CAP: usize = 5000;

// ---------------------------------------------------------------------------
// Chains
// ---------------------------------------------------------------------------

/// One of the three ledger shards of the Prism network.
///
/// All three share the base asset; value moves between them through the
/// export/import protocol in [`crate::transfer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    /// The asset shard — plain UTXO transfers and asset issuance.
    Asset,
    /// The staking shard — validator set management.
    Staking,
    /// The contract shard — programmable state.
    Contract,
}

impl Chain {
    /// Single-letter alias used as the address prefix (`A-prism1...`).
    pub fn alias(&self) -> &'static str {
        match self {
            Self::Asset => "A",
            Self::Staking => "S",
            Self::Contract => "C",
        }
    }

    /// Parses a chain alias. Case-sensitive: aliases are uppercase on the
    /// wire and in every address string.
    pub fn from_alias(alias: &str) -> Option<Self> {
        match alias {
            "A" => Some(Self::Asset),
            "S" => Some(Self::Staking),
            "C" => Some(Self::Contract),
            _ => None,
        }
    }

    /// The 32-byte blockchain ID of this shard on the given network.
    ///
    /// These are genesis constants: the ID of the transaction that created
    /// each shard, fixed at network launch.
    pub fn id(&self, network_id: u32) -> ChainId {
        let mainnet = network_id == NETWORK_ID_MAINNET;
        let seed: u8 = match (self, mainnet) {
            (Self::Asset, true) => 0xA1,
            (Self::Staking, true) => 0x51,
            (Self::Contract, true) => 0xC1,
            (Self::Asset, false) => 0xA5,
            (Self::Staking, false) => 0x55,
            (Self::Contract, false) => 0xC5,
        };
        ChainId::new([seed; ID_LENGTH])
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset => write!(f, "Asset"),
            Self::Staking => write!(f, "Staking"),
            Self::Contract => write!(f, "Contract"),
        }
    }
}

/// The base asset ID shared by all three shards on the given network.
pub fn base_asset_id(network_id: u32) -> AssetId {
    if network_id == NETWORK_ID_MAINNET {
        AssetId::new([0x11; ID_LENGTH])
    } else {
        AssetId::new([0x15; ID_LENGTH])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
