//! The node-facing RPC seam.
//!
//! Everything the client needs from the network goes through [`ChainRpc`].
//! Production implementations wrap a JSON-RPC transport; tests substitute
//! scripted mocks. The trait is object-safe so orchestrators can hold a
//! `dyn ChainRpc` without committing to a transport.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Chain;
use crate::error::RpcError;
use crate::fee::FeeState;
use crate::ids::{Address, TxId};
use crate::utxo::{UtxoCursor, UtxoPage};

/// Where a submitted transaction stands from the node's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Final: the transaction is in the chain.
    Accepted,
    /// In the mempool or being verified; poll again.
    Processing,
    /// Final: the node discarded the transaction.
    Dropped {
        /// The node's stated reason, when it gives one.
        reason: String,
    },
    /// The node has no record of the transaction.
    Unknown,
}

impl TxStatus {
    /// Whether the status can still change.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Accepted | Self::Dropped { .. })
    }
}

/// Read and submit operations against one network's chains.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Issues a signed transaction (checksummed hex) to `chain`. Returns
    /// the ID the node assigned, which must equal the locally computed one.
    async fn submit_transaction(&self, chain: Chain, signed_hex: &str) -> Result<TxId, RpcError>;

    /// Current status of `id` on `chain`.
    async fn get_transaction_status(&self, chain: Chain, id: &TxId) -> Result<TxStatus, RpcError>;

    /// One page of `address`'s UTXO set on `chain`, resuming from `cursor`.
    async fn get_utxos(
        &self,
        chain: Chain,
        address: &Address,
        cursor: Option<UtxoCursor>,
    ) -> Result<UtxoPage, RpcError>;

    /// Live fee weights and gas price for `chain`.
    async fn get_fee_state(&self, chain: Chain) -> Result<FeeState, RpcError>;

    /// Spendable balance of `address` on `chain`, in the smallest
    /// denomination of the native asset.
    async fn get_balance(&self, chain: Chain, address: &Address) -> Result<u64, RpcError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finality() {
        assert!(TxStatus::Accepted.is_final());
        assert!(TxStatus::Dropped {
            reason: "conflict".into()
        }
        .is_final());
        assert!(!TxStatus::Processing.is_final());
        assert!(!TxStatus::Unknown.is_final());
    }
}
