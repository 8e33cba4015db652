//! The multi-dimension fee model.
//!
//! A transaction is priced along four dimensions — bandwidth, storage reads,
//! storage writes, compute — each weighted by a network-published weight.
//! `gas` is the weighted sum; the fee is gas times the current unit price.
//! Weights and price change with network load, so they are always taken from
//! a live [`FeeState`], never hard-coded.

use serde::{Deserialize, Serialize};

use crate::codec::Wire;
use crate::config::SIGNATURE_LENGTH;
use crate::tx::Transaction;

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// A transaction's resource consumption, one scalar per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    /// Encoded signed size in bytes.
    pub bandwidth: u64,
    /// State entries read (consumed inputs).
    pub db_read: u64,
    /// State entries written (created outputs).
    pub db_write: u64,
    /// Signature verifications.
    pub compute: u64,
}

impl Dimensions {
    /// Measures an unsigned transaction as it will be once signed: the
    /// bandwidth term includes the envelope and the credentials the
    /// signature slots will expand into.
    pub fn of_transaction(tx: &Transaction) -> Self {
        let inputs = tx.inputs();
        let slots = tx.signature_slot_count() as u64;

        // version + body + credential array: count, then per credential a
        // tag, a signature count, and the signatures themselves.
        let bandwidth = 2
            + tx.to_bytes().len() as u64
            + 4
            + inputs.len() as u64 * 8
            + slots * SIGNATURE_LENGTH as u64;

        Self {
            bandwidth,
            db_read: inputs.len() as u64,
            db_write: tx.outputs().len() as u64,
            compute: slots,
        }
    }
}

/// Network-published weight per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeWeights {
    pub bandwidth: u64,
    pub db_read: u64,
    pub db_write: u64,
    pub compute: u64,
}

/// A snapshot of the chain's fee parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeState {
    pub weights: FeeWeights,
    /// Price per unit of gas.
    pub price: u64,
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Weighted gas total. Saturates rather than wrapping; a saturated gas value
/// prices the transaction out instead of under-charging it.
pub fn gas(dims: Dimensions, weights: FeeWeights) -> u64 {
    let terms = [
        dims.bandwidth.saturating_mul(weights.bandwidth),
        dims.db_read.saturating_mul(weights.db_read),
        dims.db_write.saturating_mul(weights.db_write),
        dims.compute.saturating_mul(weights.compute),
    ];
    terms.into_iter().fold(0u64, u64::saturating_add)
}

/// The fee for consuming `dims` under `state`. Pure: same inputs, same fee.
pub fn compute_fee(dims: Dimensions, state: &FeeState) -> u64 {
    gas(dims, state.weights).saturating_mul(state.price)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::base::test_fixtures::sample_base_tx;

    fn unit_weights() -> FeeWeights {
        FeeWeights {
            bandwidth: 1,
            db_read: 1,
            db_write: 1,
            compute: 1,
        }
    }

    #[test]
    fn gas_is_the_weighted_sum() {
        let dims = Dimensions {
            bandwidth: 100,
            db_read: 2,
            db_write: 3,
            compute: 1,
        };
        let weights = FeeWeights {
            bandwidth: 1,
            db_read: 10,
            db_write: 20,
            compute: 1000,
        };
        assert_eq!(gas(dims, weights), 100 + 20 + 60 + 1000);
    }

    #[test]
    fn fee_scales_with_price() {
        let dims = Dimensions {
            bandwidth: 10,
            db_read: 0,
            db_write: 0,
            compute: 0,
        };
        let state = FeeState {
            weights: unit_weights(),
            price: 7,
        };
        assert_eq!(compute_fee(dims, &state), 70);
    }

    #[test]
    fn zero_price_means_zero_fee() {
        let dims = Dimensions {
            bandwidth: u64::MAX,
            db_read: 1,
            db_write: 1,
            compute: 1,
        };
        let state = FeeState {
            weights: unit_weights(),
            price: 0,
        };
        assert_eq!(compute_fee(dims, &state), 0);
    }

    #[test]
    fn overflow_saturates_instead_of_wrapping() {
        let dims = Dimensions {
            bandwidth: u64::MAX,
            db_read: u64::MAX,
            db_write: 0,
            compute: 0,
        };
        assert_eq!(gas(dims, unit_weights()), u64::MAX);
    }

    #[test]
    fn transaction_dimensions_count_io_and_signatures() {
        let tx = Transaction::Base(sample_base_tx());
        let dims = Dimensions::of_transaction(&tx);
        assert_eq!(dims.db_read, 1);
        assert_eq!(dims.db_write, 1);
        assert_eq!(dims.compute, 1);
        // envelope accounting: strictly larger than the bare body
        assert!(dims.bandwidth > tx.to_bytes().len() as u64);
    }
}
