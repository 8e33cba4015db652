//! The common transaction core.
//!
//! Every transaction variant embeds a [`BaseTx`]: the network and chain it
//! targets, the outputs it creates, the inputs it consumes, and an optional
//! memo. Standalone, it is itself the plain value-transfer transaction.

use crate::codec::{
    read_array, read_prefixed_bytes, write_array, write_prefixed_bytes, Wire,
};
use crate::error::CodecError;
use crate::ids::ChainId;
use crate::tx::transferable::{TransferableInput, TransferableOutput};

/// The shared core of every transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTx {
    /// Network this transaction is valid on.
    pub network_id: u32,
    /// Chain this transaction executes on.
    pub blockchain_id: ChainId,
    /// Outputs created, excluding any variant-specific outputs.
    pub outputs: Vec<TransferableOutput>,
    /// Inputs consumed, excluding any variant-specific inputs.
    pub inputs: Vec<TransferableInput>,
    /// Arbitrary caller bytes, capped at [`crate::config::MEMO_MAX_LENGTH`].
    pub memo: Vec<u8>,
}

impl BaseTx {
    pub const TYPE_TAG: u32 = 0;

    /// An empty core on the given network and chain.
    pub fn new(network_id: u32, blockchain_id: ChainId) -> Self {
        Self {
            network_id,
            blockchain_id,
            outputs: Vec::new(),
            inputs: Vec::new(),
            memo: Vec::new(),
        }
    }

    /// Field encoding without the type tag. Variants embedding a core call
    /// this; their own tag already identifies the layout.
    pub fn write_fields(&self, out: &mut Vec<u8>) {
        self.network_id.write(out);
        self.blockchain_id.write(out);
        write_array(&self.outputs, out);
        write_array(&self.inputs, out);
        write_prefixed_bytes(&self.memo, out);
    }

    /// Field decoding without the type tag.
    pub fn read_fields(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (network_id, rest) = u32::read(input)?;
        let (blockchain_id, rest) = ChainId::read(rest)?;
        let (outputs, rest) = read_array(rest)?;
        let (inputs, rest) = read_array(rest)?;
        let (memo, rest) = read_prefixed_bytes(rest)?;
        Ok((
            Self {
                network_id,
                blockchain_id,
                outputs,
                inputs,
                memo,
            },
            rest,
        ))
    }
}

impl Wire for BaseTx {
    fn write(&self, out: &mut Vec<u8>) {
        Self::TYPE_TAG.write(out);
        self.write_fields(out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (tag, rest) = u32::read(input)?;
        if tag != Self::TYPE_TAG {
            return Err(CodecError::TagMismatch {
                expected: Self::TYPE_TAG,
                got: tag,
            });
        }
        Self::read_fields(rest)
    }
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

#[cfg(test)]
pub mod test_fixtures {
    use super::*;
    use crate::config::NETWORK_ID_TESTNET;
    use crate::ids::{AssetId, TxId};
    use crate::tx::transferable::{Input, TransferInput};

    /// One input, one output, a short memo.
    pub fn sample_base_tx() -> BaseTx {
        BaseTx {
            network_id: NETWORK_ID_TESTNET,
            blockchain_id: ChainId::new([0xA5; 32]),
            outputs: vec![TransferableOutput::simple(
                AssetId::new([0x15; 32]),
                900,
                [0x22; 20],
            )],
            inputs: vec![TransferableInput {
                tx_id: TxId::new([0x01; 32]),
                utxo_index: 0,
                asset_id: AssetId::new([0x15; 32]),
                input: Input::Transfer(TransferInput {
                    amount: 1000,
                    signature_indices: vec![0],
                }),
            }],
            memo: b"hi".to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
