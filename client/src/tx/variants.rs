//! Transaction variants beyond the plain core.
//!
//! Each variant embeds a tag-less [`BaseTx`] followed by its own fields, in
//! the order the decoders below read them.

use crate::codec::{read_array, write_array, Wire};
use crate::error::CodecError;
use crate::ids::{ChainId, NodeId, SubnetId};
use crate::tx::base::BaseTx;
use crate::tx::transferable::{OutputOwners, TransferableInput, TransferableOutput};

// ---------------------------------------------------------------------------
// Export / Import
// ---------------------------------------------------------------------------

/// Moves value out of this chain into the destination chain's atomic memory,
/// where a matching [`ImportTx`] claims it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTx {
    pub base: BaseTx,
    /// Chain the exported outputs become claimable on.
    pub destination_chain: ChainId,
    /// Outputs placed into the destination's atomic memory.
    pub exported_outputs: Vec<TransferableOutput>,
}

impl ExportTx {
    pub const TYPE_TAG: u32 = 18;
}

impl Wire for ExportTx {
    fn write(&self, out: &mut Vec<u8>) {
        Self::TYPE_TAG.write(out);
        self.base.write_fields(out);
        self.destination_chain.write(out);
        write_array(&self.exported_outputs, out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (tag, rest) = u32::read(input)?;
        if tag != Self::TYPE_TAG {
            return Err(CodecError::TagMismatch {
                expected: Self::TYPE_TAG,
                got: tag,
            });
        }
        let (base, rest) = BaseTx::read_fields(rest)?;
        let (destination_chain, rest) = ChainId::read(rest)?;
        let (exported_outputs, rest) = read_array(rest)?;
        Ok((
            Self {
                base,
                destination_chain,
                exported_outputs,
            },
            rest,
        ))
    }
}

/// Claims value a prior [`ExportTx`] placed in this chain's atomic memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTx {
    pub base: BaseTx,
    /// Chain the claimed value was exported from.
    pub source_chain: ChainId,
    /// Inputs spending outputs out of atomic memory.
    pub imported_inputs: Vec<TransferableInput>,
}

impl ImportTx {
    pub const TYPE_TAG: u32 = 17;
}

impl Wire for ImportTx {
    fn write(&self, out: &mut Vec<u8>) {
        Self::TYPE_TAG.write(out);
        self.base.write_fields(out);
        self.source_chain.write(out);
        write_array(&self.imported_inputs, out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (tag, rest) = u32::read(input)?;
        if tag != Self::TYPE_TAG {
            return Err(CodecError::TagMismatch {
                expected: Self::TYPE_TAG,
                got: tag,
            });
        }
        let (base, rest) = BaseTx::read_fields(rest)?;
        let (source_chain, rest) = ChainId::read(rest)?;
        let (imported_inputs, rest) = read_array(rest)?;
        Ok((
            Self {
                base,
                source_chain,
                imported_inputs,
            },
            rest,
        ))
    }
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// A validator's identity and staking window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validator {
    pub node_id: NodeId,
    /// Unix timestamp staking begins.
    pub start_time: u64,
    /// Unix timestamp staking ends.
    pub end_time: u64,
    /// Stake weight in the smallest denomination.
    pub weight: u64,
}

impl Wire for Validator {
    fn write(&self, out: &mut Vec<u8>) {
        self.node_id.write(out);
        self.start_time.write(out);
        self.end_time.write(out);
        self.weight.write(out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (node_id, rest) = NodeId::read(input)?;
        let (start_time, rest) = u64::read(rest)?;
        let (end_time, rest) = u64::read(rest)?;
        let (weight, rest) = u64::read(rest)?;
        Ok((
            Self {
                node_id,
                start_time,
                end_time,
                weight,
            },
            rest,
        ))
    }
}

/// Registers a validator on the staking chain, bonding the stake outputs
/// until the staking window closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddValidatorTx {
    pub base: BaseTx,
    pub validator: Validator,
    /// Outputs bonded as stake for the duration of the window.
    pub stake: Vec<TransferableOutput>,
    /// Where staking rewards are paid. Tagged on the wire.
    pub rewards_owner: OutputOwners,
    /// Delegation fee the validator keeps, in ten-thousandths.
    pub shares: u32,
}

impl AddValidatorTx {
    pub const TYPE_TAG: u32 = 12;
}

impl Wire for AddValidatorTx {
    fn write(&self, out: &mut Vec<u8>) {
        Self::TYPE_TAG.write(out);
        self.base.write_fields(out);
        self.validator.write(out);
        write_array(&self.stake, out);
        self.rewards_owner.write(out);
        self.shares.write(out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (tag, rest) = u32::read(input)?;
        if tag != Self::TYPE_TAG {
            return Err(CodecError::TagMismatch {
                expected: Self::TYPE_TAG,
                got: tag,
            });
        }
        let (base, rest) = BaseTx::read_fields(rest)?;
        let (validator, rest) = Validator::read(rest)?;
        let (stake, rest) = read_array(rest)?;
        let (rewards_owner, rest) = OutputOwners::read(rest)?;
        let (shares, rest) = u32::read(rest)?;
        Ok((
            Self {
                base,
                validator,
                stake,
                rewards_owner,
                shares,
            },
            rest,
        ))
    }
}

/// Removes a validator from a partition's validator set. Authorization is a
/// list of indices into the partition's control-key set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveL1ValidatorTx {
    pub base: BaseTx,
    pub node_id: NodeId,
    pub subnet_id: SubnetId,
    /// Indices of the control keys that sign the removal.
    pub auth_indices: Vec<u32>,
}

impl RemoveL1ValidatorTx {
    pub const TYPE_TAG: u32 = 23;
}

impl Wire for RemoveL1ValidatorTx {
    fn write(&self, out: &mut Vec<u8>) {
        Self::TYPE_TAG.write(out);
        self.base.write_fields(out);
        self.node_id.write(out);
        self.subnet_id.write(out);
        write_array(&self.auth_indices, out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (tag, rest) = u32::read(input)?;
        if tag != Self::TYPE_TAG {
            return Err(CodecError::TagMismatch {
                expected: Self::TYPE_TAG,
                got: tag,
            });
        }
        let (base, rest) = BaseTx::read_fields(rest)?;
        let (node_id, rest) = NodeId::read(rest)?;
        let (subnet_id, rest) = SubnetId::read(rest)?;
        let (auth_indices, rest) = read_array(rest)?;
        Ok((
            Self {
                base,
                node_id,
                subnet_id,
                auth_indices,
            },
            rest,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NETWORK_ID_TESTNET;
    use crate::ids::AssetId;
    use crate::tx::base::test_fixtures::sample_base_tx;
    use crate::tx::Transaction;

    fn sample_export() -> ExportTx {
        ExportTx {
            base: sample_base_tx(),
            destination_chain: ChainId::new([0x55; 32]),
            exported_outputs: vec![TransferableOutput::simple(
                AssetId::new([0x15; 32]),
                250,
                [0x33; 20],
            )],
        }
    }

    #[test]
    fn export_golden_layout() {
        let tx = sample_export();
        let bytes = tx.to_bytes();

        // outer tag 18, then the embedded core WITHOUT its own tag: the
        // network id follows the tag directly.
        assert_eq!(&bytes[0..4], &[0, 0, 0, 18]);
        assert_eq!(&bytes[4..8], &NETWORK_ID_TESTNET.to_be_bytes());

        // the destination chain sits right after the core's memo
        let core_len = {
            let mut buf = Vec::new();
            tx.base.write_fields(&mut buf);
            buf.len()
        };
        assert_eq!(&bytes[4 + core_len..4 + core_len + 32], &[0x55; 32]);

        assert_eq!(ExportTx::from_bytes(&bytes), Ok(tx));
    }

    #[test]
    fn embedded_core_has_no_inner_tag() {
        let tx = sample_export();
        let bytes = tx.to_bytes();
        let standalone = Transaction::Base(tx.base.clone()).to_bytes();
        // standalone core = 4-byte tag + fields; the variant carries only
        // the fields, so it embeds 4 fewer core bytes.
        assert_eq!(&bytes[4..4 + standalone.len() - 4], &standalone[4..]);
    }

    #[test]
    fn import_roundtrip() {
        let tx = ImportTx {
            base: sample_base_tx(),
            source_chain: ChainId::new([0xA5; 32]),
            imported_inputs: sample_base_tx().inputs,
        };
        assert_eq!(ImportTx::from_bytes(&tx.to_bytes()), Ok(tx));
    }

    #[test]
    fn add_validator_roundtrip() {
        let tx = AddValidatorTx {
            base: sample_base_tx(),
            validator: Validator {
                node_id: NodeId::new([9; 20]),
                start_time: 1_700_000_000,
                end_time: 1_731_536_000,
                weight: 2_000_000,
            },
            stake: vec![TransferableOutput::simple(
                AssetId::new([0x15; 32]),
                2_000_000,
                [0x44; 20],
            )],
            rewards_owner: OutputOwners::single([0x44; 20]),
            shares: 20_000,
        };
        let bytes = tx.to_bytes();
        assert_eq!(&bytes[0..4], &[0, 0, 0, 12]);
        assert_eq!(AddValidatorTx::from_bytes(&bytes), Ok(tx));
    }

    #[test]
    fn remove_l1_validator_roundtrip() {
        let tx = RemoveL1ValidatorTx {
            base: sample_base_tx(),
            node_id: NodeId::new([9; 20]),
            subnet_id: SubnetId::new([8; 32]),
            auth_indices: vec![0, 3],
        };
        let bytes = tx.to_bytes();
        assert_eq!(&bytes[0..4], &[0, 0, 0, 23]);
        assert_eq!(RemoveL1ValidatorTx::from_bytes(&bytes), Ok(tx));
    }

    #[test]
    fn truncated_variant_fails() {
        let bytes = sample_export().to_bytes();
        assert!(matches!(
            ExportTx::from_bytes(&bytes[..bytes.len() - 5]),
            Err(CodecError::UnexpectedEof { .. })
        ));
    }
}
