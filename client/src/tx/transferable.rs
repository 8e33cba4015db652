//! Outputs, inputs, and ownership conditions.
//!
//! An output locks value behind an [`OutputOwners`] condition; an input spends
//! a prior output by naming it and listing which owner signatures will be
//! supplied. The stakeable-lock wrappers add a locktime horizon around a
//! plain transfer payload without changing its layout.

use crate::codec::{read_array, write_array, Wire};
use crate::config::ADDRESS_LENGTH;
use crate::error::CodecError;
use crate::ids::{AssetId, TxId};

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

/// The spend condition attached to an output: `threshold` of `addresses`
/// must sign, and not before `locktime`.
///
/// Embedded tag-less inside [`TransferOutput`]; carries its own tag when it
/// stands alone in a tag-dispatched position (validator reward owners).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOwners {
    /// Unix timestamp before which the output cannot be spent.
    pub locktime: u64,
    /// Number of signatures required to spend.
    pub threshold: u32,
    /// Raw 20-byte address payloads, in wire order.
    pub addresses: Vec<[u8; ADDRESS_LENGTH]>,
}

impl OutputOwners {
    pub const TYPE_TAG: u32 = 11;

    /// One owner, immediately spendable.
    pub fn single(address: [u8; ADDRESS_LENGTH]) -> Self {
        Self {
            locktime: 0,
            threshold: 1,
            addresses: vec![address],
        }
    }

    /// Field encoding without the type tag, for embedded positions.
    pub fn write_fields(&self, out: &mut Vec<u8>) {
        self.locktime.write(out);
        self.threshold.write(out);
        write_array(&self.addresses, out);
    }

    /// Field decoding without the type tag.
    pub fn read_fields(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (locktime, rest) = u64::read(input)?;
        let (threshold, rest) = u32::read(rest)?;
        let (addresses, rest) = read_array(rest)?;
        Ok((
            Self {
                locktime,
                threshold,
                addresses,
            },
            rest,
        ))
    }
}

impl Wire for OutputOwners {
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
// Outputs
// ---------------------------------------------------------------------------

/// A quantity of one asset locked behind an ownership condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutput {
    /// Amount of the asset, in its smallest denomination.
    pub amount: u64,
    /// Who can spend it, and when.
    pub owners: OutputOwners,
}

impl TransferOutput {
    pub const TYPE_TAG: u32 = 7;
}

impl Wire for TransferOutput {
    fn write(&self, out: &mut Vec<u8>) {
        Self::TYPE_TAG.write(out);
        self.amount.write(out);
        self.owners.write_fields(out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (tag, rest) = u32::read(input)?;
        if tag != Self::TYPE_TAG {
            return Err(CodecError::TagMismatch {
                expected: Self::TYPE_TAG,
                got: tag,
            });
        }
        let (amount, rest) = u64::read(rest)?;
        let (owners, rest) = OutputOwners::read_fields(rest)?;
        Ok((Self { amount, owners }, rest))
    }
}

/// A transfer output frozen for staking until `locktime`. The inner output
/// keeps its own tag on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeableLockOut {
    /// Staking lock horizon, independent of the inner owners' locktime.
    pub locktime: u64,
    /// The wrapped output.
    pub output: TransferOutput,
}

impl StakeableLockOut {
    pub const TYPE_TAG: u32 = 22;
}

impl Wire for StakeableLockOut {
    fn write(&self, out: &mut Vec<u8>) {
        Self::TYPE_TAG.write(out);
        self.locktime.write(out);
        self.output.write(out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (tag, rest) = u32::read(input)?;
        if tag != Self::TYPE_TAG {
            return Err(CodecError::TagMismatch {
                expected: Self::TYPE_TAG,
                got: tag,
            });
        }
        let (locktime, rest) = u64::read(rest)?;
        let (output, rest) = TransferOutput::read(rest)?;
        Ok((Self { locktime, output }, rest))
    }
}

/// Any output payload that can sit in a tag-dispatched output position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Transfer(TransferOutput),
    StakeableLock(StakeableLockOut),
}

impl Output {
    /// The amount carried, regardless of wrapping.
    pub fn amount(&self) -> u64 {
        match self {
            Self::Transfer(out) => out.amount,
            Self::StakeableLock(out) => out.output.amount,
        }
    }

    /// The spend condition, regardless of wrapping.
    pub fn owners(&self) -> &OutputOwners {
        match self {
            Self::Transfer(out) => &out.owners,
            Self::StakeableLock(out) => &out.output.owners,
        }
    }

    /// The staking lock horizon, zero for plain outputs.
    pub fn stakeable_locktime(&self) -> u64 {
        match self {
            Self::Transfer(_) => 0,
            Self::StakeableLock(out) => out.locktime,
        }
    }
}

impl Wire for Output {
    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Transfer(o) => o.write(out),
            Self::StakeableLock(o) => o.write(out),
        }
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (tag, _) = u32::read(input)?;
        match tag {
            TransferOutput::TYPE_TAG => {
                let (o, rest) = TransferOutput::read(input)?;
                Ok((Self::Transfer(o), rest))
            }
            StakeableLockOut::TYPE_TAG => {
                let (o, rest) = StakeableLockOut::read(input)?;
                Ok((Self::StakeableLock(o), rest))
            }
            tag => Err(CodecError::UnknownTag { tag }),
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Spends `amount` from a prior output, naming which of the output's owner
/// addresses will sign (by index into the owners' address list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInput {
    /// Amount consumed, matching the spent output exactly.
    pub amount: u64,
    /// Indices into the spent output's address list, strictly increasing.
    pub signature_indices: Vec<u32>,
}

impl TransferInput {
    pub const TYPE_TAG: u32 = 5;
}

impl Wire for TransferInput {
    fn write(&self, out: &mut Vec<u8>) {
        Self::TYPE_TAG.write(out);
        self.amount.write(out);
        write_array(&self.signature_indices, out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (tag, rest) = u32::read(input)?;
        if tag != Self::TYPE_TAG {
            return Err(CodecError::TagMismatch {
                expected: Self::TYPE_TAG,
                got: tag,
            });
        }
        let (amount, rest) = u64::read(rest)?;
        let (signature_indices, rest) = read_array(rest)?;
        Ok((
            Self {
                amount,
                signature_indices,
            },
            rest,
        ))
    }
}

/// Spends a stake-locked output. The inner input keeps its own tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeableLockIn {
    /// The lock horizon of the output being spent.
    pub locktime: u64,
    /// The wrapped input.
    pub input: TransferInput,
}

impl StakeableLockIn {
    pub const TYPE_TAG: u32 = 21;
}

impl Wire for StakeableLockIn {
    fn write(&self, out: &mut Vec<u8>) {
        Self::TYPE_TAG.write(out);
        self.locktime.write(out);
        self.input.write(out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (tag, rest) = u32::read(input)?;
        if tag != Self::TYPE_TAG {
            return Err(CodecError::TagMismatch {
                expected: Self::TYPE_TAG,
                got: tag,
            });
        }
        let (locktime, rest) = u64::read(rest)?;
        let (inner, rest) = TransferInput::read(rest)?;
        Ok((
            Self {
                locktime,
                input: inner,
            },
            rest,
        ))
    }
}

/// Any input payload that can sit in a tag-dispatched input position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Transfer(TransferInput),
    StakeableLock(StakeableLockIn),
}

impl Input {
    /// The amount consumed, regardless of wrapping.
    pub fn amount(&self) -> u64 {
        match self {
            Self::Transfer(i) => i.amount,
            Self::StakeableLock(i) => i.input.amount,
        }
    }

    /// The signature index list, regardless of wrapping.
    pub fn signature_indices(&self) -> &[u32] {
        match self {
            Self::Transfer(i) => &i.signature_indices,
            Self::StakeableLock(i) => &i.input.signature_indices,
        }
    }
}

impl Wire for Input {
    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Transfer(i) => i.write(out),
            Self::StakeableLock(i) => i.write(out),
        }
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (tag, _) = u32::read(input)?;
        match tag {
            TransferInput::TYPE_TAG => {
                let (i, rest) = TransferInput::read(input)?;
                Ok((Self::Transfer(i), rest))
            }
            StakeableLockIn::TYPE_TAG => {
                let (i, rest) = StakeableLockIn::read(input)?;
                Ok((Self::StakeableLock(i), rest))
            }
            tag => Err(CodecError::UnknownTag { tag }),
        }
    }
}

// ---------------------------------------------------------------------------
// Transferables
// ---------------------------------------------------------------------------

/// An output paired with the asset it denominates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferableOutput {
    pub asset_id: AssetId,
    pub output: Output,
}

impl TransferableOutput {
    /// A plain single-owner output of `amount`.
    pub fn simple(asset_id: AssetId, amount: u64, address: [u8; ADDRESS_LENGTH]) -> Self {
        Self {
            asset_id,
            output: Output::Transfer(TransferOutput {
                amount,
                owners: OutputOwners::single(address),
            }),
        }
    }

    pub fn amount(&self) -> u64 {
        self.output.amount()
    }
}

impl Wire for TransferableOutput {
    fn write(&self, out: &mut Vec<u8>) {
        self.asset_id.write(out);
        self.output.write(out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (asset_id, rest) = AssetId::read(input)?;
        let (output, rest) = Output::read(rest)?;
        Ok((Self { asset_id, output }, rest))
    }
}

/// An input paired with the UTXO it spends: the creating transaction, the
/// output's index within it, and the asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferableInput {
    /// Transaction that created the spent output.
    pub tx_id: TxId,
    /// Index of the output within that transaction.
    pub utxo_index: u32,
    /// Asset the spent output denominates.
    pub asset_id: AssetId,
    /// The spend itself.
    pub input: Input,
}

impl TransferableInput {
    pub fn amount(&self) -> u64 {
        self.input.amount()
    }
}

impl Wire for TransferableInput {
    fn write(&self, out: &mut Vec<u8>) {
        self.tx_id.write(out);
        self.utxo_index.write(out);
        self.asset_id.write(out);
        self.input.write(out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (tx_id, rest) = TxId::read(input)?;
        let (utxo_index, rest) = u32::read(rest)?;
        let (asset_id, rest) = AssetId::read(rest)?;
        let (inner, rest) = Input::read(rest)?;
        Ok((
            Self {
                tx_id,
                utxo_index,
                asset_id,
                input: inner,
            },
            rest,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
