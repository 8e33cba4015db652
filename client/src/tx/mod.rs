//! # Transaction Model & Codec
//!
//! The tagged union of every transaction the network understands, plus the
//! sub-structures they are built from. Each variant owns its wire schema:
//! fields are encoded in declaration order, and that order is a consensus
//! contract locked by golden-byte tests — reordering a field is a breaking
//! change to the network, not a refactor.
//!
//! ## Architecture
//!
//! ```text
//! transferable.rs — Outputs, inputs, owners, stakeable-lock wrappers
//! base.rs         — BaseTx: the common core every variant embeds
//! variants.rs     — ExportTx, ImportTx, AddValidatorTx, RemoveL1ValidatorTx
//! credential.rs   — Signatures, credentials, and the SignedTx envelope
//! ```
//!
//! ## Type tags
//!
//! An encoded transaction starts with a 4-byte tag selecting its decoder;
//! the stream is otherwise undiscriminated. [`Transaction::read`] is the
//! central dispatch table. Sub-structures that appear in tag-dispatched
//! positions (output payloads, input payloads) carry their own tags.
//!
//! ## Embedding rule
//!
//! A [`BaseTx`] nested inside a variant is encoded **without** its own tag:
//! the outer variant's tag already implies it, and duplicating the inner tag
//! would corrupt the layout. `BaseTx` therefore exposes tag-less
//! `write_fields`/`read_fields` for embedded use; its standalone [`Wire`]
//! impl adds the tag.

pub mod base;
pub mod credential;
pub mod transferable;
pub mod variants;

pub use base::BaseTx;
pub use credential::{Credential, Signature, SignedTx};
pub use transferable::{
    Input, Output, OutputOwners, StakeableLockIn, StakeableLockOut, TransferInput, TransferOutput,
    TransferableInput, TransferableOutput,
};
pub use variants::{AddValidatorTx, ExportTx, ImportTx, RemoveL1ValidatorTx, Validator};

use crate::codec::Wire;
use crate::error::CodecError;

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// Any transaction the network's codec understands.
///
/// One constructor per kind; the discriminant is the wire type tag of the
/// variant. Value semantics throughout — a decoded transaction shares no
/// state with the buffer it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// Plain value movement within one shard. Tag 0.
    Base(BaseTx),
    /// Add a validator to the staking shard. Tag 12.
    AddValidator(AddValidatorTx),
    /// Claim value exported from another shard. Tag 17.
    Import(ImportTx),
    /// Move value into another shard's atomic memory. Tag 18.
    Export(ExportTx),
    /// Remove a validator from a partition's validator set. Tag 23.
    RemoveL1Validator(RemoveL1ValidatorTx),
}

impl Transaction {
    /// The wire type tag of this variant.
    pub fn type_tag(&self) -> u32 {
        match self {
            Self::Base(_) => BaseTx::TYPE_TAG,
            Self::AddValidator(_) => AddValidatorTx::TYPE_TAG,
            Self::Import(_) => ImportTx::TYPE_TAG,
            Self::Export(_) => ExportTx::TYPE_TAG,
            Self::RemoveL1Validator(_) => RemoveL1ValidatorTx::TYPE_TAG,
        }
    }

    /// The embedded common core.
    pub fn base(&self) -> &BaseTx {
        match self {
            Self::Base(tx) => tx,
            Self::AddValidator(tx) => &tx.base,
            Self::Import(tx) => &tx.base,
            Self::Export(tx) => &tx.base,
            Self::RemoveL1Validator(tx) => &tx.base,
        }
    }

    /// All inputs the transaction consumes, in wire order: base inputs
    /// first, then any variant-specific inputs (imported inputs).
    pub fn inputs(&self) -> Vec<&TransferableInput> {
        let mut inputs: Vec<&TransferableInput> = self.base().inputs.iter().collect();
        if let Self::Import(tx) = self {
            inputs.extend(tx.imported_inputs.iter());
        }
        inputs
    }

    /// All outputs the transaction creates, in wire order.
    pub fn outputs(&self) -> Vec<&TransferableOutput> {
        let mut outputs: Vec<&TransferableOutput> = self.base().outputs.iter().collect();
        match self {
            Self::Export(tx) => outputs.extend(tx.exported_outputs.iter()),
            Self::AddValidator(tx) => outputs.extend(tx.stake.iter()),
            _ => {}
        }
        outputs
    }

    /// The per-input signature index lists, in input order. The credential
    /// list of a signed transaction is built positionally from this.
    pub fn signature_indices(&self) -> Vec<&[u32]> {
        self.inputs()
            .iter()
            .map(|input| input.input.signature_indices())
            .collect()
    }

    /// Total signature slots across all inputs.
    pub fn signature_slot_count(&self) -> usize {
        self.signature_indices().iter().map(|s| s.len()).sum()
    }
}

impl Wire for Transaction {
    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Base(tx) => tx.write(out),
            Self::AddValidator(tx) => tx.write(out),
            Self::Import(tx) => tx.write(out),
            Self::Export(tx) => tx.write(out),
            Self::RemoveL1Validator(tx) => tx.write(out),
        }
    }

    /// The tag → decoder dispatch table. Peeks the leading 4-byte tag and
    /// routes to the variant decoder; the variant re-reads and verifies the
    /// tag itself.
    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (tag, _) = u32::read(input)?;
        match tag {
            BaseTx::TYPE_TAG => {
                let (tx, rest) = BaseTx::read(input)?;
                Ok((Self::Base(tx), rest))
            }
            AddValidatorTx::TYPE_TAG => {
                let (tx, rest) = AddValidatorTx::read(input)?;
                Ok((Self::AddValidator(tx), rest))
            }
            ImportTx::TYPE_TAG => {
                let (tx, rest) = ImportTx::read(input)?;
                Ok((Self::Import(tx), rest))
            }
            ExportTx::TYPE_TAG => {
                let (tx, rest) = ExportTx::read(input)?;
                Ok((Self::Export(tx), rest))
            }
            RemoveL1ValidatorTx::TYPE_TAG => {
                let (tx, rest) = RemoveL1ValidatorTx::read(input)?;
                Ok((Self::RemoveL1Validator(tx), rest))
            }
            tag => Err(CodecError::UnknownTag { tag }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
