//! Error taxonomy for the client.
//!
//! Each failure class is its own enum so that callers can match on exactly
//! the recovery semantics they care about:
//!
//! - [`CodecError`] — malformed or truncated bytes. Fatal to the decode in
//!   progress; never partially recovered.
//! - [`IdError`] — human-readable identifier integrity failure. Surfaced,
//!   not retried.
//! - [`PreflightError`] — a transfer precondition failed before any network
//!   mutation. The only class that is locally recoverable by adjusting input.
//! - [`SubmissionError`] — the network rejected a transaction. Surfaced with
//!   the rejecting reason, no automatic retry.
//! - [`StuckTransferError`] — export confirmed but import not completed.
//!   Funds are in inter-chain transit, not lost; carries everything needed
//!   to resume the import leg.
//! - [`RpcError`] / [`SignerError`] — collaborator transport failures.

use thiserror::Error;

use crate::config::Chain;
use crate::ids::TxId;

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Errors produced while decoding wire bytes.
///
/// Any of these means the input is not a well-formed encoding; the whole
/// parse is discarded and no partial value is ever returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The input ended before a declared field width was satisfied.
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remain")]
    UnexpectedEof {
        /// Bytes the current field still required.
        needed: usize,
        /// Bytes actually remaining in the input.
        remaining: usize,
    },

    /// The leading type tag does not select any known decoder.
    #[error("unknown type tag {tag}")]
    UnknownTag {
        /// The tag value that was read.
        tag: u32,
    },

    /// A type tag was read where a specific tag was required.
    #[error("type tag mismatch: expected {expected}, got {got}")]
    TagMismatch {
        /// The tag the schema requires at this position.
        expected: u32,
        /// The tag that was actually read.
        got: u32,
    },

    /// Input remained after a decode that must consume the whole buffer.
    #[error("{count} trailing bytes after decode")]
    TrailingBytes {
        /// Number of unconsumed bytes.
        count: usize,
    },

    /// The codec version prefix is not one this client understands.
    #[error("unsupported codec version {version}")]
    UnsupportedCodecVersion {
        /// The version that was read.
        version: u16,
    },

    /// The memo exceeds the network's length cap.
    #[error("memo of {len} bytes exceeds the {max}-byte cap")]
    MemoTooLong {
        /// Supplied memo length.
        len: usize,
        /// The network cap.
        max: usize,
    },
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Errors from checksummed identifier and address handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    /// The string is not valid base-58.
    #[error("base-58 decode error: {0}")]
    Base58(String),

    /// Fewer than four bytes remain after base-58 decoding, so there is no
    /// room for the checksum trailer.
    #[error("data too short: {len} bytes, need at least 4 for the checksum")]
    DataTooShort {
        /// Decoded byte count.
        len: usize,
    },

    /// The recomputed checksum does not match the trailer.
    #[error("invalid checksum")]
    InvalidChecksum,

    /// The decoded payload has the wrong length for the identifier type.
    #[error("invalid identifier length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected payload length.
        expected: usize,
        /// Actual payload length.
        got: usize,
    },

    /// The bech32 portion of an address could not be decoded.
    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    /// The address carries an HRP for a different network.
    #[error("invalid HRP: expected '{expected}', got '{got}'")]
    InvalidHrp {
        /// The HRP required by the target network.
        expected: String,
        /// The HRP that was found.
        got: String,
    },

    /// The address prefix is not a known chain alias.
    #[error("unknown chain alias '{0}'")]
    UnknownChainAlias(String),

    /// The address string is not of the form `<alias>-<bech32>`.
    #[error("malformed address: {0}")]
    MalformedAddress(String),
}

// ---------------------------------------------------------------------------
// Transfer preflight
// ---------------------------------------------------------------------------

/// A transfer precondition failed before any transaction was submitted.
///
/// Nothing has moved; the caller can adjust the amount or top up the source
/// balance and retry the whole transfer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreflightError {
    /// The source balance cannot cover the requested amount.
    #[error("insufficient balance: have {balance}, transfer requires {required}")]
    InsufficientBalance {
        /// Spendable balance on the source chain.
        balance: u64,
        /// Amount plus combined fees.
        required: u64,
    },

    /// The combined export + import fee equals or exceeds the amount, so the
    /// transfer would deliver nothing. Equality is insufficient by design.
    #[error("amount {amount} does not exceed combined fees {combined_fee}")]
    FeeExceedsAmount {
        /// Requested transfer amount.
        amount: u64,
        /// Export fee plus import fee.
        combined_fee: u64,
    },

    /// The available UTXO set cannot fund the transaction even though the
    /// reported balance could (locked or fragmented outputs).
    #[error("spendable UTXOs cover {available}, transaction requires {required}")]
    InsufficientUtxos {
        /// Value spendable from the fetched UTXO set.
        available: u64,
        /// Amount plus fee the transaction must fund.
        required: u64,
    },
}

// ---------------------------------------------------------------------------
// Submission & stuck transfers
// ---------------------------------------------------------------------------

/// The network rejected or dropped a submitted transaction.
#[derive(Debug, Error)]
#[error("transaction {tx_id} on {chain} chain {verdict}: {reason}")]
pub struct SubmissionError {
    /// The rejected transaction.
    pub tx_id: TxId,
    /// The chain that rejected it.
    pub chain: Chain,
    /// "rejected" or "dropped".
    pub verdict: &'static str,
    /// The rejecting reason as reported by the network.
    pub reason: String,
}

/// The export leg is confirmed but the import leg did not complete.
///
/// Value sits in inter-chain transit on the destination side. It is not
/// lost: resubmit only the import leg via
/// [`crate::transfer::Orchestrator::resume_import`] with the carried
/// export transaction ID.
#[derive(Debug)]
pub struct StuckTransferError {
    /// The confirmed export transaction.
    pub export_tx_id: TxId,
    /// The source chain the export landed on.
    pub source: Chain,
    /// Why the import leg did not complete.
    pub cause: String,
}

// Manual impls rather than `#[derive(Error)]`: thiserror would treat the
// `source` field as an error source, but `Chain` is not an error type.
impl std::fmt::Display for StuckTransferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "transfer stuck after export {} confirmed on {} chain: {}; \
             resume the import leg to complete",
            self.export_tx_id, self.source, self.cause
        )
    }
}

impl std::error::Error for StuckTransferError {}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Failure talking to the Chain RPC collaborator.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The transport failed before a response was produced.
    #[error("rpc transport error: {0}")]
    Transport(String),

    /// The node answered with a method-level error.
    #[error("rpc method '{method}' failed: {message}")]
    Method {
        /// The RPC method that failed.
        method: String,
        /// The error message from the node.
        message: String,
    },
}

/// Failure obtaining a signature from the Signer collaborator.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The signer refused to sign the message.
    #[error("signer refused: {0}")]
    Refused(String),

    /// The signer is unreachable or not initialized.
    #[error("signer unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// Umbrella
// ---------------------------------------------------------------------------

/// Top-level error for client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Wire decode failure.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Identifier or address failure.
    #[error(transparent)]
    Id(#[from] IdError),

    /// Local precondition failure, safe to fix and retry.
    #[error(transparent)]
    Preflight(#[from] PreflightError),

    /// Network rejected a transaction.
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// Export confirmed, import incomplete; resumable.
    #[error(transparent)]
    StuckTransfer(#[from] StuckTransferError),

    /// Chain RPC transport failure.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// Signer failure.
    #[error(transparent)]
    Signer(#[from] SignerError),
}

impl ClientError {
    /// Returns `true` if the error is safe to retry after adjusting local
    /// input, with no network state to reconcile first.
    pub fn is_locally_recoverable(&self) -> bool {
        matches!(self, Self::Preflight(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
