//! # Cross-Chain Transfer Orchestrator
//!
//! Moves value between chains as two independent transactions: an export
//! that parks the value in the destination's atomic memory, then an import
//! that claims it. There is no commit spanning both chains — each leg is
//! final on its own chain, and the orchestrator's job is sequencing,
//! preflight, and never losing track of a confirmed export.
//!
//! ## Lifecycle
//!
//! ```text
//! Preparing → ExportBuilt → ExportSubmitted → ExportConfirmed
//!           → ImportBuilt → ImportSubmitted → ImportConfirmed
//! ```
//!
//! `Failed` is reachable from any non-terminal stage. Failure before the
//! export confirms moves nothing; the whole transfer is retryable. Failure
//! after leaves value in atomic memory — the transfer is stuck in
//! `ExportConfirmed` and [`Orchestrator::resume_import`] completes it. A
//! confirmed export is never silently dropped.
//!
//! Same-chain transfers bypass the protocol entirely with one native
//! transaction.
//!
//! Confirmation waits poll with backoff and no hard timeout; bounded waits
//! are the caller's concern, applied by cancelling the future.

pub mod builder;

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::codec::Wire;
use crate::config::{base_asset_id, Chain, MEMO_MAX_LENGTH};
use crate::error::{
    ClientError, CodecError, IdError, PreflightError, StuckTransferError, SubmissionError,
};
use crate::fee::{compute_fee, Dimensions, FeeState};
use crate::ids::{Address, TxId};
use crate::rpc::{ChainRpc, TxStatus};
use crate::signer::Signer;
use crate::tx::{Credential, Signature, SignedTx, Transaction};
use crate::utxo::fetch_all_utxos;

/// First wait between status polls.
const POLL_INITIAL: Duration = Duration::from_millis(500);
/// Polling backoff ceiling.
const POLL_CAP: Duration = Duration::from_secs(4);

// ---------------------------------------------------------------------------
// Request & outcome
// ---------------------------------------------------------------------------

/// What the caller wants moved, and where.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub source: Chain,
    pub destination: Chain,
    /// Amount to deliver, in the base asset's smallest denomination.
    pub amount: u64,
    /// Funding address; must live on the source chain.
    pub sender: Address,
    /// Delivery address; must live on the destination chain.
    pub recipient: Address,
    /// Optional memo attached to the funding leg.
    pub memo: Vec<u8>,
}

impl TransferRequest {
    fn validate(&self) -> Result<(), ClientError> {
        if self.sender.chain() != self.source {
            return Err(IdError::MalformedAddress(format!(
                "sender address is on the {} chain, transfer sources from {}",
                self.sender.chain(),
                self.source
            ))
            .into());
        }
        if self.recipient.chain() != self.destination {
            return Err(IdError::MalformedAddress(format!(
                "recipient address is on the {} chain, transfer delivers to {}",
                self.recipient.chain(),
                self.destination
            ))
            .into());
        }
        if self.memo.len() > MEMO_MAX_LENGTH {
            return Err(CodecError::MemoTooLong {
                len: self.memo.len(),
                max: MEMO_MAX_LENGTH,
            }
            .into());
        }
        Ok(())
    }
}

/// Where a transfer stands. Stages only move forward; `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferStage {
    Preparing,
    ExportBuilt,
    ExportSubmitted,
    ExportConfirmed,
    ImportBuilt,
    ImportSubmitted,
    ImportConfirmed,
    Failed,
}

impl fmt::Display for TransferStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Preparing => "preparing",
            Self::ExportBuilt => "export_built",
            Self::ExportSubmitted => "export_submitted",
            Self::ExportConfirmed => "export_confirmed",
            Self::ImportBuilt => "import_built",
            Self::ImportSubmitted => "import_submitted",
            Self::ImportConfirmed => "import_confirmed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A completed transfer's transaction identifiers, each independently
/// confirmable against its chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Two legs landed: the export on the source chain, the import on the
    /// destination chain.
    CrossChain { export_tx_id: TxId, import_tx_id: TxId },
    /// Source equalled destination; one native transaction moved the value.
    SameChain { tx_id: TxId },
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Drives transfers against one network through an RPC and a signer.
///
/// Holds no per-transfer state: every invocation is self-contained, so one
/// orchestrator can drive concurrent transfers safely.
pub struct Orchestrator<R, S> {
    rpc: R,
    signer: S,
    network_id: u32,
}

impl<R: ChainRpc, S: Signer> Orchestrator<R, S> {
    pub fn new(rpc: R, signer: S, network_id: u32) -> Self {
        Self {
            rpc,
            signer,
            network_id,
        }
    }

    /// Executes a transfer end to end.
    ///
    /// Preflight failures surface before any submission. A failure after
    /// the export confirms surfaces as [`StuckTransferError`] carrying the
    /// export ID; call [`resume_import`](Self::resume_import) to finish.
    pub async fn transfer(&self, request: TransferRequest) -> Result<TransferOutcome, ClientError> {
        request.validate()?;
        info!(
            stage = %TransferStage::Preparing,
            source = %request.source,
            destination = %request.destination,
            amount = request.amount,
            "transfer started"
        );

        if request.source == request.destination {
            let tx_id = self.same_chain_transfer(&request).await?;
            return Ok(TransferOutcome::SameChain { tx_id });
        }

        // Independent reads, joined before building.
        let (balance, source_fees, dest_fees, utxos) = futures::try_join!(
            self.rpc.get_balance(request.source, &request.sender),
            self.rpc.get_fee_state(request.source),
            self.rpc.get_fee_state(request.destination),
            fetch_all_utxos(&self.rpc, request.source, &request.sender),
        )?;

        if balance < request.amount {
            return Err(PreflightError::InsufficientBalance {
                balance,
                required: request.amount,
            }
            .into());
        }

        // Price both legs off zero-fee drafts. The import leg's fee rides
        // inside the exported amount, so the recipient receives exactly
        // the requested amount.
        let import_fee = {
            let draft = builder::build_import(
                self.network_id,
                request.source,
                request.destination,
                &base_asset_id(self.network_id),
                &TxId::new([0; 32]),
                request.amount,
                0,
                &request.recipient,
            )?;
            self.price(&draft, &dest_fees)
        };
        let exported_amount = request.amount.saturating_add(import_fee);
        let now = unix_now();

        let asset_id = base_asset_id(self.network_id);
        let export_fee = {
            let draft = builder::build_export(
                self.network_id,
                request.source,
                request.destination,
                &asset_id,
                &utxos,
                exported_amount,
                0,
                &request.sender,
                &request.recipient,
                &request.memo,
                now,
            )?;
            self.price(&draft, &source_fees)
        };

        let combined_fee = export_fee.saturating_add(import_fee);
        if request.amount <= combined_fee {
            return Err(PreflightError::FeeExceedsAmount {
                amount: request.amount,
                combined_fee,
            }
            .into());
        }

        let export = builder::build_export(
            self.network_id,
            request.source,
            request.destination,
            &asset_id,
            &utxos,
            exported_amount,
            export_fee,
            &request.sender,
            &request.recipient,
            &request.memo,
            now,
        )?;
        info!(stage = %TransferStage::ExportBuilt, export_fee, import_fee, "export leg built");

        let signed_export = self.sign_tx(export).await?;
        info!(stage = %TransferStage::ExportSubmitted, "export leg submitted");
        let export_tx_id = self.submit_and_wait(request.source, &signed_export).await?;
        info!(
            stage = %TransferStage::ExportConfirmed,
            export_tx_id = %export_tx_id,
            "export leg confirmed"
        );

        // Value is now in atomic memory. From here every failure is a
        // stuck transfer, never a plain error: the export cannot be undone.
        let import_tx_id = self
            .import_leg(&request, &export_tx_id, exported_amount, import_fee)
            .await
            .map_err(|err| {
                warn!(stage = %TransferStage::Failed, export_tx_id = %export_tx_id, "import leg failed");
                StuckTransferError {
                    export_tx_id,
                    source: request.source,
                    cause: err.to_string(),
                }
            })?;

        info!(
            stage = %TransferStage::ImportConfirmed,
            export_tx_id = %export_tx_id,
            import_tx_id = %import_tx_id,
            "transfer complete"
        );
        Ok(TransferOutcome::CrossChain {
            export_tx_id,
            import_tx_id,
        })
    }

    /// Completes a transfer stuck in `ExportConfirmed`.
    ///
    /// The stuck state is re-derived from the chain, not from local
    /// records: the export's acceptance is verified first, and only then
    /// is the import leg rebuilt and submitted. `exported_amount` is the
    /// value the export parked in atomic memory; the current import fee
    /// comes out of it.
    pub async fn resume_import(
        &self,
        source: Chain,
        destination: Chain,
        export_tx_id: TxId,
        exported_amount: u64,
        recipient: &Address,
    ) -> Result<TxId, ClientError> {
        if recipient.chain() != destination {
            return Err(IdError::MalformedAddress(format!(
                "recipient address is on the {} chain, import delivers to {}",
                recipient.chain(),
                destination
            ))
            .into());
        }

        let status = self
            .rpc
            .get_transaction_status(source, &export_tx_id)
            .await?;
        if status != TxStatus::Accepted {
            return Err(StuckTransferError {
                export_tx_id,
                source,
                cause: format!("export not accepted on chain, status {status:?}"),
            }
            .into());
        }
        info!(export_tx_id = %export_tx_id, "resuming import leg");

        let dest_fees = self.rpc.get_fee_state(destination).await?;
        let asset_id = base_asset_id(self.network_id);
        let draft = builder::build_import(
            self.network_id,
            source,
            destination,
            &asset_id,
            &export_tx_id,
            exported_amount,
            0,
            recipient,
        )?;
        let import_fee = self.price(&draft, &dest_fees);

        let request_shape = TransferRequest {
            source,
            destination,
            amount: exported_amount,
            sender: recipient.clone(),
            recipient: recipient.clone(),
            memo: Vec::new(),
        };
        self.import_leg(&request_shape, &export_tx_id, exported_amount, import_fee)
            .await
            .map_err(|err| {
                StuckTransferError {
                    export_tx_id,
                    source,
                    cause: err.to_string(),
                }
                .into()
            })
    }

    /// Builds, signs, submits, and confirms the import leg.
    async fn import_leg(
        &self,
        request: &TransferRequest,
        export_tx_id: &TxId,
        exported_amount: u64,
        import_fee: u64,
    ) -> Result<TxId, ClientError> {
        let import = builder::build_import(
            self.network_id,
            request.source,
            request.destination,
            &base_asset_id(self.network_id),
            export_tx_id,
            exported_amount,
            import_fee,
            &request.recipient,
        )?;
        info!(stage = %TransferStage::ImportBuilt, import_fee, "import leg built");

        let signed = self.sign_tx(import).await?;
        info!(stage = %TransferStage::ImportSubmitted, "import leg submitted");
        self.submit_and_wait(request.destination, &signed).await
    }

    /// One native transaction; no atomic legs, no stuck states.
    async fn same_chain_transfer(&self, request: &TransferRequest) -> Result<TxId, ClientError> {
        let (balance, fees, utxos) = futures::try_join!(
            self.rpc.get_balance(request.source, &request.sender),
            self.rpc.get_fee_state(request.source),
            fetch_all_utxos(&self.rpc, request.source, &request.sender),
        )?;

        if balance < request.amount {
            return Err(PreflightError::InsufficientBalance {
                balance,
                required: request.amount,
            }
            .into());
        }

        let asset_id = base_asset_id(self.network_id);
        let now = unix_now();
        let draft = builder::build_native(
            self.network_id,
            request.source,
            &asset_id,
            &utxos,
            request.amount,
            0,
            &request.sender,
            &request.recipient,
            &request.memo,
            now,
        )?;
        let fee = self.price(&draft, &fees);
        if request.amount <= fee {
            return Err(PreflightError::FeeExceedsAmount {
                amount: request.amount,
                combined_fee: fee,
            }
            .into());
        }

        let tx = builder::build_native(
            self.network_id,
            request.source,
            &asset_id,
            &utxos,
            request.amount,
            fee,
            &request.sender,
            &request.recipient,
            &request.memo,
            now,
        )?;
        let signed = self.sign_tx(tx).await?;
        let tx_id = self.submit_and_wait(request.source, &signed).await?;
        info!(tx_id = %tx_id, "same-chain transfer complete");
        Ok(tx_id)
    }

    /// Signs the transaction and assembles credentials positionally: one
    /// credential per input, one signature slot per signature index.
    async fn sign_tx(&self, tx: Transaction) -> Result<SignedTx, ClientError> {
        let message = tx.to_bytes();
        let signature = Signature(self.signer.sign(&message).await?);
        let credentials = tx
            .signature_indices()
            .iter()
            .map(|indices| Credential {
                signatures: indices.iter().map(|_| signature.clone()).collect(),
            })
            .collect();
        Ok(SignedTx::new(tx, credentials)?)
    }

    /// Submits and polls until the chain reports a final status.
    ///
    /// Backoff doubles from [`POLL_INITIAL`] to [`POLL_CAP`]; there is no
    /// hard timeout, cancellation is the caller's lever. An `Unknown`
    /// status keeps polling: nodes answer it transiently for transactions
    /// still propagating.
    async fn submit_and_wait(&self, chain: Chain, signed: &SignedTx) -> Result<TxId, ClientError> {
        let local_id = signed.id();
        let reported_id = self
            .rpc
            .submit_transaction(chain, &signed.submission_hex())
            .await?;
        if reported_id != local_id {
            warn!(
                local = %local_id,
                reported = %reported_id,
                "node-reported tx id differs from local computation"
            );
        }
        info!(tx_id = %local_id, chain = %chain, "transaction submitted");

        let mut backoff = POLL_INITIAL;
        loop {
            match self.rpc.get_transaction_status(chain, &local_id).await? {
                TxStatus::Accepted => return Ok(local_id),
                TxStatus::Dropped { reason } => {
                    return Err(SubmissionError {
                        tx_id: local_id,
                        chain,
                        verdict: "dropped",
                        reason,
                    }
                    .into());
                }
                status => {
                    debug!(tx_id = %local_id, ?status, backoff_ms = backoff.as_millis() as u64, "awaiting acceptance");
                    sleep(backoff).await;
                    backoff = (backoff * 2).min(POLL_CAP);
                }
            }
        }
    }

    fn price(&self, tx: &Transaction, fees: &FeeState) -> u64 {
        compute_fee(Dimensions::of_transaction(tx), fees)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
