//! UTXOs and paginated retrieval.
//!
//! The node serves a chain's UTXO set for an address in pages. A page
//! returning a full [`UTXO_PAGE_LIMIT`] elements means "possibly more";
//! anything shorter ends the walk. Accumulation stops at [`UTXO_FETCH_CAP`]
//! total — past that the partial set is returned with a warning, since a
//! set that large cannot be spent in one transaction anyway. The result is
//! a best-effort, non-deduplicated snapshot.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec::Wire;
use crate::config::{Chain, CODEC_VERSION, UTXO_FETCH_CAP, UTXO_PAGE_LIMIT};
use crate::error::{CodecError, RpcError};
use crate::ids::{Address, TxId};
use crate::rpc::ChainRpc;
use crate::tx::TransferableOutput;

// ---------------------------------------------------------------------------
// Utxo
// ---------------------------------------------------------------------------

/// One unspent output: the transaction that created it, its index within
/// that transaction, and the output itself.
///
/// Wire layout: codec version (`u16`), tx id, output index, then the
/// transferable output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    pub tx_id: TxId,
    pub output_index: u32,
    pub output: TransferableOutput,
}

impl Utxo {
    /// The value this UTXO holds.
    pub fn amount(&self) -> u64 {
        self.output.amount()
    }

    /// Whether the output can be spent by a plain transfer at `timestamp`.
    /// Stake-locked outputs and time-locked owners are not spendable until
    /// their horizons pass.
    pub fn is_spendable_at(&self, timestamp: u64) -> bool {
        self.output.output.stakeable_locktime() <= timestamp
            && self.output.output.owners().locktime <= timestamp
    }
}

impl Wire for Utxo {
    fn write(&self, out: &mut Vec<u8>) {
        CODEC_VERSION.write(out);
        self.tx_id.write(out);
        self.output_index.write(out);
        self.output.write(out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (version, rest) = u16::read(input)?;
        if version != CODEC_VERSION {
            return Err(CodecError::UnsupportedCodecVersion { version });
        }
        let (tx_id, rest) = TxId::read(rest)?;
        let (output_index, rest) = u32::read(rest)?;
        let (output, rest) = TransferableOutput::read(rest)?;
        Ok((
            Self {
                tx_id,
                output_index,
                output,
            },
            rest,
        ))
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Resume point for the next page, as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoCursor {
    /// Address the cursor belongs to.
    pub address: String,
    /// Identifier of the last UTXO the previous page covered.
    pub utxo: String,
}

/// One page of a UTXO walk.
#[derive(Debug, Clone)]
pub struct UtxoPage {
    pub utxos: Vec<Utxo>,
    /// Where the next request should resume. `None` only when the node
    /// cannot page further.
    pub end_index: Option<UtxoCursor>,
}

impl UtxoPage {
    /// A full page means the node may be holding more.
    pub fn possibly_more(&self) -> bool {
        self.utxos.len() >= UTXO_PAGE_LIMIT
    }
}

/// Walks every page of `address`'s UTXO set on `chain`.
///
/// Stops when a short page arrives, when the node stops returning a cursor,
/// or when [`UTXO_FETCH_CAP`] total UTXOs have accumulated. In the capped
/// case the set is truncated to the cap and a warning is emitted; callers
/// get a usable prefix of the set, not an error.
pub async fn fetch_all_utxos<R: ChainRpc + ?Sized>(
    rpc: &R,
    chain: Chain,
    address: &Address,
) -> Result<Vec<Utxo>, RpcError> {
    let mut collected: Vec<Utxo> = Vec::new();
    let mut cursor: Option<UtxoCursor> = None;

    loop {
        let page = rpc.get_utxos(chain, address, cursor.take()).await?;
        let fetched = page.utxos.len();
        collected.extend(page.utxos);
        debug!(chain = %chain, fetched, total = collected.len(), "utxo page");

        if collected.len() >= UTXO_FETCH_CAP {
            collected.truncate(UTXO_FETCH_CAP);
            warn!(
                chain = %chain,
                address = %address,
                cap = UTXO_FETCH_CAP,
                "utxo set exceeds fetch cap, returning partial set"
            );
            break;
        }
        if fetched < UTXO_PAGE_LIMIT {
            break;
        }
        match page.end_index {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(collected)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
