//! Unsigned transaction construction.
//!
//! Pure functions from a UTXO snapshot and a fee to an unsigned transaction.
//! Selection is greedy over spendable UTXOs; whatever the selection covers
//! beyond the requirement comes back to the sender as a plain change output
//! with threshold 1 and zero locktime. Fees are an input here, not a
//! computation: the orchestrator prices a draft, then rebuilds with the
//! actual fee.

use crate::config::Chain;
use crate::error::PreflightError;
use crate::ids::{Address, AssetId, TxId};
use crate::tx::transferable::{Input, TransferInput, TransferableInput, TransferableOutput};
use crate::tx::{BaseTx, ExportTx, ImportTx, Transaction};
use crate::utxo::Utxo;

/// Greedily selects spendable UTXOs until `required` is covered.
///
/// Inputs spend with signature index 0; the selection only considers
/// single-owner outputs this client's addresses control. Returns the
/// selected inputs and their total value.
pub fn select_inputs(
    utxos: &[Utxo],
    required: u64,
    now: u64,
) -> Result<(Vec<TransferableInput>, u64), PreflightError> {
    let mut selected = Vec::new();
    let mut total: u64 = 0;

    for utxo in utxos {
        if total >= required {
            break;
        }
        if !utxo.is_spendable_at(now) {
            continue;
        }
        total = total.saturating_add(utxo.amount());
        selected.push(TransferableInput {
            tx_id: utxo.tx_id,
            utxo_index: utxo.output_index,
            asset_id: utxo.output.asset_id,
            input: Input::Transfer(TransferInput {
                amount: utxo.amount(),
                signature_indices: vec![0],
            }),
        });
    }

    if total < required {
        return Err(PreflightError::InsufficientUtxos {
            available: total,
            required,
        });
    }
    Ok((selected, total))
}

/// Appends a change output returning `total - spent` to the sender, unless
/// the remainder is zero.
fn with_change(
    mut outputs: Vec<TransferableOutput>,
    asset_id: &AssetId,
    total: u64,
    spent: u64,
    sender: &Address,
) -> Vec<TransferableOutput> {
    let change = total - spent;
    if change > 0 {
        outputs.push(TransferableOutput::simple(
            *asset_id,
            change,
            sender.payload(),
        ));
    }
    outputs
}

/// Builds an unsigned export moving `exported_amount` into the destination
/// chain's atomic memory, owned by the recipient. Consumes `exported_amount
/// + fee` from the sender's UTXOs; change returns to the sender.
#[allow(clippy::too_many_arguments)]
pub fn build_export(
    network_id: u32,
    source: Chain,
    destination: Chain,
    asset_id: &AssetId,
    utxos: &[Utxo],
    exported_amount: u64,
    fee: u64,
    sender: &Address,
    recipient: &Address,
    memo: &[u8],
    now: u64,
) -> Result<Transaction, PreflightError> {
    let required = exported_amount.saturating_add(fee);
    let (inputs, total) = select_inputs(utxos, required, now)?;

    let mut base = BaseTx::new(network_id, source.id(network_id));
    base.inputs = inputs;
    base.outputs = with_change(Vec::new(), asset_id, total, required, sender);
    base.memo = memo.to_vec();

    Ok(Transaction::Export(ExportTx {
        base,
        destination_chain: destination.id(network_id),
        exported_outputs: vec![TransferableOutput::simple(
            *asset_id,
            exported_amount,
            recipient.payload(),
        )],
    }))
}

/// Builds an unsigned import claiming the first exported output of
/// `export_tx_id` from atomic memory. The fee comes out of the claimed
/// value; the remainder goes to the recipient.
pub fn build_import(
    network_id: u32,
    source: Chain,
    destination: Chain,
    asset_id: &AssetId,
    export_tx_id: &TxId,
    exported_amount: u64,
    fee: u64,
    recipient: &Address,
) -> Result<Transaction, PreflightError> {
    let delivered = exported_amount
        .checked_sub(fee)
        .filter(|d| *d > 0)
        .ok_or(PreflightError::FeeExceedsAmount {
            amount: exported_amount,
            combined_fee: fee,
        })?;

    let mut base = BaseTx::new(network_id, destination.id(network_id));
    base.outputs = vec![TransferableOutput::simple(
        *asset_id,
        delivered,
        recipient.payload(),
    )];

    Ok(Transaction::Import(ImportTx {
        base,
        source_chain: source.id(network_id),
        imported_inputs: vec![TransferableInput {
            tx_id: *export_tx_id,
            utxo_index: 0,
            asset_id: *asset_id,
            input: Input::Transfer(TransferInput {
                amount: exported_amount,
                signature_indices: vec![0],
            }),
        }],
    }))
}

/// Builds an unsigned same-chain transfer: one native transaction, no
/// atomic legs.
#[allow(clippy::too_many_arguments)]
pub fn build_native(
    network_id: u32,
    chain: Chain,
    asset_id: &AssetId,
    utxos: &[Utxo],
    amount: u64,
    fee: u64,
    sender: &Address,
    recipient: &Address,
    memo: &[u8],
    now: u64,
) -> Result<Transaction, PreflightError> {
    let required = amount.saturating_add(fee);
    let (inputs, total) = select_inputs(utxos, required, now)?;

    let mut base = BaseTx::new(network_id, chain.id(network_id));
    base.inputs = inputs;
    base.outputs = with_change(
        vec![TransferableOutput::simple(
            *asset_id,
            amount,
            recipient.payload(),
        )],
        asset_id,
        total,
        required,
        sender,
    );
    base.memo = memo.to_vec();

    Ok(Transaction::Base(base))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{base_asset_id, NETWORK_ID_TESTNET};

    fn utxo(tx_byte: u8, amount: u64) -> Utxo {
        Utxo {
            tx_id: TxId::new([tx_byte; 32]),
            output_index: 0,
            output: TransferableOutput::simple(
                base_asset_id(NETWORK_ID_TESTNET),
                amount,
                [1; 20],
            ),
        }
    }

    fn addr(chain: Chain, byte: u8) -> Address {
        Address::new(chain, NETWORK_ID_TESTNET, [byte; 20])
    }

    #[test]
    fn selection_is_greedy_and_stops_when_covered() {
        let utxos = vec![utxo(1, 100), utxo(2, 200), utxo(3, 300)];
        let (inputs, total) = select_inputs(&utxos, 250, 0).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(total, 300);
    }

    #[test]
    fn selection_skips_locked_outputs() {
        let mut locked = utxo(1, 1000);
        if let crate::tx::transferable::Output::Transfer(ref mut out) = locked.output.output {
            out.owners.locktime = u64::MAX;
        }
        let utxos = vec![locked, utxo(2, 500)];
        let (inputs, total) = select_inputs(&utxos, 400, 0).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(total, 500);
    }

    #[test]
    fn insufficient_utxos_reports_both_sides() {
        let utxos = vec![utxo(1, 100)];
        assert_eq!(
            select_inputs(&utxos, 500, 0),
            Err(PreflightError::InsufficientUtxos {
                available: 100,
                required: 500
            })
        );
    }

    #[test]
    fn export_returns_change_to_sender() {
        let asset = base_asset_id(NETWORK_ID_TESTNET);
        let sender = addr(Chain::Asset, 1);
        let recipient = addr(Chain::Staking, 2);
        let tx = build_export(
            NETWORK_ID_TESTNET,
            Chain::Asset,
            Chain::Staking,
            &asset,
            &[utxo(1, 1000)],
            300,
            50,
            &sender,
            &recipient,
            b"",
            0,
        )
        .unwrap();

        let Transaction::Export(export) = &tx else {
            panic!("expected export");
        };
        assert_eq!(export.exported_outputs[0].amount(), 300);
        // change: 1000 - 300 - 50
        assert_eq!(export.base.outputs.len(), 1);
        assert_eq!(export.base.outputs[0].amount(), 650);
    }

    #[test]
    fn exact_spend_emits_no_change_output() {
        let asset = base_asset_id(NETWORK_ID_TESTNET);
        let sender = addr(Chain::Asset, 1);
        let recipient = addr(Chain::Staking, 2);
        let tx = build_export(
            NETWORK_ID_TESTNET,
            Chain::Asset,
            Chain::Staking,
            &asset,
            &[utxo(1, 350)],
            300,
            50,
            &sender,
            &recipient,
            b"",
            0,
        )
        .unwrap();

        let Transaction::Export(export) = &tx else {
            panic!("expected export");
        };
        assert!(export.base.outputs.is_empty());
    }

    #[test]
    fn import_fee_comes_out_of_claimed_value() {
        let asset = base_asset_id(NETWORK_ID_TESTNET);
        let recipient = addr(Chain::Staking, 2);
        let tx = build_import(
            NETWORK_ID_TESTNET,
            Chain::Asset,
            Chain::Staking,
            &asset,
            &TxId::new([9; 32]),
            300,
            20,
            &recipient,
        )
        .unwrap();

        let Transaction::Import(import) = &tx else {
            panic!("expected import");
        };
        assert_eq!(import.base.outputs[0].amount(), 280);
        assert_eq!(import.imported_inputs[0].amount(), 300);
        assert_eq!(import.imported_inputs[0].utxo_index, 0);
    }

    #[test]
    fn import_rejects_fee_consuming_everything() {
        let asset = base_asset_id(NETWORK_ID_TESTNET);
        let recipient = addr(Chain::Staking, 2);
        assert!(matches!(
            build_import(
                NETWORK_ID_TESTNET,
                Chain::Asset,
                Chain::Staking,
                &asset,
                &TxId::new([9; 32]),
                300,
                300,
                &recipient,
            ),
            Err(PreflightError::FeeExceedsAmount { .. })
        ));
    }

    #[test]
    fn native_transfer_pays_recipient_then_change() {
        let asset = base_asset_id(NETWORK_ID_TESTNET);
        let sender = addr(Chain::Asset, 1);
        let recipient = addr(Chain::Asset, 2);
        let tx = build_native(
            NETWORK_ID_TESTNET,
            Chain::Asset,
            &asset,
            &[utxo(1, 1000)],
            400,
            10,
            &sender,
            &recipient,
            b"memo",
            0,
        )
        .unwrap();

        let Transaction::Base(base) = &tx else {
            panic!("expected base");
        };
        assert_eq!(base.outputs[0].amount(), 400);
        assert_eq!(base.outputs[1].amount(), 590);
        assert_eq!(base.memo, b"memo");
    }
}
