//! Wire codec round-trip properties over generated transactions.
//!
//! Every variant must satisfy `decode(encode(x)) == x` and re-encode to the
//! exact original bytes, across randomized samples that cover zero-length
//! arrays, populated arrays, and the memo length cap. Generation is seeded,
//! so failures reproduce.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use prism_client::codec::Wire;
use prism_client::config::{MEMO_MAX_LENGTH, SIGNATURE_LENGTH};
use prism_client::ids::{AssetId, ChainId, NodeId, SubnetId, TxId};
use prism_client::tx::transferable::{
    Input, Output, OutputOwners, StakeableLockIn, StakeableLockOut, TransferInput, TransferOutput,
    TransferableInput, TransferableOutput,
};
use prism_client::tx::{
    AddValidatorTx, BaseTx, Credential, ExportTx, ImportTx, RemoveL1ValidatorTx, Signature,
    SignedTx, Transaction, Validator,
};

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn bytes32(rng: &mut StdRng) -> [u8; 32] {
    let mut b = [0u8; 32];
    rng.fill(&mut b);
    b
}

fn bytes20(rng: &mut StdRng) -> [u8; 20] {
    let mut b = [0u8; 20];
    rng.fill(&mut b);
    b
}

fn gen_owners(rng: &mut StdRng, addresses: usize) -> OutputOwners {
    OutputOwners {
        locktime: rng.gen(),
        threshold: rng.gen_range(0..=addresses as u32),
        addresses: (0..addresses).map(|_| bytes20(rng)).collect(),
    }
}

fn gen_output(rng: &mut StdRng) -> Output {
    let inner = TransferOutput {
        amount: rng.gen(),
        owners: {
            let n = rng.gen_range(0..4);
            gen_owners(rng, n)
        },
    };
    if rng.gen_bool(0.3) {
        Output::StakeableLock(StakeableLockOut {
            locktime: rng.gen(),
            output: inner,
        })
    } else {
        Output::Transfer(inner)
    }
}

fn gen_input(rng: &mut StdRng) -> Input {
    let inner = TransferInput {
        amount: rng.gen(),
        signature_indices: (0..rng.gen_range(0..4)).map(|_| rng.gen()).collect(),
    };
    if rng.gen_bool(0.3) {
        Input::StakeableLock(StakeableLockIn {
            locktime: rng.gen(),
            input: inner,
        })
    } else {
        Input::Transfer(inner)
    }
}

fn gen_transferable_output(rng: &mut StdRng) -> TransferableOutput {
    TransferableOutput {
        asset_id: AssetId::new(bytes32(rng)),
        output: gen_output(rng),
    }
}

fn gen_transferable_input(rng: &mut StdRng) -> TransferableInput {
    TransferableInput {
        tx_id: TxId::new(bytes32(rng)),
        utxo_index: rng.gen(),
        asset_id: AssetId::new(bytes32(rng)),
        input: gen_input(rng),
    }
}

fn gen_base(rng: &mut StdRng, outputs: usize, inputs: usize, memo_len: usize) -> BaseTx {
    BaseTx {
        network_id: rng.gen(),
        blockchain_id: ChainId::new(bytes32(rng)),
        outputs: (0..outputs).map(|_| gen_transferable_output(rng)).collect(),
        inputs: (0..inputs).map(|_| gen_transferable_input(rng)).collect(),
        memo: (0..memo_len).map(|_| rng.gen()).collect(),
    }
}

/// A base tx with randomized shape: empty through moderately populated.
fn gen_base_shaped(rng: &mut StdRng) -> BaseTx {
    let outputs = rng.gen_range(0..5);
    let inputs = rng.gen_range(0..5);
    let memo = rng.gen_range(0..32);
    gen_base(rng, outputs, inputs, memo)
}

fn gen_transaction(rng: &mut StdRng) -> Transaction {
    match rng.gen_range(0..5) {
        0 => Transaction::Base(gen_base_shaped(rng)),
        1 => Transaction::Export(ExportTx {
            base: gen_base_shaped(rng),
            destination_chain: ChainId::new(bytes32(rng)),
            exported_outputs: (0..rng.gen_range(0..4))
                .map(|_| gen_transferable_output(rng))
                .collect(),
        }),
        2 => Transaction::Import(ImportTx {
            base: gen_base_shaped(rng),
            source_chain: ChainId::new(bytes32(rng)),
            imported_inputs: (0..rng.gen_range(0..4))
                .map(|_| gen_transferable_input(rng))
                .collect(),
        }),
        3 => Transaction::AddValidator(AddValidatorTx {
            base: gen_base_shaped(rng),
            validator: Validator {
                node_id: NodeId::new(bytes20(rng)),
                start_time: rng.gen(),
                end_time: rng.gen(),
                weight: rng.gen(),
            },
            stake: (0..rng.gen_range(0..3))
                .map(|_| gen_transferable_output(rng))
                .collect(),
            rewards_owner: {
                let n = rng.gen_range(0..3);
                gen_owners(rng, n)
            },
            shares: rng.gen(),
        }),
        _ => Transaction::RemoveL1Validator(RemoveL1ValidatorTx {
            base: gen_base_shaped(rng),
            node_id: NodeId::new(bytes20(rng)),
            subnet_id: SubnetId::new(bytes32(rng)),
            auth_indices: (0..rng.gen_range(0..4)).map(|_| rng.gen()).collect(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn every_variant_roundtrips_byte_exact() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for _ in 0..200 {
        let tx = gen_transaction(&mut rng);
        let bytes = tx.to_bytes();
        let decoded = Transaction::from_bytes(&bytes)
            .unwrap_or_else(|e| panic!("decode failed: {e} for {tx:?}"));
        assert_eq!(decoded, tx);
        assert_eq!(decoded.to_bytes(), bytes, "re-encode diverged for {tx:?}");
    }
}

#[test]
fn empty_and_capped_shapes_roundtrip() {
    let mut rng = StdRng::seed_from_u64(7);

    // All arrays empty, no memo.
    let empty = gen_base(&mut rng, 0, 0, 0);
    assert_eq!(BaseTx::from_bytes(&empty.to_bytes()), Ok(empty));

    // Memo at the network cap, arrays well populated.
    let full = gen_base(&mut rng, 64, 64, MEMO_MAX_LENGTH);
    assert_eq!(BaseTx::from_bytes(&full.to_bytes()), Ok(full));
}

#[test]
fn truncating_the_last_field_fails_the_decode() {
    let mut rng = StdRng::seed_from_u64(11);
    let tx = gen_transaction(&mut rng);
    let bytes = tx.to_bytes();
    for cut in 1..=4usize.min(bytes.len()) {
        assert!(
            Transaction::from_bytes(&bytes[..bytes.len() - cut]).is_err(),
            "truncation by {cut} went unnoticed"
        );
    }
}

#[test]
fn signed_envelope_boundary_is_exact() {
    let mut rng = StdRng::seed_from_u64(23);
    // Shape with a known input count so credentials pair positionally.
    let base = gen_base(&mut rng, 2, 3, 4);
    let input_count = base.inputs.len();
    let tx = Transaction::Base(base);
    let signed = SignedTx::new(
        tx,
        (0..input_count)
            .map(|_| Credential {
                signatures: vec![Signature([0x5A; SIGNATURE_LENGTH])],
            })
            .collect(),
    )
    .unwrap();

    let bytes = signed.to_bytes();
    let decoded = SignedTx::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, signed);

    // The body's re-encoding must occupy exactly the bytes between the
    // version prefix and the credential array.
    let body = decoded.tx.to_bytes();
    assert_eq!(&bytes[2..2 + body.len()], &body[..]);
    let mut creds = Vec::new();
    prism_client::codec::write_array(&decoded.credentials, &mut creds);
    assert_eq!(&bytes[2 + body.len()..], &creds[..]);
}
