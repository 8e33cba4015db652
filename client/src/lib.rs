// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Prism Client — Core Library
//!
//! The client side of the Prism network: everything needed to encode,
//! sign, and move value across Prism's three chains without running a node.
//!
//! Prism splits its ledger into an asset chain (A), a staking chain (S),
//! and a contract chain (C). Value moves between them through a two-phase
//! export/import protocol — there is no transaction that spans two chains,
//! only two transactions that reference each other. This crate owns the
//! wire codec those transactions are written in and the orchestration that
//! keeps a two-leg transfer from losing money halfway.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of a
//! chain client:
//!
//! - **codec** — The deterministic wire format. Byte-for-byte or bust.
//! - **ids** — Checksummed identifiers and bech32 addresses.
//! - **tx** — The transaction model: variants, credentials, envelopes.
//! - **utxo** — UTXO values and paginated retrieval.
//! - **fee** — The four-dimension fee model. Always priced live.
//! - **rpc** / **signer** — The node and key-custody seams, as traits.
//! - **transfer** — The cross-chain orchestrator and its builders.
//! - **config** — Network constants and chain identities.
//!
//! ## Design Philosophy
//!
//! 1. The wire format is a consensus contract — field order is tested, not
//!    assumed.
//! 2. Preflight before mutation: a transfer that cannot succeed fails
//!    before anything is submitted.
//! 3. A confirmed export is never silently dropped. Stuck transfers are a
//!    first-class, resumable state.
//! 4. Key material never enters this crate.

pub mod codec;
pub mod config;
pub mod error;
pub mod fee;
pub mod ids;
pub mod rpc;
pub mod signer;
pub mod transfer;
pub mod tx;
pub mod utxo;

pub use error::ClientError;
pub use transfer::{Orchestrator, TransferOutcome, TransferRequest, TransferStage};
