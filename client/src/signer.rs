//! The signing seam.
//!
//! Key material never enters this crate. The orchestrator hands unsigned
//! transaction bytes to a [`Signer`] and gets back 65-byte recoverable
//! signatures; hardware wallets, remote signers, and test fixtures all fit
//! behind the same trait.

use async_trait::async_trait;

use crate::config::SIGNATURE_LENGTH;
use crate::error::SignerError;

/// Produces recoverable signatures over raw transaction bytes.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Signs `message` (the unsigned transaction encoding) and returns the
    /// 65-byte `r ‖ s ‖ v` signature.
    async fn sign(&self, message: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], SignerError>;
}
