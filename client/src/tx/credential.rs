//! Signatures, credentials, and the signed-transaction envelope.
//!
//! A [`Credential`] carries the signatures for one input, positionally: the
//! i-th credential authorizes the i-th input, and within a credential the
//! j-th signature fills the input's j-th signature slot. The [`SignedTx`]
//! envelope prefixes the codec version, then the transaction body, then the
//! credential array.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::codec::{read_array, write_array, Wire};
use crate::config::{CODEC_VERSION, SIGNATURE_LENGTH};
use crate::error::CodecError;
use crate::ids;
use crate::ids::TxId;
use crate::tx::Transaction;

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A 65-byte recoverable signature: `r ‖ s ‖ v`.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(pub [u8; SIGNATURE_LENGTH]);

impl Signature {
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(0x{})", hex::encode(&self.0[..8]))
    }
}

impl Wire for Signature {
    fn write(&self, out: &mut Vec<u8>) {
        self.0.write(out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (bytes, rest) = <[u8; SIGNATURE_LENGTH]>::read(input)?;
        Ok((Self(bytes), rest))
    }
}

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// The signatures authorizing one input, in the input's signature-index
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub signatures: Vec<Signature>,
}

impl Credential {
    pub const TYPE_TAG: u32 = 9;
}

impl Wire for Credential {
    fn write(&self, out: &mut Vec<u8>) {
        Self::TYPE_TAG.write(out);
        write_array(&self.signatures, out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (tag, rest) = u32::read(input)?;
        if tag != Self::TYPE_TAG {
            return Err(CodecError::TagMismatch {
                expected: Self::TYPE_TAG,
                got: tag,
            });
        }
        let (signatures, rest) = read_array(rest)?;
        Ok((Self { signatures }, rest))
    }
}

// ---------------------------------------------------------------------------
// SignedTx
// ---------------------------------------------------------------------------

/// A transaction plus its credentials, ready for submission.
///
/// Wire layout: codec version (`u16`), transaction body with its tag, then
/// the credential array. The credential list must pair positionally with the
/// transaction's inputs; [`SignedTx::new`] enforces the count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    pub tx: Transaction,
    pub credentials: Vec<Credential>,
}

impl SignedTx {
    /// Pairs a transaction with its credentials. The credential count must
    /// equal the input count; a mismatched envelope would be rejected by
    /// every node, so it is never constructed.
    pub fn new(tx: Transaction, credentials: Vec<Credential>) -> Result<Self, CodecError> {
        let inputs = tx.inputs().len();
        if credentials.len() != inputs {
            // Surfaced as a tag mismatch would be misleading; the closest
            // structural error is a trailing/missing element count.
            return Err(CodecError::TrailingBytes {
                count: credentials.len().abs_diff(inputs),
            });
        }
        Ok(Self { tx, credentials })
    }

    /// The transaction ID: SHA-256 over the full signed encoding.
    pub fn id(&self) -> TxId {
        let digest = Sha256::digest(self.to_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        TxId::new(bytes)
    }

    /// The submission payload: `0x`-prefixed hex of the signed encoding with
    /// its 4-byte checksum trailer, as the issue endpoint expects.
    pub fn submission_hex(&self) -> String {
        let bytes = self.to_bytes();
        let mut checksummed = bytes.clone();
        checksummed.extend_from_slice(&ids::checksum(&bytes));
        format!("0x{}", hex::encode(checksummed))
    }
}

impl Wire for SignedTx {
    fn write(&self, out: &mut Vec<u8>) {
        CODEC_VERSION.write(out);
        self.tx.write(out);
        write_array(&self.credentials, out);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (version, rest) = u16::read(input)?;
        if version != CODEC_VERSION {
            return Err(CodecError::UnsupportedCodecVersion { version });
        }
        let (tx, rest) = Transaction::read(rest)?;
        let (credentials, rest) = read_array(rest)?;
        Ok((Self { tx, credentials }, rest))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::base::test_fixtures::sample_base_tx;

    fn sample_signed() -> SignedTx {
        let tx = Transaction::Base(sample_base_tx());
        SignedTx::new(
            tx,
            vec![Credential {
                signatures: vec![Signature([0xAB; SIGNATURE_LENGTH])],
            }],
        )
        .unwrap()
    }

    #[test]
    fn envelope_layout() {
        let signed = sample_signed();
        let bytes = signed.to_bytes();

        // codec version, then the body's type tag
        assert_eq!(&bytes[0..2], &[0, 0]);
        assert_eq!(&bytes[2..6], &[0, 0, 0, 0]);

        assert_eq!(SignedTx::from_bytes(&bytes), Ok(signed));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut bytes = sample_signed().to_bytes();
        bytes[1] = 1;
        assert_eq!(
            SignedTx::from_bytes(&bytes).map(|_| ()),
            Err(CodecError::UnsupportedCodecVersion { version: 1 })
        );
    }

    #[test]
    fn credential_count_must_match_inputs() {
        let tx = Transaction::Base(sample_base_tx());
        assert!(SignedTx::new(tx, vec![]).is_err());
    }

    #[test]
    fn id_is_stable_and_signature_sensitive() {
        let signed = sample_signed();
        assert_eq!(signed.id(), signed.id());

        let mut other = signed.clone();
        other.credentials[0].signatures[0] = Signature([0xCD; SIGNATURE_LENGTH]);
        assert_ne!(signed.id(), other.id());
    }

    #[test]
    fn submission_hex_carries_checksum_trailer() {
        let signed = sample_signed();
        let hex_str = signed.submission_hex();
        assert!(hex_str.starts_with("0x"));

        let raw = hex::decode(&hex_str[2..]).unwrap();
        let bytes = signed.to_bytes();
        assert_eq!(&raw[..bytes.len()], &bytes[..]);
        assert_eq!(&raw[bytes.len()..], &ids::checksum(&bytes));
    }

    #[test]
    fn credential_golden_bytes() {
        let cred = Credential {
            signatures: vec![Signature([0x01; SIGNATURE_LENGTH])],
        };
        let bytes = cred.to_bytes();
        assert_eq!(&bytes[0..4], &[0, 0, 0, 9]);
        assert_eq!(&bytes[4..8], &[0, 0, 0, 1]);
        assert_eq!(bytes.len(), 8 + SIGNATURE_LENGTH);
    }
}
