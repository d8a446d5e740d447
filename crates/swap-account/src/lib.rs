//! Account management module for the Aristoswap engine.
//!
//! This module provides abstractions for the off-chain side of the
//! protocol: holding a trader's key and producing the `(v, r, s)`
//! authorization over a swap digest. Relayer tooling and the test-suite
//! use it to build signed input packages; the engine itself never signs.

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use swap_types::{swap_digest, SwapDomain, SwapIntent, SwapSignature};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
}

/// Trait defining the interface for swap signers.
///
/// A signer owns one key and authorizes digests with it. The engine treats
/// the produced triple as opaque wire data; whether it authorizes anything
/// is decided by the verifier at match time.
#[async_trait]
pub trait SignerInterface: Send + Sync {
	/// The address this signer's authorizations recover to.
	fn address(&self) -> Address;

	/// Signs an arbitrary 32-byte digest.
	async fn sign_digest(&self, digest: B256) -> Result<SwapSignature, AccountError>;

	/// Signs the digest of an intent under the given nonce and domain.
	///
	/// The intent's `trader` field is not required to match this signer's
	/// address; producing a signature the verifier will reject is a valid
	/// (and tested) use of this method.
	async fn sign_swap(
		&self,
		intent: &SwapIntent,
		nonce: U256,
		domain: &SwapDomain,
	) -> Result<SwapSignature, AccountError> {
		self.sign_digest(swap_digest(intent, nonce, domain)).await
	}
}
