//! Local private-key signer implementation.
//!
//! Wraps an in-memory secp256k1 key. Intended for tests, development
//! relayers and tooling; production relayers would plug in a remote or
//! hardware-backed implementation of the same trait.

use crate::{AccountError, SignerInterface};
use alloy_primitives::{Address, B256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use swap_types::SwapSignature;

/// Signer holding a local private key.
pub struct LocalSigner {
	inner: PrivateKeySigner,
}

impl LocalSigner {
	/// Creates a signer from a hex-encoded private key, with or without
	/// a `0x` prefix.
	pub fn from_hex_key(key: &str) -> Result<Self, AccountError> {
		let inner: PrivateKeySigner = key
			.trim_start_matches("0x")
			.parse()
			.map_err(|e| AccountError::InvalidKey(format!("{}", e)))?;
		Ok(Self { inner })
	}

	/// Creates a signer from a random key. Useful in tests that only need
	/// a distinct identity.
	pub fn random() -> Self {
		Self {
			inner: PrivateKeySigner::random(),
		}
	}
}

#[async_trait]
impl SignerInterface for LocalSigner {
	fn address(&self) -> Address {
		self.inner.address()
	}

	async fn sign_digest(&self, digest: B256) -> Result<SwapSignature, AccountError> {
		let signature = self
			.inner
			.sign_hash(&digest)
			.await
			.map_err(|e| AccountError::SigningFailed(format!("{}", e)))?;

		// Wire form uses the pre-EIP-155 recovery byte.
		Ok(SwapSignature {
			v: 27 + signature.v() as u8,
			r: B256::from(signature.r().to_be_bytes::<32>()),
			s: B256::from(signature.s().to_be_bytes::<32>()),
		})
	}
}
