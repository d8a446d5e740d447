//! Swap intent types for the Aristoswap engine.
//!
//! This module defines the value objects a trader constructs off-chain: the
//! intent describing the basket they give away, and the signed input package
//! that binds it to the exact counter-party terms they consented to.

use alloy_primitives::{aliases::U96, Address, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of asset at one index of a swap basket.
///
/// The discriminant is the `uint8` value used in the typed hash, so the
/// numbering is part of the wire format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum AssetKind {
	/// Unique asset: one id, one owner (ERC721-like).
	Erc721 = 0,
	/// Semi-fungible asset: id plus quantity, fungible within an id (ERC1155-like).
	Erc1155 = 1,
}

impl AssetKind {
	/// Returns the `uint8` encoding used in the typed hash.
	pub fn as_u8(self) -> u8 {
		self as u8
	}
}

/// Errors raised when an intent violates its own structural invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntentError {
	/// The three parallel asset arrays have different lengths.
	#[error("parallel asset arrays have mismatched lengths: {collections} collections, {token_ids} token ids, {asset_types} asset types")]
	LengthMismatch {
		collections: usize,
		token_ids: usize,
		asset_types: usize,
	},
	/// The intent offers nothing: no assets and a zero balancing amount.
	#[error("intent offers no assets and no balancing amount")]
	EmptyOffer,
	/// The same unique asset appears twice in one basket.
	#[error("unique asset listed twice: collection {collection}, id {token_id}")]
	DuplicateUniqueAsset {
		collection: Address,
		token_id: U256,
	},
}

/// One trader's offer: the basket of assets they give away plus an optional
/// fungible balancing amount they pay.
///
/// The three asset fields are parallel arrays; index `i` across them
/// describes one atomic asset unit. The typed hash commits to the arrays in
/// their given order, so a permuted basket is a different intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapIntent {
	/// Address authorizing the intent; owner of the offered assets.
	pub trader: Address,
	/// Fungible balancing amount this trader pays. Zero means this side
	/// pays nothing.
	pub amount: U96,
	/// Collection address for each asset unit.
	pub collections: Vec<Address>,
	/// Token id for each asset unit.
	pub token_ids: Vec<U256>,
	/// Asset kind for each asset unit.
	pub asset_types: Vec<AssetKind>,
}

impl SwapIntent {
	/// Checks the structural invariants of this intent.
	///
	/// An intent is well-formed when the parallel arrays agree in length,
	/// the basket is non-empty unless the balancing amount is nonzero
	/// (a pure cash offer), and no unique asset is listed twice.
	pub fn validate(&self) -> Result<(), IntentError> {
		if self.collections.len() != self.token_ids.len()
			|| self.collections.len() != self.asset_types.len()
		{
			return Err(IntentError::LengthMismatch {
				collections: self.collections.len(),
				token_ids: self.token_ids.len(),
				asset_types: self.asset_types.len(),
			});
		}
		if self.collections.is_empty() && self.amount.is_zero() {
			return Err(IntentError::EmptyOffer);
		}
		// A unique asset cannot move twice out of the same basket.
		for i in 0..self.collections.len() {
			if self.asset_types[i] != AssetKind::Erc721 {
				continue;
			}
			for j in 0..i {
				if self.asset_types[j] == AssetKind::Erc721
					&& self.collections[j] == self.collections[i]
					&& self.token_ids[j] == self.token_ids[i]
				{
					return Err(IntentError::DuplicateUniqueAsset {
						collection: self.collections[i],
						token_id: self.token_ids[i],
					});
				}
			}
		}
		Ok(())
	}

	/// Number of asset units in the basket.
	pub fn asset_count(&self) -> usize {
		self.collections.len()
	}
}

/// A compact `(v, r, s)` signature triple as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapSignature {
	pub v: u8,
	pub r: B256,
	pub s: B256,
}

impl SwapSignature {
	/// The all-zero signature used by a trader submitting their own offer.
	pub const ZERO: Self = Self {
		v: 0,
		r: B256::ZERO,
		s: B256::ZERO,
	};

	/// Whether every field is zero.
	pub fn is_zero(&self) -> bool {
		self.v == 0 && self.r.is_zero() && self.s.is_zero()
	}
}

/// An intent plus its authorization.
///
/// `offer` is the signer's own intent; `counter_offer` is the exact intent
/// the signer expects from the other party. At match time each side's
/// `counter_offer` must equal the other side's `offer` field-by-field,
/// scoping consent to specific terms rather than "any swap".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInput {
	/// The signer's own intent.
	pub offer: SwapIntent,
	/// The counter-party intent the signer consented to receive.
	pub counter_offer: SwapIntent,
	/// Recovery byte of the signature (27 or 28; 0 on the direct path).
	pub v: u8,
	/// First signature scalar.
	pub r: B256,
	/// Second signature scalar.
	pub s: B256,
}

impl SignedInput {
	/// Packages an offer with a signature produced off-chain.
	pub fn signed(offer: SwapIntent, counter_offer: SwapIntent, signature: SwapSignature) -> Self {
		Self {
			offer,
			counter_offer,
			v: signature.v,
			r: signature.r,
			s: signature.s,
		}
	}

	/// Packages an offer with the zero signature, for a trader submitting
	/// their own side of the swap.
	pub fn unsigned(offer: SwapIntent, counter_offer: SwapIntent) -> Self {
		Self::signed(offer, counter_offer, SwapSignature::ZERO)
	}

	/// The signature triple of this input.
	pub fn signature(&self) -> SwapSignature {
		SwapSignature {
			v: self.v,
			r: self.r,
			s: self.s,
		}
	}
}

/// Summary of an executed swap, returned by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapReceipt {
	/// Maker-side trader.
	pub maker: Address,
	/// Taker-side trader.
	pub taker: Address,
	/// Digest the maker authorized (under the consumed nonce).
	pub maker_digest: B256,
	/// Digest the taker authorized (under the consumed nonce).
	pub taker_digest: B256,
	/// Total asset units moved across both baskets.
	pub asset_count: usize,
	/// Net balancing payment, if any.
	pub payment: Option<crate::plan::BalancingPayment>,
	/// Referrer payout carved out of the balancing amount, if any.
	pub referral: Option<crate::plan::BalancingPayment>,
}
