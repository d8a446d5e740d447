//! Transfer plan types.
//!
//! The matcher reduces a pair of mutually-consistent intents to a flat list
//! of asset movements plus an optional balancing payment; the orchestrator
//! executes that plan against the token collaborators.

use crate::swap::AssetKind;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// One planned asset movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTransfer {
	/// Collection the asset belongs to.
	pub collection: Address,
	/// Token id within the collection.
	pub token_id: U256,
	/// Kind of transfer primitive to use.
	pub kind: AssetKind,
	/// Current holder giving the asset away.
	pub from: Address,
	/// Counter-party receiving the asset.
	pub to: Address,
}

/// A fungible-token movement equalizing value between the two baskets,
/// also used for the referrer payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancingPayment {
	/// Paying trader.
	pub from: Address,
	/// Receiving party.
	pub to: Address,
	/// Amount of the payment token.
	pub amount: U256,
}

/// The full set of movements one match commits atomically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPlan {
	/// Asset movements, maker's basket first then taker's.
	pub transfers: Vec<PlannedTransfer>,
	/// Net balancing payment to the receiving trader, if any.
	pub payment: Option<BalancingPayment>,
	/// Referrer payout carved out of the balancing amount, if any.
	pub referral: Option<BalancingPayment>,
}

impl TransferPlan {
	/// Number of asset units this plan moves.
	pub fn asset_count(&self) -> usize {
		self.transfers.len()
	}
}
