//! Event types for observing the swap engine.
//!
//! Events are broadcast after state has committed, so a subscriber never
//! observes a swap that later unwound.

use crate::plan::BalancingPayment;
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Events published by the swap engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SwapEvent {
	/// A match executed and both baskets changed hands.
	Executed {
		/// Maker-side trader.
		maker: Address,
		/// Taker-side trader.
		taker: Address,
		/// Digest the maker authorized.
		maker_digest: B256,
		/// Digest the taker authorized.
		taker_digest: B256,
		/// Total asset units moved.
		asset_count: usize,
		/// Net balancing payment, if any.
		payment: Option<BalancingPayment>,
	},
	/// A trader advanced their own nonce, invalidating every outstanding
	/// authorization built against the previous value.
	Cancelled {
		/// The trader who cancelled.
		trader: Address,
		/// The nonce now in force.
		new_nonce: U256,
	},
}
