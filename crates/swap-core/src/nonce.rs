//! Per-trader nonce registry.
//!
//! The registry is the only persistent state the engine owns. Every
//! trader's counter starts at zero, only ever increases, and is never
//! deleted; a digest is signable only while it was built against the
//! trader's current value.

use alloy_primitives::{Address, U256};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Monotonic per-trader counters gating which digest a signature can
/// currently authorize.
pub struct NonceRegistry {
	entries: RwLock<HashMap<Address, U256>>,
}

impl NonceRegistry {
	/// Creates an empty registry; every address reads as nonce zero.
	pub fn new() -> Self {
		Self {
			entries: RwLock::new(HashMap::new()),
		}
	}

	/// Returns the trader's current nonce.
	pub async fn current(&self, trader: Address) -> U256 {
		let entries = self.entries.read().await;
		entries.get(&trader).copied().unwrap_or(U256::ZERO)
	}

	/// Advances the trader's nonce by one and returns the new value,
	/// permanently invalidating every digest built against the old one.
	pub(crate) async fn advance(&self, trader: Address) -> U256 {
		let mut entries = self.entries.write().await;
		let entry = entries.entry(trader).or_insert(U256::ZERO);
		*entry += U256::from(1);
		*entry
	}
}

impl Default for NonceRegistry {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn unknown_trader_reads_zero() {
		let registry = NonceRegistry::new();
		assert_eq!(
			registry.current(Address::repeat_byte(0xa1)).await,
			U256::ZERO
		);
	}

	#[tokio::test]
	async fn advance_is_monotone_and_per_trader() {
		let registry = NonceRegistry::new();
		let alice = Address::repeat_byte(0xa1);
		let bob = Address::repeat_byte(0xb2);

		assert_eq!(registry.advance(alice).await, U256::from(1));
		assert_eq!(registry.advance(alice).await, U256::from(2));
		assert_eq!(registry.current(alice).await, U256::from(2));

		// Bob's counter is independent.
		assert_eq!(registry.current(bob).await, U256::ZERO);
		assert_eq!(registry.advance(bob).await, U256::from(1));
		assert_eq!(registry.current(alice).await, U256::from(2));
	}
}
