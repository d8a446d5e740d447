//! In-memory ledger implementation.
//!
//! Stands in for the mock token contracts of the original test deployment:
//! one map of unique-asset owners, one of semi-fungible balances, one of
//! payment-token balances, and a single-operator approval set (the
//! exchange is the only operator in this model). Used by the test-suite
//! and the development service; persistence is not a goal.

use crate::{AssetLedgerInterface, LedgerError};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Default)]
struct LedgerState {
	/// (collection, token id) -> owner, for unique assets.
	owners: HashMap<(Address, U256), Address>,
	/// (collection, token id, holder) -> balance, for semi-fungible assets.
	balances: HashMap<(Address, U256, Address), U256>,
	/// holder -> payment-token balance.
	payments: HashMap<Address, U256>,
	/// Holders who approved the exchange as operator.
	approvals: HashSet<Address>,
}

/// In-memory asset ledger.
pub struct MemoryAssetLedger {
	/// Address of the payment token this ledger settles balancing
	/// payments in. Informational; the ledger holds the balances itself.
	payment_token: Address,
	state: RwLock<LedgerState>,
}

impl MemoryAssetLedger {
	/// Creates an empty ledger settling payments in the given token.
	pub fn new(payment_token: Address) -> Self {
		Self {
			payment_token,
			state: RwLock::new(LedgerState::default()),
		}
	}

	/// The payment token this ledger settles in.
	pub fn payment_token(&self) -> Address {
		self.payment_token
	}

	/// Creates a unique asset owned by `to`.
	pub async fn mint_unique(&self, collection: Address, to: Address, token_id: U256) {
		let mut state = self.state.write().await;
		state.owners.insert((collection, token_id), to);
	}

	/// Credits `to` with a quantity of a semi-fungible asset id.
	pub async fn mint_quantity(
		&self,
		collection: Address,
		to: Address,
		token_id: U256,
		quantity: U256,
	) {
		let mut state = self.state.write().await;
		let entry = state
			.balances
			.entry((collection, token_id, to))
			.or_insert(U256::ZERO);
		*entry += quantity;
	}

	/// Credits `to` with payment tokens.
	pub async fn mint_payment(&self, to: Address, amount: U256) {
		let mut state = self.state.write().await;
		let entry = state.payments.entry(to).or_insert(U256::ZERO);
		*entry += amount;
	}

	/// Grants or revokes the exchange's operator approval for a holder.
	pub async fn set_operator_approval(&self, holder: Address, approved: bool) {
		let mut state = self.state.write().await;
		if approved {
			state.approvals.insert(holder);
		} else {
			state.approvals.remove(&holder);
		}
	}
}

impl LedgerState {
	fn require_approved(&self, holder: Address) -> Result<(), LedgerError> {
		if self.approvals.contains(&holder) {
			Ok(())
		} else {
			Err(LedgerError::NotApproved { holder })
		}
	}
}

#[async_trait]
impl AssetLedgerInterface for MemoryAssetLedger {
	async fn owner_of(&self, collection: Address, token_id: U256) -> Result<Address, LedgerError> {
		let state = self.state.read().await;
		state
			.owners
			.get(&(collection, token_id))
			.copied()
			.ok_or(LedgerError::UnknownAsset {
				collection,
				token_id,
			})
	}

	async fn balance_of(
		&self,
		collection: Address,
		token_id: U256,
		holder: Address,
	) -> Result<U256, LedgerError> {
		let state = self.state.read().await;
		Ok(state
			.balances
			.get(&(collection, token_id, holder))
			.copied()
			.unwrap_or(U256::ZERO))
	}

	async fn payment_balance_of(&self, holder: Address) -> Result<U256, LedgerError> {
		let state = self.state.read().await;
		Ok(state.payments.get(&holder).copied().unwrap_or(U256::ZERO))
	}

	async fn is_operator_approved(&self, holder: Address) -> Result<bool, LedgerError> {
		let state = self.state.read().await;
		Ok(state.approvals.contains(&holder))
	}

	async fn transfer_unique(
		&self,
		collection: Address,
		from: Address,
		to: Address,
		token_id: U256,
	) -> Result<(), LedgerError> {
		let mut state = self.state.write().await;
		let owner = state
			.owners
			.get(&(collection, token_id))
			.copied()
			.ok_or(LedgerError::UnknownAsset {
				collection,
				token_id,
			})?;
		if owner != from {
			return Err(LedgerError::NotOwner {
				collection,
				token_id,
				holder: from,
			});
		}
		state.require_approved(from)?;
		state.owners.insert((collection, token_id), to);
		Ok(())
	}

	async fn transfer_quantity(
		&self,
		collection: Address,
		from: Address,
		to: Address,
		token_id: U256,
		quantity: U256,
	) -> Result<(), LedgerError> {
		let mut state = self.state.write().await;
		let held = state
			.balances
			.get(&(collection, token_id, from))
			.copied()
			.unwrap_or(U256::ZERO);
		if held < quantity {
			return Err(LedgerError::InsufficientBalance {
				holder: from,
				held,
				needed: quantity,
			});
		}
		state.require_approved(from)?;
		state.balances.insert((collection, token_id, from), held - quantity);
		let entry = state
			.balances
			.entry((collection, token_id, to))
			.or_insert(U256::ZERO);
		*entry += quantity;
		Ok(())
	}

	async fn transfer_payment(
		&self,
		from: Address,
		to: Address,
		amount: U256,
	) -> Result<(), LedgerError> {
		let mut state = self.state.write().await;
		let held = state.payments.get(&from).copied().unwrap_or(U256::ZERO);
		if held < amount {
			return Err(LedgerError::InsufficientBalance {
				holder: from,
				held,
				needed: amount,
			});
		}
		state.require_approved(from)?;
		state.payments.insert(from, held - amount);
		let entry = state.payments.entry(to).or_insert(U256::ZERO);
		*entry += amount;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn addr(byte: u8) -> Address {
		Address::repeat_byte(byte)
	}

	#[tokio::test]
	async fn unique_transfer_moves_ownership() {
		let ledger = MemoryAssetLedger::new(addr(0xee));
		let (collection, alice, bob) = (addr(0x11), addr(0xa1), addr(0xb2));

		ledger.mint_unique(collection, alice, U256::from(1)).await;
		ledger.set_operator_approval(alice, true).await;

		ledger
			.transfer_unique(collection, alice, bob, U256::from(1))
			.await
			.unwrap();
		assert_eq!(
			ledger.owner_of(collection, U256::from(1)).await.unwrap(),
			bob
		);
	}

	#[tokio::test]
	async fn unique_transfer_rejects_non_owner() {
		let ledger = MemoryAssetLedger::new(addr(0xee));
		let (collection, alice, bob) = (addr(0x11), addr(0xa1), addr(0xb2));

		ledger.mint_unique(collection, alice, U256::from(1)).await;
		ledger.set_operator_approval(bob, true).await;

		let result = ledger
			.transfer_unique(collection, bob, alice, U256::from(1))
			.await;
		assert!(matches!(result, Err(LedgerError::NotOwner { .. })));
	}

	#[tokio::test]
	async fn transfers_require_operator_approval() {
		let ledger = MemoryAssetLedger::new(addr(0xee));
		let (collection, alice, bob) = (addr(0x11), addr(0xa1), addr(0xb2));

		ledger.mint_unique(collection, alice, U256::from(1)).await;

		let result = ledger
			.transfer_unique(collection, alice, bob, U256::from(1))
			.await;
		assert_eq!(result, Err(LedgerError::NotApproved { holder: alice }));
		// Ownership is untouched after the failed transfer.
		assert_eq!(
			ledger.owner_of(collection, U256::from(1)).await.unwrap(),
			alice
		);
	}

	#[tokio::test]
	async fn quantity_transfer_tracks_balances() {
		let ledger = MemoryAssetLedger::new(addr(0xee));
		let (collection, alice, bob) = (addr(0x11), addr(0xa1), addr(0xb2));

		ledger
			.mint_quantity(collection, alice, U256::from(7), U256::from(10))
			.await;
		ledger.set_operator_approval(alice, true).await;

		ledger
			.transfer_quantity(collection, alice, bob, U256::from(7), U256::from(4))
			.await
			.unwrap();

		assert_eq!(
			ledger
				.balance_of(collection, U256::from(7), alice)
				.await
				.unwrap(),
			U256::from(6)
		);
		assert_eq!(
			ledger
				.balance_of(collection, U256::from(7), bob)
				.await
				.unwrap(),
			U256::from(4)
		);
	}

	#[tokio::test]
	async fn quantity_transfer_rejects_overdraw() {
		let ledger = MemoryAssetLedger::new(addr(0xee));
		let (collection, alice, bob) = (addr(0x11), addr(0xa1), addr(0xb2));

		ledger
			.mint_quantity(collection, alice, U256::from(7), U256::from(3))
			.await;
		ledger.set_operator_approval(alice, true).await;

		let result = ledger
			.transfer_quantity(collection, alice, bob, U256::from(7), U256::from(4))
			.await;
		assert!(matches!(
			result,
			Err(LedgerError::InsufficientBalance { .. })
		));
	}

	#[tokio::test]
	async fn payment_transfer_tracks_balances() {
		let ledger = MemoryAssetLedger::new(addr(0xee));
		let (alice, bob) = (addr(0xa1), addr(0xb2));

		ledger.mint_payment(alice, U256::from(100)).await;
		ledger.set_operator_approval(alice, true).await;

		ledger
			.transfer_payment(alice, bob, U256::from(40))
			.await
			.unwrap();
		assert_eq!(
			ledger.payment_balance_of(alice).await.unwrap(),
			U256::from(60)
		);
		assert_eq!(
			ledger.payment_balance_of(bob).await.unwrap(),
			U256::from(40)
		);

		let overdraw = ledger.transfer_payment(alice, bob, U256::from(61)).await;
		assert!(matches!(
			overdraw,
			Err(LedgerError::InsufficientBalance { .. })
		));
	}
}
