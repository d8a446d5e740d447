//! Asset ledger module for the Aristoswap engine.
//!
//! This module provides the seam between the swap engine and the token
//! contracts it settles against. The engine only requires the transfer
//! primitives to be atomic and to fail loudly on insufficient balance or
//! missing approval; everything else about the tokens is a collaborator
//! concern behind this interface.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod memory;
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
	/// The `from` address does not own the unique asset being moved.
	#[error("{holder} does not own token {token_id} of collection {collection}")]
	NotOwner {
		collection: Address,
		token_id: U256,
		holder: Address,
	},
	/// The holder's balance does not cover the requested quantity.
	#[error("insufficient balance: {holder} holds {held}, needs {needed}")]
	InsufficientBalance {
		holder: Address,
		held: U256,
		needed: U256,
	},
	/// The holder has not approved the exchange as an operator.
	#[error("{holder} has not approved the exchange to move their assets")]
	NotApproved { holder: Address },
	/// The asset does not exist in this ledger.
	#[error("unknown asset: token {token_id} of collection {collection}")]
	UnknownAsset {
		collection: Address,
		token_id: U256,
	},
}

/// Trait defining the low-level interface to the token collaborators.
///
/// Transfer primitives move assets on behalf of the exchange; they must
/// check ownership, balance and operator approval and fail without side
/// effects when any check does not hold. Query methods are read-only and
/// are what the orchestrator uses to prove a whole plan executable before
/// the first mutation.
#[async_trait]
pub trait AssetLedgerInterface: Send + Sync {
	/// Returns the owner of a unique asset.
	async fn owner_of(&self, collection: Address, token_id: U256) -> Result<Address, LedgerError>;

	/// Returns a holder's balance of a semi-fungible asset id.
	async fn balance_of(
		&self,
		collection: Address,
		token_id: U256,
		holder: Address,
	) -> Result<U256, LedgerError>;

	/// Returns a holder's balance of the payment token.
	async fn payment_balance_of(&self, holder: Address) -> Result<U256, LedgerError>;

	/// Whether the holder has approved the exchange as an operator.
	async fn is_operator_approved(&self, holder: Address) -> Result<bool, LedgerError>;

	/// Moves a unique asset between holders.
	async fn transfer_unique(
		&self,
		collection: Address,
		from: Address,
		to: Address,
		token_id: U256,
	) -> Result<(), LedgerError>;

	/// Moves a quantity of a semi-fungible asset id between holders.
	async fn transfer_quantity(
		&self,
		collection: Address,
		from: Address,
		to: Address,
		token_id: U256,
		quantity: U256,
	) -> Result<(), LedgerError>;

	/// Moves an amount of the payment token between holders.
	async fn transfer_payment(
		&self,
		from: Address,
		to: Address,
		amount: U256,
	) -> Result<(), LedgerError>;
}
