//! Asset transfer orchestration.
//!
//! Thin two-phase dispatcher over the ledger interface. Phase one proves
//! the whole plan executable with read-only queries; phase two invokes the
//! kind-indexed transfer primitives. Together with the engine's serial
//! execution this keeps a failing match from leaving partial transfers
//! behind.

use crate::SwapError;
use alloy_primitives::{Address, U256};
use std::collections::{HashMap, HashSet};
use swap_ledger::{AssetLedgerInterface, LedgerError};
use swap_types::{AssetKind, BalancingPayment, TransferPlan};

/// Proves every transfer in the plan can execute: ownership for unique
/// assets, aggregated balances for semi-fungible ids and the payment
/// token, and operator approval for every debited holder.
pub async fn validate_plan(
	ledger: &dyn AssetLedgerInterface,
	plan: &TransferPlan,
) -> Result<(), SwapError> {
	let mut debited: HashSet<Address> = HashSet::new();
	// Aggregated semi-fungible needs per (collection, id, holder); a basket
	// may list the same id several times, one unit each.
	let mut quantity_needs: HashMap<(Address, U256, Address), U256> = HashMap::new();

	for transfer in &plan.transfers {
		debited.insert(transfer.from);
		match transfer.kind {
			AssetKind::Erc721 => {
				let owner = ledger.owner_of(transfer.collection, transfer.token_id).await?;
				if owner != transfer.from {
					return Err(LedgerError::NotOwner {
						collection: transfer.collection,
						token_id: transfer.token_id,
						holder: transfer.from,
					}
					.into());
				}
			},
			AssetKind::Erc1155 => {
				let entry = quantity_needs
					.entry((transfer.collection, transfer.token_id, transfer.from))
					.or_insert(U256::ZERO);
				*entry += U256::from(1);
			},
		}
	}

	for ((collection, token_id, holder), needed) in &quantity_needs {
		let held = ledger.balance_of(*collection, *token_id, *holder).await?;
		if held < *needed {
			return Err(LedgerError::InsufficientBalance {
				holder: *holder,
				held,
				needed: *needed,
			}
			.into());
		}
	}

	// Payment and referral are debited from the same payer; check the sum.
	let mut payment_needs: HashMap<Address, U256> = HashMap::new();
	for payment in payments_of(plan) {
		debited.insert(payment.from);
		let entry = payment_needs.entry(payment.from).or_insert(U256::ZERO);
		*entry += payment.amount;
	}
	for (payer, needed) in &payment_needs {
		let held = ledger.payment_balance_of(*payer).await?;
		if held < *needed {
			return Err(LedgerError::InsufficientBalance {
				holder: *payer,
				held,
				needed: *needed,
			}
			.into());
		}
	}

	for holder in debited {
		if !ledger.is_operator_approved(holder).await? {
			return Err(LedgerError::NotApproved { holder }.into());
		}
	}

	Ok(())
}

/// Executes the plan against the ledger, one primitive per entry.
///
/// Callers validate first; under the engine's serial execution the
/// primitives cannot fail here, and an error is still propagated rather
/// than swallowed.
pub async fn apply_plan(
	ledger: &dyn AssetLedgerInterface,
	plan: &TransferPlan,
) -> Result<(), SwapError> {
	for transfer in &plan.transfers {
		match transfer.kind {
			AssetKind::Erc721 => {
				ledger
					.transfer_unique(
						transfer.collection,
						transfer.from,
						transfer.to,
						transfer.token_id,
					)
					.await?;
			},
			AssetKind::Erc1155 => {
				// Each basket entry is one atomic asset unit.
				ledger
					.transfer_quantity(
						transfer.collection,
						transfer.from,
						transfer.to,
						transfer.token_id,
						U256::from(1),
					)
					.await?;
			},
		}
	}

	for payment in payments_of(plan) {
		ledger
			.transfer_payment(payment.from, payment.to, payment.amount)
			.await?;
	}

	Ok(())
}

fn payments_of(plan: &TransferPlan) -> impl Iterator<Item = &BalancingPayment> {
	plan.payment.iter().chain(plan.referral.iter())
}
