//! Swap matching logic.
//!
//! Pure functions reducing a pair of signed inputs to the transfer plan
//! the orchestrator executes. No state is read or written here; the
//! engine supplies nonces, digests and authorization separately.

use crate::SwapError;
use alloy_primitives::{Address, U256};
use swap_types::{BalancingPayment, PlannedTransfer, SignedInput, SwapIntent, TransferPlan};

/// Basis-point denominator for the referral fee.
const BPS_DENOMINATOR: u64 = 10_000;

/// Checks that each side's consent covers the other side's actual offer.
///
/// The comparison is field-wise over the full intent, order included; a
/// permuted basket is different terms.
pub fn check_terms(maker: &SignedInput, taker: &SignedInput) -> Result<(), SwapError> {
	if maker.counter_offer != taker.offer || taker.counter_offer != maker.offer {
		return Err(SwapError::TermsMismatch);
	}
	Ok(())
}

/// Builds the transfer plan for two mutually-consistent offers.
///
/// Every maker asset moves maker-to-taker and vice versa. At most one side
/// may carry a nonzero balancing amount: both-zero is a pure barter, both
/// nonzero is inconsistent. When a referrer is named and a payment exists,
/// the referral fee is carved out of the amount, so the payer never pays
/// more than they signed for.
pub fn build_plan(
	maker: &SwapIntent,
	taker: &SwapIntent,
	referrer: Address,
	referral_fee_bps: u16,
) -> Result<TransferPlan, SwapError> {
	if !maker.amount.is_zero() && !taker.amount.is_zero() {
		return Err(SwapError::BalanceMismatch);
	}

	let mut transfers = Vec::with_capacity(maker.asset_count() + taker.asset_count());
	push_basket(&mut transfers, maker, taker.trader);
	push_basket(&mut transfers, taker, maker.trader);

	let (payment, referral) = match (maker.amount.is_zero(), taker.amount.is_zero()) {
		(false, true) => split_payment(maker.trader, taker.trader, U256::from(maker.amount), referrer, referral_fee_bps),
		(true, false) => split_payment(taker.trader, maker.trader, U256::from(taker.amount), referrer, referral_fee_bps),
		_ => (None, None),
	};

	Ok(TransferPlan {
		transfers,
		payment,
		referral,
	})
}

fn push_basket(transfers: &mut Vec<PlannedTransfer>, offer: &SwapIntent, to: Address) {
	for i in 0..offer.asset_count() {
		transfers.push(PlannedTransfer {
			collection: offer.collections[i],
			token_id: offer.token_ids[i],
			kind: offer.asset_types[i],
			from: offer.trader,
			to,
		});
	}
}

fn split_payment(
	payer: Address,
	payee: Address,
	amount: U256,
	referrer: Address,
	referral_fee_bps: u16,
) -> (Option<BalancingPayment>, Option<BalancingPayment>) {
	let fee = if referrer == Address::ZERO {
		U256::ZERO
	} else {
		amount * U256::from(referral_fee_bps) / U256::from(BPS_DENOMINATOR)
	};

	let payment = BalancingPayment {
		from: payer,
		to: payee,
		amount: amount - fee,
	};
	let referral = (!fee.is_zero()).then_some(BalancingPayment {
		from: payer,
		to: referrer,
		amount: fee,
	});
	(Some(payment), referral)
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::aliases::U96;
	use swap_types::AssetKind;

	fn intent(trader: u8, amount: u64, ids: &[u64]) -> SwapIntent {
		SwapIntent {
			trader: Address::repeat_byte(trader),
			amount: U96::from(amount),
			collections: ids.iter().map(|_| Address::repeat_byte(0x11)).collect(),
			token_ids: ids.iter().map(|id| U256::from(*id)).collect(),
			asset_types: ids.iter().map(|_| AssetKind::Erc721).collect(),
		}
	}

	#[test]
	fn terms_must_match_both_ways() {
		let maker_offer = intent(0xa1, 0, &[1]);
		let taker_offer = intent(0xb2, 0, &[2]);

		let matched = check_terms(
			&SignedInput::unsigned(maker_offer.clone(), taker_offer.clone()),
			&SignedInput::unsigned(taker_offer.clone(), maker_offer.clone()),
		);
		assert!(matched.is_ok());

		// Taker consented to token 3, maker actually offers token 1.
		let mismatched = check_terms(
			&SignedInput::unsigned(maker_offer.clone(), taker_offer.clone()),
			&SignedInput::unsigned(taker_offer, intent(0xa1, 0, &[3])),
		);
		assert!(matches!(mismatched, Err(SwapError::TermsMismatch)));
	}

	#[test]
	fn plan_moves_both_baskets() {
		let maker = intent(0xa1, 0, &[1, 2]);
		let taker = intent(0xb2, 0, &[7]);

		let plan = build_plan(&maker, &taker, Address::ZERO, 0).unwrap();
		assert_eq!(plan.transfers.len(), 3);
		assert!(plan.payment.is_none());
		assert!(plan.referral.is_none());

		assert_eq!(plan.transfers[0].from, maker.trader);
		assert_eq!(plan.transfers[0].to, taker.trader);
		assert_eq!(plan.transfers[2].from, taker.trader);
		assert_eq!(plan.transfers[2].to, maker.trader);
	}

	#[test]
	fn both_sides_paying_is_inconsistent() {
		let maker = intent(0xa1, 100, &[1]);
		let taker = intent(0xb2, 50, &[2]);
		assert!(matches!(
			build_plan(&maker, &taker, Address::ZERO, 0),
			Err(SwapError::BalanceMismatch)
		));
	}

	#[test]
	fn one_sided_payment_flows_to_counterparty() {
		let maker = intent(0xa1, 1_000, &[1]);
		let taker = intent(0xb2, 0, &[2]);

		let plan = build_plan(&maker, &taker, Address::ZERO, 250).unwrap();
		let payment = plan.payment.unwrap();
		assert_eq!(payment.from, maker.trader);
		assert_eq!(payment.to, taker.trader);
		// No referrer named, so no fee is carved out.
		assert_eq!(payment.amount, U256::from(1_000));
		assert!(plan.referral.is_none());
	}

	#[test]
	fn referral_fee_is_carved_out_of_payment() {
		let maker = intent(0xa1, 0, &[1]);
		let taker = intent(0xb2, 1_000, &[2]);
		let referrer = Address::repeat_byte(0xcc);

		let plan = build_plan(&maker, &taker, referrer, 250).unwrap();
		let payment = plan.payment.unwrap();
		let referral = plan.referral.unwrap();

		assert_eq!(payment.from, taker.trader);
		assert_eq!(payment.to, maker.trader);
		assert_eq!(payment.amount, U256::from(975));
		assert_eq!(referral.from, taker.trader);
		assert_eq!(referral.to, referrer);
		assert_eq!(referral.amount, U256::from(25));
	}

	#[test]
	fn zero_fee_policy_produces_no_referral() {
		let maker = intent(0xa1, 1_000, &[1]);
		let taker = intent(0xb2, 0, &[2]);
		let referrer = Address::repeat_byte(0xcc);

		let plan = build_plan(&maker, &taker, referrer, 0).unwrap();
		assert_eq!(plan.payment.unwrap().amount, U256::from(1_000));
		assert!(plan.referral.is_none());
	}

	#[test]
	fn dust_payment_rounds_fee_down() {
		let maker = intent(0xa1, 3, &[1]);
		let taker = intent(0xb2, 0, &[2]);
		let referrer = Address::repeat_byte(0xcc);

		// 3 * 250 / 10000 rounds to zero; the payee gets the whole amount.
		let plan = build_plan(&maker, &taker, referrer, 250).unwrap();
		assert_eq!(plan.payment.unwrap().amount, U256::from(3));
		assert!(plan.referral.is_none());
	}
}
