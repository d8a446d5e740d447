//! Core swap engine for the Aristoswap protocol.
//!
//! This module provides the main matching logic for signature-authorized
//! atomic swaps, coordinating the typed-hash builder, the nonce registry,
//! the signature verifier and the transfer orchestrator so that two
//! off-line-signed intents settle in one all-or-nothing step.

use alloy_primitives::{Address, B256, U256};
use std::collections::HashSet;
use std::sync::Arc;
use swap_config::Config;
use swap_ledger::{AssetLedgerInterface, LedgerError};
use swap_types::{
	eip712, IntentError, SignedInput, SwapDomain, SwapEvent, SwapIntent, SwapReceipt,
};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};

pub mod event_bus;
pub mod matcher;
pub mod nonce;
pub mod orchestrator;
pub mod verify;

use event_bus::EventBus;
use nonce::NonceRegistry;

/// Errors that can occur while matching a pair of signed inputs.
///
/// All are reported synchronously as the outcome of the call; nothing is
/// retried internally, and a failing match leaves nonces and asset
/// ownership exactly as they were.
#[derive(Debug, Error)]
pub enum SwapError {
	/// An intent violates its own structural invariants.
	#[error("malformed intent: {0}")]
	MalformedIntent(#[from] IntentError),
	/// An offered collection is not tradable on this deployment.
	#[error("collection {0} is not tradable on this exchange")]
	CollectionNotAllowed(Address),
	/// Neither authorization path accepted an input package.
	#[error("signature does not authorize trader {0}")]
	InvalidSignature(Address),
	/// The authorization was built against a nonce that has since been
	/// consumed or cancelled.
	#[error("authorization for trader {0} was built against a consumed nonce")]
	StaleNonce(Address),
	/// Each side's counter-offer must equal the other side's offer.
	#[error("counter-offer terms do not match the submitted offers")]
	TermsMismatch,
	/// Both sides carry a nonzero balancing amount.
	#[error("balancing amounts are inconsistent: both sides are nonzero")]
	BalanceMismatch,
	/// An underlying token transfer could not execute.
	#[error("asset transfer failed: {0}")]
	AssetTransferFailed(#[from] LedgerError),
}

/// The swap engine.
///
/// Holds the deployment domain, the fee policy, the collection
/// allow-list, the nonce registry and a handle to the asset ledger.
/// `execute_swap` and `cancel` are serialized behind a single lock so a
/// match's nonce reads, nonce advances and transfers form one atomic unit.
pub struct SwapEngine {
	domain: SwapDomain,
	referral_fee_bps: u16,
	allowed_collections: Option<HashSet<Address>>,
	ledger: Arc<dyn AssetLedgerInterface>,
	nonces: NonceRegistry,
	bus: EventBus,
	tx_lock: Mutex<()>,
}

impl SwapEngine {
	/// Creates an engine from validated configuration and a ledger handle.
	pub fn new(config: &Config, ledger: Arc<dyn AssetLedgerInterface>) -> Self {
		Self {
			domain: config.domain.to_domain(),
			referral_fee_bps: config.fees.referral_fee_bps,
			allowed_collections: config
				.collections
				.allowed
				.as_ref()
				.map(|allowed| allowed.iter().copied().collect()),
			ledger,
			nonces: NonceRegistry::new(),
			bus: EventBus::new(64),
			tx_lock: Mutex::new(()),
		}
	}

	/// The signing domain of this deployment.
	pub fn domain(&self) -> &SwapDomain {
		&self.domain
	}

	/// Returns a trader's current nonce.
	pub async fn current_nonce(&self, trader: Address) -> U256 {
		self.nonces.current(trader).await
	}

	/// Computes the digest a trader must sign for an intent under a nonce.
	///
	/// Off-chain signers call this (directly or via the API) to know what
	/// to sign; it is the same computation every verification path uses.
	pub fn swap_digest(&self, intent: &SwapIntent, nonce: U256) -> Result<B256, SwapError> {
		intent.validate()?;
		Ok(eip712::swap_digest(intent, nonce, &self.domain))
	}

	/// Whether an input package is authorized for the given digest and
	/// caller, via either the direct or the relayed path.
	pub fn validate_signatures(&self, input: &SignedInput, digest: B256, caller: Address) -> bool {
		verify::authorize(digest, input.offer.trader, &input.signature(), caller).is_authorized()
	}

	/// Subscribes to events published after each committed state change.
	pub fn subscribe(&self) -> broadcast::Receiver<SwapEvent> {
		self.bus.subscribe()
	}

	/// Advances the caller's own nonce, invalidating every outstanding
	/// authorization they have signed. Returns the nonce now in force.
	pub async fn cancel(&self, caller: Address) -> U256 {
		let _tx = self.tx_lock.lock().await;
		let new_nonce = self.nonces.advance(caller).await;
		tracing::info!(
			"Trader {} cancelled outstanding authorizations, nonce now {}",
			caller,
			new_nonce
		);
		self.bus.publish(SwapEvent::Cancelled {
			trader: caller,
			new_nonce,
		});
		new_nonce
	}

	/// Matches two signed inputs and settles them atomically.
	///
	/// `caller` is the address submitting the match; a trader submitting
	/// their own side may leave that side's signature zeroed. `referrer`,
	/// when nonzero, receives the configured fraction of the balancing
	/// payment.
	pub async fn execute_swap(
		&self,
		caller: Address,
		maker_input: &SignedInput,
		taker_input: &SignedInput,
		referrer: Address,
	) -> Result<SwapReceipt, SwapError> {
		let _tx = self.tx_lock.lock().await;

		for intent in [
			&maker_input.offer,
			&maker_input.counter_offer,
			&taker_input.offer,
			&taker_input.counter_offer,
		] {
			intent.validate()?;
		}
		self.check_collections(&maker_input.offer)?;
		self.check_collections(&taker_input.offer)?;

		let maker = maker_input.offer.trader;
		let taker = taker_input.offer.trader;

		// Digests are built against each trader's current nonce; a
		// signature over any older digest can no longer authorize.
		let maker_nonce = self.nonces.current(maker).await;
		let taker_nonce = self.nonces.current(taker).await;
		let maker_digest = eip712::swap_digest(&maker_input.offer, maker_nonce, &self.domain);
		let taker_digest = eip712::swap_digest(&taker_input.offer, taker_nonce, &self.domain);

		self.authorize_input(maker_input, maker_digest, maker_nonce, caller)?;
		self.authorize_input(taker_input, taker_digest, taker_nonce, caller)?;

		matcher::check_terms(maker_input, taker_input)?;
		let plan = matcher::build_plan(
			&maker_input.offer,
			&taker_input.offer,
			referrer,
			self.referral_fee_bps,
		)?;

		orchestrator::validate_plan(self.ledger.as_ref(), &plan).await?;

		// Consume both authorizations before any asset moves. The plan was
		// proven executable above, so nothing past this point unwinds.
		self.nonces.advance(maker).await;
		self.nonces.advance(taker).await;

		orchestrator::apply_plan(self.ledger.as_ref(), &plan).await?;

		let receipt = SwapReceipt {
			maker,
			taker,
			maker_digest,
			taker_digest,
			asset_count: plan.asset_count(),
			payment: plan.payment,
			referral: plan.referral,
		};
		tracing::info!(
			"Executed swap between {} and {} ({} assets)",
			maker,
			taker,
			receipt.asset_count
		);
		self.bus.publish(SwapEvent::Executed {
			maker,
			taker,
			maker_digest,
			taker_digest,
			asset_count: receipt.asset_count,
			payment: receipt.payment,
		});
		Ok(receipt)
	}

	fn check_collections(&self, intent: &SwapIntent) -> Result<(), SwapError> {
		let Some(allowed) = &self.allowed_collections else {
			return Ok(());
		};
		for collection in &intent.collections {
			if !allowed.contains(collection) {
				return Err(SwapError::CollectionNotAllowed(*collection));
			}
		}
		Ok(())
	}

	/// Authorizes one input, distinguishing a replay of a consumed
	/// authorization from a signature that never authorized anything.
	fn authorize_input(
		&self,
		input: &SignedInput,
		digest: B256,
		nonce: U256,
		caller: Address,
	) -> Result<(), SwapError> {
		let trader = input.offer.trader;
		let signature = input.signature();
		if verify::authorize(digest, trader, &signature, caller).is_authorized() {
			return Ok(());
		}
		// A signature valid under the previous nonce is a replay, either of
		// a consumed swap or of a cancelled authorization.
		if nonce > U256::ZERO {
			let previous =
				eip712::swap_digest(&input.offer, nonce - U256::from(1), &self.domain);
			if verify::recovers_to(previous, trader, &signature) {
				return Err(SwapError::StaleNonce(trader));
			}
		}
		Err(SwapError::InvalidSignature(trader))
	}
}
