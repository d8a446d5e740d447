//! Signature verification.
//!
//! Authorization is a two-branch policy, not a property of the signature
//! math: a trader submitting their own offer needs no pre-signed proof,
//! while anyone else must present a signature that recovers to the trader.
//! Verification is a predicate; malformed or wrong-party signatures yield
//! a rejection, never an error.

use alloy_primitives::{Address, Signature, B256};
use swap_types::SwapSignature;

/// Outcome of the authorization check for one signed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
	/// The caller is the trader; the signature fields were not inspected.
	Direct,
	/// The signature recovered to the claimed trader.
	Recovered,
	/// Neither path authorized the input.
	Rejected,
}

impl Authorization {
	/// Whether either path authorized the input.
	pub fn is_authorized(self) -> bool {
		!matches!(self, Authorization::Rejected)
	}
}

/// Authorizes one input package against a digest.
///
/// Direct path: `caller == claimed_trader` authorizes unconditionally,
/// all-zero signature fields included. Relayed path: the signature must
/// recover to `claimed_trader` exactly.
pub fn authorize(
	digest: B256,
	claimed_trader: Address,
	signature: &SwapSignature,
	caller: Address,
) -> Authorization {
	if caller == claimed_trader {
		return Authorization::Direct;
	}
	if recovers_to(digest, claimed_trader, signature) {
		Authorization::Recovered
	} else {
		Authorization::Rejected
	}
}

/// Whether `(v, r, s)` is a valid signature over `digest` by
/// `claimed_trader`'s key.
///
/// Out-of-range scalars, a recovery byte other than 27/28, and a zero
/// claimed trader all fail closed.
pub fn recovers_to(digest: B256, claimed_trader: Address, signature: &SwapSignature) -> bool {
	if claimed_trader == Address::ZERO {
		return false;
	}
	let parity = match signature.v {
		27 => false,
		28 => true,
		_ => return false,
	};
	let signature = match Signature::from_scalars_and_parity(signature.r, signature.s, parity) {
		Ok(signature) => signature,
		Err(_) => return false,
	};
	matches!(
		signature.recover_address_from_prehash(&digest),
		Ok(recovered) if recovered == claimed_trader
	)
}
