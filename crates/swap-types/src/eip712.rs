//! EIP-712 typed-data hashing for swap intents.
//!
//! These helpers produce the digest a trader actually signs:
//! - Struct hash for the `Swap` type, with each dynamic array hashed
//!   independently before being folded into the top-level encoding
//! - Domain hash over the four-field `EIP712Domain`
//! - Final digest computation (0x1901 || domainHash || structHash)
//!
//! Every signing and verification path in the engine goes through
//! [`swap_digest`]; there is deliberately no second encoding scheme.

use crate::swap::SwapIntent;
use alloy_primitives::{aliases::U96, keccak256, Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Type string of the swap struct. The field order is the wire format.
pub const SWAP_TYPE: &str = "Swap(address trader,uint96 amount,address[] collections,uint256[] tokenIds,uint8[] assetTypes,uint256 nonce)";

/// Type string of the signing domain.
pub const DOMAIN_TYPE: &str =
	"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// The signing domain fixed per deployment.
///
/// Binding the domain into the digest prevents a signature from being
/// replayed against another deployment or chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapDomain {
	/// Human-readable protocol name (e.g. "Aristoswap").
	pub name: String,
	/// Protocol version string (e.g. "1.0").
	pub version: String,
	/// Chain the deployment lives on.
	pub chain_id: u64,
	/// Address of the deployed exchange.
	pub verifying_contract: Address,
}

/// Compute the domain hash:
/// keccak256(abi.encode(typeHash, nameHash, versionHash, chainId, verifyingContract)).
pub fn domain_hash(domain: &SwapDomain) -> B256 {
	let mut enc = Eip712AbiEncoder::new();
	enc.push_b256(&keccak256(DOMAIN_TYPE.as_bytes()));
	enc.push_b256(&keccak256(domain.name.as_bytes()));
	enc.push_b256(&keccak256(domain.version.as_bytes()));
	enc.push_u256(U256::from(domain.chain_id));
	enc.push_address(&domain.verifying_contract);
	keccak256(enc.finish())
}

/// Compute the struct hash of an intent under a given nonce.
///
/// Each dynamic array is hashed independently (keccak256 of the
/// concatenated 32-byte-encoded elements) and the resulting word replaces
/// the array in the top-level encoding. Reordering a basket therefore
/// changes the hash: a signer commits to an exact ordered basket.
pub fn swap_struct_hash(intent: &SwapIntent, nonce: U256) -> B256 {
	let collections_hash = {
		let mut enc = Eip712AbiEncoder::new();
		for collection in &intent.collections {
			enc.push_address(collection);
		}
		keccak256(enc.finish())
	};
	let token_ids_hash = {
		let mut enc = Eip712AbiEncoder::new();
		for id in &intent.token_ids {
			enc.push_u256(*id);
		}
		keccak256(enc.finish())
	};
	let asset_types_hash = {
		let mut enc = Eip712AbiEncoder::new();
		for kind in &intent.asset_types {
			enc.push_u8(kind.as_u8());
		}
		keccak256(enc.finish())
	};

	let mut enc = Eip712AbiEncoder::new();
	enc.push_b256(&keccak256(SWAP_TYPE.as_bytes()));
	enc.push_address(&intent.trader);
	enc.push_u96(intent.amount);
	enc.push_b256(&collections_hash);
	enc.push_b256(&token_ids_hash);
	enc.push_b256(&asset_types_hash);
	enc.push_u256(nonce);
	keccak256(enc.finish())
}

/// Compute the final digest: keccak256(0x1901 || domainHash || structHash).
pub fn final_digest(domain_hash: &B256, struct_hash: &B256) -> B256 {
	let mut out = Vec::with_capacity(2 + 32 + 32);
	out.push(0x19);
	out.push(0x01);
	out.extend_from_slice(domain_hash.as_slice());
	out.extend_from_slice(struct_hash.as_slice());
	keccak256(out)
}

/// The digest a trader signs: intent plus nonce under the deployment domain.
pub fn swap_digest(intent: &SwapIntent, nonce: U256, domain: &SwapDomain) -> B256 {
	final_digest(&domain_hash(domain), &swap_struct_hash(intent, nonce))
}

/// Minimal ABI encoder for the static word types used in struct hashing.
pub struct Eip712AbiEncoder {
	buf: Vec<u8>,
}

impl Default for Eip712AbiEncoder {
	fn default() -> Self {
		Self::new()
	}
}

impl Eip712AbiEncoder {
	pub fn new() -> Self {
		Self { buf: Vec::new() }
	}

	pub fn push_b256(&mut self, v: &B256) {
		self.buf.extend_from_slice(v.as_slice());
	}

	pub fn push_address(&mut self, addr: &Address) {
		let mut word = [0u8; 32];
		word[12..].copy_from_slice(addr.as_slice());
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u256(&mut self, v: U256) {
		let word: [u8; 32] = v.to_be_bytes::<32>();
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u96(&mut self, v: U96) {
		let mut word = [0u8; 32];
		word[20..].copy_from_slice(&v.to_be_bytes::<12>());
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u8(&mut self, v: u8) {
		let mut word = [0u8; 32];
		word[31] = v;
		self.buf.extend_from_slice(&word);
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::swap::AssetKind;
	use std::collections::HashSet;

	fn domain() -> SwapDomain {
		SwapDomain {
			name: "Aristoswap".to_string(),
			version: "1.0".to_string(),
			chain_id: 25,
			verifying_contract: Address::repeat_byte(0xe0),
		}
	}

	fn intent() -> SwapIntent {
		SwapIntent {
			trader: Address::repeat_byte(0xa1),
			amount: U96::from(5u64),
			collections: vec![Address::repeat_byte(0x11), Address::repeat_byte(0x22)],
			token_ids: vec![U256::from(1), U256::from(2)],
			asset_types: vec![AssetKind::Erc721, AssetKind::Erc1155],
		}
	}

	#[test]
	fn digest_is_deterministic() {
		let a = swap_digest(&intent(), U256::ZERO, &domain());
		let b = swap_digest(&intent(), U256::ZERO, &domain());
		assert_eq!(a, b);
	}

	#[test]
	fn digest_depends_on_nonce() {
		let a = swap_digest(&intent(), U256::ZERO, &domain());
		let b = swap_digest(&intent(), U256::from(1), &domain());
		assert_ne!(a, b);
	}

	#[test]
	fn digest_depends_on_basket_order() {
		let original = intent();
		let mut permuted = original.clone();
		permuted.collections.swap(0, 1);
		permuted.token_ids.swap(0, 1);
		permuted.asset_types.swap(0, 1);

		assert_ne!(
			swap_digest(&original, U256::ZERO, &domain()),
			swap_digest(&permuted, U256::ZERO, &domain()),
		);
	}

	#[test]
	fn digest_is_domain_separated() {
		let base = domain();
		let other_chain = SwapDomain {
			chain_id: 338,
			..base.clone()
		};
		let other_contract = SwapDomain {
			verifying_contract: Address::repeat_byte(0xe1),
			..base.clone()
		};

		let reference = swap_digest(&intent(), U256::ZERO, &base);
		assert_ne!(reference, swap_digest(&intent(), U256::ZERO, &other_chain));
		assert_ne!(
			reference,
			swap_digest(&intent(), U256::ZERO, &other_contract)
		);
	}

	#[test]
	fn distinct_inputs_produce_distinct_digests() {
		// Pairwise-distinct digests over a small vector set: trader, amount,
		// basket contents and nonce must all separate.
		let base = intent();
		let mut variants = vec![base.clone()];

		let mut other_trader = base.clone();
		other_trader.trader = Address::repeat_byte(0xb2);
		variants.push(other_trader);

		let mut other_amount = base.clone();
		other_amount.amount = U96::from(6u64);
		variants.push(other_amount);

		let mut other_id = base.clone();
		other_id.token_ids[0] = U256::from(9);
		variants.push(other_id);

		let mut other_kind = base.clone();
		other_kind.asset_types[0] = AssetKind::Erc1155;
		variants.push(other_kind);

		let mut digests = HashSet::new();
		for variant in &variants {
			for nonce in 0u64..3 {
				assert!(digests.insert(swap_digest(variant, U256::from(nonce), &domain())));
			}
		}
	}

	#[test]
	fn struct_hash_differs_from_final_digest() {
		let struct_hash = swap_struct_hash(&intent(), U256::ZERO);
		let digest = swap_digest(&intent(), U256::ZERO, &domain());
		assert_ne!(struct_hash, digest);
	}

	#[test]
	fn empty_basket_hashes() {
		let cash_only = SwapIntent {
			trader: Address::repeat_byte(0xa1),
			amount: U96::from(100u64),
			collections: vec![],
			token_ids: vec![],
			asset_types: vec![],
		};
		// keccak256 of an empty encoding is still a commitment to "no assets".
		let with_asset = intent();
		assert_ne!(
			swap_digest(&cash_only, U256::ZERO, &domain()),
			swap_digest(&with_asset, U256::ZERO, &domain()),
		);
	}
}
