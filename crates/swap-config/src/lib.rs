//! Configuration module for the Aristoswap engine.
//!
//! This module provides structures and utilities for managing engine
//! configuration. It supports loading configuration from TOML files and
//! provides validation to ensure all required values are properly set
//! before the engine accepts its first swap.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use swap_types::SwapDomain;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the Aristoswap engine.
///
/// Contains the signing domain fixed at deployment, the referral-fee
/// policy, the collection allow-list, and the HTTP API server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// EIP-712 signing domain for this deployment.
	pub domain: DomainConfig,
	/// Referral-fee policy applied to balancing payments.
	#[serde(default)]
	pub fees: FeeConfig,
	/// Address of the fungible token used for balancing payments.
	pub payment: PaymentConfig,
	/// Collections tradable on this deployment.
	#[serde(default)]
	pub collections: CollectionConfig,
	/// Configuration for the HTTP API server.
	#[serde(default)]
	pub api: ApiConfig,
}

/// EIP-712 domain parameters as they appear in the TOML file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DomainConfig {
	/// Protocol name baked into every digest.
	#[serde(default = "default_domain_name")]
	pub name: String,
	/// Protocol version baked into every digest.
	#[serde(default = "default_domain_version")]
	pub version: String,
	/// Chain ID where the exchange is deployed.
	pub chain_id: u64,
	/// Exchange contract address.
	pub verifying_contract: Address,
}

fn default_domain_name() -> String {
	"Aristoswap".to_string()
}

fn default_domain_version() -> String {
	"1.0".to_string()
}

impl DomainConfig {
	/// The domain in the form the typed-hash builder consumes.
	pub fn to_domain(&self) -> SwapDomain {
		SwapDomain {
			name: self.name.clone(),
			version: self.version.clone(),
			chain_id: self.chain_id,
			verifying_contract: self.verifying_contract,
		}
	}
}

/// Referral-fee policy.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeeConfig {
	/// Fraction of the balancing amount paid to the referrer, in basis
	/// points. Zero disables referral payouts.
	#[serde(default)]
	pub referral_fee_bps: u16,
}

/// Balancing-payment token settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentConfig {
	/// Address of the ERC20-like token balancing payments are made in.
	pub token: Address,
}

/// Collection allow-list settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CollectionConfig {
	/// Collections tradable on this deployment. When absent, any
	/// collection is accepted.
	#[serde(default)]
	pub allowed: Option<Vec<Address>>,
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Whether the API server should be started.
	#[serde(default = "default_api_enabled")]
	pub enabled: bool,
	/// Host address to bind to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to listen on.
	#[serde(default = "default_api_port")]
	pub port: u16,
}

fn default_api_enabled() -> bool {
	true
}

fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
	8080
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			enabled: default_api_enabled(),
			host: default_api_host(),
			port: default_api_port(),
		}
	}
}

impl Config {
	/// Loads and validates configuration from a TOML file.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
		let contents = std::fs::read_to_string(path)?;
		contents.parse()
	}

	/// Validates the semantic constraints the deserializer cannot express.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.domain.name.is_empty() {
			return Err(ConfigError::Validation(
				"domain.name must not be empty".to_string(),
			));
		}
		if self.domain.version.is_empty() {
			return Err(ConfigError::Validation(
				"domain.version must not be empty".to_string(),
			));
		}
		if self.domain.chain_id == 0 {
			return Err(ConfigError::Validation(
				"domain.chain_id must be nonzero".to_string(),
			));
		}
		if self.domain.verifying_contract == Address::ZERO {
			return Err(ConfigError::Validation(
				"domain.verifying_contract must not be the zero address".to_string(),
			));
		}
		if self.fees.referral_fee_bps > 10_000 {
			return Err(ConfigError::Validation(format!(
				"fees.referral_fee_bps must be at most 10000, got {}",
				self.fees.referral_fee_bps
			)));
		}
		if self.payment.token == Address::ZERO {
			return Err(ConfigError::Validation(
				"payment.token must not be the zero address".to_string(),
			));
		}
		if let Some(allowed) = &self.collections.allowed {
			if allowed.is_empty() {
				return Err(ConfigError::Validation(
					"collections.allowed must not be empty when present; omit it to allow all"
						.to_string(),
				));
			}
			if allowed.contains(&Address::ZERO) {
				return Err(ConfigError::Validation(
					"collections.allowed must not contain the zero address".to_string(),
				));
			}
		}
		if self.api.enabled {
			if self.api.host.is_empty() {
				return Err(ConfigError::Validation(
					"api.host must not be empty".to_string(),
				));
			}
			if self.api.port == 0 {
				return Err(ConfigError::Validation(
					"api.port must be nonzero".to_string(),
				));
			}
		}
		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let config: Config = toml::from_str(s)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const FULL_CONFIG: &str = r#"
		[domain]
		name = "Aristoswap"
		version = "1.0"
		chain_id = 25
		verifying_contract = "0x1111111111111111111111111111111111111111"

		[fees]
		referral_fee_bps = 250

		[payment]
		token = "0x2222222222222222222222222222222222222222"

		[collections]
		allowed = [
			"0x3333333333333333333333333333333333333333",
			"0x4444444444444444444444444444444444444444",
		]

		[api]
		enabled = true
		host = "127.0.0.1"
		port = 8080
	"#;

	#[test]
	fn parses_full_config() {
		let config: Config = FULL_CONFIG.parse().unwrap();
		assert_eq!(config.domain.chain_id, 25);
		assert_eq!(config.fees.referral_fee_bps, 250);
		assert_eq!(config.collections.allowed.as_ref().unwrap().len(), 2);
		assert!(config.api.enabled);
	}

	#[test]
	fn defaults_fill_optional_sections() {
		let config: Config = r#"
			[domain]
			chain_id = 25
			verifying_contract = "0x1111111111111111111111111111111111111111"

			[payment]
			token = "0x2222222222222222222222222222222222222222"
		"#
		.parse()
		.unwrap();
		assert_eq!(config.domain.name, "Aristoswap");
		assert_eq!(config.domain.version, "1.0");
		assert_eq!(config.fees.referral_fee_bps, 0);
		assert!(config.collections.allowed.is_none());
		assert_eq!(config.api.port, 8080);
	}

	#[test]
	fn rejects_missing_domain() {
		let result: Result<Config, _> = r#"
			[payment]
			token = "0x2222222222222222222222222222222222222222"
		"#
		.parse();
		assert!(matches!(result, Err(ConfigError::Parse(_))));
	}

	#[test]
	fn rejects_zero_chain_id() {
		let result: Result<Config, _> = r#"
			[domain]
			chain_id = 0
			verifying_contract = "0x1111111111111111111111111111111111111111"

			[payment]
			token = "0x2222222222222222222222222222222222222222"
		"#
		.parse();
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn rejects_excessive_fee() {
		let result: Result<Config, _> = r#"
			[domain]
			chain_id = 25
			verifying_contract = "0x1111111111111111111111111111111111111111"

			[fees]
			referral_fee_bps = 10001

			[payment]
			token = "0x2222222222222222222222222222222222222222"
		"#
		.parse();
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn rejects_empty_allow_list() {
		let result: Result<Config, _> = r#"
			[domain]
			chain_id = 25
			verifying_contract = "0x1111111111111111111111111111111111111111"

			[payment]
			token = "0x2222222222222222222222222222222222222222"

			[collections]
			allowed = []
		"#
		.parse();
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn domain_config_converts() {
		let config: Config = FULL_CONFIG.parse().unwrap();
		let domain = config.domain.to_domain();
		assert_eq!(domain.name, "Aristoswap");
		assert_eq!(domain.chain_id, 25);
	}
}
