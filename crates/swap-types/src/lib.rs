//! Common types module for the Aristoswap engine.
//!
//! This module defines the core data types and structures used throughout
//! the swap engine. It provides a centralized location for shared types
//! to ensure consistency across all engine components.

/// EIP-712 typed-data hashing for swap intents and domains.
pub mod eip712;
/// Event types for observing swap execution and cancellation.
pub mod events;
/// Transfer plan types produced by the matcher and consumed by the orchestrator.
pub mod plan;
/// Swap intents, signed inputs and the asset model.
pub mod swap;

// Re-export all types for convenient access
pub use eip712::{domain_hash, final_digest, swap_digest, swap_struct_hash, SwapDomain};
pub use events::*;
pub use plan::*;
pub use swap::*;
