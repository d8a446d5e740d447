//! HTTP server for the Aristoswap API.
//!
//! Exposes the engine's query surface (nonces, digests) and mutating
//! surface (cancel, match) over JSON, plus mint/approve endpoints that
//! stand in for the mock token contracts of a development deployment.
//! This is a trusted-relayer harness: callers assert their own identity.

use alloy_primitives::{Address, B256, U256};
use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Json},
	routing::{get, post},
	Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use swap_config::ApiConfig;
use swap_core::{SwapEngine, SwapError};
use swap_ledger::implementations::memory::MemoryAssetLedger;
use swap_types::{SignedInput, SwapIntent, SwapReceipt};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the swap engine for processing requests.
	pub engine: Arc<SwapEngine>,
	/// The development ledger behind the engine, for mint/approve.
	pub ledger: Arc<MemoryAssetLedger>,
}

/// Starts the HTTP server for the API.
pub async fn start_server(
	api_config: ApiConfig,
	engine: Arc<SwapEngine>,
	ledger: Arc<MemoryAssetLedger>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app_state = AppState { engine, ledger };

	let app = Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/nonce/{address}", get(handle_nonce))
				.route("/digest", post(handle_digest))
				.route("/cancel", post(handle_cancel))
				.route("/swaps", post(handle_swap))
				.route("/dev/mint", post(handle_mint))
				.route("/dev/approve", post(handle_approve)),
		)
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(app_state);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Aristoswap API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Response for GET /api/nonce/{address}.
#[derive(Debug, Serialize)]
struct NonceResponse {
	trader: Address,
	nonce: U256,
}

/// Request body for POST /api/digest.
#[derive(Debug, Deserialize)]
struct DigestRequest {
	intent: SwapIntent,
	/// Nonce to build the digest against; defaults to the trader's
	/// current nonce.
	nonce: Option<U256>,
}

/// Response for POST /api/digest.
#[derive(Debug, Serialize)]
struct DigestResponse {
	digest: B256,
	nonce: U256,
}

/// Request body for POST /api/cancel.
#[derive(Debug, Deserialize)]
struct CancelRequest {
	trader: Address,
}

/// Response for POST /api/cancel.
#[derive(Debug, Serialize)]
struct CancelResponse {
	trader: Address,
	new_nonce: U256,
}

/// Request body for POST /api/swaps.
#[derive(Debug, Deserialize)]
struct SwapRequest {
	/// Address submitting the match; a trader naming themself may leave
	/// their own package unsigned.
	caller: Address,
	maker: SignedInput,
	taker: SignedInput,
	#[serde(default)]
	referrer: Option<Address>,
}

/// Request body for POST /api/dev/mint.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum MintRequest {
	Unique {
		collection: Address,
		to: Address,
		token_id: U256,
	},
	Quantity {
		collection: Address,
		to: Address,
		token_id: U256,
		quantity: U256,
	},
	Payment {
		to: Address,
		amount: U256,
	},
}

/// Request body for POST /api/dev/approve.
#[derive(Debug, Deserialize)]
struct ApproveRequest {
	holder: Address,
	approved: bool,
}

/// Handles GET /api/nonce/{address} requests.
async fn handle_nonce(
	Path(address): Path<Address>,
	State(state): State<AppState>,
) -> Json<NonceResponse> {
	let nonce = state.engine.current_nonce(address).await;
	Json(NonceResponse {
		trader: address,
		nonce,
	})
}

/// Handles POST /api/digest requests.
///
/// Off-chain signers use this to learn the exact digest to sign for an
/// intent under the current (or an explicit) nonce.
async fn handle_digest(
	State(state): State<AppState>,
	Json(request): Json<DigestRequest>,
) -> Result<Json<DigestResponse>, (StatusCode, Json<serde_json::Value>)> {
	let nonce = match request.nonce {
		Some(nonce) => nonce,
		None => state.engine.current_nonce(request.intent.trader).await,
	};
	match state.engine.swap_digest(&request.intent, nonce) {
		Ok(digest) => Ok(Json(DigestResponse { digest, nonce })),
		Err(e) => Err(error_response(&e)),
	}
}

/// Handles POST /api/cancel requests.
async fn handle_cancel(
	State(state): State<AppState>,
	Json(request): Json<CancelRequest>,
) -> Json<CancelResponse> {
	let new_nonce = state.engine.cancel(request.trader).await;
	Json(CancelResponse {
		trader: request.trader,
		new_nonce,
	})
}

/// Handles POST /api/swaps requests.
async fn handle_swap(
	State(state): State<AppState>,
	Json(request): Json<SwapRequest>,
) -> Result<Json<SwapReceipt>, (StatusCode, Json<serde_json::Value>)> {
	let referrer = request.referrer.unwrap_or(Address::ZERO);
	match state
		.engine
		.execute_swap(request.caller, &request.maker, &request.taker, referrer)
		.await
	{
		Ok(receipt) => Ok(Json(receipt)),
		Err(e) => {
			tracing::warn!("Swap request failed: {}", e);
			Err(error_response(&e))
		},
	}
}

/// Handles POST /api/dev/mint requests.
async fn handle_mint(
	State(state): State<AppState>,
	Json(request): Json<MintRequest>,
) -> impl IntoResponse {
	match request {
		MintRequest::Unique {
			collection,
			to,
			token_id,
		} => state.ledger.mint_unique(collection, to, token_id).await,
		MintRequest::Quantity {
			collection,
			to,
			token_id,
			quantity,
		} => {
			state
				.ledger
				.mint_quantity(collection, to, token_id, quantity)
				.await
		},
		MintRequest::Payment { to, amount } => state.ledger.mint_payment(to, amount).await,
	}
	StatusCode::NO_CONTENT
}

/// Handles POST /api/dev/approve requests.
async fn handle_approve(
	State(state): State<AppState>,
	Json(request): Json<ApproveRequest>,
) -> impl IntoResponse {
	state
		.ledger
		.set_operator_approval(request.holder, request.approved)
		.await;
	StatusCode::NO_CONTENT
}

/// Maps an engine error to an HTTP status plus a JSON error body.
fn error_response(error: &SwapError) -> (StatusCode, Json<serde_json::Value>) {
	let status = match error {
		SwapError::MalformedIntent(_)
		| SwapError::CollectionNotAllowed(_)
		| SwapError::TermsMismatch
		| SwapError::BalanceMismatch => StatusCode::BAD_REQUEST,
		SwapError::InvalidSignature(_) => StatusCode::UNAUTHORIZED,
		SwapError::StaleNonce(_) => StatusCode::CONFLICT,
		SwapError::AssetTransferFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
	};
	(
		status,
		Json(serde_json::json!({ "error": error.to_string() })),
	)
}
