use crate::auth::SessionAddress;
use crate::transport::http::types::{
    json_400, AppState, BalanceRequest, BalanceResponse, ErrorBody, MintRequest, PayoutRequest,
    TxHashResponse,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/checkBalance",
    request_body = BalanceRequest,
    responses(
        (status = 200, description = "Decimal-adjusted karma balance (zero when the account is absent)", body = BalanceResponse),
        (status = 400, description = "Missing address", body = ErrorBody),
        (status = 500, description = "Lookup failed; balance reported as zero", body = BalanceResponse)
    )
)]
pub async fn check_balance_handler(
    State(state): State<AppState>,
    request: Result<Json<BalanceRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_400(e, "{address}").into_response(),
    };

    if request.address.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: "User address is required.".to_string(),
            }),
        )
            .into_response();
    }

    let Some(chain) = state.chain.as_ref() else {
        tracing::error!("balance requested but the wallet connector is not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(BalanceResponse { balance: 0.0 }),
        )
            .into_response();
    };

    match chain.token_balance(&request.address).await {
        Ok(balance) => (StatusCode::OK, Json(BalanceResponse { balance })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "error when fetching token balance");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BalanceResponse { balance: 0.0 }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/mint",
    request_body = MintRequest,
    responses(
        (status = 200, description = "Mint confirmed", body = TxHashResponse),
        (status = 400, description = "Missing address or amount", body = ErrorBody),
        (status = 500, description = "Mint failed", body = ErrorBody)
    )
)]
pub async fn mint_handler(
    State(state): State<AppState>,
    request: Result<Json<MintRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_400(e, "{address, amount}").into_response(),
    };

    if request.address.trim().is_empty() || request.amount == 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: "Address and amount are required.".to_string(),
            }),
        )
            .into_response();
    }

    let mint_failed = || {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "success": false,
                "message": "Error when minting tokens."
            })),
        )
    };

    let Some(chain) = state.chain.as_ref() else {
        tracing::error!("mint requested but the wallet connector is not configured");
        return mint_failed().into_response();
    };

    match chain.mint(&request.address, request.amount).await {
        Ok(tx_hash) => (StatusCode::OK, Json(TxHashResponse { tx_hash })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "error when minting tokens");
            mint_failed().into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/payout",
    request_body = PayoutRequest,
    responses(
        (status = 200, description = "Payout confirmed", body = TxHashResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 500, description = "Payout failed", body = ErrorBody)
    )
)]
pub async fn payout_handler(
    State(state): State<AppState>,
    SessionAddress(_address): SessionAddress,
    request: Result<Json<PayoutRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_400(e, "{noteId, reasonId}").into_response(),
    };

    let internal = || {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                message: "Internal server error".to_string(),
            }),
        )
    };

    let Some(chain) = state.chain.as_ref() else {
        tracing::error!("payout requested but the wallet connector is not configured");
        return internal().into_response();
    };

    match chain.payout(request.note_id, request.reason_id).await {
        Ok(tx_hash) => (StatusCode::OK, Json(TxHashResponse { tx_hash })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "error processing payout");
            internal().into_response()
        }
    }
}
