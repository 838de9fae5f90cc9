use crate::auth::session::{
    clear_session_cookie, cookie_value, issue_token, session_cookie, verify_token, SESSION_COOKIE,
};
use crate::transport::http::types::{
    json_400, AckResponse, AppState, ErrorBody, GenerateSessionRequest, SessionResponse,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/generateJWT",
    request_body = GenerateSessionRequest,
    responses(
        (status = 200, description = "Session issued; cookie set", body = AckResponse),
        (status = 400, description = "Missing address", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn generate_jwt_handler(
    State(state): State<AppState>,
    request: Result<Json<GenerateSessionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_400(e, "{address}").into_response(),
    };

    if request.address.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: "Address is required.".to_string(),
            }),
        )
            .into_response();
    }

    match issue_token(&state.config.jwt_secret, &request.address) {
        Ok(token) => (
            StatusCode::OK,
            [(header::SET_COOKIE, session_cookie(&token))],
            Json(AckResponse { success: true }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "error issuing session token");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    message: "Internal server error".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = AckResponse)
    )
)]
pub async fn logout_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(AckResponse { success: true }),
    )
}

#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 401, description = "No valid session", body = SessionResponse)
    )
)]
pub async fn session_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some(token) = cookie_value(&headers, SESSION_COOKIE) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(SessionResponse {
                logged_in: false,
                address: None,
                error: None,
            }),
        );
    };

    match verify_token(&state.config.jwt_secret, token) {
        Some(claims) => (
            StatusCode::OK,
            Json(SessionResponse {
                logged_in: true,
                address: Some(claims.address),
                error: None,
            }),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(SessionResponse {
                logged_in: false,
                address: None,
                error: Some("invalid or expired session token".to_string()),
            }),
        ),
    }
}
