use crate::app::store::CommentRow;
use crate::auth::SessionAddress;
use crate::domain::vote::VoteKind;
use crate::transport::http::types::{
    json_400, AckResponse, AppState, CommentRequest, DeleteCommentRequest, ErrorBody,
    ReportCommentRequest, VoteRequest,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

fn internal_error() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            message: "Internal server error".to_string(),
        }),
    )
}

#[utoipa::path(
    post,
    path = "/api/comment",
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment created", body = AckResponse),
        (status = 400, description = "Invalid request body", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn comment_handler(
    State(state): State<AppState>,
    SessionAddress(address): SessionAddress,
    request: Result<Json<CommentRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_400(e, "{targetId, author, authorAddress, content}").into_response()
        }
    };

    if request.author.trim().is_empty() || request.content.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: "Author and content are required.".to_string(),
            }),
        )
            .into_response();
    }

    // The row is attributed to the session address; a body that claims a
    // different address is rejected instead of trusted.
    if !request.author_address.is_empty() && request.author_address != address {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: "authorAddress does not match the session.".to_string(),
            }),
        )
            .into_response();
    }

    match state
        .store
        .insert_comment(
            request.target_id,
            &request.author,
            &address,
            &request.content,
            Utc::now(),
        )
        .await
    {
        Ok(_id) => (StatusCode::OK, Json(AckResponse { success: true })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "error adding comment");
            internal_error().into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/delete-comment",
    request_body = DeleteCommentRequest,
    responses(
        (status = 200, description = "Delete applied (zero rows when the caller is not the author)", body = AckResponse),
        (status = 400, description = "Invalid request body", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn delete_comment_handler(
    State(state): State<AppState>,
    SessionAddress(address): SessionAddress,
    request: Result<Json<DeleteCommentRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_400(e, "{id}").into_response(),
    };

    match state.store.delete_comment(request.id, &address).await {
        Ok(rows) => {
            if rows == 0 {
                tracing::debug!(id = request.id, "delete matched no rows for caller");
            }
            (StatusCode::OK, Json(AckResponse { success: true })).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "error deleting comment");
            internal_error().into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/report-comment",
    request_body = ReportCommentRequest,
    responses(
        (status = 200, description = "Comment reported", body = AckResponse),
        (status = 400, description = "Invalid request body", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn report_comment_handler(
    State(state): State<AppState>,
    SessionAddress(address): SessionAddress,
    request: Result<Json<ReportCommentRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_400(e, "{id, reportReason}").into_response(),
    };

    if request.report_reason.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: "Report reason is required.".to_string(),
            }),
        )
            .into_response();
    }

    match state
        .store
        .report_comment(request.id, &address, &request.report_reason, Utc::now())
        .await
    {
        Ok(_rows) => (StatusCode::OK, Json(AckResponse { success: true })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "error reporting comment");
            internal_error().into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/vote",
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Vote applied", body = AckResponse),
        (status = 400, description = "Invalid request body", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn vote_handler(
    State(state): State<AppState>,
    SessionAddress(_address): SessionAddress,
    request: Result<Json<VoteRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_400(e, "{id, vote, voteAmount}").into_response(),
    };

    if request.vote_amount < 1 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: "voteAmount must be a positive integer.".to_string(),
            }),
        )
            .into_response();
    }

    let kind = VoteKind::from_flag(request.vote);
    match state
        .store
        .apply_vote(request.id, kind, request.vote_amount)
        .await
    {
        Ok(_rows) => (StatusCode::OK, Json(AckResponse { success: true })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "error voting");
            internal_error().into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/init-data",
    responses(
        (status = 200, description = "All comment rows", body = [CommentRow]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn init_data_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.list_comments().await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "error loading comments");
            internal_error().into_response()
        }
    }
}
