use crate::app::store::CommentRow;
use crate::domain::directory::Profile;
use crate::transport::http::handlers::{comments, health, profiles, session, tokens};
use crate::transport::http::types::{
    AckResponse, BalanceRequest, BalanceResponse, CommentRequest, DeleteCommentRequest, ErrorBody,
    GenerateSessionRequest, MintRequest, PayoutRequest, ReportCommentRequest, SessionResponse,
    TxHashResponse, VoteRequest,
};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        comments::comment_handler,
        comments::delete_comment_handler,
        comments::report_comment_handler,
        comments::vote_handler,
        comments::init_data_handler,
        session::generate_jwt_handler,
        session::logout_handler,
        session::session_handler,
        tokens::check_balance_handler,
        tokens::mint_handler,
        tokens::payout_handler,
        profiles::profiles_handler
    ),
    components(schemas(
        CommentRequest,
        DeleteCommentRequest,
        ReportCommentRequest,
        VoteRequest,
        GenerateSessionRequest,
        BalanceRequest,
        MintRequest,
        PayoutRequest,
        AckResponse,
        SessionResponse,
        BalanceResponse,
        TxHashResponse,
        ErrorBody,
        CommentRow,
        Profile
    ))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/comment", post(comments::comment_handler))
        .route("/api/delete-comment", post(comments::delete_comment_handler))
        .route("/api/report-comment", post(comments::report_comment_handler))
        .route("/api/vote", post(comments::vote_handler))
        .route("/api/init-data", get(comments::init_data_handler))
        .route("/api/generateJWT", post(session::generate_jwt_handler))
        .route("/api/logout", get(session::logout_handler))
        .route("/api/session", get(session::session_handler))
        .route("/api/checkBalance", post(tokens::check_balance_handler))
        .route("/api/mint", post(tokens::mint_handler))
        .route("/api/payout", post(tokens::payout_handler))
        .route("/api/profiles", get(profiles::profiles_handler))
        .with_state(app_state)
}
