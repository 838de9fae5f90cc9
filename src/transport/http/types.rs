use crate::app::store::CommentStore;
use crate::infra::config::Config;
use crate::infra::solana::KarmaTokenClient;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CommentStore>,
    /// `None` when the chain env vars are absent; token routes answer 500.
    pub chain: Option<Arc<KarmaTokenClient>>,
    pub config: Arc<Config>,
}

// -- Request bodies (wire keys are camelCase, per the browser client) --

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub target_id: i64,
    pub author: String,
    pub author_address: String,
    pub content: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct DeleteCommentRequest {
    pub id: i64,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportCommentRequest {
    pub id: i64,
    pub report_reason: String,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub id: i64,
    /// `true` votes truth, `false` votes false.
    pub vote: bool,
    pub vote_amount: i64,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct GenerateSessionRequest {
    pub address: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct BalanceRequest {
    pub address: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct MintRequest {
    pub address: String,
    /// Whole karma tokens; decimal scaling happens server-side.
    pub amount: u64,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRequest {
    pub note_id: u64,
    pub reason_id: u64,
}

// -- Response bodies --

#[derive(Serialize, Debug, ToSchema)]
pub struct AckResponse {
    pub success: bool,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct BalanceResponse {
    pub balance: f64,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TxHashResponse {
    pub tx_hash: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

/// Maps a body-level rejection (malformed JSON, missing field) onto the 400
/// the error taxonomy assigns to validation failures.
pub fn json_400(err: JsonRejection, expected: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            message: format!("Invalid request body: {} (expected: {})", err, expected),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_request_uses_camel_case_keys() {
        let req: VoteRequest =
            serde_json::from_str(r#"{"id": 7, "vote": true, "voteAmount": 5}"#).unwrap();
        assert_eq!(req.id, 7);
        assert!(req.vote);
        assert_eq!(req.vote_amount, 5);
    }

    #[test]
    fn comment_request_uses_camel_case_keys() {
        let req: CommentRequest = serde_json::from_str(
            r#"{"targetId": 1, "author": "greg", "authorAddress": "0xabc", "content": "hello"}"#,
        )
        .unwrap();
        assert_eq!(req.target_id, 1);
        assert_eq!(req.author_address, "0xabc");
    }

    #[test]
    fn session_response_omits_absent_fields() {
        let body = serde_json::to_value(SessionResponse {
            logged_in: false,
            address: None,
            error: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"loggedIn": false}));
    }

    #[test]
    fn tx_hash_serializes_camel_case() {
        let body = serde_json::to_value(TxHashResponse {
            tx_hash: "sig".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"txHash": "sig"}));
    }
}
