//! Comment lifecycle test:
//! 1) Unauthenticated mutations are rejected and touch nothing.
//! 2) A session cookie from /api/generateJWT unlocks the comment routes.
//! 3) Votes move exactly one counter; reports record who/why/when; deletes
//!    are scoped to the author.
//!
//! Requires a running Postgres (DATABASE_URL); the test skips itself when
//! the variable is unset.

use serde_json::json;
use std::env;
use std::sync::Arc;

use karma_tech::{transport, CommentStore, Config};

async fn start_server(addr: &str) -> Result<Arc<CommentStore>, Box<dyn std::error::Error>> {
    let config = Arc::new(Config::from_env()?);
    let store = Arc::new(CommentStore::connect(&config).await?);

    let state = transport::http::AppState {
        store: store.clone(),
        chain: None,
        config,
    };
    let router = transport::http::create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    // Wait for the server to be ready
    for _ in 0..30 {
        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => break,
            Err(_) => tokio::time::sleep(tokio::time::Duration::from_millis(100)).await,
        }
    }

    Ok(store)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_comment_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    if env::var("DATABASE_URL").is_err() {
        eprintln!("skipping test_comment_lifecycle: DATABASE_URL not set");
        return Ok(());
    }
    if env::var("JWT_SECRET").is_err() {
        env::set_var("JWT_SECRET", "integration-test-secret");
    }

    let base_url = "http://127.0.0.1:3210";
    let store = start_server("127.0.0.1:3210").await?;
    sqlx::query("TRUNCATE comments").execute(store.pool()).await?;

    let author = reqwest::Client::builder().cookie_store(true).build()?;
    let stranger = reqwest::Client::builder().cookie_store(true).build()?;

    // Unauthenticated mutation: 401 and no row appears.
    let denied = author
        .post(format!("{}/api/comment", base_url))
        .json(&json!({
            "targetId": 1, "author": "greg", "authorAddress": "0xabc", "content": "hello"
        }))
        .send()
        .await?;
    assert_eq!(denied.status(), 401);

    let rows = author
        .get(format!("{}/api/init-data", base_url))
        .send()
        .await?
        .json::<Vec<serde_json::Value>>()
        .await?;
    assert!(rows.is_empty(), "401 must not insert anything");

    // Log in as the author.
    let login = author
        .post(format!("{}/api/generateJWT", base_url))
        .json(&json!({ "address": "0xabc" }))
        .send()
        .await?;
    assert_eq!(login.status(), 200);
    assert_eq!(
        login.json::<serde_json::Value>().await?["success"],
        json!(true)
    );

    // A body address that disagrees with the session is rejected.
    let spoofed = author
        .post(format!("{}/api/comment", base_url))
        .json(&json!({
            "targetId": 1, "author": "greg", "authorAddress": "0xzzz", "content": "hello"
        }))
        .send()
        .await?;
    assert_eq!(spoofed.status(), 400);

    // Create a comment.
    let created = author
        .post(format!("{}/api/comment", base_url))
        .json(&json!({
            "targetId": 1, "author": "greg", "authorAddress": "0xabc", "content": "hello"
        }))
        .send()
        .await?;
    assert_eq!(created.status(), 200);

    let rows = author
        .get(format!("{}/api/init-data", base_url))
        .send()
        .await?
        .json::<Vec<serde_json::Value>>()
        .await?;
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["authorAddress"], json!("0xabc"));
    assert_eq!(row["content"], json!("hello"));
    assert!(row["timestamp"].is_string(), "timestamp must be set");
    assert_eq!(row["truthVotes"], json!(0));
    assert_eq!(row["falseVotes"], json!(0));
    let id = row["id"].as_i64().unwrap();

    // Votes move exactly the targeted counter.
    let vote = author
        .post(format!("{}/api/vote", base_url))
        .json(&json!({ "id": id, "vote": true, "voteAmount": 5 }))
        .send()
        .await?;
    assert_eq!(vote.status(), 200);

    let vote = author
        .post(format!("{}/api/vote", base_url))
        .json(&json!({ "id": id, "vote": false, "voteAmount": 2 }))
        .send()
        .await?;
    assert_eq!(vote.status(), 200);

    let rows = author
        .get(format!("{}/api/init-data", base_url))
        .send()
        .await?
        .json::<Vec<serde_json::Value>>()
        .await?;
    assert_eq!(rows[0]["truthVotes"], json!(5));
    assert_eq!(rows[0]["falseVotes"], json!(2));

    // Non-positive vote amounts are a validation error.
    let rejected = author
        .post(format!("{}/api/vote", base_url))
        .json(&json!({ "id": id, "vote": true, "voteAmount": 0 }))
        .send()
        .await?;
    assert_eq!(rejected.status(), 400);

    // Report records who, why and when.
    let reported = author
        .post(format!("{}/api/report-comment", base_url))
        .json(&json!({ "id": id, "reportReason": "spam" }))
        .send()
        .await?;
    assert_eq!(reported.status(), 200);

    let rows = author
        .get(format!("{}/api/init-data", base_url))
        .send()
        .await?
        .json::<Vec<serde_json::Value>>()
        .await?;
    assert_eq!(rows[0]["reported"], json!(true));
    assert_eq!(rows[0]["reportedBy"], json!("0xabc"));
    assert_eq!(rows[0]["reportReason"], json!("spam"));
    assert!(rows[0]["reportTimestamp"].is_string());

    // A different session cannot delete the author's comment.
    let login = stranger
        .post(format!("{}/api/generateJWT", base_url))
        .json(&json!({ "address": "0xother" }))
        .send()
        .await?;
    assert_eq!(login.status(), 200);

    let foreign_delete = stranger
        .post(format!("{}/api/delete-comment", base_url))
        .json(&json!({ "id": id }))
        .send()
        .await?;
    assert_eq!(foreign_delete.status(), 200);

    let rows = author
        .get(format!("{}/api/init-data", base_url))
        .send()
        .await?
        .json::<Vec<serde_json::Value>>()
        .await?;
    assert_eq!(rows.len(), 1, "non-author delete must leave the row intact");

    // The author can delete their own comment.
    let own_delete = author
        .post(format!("{}/api/delete-comment", base_url))
        .json(&json!({ "id": id }))
        .send()
        .await?;
    assert_eq!(own_delete.status(), 200);

    let rows = author
        .get(format!("{}/api/init-data", base_url))
        .send()
        .await?
        .json::<Vec<serde_json::Value>>()
        .await?;
    assert!(rows.is_empty());

    // Logging out invalidates the cookie for future mutations.
    let logout = author.get(format!("{}/api/logout", base_url)).send().await?;
    assert_eq!(logout.status(), 200);

    let denied = author
        .post(format!("{}/api/comment", base_url))
        .json(&json!({
            "targetId": 1, "author": "greg", "authorAddress": "0xabc", "content": "again"
        }))
        .send()
        .await?;
    assert_eq!(denied.status(), 401);

    Ok(())
}
