//! Wallet connect + session flow test:
//! 1) A locally generated wallet signs the login challenge and the client
//!    verifies the signature before asking for a session.
//! 2) /api/session reflects the cookie, /api/logout clears it.
//! 3) The profile roster is served, and token routes answer 500 while the
//!    wallet connector is unconfigured.
//!
//! Requires a running Postgres (DATABASE_URL); the test skips itself when
//! the variable is unset.

use serde_json::json;
use std::env;
use std::sync::Arc;

use solana_sdk::signer::keypair::Keypair;
use solana_sdk::signer::Signer;

use karma_tech::auth::challenge;
use karma_tech::{transport, CommentStore, Config};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_wallet_session_flow() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    if env::var("DATABASE_URL").is_err() {
        eprintln!("skipping test_wallet_session_flow: DATABASE_URL not set");
        return Ok(());
    }
    if env::var("JWT_SECRET").is_err() {
        env::set_var("JWT_SECRET", "integration-test-secret");
    }

    let base_url = "http://127.0.0.1:3211";
    let config = Arc::new(Config::from_env()?);
    let store = Arc::new(CommentStore::connect(&config).await?);
    let state = transport::http::AppState {
        store,
        chain: None,
        config,
    };
    let router = transport::http::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:3211").await?;
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    for _ in 0..30 {
        match tokio::net::TcpStream::connect("127.0.0.1:3211").await {
            Ok(_) => break,
            Err(_) => tokio::time::sleep(tokio::time::Duration::from_millis(100)).await,
        }
    }

    let client = reqwest::Client::builder().cookie_store(true).build()?;

    // No cookie yet: the session probe is a 401.
    let probe = client.get(format!("{}/api/session", base_url)).send().await?;
    assert_eq!(probe.status(), 401);
    assert_eq!(
        probe.json::<serde_json::Value>().await?["loggedIn"],
        json!(false)
    );

    // The wallet proves itself locally before any session is requested.
    let wallet = Keypair::new();
    let address = wallet.pubkey().to_string();
    let nonce = challenge::login_nonce();
    let message = challenge::login_message(&nonce);
    let signature = challenge::sign_login(&wallet, &message);
    assert!(challenge::verify_login(&wallet.pubkey(), &message, &signature));

    let login = client
        .post(format!("{}/api/generateJWT", base_url))
        .json(&json!({ "address": address }))
        .send()
        .await?;
    assert_eq!(login.status(), 200);
    let set_cookie = login
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(set_cookie.starts_with("auth-token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));

    // The cookie now authenticates the session probe.
    let probe = client.get(format!("{}/api/session", base_url)).send().await?;
    assert_eq!(probe.status(), 200);
    let body = probe.json::<serde_json::Value>().await?;
    assert_eq!(body["loggedIn"], json!(true));
    assert_eq!(body["address"], json!(address));

    // An empty address is a validation error, not a session.
    let rejected = client
        .post(format!("{}/api/generateJWT", base_url))
        .json(&json!({ "address": "" }))
        .send()
        .await?;
    assert_eq!(rejected.status(), 400);

    // The static roster is served as-is.
    let profiles = client
        .get(format!("{}/api/profiles", base_url))
        .send()
        .await?
        .json::<Vec<serde_json::Value>>()
        .await?;
    assert_eq!(profiles.len(), 14);
    assert!(profiles
        .iter()
        .any(|p| p["username"] == json!("OlimpioCrypto")));

    // Token routes fail closed while the wallet connector is unconfigured.
    let balance = client
        .post(format!("{}/api/checkBalance", base_url))
        .json(&json!({ "address": address }))
        .send()
        .await?;
    assert_eq!(balance.status(), 500);
    assert_eq!(
        balance.json::<serde_json::Value>().await?["balance"],
        json!(0.0)
    );

    let missing = client
        .post(format!("{}/api/checkBalance", base_url))
        .json(&json!({ "address": "" }))
        .send()
        .await?;
    assert_eq!(missing.status(), 400);

    let mint = client
        .post(format!("{}/api/mint", base_url))
        .json(&json!({ "address": address, "amount": 30000 }))
        .send()
        .await?;
    assert_eq!(mint.status(), 500);

    // Logout clears the cookie and the probe goes back to 401.
    let logout = client.get(format!("{}/api/logout", base_url)).send().await?;
    assert_eq!(logout.status(), 200);

    let probe = client.get(format!("{}/api/session", base_url)).send().await?;
    assert_eq!(probe.status(), 401);

    Ok(())
}
