//! The client side of karma.tech: plays the roles of the browser UI and the
//! wallet extension. `login` runs the connect -> nonce -> sign -> verify ->
//! session-issue sequence with a local Ed25519 keypair and then tops up new
//! users; the remaining commands drive the comment, report and vote routes.
//!
//! The session cookie is kept in a small file between invocations so the
//! CLI behaves like a logged-in browser tab.

use anyhow::Context;
use chrono::Utc;
use rand::seq::SliceRandom;
use reqwest::header;
use serde::Deserialize;
use solana_sdk::signer::keypair::read_keypair_file;
use solana_sdk::signer::Signer;

use karma_tech::auth::challenge;
use karma_tech::domain::report;
use karma_tech::infra::solana::{needs_welcome_mint, LOW_BALANCE_THRESHOLD, WELCOME_MINT_TOKENS};
use karma_tech::CommentRow;

#[derive(Debug, Deserialize)]
struct ProfileView {
    id: i64,
    name: String,
    username: String,
    bio: String,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin wallet_client -- [--url http://host:port] <command>\n\
         \n\
         Commands:\n\
           login                              connect the wallet, prove it, start a session\n\
           logout                             clear the session\n\
           session                            show the current session\n\
           profiles [query]                   list (optionally search) the roster\n\
           comments <profile-id>              show a profile's comment thread\n\
           comment <profile-id> <author> <text...>\n\
           delete <comment-id>\n\
           report <comment-id> <reason...>\n\
           vote <comment-id> truth|false <amount>\n\
           payout <note-id> <reason-id>\n\
         \n\
         Env vars: KARMA_API_URL, WALLET_KEYPAIR_PATH, KARMA_SESSION_FILE\n"
    );
    std::process::exit(2);
}

fn session_file_path() -> String {
    let raw = std::env::var("KARMA_SESSION_FILE").unwrap_or_else(|_| "~/.karma-session".into());
    shellexpand::tilde(&raw).to_string()
}

fn load_session_token() -> Option<String> {
    let token = std::fs::read_to_string(session_file_path()).ok()?;
    let token = token.trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

fn save_session_token(token: &str) -> anyhow::Result<()> {
    std::fs::write(session_file_path(), token).context("failed to store the session token")
}

fn clear_session_token() {
    let _ = std::fs::remove_file(session_file_path());
}

fn cookie_header() -> Option<String> {
    load_session_token().map(|token| format!("auth-token={}", token))
}

/// Pulls the session token out of a `Set-Cookie: auth-token=...` header.
fn extract_cookie_token(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| {
            let first = cookie.split(';').next()?.trim();
            let value = first.strip_prefix("auth-token=")?;
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        })
}

fn wallet_keypair() -> anyhow::Result<solana_sdk::signer::keypair::Keypair> {
    let raw =
        std::env::var("WALLET_KEYPAIR_PATH").unwrap_or_else(|_| "~/.config/solana/id.json".into());
    let path = shellexpand::tilde(&raw).to_string();
    read_keypair_file(&path).map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))
}

async fn authed_post(
    client: &reqwest::Client,
    url: String,
    body: serde_json::Value,
) -> anyhow::Result<serde_json::Value> {
    let mut request = client.post(&url).json(&body);
    if let Some(cookie) = cookie_header() {
        request = request.header(header::COOKIE, cookie);
    }
    let response = request.send().await?;
    let status = response.status();
    let value = response.json::<serde_json::Value>().await?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("{} -> {}: {}", url, status, value));
    }
    Ok(value)
}

/// The connect -> sign -> verify -> session-issue sequence, then the
/// check-and-mint step for new users. Any failure aborts the whole flow and
/// leaves the user logged out.
async fn login(client: &reqwest::Client, base_url: &str) -> anyhow::Result<()> {
    let wallet = wallet_keypair()?;
    let address = wallet.pubkey().to_string();
    println!("Wallet connected: {}", address);

    // Challenge/response happens entirely client-side: the server only ever
    // sees the address after the signature checked out.
    let nonce = challenge::login_nonce();
    let message = challenge::login_message(&nonce);
    let signature = challenge::sign_login(&wallet, &message);
    if !challenge::verify_login(&wallet.pubkey(), &message, &signature) {
        return Err(anyhow::anyhow!("Message verification failed."));
    }
    println!("Challenge signature verified.");

    let response = client
        .post(format!("{}/api/generateJWT", base_url))
        .json(&serde_json::json!({ "address": address }))
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(anyhow::anyhow!(
            "Failed to start a session: {}",
            response.status()
        ));
    }
    let token = extract_cookie_token(&response)
        .ok_or_else(|| anyhow::anyhow!("server did not set a session cookie"))?;
    save_session_token(&token)?;
    println!("Logged in as {}", address);

    check_and_mint(client, base_url, &address).await;
    Ok(())
}

/// New users get a welcome mint; a failure here is reported but does not
/// undo the login.
async fn check_and_mint(client: &reqwest::Client, base_url: &str, address: &str) {
    let result = async {
        let balance = authed_post(
            client,
            format!("{}/api/checkBalance", base_url),
            serde_json::json!({ "address": address }),
        )
        .await?;
        let balance = balance["balance"].as_f64().unwrap_or(0.0);

        if needs_welcome_mint(balance) {
            println!(
                "Balance {} below {}; minting {} karma tokens...",
                balance, LOW_BALANCE_THRESHOLD, WELCOME_MINT_TOKENS
            );
            let minted = authed_post(
                client,
                format!("{}/api/mint", base_url),
                serde_json::json!({ "address": address, "amount": WELCOME_MINT_TOKENS }),
            )
            .await?;
            println!(
                "Mint transaction successful. Hash: {}",
                minted["txHash"].as_str().unwrap_or("<missing>")
            );
        } else {
            println!("Balance {} is sufficient.", balance);
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    if let Err(e) = result {
        eprintln!("Error checking balance and minting tokens: {}", e);
    }
}

async fn logout(client: &reqwest::Client, base_url: &str) -> anyhow::Result<()> {
    let mut request = client.get(format!("{}/api/logout", base_url));
    if let Some(cookie) = cookie_header() {
        request = request.header(header::COOKIE, cookie);
    }
    let response = request.send().await?;
    clear_session_token();
    if response.status().is_success() {
        println!("Logged out.");
    } else {
        println!("Session cleared locally (server answered {}).", response.status());
    }
    Ok(())
}

/// Returns the logged-in address, or an error when there is no session.
async fn session_address(client: &reqwest::Client, base_url: &str) -> anyhow::Result<String> {
    let mut request = client.get(format!("{}/api/session", base_url));
    if let Some(cookie) = cookie_header() {
        request = request.header(header::COOKIE, cookie);
    }
    let value = request.send().await?.json::<serde_json::Value>().await?;
    if value["loggedIn"].as_bool() == Some(true) {
        Ok(value["address"].as_str().unwrap_or_default().to_string())
    } else {
        Err(anyhow::anyhow!("Not logged in. Run `login` first."))
    }
}

async fn show_session(client: &reqwest::Client, base_url: &str) -> anyhow::Result<()> {
    match session_address(client, base_url).await {
        Ok(address) => println!("Logged in as: {}", address),
        Err(_) => println!("Not logged in."),
    }
    Ok(())
}

async fn list_profiles(
    client: &reqwest::Client,
    base_url: &str,
    query: Option<&str>,
) -> anyhow::Result<()> {
    let mut profiles = client
        .get(format!("{}/api/profiles", base_url))
        .send()
        .await?
        .json::<Vec<ProfileView>>()
        .await?;

    if let Some(query) = query {
        let needle = query.to_lowercase();
        profiles.retain(|p| {
            p.name.to_lowercase().contains(&needle) || p.username.to_lowercase().contains(&needle)
        });
    } else {
        // The directory page shows the roster in a fresh order every visit.
        profiles.shuffle(&mut rand::thread_rng());
    }

    if profiles.is_empty() {
        println!("No profiles found");
        return Ok(());
    }
    for p in &profiles {
        println!("#{:<3} {} (@{})", p.id, p.name, p.username);
        println!("     {}", p.bio);
    }
    Ok(())
}

async fn fetch_comments(
    client: &reqwest::Client,
    base_url: &str,
) -> anyhow::Result<Vec<CommentRow>> {
    let rows = client
        .get(format!("{}/api/init-data", base_url))
        .send()
        .await?
        .json::<Vec<CommentRow>>()
        .await?;
    Ok(rows)
}

async fn show_comments(
    client: &reqwest::Client,
    base_url: &str,
    profile_id: i64,
) -> anyhow::Result<()> {
    let rows = fetch_comments(client, base_url).await?;
    let now = Utc::now();
    let mut shown = 0;

    for row in rows.iter().filter(|r| r.target_id == profile_id) {
        shown += 1;
        println!("[{}] {} - {}", row.id, row.author, row.timestamp);
        println!("    {}", row.content);
        println!(
            "    {} likes | {} truth / {} false",
            row.likes, row.truth_votes, row.false_votes
        );
        // Reports are only surfaced inside their windows; the rows keep the
        // flag forever but the client stops showing it.
        if row.reported {
            if let Some(reported_at) = row.report_timestamp {
                if report::report_active(reported_at, now) {
                    let reason = row.report_reason.as_deref().unwrap_or("no reason given");
                    if report::voting_open(reported_at, now) {
                        println!("    REPORTED ({}) - voting open", reason);
                    } else {
                        println!("    REPORTED ({}) - voting closed", reason);
                    }
                }
            }
        }
    }

    if shown == 0 {
        println!("No comments found");
    }
    Ok(())
}

async fn submit_comment(
    client: &reqwest::Client,
    base_url: &str,
    profile_id: i64,
    author: &str,
    content: &str,
) -> anyhow::Result<()> {
    let address = session_address(client, base_url).await?;
    authed_post(
        client,
        format!("{}/api/comment", base_url),
        serde_json::json!({
            "targetId": profile_id,
            "author": author,
            "authorAddress": address,
            "content": content,
        }),
    )
    .await?;
    println!("Comment submitted.");
    Ok(())
}

async fn delete_comment(
    client: &reqwest::Client,
    base_url: &str,
    id: i64,
) -> anyhow::Result<()> {
    authed_post(
        client,
        format!("{}/api/delete-comment", base_url),
        serde_json::json!({ "id": id }),
    )
    .await?;
    println!("Delete submitted (only your own comments are removed).");
    Ok(())
}

async fn report_comment(
    client: &reqwest::Client,
    base_url: &str,
    id: i64,
    reason: &str,
) -> anyhow::Result<()> {
    authed_post(
        client,
        format!("{}/api/report-comment", base_url),
        serde_json::json!({ "id": id, "reportReason": reason }),
    )
    .await?;
    println!("Comment reported.");
    Ok(())
}

async fn vote(
    client: &reqwest::Client,
    base_url: &str,
    id: i64,
    truth: bool,
    amount: i64,
) -> anyhow::Result<()> {
    // The voting window is a client-side rule: only reported comments inside
    // the 72-hour window are offered for voting.
    let rows = fetch_comments(client, base_url).await?;
    let row = rows
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| anyhow::anyhow!("No comment with id {}", id))?;
    if !row.reported {
        return Err(anyhow::anyhow!("Comment {} has not been reported.", id));
    }
    let reported_at = row
        .report_timestamp
        .ok_or_else(|| anyhow::anyhow!("Comment {} has no report timestamp.", id))?;
    if !report::voting_open(reported_at, Utc::now()) {
        return Err(anyhow::anyhow!(
            "The voting window for comment {} has closed.",
            id
        ));
    }

    authed_post(
        client,
        format!("{}/api/vote", base_url),
        serde_json::json!({ "id": id, "vote": truth, "voteAmount": amount }),
    )
    .await?;
    println!(
        "Voted {} with {} karma.",
        if truth { "truth" } else { "false" },
        amount
    );
    Ok(())
}

async fn payout(
    client: &reqwest::Client,
    base_url: &str,
    note_id: u64,
    reason_id: u64,
) -> anyhow::Result<()> {
    let value = authed_post(
        client,
        format!("{}/api/payout", base_url),
        serde_json::json!({ "noteId": note_id, "reasonId": reason_id }),
    )
    .await?;
    println!(
        "Payout transaction successful. Hash: {}",
        value["txHash"].as_str().unwrap_or("<missing>")
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let mut base_url =
        std::env::var("KARMA_API_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
    if args.first().map(String::as_str) == Some("--url") {
        if args.len() < 2 {
            usage_and_exit();
        }
        base_url = args[1].clone();
        args.drain(0..2);
    }
    let base_url = base_url.trim_end_matches('/').to_string();

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let command = args.first().cloned().unwrap_or_default();
    match command.as_str() {
        "login" => login(&client, &base_url).await?,
        "logout" => logout(&client, &base_url).await?,
        "session" => show_session(&client, &base_url).await?,
        "profiles" => {
            list_profiles(&client, &base_url, args.get(1).map(String::as_str)).await?
        }
        "comments" => {
            let id = args.get(1).and_then(|v| v.parse().ok()).unwrap_or_else(|| usage_and_exit());
            show_comments(&client, &base_url, id).await?
        }
        "comment" => {
            if args.len() < 4 {
                usage_and_exit();
            }
            let id = args[1].parse().context("profile id must be a number")?;
            let author = args[2].clone();
            let content = args[3..].join(" ");
            submit_comment(&client, &base_url, id, &author, &content).await?
        }
        "delete" => {
            let id = args.get(1).and_then(|v| v.parse().ok()).unwrap_or_else(|| usage_and_exit());
            delete_comment(&client, &base_url, id).await?
        }
        "report" => {
            if args.len() < 3 {
                usage_and_exit();
            }
            let id = args[1].parse().context("comment id must be a number")?;
            let reason = args[2..].join(" ");
            report_comment(&client, &base_url, id, &reason).await?
        }
        "vote" => {
            if args.len() < 4 {
                usage_and_exit();
            }
            let id = args[1].parse().context("comment id must be a number")?;
            let truth = match args[2].as_str() {
                "truth" => true,
                "false" => false,
                _ => usage_and_exit(),
            };
            let amount = args[3].parse().context("amount must be a number")?;
            vote(&client, &base_url, id, truth, amount).await?
        }
        "payout" => {
            if args.len() < 3 {
                usage_and_exit();
            }
            let note_id = args[1].parse().context("note id must be a number")?;
            let reason_id = args[2].parse().context("reason id must be a number")?;
            payout(&client, &base_url, note_id, reason_id).await?
        }
        _ => usage_and_exit(),
    }

    Ok(())
}
