use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signer::keypair::read_keypair_file;
use solana_sdk::signer::Signer;

use karma_tech::infra::solana::karma_mint_address;
use karma_tech::Config;
use karma_tech::KarmaTokenClient;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--init-mint-if-missing]\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL, JWT_SECRET, SOLANA_RPC_URL, KARMA_PROGRAM_ID\n\
         And the admin keypair:\n\
           ADMIN_KEYPAIR_PATH (default ~/.config/solana/id.json)\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let init_mint_if_missing = args.iter().any(|a| a == "--init-mint-if-missing");

    // Force-read config (nice error messages if missing)
    let config = Config::from_env()?;
    let Some(rpc_url) = config.solana_rpc_url.clone() else {
        return Err(anyhow::anyhow!("SOLANA_RPC_URL must be set for preflight"));
    };
    if config.karma_program_id.is_none() {
        return Err(anyhow::anyhow!("KARMA_PROGRAM_ID must be set for preflight"));
    }

    println!("> Preflight:");
    println!("  SOLANA_RPC_URL={}", rpc_url);
    println!(
        "  KARMA_PROGRAM_ID={}",
        config.karma_program_id.as_deref().unwrap_or_default()
    );

    // Same admin keypair location the service uses.
    let admin_path = shellexpand::tilde(&config.admin_keypair_path).to_string();
    let admin = read_keypair_file(&admin_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", admin_path, e))?;

    let client = RpcClient::new_with_commitment(rpc_url, CommitmentConfig::confirmed());

    // Basic RPC connectivity
    let version = client.get_version().await?;
    println!("  RPC version: {}", version.solana_core);

    // Admin balance
    let balance_lamports = client.get_balance(&admin.pubkey()).await?;
    let sol = balance_lamports as f64 / 1_000_000_000_f64;
    println!("  Admin: {}", admin.pubkey());
    println!(
        "  Admin balance: {} lamports (~{:.6} SOL)",
        balance_lamports, sol
    );
    if balance_lamports < 10_000_000 {
        eprintln!("  Warning: admin balance looks low; transactions may fail.");
    }

    // Program account existence
    let connector = KarmaTokenClient::from_config(&config)?
        .ok_or_else(|| anyhow::anyhow!("wallet connector configuration incomplete"))?;
    let program_id = connector.program_id();
    let program_acct = client.get_account(&program_id).await.map_err(|e| {
        anyhow::anyhow!("Program account not found on cluster: {} ({})", program_id, e)
    })?;
    if !program_acct.executable {
        eprintln!("  Warning: program account exists but is not marked executable.");
    } else {
        println!("  Program account is deployed + executable.");
    }

    // Mint PDA existence
    let (mint, _bump) = karma_mint_address(&program_id);
    println!("  Karma mint PDA: {}", mint);

    let mint_exists = client.get_account(&mint).await.is_ok();
    if mint_exists {
        println!("  Mint account exists.");
    } else if init_mint_if_missing {
        println!("  Mint missing -> initializing karma mint on-chain...");
        connector.initialize_mint().await?;
        // Recheck
        client
            .get_account(&mint)
            .await
            .map_err(|e| anyhow::anyhow!("Mint still missing after initialize: {}", e))?;
        println!("  Mint initialized successfully.");
    } else {
        return Err(anyhow::anyhow!(
            "Karma mint does not exist. Re-run with --init-mint-if-missing"
        ));
    }

    // Balance readable for the admin's own account
    let admin_karma = connector.token_balance(&admin.pubkey().to_string()).await?;
    println!("  Admin karma balance readable (ok): {}", admin_karma);

    println!("> Preflight OK.");
    Ok(())
}
