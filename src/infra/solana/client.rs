// Responsible for all communication with the Solana blockchain.

use anyhow::Context;
use solana_client::client_error::ClientErrorKind;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    signer::{keypair::read_keypair_file, keypair::Keypair, Signer},
    transaction::Transaction,
};
use std::str::FromStr;

use crate::infra::config::Config;

/// The karma token carries 7 decimal places on-chain.
pub const KARMA_DECIMALS: u32 = 7;

/// Below this balance a fresh login is topped up.
pub const LOW_BALANCE_THRESHOLD: f64 = 500.0;

/// Whole karma tokens granted by the welcome mint.
pub const WELCOME_MINT_TOKENS: u64 = 30_000;

/// Whether a queried balance qualifies for the welcome mint.
pub fn needs_welcome_mint(balance: f64) -> bool {
    balance < LOW_BALANCE_THRESHOLD
}

const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
const ASSOCIATED_TOKEN_PROGRAM_ID: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";

/// Server-side wallet connector: holds the custodial admin keypair and
/// submits mint/payout calls against the karma token program. A fresh RPC
/// client is created per call; every call blocks on confirmed commitment.
pub struct KarmaTokenClient {
    rpc_url: String,
    program_id: Pubkey,
    admin: Keypair,
}

impl KarmaTokenClient {
    /// Builds the connector from configuration. Returns `None` when the
    /// chain variables are absent, so the service can run database-only.
    pub fn from_config(config: &Config) -> anyhow::Result<Option<Self>> {
        let (Some(rpc_url), Some(program_id)) = (
            config.solana_rpc_url.clone(),
            config.karma_program_id.as_deref(),
        ) else {
            return Ok(None);
        };

        let program_id = Pubkey::from_str(program_id)
            .map_err(|e| anyhow::anyhow!("KARMA_PROGRAM_ID is not a valid pubkey: {}", e))?;
        let keypair_path = shellexpand::tilde(&config.admin_keypair_path).to_string();
        let admin = read_keypair_file(&keypair_path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", keypair_path, e))?;

        Ok(Some(KarmaTokenClient {
            rpc_url,
            program_id,
            admin,
        }))
    }

    fn client(&self) -> RpcClient {
        RpcClient::new_with_commitment(self.rpc_url.clone(), CommitmentConfig::confirmed())
    }

    pub fn admin_pubkey(&self) -> Pubkey {
        self.admin.pubkey()
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    /// The mint lives at a PDA so every component can derive it from the
    /// program id alone.
    pub fn mint_address(&self) -> Pubkey {
        karma_mint_address(&self.program_id).0
    }

    /// Creates the karma mint on-chain. This only needs to be called once.
    pub async fn initialize_mint(&self) -> anyhow::Result<()> {
        let client = self.client();
        let (mint, _bump) = karma_mint_address(&self.program_id);

        // Check if the mint already exists.
        if client.get_account(&mint).await.is_ok() {
            tracing::info!(mint = %mint, "karma mint already initialized");
            return Ok(());
        }

        let (mint_authority, _bump) = mint_authority_address(&self.program_id);
        let token_program = Pubkey::from_str(TOKEN_PROGRAM_ID)?;

        // Account order must match the program's `Initialize` accounts struct.
        let accounts = vec![
            AccountMeta::new(mint, false),
            AccountMeta::new_readonly(mint_authority, false),
            AccountMeta::new(self.admin.pubkey(), true),
            AccountMeta::new_readonly(token_program, false),
            AccountMeta::new_readonly(solana_program::system_program::ID, false),
        ];

        let instruction = Instruction {
            program_id: self.program_id,
            accounts,
            data: initialize_instruction_data(),
        };
        self.send(instruction).await?;
        tracing::info!(mint = %mint, "karma mint initialized on-chain");
        Ok(())
    }

    /// Mints `tokens` whole karma tokens to `recipient` and returns the
    /// confirmed transaction signature.
    pub async fn mint(&self, recipient: &str, tokens: u64) -> anyhow::Result<String> {
        let recipient = Pubkey::from_str(recipient)
            .map_err(|e| anyhow::anyhow!("Invalid recipient address: {}", e))?;
        let amount = base_units(tokens)?;

        let instruction = self.mint_instruction(&recipient, amount)?;
        let signature = self.send(instruction).await?;
        Ok(signature)
    }

    /// Settles a closed report on-chain. The admin key authorizes the call.
    pub async fn payout(&self, note_id: u64, reason_id: u64) -> anyhow::Result<String> {
        let accounts = vec![AccountMeta::new(self.admin.pubkey(), true)];
        let instruction = Instruction {
            program_id: self.program_id,
            accounts,
            data: payout_instruction_data(note_id, reason_id),
        };
        let signature = self.send(instruction).await?;
        Ok(signature)
    }

    /// Returns the decimal-adjusted karma balance of `address`, or zero when
    /// the token account does not exist on the cluster.
    pub async fn token_balance(&self, address: &str) -> anyhow::Result<f64> {
        let owner = Pubkey::from_str(address)
            .map_err(|e| anyhow::anyhow!("Invalid account address: {}", e))?;
        let (mint, _bump) = karma_mint_address(&self.program_id);
        let token_account = associated_token_address(&owner, &mint)?;

        let client = self.client();
        match client.get_token_account_balance(&token_account).await {
            Ok(balance) => {
                let amount = balance.ui_amount.unwrap_or_else(|| {
                    let raw = balance.amount.parse::<u64>().unwrap_or(0);
                    raw as f64 / 10f64.powi(balance.decimals as i32)
                });
                Ok(amount)
            }
            // The RPC answers with an RPC-level error for accounts that were
            // never created; that is the "no karma yet" case, not a failure.
            Err(err) => {
                if matches!(err.kind(), ClientErrorKind::RpcError(_)) {
                    Ok(0.0)
                } else {
                    Err(err.into())
                }
            }
        }
    }

    fn mint_instruction(&self, recipient: &Pubkey, amount: u64) -> anyhow::Result<Instruction> {
        let (mint, _bump) = karma_mint_address(&self.program_id);
        let (mint_authority, _bump) = mint_authority_address(&self.program_id);
        let recipient_token_account = associated_token_address(recipient, &mint)?;
        let token_program = Pubkey::from_str(TOKEN_PROGRAM_ID)?;
        let associated_token_program = Pubkey::from_str(ASSOCIATED_TOKEN_PROGRAM_ID)?;

        // Account order must match the program's `Mint` accounts struct.
        let accounts = vec![
            AccountMeta::new(mint, false),
            AccountMeta::new_readonly(mint_authority, false),
            AccountMeta::new_readonly(*recipient, false),
            AccountMeta::new(recipient_token_account, false),
            AccountMeta::new(self.admin.pubkey(), true),
            AccountMeta::new_readonly(token_program, false),
            AccountMeta::new_readonly(associated_token_program, false),
            AccountMeta::new_readonly(solana_program::system_program::ID, false),
        ];

        Ok(Instruction {
            program_id: self.program_id,
            accounts,
            data: mint_instruction_data(amount),
        })
    }

    async fn send(&self, instruction: Instruction) -> anyhow::Result<String> {
        let client = self.client();
        let mut transaction =
            Transaction::new_with_payer(&[instruction], Some(&self.admin.pubkey()));
        let recent_blockhash = client.get_latest_blockhash().await?;
        transaction.sign(&[&self.admin], recent_blockhash);
        let signature = client.send_and_confirm_transaction(&transaction).await?;
        Ok(signature.to_string())
    }
}

/// Converts whole karma tokens into on-chain base units.
pub fn base_units(tokens: u64) -> anyhow::Result<u64> {
    tokens
        .checked_mul(10u64.pow(KARMA_DECIMALS))
        .context("token amount overflows base units")
}

/// PDA holding the karma mint, derived from the program id.
pub fn karma_mint_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"karma_mint"], program_id)
}

/// PDA that owns mint authority over the karma mint.
pub fn mint_authority_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"mint_authority"], program_id)
}

/// Standard associated-token-account derivation for `owner` and `mint`.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> anyhow::Result<Pubkey> {
    let token_program = Pubkey::from_str(TOKEN_PROGRAM_ID)?;
    let ata_program = Pubkey::from_str(ASSOCIATED_TOKEN_PROGRAM_ID)?;
    let (address, _bump) = Pubkey::find_program_address(
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
        &ata_program,
    );
    Ok(address)
}

// Discriminator for initialize: [175, 175, 109, 31, 13, 152, 155, 237]
pub fn initialize_instruction_data() -> Vec<u8> {
    vec![175, 175, 109, 31, 13, 152, 155, 237]
}

// Discriminator for mint: [51, 57, 225, 47, 182, 146, 137, 166]
pub fn mint_instruction_data(amount: u64) -> Vec<u8> {
    let mut data = vec![51, 57, 225, 47, 182, 146, 137, 166];
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

// Discriminator for payout: [149, 140, 194, 236, 174, 189, 6, 239]
pub fn payout_instruction_data(note_id: u64, reason_id: u64) -> Vec<u8> {
    let mut data = vec![149, 140, 194, 236, 174, 189, 6, 239];
    data.extend_from_slice(&note_id.to_le_bytes());
    data.extend_from_slice(&reason_id.to_le_bytes());
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_mint_gates_on_threshold() {
        assert!(needs_welcome_mint(0.0));
        assert!(needs_welcome_mint(499.9));
        assert!(!needs_welcome_mint(500.0));
        assert!(!needs_welcome_mint(30_000.0));
        assert_eq!(WELCOME_MINT_TOKENS, 30_000);
    }

    #[test]
    fn base_units_scale_by_decimals() {
        assert_eq!(base_units(30_000).unwrap(), 300_000_000_000);
        assert_eq!(base_units(0).unwrap(), 0);
        assert!(base_units(u64::MAX).is_err());
    }

    #[test]
    fn mint_data_is_discriminator_plus_amount() {
        let data = mint_instruction_data(300_000_000_000);
        assert_eq!(data.len(), 16);
        assert_eq!(&data[0..8], &[51, 57, 225, 47, 182, 146, 137, 166]);
        assert_eq!(&data[8..16], &300_000_000_000u64.to_le_bytes());
    }

    #[test]
    fn payout_data_layout() {
        let data = payout_instruction_data(7, 3);
        assert_eq!(data.len(), 24);
        assert_eq!(&data[0..8], &[149, 140, 194, 236, 174, 189, 6, 239]);
        assert_eq!(&data[8..16], &7u64.to_le_bytes());
        assert_eq!(&data[16..24], &3u64.to_le_bytes());
    }

    #[test]
    fn ata_derivation_is_deterministic() {
        let owner = Pubkey::new_from_array([1u8; 32]);
        let other = Pubkey::new_from_array([2u8; 32]);
        let mint = Pubkey::new_from_array([3u8; 32]);
        let a = associated_token_address(&owner, &mint).unwrap();
        let b = associated_token_address(&owner, &mint).unwrap();
        let c = associated_token_address(&other, &mint).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn mint_pda_differs_from_authority_pda() {
        let program_id = Pubkey::new_from_array([9u8; 32]);
        let (mint, _) = karma_mint_address(&program_id);
        let (authority, _) = mint_authority_address(&program_id);
        assert_ne!(mint, authority);
    }
}
