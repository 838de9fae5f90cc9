// Solana smart contract for the karma token.
use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount};

declare_id!("GPrsL4woNWAUSS2xHG3VQQSHVNfDLKvfbxuXT4iD6d3P");

#[program]
pub mod karma_token_program {
    use super::*;

    /// Creates the karma mint. The account constraints do all the work; the
    /// mint lives at a PDA so clients derive it from the program id alone.
    pub fn initialize(_ctx: Context<Initialize>) -> Result<()> {
        Ok(())
    }

    /// Credits `amount` base units to the recipient's token account. Only
    /// the admin pays; the mint-authority PDA signs the CPI.
    pub fn mint(ctx: Context<MintKarma>, amount: u64) -> Result<()> {
        let bump = ctx.bumps.mint_authority;
        let seeds: &[&[u8]] = &[b"mint_authority", &[bump]];
        let signer_seeds = &[seeds];

        let cpi = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.mint.to_account_info(),
                to: ctx.accounts.recipient_token_account.to_account_info(),
                authority: ctx.accounts.mint_authority.to_account_info(),
            },
            signer_seeds,
        );
        token::mint_to(cpi, amount)?;
        Ok(())
    }

    /// Settles a closed report. Reward distribution happens off-chain for
    /// now; the call records the settlement under the admin's signature.
    pub fn payout(_ctx: Context<Payout>, note_id: u64, reason_id: u64) -> Result<()> {
        msg!("payout settled: note {} reason {}", note_id, reason_id);
        Ok(())
    }
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init_if_needed,
        payer = admin,
        seeds = [b"karma_mint"],
        bump,
        mint::decimals = 7,
        mint::authority = mint_authority,
    )]
    pub mint: Account<'info, Mint>,
    /// CHECK: PDA that only ever signs mint CPIs; it holds no data.
    #[account(seeds = [b"mint_authority"], bump)]
    pub mint_authority: UncheckedAccount<'info>,
    #[account(mut)]
    pub admin: Signer<'info>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct MintKarma<'info> {
    #[account(mut, seeds = [b"karma_mint"], bump)]
    pub mint: Account<'info, Mint>,
    /// CHECK: PDA that only ever signs mint CPIs; it holds no data.
    #[account(seeds = [b"mint_authority"], bump)]
    pub mint_authority: UncheckedAccount<'info>,
    /// CHECK: any account may receive karma.
    pub recipient: UncheckedAccount<'info>,
    #[account(
        init_if_needed,
        payer = admin,
        associated_token::mint = mint,
        associated_token::authority = recipient,
    )]
    pub recipient_token_account: Account<'info, TokenAccount>,
    #[account(mut)]
    pub admin: Signer<'info>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct Payout<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,
}
