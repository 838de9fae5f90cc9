mod client;

pub use client::{
    associated_token_address, base_units, initialize_instruction_data, karma_mint_address,
    mint_authority_address, mint_instruction_data, needs_welcome_mint, payout_instruction_data,
    KarmaTokenClient, KARMA_DECIMALS, LOW_BALANCE_THRESHOLD, WELCOME_MINT_TOKENS,
};
