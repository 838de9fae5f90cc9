//! Wallet challenge/response.
//!
//! Proving control of a wallet is a nonce-sign-verify sequence: the client
//! draws a random nonce, asks the wallet to sign a message containing it,
//! and checks the detached Ed25519 signature against the wallet's public key
//! before it ever asks the server for a session.

use rand::Rng;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::signer::keypair::Keypair;
use solana_sdk::signer::Signer;

/// Random 16-byte hex nonce, fresh per login attempt.
pub fn login_nonce() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// The exact message presented to the wallet for signing.
pub fn login_message(nonce: &str) -> String {
    format!("Sign this message in order to log in. \n\nNonce: {nonce}")
}

pub fn sign_login(wallet: &Keypair, message: &str) -> Signature {
    wallet.sign_message(message.as_bytes())
}

pub fn verify_login(wallet_pubkey: &Pubkey, message: &str, signature: &Signature) -> bool {
    signature.verify(wallet_pubkey.as_ref(), message.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_is_32_hex_chars() {
        let nonce = login_nonce();
        assert_eq!(nonce.len(), 32);
        assert!(nonce.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn nonce_is_unique() {
        assert_ne!(login_nonce(), login_nonce());
    }

    #[test]
    fn signature_round_trip() {
        let wallet = Keypair::new();
        let message = login_message(&login_nonce());
        let signature = sign_login(&wallet, &message);
        assert!(verify_login(&wallet.pubkey(), &message, &signature));
    }

    #[test]
    fn other_key_fails_verification() {
        let wallet = Keypair::new();
        let message = login_message(&login_nonce());
        let signature = sign_login(&wallet, &message);
        assert!(!verify_login(&Keypair::new().pubkey(), &message, &signature));
    }

    #[test]
    fn tampered_message_fails_verification() {
        let wallet = Keypair::new();
        let message = login_message(&login_nonce());
        let signature = sign_login(&wallet, &message);
        let tampered = login_message(&login_nonce());
        assert!(!verify_login(&wallet.pubkey(), &tampered, &signature));
    }
}
