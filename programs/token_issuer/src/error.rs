//! Error types for the Token Issuer program.
//!
//! The SPL token program enforces the same rules on its own; checking them
//! here first gives callers a typed error instead of a generic CPI failure.

use anchor_lang::prelude::*;

#[error_code]
pub enum TokenError {
    /// [6000] Cannot mint or transfer a zero amount.
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    /// [6001] Source account holds less than the transfer amount.
    #[msg("Insufficient funds in source token account")]
    InsufficientFunds,

    /// [6002] Supply or a balance would exceed u64.
    #[msg("Arithmetic overflow occurred during calculation")]
    MathOverflow,

    /// [6003] Token account belongs to a different mint.
    #[msg("Token account mint does not match")]
    MintMismatch,

    /// [6004] Signer is not the mint authority.
    #[msg("Unauthorized: signer is not the mint authority")]
    UnauthorizedMinter,
}
