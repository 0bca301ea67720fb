//! Error types for the Vault Staking program.
//!
//! Every rejection is raised before the ledger is written, so a failed
//! instruction leaves the vault and all stake entries untouched.
//!
//! Codes are assigned in declaration order starting at 6000 and grouped by
//! category below. New variants go at the end of the enum so that existing
//! codes stay stable for clients.

use anchor_lang::prelude::*;

/// Custom error codes for the Vault Staking program.
///
/// Error codes start at 6000 (Anchor's custom error offset).
#[error_code]
pub enum StakingError {
    // ========== Input Validation Errors ==========

    /// [6000] Cannot deposit or withdraw a zero amount.
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    // ========== State/Balance Errors ==========

    /// [6001] Depositor's token account holds less than the requested amount.
    #[msg("Insufficient token balance for deposit")]
    InsufficientBalance,

    /// [6002] Withdrawal exceeds the depositor's staked amount.
    #[msg("Insufficient staked balance for this operation")]
    InsufficientStakedBalance,

    /// [6003] A vault already exists for this mint.
    #[msg("Vault is already initialized for this mint")]
    AlreadyInitialized,

    /// [6004] Vault balance no longer reconciles with the stake ledger.
    #[msg("Vault balance does not reconcile with the stake ledger")]
    VaultOutOfBalance,

    // ========== Math/Overflow Errors ==========

    /// [6005] Arithmetic overflow occurred during calculation.
    #[msg("Arithmetic overflow occurred during calculation")]
    MathOverflow,

    /// [6006] Arithmetic underflow occurred during calculation.
    #[msg("Arithmetic underflow occurred during calculation")]
    MathUnderflow,

    // ========== Authorization Errors ==========

    /// [6007] Signer does not own the stake entry it is trying to reduce.
    #[msg("Unauthorized: cannot modify another user's stake")]
    UnauthorizedStakeAccess,

    // ========== Account Validation Errors ==========

    /// [6008] Token account mint does not match the pool's mint.
    #[msg("Token mint mismatch - wrong token for this pool")]
    MintMismatch,

    /// [6009] Supplied vault is not the derived custody account for the mint.
    #[msg("Vault does not match the derived custody address for this mint")]
    InvalidVault,

    /// [6010] Supplied stake pool is not the derived pool for the mint.
    #[msg("Stake pool does not match the derived address for this mint")]
    InvalidPool,

    /// [6011] Stake entry does not belong to this pool.
    #[msg("User stake account does not belong to this pool")]
    StakePoolMismatch,

    /// [6012] Token account is not owned by the signing depositor.
    #[msg("Token account is not owned by the signer")]
    InvalidTokenAccount,
}
