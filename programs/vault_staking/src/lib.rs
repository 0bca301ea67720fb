//! # Vault Staking Program
//!
//! A single-asset staking program. Deposits are held in a per-mint custody
//! vault whose SPL authority is the stake pool PDA, so no private key can
//! move funds out of it. Each depositor has a stake entry recording the
//! cumulative amount they have in the vault.
//!
//! ## Features
//! - Deterministic, keyless custody: `["vault", mint]` owned by `["stake_pool", mint]`
//! - Lazily created per-depositor ledger entries
//! - Every deposit and withdrawal is reconciled against the reloaded vault balance
//! - Checked arithmetic on all ledger updates

use anchor_lang::prelude::*;

declare_id!("9vF8iR37L3nKtBR4x6mhy8dE8eMLUzcuCNbSCGCpnYHG");

pub mod constants;
pub mod custody;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;

use instructions::*;

#[program]
pub mod vault_staking {
    use super::*;

    /// Creates the stake pool and custody vault for a mint.
    ///
    /// Anyone may call it; the payer only funds the two accounts.
    ///
    /// # Errors
    /// Returns `AlreadyInitialized` if a pool already exists for the mint.
    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        instructions::initialize::handler(ctx)
    }

    /// Deposits tokens into the vault and credits the caller's stake entry.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for the deposit
    /// * `amount` - Amount in the mint's smallest unit
    ///
    /// # Errors
    /// Returns an error if:
    /// - Amount is zero
    /// - The vault is not the derived custody account for the mint
    /// - The depositor's balance is below `amount`
    /// - The ledger would overflow
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Withdraws staked tokens back to the caller.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Amount is zero
    /// - Amount exceeds the caller's staked balance
    /// - The caller does not own the stake entry
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, amount)
    }

    /// Returns the vault's current token balance.
    pub fn vault_balance(ctx: Context<VaultBalance>) -> Result<u64> {
        instructions::query::vault_balance_handler(ctx)
    }

    /// Returns a depositor's staked amount.
    pub fn staked_balance(ctx: Context<StakedBalance>) -> Result<u64> {
        instructions::query::staked_balance_handler(ctx)
    }
}
