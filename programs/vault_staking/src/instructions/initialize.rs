/// Initialize instruction handler.
///
/// Creates the stake pool and its custody vault for one mint.
///
/// ## Security Guarantees
/// - Vault is a PDA whose SPL authority is the stake pool PDA (no private key)
/// - Mint and vault are locked into pool state permanently
/// - A second call for the same mint fails with `AlreadyInitialized`

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::custody;
use crate::error::StakingError;
use crate::events::VaultInitialized;
use crate::state::StakePool;

/// Accounts required for pool initialization.
///
/// ## Security Notes
/// - Both PDAs are `init_if_needed` so that a repeat call reaches the handler
///   and is rejected with a typed error instead of a system program failure
/// - `token::authority = stake_pool` is re-checked by Anchor when the vault
///   already exists
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Pays for both accounts. Holds no rights over the pool afterwards.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The stake pool account.
    /// SECURITY: PDA derived from STAKE_POOL_SEED + mint ensures one pool per token.
    #[account(
        init_if_needed,
        payer = payer,
        space = StakePool::LEN,
        seeds = [STAKE_POOL_SEED, staking_mint.key().as_ref()],
        bump
    )]
    pub stake_pool: Account<'info, StakePool>,

    /// The mint being staked.
    pub staking_mint: Account<'info, Mint>,

    /// The custody vault.
    /// SECURITY:
    /// - PDA derived from VAULT_SEED + mint
    /// - Authority set to stake_pool PDA
    #[account(
        init_if_needed,
        payer = payer,
        seeds = [VAULT_SEED, staking_mint.key().as_ref()],
        bump,
        token::mint = staking_mint,
        token::authority = stake_pool
    )]
    pub vault: Account<'info, TokenAccount>,

    /// System program for account creation.
    pub system_program: Program<'info, System>,

    /// Token program for token account operations.
    pub token_program: Program<'info, Token>,

    /// Rent sysvar for rent-exempt calculations.
    pub rent: Sysvar<'info, Rent>,
}

/// Bind a new stake pool and vault to `staking_mint`.
pub fn handler(ctx: Context<Initialize>) -> Result<()> {
    custody::ensure_uninitialized(&ctx.accounts.stake_pool)?;

    require!(
        ctx.accounts.vault.owner == ctx.accounts.stake_pool.key(),
        StakingError::InvalidVault
    );
    require!(
        ctx.accounts.vault.mint == ctx.accounts.staking_mint.key(),
        StakingError::MintMismatch
    );

    let clock = Clock::get()?;
    let stake_pool = &mut ctx.accounts.stake_pool;

    stake_pool.staking_mint = ctx.accounts.staking_mint.key();
    stake_pool.staking_vault = ctx.accounts.vault.key();
    stake_pool.total_staked = 0;
    stake_pool.staker_count = 0;
    stake_pool.created_at = clock.unix_timestamp;
    stake_pool.last_updated = clock.unix_timestamp;

    // Store bumps for PDA verification in future instructions
    stake_pool.bump = ctx.bumps.stake_pool;
    stake_pool.vault_bump = ctx.bumps.vault;

    msg!("Staking vault initialized");
    msg!("Mint: {}", stake_pool.staking_mint);
    msg!("Vault: {}", stake_pool.staking_vault);
    msg!("Payer: {}", ctx.accounts.payer.key());

    emit!(VaultInitialized {
        stake_pool: stake_pool.key(),
        mint: stake_pool.staking_mint,
        vault: stake_pool.staking_vault,
        payer: ctx.accounts.payer.key(),
    });

    Ok(())
}
