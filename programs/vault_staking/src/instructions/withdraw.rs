//! Withdraw instruction handler.
//!
//! Returns staked tokens from the custody vault to their depositor.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::custody::{self, PoolSigner};
use crate::error::StakingError;
use crate::events::TokensWithdrawn;
use crate::state::{StakePool, UserStake};

/// Accounts required for a withdrawal.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// The depositor withdrawing tokens.
    #[account(mut)]
    pub staker: Signer<'info>,

    /// The stake pool.
    #[account(
        mut,
        seeds = [STAKE_POOL_SEED, stake_pool.staking_mint.as_ref()],
        bump = stake_pool.bump,
        has_one = staking_mint @ StakingError::MintMismatch
    )]
    pub stake_pool: Account<'info, StakePool>,

    /// Depositor's stake entry.
    #[account(
        mut,
        seeds = [USER_STAKE_SEED, stake_pool.key().as_ref(), staker.key().as_ref()],
        bump = user_stake.bump,
        constraint = user_stake.owner == staker.key() @ StakingError::UnauthorizedStakeAccess,
        constraint = user_stake.stake_pool == stake_pool.key() @ StakingError::StakePoolMismatch
    )]
    pub user_stake: Account<'info, UserStake>,

    /// The staking token mint.
    pub staking_mint: Account<'info, Mint>,

    /// Depositor's token account receiving the tokens.
    #[account(
        mut,
        constraint = staker_token_account.mint == staking_mint.key() @ StakingError::MintMismatch,
        constraint = staker_token_account.owner == staker.key() @ StakingError::InvalidTokenAccount
    )]
    pub staker_token_account: Account<'info, TokenAccount>,

    /// Pool's custody vault. Re-derived in the handler.
    #[account(
        mut,
        constraint = vault.key() == stake_pool.staking_vault @ StakingError::InvalidVault
    )]
    pub vault: Account<'info, TokenAccount>,

    /// Token program.
    pub token_program: Program<'info, Token>,
}

/// Withdraw `amount` staked tokens. There is no lock-up.
pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let stake_pool = &ctx.accounts.stake_pool;

    custody::verify_vault(
        ctx.program_id,
        &stake_pool.staking_mint,
        &ctx.accounts.vault.key(),
        stake_pool.vault_bump,
    )?;

    let update = custody::plan_withdraw(stake_pool, &ctx.accounts.user_stake, amount)?;
    let signer = PoolSigner::new(
        ctx.program_id,
        &stake_pool.key(),
        &stake_pool.staking_mint,
        stake_pool.bump,
    )?;
    let vault_before = ctx.accounts.vault.amount;

    // Transfer tokens from vault to depositor using the pool PDA as signer
    let seeds = signer.seeds();
    let signer_seeds = &[&seeds[..]];

    let cpi_accounts = Transfer {
        from: ctx.accounts.vault.to_account_info(),
        to: ctx.accounts.staker_token_account.to_account_info(),
        authority: ctx.accounts.stake_pool.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);
    token::transfer(cpi_ctx, amount)?;

    let now = Clock::get()?.unix_timestamp;
    let user_stake = &mut ctx.accounts.user_stake;
    let stake_pool = &mut ctx.accounts.stake_pool;
    update.commit(stake_pool, user_stake, now);

    ctx.accounts.vault.reload()?;
    update.reconcile(vault_before, ctx.accounts.vault.amount)?;

    msg!("Withdrew {} tokens", amount);
    msg!("Remaining staked: {}", user_stake.staked_amount);
    msg!("Vault balance: {}", ctx.accounts.vault.amount);

    emit!(TokensWithdrawn {
        staker: user_stake.owner,
        mint: stake_pool.staking_mint,
        amount,
        total_staked: user_stake.staked_amount,
        pool_total: stake_pool.total_staked,
    });

    Ok(())
}
