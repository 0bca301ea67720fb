//! Deposit instruction handler.
//!
//! Moves tokens from the depositor into the custody vault and credits the
//! depositor's stake entry.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::custody;
use crate::error::StakingError;
use crate::events::TokensStaked;
use crate::state::{StakePool, UserStake};

/// Accounts required for a deposit.
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// The depositor.
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

    /// Depositor's stake entry (created on first deposit).
    #[account(
        init_if_needed,
        payer = staker,
        space = UserStake::LEN,
        seeds = [USER_STAKE_SEED, stake_pool.key().as_ref(), staker.key().as_ref()],
        bump
    )]
    pub user_stake: Account<'info, UserStake>,

    /// The staking token mint.
    pub staking_mint: Account<'info, Mint>,

    /// Depositor's token account for the staking token.
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

    /// System program.
    pub system_program: Program<'info, System>,
}

/// Deposit `amount` tokens into the vault.
pub fn handler(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    let stake_pool = &ctx.accounts.stake_pool;

    custody::verify_vault(
        ctx.program_id,
        &stake_pool.staking_mint,
        &ctx.accounts.vault.key(),
        stake_pool.vault_bump,
    )?;
    require!(
        ctx.accounts.vault.owner == stake_pool.key(),
        StakingError::InvalidVault
    );

    let update = custody::plan_deposit(
        stake_pool,
        &ctx.accounts.user_stake,
        ctx.accounts.staker_token_account.amount,
        amount,
    )?;
    let vault_before = ctx.accounts.vault.amount;

    // Transfer tokens from depositor to vault
    let cpi_accounts = Transfer {
        from: ctx.accounts.staker_token_account.to_account_info(),
        to: ctx.accounts.vault.to_account_info(),
        authority: ctx.accounts.staker.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new(cpi_program, cpi_accounts);
    token::transfer(cpi_ctx, amount)?;

    let now = Clock::get()?.unix_timestamp;
    let stake_pool_key = ctx.accounts.stake_pool.key();
    let user_stake = &mut ctx.accounts.user_stake;
    let stake_pool = &mut ctx.accounts.stake_pool;

    if update.opens_entry {
        user_stake.open(ctx.accounts.staker.key(), stake_pool_key, ctx.bumps.user_stake, now);
    }
    update.commit(stake_pool, user_stake, now);

    ctx.accounts.vault.reload()?;
    update.reconcile(vault_before, ctx.accounts.vault.amount)?;

    msg!("Staked {} tokens", amount);
    msg!("Total staked by user: {}", user_stake.staked_amount);
    msg!("Vault balance: {}", ctx.accounts.vault.amount);

    emit!(TokensStaked {
        staker: user_stake.owner,
        mint: stake_pool.staking_mint,
        amount,
        total_staked: user_stake.staked_amount,
        pool_total: stake_pool.total_staked,
    });

    Ok(())
}
