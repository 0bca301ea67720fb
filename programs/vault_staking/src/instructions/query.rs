//! Read-only query handlers.
//!
//! Both return their value through Anchor return data so that callers can
//! simulate the instruction instead of decoding accounts themselves.

use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::constants::*;
use crate::custody;
use crate::error::StakingError;
use crate::state::{StakePool, UserStake};

#[derive(Accounts)]
pub struct VaultBalance<'info> {
    #[account(
        seeds = [STAKE_POOL_SEED, stake_pool.staking_mint.as_ref()],
        bump = stake_pool.bump
    )]
    pub stake_pool: Account<'info, StakePool>,

    #[account(
        constraint = vault.key() == stake_pool.staking_vault @ StakingError::InvalidVault
    )]
    pub vault: Account<'info, TokenAccount>,
}

#[derive(Accounts)]
pub struct StakedBalance<'info> {
    #[account(
        seeds = [STAKE_POOL_SEED, stake_pool.staking_mint.as_ref()],
        bump = stake_pool.bump
    )]
    pub stake_pool: Account<'info, StakePool>,

    #[account(
        seeds = [USER_STAKE_SEED, stake_pool.key().as_ref(), user_stake.owner.as_ref()],
        bump = user_stake.bump,
        constraint = user_stake.stake_pool == stake_pool.key() @ StakingError::StakePoolMismatch
    )]
    pub user_stake: Account<'info, UserStake>,
}

pub fn vault_balance_handler(ctx: Context<VaultBalance>) -> Result<u64> {
    let stake_pool = &ctx.accounts.stake_pool;
    custody::verify_vault(
        ctx.program_id,
        &stake_pool.staking_mint,
        &ctx.accounts.vault.key(),
        stake_pool.vault_bump,
    )?;
    Ok(ctx.accounts.vault.amount)
}

pub fn staked_balance_handler(ctx: Context<StakedBalance>) -> Result<u64> {
    Ok(ctx.accounts.user_stake.staked_amount)
}
