//! Events emitted by the Vault Staking program.
//!
//! Indexers rebuild the stake ledger from these; the `total_*` fields carry
//! post-instruction values so a single event is enough to check
//! reconciliation.

use anchor_lang::prelude::*;

#[event]
pub struct VaultInitialized {
    pub stake_pool: Pubkey,
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub payer: Pubkey,
}

#[event]
pub struct TokensStaked {
    pub staker: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    pub total_staked: u64,
    pub pool_total: u64,
}

#[event]
pub struct TokensWithdrawn {
    pub staker: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    pub total_staked: u64,
    pub pool_total: u64,
}
