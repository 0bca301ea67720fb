use anchor_lang::prelude::*;

/// One pool per mint. Binds the mint to its custody vault and carries the
/// running sum of every [`UserStake::staked_amount`](super::UserStake) in
/// the pool.
#[account]
#[derive(Default, Debug)]
pub struct StakePool {
    pub staking_mint: Pubkey,
    pub staking_vault: Pubkey,

    pub total_staked: u64,
    pub staker_count: u64,

    pub created_at: i64,
    pub last_updated: i64,

    pub vault_bump: u8,
    pub bump: u8,
}

impl StakePool {
    pub const LEN: usize = 8
        + (32 * 2)
        + (8 * 2)
        + (8 * 2)
        + 2;

    /// A freshly allocated pool account is zeroed, so an unset mint means
    /// `initialize` has never completed for it.
    pub fn is_initialized(&self) -> bool {
        self.staking_mint != Pubkey::default()
    }
}
