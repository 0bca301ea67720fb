use anchor_lang::prelude::*;

#[account]
#[derive(Default, Debug)]
pub struct UserStake {
    pub owner: Pubkey,
    pub stake_pool: Pubkey,

    pub staked_amount: u64,

    pub first_deposit_at: i64,
    pub last_deposit_at: i64,

    pub bump: u8,
}

impl UserStake {
    pub const LEN: usize = 8 + 32 + 32 + 8 + 8 + 8 + 1;

    /// Entries are allocated zeroed by `init_if_needed`; the owner is only
    /// written once the first deposit lands.
    pub fn is_open(&self) -> bool {
        self.owner != Pubkey::default()
    }

    pub fn open(&mut self, owner: Pubkey, stake_pool: Pubkey, bump: u8, now: i64) {
        self.owner = owner;
        self.stake_pool = stake_pool;
        self.staked_amount = 0;
        self.first_deposit_at = now;
        self.bump = bump;
    }
}
