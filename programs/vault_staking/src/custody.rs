//! Custody and ledger accounting.
//!
//! Address derivation for the pool, vault and stake entries, the sealed
//! signer used for vault outflows, and the plan/commit pair that keeps the
//! stake ledger reconciled with the vault balance.
//!
//! Handlers follow one sequence for every balance change:
//! validate and plan (no writes) → token CPI → commit the plan → reconcile
//! the reloaded vault balance. Nothing here touches sysvars or performs
//! CPIs, so the whole sequence is exercised by host-side unit tests.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::state::{StakePool, UserStake};

/// Derive the stake pool PDA for `mint`. The pool is the SPL authority of
/// the vault, so this is the keyless identity that controls custody.
pub fn find_stake_pool_address(program_id: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[STAKE_POOL_SEED, mint.as_ref()], program_id)
}

/// Derive the custody vault token account for `mint`.
pub fn find_vault_address(program_id: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SEED, mint.as_ref()], program_id)
}

/// Derive the stake ledger entry for `owner` in `stake_pool`.
pub fn find_user_stake_address(
    program_id: &Pubkey,
    stake_pool: &Pubkey,
    owner: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[USER_STAKE_SEED, stake_pool.as_ref(), owner.as_ref()],
        program_id,
    )
}

/// Recompute the vault address from `mint` and the stored bump and reject
/// any account that does not match it.
pub fn verify_vault(
    program_id: &Pubkey,
    mint: &Pubkey,
    vault: &Pubkey,
    bump: u8,
) -> Result<()> {
    let expected =
        Pubkey::create_program_address(&[VAULT_SEED, mint.as_ref(), &[bump]], program_id)
            .map_err(|_| StakingError::InvalidVault)?;
    require_keys_eq!(expected, *vault, StakingError::InvalidVault);
    Ok(())
}

/// Proof that the caller is this program acting for one stake pool.
///
/// The fields are private and the only constructor is crate-visible and
/// re-derives the pool address first, so a `PoolSigner` can't be built for
/// an account the program does not control. Its seeds are what
/// `invoke_signed` needs to move tokens out of the vault.
pub struct PoolSigner {
    mint: Pubkey,
    bump: [u8; 1],
}

impl PoolSigner {
    pub(crate) fn new(
        program_id: &Pubkey,
        stake_pool: &Pubkey,
        mint: &Pubkey,
        bump: u8,
    ) -> Result<Self> {
        let expected =
            Pubkey::create_program_address(&[STAKE_POOL_SEED, mint.as_ref(), &[bump]], program_id)
                .map_err(|_| StakingError::InvalidPool)?;
        require_keys_eq!(expected, *stake_pool, StakingError::InvalidPool);
        Ok(Self {
            mint: *mint,
            bump: [bump],
        })
    }

    pub fn seeds(&self) -> [&[u8]; 3] {
        [STAKE_POOL_SEED, self.mint.as_ref(), &self.bump]
    }
}

/// Reject `initialize` against a pool that is already bound to a mint.
pub fn ensure_uninitialized(pool: &StakePool) -> Result<()> {
    require!(!pool.is_initialized(), StakingError::AlreadyInitialized);
    Ok(())
}

/// Direction of a ledger change relative to the vault.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Deposit,
    Withdraw,
}

/// Ledger values computed ahead of the token transfer. Holding one means
/// every checked operation already succeeded; [`LedgerUpdate::commit`] is
/// infallible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct LedgerUpdate {
    pub flow: Flow,
    pub amount: u64,
    pub entry_amount: u64,
    pub pool_total: u64,
    pub opens_entry: bool,
}

/// Plan a deposit of `amount` given the depositor's wallet balance.
pub fn plan_deposit(
    pool: &StakePool,
    entry: &UserStake,
    wallet_balance: u64,
    amount: u64,
) -> Result<LedgerUpdate> {
    require!(amount > 0, StakingError::ZeroAmount);
    require!(wallet_balance >= amount, StakingError::InsufficientBalance);

    let entry_amount = entry
        .staked_amount
        .checked_add(amount)
        .ok_or(StakingError::MathOverflow)?;
    let pool_total = pool
        .total_staked
        .checked_add(amount)
        .ok_or(StakingError::MathOverflow)?;

    Ok(LedgerUpdate {
        flow: Flow::Deposit,
        amount,
        entry_amount,
        pool_total,
        opens_entry: !entry.is_open(),
    })
}

/// Plan a withdrawal of `amount` from `entry`.
pub fn plan_withdraw(pool: &StakePool, entry: &UserStake, amount: u64) -> Result<LedgerUpdate> {
    require!(amount > 0, StakingError::ZeroAmount);
    require!(
        entry.staked_amount >= amount,
        StakingError::InsufficientStakedBalance
    );

    let entry_amount = entry
        .staked_amount
        .checked_sub(amount)
        .ok_or(StakingError::MathUnderflow)?;
    let pool_total = pool
        .total_staked
        .checked_sub(amount)
        .ok_or(StakingError::MathUnderflow)?;

    Ok(LedgerUpdate {
        flow: Flow::Withdraw,
        amount,
        entry_amount,
        pool_total,
        opens_entry: false,
    })
}

impl LedgerUpdate {
    /// Write the planned values. Opening the entry (owner, pool, bump) is
    /// the caller's job and must happen before this.
    pub fn commit(self, pool: &mut StakePool, entry: &mut UserStake, now: i64) {
        if self.opens_entry {
            pool.staker_count = pool.staker_count.saturating_add(1);
        }
        if self.flow == Flow::Deposit {
            entry.last_deposit_at = now;
        }
        entry.staked_amount = self.entry_amount;
        pool.total_staked = self.pool_total;
        pool.last_updated = now;
    }

    /// Check the vault moved by exactly the planned amount and still covers
    /// every ledger entry.
    pub fn reconcile(&self, vault_before: u64, vault_after: u64) -> Result<()> {
        let moved = match self.flow {
            Flow::Deposit => vault_after.checked_sub(vault_before),
            Flow::Withdraw => vault_before.checked_sub(vault_after),
        };
        require!(moved == Some(self.amount), StakingError::VaultOutOfBalance);
        require!(vault_after >= self.pool_total, StakingError::VaultOutOfBalance);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory stand-in for the SPL token program: all-or-nothing
    /// transfers between token accounts.
    #[derive(Default, Clone, PartialEq, Debug)]
    struct TokenBook {
        balances: HashMap<Pubkey, u64>,
    }

    impl TokenBook {
        fn balance(&self, account: &Pubkey) -> u64 {
            self.balances.get(account).copied().unwrap_or(0)
        }

        fn mint_to(&mut self, account: Pubkey, amount: u64) {
            *self.balances.entry(account).or_default() += amount;
        }

        fn transfer(
            &mut self,
            from: Pubkey,
            to: Pubkey,
            amount: u64,
        ) -> std::result::Result<(), ()> {
            let from_balance = self.balance(&from);
            let to_balance = self.balance(&to);
            let debited = from_balance.checked_sub(amount).ok_or(())?;
            let credited = to_balance.checked_add(amount).ok_or(())?;
            self.balances.insert(from, debited);
            self.balances.insert(to, credited);
            Ok(())
        }
    }

    /// One pool with its vault and the ledger entries keyed by owner.
    struct Harness {
        program_id: Pubkey,
        mint: Pubkey,
        pool_key: Pubkey,
        vault: Pubkey,
        pool: StakePool,
        entries: HashMap<Pubkey, UserStake>,
        book: TokenBook,
        now: i64,
    }

    impl Harness {
        fn new() -> Self {
            let program_id = Pubkey::new_unique();
            let mint = Pubkey::new_unique();
            let (pool_key, bump) = find_stake_pool_address(&program_id, &mint);
            let (vault, vault_bump) = find_vault_address(&program_id, &mint);

            let mut pool = StakePool::default();
            ensure_uninitialized(&pool).unwrap();
            pool.staking_mint = mint;
            pool.staking_vault = vault;
            pool.bump = bump;
            pool.vault_bump = vault_bump;

            Self {
                program_id,
                mint,
                pool_key,
                vault,
                pool,
                entries: HashMap::new(),
                book: TokenBook::default(),
                now: 1_700_000_000,
            }
        }

        fn wallet(owner: &Pubkey) -> Pubkey {
            // Token accounts are distinct from their owners.
            Pubkey::find_program_address(&[b"wallet", owner.as_ref()], &Pubkey::default()).0
        }

        fn staked(&self, owner: &Pubkey) -> u64 {
            self.entries.get(owner).map(|e| e.staked_amount).unwrap_or(0)
        }

        fn assert_reconciled(&self) {
            let sum: u64 = self.entries.values().map(|e| e.staked_amount).sum();
            assert_eq!(self.book.balance(&self.vault), sum);
            assert_eq!(self.pool.total_staked, sum);
        }

        fn deposit(&mut self, owner: Pubkey, amount: u64) -> Result<()> {
            verify_vault(&self.program_id, &self.mint, &self.vault, self.pool.vault_bump)?;
            let wallet = Self::wallet(&owner);
            let mut entry = self.entries.get(&owner).cloned().unwrap_or_default();

            let update = plan_deposit(&self.pool, &entry, self.book.balance(&wallet), amount)?;

            let before = self.book.balance(&self.vault);
            self.book
                .transfer(wallet, self.vault, amount)
                .map_err(|_| StakingError::InsufficientBalance)?;

            if update.opens_entry {
                let (_, bump) = find_user_stake_address(&self.program_id, &self.pool_key, &owner);
                entry.open(owner, self.pool_key, bump, self.now);
            }
            update.commit(&mut self.pool, &mut entry, self.now);
            update.reconcile(before, self.book.balance(&self.vault))?;
            self.entries.insert(owner, entry);
            Ok(())
        }

        fn withdraw(&mut self, signer: Pubkey, owner: Pubkey, amount: u64) -> Result<()> {
            let mut entry = self.entries.get(&owner).cloned().unwrap_or_default();
            require_keys_eq!(entry.owner, signer, StakingError::UnauthorizedStakeAccess);

            let update = plan_withdraw(&self.pool, &entry, amount)?;
            let _signer =
                PoolSigner::new(&self.program_id, &self.pool_key, &self.mint, self.pool.bump)?;

            let before = self.book.balance(&self.vault);
            self.book
                .transfer(self.vault, Self::wallet(&owner), amount)
                .map_err(|_| StakingError::VaultOutOfBalance)?;

            update.commit(&mut self.pool, &mut entry, self.now);
            update.reconcile(before, self.book.balance(&self.vault))?;
            self.entries.insert(owner, entry);
            Ok(())
        }
    }

    #[test]
    fn test_derivation_is_stable() {
        let program_id = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        assert_eq!(
            find_vault_address(&program_id, &mint),
            find_vault_address(&program_id, &mint)
        );
        assert_eq!(
            find_stake_pool_address(&program_id, &mint),
            find_stake_pool_address(&program_id, &mint)
        );
    }

    #[test]
    fn test_derivation_separates_mints_and_roles() {
        let program_id = Pubkey::new_unique();
        let mint_a = Pubkey::new_unique();
        let mint_b = Pubkey::new_unique();

        let (vault_a, _) = find_vault_address(&program_id, &mint_a);
        let (vault_b, _) = find_vault_address(&program_id, &mint_b);
        let (pool_a, _) = find_stake_pool_address(&program_id, &mint_a);

        assert_ne!(vault_a, vault_b);
        assert_ne!(vault_a, pool_a);
        assert!(!vault_a.is_on_curve());
        assert!(!pool_a.is_on_curve());
    }

    #[test]
    fn test_user_stake_address_is_per_pool_and_owner() {
        let program_id = Pubkey::new_unique();
        let pool_a = Pubkey::new_unique();
        let pool_b = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let (a, _) = find_user_stake_address(&program_id, &pool_a, &owner);
        let (b, _) = find_user_stake_address(&program_id, &pool_b, &owner);
        let (c, _) = find_user_stake_address(&program_id, &pool_a, &Pubkey::new_unique());
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_verify_vault_rejects_foreign_accounts() {
        let program_id = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let (vault, bump) = find_vault_address(&program_id, &mint);

        assert!(verify_vault(&program_id, &mint, &vault, bump).is_ok());

        let other_mint = Pubkey::new_unique();
        let (other_vault, other_bump) = find_vault_address(&program_id, &other_mint);
        assert_eq!(
            verify_vault(&program_id, &mint, &other_vault, other_bump).unwrap_err(),
            StakingError::InvalidVault.into()
        );
        assert_eq!(
            verify_vault(&program_id, &mint, &Pubkey::new_unique(), bump).unwrap_err(),
            StakingError::InvalidVault.into()
        );
        assert_eq!(
            verify_vault(&Pubkey::new_unique(), &mint, &vault, bump).unwrap_err(),
            StakingError::InvalidVault.into()
        );
    }

    #[test]
    fn test_pool_signer_requires_derived_pool() {
        let program_id = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let (pool, bump) = find_stake_pool_address(&program_id, &mint);

        let signer = PoolSigner::new(&program_id, &pool, &mint, bump).unwrap();
        let seeds = signer.seeds();
        assert_eq!(seeds[0], STAKE_POOL_SEED);
        assert_eq!(seeds[1], mint.as_ref());
        assert_eq!(seeds[2], &[bump]);
        assert_eq!(
            Pubkey::create_program_address(&seeds, &program_id).unwrap(),
            pool
        );

        let forged = Pubkey::new_unique();
        assert!(PoolSigner::new(&program_id, &forged, &mint, bump).is_err());
    }

    #[test]
    fn test_initialize_twice_is_rejected() {
        let mut h = Harness::new();
        let owner = Pubkey::new_unique();
        h.book.mint_to(Harness::wallet(&owner), 100);
        h.deposit(owner, 40).unwrap();

        let snapshot = h.pool.clone();
        assert_eq!(
            ensure_uninitialized(&h.pool).unwrap_err(),
            StakingError::AlreadyInitialized.into()
        );
        assert_eq!(h.pool.total_staked, snapshot.total_staked);
        assert_eq!(h.book.balance(&h.vault), 40);
    }

    #[test]
    fn test_deposit_scenario() {
        let mut h = Harness::new();
        let depositor = Pubkey::new_unique();
        let wallet = Harness::wallet(&depositor);
        h.book.mint_to(wallet, 1000);

        h.deposit(depositor, 500).unwrap();

        assert_eq!(h.book.balance(&h.vault), 500);
        assert_eq!(h.book.balance(&wallet), 500);
        assert_eq!(h.staked(&depositor), 500);
        assert_eq!(h.pool.staker_count, 1);

        let entry = &h.entries[&depositor];
        assert_eq!(entry.owner, depositor);
        assert_eq!(entry.stake_pool, h.pool_key);
        h.assert_reconciled();
    }

    #[test]
    fn test_repeat_deposits_accumulate() {
        let mut h = Harness::new();
        let depositor = Pubkey::new_unique();
        h.book.mint_to(Harness::wallet(&depositor), 1000);

        h.deposit(depositor, 100).unwrap();
        h.now += 60;
        h.deposit(depositor, 250).unwrap();

        let entry = &h.entries[&depositor];
        assert_eq!(entry.staked_amount, 350);
        assert_eq!(entry.first_deposit_at, 1_700_000_000);
        assert_eq!(entry.last_deposit_at, 1_700_000_060);
        assert_eq!(h.pool.staker_count, 1);
        h.assert_reconciled();
    }

    #[test]
    fn test_rejected_deposits_leave_state_untouched() {
        let mut h = Harness::new();
        let depositor = Pubkey::new_unique();
        h.book.mint_to(Harness::wallet(&depositor), 300);
        h.deposit(depositor, 200).unwrap();

        let book = h.book.clone();
        let pool = h.pool.clone();

        assert_eq!(
            h.deposit(depositor, 0).unwrap_err(),
            StakingError::ZeroAmount.into()
        );
        assert_eq!(
            h.deposit(depositor, 101).unwrap_err(),
            StakingError::InsufficientBalance.into()
        );

        assert_eq!(h.book, book);
        assert_eq!(h.pool.total_staked, pool.total_staked);
        assert_eq!(h.pool.staker_count, pool.staker_count);
        assert_eq!(h.staked(&depositor), 200);
        h.assert_reconciled();
    }

    #[test]
    fn test_deposit_rejects_wrong_vault() {
        let mut h = Harness::new();
        let depositor = Pubkey::new_unique();
        h.book.mint_to(Harness::wallet(&depositor), 100);
        h.vault = Pubkey::new_unique();

        assert_eq!(
            h.deposit(depositor, 10).unwrap_err(),
            StakingError::InvalidVault.into()
        );
        assert_eq!(h.book.balance(&Harness::wallet(&depositor)), 100);
        assert_eq!(h.pool.total_staked, 0);
    }

    #[test]
    fn test_deposit_overflow_is_rejected() {
        let pool = StakePool {
            total_staked: u64::MAX - 5,
            ..StakePool::default()
        };
        let entry = UserStake {
            owner: Pubkey::new_unique(),
            staked_amount: u64::MAX - 5,
            ..UserStake::default()
        };

        assert_eq!(
            plan_deposit(&pool, &entry, u64::MAX, 6).unwrap_err(),
            StakingError::MathOverflow.into()
        );
        assert_eq!(
            plan_deposit(&pool, &entry, u64::MAX, 5).unwrap().entry_amount,
            u64::MAX
        );
    }

    #[test]
    fn test_withdraw_returns_funds() {
        let mut h = Harness::new();
        let depositor = Pubkey::new_unique();
        let wallet = Harness::wallet(&depositor);
        h.book.mint_to(wallet, 1000);
        h.deposit(depositor, 500).unwrap();

        h.withdraw(depositor, depositor, 200).unwrap();

        assert_eq!(h.staked(&depositor), 300);
        assert_eq!(h.book.balance(&h.vault), 300);
        assert_eq!(h.book.balance(&wallet), 700);
        h.assert_reconciled();

        h.withdraw(depositor, depositor, 300).unwrap();
        assert_eq!(h.staked(&depositor), 0);
        // Zero balance entries persist.
        assert!(h.entries[&depositor].is_open());
        assert_eq!(h.pool.staker_count, 1);
        h.assert_reconciled();
    }

    #[test]
    fn test_rejected_withdrawals_leave_state_untouched() {
        let mut h = Harness::new();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        h.book.mint_to(Harness::wallet(&alice), 100);
        h.book.mint_to(Harness::wallet(&bob), 100);
        h.deposit(alice, 60).unwrap();
        h.deposit(bob, 40).unwrap();

        let book = h.book.clone();

        assert_eq!(
            h.withdraw(alice, alice, 61).unwrap_err(),
            StakingError::InsufficientStakedBalance.into()
        );
        assert_eq!(
            h.withdraw(alice, alice, 0).unwrap_err(),
            StakingError::ZeroAmount.into()
        );
        assert_eq!(
            h.withdraw(bob, alice, 10).unwrap_err(),
            StakingError::UnauthorizedStakeAccess.into()
        );

        assert_eq!(h.book, book);
        assert_eq!(h.staked(&alice), 60);
        assert_eq!(h.staked(&bob), 40);
        h.assert_reconciled();
    }

    #[test]
    fn test_deposit_needs_only_amount_balance_and_vault() {
        // A pool set up by an unrelated payer imposes no extra gate on
        // depositors: a fresh pool accepts the first deposit as-is.
        let pool = StakePool {
            staking_mint: Pubkey::new_unique(),
            staking_vault: Pubkey::new_unique(),
            ..StakePool::default()
        };
        let update = plan_deposit(&pool, &UserStake::default(), 10, 10).unwrap();
        assert_eq!(update.amount, 10);
        assert_eq!(update.pool_total, 10);
        assert!(update.opens_entry);

        let mut h = Harness::new();
        let depositor = Pubkey::new_unique();
        h.book.mint_to(Harness::wallet(&depositor), 10);
        h.deposit(depositor, 10).unwrap();
        h.withdraw(depositor, depositor, 10).unwrap();
        h.assert_reconciled();
    }

    #[test]
    fn test_ledger_reconciles_across_many_depositors() {
        let mut h = Harness::new();
        let owners: Vec<Pubkey> = (0..5).map(|_| Pubkey::new_unique()).collect();
        for owner in &owners {
            h.book.mint_to(Harness::wallet(owner), 1_000_000);
        }

        for round in 1..=20u64 {
            for (i, owner) in owners.iter().enumerate() {
                let amount = round * (i as u64 + 1) * 7;
                h.deposit(*owner, amount).unwrap();
                h.assert_reconciled();

                if round % 3 == 0 {
                    let half = h.staked(owner) / 2;
                    h.withdraw(*owner, *owner, half).unwrap();
                    h.assert_reconciled();
                }
            }
        }
        assert_eq!(h.pool.staker_count, owners.len() as u64);
    }

    #[test]
    fn test_reconcile_detects_short_transfers() {
        let update = LedgerUpdate {
            flow: Flow::Deposit,
            amount: 100,
            entry_amount: 100,
            pool_total: 100,
            opens_entry: true,
        };
        assert!(update.reconcile(0, 100).is_ok());
        assert_eq!(
            update.reconcile(0, 99).unwrap_err(),
            StakingError::VaultOutOfBalance.into()
        );

        let outflow = LedgerUpdate {
            flow: Flow::Withdraw,
            amount: 50,
            entry_amount: 0,
            pool_total: 60,
            opens_entry: false,
        };
        assert!(outflow.reconcile(110, 60).is_ok());
        // Vault dropped below what the ledger still owes.
        assert_eq!(
            outflow.reconcile(100, 50).unwrap_err(),
            StakingError::VaultOutOfBalance.into()
        );
    }
}
