//! Program constants for the Vault Staking program.
//!
//! Seeds used to derive every program-owned address. Changing any of these
//! changes every derived address, so they are fixed for the program's lifetime.

/// Seed for deriving the stake pool PDA: `["stake_pool", mint]`.
///
/// The pool PDA is the SPL authority of the vault token account.
pub const STAKE_POOL_SEED: &[u8] = b"stake_pool";

/// Seed for deriving the custody vault PDA: `["vault", mint]`.
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for deriving user stake ledger PDAs: `["user", stake_pool, owner]`.
pub const USER_STAKE_SEED: &[u8] = b"user";
