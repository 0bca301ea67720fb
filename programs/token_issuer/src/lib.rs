//! # Token Issuer Program
//!
//! Thin wrapper over the SPL token program: creates a mint with fixed
//! decimals, mints to token accounts under the mint authority, and moves
//! tokens between accounts of the same mint. Amounts are always in the
//! mint's smallest unit.

use anchor_lang::prelude::*;

declare_id!("UY89vX8nRLbuy8LZCZy9ThMbNp1669Bi7Ue9uMwZC6P");

pub mod error;
pub mod events;
pub mod instructions;

use instructions::*;

#[program]
pub mod token_issuer {
    use super::*;

    /// Creates a new mint with `decimals` places. The payer becomes the
    /// mint authority.
    pub fn initialize_mint(ctx: Context<InitializeMint>, decimals: u8) -> Result<()> {
        instructions::initialize_mint::handler(ctx, decimals)
    }

    /// Mints `amount` to a token account.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Amount is zero
    /// - Signer is not the mint authority
    /// - Supply or the destination balance would overflow
    pub fn mint_token(ctx: Context<MintToken>, amount: u64) -> Result<()> {
        instructions::mint_token::handler(ctx, amount)
    }

    /// Transfers `amount` between two token accounts of the same mint.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Amount is zero
    /// - Signer is neither the source owner nor a delegate within its allowance
    /// - Source balance is below `amount`
    pub fn transfer_token(ctx: Context<TransferToken>, amount: u64) -> Result<()> {
        instructions::transfer_token::handler(ctx, amount)
    }
}
