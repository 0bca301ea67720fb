use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::error::TokenError;
use crate::events::TokensTransferred;

#[derive(Accounts)]
pub struct TransferToken<'info> {
    /// Signed for by its owner or an approved delegate. The token program
    /// decides which; a delegate is also held to its allowance there.
    #[account(mut)]
    pub from: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = to.mint == from.mint @ TokenError::MintMismatch
    )]
    pub to: Account<'info, TokenAccount>,

    pub authority: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

/// Source and destination balances after moving `amount`. A transfer to the
/// same account leaves its balance unchanged.
pub fn plan_transfer(
    from_balance: u64,
    to_balance: u64,
    amount: u64,
    same_account: bool,
) -> Result<(u64, u64)> {
    require!(amount > 0, TokenError::ZeroAmount);
    require!(from_balance >= amount, TokenError::InsufficientFunds);
    if same_account {
        return Ok((from_balance, to_balance));
    }
    let from_after = from_balance - amount;
    let to_after = to_balance.checked_add(amount).ok_or(TokenError::MathOverflow)?;
    Ok((from_after, to_after))
}

pub fn handler(ctx: Context<TransferToken>, amount: u64) -> Result<()> {
    plan_transfer(
        ctx.accounts.from.amount,
        ctx.accounts.to.amount,
        amount,
        ctx.accounts.from.key() == ctx.accounts.to.key(),
    )?;

    let cpi_accounts = Transfer {
        from: ctx.accounts.from.to_account_info(),
        to: ctx.accounts.to.to_account_info(),
        authority: ctx.accounts.authority.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new(cpi_program, cpi_accounts);
    token::transfer(cpi_ctx, amount)?;

    msg!(
        "Transferred {} tokens from {} to {}",
        amount,
        ctx.accounts.from.key(),
        ctx.accounts.to.key()
    );

    emit!(TokensTransferred {
        mint: ctx.accounts.from.mint,
        from: ctx.accounts.from.key(),
        to: ctx.accounts.to.key(),
        amount,
        authority: ctx.accounts.authority.key(),
    });

    Ok(())
}
