use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount};

use crate::error::TokenError;
use crate::events::TokensMinted;

#[derive(Accounts)]
pub struct MintToken<'info> {
    #[account(mut)]
    pub mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = token_account.mint == mint.key() @ TokenError::MintMismatch
    )]
    pub token_account: Account<'info, TokenAccount>,

    pub authority: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

/// Reject signers other than the mint's current authority. A mint with no
/// authority is fixed-supply and rejects everyone.
pub fn ensure_mint_authority(mint_authority: &COption<Pubkey>, signer: &Pubkey) -> Result<()> {
    match mint_authority {
        COption::Some(authority) if authority == signer => Ok(()),
        _ => err!(TokenError::UnauthorizedMinter),
    }
}

/// Supply and destination balance after minting `amount`.
pub fn plan_mint(supply: u64, balance: u64, amount: u64) -> Result<(u64, u64)> {
    require!(amount > 0, TokenError::ZeroAmount);
    let supply = supply.checked_add(amount).ok_or(TokenError::MathOverflow)?;
    let balance = balance.checked_add(amount).ok_or(TokenError::MathOverflow)?;
    Ok((supply, balance))
}

pub fn handler(ctx: Context<MintToken>, amount: u64) -> Result<()> {
    ensure_mint_authority(
        &ctx.accounts.mint.mint_authority,
        &ctx.accounts.authority.key(),
    )?;
    let (supply, _) = plan_mint(
        ctx.accounts.mint.supply,
        ctx.accounts.token_account.amount,
        amount,
    )?;

    let cpi_accounts = MintTo {
        mint: ctx.accounts.mint.to_account_info(),
        to: ctx.accounts.token_account.to_account_info(),
        authority: ctx.accounts.authority.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new(cpi_program, cpi_accounts);
    token::mint_to(cpi_ctx, amount)?;

    msg!("Minted {} tokens to {}", amount, ctx.accounts.token_account.key());

    emit!(TokensMinted {
        mint: ctx.accounts.mint.key(),
        to: ctx.accounts.token_account.key(),
        amount,
        supply,
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_mint_authority_can_mint() {
        let authority = Pubkey::new_unique();
        assert!(ensure_mint_authority(&COption::Some(authority), &authority).is_ok());
        assert_eq!(
            ensure_mint_authority(&COption::Some(authority), &Pubkey::new_unique()).unwrap_err(),
            TokenError::UnauthorizedMinter.into()
        );
        assert_eq!(
            ensure_mint_authority(&COption::None, &authority).unwrap_err(),
            TokenError::UnauthorizedMinter.into()
        );
    }

    #[test]
    fn test_plan_mint() {
        assert_eq!(plan_mint(0, 0, 1000).unwrap(), (1000, 1000));
        assert_eq!(plan_mint(5000, 200, 300).unwrap(), (5300, 500));
        assert_eq!(
            plan_mint(0, 0, 0).unwrap_err(),
            TokenError::ZeroAmount.into()
        );
        assert_eq!(
            plan_mint(u64::MAX, 0, 1).unwrap_err(),
            TokenError::MathOverflow.into()
        );
    }
}
