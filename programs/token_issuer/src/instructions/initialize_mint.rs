use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token};

use crate::events::MintInitialized;

#[derive(Accounts)]
#[instruction(decimals: u8)]
pub struct InitializeMint<'info> {
    #[account(
        init,
        payer = payer,
        mint::decimals = decimals,
        mint::authority = payer,
    )]
    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn handler(ctx: Context<InitializeMint>, decimals: u8) -> Result<()> {
    msg!("Token mint initialized: {}", ctx.accounts.mint.key());
    msg!("Decimals: {}", decimals);

    emit!(MintInitialized {
        mint: ctx.accounts.mint.key(),
        decimals,
        authority: ctx.accounts.payer.key(),
    });

    Ok(())
}
