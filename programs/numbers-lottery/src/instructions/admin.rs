use anchor_lang::prelude::*;
use anchor_lang::system_program;

use crate::constants::LOTTERY_SEED;
use crate::events::{LotteryInitialized, PoolFunded};
use crate::settlement;
use crate::state::{Lottery, LotteryConfig};

/// Accounts required to initialize the lottery.
/// This sets up the singleton lottery account with its deployment parameters.
#[derive(Accounts)]
pub struct InitializeLottery<'info> {
    /// The account paying for account creation; becomes the authority.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The Lottery state account holding configuration, round cursor and balance.
    #[account(
        init,
        payer = payer,
        space = 8 + Lottery::INIT_SPACE,
        seeds = [LOTTERY_SEED],
        bump
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// System program to create accounts.
    pub system_program: Program<'info, System>,
}

/// Validates `config` and stores it in a fresh lottery account.
///
/// No round exists afterwards; the first purchase opens round 1.
pub fn process_initialize_lottery(
    ctx: Context<InitializeLottery>,
    config: LotteryConfig,
) -> Result<()> {
    config.validate()?;

    let lottery = &mut ctx.accounts.lottery;
    lottery.bump = ctx.bumps.lottery;
    lottery.authority = ctx.accounts.payer.key();
    lottery.config = config;
    lottery.last_round_id = 0;
    lottery.draw_round_id = 0;
    lottery.draw_in_flight = false;
    lottery.next_ticket_id = 1;
    lottery.balance = 0;
    lottery.total_paid_out = 0;

    msg!(
        "Lottery initialized: pick {} of {}, {} drawn, {} lamports per ticket",
        lottery.config.selection_size,
        lottery.config.number_ceiling,
        lottery.config.draw_size,
        lottery.config.ticket_price
    );
    emit!(LotteryInitialized {
        lottery: lottery.key(),
        authority: lottery.authority,
        ticket_price: lottery.config.ticket_price,
        number_ceiling: lottery.config.number_ceiling,
        selection_size: lottery.config.selection_size,
        draw_size: lottery.config.draw_size,
    });
    Ok(())
}

/// Accounts required to top up the prize pool.
#[derive(Accounts)]
pub struct FundPool<'info> {
    /// The account depositing lamports. Anyone may fund the pool.
    #[account(mut)]
    pub funder: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// System program for the lamport transfer.
    pub system_program: Program<'info, System>,
}

/// Deposits `amount` lamports into the lottery account and credits the
/// ledger balance with them.
pub fn process_fund_pool(ctx: Context<FundPool>, amount: u64) -> Result<()> {
    let balance = settlement::fund(&mut ctx.accounts.lottery, amount)?;

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.funder.to_account_info(),
                to: ctx.accounts.lottery.to_account_info(),
            },
        ),
        amount,
    )?;

    msg!("Pool funded with {} lamports, balance {}", amount, balance);
    emit!(PoolFunded {
        funder: ctx.accounts.funder.key(),
        amount,
        balance,
    });
    Ok(())
}
