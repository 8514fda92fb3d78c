use anchor_lang::prelude::*;

use crate::constants::{LOTTERY_SEED, ROUND_SEED};
use crate::events::RoundAnnounced;
use crate::lifecycle;
use crate::randomness::SwitchboardGateway;
use crate::state::{Lottery, Round};

/// Accounts required to deliver a round's randomness.
///
/// `next_round` is created here when no purchase has opened it yet.
#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct RevealWinningNumbers<'info> {
    /// Account paying for the next round account, if it has to be created.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The main lottery state account.
    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// The round waiting on randomness.
    #[account(
        mut,
        seeds = [ROUND_SEED, round_id.to_le_bytes().as_ref()],
        bump = round.bump,
    )]
    pub round: Box<Account<'info, Round>>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + Round::INIT_SPACE,
        seeds = [ROUND_SEED, round_id.saturating_add(1).to_le_bytes().as_ref()],
        bump
    )]
    pub next_round: Box<Account<'info, Round>>,

    /// The randomness oracle account committed by `close_round`.
    /// CHECK: The account's data is validated manually within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,

    /// System program for account operations.
    pub system_program: Program<'info, System>,
}

/// Matches the randomness account against the round's request, then reads
/// the revealed value and announces the round.
///
/// The revealed value is only readable in its reveal slot, so a duplicate or
/// foreign account is rejected before it is read.
pub(crate) fn reveal(
    lottery: &mut Lottery,
    round: &mut Round,
    next_round: &mut Round,
    gateway: &SwitchboardGateway,
    now: i64,
) -> Result<()> {
    lifecycle::require_pending_request(lottery, round, &gateway.request_id())?;

    let fulfillment = gateway.fulfillment()?;
    msg!("Randomness result: {:?}", fulfillment.raw_words);

    lifecycle::on_randomness_fulfilled(lottery, round, next_round, &fulfillment, now)
}

pub fn process_reveal_winning_numbers(
    ctx: Context<RevealWinningNumbers>,
    round_id: u64,
) -> Result<()> {
    let clock = Clock::get()?;
    let gateway = SwitchboardGateway::new(&ctx.accounts.randomness_account_data, &clock);

    reveal(
        &mut ctx.accounts.lottery,
        &mut ctx.accounts.round,
        &mut ctx.accounts.next_round,
        &gateway,
        clock.unix_timestamp,
    )?;
    ctx.accounts.next_round.bump = ctx.bumps.next_round;

    emit!(RoundAnnounced {
        round_id,
        winning_numbers: ctx.accounts.round.winning_numbers.clone(),
        next_round_id: ctx.accounts.next_round.id,
        announced_at: ctx.accounts.round.announced_at,
    });
    Ok(())
}
