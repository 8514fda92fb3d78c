use anchor_lang::prelude::*;

use crate::constants::{LOTTERY_SEED, ROUND_SEED};
use crate::error::LotteryError;
use crate::events::RoundClosed;
use crate::lifecycle;
use crate::randomness::SwitchboardGateway;
use crate::state::{load_record, store_record, Lottery, Round};

/// Accounts required to ask whether the round being drawn may close.
#[derive(Accounts)]
pub struct CheckReady<'info> {
    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// The round being drawn. Does not exist before the first purchase.
    /// CHECK: Address is fixed by the seeds; the handler loads it only if it exists.
    #[account(
        seeds = [ROUND_SEED, lottery.draw_round_id.to_le_bytes().as_ref()],
        bump
    )]
    pub round: UncheckedAccount<'info>,
}

pub fn process_check_ready(ctx: Context<CheckReady>) -> Result<bool> {
    let lottery = &ctx.accounts.lottery;
    if lottery.draw_round_id == 0 {
        return Ok(false);
    }
    let round: Round = load_record(&ctx.accounts.round)?;
    let clock = Clock::get()?;
    Ok(lifecycle::check_ready(lottery, &round, clock.unix_timestamp))
}

/// Accounts required to close the round being drawn.
///
/// Anyone may act as the trigger. The randomness account must have been
/// committed in the previous slot.
#[derive(Accounts)]
pub struct CloseRound<'info> {
    /// The trigger paying transaction fees.
    pub payer: Signer<'info>,

    /// The main lottery state account.
    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// The round being drawn.
    /// CHECK: Address is fixed by the seeds; loaded and stored by the handler.
    #[account(
        mut,
        seeds = [ROUND_SEED, lottery.draw_round_id.to_le_bytes().as_ref()],
        bump
    )]
    pub round: UncheckedAccount<'info>,

    /// Randomness account from Switchboard.
    /// CHECK: The account's data is validated manually within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,
}

pub fn process_close_round(ctx: Context<CloseRound>) -> Result<()> {
    let clock = Clock::get()?;
    require!(
        ctx.accounts.lottery.draw_round_id != 0,
        LotteryError::NotReady
    );

    let round_info = ctx.accounts.round.to_account_info();
    let mut round: Round = load_record(&round_info)?;
    let mut gateway = SwitchboardGateway::new(&ctx.accounts.randomness_account_data, &clock);

    let request_id = lifecycle::close_round(
        &mut ctx.accounts.lottery,
        &mut round,
        &mut gateway,
        clock.unix_timestamp,
    )?;
    store_record(&round, &round_info)?;

    msg!(
        "Round {} closed with {} tickets",
        round.id,
        round.ticket_count
    );
    emit!(RoundClosed {
        round_id: round.id,
        request_id,
        ticket_count: round.ticket_count,
        closed_at: round.closed_at,
    });
    Ok(())
}
