use anchor_lang::prelude::*;

use crate::constants::{LOTTERY_SEED, TICKET_SEED};
use crate::error::LotteryError;
use crate::events::PrizeClaimed;
use crate::instructions::views::{load_ticket, load_ticket_round};
use crate::settlement;
use crate::state::{store_record, Lottery};

/// Accounts required for claiming a ticket's prize.
///
/// Ensures:
/// 1. Only the owner of the ticket can claim it.
/// 2. The ticket's round has been announced.
/// 3. The ticket is claimed at most once.
/// 4. The pool and the lottery account can cover the payout.
#[derive(Accounts)]
#[instruction(ticket_id: u64)]
pub struct ClaimPrize<'info> {
    /// The ticket owner, receiving the prize.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The main lottery state account.
    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// CHECK: Address is fixed by the seeds; loaded and stored by the handler.
    #[account(
        mut,
        seeds = [TICKET_SEED, ticket_id.to_le_bytes().as_ref()],
        bump
    )]
    pub ticket: UncheckedAccount<'info>,

    /// The round the ticket was bought in.
    /// CHECK: Checked against the ticket's round id in the handler.
    pub round: UncheckedAccount<'info>,
}

/// Pays out `ticket_id`'s prize to its owner.
///
/// The ticket is marked claimed and the balance debited before any lamports
/// move. Returns the prize amount.
pub fn process_claim_prize(ctx: Context<ClaimPrize>, ticket_id: u64) -> Result<u64> {
    let ticket_info = ctx.accounts.ticket.to_account_info();
    let mut ticket = load_ticket(&ctx.accounts.lottery, ticket_id, &ticket_info)?;
    let round = load_ticket_round(&ticket, &ctx.accounts.round, ctx.program_id)?;

    let caller = ctx.accounts.payer.key();
    let prize = settlement::claim(&mut ctx.accounts.lottery, &round, &mut ticket, &caller)?;
    store_record(&ticket, &ticket_info)?;

    if prize.amount > 0 {
        let lottery_info = ctx.accounts.lottery.to_account_info();
        let rent_reserve = Rent::get()?.minimum_balance(lottery_info.data_len());
        require_rent_free(lottery_info.lamports(), rent_reserve, prize.amount)?;

        **lottery_info.try_borrow_mut_lamports()? -= prize.amount;
        **ctx.accounts.payer.try_borrow_mut_lamports()? += prize.amount;
    }

    emit!(PrizeClaimed {
        ticket_id,
        round_id: round.id,
        owner: caller,
        weight: prize.weight,
        amount: prize.amount,
    });
    Ok(prize.amount)
}

/// Fails unless `amount` can leave an account holding `lamports` without
/// dipping into its `rent_reserve`.
pub(crate) fn require_rent_free(lamports: u64, rent_reserve: u64, amount: u64) -> Result<()> {
    let available = lamports.saturating_sub(rent_reserve);
    if amount > available {
        msg!(
            "Lottery account holds {} lamports above rent, prize is {}",
            available,
            amount
        );
        return err!(LotteryError::InsufficientFunds);
    }
    Ok(())
}
