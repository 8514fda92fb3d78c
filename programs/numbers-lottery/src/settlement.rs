//! Prize claims and pool funding against the ledger balance.

use anchor_lang::prelude::*;

use crate::error::LotteryError;
use crate::prize;
use crate::state::{Lottery, Prize, Round, Ticket};

/// Settles `ticket` for `caller`.
///
/// All checks run before any state changes. On success the ticket is marked
/// claimed and the amount is debited from the balance; the caller moves the
/// lamports afterwards.
pub fn claim(
    lottery: &mut Lottery,
    round: &Round,
    ticket: &mut Ticket,
    caller: &Pubkey,
) -> Result<Prize> {
    require_keys_eq!(ticket.owner, *caller, LotteryError::Unauthorized);
    require!(round.is_announced(), LotteryError::ResultsNotAnnounced);
    require!(!ticket.claimed, LotteryError::AlreadyClaimed);

    let prize = prize::compute(&lottery.config, ticket, round)?;
    let balance = lottery
        .balance
        .checked_sub(prize.amount)
        .ok_or(LotteryError::InsufficientFunds)?;
    let total_paid_out = lottery
        .total_paid_out
        .checked_add(prize.amount)
        .ok_or(LotteryError::MathOverflow)?;

    ticket.claimed = true;
    lottery.balance = balance;
    lottery.total_paid_out = total_paid_out;

    msg!(
        "Ticket {} claimed {} lamports (weight {})",
        ticket.id,
        prize.amount,
        prize.weight
    );
    Ok(prize)
}

/// Credits `amount` lamports deposited by a funder. Returns the new balance.
pub fn fund(lottery: &mut Lottery, amount: u64) -> Result<u64> {
    require!(amount > 0, LotteryError::InvalidInput);
    lottery.balance = lottery
        .balance
        .checked_add(amount)
        .ok_or(LotteryError::MathOverflow)?;
    Ok(lottery.balance)
}
