use anchor_lang::prelude::*;

use crate::error::LotteryError;
use crate::state::{LotteryConfig, Prize, Round, Ticket, ZeroMatchPolicy};

/// How many of the ticket's numbers were drawn.
pub fn match_count(ticket_numbers: &[u16], winning_numbers: &[u16]) -> usize {
    ticket_numbers
        .iter()
        .filter(|number| winning_numbers.contains(*number))
        .count()
}

/// Prize of `ticket` in its announced `round`. Reads only; calling it again
/// gives the same answer.
pub fn compute(config: &LotteryConfig, ticket: &Ticket, round: &Round) -> Result<Prize> {
    require!(round.is_announced(), LotteryError::ResultsNotAnnounced);
    require!(ticket.round_id == round.id, LotteryError::WrongRound);

    let matches = match_count(&ticket.numbers, &round.winning_numbers);
    let weight = *config
        .payout_table
        .get(matches)
        .ok_or(LotteryError::InvalidConfig)?;

    if weight == 0 && config.zero_match_policy == ZeroMatchPolicy::Reject {
        return err!(LotteryError::NoWinningMatch);
    }

    let amount = weight
        .checked_mul(config.ticket_price)
        .and_then(|value| value.checked_mul(config.payout_multiplier))
        .ok_or(LotteryError::MathOverflow)?;

    Ok(Prize { weight, amount })
}
