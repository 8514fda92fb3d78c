//! Round lifecycle: `Open -> AwaitingRandomness -> Announced`.
//!
//! Rounds are drawn strictly in order. `Lottery::draw_round_id` points at the
//! oldest round not yet announced; only that round can be closed, and only
//! its outstanding request can be fulfilled.

use anchor_lang::prelude::*;

use crate::draw::expand_winning_numbers;
use crate::error::LotteryError;
use crate::randomness::{Fulfillment, RandomnessGateway};
use crate::state::{ClosePolicy, Lottery, RandomnessRequest, Round, RoundStatus};

/// Turns a zeroed round account into round `round_id`, starting at the next
/// ticket id.
pub fn open_round(lottery: &mut Lottery, round: &mut Round, round_id: u64, now: i64) {
    round.id = round_id;
    round.status = RoundStatus::Open;
    round.opened_at = now;
    round.first_ticket_id = lottery.next_ticket_id;
    round.ticket_count = 0;
    round.winning_numbers.clear();
    round.randomness_request = None;
    round.closed_at = 0;
    round.announced_at = 0;

    lottery.last_round_id = lottery.last_round_id.max(round_id);
    if lottery.draw_round_id == 0 {
        lottery.draw_round_id = round_id;
    }
    msg!("Round {} opened at {}", round_id, now);
}

/// Whether `round` may be closed now under the configured policy.
pub fn check_ready(lottery: &Lottery, round: &Round, now: i64) -> bool {
    if !round.is_opened() || round.id != lottery.draw_round_id {
        return false;
    }
    if round.status != RoundStatus::Open || round.randomness_request.is_some() {
        return false;
    }
    match lottery.config.close_policy {
        ClosePolicy::Interval { seconds } => {
            now.saturating_sub(round.opened_at) >= seconds
        }
        ClosePolicy::Threshold { tickets } => round.ticket_count >= tickets,
    }
}

/// Closes the round being drawn and issues its randomness request.
///
/// Purchases made from here on go to the next round.
pub fn close_round<G: RandomnessGateway>(
    lottery: &mut Lottery,
    round: &mut Round,
    gateway: &mut G,
    now: i64,
) -> Result<Pubkey> {
    require!(
        round.is_opened() && round.id == lottery.draw_round_id,
        LotteryError::WrongRound
    );
    require!(
        round.status == RoundStatus::Open && round.randomness_request.is_none(),
        LotteryError::AlreadyClosing
    );
    if !check_ready(lottery, round, now) {
        msg!(
            "Round {} is not ready: opened at {}, {} tickets",
            round.id,
            round.opened_at,
            round.ticket_count
        );
        return err!(LotteryError::NotReady);
    }

    let request_id = gateway.request_randomness(round.id)?;

    round.status = RoundStatus::AwaitingRandomness;
    round.closed_at = now;
    round.randomness_request = Some(RandomnessRequest {
        round_id: round.id,
        request_id,
        fulfilled: false,
    });
    lottery.draw_in_flight = true;

    Ok(request_id)
}

/// The outstanding request of `round` if it is `request_id`.
///
/// Reading the oracle's answer can fail for reasons of its own, so callers
/// run this first to report duplicates and strangers as such.
pub fn require_pending_request(
    lottery: &Lottery,
    round: &Round,
    request_id: &Pubkey,
) -> Result<RandomnessRequest> {
    let request = round
        .randomness_request
        .filter(|request| request.request_id == *request_id)
        .ok_or(LotteryError::UnknownRequest)?;
    require!(
        !request.fulfilled && !round.is_announced(),
        LotteryError::AlreadyFulfilled
    );
    require!(
        round.status == RoundStatus::AwaitingRandomness
            && request.round_id == round.id
            && round.id == lottery.draw_round_id,
        LotteryError::UnknownRequest
    );
    Ok(request)
}

/// Finalizes `round` with the oracle's words and advances the draw to
/// `next_round`.
///
/// `next_round` is either the already opened next round, which becomes the
/// round being drawn and has its clock restarted, or a zeroed account that is
/// opened here.
pub fn on_randomness_fulfilled(
    lottery: &mut Lottery,
    round: &mut Round,
    next_round: &mut Round,
    fulfillment: &Fulfillment,
    now: i64,
) -> Result<()> {
    let mut request = require_pending_request(lottery, round, &fulfillment.request_id)?;

    let next_round_id = round
        .id
        .checked_add(1)
        .ok_or(LotteryError::MathOverflow)?;
    require!(
        !next_round.is_opened() || next_round.id == next_round_id,
        LotteryError::WrongRound
    );

    let winning_numbers = expand_winning_numbers(
        &fulfillment.raw_words,
        lottery.config.draw_size,
        lottery.config.number_ceiling,
    )?;

    request.fulfilled = true;
    round.randomness_request = Some(request);
    round.winning_numbers = winning_numbers;
    round.status = RoundStatus::Announced;
    round.announced_at = now;

    lottery.draw_in_flight = false;
    lottery.draw_round_id = next_round_id;

    if next_round.is_opened() {
        next_round.opened_at = now;
    } else {
        open_round(lottery, next_round, next_round_id, now);
    }

    msg!(
        "Round {} announced: {:?}",
        round.id,
        round.winning_numbers
    );
    Ok(())
}

/// Fails unless `round_id` names a created round. Id `0` reads as the empty
/// lottery, ids past the newest round as not yet created.
pub fn require_round_created(lottery: &Lottery, round_id: u64) -> Result<()> {
    require!(round_id != 0, LotteryError::EmptyRound);
    require!(
        lottery.round_exists(round_id),
        LotteryError::RoundNotCreated
    );
    Ok(())
}
