//! Ticket ledger: purchases and the read-only ticket projections.

use anchor_lang::prelude::*;

use crate::constants::MAX_TICKETS_PER_PURCHASE;
use crate::error::LotteryError;
use crate::lifecycle;
use crate::state::{Lottery, Round, RoundStatus, Ticket};

/// One `buy_ticket` request.
#[derive(Clone, Copy, Debug)]
pub struct Purchase<'a> {
    pub buyer: Pubkey,
    /// Round the caller supplied an account for.
    pub round_id: u64,
    pub count: u64,
    pub numbers: &'a [u16],
    /// Lamports the buyer pays.
    pub payment: u64,
}

/// Records `purchase.count` tickets in `round` and credits the payment to the
/// ledger balance.
///
/// `round` may be a freshly created account, in which case it is opened here.
/// Nothing is modified unless every check passes.
pub fn buy_tickets(
    lottery: &mut Lottery,
    round: &mut Round,
    purchase: &Purchase,
    now: i64,
) -> Result<Vec<Ticket>> {
    require!(
        (1..=MAX_TICKETS_PER_PURCHASE).contains(&purchase.count),
        LotteryError::InvalidInput
    );
    lottery.config.validate_selection(purchase.numbers)?;

    let expected_payment = lottery
        .config
        .ticket_price
        .checked_mul(purchase.count)
        .ok_or(LotteryError::InvalidInput)?;
    if purchase.payment != expected_payment {
        msg!(
            "Expected payment of {} lamports, got {}",
            expected_payment,
            purchase.payment
        );
        return err!(LotteryError::InvalidInput);
    }

    require!(
        purchase.round_id == lottery.purchase_round_id(),
        LotteryError::WrongRound
    );
    require!(
        !round.is_opened()
            || (round.id == purchase.round_id && round.status == RoundStatus::Open),
        LotteryError::WrongRound
    );

    let first_id = lottery.next_ticket_id;
    let next_ticket_id = first_id
        .checked_add(purchase.count)
        .ok_or(LotteryError::MathOverflow)?;
    let balance = lottery
        .balance
        .checked_add(purchase.payment)
        .ok_or(LotteryError::MathOverflow)?;

    if !round.is_opened() {
        lifecycle::open_round(lottery, round, purchase.round_id, now);
    }
    round.ticket_count += purchase.count;
    lottery.next_ticket_id = next_ticket_id;
    lottery.balance = balance;

    let tickets = (first_id..next_ticket_id)
        .map(|id| Ticket {
            bump: 0,
            id,
            owner: purchase.buyer,
            round_id: round.id,
            numbers: purchase.numbers.to_vec(),
            claimed: false,
        })
        .collect();
    Ok(tickets)
}

/// Fails with `NotFound` unless `ticket_id` was issued.
pub fn require_ticket(lottery: &Lottery, ticket_id: u64) -> Result<()> {
    require!(lottery.ticket_exists(ticket_id), LotteryError::NotFound);
    Ok(())
}

/// Ticket ids of `round`, in purchase order.
pub fn tickets_bought(lottery: &Lottery, round: &Round) -> Result<Vec<u64>> {
    require!(lottery.round_exists(round.id), LotteryError::NotFound);
    Ok(round.ticket_ids().collect())
}

/// Fails unless `ticket` was bought in `round`.
pub fn require_round_ticket(round: &Round, ticket: &Ticket) -> Result<()> {
    require!(
        ticket.round_id == round.id && round.contains_ticket(ticket.id),
        LotteryError::WrongRound
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{expect_error, keno_config, Harness, PRICE};

    const NUMBERS: [u16; 5] = [1, 2, 3, 4, 5];

    #[test]
    fn first_purchase_opens_round_one() {
        let mut harness = Harness::new(keno_config());
        let buyer = Pubkey::new_unique();

        let ids = harness.buy(buyer, 2, &NUMBERS).unwrap();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(harness.lottery.last_round_id, 1);
        assert_eq!(harness.lottery.draw_round_id, 1);
        assert_eq!(harness.lottery.balance, 2 * PRICE);

        let round = &harness.rounds[&1];
        assert_eq!(round.status, RoundStatus::Open);
        assert_eq!(round.opened_at, harness.now);
        assert_eq!(tickets_bought(&harness.lottery, round).unwrap(), vec![1, 2]);
    }

    #[test]
    fn tickets_keep_their_numbers_and_owner() {
        let mut harness = Harness::new(keno_config());
        let buyer = Pubkey::new_unique();
        let numbers = [79, 3, 41, 1, 12];

        for id in harness.buy(buyer, 3, &numbers).unwrap() {
            let ticket = &harness.tickets[&id];
            assert_eq!(ticket.numbers, numbers.to_vec());
            assert_eq!(ticket.owner, buyer);
            assert_eq!(ticket.round_id, 1);
            assert!(!ticket.claimed);
        }
    }

    #[test]
    fn ids_increase_across_purchases() {
        let mut harness = Harness::new(keno_config());
        let first = harness.buy(Pubkey::new_unique(), 1, &NUMBERS).unwrap();
        let second = harness.buy(Pubkey::new_unique(), 2, &NUMBERS).unwrap();
        assert_eq!(first, vec![1]);
        assert_eq!(second, vec![2, 3]);
        assert_eq!(
            tickets_bought(&harness.lottery, &harness.rounds[&1]).unwrap(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn payment_must_match_exactly() {
        let mut harness = Harness::new(keno_config());
        let buyer = Pubkey::new_unique();

        for payment in [0, PRICE, 2 * PRICE - 1, 2 * PRICE + 1, 3 * PRICE] {
            expect_error(
                harness.buy_paying(buyer, 2, &NUMBERS, payment),
                LotteryError::InvalidInput,
            );
        }
        assert_eq!(harness.lottery.balance, 0);
        assert_eq!(harness.lottery.next_ticket_id, 1);
        assert!(harness.tickets.is_empty());
        assert!(harness.rounds.is_empty());
    }

    #[test]
    fn rejects_bad_counts_and_selections() {
        let mut harness = Harness::new(keno_config());
        let buyer = Pubkey::new_unique();

        expect_error(harness.buy(buyer, 0, &NUMBERS), LotteryError::InvalidInput);
        expect_error(
            harness.buy(buyer, MAX_TICKETS_PER_PURCHASE + 1, &NUMBERS),
            LotteryError::InvalidInput,
        );
        expect_error(
            harness.buy(buyer, 1, &[1, 2, 3, 4, 80]),
            LotteryError::InvalidInput,
        );
        expect_error(harness.buy(buyer, 1, &[1, 2, 3]), LotteryError::InvalidInput);
        expect_error(
            harness.buy(buyer, 1, &[7, 7, 1, 2, 3]),
            LotteryError::InvalidInput,
        );
        expect_error(
            harness.buy_paying(buyer, u64::MAX, &NUMBERS, 0),
            LotteryError::InvalidInput,
        );
        assert_eq!(harness.lottery.balance, 0);
    }

    #[test]
    fn wrong_round_account_is_rejected() {
        let mut harness = Harness::new(keno_config());
        let mut lottery = harness.lottery.clone();
        let mut round = crate::testing::zeroed_round();
        let purchase = Purchase {
            buyer: Pubkey::new_unique(),
            round_id: 2,
            count: 1,
            numbers: &NUMBERS,
            payment: PRICE,
        };
        expect_error(
            buy_tickets(&mut lottery, &mut round, &purchase, harness.now),
            LotteryError::WrongRound,
        );

        harness.buy(Pubkey::new_unique(), 1, &NUMBERS).unwrap();
        let mut lottery = harness.lottery.clone();
        let mut announced = crate::testing::announced_round(1, (1..=20).collect());
        let purchase = Purchase { round_id: 1, ..purchase };
        expect_error(
            buy_tickets(&mut lottery, &mut announced, &purchase, harness.now),
            LotteryError::WrongRound,
        );
    }

    #[test]
    fn lookups_of_unknown_ids_fail() {
        let mut harness = Harness::new(keno_config());
        harness.buy(Pubkey::new_unique(), 2, &NUMBERS).unwrap();

        assert!(require_ticket(&harness.lottery, 1).is_ok());
        assert!(require_ticket(&harness.lottery, 2).is_ok());
        expect_error(require_ticket(&harness.lottery, 0), LotteryError::NotFound);
        expect_error(require_ticket(&harness.lottery, 3), LotteryError::NotFound);

        let never_opened = crate::testing::zeroed_round();
        expect_error(
            tickets_bought(&harness.lottery, &never_opened),
            LotteryError::NotFound,
        );
    }

    #[test]
    fn tickets_belong_to_their_round_only() {
        let mut harness = Harness::new(keno_config());
        harness.buy(Pubkey::new_unique(), 2, &NUMBERS).unwrap();
        let round = harness.rounds[&1].clone();

        for id in [1, 2] {
            assert!(require_round_ticket(&round, &harness.tickets[&id]).is_ok());
        }

        let foreign = crate::testing::ticket_in(3, 2, NUMBERS.to_vec());
        expect_error(require_round_ticket(&round, &foreign), LotteryError::WrongRound);

        let mut relabeled = harness.tickets[&1].clone();
        relabeled.id = 7;
        expect_error(require_round_ticket(&round, &relabeled), LotteryError::WrongRound);
    }
}
