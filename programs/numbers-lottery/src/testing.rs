//! Fixtures shared by the unit tests.

use std::collections::BTreeMap;
use std::fmt::Debug;

use anchor_lang::prelude::*;

use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::error::LotteryError;
use crate::instructions::reveal_winning_numbers;
use crate::ledger::{self, Purchase};
use crate::lifecycle;
use crate::randomness::{Fulfillment, MockGateway, RandomnessGateway, SwitchboardGateway};
use crate::settlement;
use crate::state::{
    ClosePolicy, Lottery, LotteryConfig, Prize, Round, RoundStatus, Ticket, ZeroMatchPolicy,
};

pub const PRICE: u64 = 10_000_000;
pub const INTERVAL: i64 = 900;

pub fn expect_error<T: Debug>(result: Result<T>, expected: LotteryError) {
    match result {
        Ok(value) => panic!("expected {expected:?}, got Ok({value:?})"),
        Err(error) => assert_eq!(error, anchor_lang::error::Error::from(expected)),
    }
}

/// Pick 5 of 79, 20 drawn, paying on 2 or more matches.
pub fn keno_config() -> LotteryConfig {
    LotteryConfig {
        ticket_price: PRICE,
        number_ceiling: 79,
        selection_size: 5,
        draw_size: 20,
        close_policy: ClosePolicy::Interval { seconds: INTERVAL },
        payout_table: vec![0, 0, 1, 3, 10, 50],
        payout_multiplier: 1,
        zero_match_policy: ZeroMatchPolicy::Silent,
    }
}

pub fn lottery_with(config: LotteryConfig) -> Lottery {
    Lottery {
        bump: 255,
        authority: Pubkey::default(),
        config,
        last_round_id: 0,
        draw_round_id: 0,
        draw_in_flight: false,
        next_ticket_id: 1,
        balance: 0,
        total_paid_out: 0,
    }
}

/// A round account as `init_if_needed` leaves it.
pub fn zeroed_round() -> Round {
    Round {
        bump: 0,
        id: 0,
        status: RoundStatus::Open,
        opened_at: 0,
        first_ticket_id: 0,
        ticket_count: 0,
        winning_numbers: Vec::new(),
        randomness_request: None,
        closed_at: 0,
        announced_at: 0,
    }
}

pub fn announced_round(id: u64, winning_numbers: Vec<u16>) -> Round {
    Round {
        id,
        status: RoundStatus::Announced,
        winning_numbers,
        ..zeroed_round()
    }
}

pub fn ticket_in(id: u64, round_id: u64, numbers: Vec<u16>) -> Ticket {
    Ticket {
        bump: 0,
        id,
        owner: Pubkey::default(),
        round_id,
        numbers,
        claimed: false,
    }
}

pub fn clock_at(slot: u64) -> Clock {
    Clock {
        slot,
        ..Clock::default()
    }
}

/// Data of a Switchboard randomness account committed at `seed_slot` whose
/// `value` is readable in `reveal_slot`.
pub fn randomness_account_bytes(seed_slot: u64, reveal_slot: u64, value: [u8; 32]) -> Vec<u8> {
    let mut data = vec![0u8; RandomnessAccountData::size()];
    data[..8].copy_from_slice(
        &<RandomnessAccountData as switchboard_on_demand::Discriminator>::DISCRIMINATOR,
    );
    data[104..112].copy_from_slice(&seed_slot.to_le_bytes());
    data[144..152].copy_from_slice(&reveal_slot.to_le_bytes());
    data[152..184].copy_from_slice(&value);
    data
}

/// In-memory stand-in for the program's accounts. Each operation works on
/// copies and commits them only on success, like a failed transaction.
pub struct Harness {
    pub lottery: Lottery,
    pub rounds: BTreeMap<u64, Round>,
    pub tickets: BTreeMap<u64, Ticket>,
    pub gateway: MockGateway,
    pub now: i64,
}

impl Harness {
    pub fn new(config: LotteryConfig) -> Self {
        config.validate().unwrap();
        Self {
            lottery: lottery_with(config),
            rounds: BTreeMap::new(),
            tickets: BTreeMap::new(),
            gateway: MockGateway::default(),
            now: 1_700_000_000,
        }
    }

    pub fn advance(&mut self, seconds: i64) {
        self.now += seconds;
    }

    fn round(&self, round_id: u64) -> Round {
        self.rounds
            .get(&round_id)
            .cloned()
            .unwrap_or_else(zeroed_round)
    }

    pub fn buy(&mut self, buyer: Pubkey, count: u64, numbers: &[u16]) -> Result<Vec<u64>> {
        let payment = PRICE.saturating_mul(count);
        self.buy_paying(buyer, count, numbers, payment)
    }

    pub fn buy_paying(
        &mut self,
        buyer: Pubkey,
        count: u64,
        numbers: &[u16],
        payment: u64,
    ) -> Result<Vec<u64>> {
        let round_id = self.lottery.purchase_round_id();
        let mut lottery = self.lottery.clone();
        let mut round = self.round(round_id);
        let purchase = Purchase {
            buyer,
            round_id,
            count,
            numbers,
            payment,
        };
        let tickets = ledger::buy_tickets(&mut lottery, &mut round, &purchase, self.now)?;

        let ids = tickets.iter().map(|ticket| ticket.id).collect();
        self.tickets
            .extend(tickets.into_iter().map(|ticket| (ticket.id, ticket)));
        self.rounds.insert(round_id, round);
        self.lottery = lottery;
        Ok(ids)
    }

    pub fn check_ready(&self) -> bool {
        let round = self.round(self.lottery.draw_round_id);
        lifecycle::check_ready(&self.lottery, &round, self.now)
    }

    pub fn close(&mut self) -> Result<Pubkey> {
        let mut gateway = std::mem::take(&mut self.gateway);
        let result = self.close_with(&mut gateway);
        self.gateway = gateway;
        result
    }

    pub fn close_with<G: RandomnessGateway>(&mut self, gateway: &mut G) -> Result<Pubkey> {
        let round_id = self.lottery.draw_round_id;
        let mut lottery = self.lottery.clone();
        let mut round = self.round(round_id);
        let request_id = lifecycle::close_round(&mut lottery, &mut round, gateway, self.now)?;
        self.rounds.insert(round_id, round);
        self.lottery = lottery;
        Ok(request_id)
    }

    pub fn fulfill(&mut self, round_id: u64, fulfillment: &Fulfillment) -> Result<()> {
        let now = self.now;
        self.announce(round_id, |lottery, round, next_round| {
            lifecycle::on_randomness_fulfilled(lottery, round, next_round, fulfillment, now)
        })
    }

    /// Runs `reveal_winning_numbers` against a Switchboard account.
    pub fn reveal(&mut self, round_id: u64, gateway: &SwitchboardGateway) -> Result<()> {
        let now = self.now;
        self.announce(round_id, |lottery, round, next_round| {
            reveal_winning_numbers::reveal(lottery, round, next_round, gateway, now)
        })
    }

    fn announce(
        &mut self,
        round_id: u64,
        apply: impl FnOnce(&mut Lottery, &mut Round, &mut Round) -> Result<()>,
    ) -> Result<()> {
        let mut lottery = self.lottery.clone();
        let mut round = self.round(round_id);
        let mut next_round = self.round(round_id + 1);
        apply(&mut lottery, &mut round, &mut next_round)?;
        self.rounds.insert(round_id, round);
        self.rounds.insert(round_id + 1, next_round);
        self.lottery = lottery;
        Ok(())
    }

    /// Answers the oldest pending oracle request. Returns the announced round.
    pub fn deliver(&mut self, raw_words: Vec<[u8; 32]>) -> Option<u64> {
        let (round_id, fulfillment) = self.gateway.respond(raw_words)?;
        self.fulfill(round_id, &fulfillment).unwrap();
        Some(round_id)
    }

    pub fn claim(&mut self, caller: Pubkey, ticket_id: u64) -> Result<Prize> {
        ledger::require_ticket(&self.lottery, ticket_id)?;
        let mut lottery = self.lottery.clone();
        let mut ticket = self.tickets[&ticket_id].clone();
        let round = self.round(ticket.round_id);
        let prize = settlement::claim(&mut lottery, &round, &mut ticket, &caller)?;
        self.tickets.insert(ticket_id, ticket);
        self.lottery = lottery;
        Ok(prize)
    }

    pub fn fund(&mut self, amount: u64) -> Result<u64> {
        let mut lottery = self.lottery.clone();
        let balance = settlement::fund(&mut lottery, amount)?;
        self.lottery = lottery;
        Ok(balance)
    }
}
