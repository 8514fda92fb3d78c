use anchor_lang::prelude::*;
use anchor_lang::{AccountDeserialize, AccountSerialize, Owner};
use std::ops::Range;

use crate::constants::{MAX_DRAW_SIZE, MAX_SELECTION_SIZE, ROUND_SEED, TICKET_SEED};
use crate::error::LotteryError;

/// When the round being drawn becomes eligible to close.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum ClosePolicy {
    /// Close once `seconds` have elapsed since the round opened.
    Interval { seconds: i64 },
    /// Close once the round holds at least `tickets` tickets.
    Threshold { tickets: u64 },
}

/// What a ticket with zero payout weight yields.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum ZeroMatchPolicy {
    /// The prize is `(0, 0)` and claiming it only marks the ticket.
    Silent,
    /// Computing or claiming the prize fails with `NoWinningMatch`.
    Reject,
}

/// Deployment parameters. Set once by the administrator, read-only afterwards.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, InitSpace)]
pub struct LotteryConfig {
    /// Price of one ticket, in lamports.
    pub ticket_price: u64,

    /// Largest selectable and drawable number; numbers live in `[1, number_ceiling]`.
    pub number_ceiling: u16,

    /// How many numbers every ticket selects.
    pub selection_size: u8,

    /// How many winning numbers every round draws.
    pub draw_size: u8,

    pub close_policy: ClosePolicy,

    /// Payout weight indexed by match count. Has `selection_size + 1` entries,
    /// starts at zero and never decreases.
    #[max_len(17)]
    pub payout_table: Vec<u64>,

    /// Scalar applied on top of `weight * ticket_price`.
    pub payout_multiplier: u64,

    pub zero_match_policy: ZeroMatchPolicy,
}

impl LotteryConfig {
    pub fn validate(&self) -> Result<()> {
        let selection = usize::from(self.selection_size);
        let draw = usize::from(self.draw_size);
        let ceiling = usize::from(self.number_ceiling);

        require!(self.ticket_price > 0, LotteryError::InvalidConfig);
        require!(
            (1..=MAX_SELECTION_SIZE).contains(&selection) && selection <= ceiling,
            LotteryError::InvalidConfig
        );
        require!(
            (1..=MAX_DRAW_SIZE).contains(&draw) && draw <= ceiling,
            LotteryError::InvalidConfig
        );
        match self.close_policy {
            ClosePolicy::Interval { seconds } => {
                require!(seconds > 0, LotteryError::InvalidConfig)
            }
            ClosePolicy::Threshold { tickets } => {
                require!(tickets > 0, LotteryError::InvalidConfig)
            }
        }
        require!(
            self.payout_table.len() == selection + 1,
            LotteryError::InvalidConfig
        );
        require!(self.payout_table[0] == 0, LotteryError::InvalidConfig);
        require!(
            self.payout_table.windows(2).all(|pair| pair[0] <= pair[1]),
            LotteryError::InvalidConfig
        );
        require!(self.payout_multiplier >= 1, LotteryError::InvalidConfig);
        Ok(())
    }

    /// Checks a ticket's numbers: right cardinality, in range, no repeats.
    pub fn validate_selection(&self, numbers: &[u16]) -> Result<()> {
        require!(
            numbers.len() == usize::from(self.selection_size),
            LotteryError::InvalidInput
        );
        for (index, number) in numbers.iter().enumerate() {
            require!(
                (1..=self.number_ceiling).contains(number),
                LotteryError::InvalidInput
            );
            require!(
                !numbers[..index].contains(number),
                LotteryError::InvalidInput
            );
        }
        Ok(())
    }
}

/// Singleton engine state: configuration, round cursor and the ledger balance.
#[account]
#[derive(InitSpace)]
pub struct Lottery {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// The administrator that initialized the lottery.
    pub authority: Pubkey,

    pub config: LotteryConfig,

    /// Highest round id ever created. `0` until the first purchase.
    pub last_round_id: u64,

    /// The oldest round not yet announced; the one the trigger closes next.
    pub draw_round_id: u64,

    /// Whether `draw_round_id` is waiting on the randomness oracle.
    pub draw_in_flight: bool,

    /// Id the next purchased ticket receives. Ticket ids start at `1`.
    pub next_ticket_id: u64,

    /// Lamports backing prizes. The rent reserve of this account is never part of it.
    pub balance: u64,

    /// Lamports paid out by claims so far.
    pub total_paid_out: u64,
}

impl Lottery {
    /// Round that a purchase made now attaches to.
    ///
    /// Only the newest round ever accepts tickets. When the newest round is
    /// already waiting on randomness the purchase goes to the round after it,
    /// which the purchase itself creates.
    pub fn purchase_round_id(&self) -> u64 {
        let newest_is_drawing =
            self.last_round_id == self.draw_round_id && self.draw_in_flight;
        if self.last_round_id == 0 || newest_is_drawing {
            self.last_round_id + 1
        } else {
            self.last_round_id
        }
    }

    pub fn ticket_exists(&self, ticket_id: u64) -> bool {
        ticket_id != 0 && ticket_id < self.next_ticket_id
    }

    pub fn round_exists(&self, round_id: u64) -> bool {
        round_id != 0 && round_id <= self.last_round_id
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum RoundStatus {
    Open,
    AwaitingRandomness,
    Announced,
}

/// Correlates an outstanding oracle request with the round it finalizes.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct RandomnessRequest {
    pub round_id: u64,
    pub request_id: Pubkey,
    pub fulfilled: bool,
}

#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct Round {
    pub bump: u8,

    /// Round number, starting at `1`. A zeroed account reads as `0` until opened.
    pub id: u64,

    pub status: RoundStatus,

    /// UNIX timestamp the round became the one being drawn (or was created).
    pub opened_at: i64,

    /// Tickets of this round are the ids `first_ticket_id..first_ticket_id + ticket_count`.
    pub first_ticket_id: u64,

    pub ticket_count: u64,

    /// Empty until the round is announced.
    #[max_len(32)]
    pub winning_numbers: Vec<u16>,

    pub randomness_request: Option<RandomnessRequest>,

    pub closed_at: i64,

    pub announced_at: i64,
}

impl Round {
    /// PDA and bump of round `round_id`.
    pub fn address(round_id: u64, program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[ROUND_SEED, round_id.to_le_bytes().as_ref()], program_id)
    }

    pub fn is_opened(&self) -> bool {
        self.id != 0
    }

    pub fn is_announced(&self) -> bool {
        self.status == RoundStatus::Announced
    }

    pub fn ticket_ids(&self) -> Range<u64> {
        self.first_ticket_id..self.first_ticket_id + self.ticket_count
    }

    pub fn contains_ticket(&self, ticket_id: u64) -> bool {
        self.ticket_ids().contains(&ticket_id)
    }
}

#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub bump: u8,

    /// Global ticket id, strictly increasing across rounds.
    pub id: u64,

    pub owner: Pubkey,

    /// The round that accepted the purchase. Never changes.
    pub round_id: u64,

    /// Numbers exactly as selected at purchase.
    #[max_len(16)]
    pub numbers: Vec<u16>,

    pub claimed: bool,
}

impl Ticket {
    /// PDA and bump of ticket `ticket_id`.
    pub fn address(ticket_id: u64, program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[TICKET_SEED, ticket_id.to_le_bytes().as_ref()], program_id)
    }
}

/// Result of the prize calculation for one ticket.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prize {
    pub weight: u64,
    pub amount: u64,
}

/// Reads a program-owned record from an account that may not exist yet.
pub fn load_record<T: AccountDeserialize + Owner>(info: &AccountInfo) -> Result<T> {
    require_keys_eq!(*info.owner, T::owner(), LotteryError::NotFound);
    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut &data[..])
}

/// Writes a record back into an account created by this program.
pub fn store_record<T: AccountSerialize>(record: &T, info: &AccountInfo) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data[..];
    record.try_serialize(&mut writer)
}
