//! Events emitted for off-chain indexers and the upkeep trigger.

use anchor_lang::prelude::*;

#[event]
pub struct LotteryInitialized {
    pub lottery: Pubkey,
    pub authority: Pubkey,
    pub ticket_price: u64,
    pub number_ceiling: u16,
    pub selection_size: u8,
    pub draw_size: u8,
}

/// Emitted once per `buy_ticket`, carrying every ticket id it created.
#[event]
pub struct TicketsPurchased {
    pub round_id: u64,
    pub buyer: Pubkey,
    pub ticket_ids: Vec<u64>,
    pub payment: u64,
}

#[event]
pub struct RoundClosed {
    pub round_id: u64,
    /// Switchboard randomness account the round waits on.
    pub request_id: Pubkey,
    pub ticket_count: u64,
    pub closed_at: i64,
}

#[event]
pub struct RoundAnnounced {
    pub round_id: u64,
    pub winning_numbers: Vec<u16>,
    pub next_round_id: u64,
    pub announced_at: i64,
}

#[event]
pub struct PrizeClaimed {
    pub ticket_id: u64,
    pub round_id: u64,
    pub owner: Pubkey,
    pub weight: u64,
    pub amount: u64,
}

#[event]
pub struct PoolFunded {
    pub funder: Pubkey,
    pub amount: u64,
    pub balance: u64,
}
