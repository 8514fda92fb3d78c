use anchor_lang::prelude::*;

/// Seed of the singleton lottery PDA.
#[constant]
pub const LOTTERY_SEED: &[u8] = b"numbers_lottery";

/// Seed prefix of round PDAs, followed by the little-endian round id.
#[constant]
pub const ROUND_SEED: &[u8] = b"round";

/// Seed prefix of ticket PDAs, followed by the little-endian ticket id.
#[constant]
pub const TICKET_SEED: &[u8] = b"ticket";

/// Largest number of numbers a ticket may select.
pub const MAX_SELECTION_SIZE: usize = 16;

/// Largest number of winning numbers a round may draw.
pub const MAX_DRAW_SIZE: usize = 32;

/// Tickets created by one `buy_ticket` call. Each ticket is its own account,
/// so this is bounded by the accounts a transaction can carry.
pub const MAX_TICKETS_PER_PURCHASE: u64 = 10;

/// Domain tag mixed into every derived randomness block.
pub const DRAW_DOMAIN_TAG: &[u8] = b"numbers-lottery/draw";
