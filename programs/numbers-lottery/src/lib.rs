#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;
pub use instructions::*;

/// Program-wide constants: PDA seeds and size bounds.
pub mod constants;

/// Expansion of oracle words into winning numbers.
pub mod draw;

/// Custom error types returned when instructions fail.
pub mod error;

pub mod events;

/// Instruction handlers: account plumbing around the engine modules.
pub mod instructions;

/// Ticket purchases and ticket lookups.
pub mod ledger;

/// Round state machine: closing, fulfillment, opening the next round.
pub mod lifecycle;

pub mod prize;

/// Randomness oracle client: Switchboard on-demand accounts.
pub mod randomness;

/// Prize claims and pool funding.
pub mod settlement;

/// On-chain account structures: `Lottery`, `Round`, `Ticket`.
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use state::{LotteryConfig, Prize, Ticket};

declare_id!("EEgQMm7jdRWoKmmFrRjY3Qq1t4xKDGfgqArAETkhbRxF");

#[program]
pub mod numbers_lottery {
    use super::*;

    pub fn initialize_lottery(ctx: Context<InitializeLottery>, config: LotteryConfig) -> Result<()> {
        process_initialize_lottery(ctx, config)
    }

    pub fn fund_pool(ctx: Context<FundPool>, amount: u64) -> Result<()> {
        process_fund_pool(ctx, amount)
    }

    pub fn buy_ticket<'info>(
        ctx: Context<'_, '_, '_, 'info, BuyTicket<'info>>,
        round_id: u64,
        count: u64,
        numbers: Vec<u16>,
        payment: u64,
    ) -> Result<Vec<u64>> {
        process_buy_ticket(ctx, round_id, count, numbers, payment)
    }

    pub fn check_ready(ctx: Context<CheckReady>) -> Result<bool> {
        process_check_ready(ctx)
    }

    pub fn close_round(ctx: Context<CloseRound>) -> Result<()> {
        process_close_round(ctx)
    }

    pub fn reveal_winning_numbers(ctx: Context<RevealWinningNumbers>, round_id: u64) -> Result<()> {
        process_reveal_winning_numbers(ctx, round_id)
    }

    pub fn calculate_prize(ctx: Context<CalculatePrize>, ticket_id: u64) -> Result<Prize> {
        process_calculate_prize(ctx, ticket_id)
    }

    pub fn claim_prize(ctx: Context<ClaimPrize>, ticket_id: u64) -> Result<u64> {
        process_claim_prize(ctx, ticket_id)
    }

    pub fn get_ticket(ctx: Context<GetTicket>, ticket_id: u64) -> Result<Ticket> {
        process_get_ticket(ctx, ticket_id)
    }

    pub fn get_ticket_numbers(ctx: Context<GetTicket>, ticket_id: u64) -> Result<Vec<u16>> {
        process_get_ticket_numbers(ctx, ticket_id)
    }

    pub fn get_tickets_bought(ctx: Context<GetRound>, round_id: u64) -> Result<Vec<u64>> {
        process_get_tickets_bought(ctx, round_id)
    }

    pub fn get_round_tickets(ctx: Context<GetRound>, round_id: u64) -> Result<Vec<Ticket>> {
        process_get_round_tickets(ctx, round_id)
    }

    pub fn get_winning_numbers(ctx: Context<GetRound>, round_id: u64) -> Result<Vec<u16>> {
        process_get_winning_numbers(ctx, round_id)
    }

    pub fn get_contract_value(ctx: Context<GetContractValue>) -> Result<u64> {
        process_get_contract_value(ctx)
    }
}
