//! Read-only instructions. Each returns its answer as instruction return data
//! and leaves every account untouched.

use anchor_lang::prelude::*;

use crate::constants::{LOTTERY_SEED, ROUND_SEED, TICKET_SEED};
use crate::error::LotteryError;
use crate::ledger;
use crate::lifecycle;
use crate::prize;
use crate::state::{load_record, Lottery, Prize, Round, Ticket};

/// Loads ticket `ticket_id`, failing `NotFound` for ids never issued.
pub(crate) fn load_ticket(lottery: &Lottery, ticket_id: u64, info: &AccountInfo) -> Result<Ticket> {
    ledger::require_ticket(lottery, ticket_id)?;
    let ticket: Ticket = load_record(info)?;
    require!(ticket.id == ticket_id, LotteryError::NotFound);
    Ok(ticket)
}

/// Loads the round `ticket` was bought in from `info`, which must be that
/// round's PDA.
pub(crate) fn load_ticket_round(
    ticket: &Ticket,
    info: &AccountInfo,
    program_id: &Pubkey,
) -> Result<Round> {
    let (address, _) = Round::address(ticket.round_id, program_id);
    require_keys_eq!(address, *info.key, LotteryError::WrongRound);
    load_record(info)
}

#[derive(Accounts)]
#[instruction(ticket_id: u64)]
pub struct GetTicket<'info> {
    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// CHECK: Address is fixed by the seeds; the handler loads it if the id was issued.
    #[account(
        seeds = [TICKET_SEED, ticket_id.to_le_bytes().as_ref()],
        bump
    )]
    pub ticket: UncheckedAccount<'info>,
}

pub fn process_get_ticket(ctx: Context<GetTicket>, ticket_id: u64) -> Result<Ticket> {
    load_ticket(&ctx.accounts.lottery, ticket_id, &ctx.accounts.ticket)
}

pub fn process_get_ticket_numbers(ctx: Context<GetTicket>, ticket_id: u64) -> Result<Vec<u16>> {
    let ticket = load_ticket(&ctx.accounts.lottery, ticket_id, &ctx.accounts.ticket)?;
    Ok(ticket.numbers)
}

#[derive(Accounts)]
#[instruction(ticket_id: u64)]
pub struct CalculatePrize<'info> {
    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// CHECK: Address is fixed by the seeds; the handler loads it if the id was issued.
    #[account(
        seeds = [TICKET_SEED, ticket_id.to_le_bytes().as_ref()],
        bump
    )]
    pub ticket: UncheckedAccount<'info>,

    /// The round the ticket was bought in.
    /// CHECK: Checked against the ticket's round id in the handler.
    pub round: UncheckedAccount<'info>,
}

pub fn process_calculate_prize(ctx: Context<CalculatePrize>, ticket_id: u64) -> Result<Prize> {
    let lottery = &ctx.accounts.lottery;
    let ticket = load_ticket(lottery, ticket_id, &ctx.accounts.ticket)?;
    let round = load_ticket_round(&ticket, &ctx.accounts.round, ctx.program_id)?;
    prize::compute(&lottery.config, &ticket, &round)
}

#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct GetRound<'info> {
    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// CHECK: Address is fixed by the seeds; the handler loads it if the round was created.
    #[account(
        seeds = [ROUND_SEED, round_id.to_le_bytes().as_ref()],
        bump
    )]
    pub round: UncheckedAccount<'info>,
}

/// Ids of the tickets bought in `round_id`. The records themselves are read
/// with `get_round_tickets`.
pub fn process_get_tickets_bought(ctx: Context<GetRound>, round_id: u64) -> Result<Vec<u64>> {
    let lottery = &ctx.accounts.lottery;
    require!(lottery.round_exists(round_id), LotteryError::NotFound);
    let round: Round = load_record(&ctx.accounts.round)?;
    ledger::tickets_bought(lottery, &round)
}

/// Reads tickets of `round` from `ticket_infos`, which must be their PDAs in
/// increasing id order.
pub(crate) fn load_round_tickets(
    round: &Round,
    ticket_infos: &[AccountInfo],
    program_id: &Pubkey,
) -> Result<Vec<Ticket>> {
    let mut tickets: Vec<Ticket> = Vec::with_capacity(ticket_infos.len());
    for info in ticket_infos {
        let ticket: Ticket = load_record(info)?;
        let (address, _) = Ticket::address(ticket.id, program_id);
        require_keys_eq!(address, *info.key, LotteryError::InvalidInput);
        ledger::require_round_ticket(round, &ticket)?;
        if let Some(previous) = tickets.last() {
            require!(previous.id < ticket.id, LotteryError::InvalidInput);
        }
        tickets.push(ticket);
    }
    Ok(tickets)
}

/// Full records of the round's tickets passed as remaining accounts.
///
/// Return data holds about a dozen tickets, so callers page through the ids
/// from `get_tickets_bought`.
pub fn process_get_round_tickets(ctx: Context<GetRound>, round_id: u64) -> Result<Vec<Ticket>> {
    let lottery = &ctx.accounts.lottery;
    require!(lottery.round_exists(round_id), LotteryError::NotFound);
    let round: Round = load_record(&ctx.accounts.round)?;
    load_round_tickets(&round, ctx.remaining_accounts, ctx.program_id)
}

pub fn process_get_winning_numbers(ctx: Context<GetRound>, round_id: u64) -> Result<Vec<u16>> {
    lifecycle::require_round_created(&ctx.accounts.lottery, round_id)?;
    let round: Round = load_record(&ctx.accounts.round)?;
    Ok(round.winning_numbers)
}

#[derive(Accounts)]
pub struct GetContractValue<'info> {
    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump
    )]
    pub lottery: Box<Account<'info, Lottery>>,
}

/// The ledger balance backing prizes, in lamports.
pub fn process_get_contract_value(ctx: Context<GetContractValue>) -> Result<u64> {
    Ok(ctx.accounts.lottery.balance)
}
