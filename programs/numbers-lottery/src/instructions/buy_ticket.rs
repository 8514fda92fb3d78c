use anchor_lang::prelude::*;
use anchor_lang::system_program;

use crate::constants::{LOTTERY_SEED, ROUND_SEED, TICKET_SEED};
use crate::error::LotteryError;
use crate::events::TicketsPurchased;
use crate::ledger::{self, Purchase};
use crate::state::{store_record, Lottery, Round, Ticket};

/// Accounts required to buy tickets.
///
/// The ticket accounts are passed as remaining accounts, one writable
/// `["ticket", id]` PDA per ticket, in id order starting at
/// `lottery.next_ticket_id`.
#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct BuyTicket<'info> {
    /// The account paying for the tickets and their accounts.
    #[account(mut)]
    pub buyer: Signer<'info>,

    /// Lottery state account tracking the round cursor and balance.
    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// The round accepting purchases. Created by the first purchase into it.
    #[account(
        init_if_needed,
        payer = buyer,
        space = 8 + Round::INIT_SPACE,
        seeds = [ROUND_SEED, round_id.to_le_bytes().as_ref()],
        bump
    )]
    pub round: Box<Account<'info, Round>>,

    /// System program interface
    pub system_program: Program<'info, System>,
}

/// Buys `count` tickets that all select `numbers`.
///
/// Steps performed:
/// 1. Validate count, numbers, payment and the round (ledger).
/// 2. Create one ticket account per ticket.
/// 3. Transfer the payment from the buyer to the lottery account.
///
/// Returns the new ticket ids.
pub fn process_buy_ticket<'info>(
    ctx: Context<'_, '_, '_, 'info, BuyTicket<'info>>,
    round_id: u64,
    count: u64,
    numbers: Vec<u16>,
    payment: u64,
) -> Result<Vec<u64>> {
    let clock = Clock::get()?;
    let buyer = ctx.accounts.buyer.key();

    let purchase = Purchase {
        buyer,
        round_id,
        count,
        numbers: &numbers,
        payment,
    };
    let tickets = ledger::buy_tickets(
        &mut ctx.accounts.lottery,
        &mut ctx.accounts.round,
        &purchase,
        clock.unix_timestamp,
    )?;
    ctx.accounts.round.bump = ctx.bumps.round;

    let bumps = check_ticket_accounts(&tickets, ctx.remaining_accounts, ctx.program_id)?;

    let space = 8 + Ticket::INIT_SPACE;
    let rent_minimum = Rent::get()?.minimum_balance(space);
    let mut ticket_ids = Vec::with_capacity(tickets.len());

    for ((mut ticket, ticket_info), bump) in tickets
        .into_iter()
        .zip(ctx.remaining_accounts.iter())
        .zip(bumps)
    {
        let id_bytes = ticket.id.to_le_bytes();
        let signer_seeds: &[&[&[u8]]] = &[&[TICKET_SEED, id_bytes.as_ref(), &[bump]]];
        create_ticket_account(
            &ctx.accounts.system_program,
            &ctx.accounts.buyer,
            ticket_info,
            signer_seeds,
            space,
            rent_minimum,
            ctx.program_id,
        )?;

        ticket.bump = bump;
        store_record(&ticket, ticket_info)?;
        ticket_ids.push(ticket.id);
    }

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.buyer.to_account_info(),
                to: ctx.accounts.lottery.to_account_info(),
            },
        ),
        payment,
    )?;

    msg!(
        "Bought tickets {:?} in round {} for {} lamports",
        ticket_ids,
        round_id,
        payment
    );
    emit!(TicketsPurchased {
        round_id,
        buyer,
        ticket_ids: ticket_ids.clone(),
        payment,
    });
    Ok(ticket_ids)
}

/// Checks that `ticket_infos` are the PDAs of `tickets`, in order, and
/// returns their bumps.
pub(crate) fn check_ticket_accounts(
    tickets: &[Ticket],
    ticket_infos: &[AccountInfo],
    program_id: &Pubkey,
) -> Result<Vec<u8>> {
    if ticket_infos.len() != tickets.len() {
        msg!(
            "Expected {} ticket accounts, got {}",
            tickets.len(),
            ticket_infos.len()
        );
        return err!(LotteryError::InvalidInput);
    }

    tickets
        .iter()
        .zip(ticket_infos)
        .map(|(ticket, info)| {
            let (address, bump) = Ticket::address(ticket.id, program_id);
            require_keys_eq!(address, *info.key, LotteryError::InvalidInput);
            Ok(bump)
        })
        .collect()
}

/// How a ticket address is turned into a program-owned account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AccountFunding {
    /// The address holds no lamports: a single `create_account`.
    Create { lamports: u64 },
    /// The address already holds lamports, so `create_account` would fail.
    /// Top it up to the rent minimum, then allocate and assign in place.
    Adopt { top_up: u64 },
}

pub(crate) fn plan_account_funding(current_lamports: u64, rent_minimum: u64) -> AccountFunding {
    if current_lamports == 0 {
        AccountFunding::Create {
            lamports: rent_minimum,
        }
    } else {
        AccountFunding::Adopt {
            top_up: rent_minimum.saturating_sub(current_lamports),
        }
    }
}

fn create_ticket_account<'info>(
    system_program: &Program<'info, System>,
    payer: &Signer<'info>,
    ticket_info: &AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    space: usize,
    rent_minimum: u64,
    program_id: &Pubkey,
) -> Result<()> {
    match plan_account_funding(ticket_info.lamports(), rent_minimum) {
        AccountFunding::Create { lamports } => system_program::create_account(
            CpiContext::new_with_signer(
                system_program.to_account_info(),
                system_program::CreateAccount {
                    from: payer.to_account_info(),
                    to: ticket_info.clone(),
                },
                signer_seeds,
            ),
            lamports,
            space as u64,
            program_id,
        ),
        AccountFunding::Adopt { top_up } => {
            msg!("Ticket account {} was pre-funded", ticket_info.key);
            if top_up > 0 {
                system_program::transfer(
                    CpiContext::new(
                        system_program.to_account_info(),
                        system_program::Transfer {
                            from: payer.to_account_info(),
                            to: ticket_info.clone(),
                        },
                    ),
                    top_up,
                )?;
            }
            system_program::allocate(
                CpiContext::new_with_signer(
                    system_program.to_account_info(),
                    system_program::Allocate {
                        account_to_allocate: ticket_info.clone(),
                    },
                    signer_seeds,
                ),
                space as u64,
            )?;
            system_program::assign(
                CpiContext::new_with_signer(
                    system_program.to_account_info(),
                    system_program::Assign {
                        account_to_assign: ticket_info.clone(),
                    },
                    signer_seeds,
                ),
                program_id,
            )
        }
    }
}
