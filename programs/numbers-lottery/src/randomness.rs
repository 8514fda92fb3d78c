//! Client side of the randomness oracle.
//!
//! A draw is a two-step exchange: `close_round` issues a request and gets a
//! handle back, and a later, independent call delivers the oracle's words for
//! that handle. Nothing here blocks waiting for the oracle.

use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::error::LotteryError;

/// Words delivered by the oracle for a previously issued request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fulfillment {
    pub request_id: Pubkey,
    pub raw_words: Vec<[u8; 32]>,
}

pub trait RandomnessGateway {
    /// Issues a randomness request for `round_id` and returns the handle the
    /// fulfillment will carry.
    fn request_randomness(&mut self, round_id: u64) -> Result<Pubkey>;
}

/// Switchboard on-demand commit/reveal randomness account.
///
/// The request handle is the randomness account itself: the client commits
/// it in the slot before `close_round`, and reveals it before
/// `reveal_winning_numbers`.
pub struct SwitchboardGateway<'a, 'info> {
    account: &'a AccountInfo<'info>,
    clock: &'a Clock,
}

impl<'a, 'info> SwitchboardGateway<'a, 'info> {
    pub fn new(account: &'a AccountInfo<'info>, clock: &'a Clock) -> Self {
        Self { account, clock }
    }

    /// Handle under which `close_round` recorded this account's request.
    pub fn request_id(&self) -> Pubkey {
        *self.account.key
    }

    /// Reads the revealed value. Only succeeds in the account's reveal slot.
    pub fn fulfillment(&self) -> Result<Fulfillment> {
        let randomness_data = RandomnessAccountData::parse(self.account.data.borrow())
            .map_err(|_| LotteryError::InvalidRandomnessAccount)?;
        let revealed_random_value = randomness_data
            .get_value(self.clock)
            .map_err(|_| LotteryError::RandomnessNotResolved)?;

        Ok(Fulfillment {
            request_id: self.request_id(),
            raw_words: vec![revealed_random_value],
        })
    }
}

impl RandomnessGateway for SwitchboardGateway<'_, '_> {
    fn request_randomness(&mut self, round_id: u64) -> Result<Pubkey> {
        let randomness_data = RandomnessAccountData::parse(self.account.data.borrow())
            .map_err(|_| LotteryError::InvalidRandomnessAccount)?;

        // A commit older than the previous slot may already be revealed.
        if randomness_data.seed_slot != self.clock.slot.saturating_sub(1) {
            msg!("Seed slot: {}", randomness_data.seed_slot);
            msg!("Current slot: {}", self.clock.slot);
            return err!(LotteryError::RandomnessAlreadyRevealed);
        }

        msg!(
            "Round {} committed to randomness account {}",
            round_id,
            self.account.key
        );
        Ok(*self.account.key)
    }
}

/// In-memory oracle: requests queue up and are answered in order with
/// scripted words.
#[cfg(test)]
#[derive(Default)]
pub struct MockGateway {
    pending: std::collections::VecDeque<(u64, Pubkey)>,
}

#[cfg(test)]
impl MockGateway {
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Answers the oldest outstanding request, returning the round it was
    /// issued for and the fulfillment to deliver.
    pub fn respond(&mut self, raw_words: Vec<[u8; 32]>) -> Option<(u64, Fulfillment)> {
        self.pending.pop_front().map(|(round_id, request_id)| {
            (
                round_id,
                Fulfillment {
                    request_id,
                    raw_words,
                },
            )
        })
    }
}

#[cfg(test)]
impl RandomnessGateway for MockGateway {
    fn request_randomness(&mut self, round_id: u64) -> Result<Pubkey> {
        let request_id = Pubkey::new_unique();
        self.pending.push_back((round_id, request_id));
        Ok(request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_answers_requests_in_order() {
        let mut gateway = MockGateway::default();
        let first = gateway.request_randomness(1).unwrap();
        let second = gateway.request_randomness(2).unwrap();
        assert_ne!(first, second);
        assert_eq!(gateway.pending(), 2);

        let (round_id, fulfillment) = gateway.respond(vec![[7u8; 32]]).unwrap();
        assert_eq!(round_id, 1);
        assert_eq!(fulfillment.request_id, first);
        assert_eq!(fulfillment.raw_words, vec![[7u8; 32]]);

        let (round_id, _) = gateway.respond(vec![[8u8; 32]]).unwrap();
        assert_eq!(round_id, 2);
        assert!(gateway.respond(vec![]).is_none());
    }
}
