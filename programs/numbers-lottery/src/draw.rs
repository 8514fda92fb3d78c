//! Expansion of raw oracle words into a round's winning numbers.

use anchor_lang::prelude::*;
use solana_program::hash::hashv;

use crate::constants::DRAW_DOMAIN_TAG;
use crate::error::LotteryError;

const LANES_PER_BLOCK: usize = 4;

/// Infinite stream of 64-bit lanes: first the raw words themselves, then
/// SHA-256 blocks derived from all of them and a counter.
struct LaneStream<'a> {
    raw_words: &'a [[u8; 32]],
    next_word: usize,
    counter: u64,
    block: [u8; 32],
    lane: usize,
}

impl<'a> LaneStream<'a> {
    fn new(raw_words: &'a [[u8; 32]]) -> Self {
        Self {
            raw_words,
            next_word: 0,
            counter: 0,
            block: [0u8; 32],
            lane: LANES_PER_BLOCK,
        }
    }

    fn refill(&mut self) {
        if let Some(word) = self.raw_words.get(self.next_word) {
            self.block = *word;
            self.next_word += 1;
        } else {
            let counter = self.counter.to_le_bytes();
            let mut seeds: Vec<&[u8]> = Vec::with_capacity(self.raw_words.len() + 2);
            seeds.push(DRAW_DOMAIN_TAG);
            seeds.push(&counter);
            seeds.extend(self.raw_words.iter().map(|word| word.as_slice()));
            self.block = hashv(&seeds).to_bytes();
            self.counter += 1;
        }
        self.lane = 0;
    }
}

impl Iterator for LaneStream<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.lane == LANES_PER_BLOCK {
            self.refill();
        }
        let start = self.lane * 8;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.block[start..start + 8]);
        self.lane += 1;
        Some(u64::from_le_bytes(bytes))
    }
}

/// Derives `draw_size` distinct numbers in `[1, number_ceiling]`, in draw order.
///
/// Lanes falling in the modulo-bias tail and numbers already drawn are
/// skipped. The same words always produce the same numbers.
pub fn expand_winning_numbers(
    raw_words: &[[u8; 32]],
    draw_size: u8,
    number_ceiling: u16,
) -> Result<Vec<u16>> {
    require!(!raw_words.is_empty(), LotteryError::InvalidRandomnessAccount);
    require!(
        draw_size > 0 && u16::from(draw_size) <= number_ceiling,
        LotteryError::InvalidConfig
    );

    let ceiling = u64::from(number_ceiling);
    let unbiased_limit = u64::MAX - u64::MAX % ceiling;
    let mut drawn: Vec<u16> = Vec::with_capacity(usize::from(draw_size));

    for lane in LaneStream::new(raw_words) {
        if lane >= unbiased_limit {
            continue;
        }
        // lane % ceiling < number_ceiling, so the cast is lossless.
        let candidate = (lane % ceiling) as u16 + 1;
        if !drawn.contains(&candidate) {
            drawn.push(candidate);
            if drawn.len() == usize::from(draw_size) {
                break;
            }
        }
    }

    Ok(drawn)
}
