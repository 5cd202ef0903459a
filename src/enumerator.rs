//! C5: Seed Enumerator — produces the batches of 8 seeds a search walks.
//!
//! Three modes (Sequential, List, Provider), all satisfying the
//! resumability guarantee: "a (mode, start, end, alphabet) tuple reproduces
//! the exact same sequence of batches."

use crate::errors::{ConfigError, MotelyError};
use crate::seed::{Seed, ALPHABET};

/// How many of a seed's leading characters vary across the 8 lanes of one
/// batch; the rest advance only between batches.
pub const DEFAULT_BATCH_CHAR_COUNT: u8 = 3;

/// One batch's worth of seeds, in lane order.
pub type Batch = [Seed; 8];

const ALPHA_LEN: u64 = ALPHABET.len() as u64;

fn decode_base_alphabet(mut value: u64, digits: u8) -> Vec<u8> {
    let mut out = vec![0u8; digits as usize];
    for slot in out.iter_mut() {
        *slot = ALPHABET[(value % ALPHA_LEN) as usize];
        value /= ALPHA_LEN;
    }
    out
}

/// *Sequential* mode: lexicographic enumeration of length-`len` seeds over
/// [`ALPHABET`]. The first `batch_char_count` characters form the "fast"
/// space (`ALPHA_LEN ^ batch_char_count` combinations); that space is
/// walked in groups of 8 (the batch's lanes), with the last group of each
/// slow-index padded by repeating its final element when the fast space
/// isn't a multiple of 8. The remaining characters form the "slow" space,
/// advancing once per full sweep of the fast space. `start_batch`/
/// `end_batch` bound the walk (inclusive) over the combined (slow, fast
/// group) index.
pub struct SequentialEnumerator {
    len: u8,
    batch_char_count: u8,
    fast_space: u64,
    groups_per_slow: u64,
    next_batch: u64,
    end_batch: u64,
}

impl SequentialEnumerator {
    pub fn new(
        len: u8,
        batch_char_count: u8,
        start_batch: u64,
        end_batch: u64,
    ) -> Result<Self, MotelyError> {
        if batch_char_count == 0 || batch_char_count > 8 || batch_char_count > len {
            return Err(ConfigError::BatchCharCountOutOfRange(batch_char_count).into());
        }
        if start_batch > end_batch {
            return Err(ConfigError::InvalidEnumeratorRange {
                start: start_batch,
                end: end_batch,
            }
            .into());
        }
        let fast_space = ALPHA_LEN.pow(batch_char_count as u32);
        let groups_per_slow = fast_space.div_ceil(8);
        Ok(SequentialEnumerator {
            len,
            batch_char_count,
            fast_space,
            groups_per_slow,
            next_batch: start_batch,
            end_batch,
        })
    }

    /// Total number of batches across the entire (slow, fast-group) space,
    /// ignoring `start_batch`/`end_batch`.
    pub fn total_batches(&self) -> u64 {
        let slow_space = ALPHA_LEN.pow((self.len - self.batch_char_count) as u32);
        slow_space * self.groups_per_slow
    }

    /// Produce the next batch of 8 seeds, or `None` once `end_batch` is
    /// passed.
    pub fn next_batch(&mut self) -> Option<Result<Batch, MotelyError>> {
        if self.next_batch > self.end_batch {
            return None;
        }
        let batch_index = self.next_batch;
        self.next_batch += 1;

        let slow_index = batch_index / self.groups_per_slow;
        let fast_group = batch_index % self.groups_per_slow;
        let slow_chars = decode_base_alphabet(slow_index, self.len - self.batch_char_count);

        let mut seeds: [Option<Seed>; 8] = std::array::from_fn(|_| None);
        for (lane, slot) in seeds.iter_mut().enumerate() {
            let fast_value = (fast_group * 8 + lane as u64).min(self.fast_space - 1);
            let mut chars = decode_base_alphabet(fast_value, self.batch_char_count);
            chars.extend_from_slice(&slow_chars);
            let s = String::from_utf8(chars).expect("alphabet is ASCII");
            match Seed::new(s) {
                Ok(seed) => *slot = Some(seed),
                Err(e) => return Some(Err(e)),
            }
        }
        Some(Ok(seeds.map(|s| s.unwrap())))
    }

    pub fn last_completed_batch(&self) -> u64 {
        self.next_batch.saturating_sub(1)
    }
}

/// *List* mode: a user-supplied finite seed list, padded to a multiple of 8
/// by replicating the last element; the padding lanes are masked out by the
/// caller.
pub struct ListEnumerator {
    seeds: Vec<Seed>,
    next_index: usize,
}

impl ListEnumerator {
    pub fn new(seeds: Vec<Seed>) -> Result<Self, MotelyError> {
        if seeds.is_empty() {
            return Err(ConfigError::InvalidEnumeratorRange { start: 0, end: 0 }.into());
        }
        Ok(ListEnumerator { seeds, next_index: 0 })
    }

    /// Returns the batch plus a lane mask (bit set = real seed, unset =
    /// padding replicated from the last real seed).
    pub fn next_batch(&mut self) -> Option<(Batch, u8)> {
        if self.next_index >= self.seeds.len() {
            return None;
        }
        let last = self.seeds.last().unwrap().clone();
        let mut mask = 0xFFu8;
        let batch: [Seed; 8] = std::array::from_fn(|lane| {
            let idx = self.next_index + lane;
            if idx < self.seeds.len() {
                self.seeds[idx].clone()
            } else {
                mask &= !(1 << lane);
                last.clone()
            }
        });
        self.next_index += 8;
        Some((batch, mask))
    }
}

/// *Provider* mode: a caller-supplied pull function returning the next 8
/// seeds, or `None` to signal exhaustion.
pub struct ProviderEnumerator<F>
where
    F: FnMut() -> Option<Batch>,
{
    pull: F,
}

impl<F> ProviderEnumerator<F>
where
    F: FnMut() -> Option<Batch>,
{
    pub fn new(pull: F) -> Self {
        ProviderEnumerator { pull }
    }

    pub fn next_batch(&mut self) -> Option<Batch> {
        (self.pull)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_range_reproduces_same_batches() {
        let mut a = SequentialEnumerator::new(5, 3, 2, 5).unwrap();
        let mut b = SequentialEnumerator::new(5, 3, 2, 5).unwrap();
        loop {
            match (a.next_batch(), b.next_batch()) {
                (Some(x), Some(y)) => assert_eq!(x.unwrap(), y.unwrap()),
                (None, None) => break,
                _ => panic!("enumerators diverged in length"),
            }
        }
    }

    #[test]
    fn splitting_the_range_reproduces_the_whole_run() {
        let mut whole = SequentialEnumerator::new(5, 3, 0, 9).unwrap();
        let mut whole_batches = Vec::new();
        while let Some(b) = whole.next_batch() {
            whole_batches.push(b.unwrap());
        }

        let mut first_half = SequentialEnumerator::new(5, 3, 0, 4).unwrap();
        let mut second_half = SequentialEnumerator::new(5, 3, 5, 9).unwrap();
        let mut split_batches = Vec::new();
        while let Some(b) = first_half.next_batch() {
            split_batches.push(b.unwrap());
        }
        while let Some(b) = second_half.next_batch() {
            split_batches.push(b.unwrap());
        }

        assert_eq!(whole_batches, split_batches);
    }

    #[test]
    fn invalid_batch_char_count_is_rejected() {
        assert!(SequentialEnumerator::new(5, 0, 0, 1).is_err());
        assert!(SequentialEnumerator::new(5, 9, 0, 1).is_err());
    }

    #[test]
    fn total_batches_covers_the_whole_fast_and_slow_space() {
        let e = SequentialEnumerator::new(4, 2, 0, 0).unwrap();
        let fast_space = ALPHA_LEN * ALPHA_LEN;
        let groups_per_slow = fast_space.div_ceil(8);
        let slow_space = ALPHA_LEN * ALPHA_LEN;
        assert_eq!(e.total_batches(), slow_space * groups_per_slow);
    }

    #[test]
    fn list_mode_pads_to_multiple_of_eight() {
        let seeds = vec![
            Seed::new("ALEEB").unwrap(),
            Seed::new("ALEEC").unwrap(),
            Seed::new("ALEED").unwrap(),
        ];
        let mut e = ListEnumerator::new(seeds).unwrap();
        let (batch, mask) = e.next_batch().unwrap();
        assert_eq!(mask, 0b0000_0111);
        assert_eq!(batch[3], batch[2]);
        assert!(e.next_batch().is_none());
    }

    #[test]
    fn provider_mode_stops_on_none() {
        let mut calls = 0;
        let mut e = ProviderEnumerator::new(|| {
            calls += 1;
            if calls <= 2 {
                Some(std::array::from_fn(|_| Seed::new("ALEEB").unwrap()))
            } else {
                None
            }
        });
        assert!(e.next_batch().is_some());
        assert!(e.next_batch().is_some());
        assert!(e.next_batch().is_none());
    }
}
