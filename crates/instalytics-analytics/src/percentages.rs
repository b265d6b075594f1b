//! Stable per-username category percentages.
//!
//! The same username always yields the same split, so a dashboard that
//! re-renders never shows the numbers jump around.

use thiserror::Error;

/// Smallest share any single category receives.
pub const MIN_SHARE: u8 = 5;
/// Largest supported category count; beyond this the floor cannot hold.
pub const MAX_CATEGORIES: usize = 100 / MIN_SHARE as usize;

const SEED_MODULUS: u64 = 1_000;
const STEP_MULTIPLIER: u64 = 17;
const CANDIDATE_RANGE: u64 = 30;
const CANDIDATE_OFFSET: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PercentageError {
    #[error("category count must be between 1 and 20, got {0}")]
    CountOutOfRange(usize),
}

/// Seed derived from a username: the sum of its UTF-16 code units, reduced
/// modulo 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsernameSeed {
    hash: u64,
    seed: u64,
}

impl UsernameSeed {
    #[must_use]
    pub fn from_username(username: &str) -> Self {
        let hash = username
            .encode_utf16()
            .fold(0u64, |acc, unit| acc.wrapping_add(u64::from(unit)));
        Self {
            hash,
            seed: hash % SEED_MODULUS,
        }
    }

    #[must_use]
    pub fn hash(self) -> u64 {
        self.hash
    }

    #[must_use]
    pub fn seed(self) -> u64 {
        self.seed
    }

    /// Candidate share for the category at `position` (0-based), in 15..=44.
    #[must_use]
    pub fn candidate(self, position: usize) -> u64 {
        let step = position as u64 + 1;
        (self.seed * step * STEP_MULTIPLIER) % CANDIDATE_RANGE + CANDIDATE_OFFSET
    }

    /// Infinite sequence of candidates, position 0 first.
    pub fn candidates(self) -> impl Iterator<Item = u64> {
        (0..).map(move |position| self.candidate(position))
    }
}

/// Splits 100 into `count` shares derived from `username`.
///
/// Every share is at least [`MIN_SHARE`], the shares sum to exactly 100, and
/// the result is sorted descending. Each of the first `count - 1` shares is
/// its candidate, capped so every later category can still get the floor;
/// the last share takes whatever remains.
///
/// # Errors
///
/// Returns [`PercentageError::CountOutOfRange`] when `count` is 0 or above
/// [`MAX_CATEGORIES`].
pub fn unique_percentages(username: &str, count: usize) -> Result<Vec<u8>, PercentageError> {
    if count == 0 || count > MAX_CATEGORIES {
        return Err(PercentageError::CountOutOfRange(count));
    }

    let floor = u64::from(MIN_SHARE);
    let mut remaining: u64 = 100;
    let mut shares = Vec::with_capacity(count);

    for (position, candidate) in UsernameSeed::from_username(username)
        .candidates()
        .take(count - 1)
        .enumerate()
    {
        // remaining >= (count - position) * floor holds on entry
        let reserved = (count - position - 1) as u64 * floor;
        let share = candidate.min(remaining - reserved).max(floor);
        shares.push(share);
        remaining -= share;
    }
    shares.push(remaining);

    shares.sort_unstable_by(|a, b| b.cmp(a));
    // every share is <= 100
    Ok(shares
        .into_iter()
        .map(|s| u8::try_from(s).unwrap_or(u8::MAX))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(shares: &[u8], count: usize) {
        assert_eq!(shares.len(), count);
        assert!(shares.iter().all(|s| *s >= MIN_SHARE), "{shares:?}");
        assert_eq!(shares.iter().map(|s| u32::from(*s)).sum::<u32>(), 100);
        assert!(shares.windows(2).all(|w| w[0] >= w[1]), "{shares:?}");
    }

    #[test]
    fn seed_sums_char_codes() {
        // c=99 r=114 i=105 s=115 t=116 i=105 a=97 n=110 o=111
        let seed = UsernameSeed::from_username("cristiano");
        assert_eq!(seed.hash(), 972);
        assert_eq!(seed.seed(), 972);
    }

    #[test]
    fn seed_reduces_modulo_thousand() {
        let seed = UsernameSeed::from_username("stephencurry30");
        assert_eq!(seed.seed(), seed.hash() % 1000);
        assert!(seed.hash() >= 1000);
    }

    #[test]
    fn candidates_stay_in_range() {
        let seed = UsernameSeed::from_username("leomessi");
        for c in seed.candidates().take(50) {
            assert!((15..=44).contains(&c), "{c}");
        }
    }

    #[test]
    fn cristiano_five_categories() {
        // seed 972: candidates 39, 33, 27, 21; the third is capped to 18 and
        // the fourth to 5 so the last category keeps its floor.
        let shares = unique_percentages("cristiano", 5).expect("valid count");
        assert_eq!(shares, vec![39, 33, 18, 5, 5]);
    }

    #[test]
    fn single_category_gets_everything() {
        assert_eq!(unique_percentages("anyone", 1).unwrap(), vec![100]);
    }

    #[test]
    fn invariants_hold_for_many_usernames_and_counts() {
        let names = [
            "a", "cristiano", "k.mbappe", "the_rock", "zzzzzzzzzzzzzzzzzzzzzzzzzzzzzz", "ñandú",
            "0", "user.name_123",
        ];
        for name in names {
            for count in 1..=MAX_CATEGORIES {
                let shares = unique_percentages(name, count).expect("valid count");
                assert_valid(&shares, count);
            }
        }
    }

    #[test]
    fn generator_is_pure() {
        for count in 1..=8 {
            assert_eq!(
                unique_percentages("selenagomez", count),
                unique_percentages("selenagomez", count)
            );
        }
    }

    #[test]
    fn empty_username_still_valid() {
        let shares = unique_percentages("", 5).expect("valid count");
        assert_valid(&shares, 5);
    }

    #[test]
    fn rejects_zero_and_excessive_counts() {
        assert_eq!(
            unique_percentages("x", 0),
            Err(PercentageError::CountOutOfRange(0))
        );
        assert_eq!(
            unique_percentages("x", MAX_CATEGORIES + 1),
            Err(PercentageError::CountOutOfRange(MAX_CATEGORIES + 1))
        );
    }
}
