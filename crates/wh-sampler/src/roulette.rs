use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::candidate::WeightedCandidate;
use crate::lexical::is_suggestible;

/// Roulette-wheel word sampler: repeated weighted draws without replacement
/// from a normalized candidate pool, filtered for lexical validity.
///
/// Probabilities are computed once and deliberately NOT renormalized as the
/// pool shrinks. Later draws therefore sample against the leftover mass of
/// the full-pool distribution, with the cumulative-walk fallback absorbing
/// the missing tail. This is explicit policy: renormalizing after each
/// removal would change the observable suggestion distribution.
#[derive(Debug)]
pub struct RouletteSampler {
    rng: StdRng,
}

impl RouletteSampler {
    /// Create a sampler seeded from the OS entropy source.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a sampler with a fixed seed for reproducible draws.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// One spin of the wheel: walk the pool in order accumulating
    /// probability and pick the first candidate whose running sum reaches a
    /// uniform target in [0, 1). Falls back to the last candidate when
    /// rounding (or leftover mass from earlier removals) keeps the sum
    /// below the target.
    fn draw_index(&mut self, pool: &[WeightedCandidate]) -> usize {
        let target: f32 = self.rng.gen();
        let mut cumulative = 0.0f32;
        for (i, candidate) in pool.iter().enumerate() {
            cumulative += candidate.probability;
            if cumulative >= target {
                return i;
            }
        }
        pool.len() - 1
    }

    /// Collect up to `top_k` distinct, lexically valid suggestion strings.
    ///
    /// Each slot is given at most two draws: a picked candidate is removed
    /// from the pool unconditionally, and if its text fails the lexical
    /// filter one replacement draw is attempted before the slot is
    /// abandoned. Termination is therefore bounded by 2 x `top_k` draws.
    pub fn suggest(
        &mut self,
        mut pool: Vec<WeightedCandidate>,
        top_k: usize,
    ) -> Vec<String> {
        let mut suggestions = Vec::with_capacity(top_k);

        for _ in 0..top_k {
            if pool.is_empty() {
                break;
            }

            let first = pool.remove(self.draw_index(&pool));
            if is_suggestible(&first.text) {
                suggestions.push(first.text);
                continue;
            }

            // Bad pick; one replacement draw for this slot, then give up.
            if pool.is_empty() {
                break;
            }
            let second = pool.remove(self.draw_index(&pool));
            if is_suggestible(&second.text) {
                suggestions.push(second.text);
            }
        }

        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(entries: &[(&str, f32)]) -> Vec<WeightedCandidate> {
        entries
            .iter()
            .enumerate()
            .map(|(i, &(text, probability))| WeightedCandidate {
                id: i as u32,
                text: text.to_string(),
                probability,
            })
            .collect()
    }

    #[test]
    fn test_no_duplicates_and_bounded_length() {
        let mut sampler = RouletteSampler::from_seed(7);
        let got = sampler.suggest(
            pool(&[
                ("alpha", 0.4),
                ("beta", 0.3),
                ("gamma", 0.2),
                ("delta", 0.1),
            ]),
            3,
        );
        assert!(got.len() <= 3);
        let mut unique = got.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), got.len());
    }

    #[test]
    fn test_drains_pool_when_top_k_exceeds_it() {
        let mut sampler = RouletteSampler::from_seed(1);
        let got = sampler.suggest(pool(&[("one", 0.6), ("two", 0.4)]), 10);
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let entries = [("a", 0.25), ("b", 0.25), ("c", 0.25), ("d", 0.25)];
        let mut first = RouletteSampler::from_seed(42);
        let mut second = RouletteSampler::from_seed(42);
        assert_eq!(
            first.suggest(pool(&entries), 4),
            second.suggest(pool(&entries), 4)
        );
    }

    #[test]
    fn test_invalid_pick_gets_one_retry() {
        // One invalid candidate carrying nearly all the mass: the first draw
        // lands on it, the retry must land on a valid word.
        let mut sampler = RouletteSampler::from_seed(3);
        let got = sampler.suggest(pool(&[("<pad>", 0.999), ("word", 0.001)]), 1);
        assert_eq!(got, vec!["word".to_string()]);
    }

    #[test]
    fn test_slot_abandoned_after_two_invalid_picks() {
        let mut sampler = RouletteSampler::from_seed(5);
        let got = sampler.suggest(
            pool(&[("<0x0A>", 0.5), ("##ing", 0.4), ("fine", 0.1)]),
            1,
        );
        // Either the slot ate both invalid picks and was abandoned, or one
        // of the two draws landed on the valid word. Never an invalid word.
        assert!(got.len() <= 1);
        for word in &got {
            assert_eq!(word, "fine");
        }
    }

    #[test]
    fn test_all_invalid_pool_yields_nothing() {
        let mut sampler = RouletteSampler::from_seed(9);
        let got = sampler.suggest(pool(&[("<a>", 0.5), ("<b>", 0.5)]), 5);
        assert!(got.is_empty());
    }

    #[test]
    fn test_empty_pool() {
        let mut sampler = RouletteSampler::from_seed(0);
        assert!(sampler.suggest(Vec::new(), 5).is_empty());
    }

    #[test]
    fn test_degenerate_mass_still_terminates() {
        // Zero-probability pool: every cumulative walk falls through to the
        // last-candidate fallback.
        let mut sampler = RouletteSampler::from_seed(11);
        let got = sampler.suggest(pool(&[("x", 0.0), ("y", 0.0)]), 2);
        assert_eq!(got.len(), 2);
    }
}
