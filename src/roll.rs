//! Random sources for offspring generation.
//!
//! Every roll in the engine goes through [`RandomSource`], so a litter is
//! fully replayable from a seed, and tests can force individual branches
//! with [`ScriptedDice`].

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The injectable randomness seam.
pub trait RandomSource {
    /// Bernoulli roll: `true` with probability `chance`.
    fn should_do_action(&mut self, chance: f64) -> bool;

    /// Uniform index in `0..len`. Callers never pass `len == 0`.
    fn random_index(&mut self, len: usize) -> usize;

    /// Uniform integer in `0..=max`.
    fn random_int(&mut self, max: u32) -> u32;

    /// Uniform draw in `[0, 1)`.
    fn random_chance(&mut self) -> f64;
}

/// Uniform pick from a slice.
pub fn random_sample<'a, T>(dice: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = dice.random_index(items.len()).min(items.len() - 1);
    items.get(index)
}

/// Uniform subset of exactly `count` items, sampled without replacement.
///
/// The kept items retain their original relative order.
pub fn random_subset<T: Clone>(dice: &mut dyn RandomSource, items: &[T], count: usize) -> Vec<T> {
    if count >= items.len() {
        return items.to_vec();
    }

    let mut pool: Vec<usize> = (0..items.len()).collect();
    let mut picked = Vec::with_capacity(count);
    for _ in 0..count {
        let at = dice.random_index(pool.len()).min(pool.len() - 1);
        picked.push(pool.remove(at));
    }
    picked.sort_unstable();
    picked.into_iter().map(|i| items[i].clone()).collect()
}

/// Seeded default source backed by a ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct RngDice<R: Rng = ChaCha8Rng> {
    rng: R,
}

impl RngDice<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl<R: Rng> RngDice<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomSource for RngDice<R> {
    fn should_do_action(&mut self, chance: f64) -> bool {
        self.rng.gen::<f64>() < chance
    }

    fn random_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    fn random_int(&mut self, max: u32) -> u32 {
        self.rng.gen_range(0..=max)
    }

    fn random_chance(&mut self) -> f64 {
        self.rng.gen()
    }
}

/// Deterministic stand-in that replays queued answers.
///
/// When a queue runs dry the matching fallback answer is used. Every chance
/// passed to `should_do_action` is recorded, in call order.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    actions: VecDeque<bool>,
    fallback_action: bool,
    indices: VecDeque<usize>,
    ints: VecDeque<u32>,
    chances: VecDeque<f64>,
    fallback_chance: f64,
    requested: Vec<f64>,
}

impl ScriptedDice {
    /// Every Bernoulli roll answers `action`; every other draw returns its minimum.
    pub fn always(action: bool) -> Self {
        Self { fallback_action: action, ..Self::default() }
    }

    pub fn with_actions(mut self, actions: impl IntoIterator<Item = bool>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }

    pub fn with_ints(mut self, ints: impl IntoIterator<Item = u32>) -> Self {
        self.ints.extend(ints);
        self
    }

    pub fn with_chances(mut self, chances: impl IntoIterator<Item = f64>) -> Self {
        self.chances.extend(chances);
        self
    }

    pub fn with_fallback_chance(mut self, chance: f64) -> Self {
        self.fallback_chance = chance;
        self
    }

    /// Chances requested from `should_do_action`, in call order.
    pub fn requested_chances(&self) -> &[f64] {
        &self.requested
    }
}

impl RandomSource for ScriptedDice {
    fn should_do_action(&mut self, chance: f64) -> bool {
        self.requested.push(chance);
        self.actions.pop_front().unwrap_or(self.fallback_action)
    }

    fn random_index(&mut self, len: usize) -> usize {
        let index = self.indices.pop_front().unwrap_or(0);
        index.min(len.saturating_sub(1))
    }

    fn random_int(&mut self, max: u32) -> u32 {
        self.ints.pop_front().unwrap_or(0).min(max)
    }

    fn random_chance(&mut self) -> f64 {
        self.chances.pop_front().unwrap_or(self.fallback_chance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_dice_is_replayable() {
        let mut a = RngDice::seeded(7);
        let mut b = RngDice::seeded(7);
        for _ in 0..32 {
            assert_eq!(a.random_int(10), b.random_int(10));
            assert_eq!(a.random_chance().to_bits(), b.random_chance().to_bits());
        }
    }

    #[test]
    fn test_rng_dice_ranges() {
        let mut dice = RngDice::seeded(42);
        for _ in 0..1000 {
            assert!(dice.random_int(3) <= 3);
            assert!(dice.random_index(5) < 5);
            let c = dice.random_chance();
            assert!((0.0..1.0).contains(&c));
        }
        assert!(!dice.should_do_action(0.0));
        assert!(dice.should_do_action(1.0));
    }

    #[test]
    fn test_scripted_dice_replays_then_falls_back() {
        let mut dice = ScriptedDice::always(false).with_actions([true, true]);
        assert!(dice.should_do_action(0.1));
        assert!(dice.should_do_action(0.2));
        assert!(!dice.should_do_action(0.3));
        assert_eq!(dice.requested_chances(), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_random_sample_uses_index() {
        let items = ["a", "b", "c"];
        let mut dice = ScriptedDice::always(true).with_indices([2, 9]);
        assert_eq!(random_sample(&mut dice, &items), Some(&"c"));
        // Out-of-range scripted indices clamp to the last element
        assert_eq!(random_sample(&mut dice, &items), Some(&"c"));
        let empty: [&str; 0] = [];
        assert_eq!(random_sample(&mut dice, &empty), None);
    }

    #[test]
    fn test_random_subset_without_replacement() {
        let items = vec!["a", "b", "c", "d", "e"];
        // pool: [a b c d e] pick 3 -> d; pool [a b c e] pick 0 -> a; pool [b c e] pick 2 -> e
        let mut dice = ScriptedDice::always(true).with_indices([3, 0, 2]);
        let subset = random_subset(&mut dice, &items, 3);
        assert_eq!(subset, vec!["a", "d", "e"]);

        let mut dice = ScriptedDice::always(true);
        assert_eq!(random_subset(&mut dice, &items, 9), items);
    }
}
