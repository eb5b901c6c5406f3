use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{MemoryScore, Word};

/// Selection weight for weak-focus study: `(100 - score)^2`.
///
/// Squaring makes half-known words a few times likelier than well-known
/// ones rather than marginally likelier; a word at 100 weighs 0.
#[must_use]
pub fn selection_weight(word: &Word) -> f64 {
    let gap = MemoryScore::MAX - word.score().value();
    gap * gap
}

/// Picks a word uniformly at random. Returns `None` for an empty list.
pub fn pick_uniform<'a, R: Rng + ?Sized>(words: &'a [Word], rng: &mut R) -> Option<&'a Word> {
    if words.is_empty() {
        return None;
    }
    let index = rng.random_range(0..words.len());
    words.get(index)
}

/// Picks a word with probability proportional to its selection weight.
///
/// Roulette wheel over the cumulative weights: draw `u` in `[0, total)`,
/// scan, return the first word whose running total reaches `u`. Zero-weight
/// words are skipped so a fully-known word is never picked while weaker
/// ones exist. When every word weighs zero the wheel is undefined and the
/// pick falls back to uniform.
pub fn pick_weighted<'a, R: Rng + ?Sized>(words: &'a [Word], rng: &mut R) -> Option<&'a Word> {
    if words.is_empty() {
        return None;
    }
    let weights: Vec<f64> = words.iter().map(selection_weight).collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return pick_uniform(words, rng);
    }

    let u = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last_candidate = None;
    for (word, weight) in words.iter().zip(&weights) {
        if *weight <= 0.0 {
            continue;
        }
        cumulative += *weight;
        last_candidate = Some(word);
        if u <= cumulative {
            return Some(word);
        }
    }
    // float rounding can leave the final cumulative a hair under the total
    last_candidate
}

/// Draws up to `n` distinct words for a typing test.
///
/// Uniform without-replacement draw: shuffle a copy of the list and take
/// the first `n`. Asking for more than the list holds returns the whole
/// list in shuffled order.
pub fn draw_test_words<R: Rng + ?Sized>(words: &[Word], n: usize, rng: &mut R) -> Vec<Word> {
    let mut pool: Vec<&Word> = words.iter().collect();
    pool.shuffle(rng);
    pool.into_iter().take(n).cloned().collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
