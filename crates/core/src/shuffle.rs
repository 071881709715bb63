//! In-place random permutation.
//!
//! The random source is any `rand::Rng`, so callers can pass a seeded `StdRng` for
//! reproducible orderings.

use rand::Rng;

/// Permutes `items` in place (Fisher-Yates, walking from the last index down to 1).
///
/// Slices of length 0 or 1 are left untouched and consume no entropy.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// By-value variant of [`shuffle`].
#[must_use]
pub fn shuffled<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> Vec<T> {
    shuffle(&mut items, rng);
    items
}
