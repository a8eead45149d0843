// ============================================================
// Layer 4 — Training Set Sampler
// ============================================================
// Optionally caps the training set at `limit` images, chosen
// uniformly at random. A fixed seed makes the choice
// reproducible across runs, which matters when a resumed run
// must see the same training images as the first one.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle with `seed` and keep at most `limit` items.
/// `None` keeps everything in the original order.
pub fn subsample<T>(mut items: Vec<T>, limit: Option<usize>, seed: u64) -> Vec<T> {
    let Some(limit) = limit else {
        return items;
    };
    if limit >= items.len() {
        return items;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);
    items.truncate(limit);

    tracing::debug!("Subsampled training set to {} items (seed {})", limit, seed);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_limit_keeps_everything() {
        let items: Vec<usize> = (0..10).collect();
        assert_eq!(subsample(items.clone(), None, 1), items);
    }

    #[test]
    fn test_limit_truncates() {
        let items: Vec<usize> = (0..100).collect();
        let kept = subsample(items, Some(30), 7);
        assert_eq!(kept.len(), 30);
    }

    #[test]
    fn test_same_seed_same_selection() {
        let items: Vec<usize> = (0..100).collect();
        let a = subsample(items.clone(), Some(10), 42);
        let b = subsample(items, Some(10), 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_limit_above_len_is_noop() {
        let items: Vec<usize> = (0..5).collect();
        assert_eq!(subsample(items.clone(), Some(50), 0), items);
    }
}
