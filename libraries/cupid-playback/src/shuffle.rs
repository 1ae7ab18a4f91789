//! Shuffle selection
//!
//! Shuffle does not reorder the playlist; it picks the next index at random.

use rand::Rng;

/// Pick a random index in `0..len` that differs from `current`
///
/// Draws uniformly from the other `len - 1` positions, so consecutive picks
/// never repeat. A single-track playlist yields `current` itself.
pub fn pick_other_index<R: Rng + ?Sized>(rng: &mut R, len: usize, current: usize) -> usize {
    if len <= 1 {
        return current.min(len.saturating_sub(1));
    }
    if current >= len {
        return rng.gen_range(0..len);
    }
    let pick = rng.gen_range(0..len - 1);
    if pick >= current {
        pick + 1
    } else {
        pick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn never_returns_current() {
        let mut rng = StdRng::seed_from_u64(7);
        for current in 0..5 {
            for _ in 0..200 {
                assert_ne!(pick_other_index(&mut rng, 5, current), current);
            }
        }
    }

    #[test]
    fn single_track_returns_same_index() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_other_index(&mut rng, 1, 0), 0);
    }

    #[test]
    fn covers_every_other_index() {
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<usize> = (0..500).map(|_| pick_other_index(&mut rng, 4, 2)).collect();
        assert_eq!(seen, HashSet::from([0, 1, 3]));
    }

    #[test]
    fn two_tracks_alternate() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pick_other_index(&mut rng, 2, 0), 1);
        assert_eq!(pick_other_index(&mut rng, 2, 1), 0);
    }
}
