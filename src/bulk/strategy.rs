//! Index picking strategies for bulk selection

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rule for choosing which gathered items a bulk selection takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// The first N items in fetch order
    #[default]
    First,
    /// N items sampled uniformly without replacement
    Random,
    /// Every Nth item, where the stride is the target count itself
    EveryNth,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::First => "first",
            Strategy::Random => "random",
            Strategy::EveryNth => "every-nth",
        }
    }
    
    /// The strategy after this one, wrapping around
    pub fn next(self) -> Self {
        match self {
            Strategy::First => Strategy::Random,
            Strategy::Random => Strategy::EveryNth,
            Strategy::EveryNth => Strategy::First,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;
    
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(Strategy::First),
            "random" => Ok(Strategy::Random),
            "every-nth" | "everynth" | "every_nth" => Ok(Strategy::EveryNth),
            other => Err(format!("unknown strategy: {}", other)),
        }
    }
}

/// Pick `min(target, available)` zero-based indices into a buffer of
/// `available` items.
///
/// `EveryNth` strides by `target`, so asking for 3 items walks 0, 3, 6.
pub fn pick_indices<R: Rng + ?Sized>(
    strategy: Strategy,
    target: usize,
    available: usize,
    rng: &mut R,
) -> Vec<usize> {
    let pick_count = target.min(available);
    
    match strategy {
        Strategy::First => (0..pick_count).collect(),
        Strategy::Random => {
            let mut pool: Vec<usize> = (0..available).collect();
            let mut picked = Vec::with_capacity(pick_count);
            while picked.len() < pick_count {
                let slot = rng.gen_range(0..pool.len());
                picked.push(pool.swap_remove(slot));
            }
            picked
        }
        Strategy::EveryNth => {
            let step = target;
            if step <= 1 {
                return (0..pick_count).collect();
            }
            (0..available).step_by(step).take(pick_count).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    
    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }
    
    #[test]
    fn test_first_takes_prefix() {
        assert_eq!(pick_indices(Strategy::First, 5, 10, &mut rng()), vec![0, 1, 2, 3, 4]);
        assert_eq!(pick_indices(Strategy::First, 15, 4, &mut rng()), vec![0, 1, 2, 3]);
        assert!(pick_indices(Strategy::First, 3, 0, &mut rng()).is_empty());
    }
    
    #[test]
    fn test_random_has_no_repeats() {
        let mut rng = rng();
        for (target, available) in [(5, 10), (10, 10), (12, 7), (1, 1), (3, 0), (40, 100)] {
            let picked = pick_indices(Strategy::Random, target, available, &mut rng);
            let distinct: HashSet<_> = picked.iter().copied().collect();
            
            assert_eq!(picked.len(), target.min(available));
            assert_eq!(distinct.len(), picked.len());
            assert!(picked.iter().all(|index| *index < available));
        }
    }
    
    #[test]
    fn test_random_full_draw_is_a_permutation() {
        let mut picked = pick_indices(Strategy::Random, 20, 20, &mut rng());
        picked.sort_unstable();
        assert_eq!(picked, (0..20).collect::<Vec<_>>());
    }
    
    #[test]
    fn test_random_is_reproducible_with_seed() {
        let a = pick_indices(Strategy::Random, 6, 50, &mut rng());
        let b = pick_indices(Strategy::Random, 6, 50, &mut rng());
        assert_eq!(a, b);
    }
    
    #[test]
    fn test_every_nth_strides_by_target_count() {
        // Stride is the requested count, not an independent step
        assert_eq!(pick_indices(Strategy::EveryNth, 3, 10, &mut rng()), vec![0, 3, 6]);
        assert_eq!(pick_indices(Strategy::EveryNth, 4, 24, &mut rng()), vec![0, 4, 8, 12]);
    }
    
    #[test]
    fn test_every_nth_runs_out_of_strides() {
        // 10 wanted, only 25 items: strides 0, 10, 20 exist
        assert_eq!(pick_indices(Strategy::EveryNth, 10, 25, &mut rng()), vec![0, 10, 20]);
        assert!(pick_indices(Strategy::EveryNth, 5, 0, &mut rng()).is_empty());
        assert_eq!(pick_indices(Strategy::EveryNth, 5, 3, &mut rng()), vec![0]);
    }
    
    #[test]
    fn test_every_nth_with_unit_step_is_first() {
        assert_eq!(pick_indices(Strategy::EveryNth, 1, 10, &mut rng()), vec![0]);
        assert_eq!(pick_indices(Strategy::EveryNth, 0, 10, &mut rng()), Vec::<usize>::new());
    }
    
    #[test]
    fn test_strategy_parsing_and_cycle() {
        assert_eq!("Every-Nth".parse::<Strategy>().unwrap(), Strategy::EveryNth);
        assert_eq!("random".parse::<Strategy>().unwrap(), Strategy::Random);
        assert!("middle".parse::<Strategy>().is_err());
        
        assert_eq!(Strategy::First.next(), Strategy::Random);
        assert_eq!(Strategy::Random.next(), Strategy::EveryNth);
        assert_eq!(Strategy::EveryNth.next(), Strategy::First);
    }
}
