//! 随机替换
//!
//! 被淘汰者从本次插入之前已驻留的条目中均匀选取，刚插入的键不会淘汰自己。

use std::collections::HashMap;

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{CacheTable, PolicyKind, ReplacementPolicy};
use crate::{TlbEntry, Vpn};

/// Evicts a uniformly chosen resident key.
#[derive(Debug)]
pub struct RandomPolicy {
    /// Unordered pool of resident keys
    pool: Vec<Vpn>,
    /// Position of each key inside `pool`
    slots: HashMap<Vpn, usize>,
    rng: StdRng,
}

impl RandomPolicy {
    /// Policy backed by an entropy-seeded generator
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Policy whose victim sequence is reproducible for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            pool: Vec::new(),
            slots: HashMap::new(),
            rng,
        }
    }

    fn remove_slot(&mut self, idx: usize) -> Vpn {
        let victim = self.pool.swap_remove(idx);
        self.slots.remove(&victim);
        if let Some(moved) = self.pool.get(idx) {
            self.slots.insert(*moved, idx);
        }
        victim
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplacementPolicy for RandomPolicy {
    fn apply_and_maybe_evict(
        &mut self,
        table: &mut CacheTable,
        capacity: usize,
        key: Vpn,
        value: TlbEntry,
    ) -> Option<(Vpn, TlbEntry)> {
        if table.insert(key, value).is_none() {
            self.slots.insert(key, self.pool.len());
            self.pool.push(key);
        }

        if table.len() <= capacity {
            return None;
        }

        // 表只会因新键而超出容量，新键位于池尾，排除在候选之外
        let candidates = self.pool.len() - 1;
        let idx = self.rng.gen_range(0..candidates);
        let victim = self.remove_slot(idx);
        let entry = table
            .remove(&victim)
            .expect("random pool out of sync with cache table");
        trace!("RAND evict vpn={:#x} (slot {}/{})", victim, idx, candidates);
        Some((victim, entry))
    }

    fn remove(&mut self, key: Vpn) {
        if let Some(&idx) = self.slots.get(&key) {
            self.remove_slot(idx);
        }
    }

    fn tracked(&self) -> usize {
        self.pool.len()
    }

    fn tracks(&self, key: Vpn) -> bool {
        self.slots.contains_key(&key)
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Random
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pfn: u64) -> TlbEntry {
        TlbEntry::new(pfn, true)
    }

    #[test]
    fn test_random_never_evicts_new_key() {
        for seed in 0..32 {
            let mut policy = RandomPolicy::with_seed(seed);
            let mut table = CacheTable::new();

            for vpn in 0..4 {
                policy.apply_and_maybe_evict(&mut table, 4, vpn, entry(vpn));
            }
            let (victim, _) = policy
                .apply_and_maybe_evict(&mut table, 4, 99, entry(99))
                .expect("full table must evict");

            assert_ne!(victim, 99);
            assert!(victim < 4);
            assert!(table.contains_key(&99));
            assert_eq!(table.len(), 4);
            assert_eq!(policy.tracked(), 4);
            assert!(!policy.tracks(victim));
        }
    }

    #[test]
    fn test_random_same_seed_same_victims() {
        let run = |seed| {
            let mut policy = RandomPolicy::with_seed(seed);
            let mut table = CacheTable::new();
            (0..64u64)
                .filter_map(|vpn| policy.apply_and_maybe_evict(&mut table, 8, vpn, entry(vpn)))
                .map(|(vpn, _)| vpn)
                .collect::<Vec<_>>()
        };

        assert_eq!(run(1234), run(1234));
    }

    #[test]
    fn test_random_pool_slots_stay_consistent() {
        let mut policy = RandomPolicy::with_seed(5);
        let mut table = CacheTable::new();

        for vpn in 0..200u64 {
            policy.apply_and_maybe_evict(&mut table, 16, vpn % 40, entry(vpn));
            assert_eq!(policy.tracked(), table.len());
            for key in table.keys() {
                assert!(policy.tracks(*key));
            }
            for (idx, key) in policy.pool.iter().enumerate() {
                assert_eq!(policy.slots[key], idx);
            }
        }
    }

    #[test]
    fn test_random_victims_roughly_uniform() {
        let mut policy = RandomPolicy::with_seed(42);
        let mut table = CacheTable::new();
        for vpn in 0..4 {
            policy.apply_and_maybe_evict(&mut table, 4, vpn, entry(vpn));
        }

        let mut counts = [0u32; 4];
        for _ in 0..4000 {
            let (victim, value) = policy
                .apply_and_maybe_evict(&mut table, 4, 99, entry(99))
                .expect("full table must evict");
            counts[victim as usize] += 1;

            // 恢复到 0..4 全部驻留
            table.remove(&99);
            policy.remove(99);
            policy.apply_and_maybe_evict(&mut table, 4, victim, value);
        }

        for (vpn, count) in counts.iter().enumerate() {
            assert!(
                (850..=1150).contains(count),
                "vpn {} chosen {} times out of 4000",
                vpn,
                count
            );
        }
    }

    #[test]
    fn test_random_remove_keeps_slots() {
        let mut policy = RandomPolicy::with_seed(9);
        let mut table = CacheTable::new();
        for vpn in 0..5 {
            policy.apply_and_maybe_evict(&mut table, 8, vpn, entry(vpn));
        }

        policy.remove(1);
        policy.remove(77);
        assert_eq!(policy.tracked(), 4);
        assert!(!policy.tracks(1));
        for (idx, key) in policy.pool.iter().enumerate() {
            assert_eq!(policy.slots[key], idx);
        }
    }
}
