//! 先进先出 (FIFO) 替换

use std::collections::VecDeque;

use log::trace;

use super::{CacheTable, PolicyKind, ReplacementPolicy};
use crate::{TlbEntry, Vpn};

/// Evicts the oldest resident insertion, ignoring lookups.
#[derive(Debug, Default)]
pub struct FifoPolicy {
    /// Insertion order, oldest at the front
    queue: VecDeque<Vpn>,
}

impl FifoPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplacementPolicy for FifoPolicy {
    fn apply_and_maybe_evict(
        &mut self,
        table: &mut CacheTable,
        capacity: usize,
        key: Vpn,
        value: TlbEntry,
    ) -> Option<(Vpn, TlbEntry)> {
        // 已存在的键只覆盖值，保持原有的入队位置
        if table.insert(key, value).is_none() {
            self.queue.push_back(key);
        }

        if table.len() <= capacity {
            return None;
        }

        let victim = self.queue.pop_front()?;
        let entry = table
            .remove(&victim)
            .expect("FIFO queue out of sync with cache table");
        trace!("FIFO evict vpn={:#x}", victim);
        Some((victim, entry))
    }

    fn remove(&mut self, key: Vpn) {
        if let Some(pos) = self.queue.iter().position(|vpn| *vpn == key) {
            self.queue.remove(pos);
        }
    }

    fn tracked(&self) -> usize {
        self.queue.len()
    }

    fn tracks(&self, key: Vpn) -> bool {
        self.queue.contains(&key)
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Fifo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pfn: u64) -> TlbEntry {
        TlbEntry::new(pfn, true)
    }

    #[test]
    fn test_fifo_evicts_in_insertion_order() {
        let mut policy = FifoPolicy::new();
        let mut table = CacheTable::new();

        assert!(policy.apply_and_maybe_evict(&mut table, 2, 1, entry(10)).is_none());
        assert!(policy.apply_and_maybe_evict(&mut table, 2, 2, entry(20)).is_none());

        let evicted = policy.apply_and_maybe_evict(&mut table, 2, 3, entry(30));
        assert_eq!(evicted, Some((1, entry(10))));

        let evicted = policy.apply_and_maybe_evict(&mut table, 2, 4, entry(40));
        assert_eq!(evicted, Some((2, entry(20))));

        assert_eq!(table.len(), 2);
        assert_eq!(policy.tracked(), 2);
    }

    #[test]
    fn test_fifo_touch_does_not_reorder() {
        let mut policy = FifoPolicy::new();
        let mut table = CacheTable::new();

        policy.apply_and_maybe_evict(&mut table, 2, 1, entry(10));
        policy.apply_and_maybe_evict(&mut table, 2, 2, entry(20));
        policy.touch(1);

        let evicted = policy.apply_and_maybe_evict(&mut table, 2, 3, entry(30));
        assert_eq!(evicted.map(|(vpn, _)| vpn), Some(1));
    }

    #[test]
    fn test_fifo_reinsert_is_idempotent() {
        let mut policy = FifoPolicy::new();
        let mut table = CacheTable::new();

        policy.apply_and_maybe_evict(&mut table, 2, 1, entry(10));
        policy.apply_and_maybe_evict(&mut table, 2, 2, entry(20));
        assert!(policy.apply_and_maybe_evict(&mut table, 2, 1, entry(11)).is_none());

        assert_eq!(policy.tracked(), 2);
        assert_eq!(table[&1], entry(11));

        // vpn 1 keeps its original slot at the head of the queue
        let evicted = policy.apply_and_maybe_evict(&mut table, 2, 3, entry(30));
        assert_eq!(evicted, Some((1, entry(11))));
    }

    #[test]
    fn test_fifo_remove_keeps_order() {
        let mut policy = FifoPolicy::new();
        let mut table = CacheTable::new();
        for vpn in 1..=3 {
            policy.apply_and_maybe_evict(&mut table, 3, vpn, entry(vpn * 10));
        }

        table.remove(&1);
        policy.remove(1);
        assert_eq!(policy.tracked(), 2);

        policy.apply_and_maybe_evict(&mut table, 3, 4, entry(40));
        let evicted = policy.apply_and_maybe_evict(&mut table, 3, 5, entry(50));
        assert_eq!(evicted, Some((2, entry(20))));
    }
}
