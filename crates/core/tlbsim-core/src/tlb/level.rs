//! 单级 TLB 实现

use log::trace;

use super::{LevelSnapshot, LevelStats, NullTlb, Tlb, TlbHit};
use crate::policy::{CacheTable, PolicyKind, ReplacementPolicy};
use crate::{Cost, Pfn, TlbEntry, Vpn};

/// Fixed-capacity associative level owning the rest of the chain.
#[derive(Debug)]
pub struct TlbLevel {
    /// Lookup cost charged on a hit here
    cost: Cost,
    /// Maximum resident entries
    capacity: usize,
    /// vpn -> translation
    table: CacheTable,
    /// Eviction discipline
    policy: Box<dyn ReplacementPolicy>,
    /// Level below; receives every eviction
    next: Box<dyn Tlb>,
    stats: LevelStats,
}

impl TlbLevel {
    /// # Panics
    ///
    /// Panics if `capacity` or `cost` is zero. Configuration is validated
    /// before a chain is built, so reaching this is a caller bug.
    pub fn new(
        cost: Cost,
        capacity: usize,
        policy: Box<dyn ReplacementPolicy>,
        next: Box<dyn Tlb>,
    ) -> Self {
        assert!(capacity > 0, "TLB level capacity must be non-zero");
        assert!(cost > 0, "TLB level cost must be non-zero");
        Self {
            cost,
            capacity,
            table: CacheTable::with_capacity(capacity + 1),
            policy,
            next,
            stats: LevelStats::default(),
        }
    }

    /// Level terminated directly by a [`NullTlb`]
    pub fn last(cost: Cost, capacity: usize, policy: Box<dyn ReplacementPolicy>) -> Self {
        Self::new(cost, capacity, policy, Box::new(NullTlb))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn policy(&self) -> PolicyKind {
        self.policy.kind()
    }

    pub fn stats(&self) -> &LevelStats {
        &self.stats
    }

    fn check_invariants(&self) {
        assert!(
            self.table.len() <= self.capacity,
            "TLB level holds {} entries, capacity {}",
            self.table.len(),
            self.capacity
        );
        assert_eq!(
            self.table.len(),
            self.policy.tracked(),
            "{} bookkeeping out of sync with cache table",
            self.policy.kind()
        );
        debug_assert!(self.table.keys().all(|vpn| self.policy.tracks(*vpn)));
    }
}

impl Tlb for TlbLevel {
    fn lookup(&mut self, vpn: Vpn) -> Option<TlbHit> {
        if let Some(entry) = self.table.get(&vpn) {
            let hit = TlbHit {
                pfn: entry.pfn,
                valid: entry.valid,
                cost: self.cost,
                level: 0,
            };
            self.policy.touch(vpn);
            self.stats.hits += 1;
            trace!("{} hit vpn={:#x} pfn={:#x}", self.policy.kind(), vpn, hit.pfn);
            return Some(hit);
        }

        self.stats.misses += 1;
        self.next.lookup(vpn).map(TlbHit::deeper)
    }

    fn insert(&mut self, vpn: Vpn, pfn: Pfn, valid: bool) {
        self.stats.insertions += 1;
        let evicted = self.policy.apply_and_maybe_evict(
            &mut self.table,
            self.capacity,
            vpn,
            TlbEntry::new(pfn, valid),
        );
        self.check_invariants();

        if let Some((victim, entry)) = evicted {
            self.stats.evictions += 1;
            trace!(
                "{} cascade vpn={:#x} pfn={:#x} to next level",
                self.policy.kind(),
                victim,
                entry.pfn
            );
            self.next.insert(victim, entry.pfn, entry.valid);
        }
    }

    fn take(&mut self, vpn: Vpn) -> Option<TlbEntry> {
        match self.table.remove(&vpn) {
            Some(entry) => {
                self.policy.remove(vpn);
                self.check_invariants();
                trace!("{} take vpn={:#x}", self.policy.kind(), vpn);
                Some(entry)
            }
            None => self.next.take(vpn),
        }
    }

    fn peek(&self, vpn: Vpn) -> Option<TlbEntry> {
        self.table.get(&vpn).copied()
    }

    fn contains(&self, vpn: Vpn) -> bool {
        self.table.contains_key(&vpn)
    }

    fn snapshot(&self) -> Option<LevelSnapshot> {
        let mut vpns: Vec<Vpn> = self.table.keys().copied().collect();
        vpns.sort_unstable();
        Some(LevelSnapshot {
            policy: self.policy.kind(),
            capacity: self.capacity,
            cost: self.cost,
            vpns,
            stats: self.stats,
        })
    }

    fn next_level(&self) -> Option<&dyn Tlb> {
        Some(self.next.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{FifoPolicy, LruPolicy};

    fn fifo_level(cost: Cost, capacity: usize, next: Box<dyn Tlb>) -> TlbLevel {
        TlbLevel::new(cost, capacity, Box::new(FifoPolicy::new()), next)
    }

    #[test]
    fn test_level_hit_returns_own_cost() {
        let mut tlb = TlbLevel::last(5, 4, Box::new(FifoPolicy::new()));
        tlb.insert(1, 0x2001, true);

        let hit = tlb.lookup(1).expect("inserted vpn should hit");
        assert_eq!(hit, TlbHit { pfn: 0x2001, valid: true, cost: 5, level: 0 });
        assert!(tlb.lookup(2).is_none());
        assert_eq!(tlb.stats().hits, 1);
        assert_eq!(tlb.stats().misses, 1);
    }

    #[test]
    fn test_level_miss_falls_through() {
        let l2 = fifo_level(20, 2, Box::new(NullTlb));
        let mut l1 = fifo_level(5, 1, Box::new(l2));

        l1.insert(0xA, 0x100, true);
        l1.insert(0xB, 0x200, true);

        // A was pushed down into L2
        assert!(!l1.contains(0xA));
        let hit = l1.lookup(0xA).expect("A lives in L2");
        assert_eq!(hit, TlbHit { pfn: 0x100, valid: true, cost: 20, level: 1 });
    }

    #[test]
    fn test_level_cascade_preserves_valid_bit() {
        let l2 = fifo_level(20, 2, Box::new(NullTlb));
        let mut l1 = fifo_level(5, 1, Box::new(l2));

        l1.insert(0xA, 0x100, false);
        l1.insert(0xB, 0x200, true);

        let l2 = l1.next_level().expect("L2 present");
        assert_eq!(l2.peek(0xA), Some(TlbEntry::new(0x100, false)));
        assert_eq!(l1.stats().evictions, 1);
    }

    #[test]
    fn test_level_lru_lookup_touches() {
        let mut tlb = TlbLevel::last(5, 2, Box::new(LruPolicy::new()));
        tlb.insert(0xA, 1, true);
        tlb.insert(0xB, 2, true);
        assert!(tlb.lookup(0xA).is_some());
        tlb.insert(0xC, 3, true);

        assert!(tlb.contains(0xA));
        assert!(!tlb.contains(0xB));
        assert!(tlb.contains(0xC));
    }

    #[test]
    fn test_level_snapshot() {
        let mut tlb = TlbLevel::last(5, 3, Box::new(FifoPolicy::new()));
        for vpn in [7, 3, 5] {
            tlb.insert(vpn, vpn + 0x2000, true);
        }
        let snap = tlb.snapshot().expect("real level has a snapshot");
        assert_eq!(snap.vpns, vec![3, 5, 7]);
        assert_eq!(snap.capacity, 3);
        assert_eq!(snap.policy, PolicyKind::Fifo);
        assert_eq!(tlb.peek(5), Some(TlbEntry::new(0x2005, true)));
    }

    #[test]
    fn test_level_hit_reports_valid_bit() {
        let mut tlb = TlbLevel::last(5, 2, Box::new(FifoPolicy::new()));
        tlb.insert(3, 0x2003, false);
        let hit = tlb.lookup(3).expect("inserted vpn should hit");
        assert!(!hit.valid);
    }

    #[test]
    fn test_level_take_from_lower_level() {
        let l2 = TlbLevel::last(20, 2, Box::new(LruPolicy::new()));
        let mut l1 = fifo_level(5, 1, Box::new(l2));
        l1.insert(0xA, 0x100, false);
        l1.insert(0xB, 0x200, true);

        assert_eq!(l1.take(0xA), Some(TlbEntry::new(0x100, false)));
        assert_eq!(l1.take(0xA), None);
        assert!(l1.contains(0xB));

        let l2 = l1.next_level().expect("L2 present");
        let snap = l2.snapshot().expect("real level has a snapshot");
        assert!(snap.vpns.is_empty());
        assert_eq!(snap.stats.evictions, 0);
    }

    #[test]
    #[should_panic(expected = "capacity must be non-zero")]
    fn test_level_rejects_zero_capacity() {
        let _ = TlbLevel::last(5, 0, Box::new(FifoPolicy::new()));
    }
}
