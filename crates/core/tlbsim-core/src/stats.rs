//! 模拟统计

use std::fmt;

use crate::Cost;
use crate::mmu::AccessOutcome;

/// Aggregate over scored accesses; prefetches are only counted, never scored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    pub hits: u64,
    pub misses: u64,
    pub prefetches: u64,
    pub total_cost: Cost,
}

impl SimStats {
    pub fn record(&mut self, outcome: &AccessOutcome) {
        if outcome.hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        self.total_cost += outcome.cost;
    }

    pub fn record_prefetch(&mut self) {
        self.prefetches += 1;
    }

    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }

    pub fn average_cost(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            total => self.total_cost as f64 / total as f64,
        }
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits: {}, misses: {}, hit rate: {:.2}%, total cost: {}, average cost: {:.2}",
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.total_cost,
            self.average_cost()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(hit: bool, cost: Cost) -> AccessOutcome {
        AccessOutcome {
            vaddr: 0,
            vpn: 0,
            offset: 0,
            pfn: 0,
            paddr: 0,
            hit,
            cost,
            level: hit.then_some(0),
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = SimStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.average_cost(), 0.0);
    }

    #[test]
    fn test_rates() {
        let mut stats = SimStats::default();
        stats.record(&outcome(false, 100));
        stats.record(&outcome(false, 100));
        stats.record(&outcome(true, 5));
        stats.record(&outcome(false, 100));
        stats.record_prefetch();

        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 3);
        assert_eq!(stats.total_cost, 305);
        assert_eq!(stats.prefetches, 1);
        assert!((stats.hit_rate() - 0.25).abs() < f64::EPSILON);
        assert!((stats.average_cost() - 76.25).abs() < f64::EPSILON);
    }
}
