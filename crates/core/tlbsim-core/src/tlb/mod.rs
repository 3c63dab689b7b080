//! 多级 TLB 链
//!
//! 每一级都实现 [`Tlb`]：查找未命中时交给下一级，插入导致淘汰时把被淘汰者
//! 级联插入下一级。链以 [`NullTlb`] 结尾，它总是未命中并丢弃任何插入。

mod chain;
mod level;
mod null;

use std::fmt;

pub use chain::{ChainBuilder, levels};
pub use level::TlbLevel;
pub use null::NullTlb;

use crate::policy::PolicyKind;
use crate::{Cost, Pfn, TlbEntry, Vpn};

/// Successful lookup somewhere in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlbHit {
    /// Translated frame
    pub pfn: Pfn,
    /// Valid bit stored with the translation
    pub valid: bool,
    /// Lookup cost of the level that hit
    pub cost: Cost,
    /// Zero-based depth of the level that hit (0 = head)
    pub level: usize,
}

impl TlbHit {
    /// Same hit seen from one level further up the chain
    pub fn deeper(self) -> Self {
        Self {
            level: self.level + 1,
            ..self
        }
    }
}

/// One stage of the translation chain.
pub trait Tlb: fmt::Debug {
    /// Look `vpn` up here, falling through to the next level on a miss.
    fn lookup(&mut self, vpn: Vpn) -> Option<TlbHit>;

    /// Install a translation here, cascading any eviction downwards.
    fn insert(&mut self, vpn: Vpn, pfn: Pfn, valid: bool);

    /// Remove `vpn` from the first level down the chain that holds it.
    /// Not counted as a lookup or an eviction.
    fn take(&mut self, vpn: Vpn) -> Option<TlbEntry>;

    /// Translation held by this level (not the rest of the chain).
    /// Does not count as an access.
    fn peek(&self, vpn: Vpn) -> Option<TlbEntry>;

    fn contains(&self, vpn: Vpn) -> bool {
        self.peek(vpn).is_some()
    }

    /// Reporting view of this level, `None` for the terminal level
    fn snapshot(&self) -> Option<LevelSnapshot>;

    fn next_level(&self) -> Option<&dyn Tlb>;
}

/// TLB 级统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelStats {
    /// Lookups answered by this level
    pub hits: u64,
    /// Lookups passed on to the next level
    pub misses: u64,
    /// Inserts received, including cascaded ones
    pub insertions: u64,
    /// Entries pushed down to the next level
    pub evictions: u64,
}

impl LevelStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Point-in-time view of one level for reporting and tests
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSnapshot {
    pub policy: PolicyKind,
    pub capacity: usize,
    pub cost: Cost,
    /// Resident vpns, ascending
    pub vpns: Vec<Vpn>,
    pub stats: LevelStats,
}

impl LevelSnapshot {
    pub fn resident(&self) -> usize {
        self.vpns.len()
    }
}

impl fmt::Display for LevelSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{} entries, cost {}, hits {}, misses {}, evictions {}",
            self.policy,
            self.resident(),
            self.capacity,
            self.cost,
            self.stats.hits,
            self.stats.misses,
            self.stats.evictions
        )
    }
}
