//! 最近最少使用 (LRU) 替换
//!
//! 簿记由 `lru::LruCache` 承担：哈希表加双向链表，查找命中与插入都是 O(1)
//! 地把键移到最近使用端，淘汰时从最久未使用端弹出。

use log::trace;
use lru::LruCache;

use super::{CacheTable, PolicyKind, ReplacementPolicy};
use crate::{TlbEntry, Vpn};

/// Evicts the least recently inserted-or-hit key.
pub struct LruPolicy {
    /// Recency list; capacity is enforced against the cache table, not here
    recency: LruCache<Vpn, ()>,
}

impl LruPolicy {
    pub fn new() -> Self {
        Self {
            recency: LruCache::unbounded(),
        }
    }

    /// Key that would be evicted next, without touching it
    pub fn peek_victim(&self) -> Option<Vpn> {
        self.recency.peek_lru().map(|(vpn, _)| *vpn)
    }
}

impl Default for LruPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LruPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruPolicy")
            .field("tracked", &self.recency.len())
            .field("victim", &self.peek_victim())
            .finish()
    }
}

impl ReplacementPolicy for LruPolicy {
    fn apply_and_maybe_evict(
        &mut self,
        table: &mut CacheTable,
        capacity: usize,
        key: Vpn,
        value: TlbEntry,
    ) -> Option<(Vpn, TlbEntry)> {
        table.insert(key, value);
        // put 会把已存在的键提升到最近使用端
        self.recency.put(key, ());

        if table.len() <= capacity {
            return None;
        }

        let (victim, _) = self.recency.pop_lru()?;
        let entry = table
            .remove(&victim)
            .expect("LRU recency list out of sync with cache table");
        trace!("LRU evict vpn={:#x}", victim);
        Some((victim, entry))
    }

    fn touch(&mut self, key: Vpn) {
        let _ = self.recency.get(&key);
    }

    fn remove(&mut self, key: Vpn) {
        self.recency.pop(&key);
    }

    fn tracked(&self) -> usize {
        self.recency.len()
    }

    fn tracks(&self, key: Vpn) -> bool {
        self.recency.contains(&key)
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Lru
    }
}
