//! TLB 替换策略
//!
//! 每个策略维护一份与缓存表键集合一一对应的私有簿记结构，
//! 在插入使表超出容量时选出且仅选出一个淘汰项。

mod fifo;
mod lru;
mod random;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use self::fifo::FifoPolicy;
pub use self::lru::LruPolicy;
pub use self::random::RandomPolicy;

use crate::{SimError, TlbEntry, Vpn};

/// Cache table shared by a level and its policy
pub type CacheTable = HashMap<Vpn, TlbEntry>;

/// Eviction discipline plugged into a [`crate::TlbLevel`].
pub trait ReplacementPolicy: fmt::Debug {
    /// Store `(key, value)` into `table` and, if the table now holds more than
    /// `capacity` entries, remove exactly one victim and return it.
    ///
    /// Re-inserting a resident key overwrites its value and never creates a
    /// second bookkeeping record.
    fn apply_and_maybe_evict(
        &mut self,
        table: &mut CacheTable,
        capacity: usize,
        key: Vpn,
        value: TlbEntry,
    ) -> Option<(Vpn, TlbEntry)>;

    /// Record a lookup hit on `key`. Only recency-based policies care.
    fn touch(&mut self, _key: Vpn) {}

    /// Forget `key` after the owning level removed it from its table.
    /// Unknown keys are ignored.
    fn remove(&mut self, key: Vpn);

    /// Number of keys held in bookkeeping
    fn tracked(&self) -> usize;

    /// Whether `key` is held in bookkeeping
    fn tracks(&self, key: Vpn) -> bool;

    fn kind(&self) -> PolicyKind;
}

/// 替换策略类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PolicyKind {
    /// First In First Out
    #[default]
    #[serde(rename = "FIFO", alias = "fifo")]
    Fifo,
    /// Least Recently Used
    #[serde(rename = "LRU", alias = "lru")]
    Lru,
    /// Random replacement
    #[serde(rename = "RAND", alias = "rand", alias = "random")]
    Random,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Fifo => "FIFO",
            PolicyKind::Lru => "LRU",
            PolicyKind::Random => "RAND",
        }
    }

    /// Build a fresh policy instance. `seed` only affects [`PolicyKind::Random`].
    pub fn build(&self, seed: Option<u64>) -> Box<dyn ReplacementPolicy> {
        match self {
            PolicyKind::Fifo => Box::new(FifoPolicy::new()),
            PolicyKind::Lru => Box::new(LruPolicy::new()),
            PolicyKind::Random => match seed {
                Some(seed) => Box::new(RandomPolicy::with_seed(seed)),
                None => Box::new(RandomPolicy::new()),
            },
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FIFO" => Ok(PolicyKind::Fifo),
            "LRU" => Ok(PolicyKind::Lru),
            "RAND" | "RANDOM" => Ok(PolicyKind::Random),
            _ => Err(SimError::UnknownPolicy(s.to_string())),
        }
    }
}
