//! TLB 链构建
//!
//! 从最后一级开始向上构建，每一级接管下一级的所有权。

use log::debug;

use super::{LevelSnapshot, NullTlb, Tlb, TlbLevel};
use crate::config::LevelConfig;
use crate::policy::PolicyKind;
use crate::Cost;

/// Assembles a chain head-first; levels are linked bottom-up on [`ChainBuilder::build`].
#[derive(Debug, Default, Clone)]
pub struct ChainBuilder {
    levels: Vec<LevelConfig>,
    seed: Option<u64>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a level below the ones already added
    pub fn level(mut self, capacity: usize, cost: Cost, policy: PolicyKind) -> Self {
        self.levels.push(LevelConfig {
            capacity,
            cost,
            policy,
        });
        self
    }

    pub fn levels(mut self, levels: &[LevelConfig]) -> Self {
        self.levels.extend_from_slice(levels);
        self
    }

    /// Seed for random-replacement levels. Each level derives its own stream.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Link the configured levels, terminated by a [`NullTlb`].
    ///
    /// An empty builder yields the bare terminal level.
    pub fn build(self) -> Box<dyn Tlb> {
        let mut chain: Box<dyn Tlb> = Box::new(NullTlb);
        for (idx, level) in self.levels.iter().enumerate().rev() {
            let seed = self.seed.map(|seed| seed.wrapping_add(idx as u64));
            debug!(
                "build L{}: {} entries, cost {}, policy {}",
                idx + 1,
                level.capacity,
                level.cost,
                level.policy
            );
            chain = Box::new(TlbLevel::new(
                level.cost,
                level.capacity,
                level.policy.build(seed),
                chain,
            ));
        }
        chain
    }
}

/// Snapshots of every real level, head first
pub fn levels(head: &dyn Tlb) -> Vec<LevelSnapshot> {
    let mut out = Vec::new();
    let mut cursor = Some(head);
    while let Some(tlb) = cursor {
        if let Some(snapshot) = tlb.snapshot() {
            out.push(snapshot);
        }
        cursor = tlb.next_level();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_links_levels_in_order() {
        let chain = ChainBuilder::new()
            .level(2, 5, PolicyKind::Fifo)
            .level(8, 20, PolicyKind::Lru)
            .level(16, 40, PolicyKind::Random)
            .seed(Some(1))
            .build();

        let snaps = levels(chain.as_ref());
        assert_eq!(snaps.len(), 3);
        assert_eq!(
            snaps.iter().map(|s| (s.capacity, s.cost, s.policy)).collect::<Vec<_>>(),
            vec![
                (2, 5, PolicyKind::Fifo),
                (8, 20, PolicyKind::Lru),
                (16, 40, PolicyKind::Random),
            ]
        );
    }

    #[test]
    fn test_empty_builder_is_terminal() {
        let mut chain = ChainBuilder::new().build();
        chain.insert(1, 2, true);
        assert!(chain.lookup(1).is_none());
        assert!(levels(chain.as_ref()).is_empty());
    }
}
