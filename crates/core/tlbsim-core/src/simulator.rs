//! 模拟驱动
//!
//! 构建 TLB 链与 MMU，先回放预取地址（不计分），再回放访问地址并统计。

use log::{debug, info};

use crate::config::SimConfig;
use crate::mmu::{AccessOutcome, Mmu};
use crate::stats::SimStats;
use crate::tlb::{ChainBuilder, LevelSnapshot};
use crate::{SimResult, VirtAddr};

/// Outcome of a full run
#[derive(Debug, Clone)]
pub struct SimReport {
    /// One entry per scored access, in order
    pub accesses: Vec<AccessOutcome>,
    pub stats: SimStats,
    /// Chain state after the run, head first
    pub levels: Vec<LevelSnapshot>,
}

/// One simulation run over a freshly built hierarchy
#[derive(Debug)]
pub struct Simulator {
    config: SimConfig,
    mmu: Mmu,
    stats: SimStats,
}

impl Simulator {
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let chain = ChainBuilder::new()
            .levels(&config.levels)
            .seed(config.seed)
            .build();
        let mmu = Mmu::new(chain, config.page_table_cost, config.page_size).with_fill(config.fill);
        debug!(
            "simulator ready: page size {}, {} level(s), page table cost {}",
            config.page_size,
            config.levels.len(),
            config.page_table_cost
        );
        Ok(Self {
            config,
            mmu,
            stats: SimStats::default(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn mmu(&self) -> &Mmu {
        &self.mmu
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Warm the chain without scoring
    pub fn prefetch(&mut self, addrs: &[VirtAddr]) -> SimResult<()> {
        for &vaddr in addrs {
            self.mmu.access(vaddr, true)?;
            self.stats.record_prefetch();
        }
        Ok(())
    }

    /// Translate and score a single address
    pub fn access(&mut self, vaddr: VirtAddr) -> SimResult<AccessOutcome> {
        let outcome = self.mmu.access(vaddr, false)?;
        self.stats.record(&outcome);
        Ok(outcome)
    }

    pub fn level_snapshots(&self) -> Vec<LevelSnapshot> {
        self.mmu.levels()
    }

    /// Prefetch, then access in order. Stops at the first rejected address.
    pub fn run(&mut self, prefetch: &[VirtAddr], access: &[VirtAddr]) -> SimResult<SimReport> {
        self.prefetch(prefetch)?;
        let accesses = access
            .iter()
            .map(|&vaddr| self.access(vaddr))
            .collect::<SimResult<Vec<_>>>()?;
        info!("run complete: {}", self.stats);
        Ok(SimReport {
            accesses,
            stats: self.stats,
            levels: self.level_snapshots(),
        })
    }
}
