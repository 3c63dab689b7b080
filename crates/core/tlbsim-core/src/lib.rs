//! tlbsim-core: 多级 TLB 与 MMU 地址翻译模拟
//!
//! 包含可插拔的替换策略（FIFO / LRU / 随机）、级联插入的 TLB 链、
//! 页表模拟以及按访问计费的 MMU。

pub mod config;
pub mod error;
pub mod mmu;
pub mod page_table;
pub mod policy;
pub mod simulator;
pub mod stats;
pub mod tlb;

pub use config::{FillMode, LevelConfig, SimConfig};
pub use error::{SimError, SimResult};
pub use mmu::{AccessOutcome, Mmu};
pub use page_table::PageTableEmulator;
pub use policy::{PolicyKind, ReplacementPolicy};
pub use simulator::{SimReport, Simulator};
pub use stats::SimStats;
pub use tlb::{ChainBuilder, LevelSnapshot, LevelStats, NullTlb, Tlb, TlbHit, TlbLevel};

// ============================================================================
// 地址与开销类型
// ============================================================================

/// 虚拟地址
pub type VirtAddr = u64;
/// 物理地址
pub type PhysAddr = u64;
/// 虚拟页号
pub type Vpn = u64;
/// 物理帧号
pub type Pfn = u64;
/// 访问开销（纳秒）
pub type Cost = u64;

/// TLB 条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlbEntry {
    /// Physical frame number
    pub pfn: Pfn,
    /// Whether the mapping is trusted; carried through cascades untouched
    pub valid: bool,
}

impl TlbEntry {
    pub fn new(pfn: Pfn, valid: bool) -> Self {
        Self { pfn, valid }
    }
}
