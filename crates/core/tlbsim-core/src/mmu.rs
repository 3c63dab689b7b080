//! 软件 MMU
//!
//! 把虚拟地址拆成页号与页内偏移，沿 TLB 链查找，整链未命中时退回页表模拟，
//! 并把解析出的翻译插入链首。

use log::debug;

use crate::config::FillMode;
use crate::page_table::PageTableEmulator;
use crate::tlb::{LevelSnapshot, Tlb, levels};
use crate::{Cost, PhysAddr, Pfn, SimError, SimResult, VirtAddr, Vpn};

/// Result of translating one virtual address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessOutcome {
    pub vaddr: VirtAddr,
    pub vpn: Vpn,
    pub offset: u64,
    pub pfn: Pfn,
    pub paddr: PhysAddr,
    /// Translation came from a TLB level
    pub hit: bool,
    pub cost: Cost,
    /// Depth of the level that hit; `None` after a page-table walk
    pub level: Option<usize>,
}

/// Address translator owning the head of the TLB chain
#[derive(Debug)]
pub struct Mmu {
    tlb: Box<dyn Tlb>,
    page_table: PageTableEmulator,
    offset_mask: u64,
    offset_bits: u32,
    fill: FillMode,
}

impl Mmu {
    /// # Panics
    ///
    /// Panics if `page_size` is not a power of two.
    pub fn new(tlb: Box<dyn Tlb>, page_table_cost: Cost, page_size: u64) -> Self {
        assert!(
            page_size.is_power_of_two(),
            "page size {} is not a power of two",
            page_size
        );
        Self {
            tlb,
            page_table: PageTableEmulator::new(page_table_cost),
            offset_mask: page_size - 1,
            offset_bits: page_size.trailing_zeros(),
            fill: FillMode::default(),
        }
    }

    pub fn with_fill(mut self, fill: FillMode) -> Self {
        self.fill = fill;
        self
    }

    pub fn vpn_of(&self, vaddr: VirtAddr) -> Vpn {
        (vaddr & !self.offset_mask) >> self.offset_bits
    }

    pub fn offset_of(&self, vaddr: VirtAddr) -> u64 {
        vaddr & self.offset_mask
    }

    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Compose a physical address from a frame and page offset.
    /// `None` if the frame does not fit above the offset bits.
    pub fn compose(&self, pfn: Pfn, offset: u64) -> Option<PhysAddr> {
        if pfn > u64::MAX >> self.offset_bits {
            return None;
        }
        Some((pfn << self.offset_bits) | offset)
    }

    /// Largest virtual page the MMU can translate
    pub fn max_vpn(&self) -> Option<Vpn> {
        self.page_table.max_vpn(self.offset_bits)
    }

    /// Translate `vaddr`.
    ///
    /// On a miss in every level the page table resolves the frame and the
    /// translation is inserted at the head. A hit never inserts unless the
    /// fill mode is [`FillMode::Promote`] and the hit came from below the head;
    /// the entry then moves to the head and leaves the level that hit.
    /// `prefetching` only affects logging; callers decide what gets scored.
    ///
    /// Addresses whose frame would not fit in a physical address are rejected
    /// before the chain is touched.
    pub fn access(&mut self, vaddr: VirtAddr, prefetching: bool) -> SimResult<AccessOutcome> {
        let vpn = self.vpn_of(vaddr);
        let offset = self.offset_of(vaddr);
        if self.max_vpn().is_none_or(|max| vpn > max) {
            return Err(SimError::AddressOutOfRange(vaddr));
        }

        let (pfn, cost, level) = match self.tlb.lookup(vpn) {
            Some(hit) => {
                if self.fill == FillMode::Promote && hit.level > 0 {
                    let valid = self.tlb.take(vpn).map_or(hit.valid, |entry| entry.valid);
                    self.tlb.insert(vpn, hit.pfn, valid);
                }
                (hit.pfn, hit.cost, Some(hit.level))
            }
            None => {
                let (pfn, cost) = self
                    .page_table
                    .walk(vpn)
                    .ok_or(SimError::AddressOutOfRange(vaddr))?;
                self.tlb.insert(vpn, pfn, true);
                (pfn, cost, None)
            }
        };
        let paddr = self
            .compose(pfn, offset)
            .ok_or(SimError::AddressOutOfRange(vaddr))?;

        let outcome = AccessOutcome {
            vaddr,
            vpn,
            offset,
            pfn,
            paddr,
            hit: level.is_some(),
            cost,
            level,
        };
        debug!(
            "{} {:#x} -> {:#x} vpn={:#x} {} cost={}",
            if prefetching { "prefetch" } else { "access" },
            vaddr,
            outcome.paddr,
            vpn,
            if outcome.hit { "HIT" } else { "MISS" },
            cost
        );
        Ok(outcome)
    }

    pub fn tlb(&self) -> &dyn Tlb {
        self.tlb.as_ref()
    }

    /// Per-level snapshots, head first
    pub fn levels(&self) -> Vec<LevelSnapshot> {
        levels(self.tlb.as_ref())
    }
}
