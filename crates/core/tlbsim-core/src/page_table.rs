//! 页表模拟
//!
//! 不做真实的页表遍历：虚拟页号按固定偏移映射到物理帧号，开销为常量。

use crate::{Cost, Pfn, Vpn};

/// Frame offset applied by the emulated page table
pub const FRAME_OFFSET: Pfn = 0x2000;

/// Deterministic vpn -> pfn mapping with a fixed walk cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableEmulator {
    cost: Cost,
    frame_offset: Pfn,
}

impl PageTableEmulator {
    pub fn new(cost: Cost) -> Self {
        Self {
            cost,
            frame_offset: FRAME_OFFSET,
        }
    }

    /// Frame for `vpn`, `None` when the offset overflows the frame number
    pub fn map(&self, vpn: Vpn) -> Option<Pfn> {
        vpn.checked_add(self.frame_offset)
    }

    /// Mapping together with the walk cost
    pub fn walk(&self, vpn: Vpn) -> Option<(Pfn, Cost)> {
        self.map(vpn).map(|pfn| (pfn, self.cost))
    }

    /// Largest vpn whose frame is still addressable with `offset_bits` of
    /// page offset
    pub fn max_vpn(&self, offset_bits: u32) -> Option<Vpn> {
        (u64::MAX >> offset_bits).checked_sub(self.frame_offset)
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_is_offset() {
        let pt = PageTableEmulator::new(100);
        assert_eq!(pt.map(1), Some(0x2001));
        assert_eq!(pt.walk(0), Some((0x2000, 100)));
        assert_eq!(pt.map(7), pt.map(7));
    }

    #[test]
    fn test_map_overflow() {
        let pt = PageTableEmulator::new(100);
        assert_eq!(pt.map(u64::MAX - FRAME_OFFSET), Some(u64::MAX));
        assert_eq!(pt.map(u64::MAX - FRAME_OFFSET + 1), None);
        assert_eq!(pt.walk(u64::MAX), None);
    }

    #[test]
    fn test_max_vpn() {
        let pt = PageTableEmulator::new(100);
        assert_eq!(pt.max_vpn(0), Some(u64::MAX - FRAME_OFFSET));
        assert_eq!(pt.max_vpn(12), Some((u64::MAX >> 12) - FRAME_OFFSET));
        assert_eq!(pt.max_vpn(63), None);
    }
}
