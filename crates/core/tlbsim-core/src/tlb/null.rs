use log::trace;

use super::{LevelSnapshot, Tlb, TlbHit};
use crate::{Pfn, TlbEntry, Vpn};

/// Chain terminator: always misses, discards whatever falls into it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTlb;

impl Tlb for NullTlb {
    fn lookup(&mut self, _vpn: Vpn) -> Option<TlbHit> {
        None
    }

    fn insert(&mut self, vpn: Vpn, _pfn: Pfn, _valid: bool) {
        trace!("discard vpn={:#x} at end of chain", vpn);
    }

    fn take(&mut self, _vpn: Vpn) -> Option<TlbEntry> {
        None
    }

    fn peek(&self, _vpn: Vpn) -> Option<TlbEntry> {
        None
    }

    fn snapshot(&self) -> Option<LevelSnapshot> {
        None
    }

    fn next_level(&self) -> Option<&dyn Tlb> {
        None
    }
}
