//! 控制台输出

use std::fmt::Write as _;

use tlbsim_core::{AccessOutcome, SimConfig, SimReport, VirtAddr};

use crate::parse::format_addrs;

/// Echo of the effective configuration
pub fn render_config(config: &SimConfig, access: &[VirtAddr], prefetch: &[VirtAddr]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "page_size: {}", config.page_size);
    for (idx, level) in config.levels.iter().enumerate() {
        let prefix = if idx == 0 {
            "tlb".to_string()
        } else {
            format!("tlb_l{}", idx + 1)
        };
        let _ = writeln!(out, "{}_size: {}", prefix, level.capacity);
        let _ = writeln!(out, "{}_cost: {}", prefix, level.cost);
        let _ = writeln!(out, "{}_policy: {}", prefix, level.policy);
    }
    let _ = writeln!(out, "pagetable_cost: {}", config.page_table_cost);
    let _ = writeln!(out, "access: {}", format_addrs(access));
    let _ = writeln!(out, "prefetch: {}", format_addrs(prefetch));
    out
}

pub fn render_access(outcome: &AccessOutcome) -> String {
    let source = match outcome.level {
        Some(level) => format!("L{}", level + 1),
        None => "PT".to_string(),
    };
    format!(
        "{:#010x} -> {:#010x}  vpn {:#x}  {:<4}  {:>2}  cost {}",
        outcome.vaddr,
        outcome.paddr,
        outcome.vpn,
        if outcome.hit { "HIT" } else { "MISS" },
        source,
        outcome.cost
    )
}

pub fn render_summary(report: &SimReport) -> String {
    let mut out = String::new();
    let stats = &report.stats;
    let _ = writeln!(out, "hits: {}", stats.hits);
    let _ = writeln!(out, "misses: {}", stats.misses);
    let _ = writeln!(out, "hit rate: {:.2}%", stats.hit_rate() * 100.0);
    let _ = writeln!(out, "total cost: {}", stats.total_cost);
    let _ = writeln!(out, "average cost: {:.2}", stats.average_cost());
    for (idx, level) in report.levels.iter().enumerate() {
        let _ = writeln!(out, "L{}: {}", idx + 1, level);
    }
    out
}
