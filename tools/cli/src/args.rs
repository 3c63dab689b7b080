//! 命令行参数
//!
//! 选项与原始 `tlb` 工具保持一致，另外支持从配置文件加载多级链。

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tlbsim_core::config::DEFAULT_TLB_L2_COST;
use tlbsim_core::{FillMode, LevelConfig, PolicyKind, SimConfig, SimError, SimResult, VirtAddr};

use crate::parse::{parse_addrs, parse_num};

/// Fully resolved invocation
#[derive(Debug, Clone)]
pub struct CliArgs {
    pub config: SimConfig,
    pub access: Vec<VirtAddr>,
    pub prefetch: Vec<VirtAddr>,
    pub verbose: bool,
}

pub fn command() -> Command {
    Command::new("tlb")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Simulate address translation through a chain of TLB levels")
        .arg(
            Arg::new("size")
                .short('s')
                .long("size")
                .value_name("PAGESIZE")
                .help("size of a page in bytes, must be a power of 2"),
        )
        .arg(
            Arg::new("tlb")
                .short('t')
                .long("tlb")
                .value_name("TLBSIZE")
                .help("size of the TLB L1"),
        )
        .arg(
            Arg::new("cost")
                .short('c')
                .long("cost")
                .value_name("TLBCOST")
                .help("cost of lookup in the TLB L1, default to 5 nano seconds"),
        )
        .arg(
            Arg::new("tlb2")
                .short('l')
                .long("tlb2")
                .value_name("TLBSIZE2")
                .help("size of the TLB L2, 0 disables the second level"),
        )
        .arg(
            Arg::new("cost2")
                .short('d')
                .long("cost2")
                .value_name("TLBCOST2")
                .help("cost of lookup in the TLB L2, default to 20 nano seconds"),
        )
        .arg(
            Arg::new("costpt")
                .short('e')
                .long("costpt")
                .value_name("PTBCOST")
                .help("cost of lookup in the Page Table, default to 100 nano seconds"),
        )
        .arg(
            Arg::new("policy")
                .short('p')
                .long("policy")
                .value_name("TLBPOLICY")
                .help("replacement policy for TLB L1 (FIFO, LRU, RAND)"),
        )
        .arg(
            Arg::new("policy2")
                .short('q')
                .long("policy2")
                .value_name("TLBPOLICY2")
                .help("replacement policy for TLB L2 (FIFO, LRU, RAND)"),
        )
        .arg(
            Arg::new("access")
                .short('a')
                .long("access")
                .value_name("ADDRLIST")
                .help("a set of comma-separated addresses to access"),
        )
        .arg(
            Arg::new("prefetch")
                .short('f')
                .long("prefetch")
                .value_name("PREFETCHLIST")
                .help("a set of comma-separated addresses to prefetch"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("TOML or JSON simulator configuration; flags override it"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .help("seed for random replacement"),
        )
        .arg(
            Arg::new("promote")
                .long("promote")
                .action(ArgAction::SetTrue)
                .help("copy translations that hit below L1 back into L1"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("log every lookup"),
        )
}

fn number(matches: &ArgMatches, id: &str) -> SimResult<Option<u64>> {
    matches
        .get_one::<String>(id)
        .map(|value| parse_num(value))
        .transpose()
}

fn policy(matches: &ArgMatches, id: &str) -> SimResult<Option<PolicyKind>> {
    matches
        .get_one::<String>(id)
        .map(|value| value.parse())
        .transpose()
}

fn addrs(matches: &ArgMatches, id: &str) -> SimResult<Vec<VirtAddr>> {
    matches
        .get_one::<String>(id)
        .map(|value| parse_addrs(value))
        .transpose()
        .map(Option::unwrap_or_default)
}

/// TLB capacity; must fit the host's `usize`
fn capacity(matches: &ArgMatches, name: &str) -> SimResult<Option<usize>> {
    number(matches, name)?
        .map(|size| {
            usize::try_from(size).map_err(|_| {
                SimError::invalid_number(format!("{}: {} entries is too many", name, size))
            })
        })
        .transpose()
}

/// Resolve matches into a validated configuration and address lists
pub fn resolve(matches: &ArgMatches) -> SimResult<CliArgs> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => SimConfig::from_file(&PathBuf::from(path))?,
        None => SimConfig::default(),
    };

    if let Some(size) = number(matches, "size")? {
        config.page_size = size;
    }
    if let Some(cost) = number(matches, "costpt")? {
        config.page_table_cost = cost;
    }

    if config.levels.is_empty() {
        config.levels.push(LevelConfig::default());
    }
    let l1 = &mut config.levels[0];
    if let Some(size) = capacity(matches, "tlb")? {
        l1.capacity = size;
    }
    if let Some(cost) = number(matches, "cost")? {
        l1.cost = cost;
    }
    if let Some(kind) = policy(matches, "policy")? {
        l1.policy = kind;
    }

    match capacity(matches, "tlb2")? {
        Some(0) => config.levels.truncate(1),
        Some(size) => {
            if config.levels.len() < 2 {
                config
                    .levels
                    .push(LevelConfig::new(0, DEFAULT_TLB_L2_COST, PolicyKind::Lru));
            }
            config.levels[1].capacity = size;
        }
        None => {}
    }
    if let Some(l2) = config.levels.get_mut(1) {
        if let Some(cost) = number(matches, "cost2")? {
            l2.cost = cost;
        }
        if let Some(kind) = policy(matches, "policy2")? {
            l2.policy = kind;
        }
    }

    if let Some(seed) = number(matches, "seed")? {
        config.seed = Some(seed);
    }
    if matches.get_flag("promote") {
        config.fill = FillMode::Promote;
    }

    config.validate()?;

    Ok(CliArgs {
        config,
        access: addrs(matches, "access")?,
        prefetch: addrs(matches, "prefetch")?,
        verbose: matches.get_flag("verbose"),
    })
}
