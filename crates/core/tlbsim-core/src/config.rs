//! 模拟器配置
//!
//! 配置记录在构建 TLB 链之前一次性校验，之后不可变。

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::policy::PolicyKind;
use crate::{Cost, SimError, SimResult};

/// Default page size in bytes
pub const DEFAULT_PAGE_SIZE: u64 = 4096;
/// Default L1 entries
pub const DEFAULT_TLB_SIZE: usize = 64;
/// Default L1 lookup cost (ns)
pub const DEFAULT_TLB_COST: Cost = 5;
/// Default L2 lookup cost (ns)
pub const DEFAULT_TLB_L2_COST: Cost = 20;
/// Default page-table walk cost (ns)
pub const DEFAULT_PAGE_TABLE_COST: Cost = 100;

/// One TLB level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Number of entries
    pub capacity: usize,
    /// Cost of a hit at this level
    pub cost: Cost,
    /// Replacement policy
    #[serde(default)]
    pub policy: PolicyKind,
}

impl LevelConfig {
    pub fn new(capacity: usize, cost: Cost, policy: PolicyKind) -> Self {
        Self {
            capacity,
            cost,
            policy,
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TLB_SIZE, DEFAULT_TLB_COST, PolicyKind::Fifo)
    }
}

/// When a resolved translation is written into the head level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Only after a miss in every level
    #[default]
    ChainMiss,
    /// Also after a hit below the head, pulling the entry back up
    Promote,
}

/// Complete simulator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Page size in bytes, power of two
    pub page_size: u64,
    /// Cost of a page-table walk
    pub page_table_cost: Cost,
    /// TLB levels, head first
    pub levels: Vec<LevelConfig>,
    /// Seed for random replacement; entropy when absent
    pub seed: Option<u64>,
    pub fill: FillMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_table_cost: DEFAULT_PAGE_TABLE_COST,
            levels: vec![LevelConfig::default()],
            seed: None,
            fill: FillMode::default(),
        }
    }
}

impl SimConfig {
    /// Single-level configuration
    pub fn single(page_size: u64, level: LevelConfig, page_table_cost: Cost) -> Self {
        Self {
            page_size,
            page_table_cost,
            levels: vec![level],
            ..Self::default()
        }
    }

    /// Append a level below the existing ones
    pub fn with_level(mut self, level: LevelConfig) -> Self {
        self.levels.push(level);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_fill(mut self, fill: FillMode) -> Self {
        self.fill = fill;
        self
    }

    /// Number of bits addressing inside a page
    pub fn offset_bits(&self) -> u32 {
        self.page_size.trailing_zeros()
    }

    pub fn total_capacity(&self) -> usize {
        self.levels.iter().map(|level| level.capacity).sum()
    }

    pub fn validate(&self) -> SimResult<()> {
        if !self.page_size.is_power_of_two() {
            return Err(SimError::InvalidPageSize(self.page_size));
        }
        if self.page_table_cost == 0 {
            return Err(SimError::zero_cost("page table cost"));
        }
        if self.levels.is_empty() {
            return Err(SimError::NoLevels);
        }
        for (level, cfg) in self.levels.iter().enumerate() {
            if cfg.capacity == 0 {
                return Err(SimError::ZeroCapacity { level });
            }
            if cfg.cost == 0 {
                return Err(SimError::zero_cost(format!("L{} cost", level + 1)));
            }
        }
        Ok(())
    }

    /// Load from a `.toml` or `.json` file. The result is validated.
    pub fn from_file(path: &Path) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => toml::from_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }
}
