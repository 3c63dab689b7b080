//! 模拟器错误类型
//!
//! 所有错误都属于配置或输入错误；TLB 链本身在运行期不会失败。

/// Simulator operation result type
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while configuring or feeding the simulator
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Page size is zero or not a power of two
    #[error("Invalid page size: {0} (must be a non-zero power of two)")]
    InvalidPageSize(u64),

    /// A TLB level was configured with no entries
    #[error("Invalid tlb size: level {level} has zero capacity")]
    ZeroCapacity {
        /// Zero-based level index
        level: usize,
    },

    /// A lookup cost was configured as zero
    #[error("Invalid cost: {what} must be greater than zero")]
    ZeroCost {
        /// Which cost was rejected
        what: String,
    },

    /// The chain has no TLB level at all
    #[error("At least one TLB level is required")]
    NoLevels,

    /// Replacement policy name not recognised
    #[error("Invalid policy: {0} (expected FIFO, LRU or RAND)")]
    UnknownPolicy(String),

    /// Numeric string could not be parsed
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Address-list item rejected
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Translated frame does not fit in a physical address
    #[error("Address out of range: {0:#x} maps past the physical address space")]
    AddressOutOfRange(u64),

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be decoded
    #[error("Config parse error: {0}")]
    ConfigParse(String),
}

impl SimError {
    /// Create a zero-cost error
    pub fn zero_cost(what: impl Into<String>) -> Self {
        Self::ZeroCost { what: what.into() }
    }

    /// Create an invalid-number error
    pub fn invalid_number(msg: impl Into<String>) -> Self {
        Self::InvalidNumber(msg.into())
    }

    /// Create an invalid-address error
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::InvalidAddress(msg.into())
    }

    /// Create a config parse error
    pub fn config_parse(msg: impl Into<String>) -> Self {
        Self::ConfigParse(msg.into())
    }
}

impl From<toml::de::Error> for SimError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_parse(err.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        Self::config_parse(err.to_string())
    }
}
