//! Search configuration for a single chain discovery run.
//!
//! A [`SearchConfig`] is fixed before building starts and never changes
//! during the run.
//!
//! ## Example
//!
//! ```
//! use ptrchain_core::{FailurePolicy, SearchConfig, WordWidth};
//!
//! let config = SearchConfig::builder()
//!     .depth(4)
//!     .max_offset(0x200)
//!     .word_width(WordWidth::Qword)
//!     .failure_policy(FailurePolicy::AbortRun)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.depth, 4);
//! ```

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{Error, Result};
use crate::memory::WordWidth;

pub const DEFAULT_DEPTH: u32 = 3;
pub const DEFAULT_MAX_OFFSET: u64 = 256;

/// What the builder does when a node cannot be read or expanded
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Drop the failing node with its subtree and keep going
    #[default]
    SkipSubtree,
    /// Stop the whole run at the first failure
    AbortRun,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of node levels per chain, root included
    pub depth: u32,
    /// Inclusive upper bound on the offset from a parent's value to a child
    pub max_offset: u64,
    pub word_width: WordWidth,
    /// Ceiling on range lookups for the whole run (`None` = unbounded)
    pub max_lookups: Option<u64>,
    pub failure_policy: FailurePolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            max_offset: DEFAULT_MAX_OFFSET,
            word_width: WordWidth::Qword,
            max_lookups: None,
            failure_policy: FailurePolicy::SkipSubtree,
        }
    }
}

impl SearchConfig {
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(Error::InvalidConfig(
                "depth must be at least 1".to_string(),
            ));
        }
        if self.max_lookups == Some(0) {
            return Err(Error::InvalidConfig(
                "max lookups must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for SearchConfig
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    depth: Option<u32>,
    max_offset: Option<u64>,
    word_width: Option<WordWidth>,
    max_lookups: Option<u64>,
    failure_policy: Option<FailurePolicy>,
}

impl SearchConfigBuilder {
    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn max_offset(mut self, max_offset: u64) -> Self {
        self.max_offset = Some(max_offset);
        self
    }

    pub fn word_width(mut self, width: WordWidth) -> Self {
        self.word_width = Some(width);
        self
    }

    pub fn max_lookups(mut self, limit: u64) -> Self {
        self.max_lookups = Some(limit);
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<SearchConfig> {
        let default = SearchConfig::default();
        let config = SearchConfig {
            depth: self.depth.unwrap_or(default.depth),
            max_offset: self.max_offset.unwrap_or(default.max_offset),
            word_width: self.word_width.unwrap_or(default.word_width),
            max_lookups: self.max_lookups.or(default.max_lookups),
            failure_policy: self.failure_policy.unwrap_or(default.failure_policy),
        };
        config.validate()?;
        Ok(config)
    }
}
