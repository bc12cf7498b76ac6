//! Memory oracle abstraction
//!
//! The oracle is the only thing the chain builder knows about the target
//! process. It answers two questions: which addresses matched the initial
//! search (seeds), and which addresses lie inside a given window.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::Result;

/// Integer width the oracle searches for and interprets values as
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum WordWidth {
    #[strum(to_string = "32", serialize = "dword")]
    #[serde(rename = "32", alias = "dword")]
    Dword,
    #[default]
    #[strum(to_string = "64", serialize = "qword")]
    #[serde(rename = "64", alias = "qword")]
    Qword,
}

/// A single (address, raw value) result reported by the oracle.
///
/// `raw_value` is the oracle's textual decimal rendering of the value stored
/// at `address`; the builder parses it and treats failures as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub address: u64,
    pub raw_value: String,
}

impl SearchHit {
    pub fn new(address: u64, raw_value: impl Into<String>) -> Self {
        Self {
            address,
            raw_value: raw_value.into(),
        }
    }
}

/// Source of memory search results for chain discovery
pub trait MemoryOracle {
    /// Widen the scan scope to every readable region before a run.
    ///
    /// Backends without a notion of scope keep the default no-op.
    fn search_everywhere(&self) -> Result<()> {
        Ok(())
    }

    /// Results of the previously configured initial search, in oracle order
    fn seed_lookup(&self) -> Result<Vec<SearchHit>>;

    /// Entries of the given width located in `[low, high]` (inclusive).
    ///
    /// Callers must not assume the result honours the window exactly.
    fn range_lookup(&self, low: u64, high: u64, width: WordWidth) -> Result<Vec<SearchHit>>;
}
