//! # ptrchain-core
//!
//! Core library for pointer chain discovery.
//!
//! This crate provides:
//! - The memory oracle abstraction and a JSON snapshot backend
//! - Chain building bounded by depth, offset window and an optional lookup ceiling
//! - Text rendering of chains and the run report
//! - JSON tree export
//!
//! ## Example
//!
//! ```
//! use ptrchain_core::{
//!     ChainBuilder, MemorySnapshot, SearchConfig, SnapshotEntry, SnapshotOracle, WordWidth,
//!     render_chain,
//! };
//!
//! let snapshot = MemorySnapshot {
//!     package: None,
//!     seeds: vec![SnapshotEntry::new(0x1000, "500", WordWidth::Qword)],
//!     memory: vec![SnapshotEntry::new(516, "7", WordWidth::Qword)],
//! };
//! let oracle = SnapshotOracle::new(snapshot);
//! let config = SearchConfig::builder().depth(2).max_offset(16).build().unwrap();
//!
//! let chains = ChainBuilder::new(&oracle, &config).run().unwrap();
//! assert_eq!(
//!     render_chain(1, "base", &chains[0]),
//!     "1: base [0x00001000] -> 0x000001F4 + 0x00000010 = 7\n"
//! );
//! ```

pub mod chain;
pub mod config;
pub mod error;
pub mod export;
pub mod memory;
pub mod report;

pub use chain::{
    BuildStats, ChainBuilder, ChainNode, NodeFailure, format_address, parse_value, render_chain,
};
pub use config::{FailurePolicy, SearchConfig, SearchConfigBuilder};
pub use error::{Error, Result};
pub use export::ChainDocument;
pub use memory::{
    MemoryOracle, MemorySnapshot, SearchHit, SnapshotEntry, SnapshotOracle, WordWidth,
};
pub use report::{ModuleLabel, RUN_FOOTER, RunReport};
