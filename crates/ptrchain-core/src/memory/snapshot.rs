//! File-backed memory oracle
//!
//! Answers seed and range lookups from a JSON memory snapshot, so chain
//! discovery can run without attaching to a live process.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::oracle::{MemoryOracle, SearchHit, WordWidth};
use crate::error::{Error, Result};

/// One stored word in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub address: u64,
    /// Decimal text, exactly as a memory search tool reports it
    pub value: String,
    #[serde(default)]
    pub width: WordWidth,
}

impl SnapshotEntry {
    pub fn new(address: u64, value: impl Into<String>, width: WordWidth) -> Self {
        Self {
            address,
            value: value.into(),
            width,
        }
    }

    fn to_hit(&self) -> SearchHit {
        SearchHit::new(self.address, self.value.clone())
    }
}

/// Serialized memory snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    /// Package or process the snapshot was taken from
    #[serde(default)]
    pub package: Option<String>,
    /// Results of an initial search performed when the snapshot was taken
    #[serde(default)]
    pub seeds: Vec<SnapshotEntry>,
    #[serde(default)]
    pub memory: Vec<SnapshotEntry>,
}

/// Oracle backed by a [`MemorySnapshot`]
#[derive(Debug, Clone)]
pub struct SnapshotOracle {
    snapshot: MemorySnapshot,
    seed_search: Option<(u64, WordWidth)>,
}

impl SnapshotOracle {
    pub fn new(snapshot: MemorySnapshot) -> Self {
        Self {
            snapshot,
            seed_search: None,
        }
    }

    /// Load a snapshot from a JSON file.
    ///
    /// Any failure to read or decode the file means there is nothing to
    /// search, so it is reported as [`Error::OracleUnavailable`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| {
            Error::OracleUnavailable(format!("cannot read snapshot {}: {}", path.display(), e))
        })?;

        let snapshot: MemorySnapshot = serde_json::from_str(&content).map_err(|e| {
            Error::OracleUnavailable(format!("invalid snapshot {}: {}", path.display(), e))
        })?;

        info!(
            "Loaded snapshot {} ({} seeds, {} memory entries)",
            path.display(),
            snapshot.seeds.len(),
            snapshot.memory.len()
        );
        Ok(Self::new(snapshot))
    }

    /// Derive seeds from an exact-value search over the snapshot memory
    /// instead of the stored seed list.
    pub fn with_seed_search(mut self, value: u64, width: WordWidth) -> Self {
        self.seed_search = Some((value, width));
        self
    }

    pub fn package(&self) -> Option<&str> {
        self.snapshot.package.as_deref()
    }
}

impl MemoryOracle for SnapshotOracle {
    fn seed_lookup(&self) -> Result<Vec<SearchHit>> {
        let hits: Vec<SearchHit> = match self.seed_search {
            Some((value, width)) => self
                .snapshot
                .memory
                .iter()
                .filter(|e| e.width == width && e.value.trim().parse::<u64>() == Ok(value))
                .map(SnapshotEntry::to_hit)
                .collect(),
            None => self.snapshot.seeds.iter().map(SnapshotEntry::to_hit).collect(),
        };

        debug!("Seed lookup returned {} hit(s)", hits.len());
        Ok(hits)
    }

    fn range_lookup(&self, low: u64, high: u64, width: WordWidth) -> Result<Vec<SearchHit>> {
        let hits: Vec<SearchHit> = self
            .snapshot
            .memory
            .iter()
            .filter(|e| e.width == width && (low..=high).contains(&e.address))
            .map(SnapshotEntry::to_hit)
            .collect();
        Ok(hits)
    }
}
