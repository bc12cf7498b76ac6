//! Chain builder
//!
//! Depth-first expansion from each seed. A node at depth `d` (root = 1) is
//! expanded only while `d < depth`; its value is treated as a base address
//! and every oracle hit inside `[value, value + max_offset]` becomes a child
//! keyed by its offset from that base.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::node::ChainNode;
use crate::config::{FailurePolicy, SearchConfig};
use crate::error::{Error, Result};
use crate::memory::{MemoryOracle, SearchHit};

/// A node dropped from the tree under [`FailurePolicy::SkipSubtree`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeFailure {
    pub address: u64,
    /// Level the node would have occupied (root = 1)
    pub depth: u32,
    pub reason: String,
}

/// Counters collected while building
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub chains: usize,
    pub nodes: usize,
    pub range_lookups: u64,
    /// Hits the oracle returned outside the offset window
    pub rejected_hits: u64,
    /// Children replaced by a later hit at the same offset
    pub collisions: u64,
    /// Set when the lookup ceiling stopped expansion early
    pub truncated: bool,
    pub failures: Vec<NodeFailure>,
}

/// Parse an oracle value string as an unsigned decimal integer
pub fn parse_value(address: u64, raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|source| Error::Parse {
        address,
        raw: raw.to_string(),
        source,
    })
}

/// Offset of `address` from `base`, if it falls inside the window
#[inline]
pub fn window_offset(base: u64, address: u64, max_offset: u64) -> Option<u64> {
    address
        .checked_sub(base)
        .filter(|offset| *offset <= max_offset)
}

pub struct ChainBuilder<'a, O: MemoryOracle + ?Sized> {
    oracle: &'a O,
    config: &'a SearchConfig,
    stats: BuildStats,
}

impl<'a, O: MemoryOracle + ?Sized> ChainBuilder<'a, O> {
    pub fn new(oracle: &'a O, config: &'a SearchConfig) -> Self {
        Self {
            oracle,
            config,
            stats: BuildStats::default(),
        }
    }

    pub fn into_stats(self) -> BuildStats {
        self.stats
    }

    /// Widen the oracle scope, fetch seeds and build one chain per seed.
    ///
    /// A failing seed lookup means there is nothing to build from and is
    /// always fatal.
    pub fn run(&mut self) -> Result<Vec<ChainNode>> {
        self.oracle.search_everywhere().map_err(unavailable)?;
        let seeds = self.oracle.seed_lookup().map_err(unavailable)?;
        info!("Building chains from {} seed(s)", seeds.len());
        self.build(&seeds)
    }

    /// Build one chain per seed, preserving seed order
    pub fn build(&mut self, seeds: &[SearchHit]) -> Result<Vec<ChainNode>> {
        self.config.validate()?;

        let mut chains = Vec::with_capacity(seeds.len());
        for seed in seeds {
            match self.build_node(seed, 1) {
                Ok(root) => chains.push(root),
                Err(e) => self.record_failure(seed.address, 1, e)?,
            }
        }

        self.stats.chains = chains.len();
        self.stats.nodes = chains.iter().map(ChainNode::node_count).sum();
        info!(
            "Built {} chain(s), {} node(s), {} range lookup(s), {} dropped",
            self.stats.chains,
            self.stats.nodes,
            self.stats.range_lookups,
            self.stats.failures.len()
        );
        Ok(chains)
    }

    fn build_node(&mut self, hit: &SearchHit, depth: u32) -> Result<ChainNode> {
        let value = parse_value(hit.address, &hit.raw_value)?;
        let mut node = ChainNode::new(hit.address, value);
        self.expand(&mut node, depth)?;
        Ok(node)
    }

    fn expand(&mut self, node: &mut ChainNode, depth: u32) -> Result<()> {
        if depth >= self.config.depth {
            return Ok(());
        }

        if let Some(limit) = self.config.max_lookups
            && self.stats.range_lookups >= limit
        {
            if !self.stats.truncated {
                warn!(
                    "Range lookup ceiling ({}) reached, remaining nodes stay unexpanded",
                    limit
                );
                self.stats.truncated = true;
            }
            return Ok(());
        }

        let base = node.value;
        let max_offset = self.config.max_offset;
        self.stats.range_lookups += 1;
        let hits = self
            .oracle
            .range_lookup(base, base.saturating_add(max_offset), self.config.word_width)?;
        debug!(
            "Range lookup at 0x{:X} (depth {}): {} hit(s)",
            base,
            depth,
            hits.len()
        );

        for hit in &hits {
            let Some(offset) = window_offset(base, hit.address, max_offset) else {
                self.stats.rejected_hits += 1;
                debug!(
                    "Discarding 0x{:X}: outside window 0x{:X}+0x{:X}",
                    hit.address, base, max_offset
                );
                continue;
            };

            match self.build_node(hit, depth + 1) {
                Ok(child) => {
                    if let Some(previous) = node.children.insert(offset, child) {
                        self.stats.collisions += 1;
                        debug!(
                            "Offset 0x{:X} from 0x{:X} already taken by 0x{:X}, keeping later hit 0x{:X}",
                            offset, base, previous.address, hit.address
                        );
                    }
                }
                Err(e) => {
                    self.record_failure(hit.address, depth + 1, e)?;
                    if let Some(previous) = node.children.remove(&offset) {
                        self.stats.collisions += 1;
                        debug!(
                            "Offset 0x{:X} from 0x{:X}: dropping 0x{:X} in favour of failed later hit 0x{:X}",
                            offset, base, previous.address, hit.address
                        );
                    }
                }
            }
        }

        Ok(())
    }

    fn record_failure(&mut self, address: u64, depth: u32, err: Error) -> Result<()> {
        match self.config.failure_policy {
            FailurePolicy::AbortRun => Err(err),
            FailurePolicy::SkipSubtree => {
                warn!("Dropping node 0x{:X} at depth {}: {}", address, depth, err);
                self.stats.failures.push(NodeFailure {
                    address,
                    depth,
                    reason: err.to_string(),
                });
                Ok(())
            }
        }
    }
}

fn unavailable(err: Error) -> Error {
    match err {
        Error::OracleUnavailable(_) => err,
        other => Error::OracleUnavailable(other.to_string()),
    }
}
