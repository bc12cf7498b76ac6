//! Scripted oracle for testing
//!
//! Range results are keyed by the low bound of the requested window, which
//! is always the parent's value during chain building.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use super::oracle::{MemoryOracle, SearchHit, WordWidth};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct MockOracle {
    seeds: Vec<SearchHit>,
    ranges: HashMap<u64, Vec<SearchHit>>,
    failing_bases: HashSet<u64>,
    unavailable: bool,
    range_calls: Cell<usize>,
    widths: RefCell<Vec<WordWidth>>,
    scope_widened: Cell<bool>,
}

impl MockOracle {
    pub fn builder() -> MockOracleBuilder {
        MockOracleBuilder::default()
    }

    /// Number of range lookups served so far
    pub fn range_calls(&self) -> usize {
        self.range_calls.get()
    }

    /// Widths requested by every range lookup, in call order
    pub fn requested_widths(&self) -> Vec<WordWidth> {
        self.widths.borrow().clone()
    }

    pub fn scope_widened(&self) -> bool {
        self.scope_widened.get()
    }
}

impl MemoryOracle for MockOracle {
    fn search_everywhere(&self) -> Result<()> {
        self.scope_widened.set(true);
        Ok(())
    }

    fn seed_lookup(&self) -> Result<Vec<SearchHit>> {
        if self.unavailable {
            return Err(Error::OracleUnavailable("mock detached".to_string()));
        }
        Ok(self.seeds.clone())
    }

    fn range_lookup(&self, low: u64, _high: u64, width: WordWidth) -> Result<Vec<SearchHit>> {
        self.range_calls.set(self.range_calls.get() + 1);
        self.widths.borrow_mut().push(width);

        if self.failing_bases.contains(&low) {
            return Err(Error::LookupFailed {
                base: low,
                message: "mock failure".to_string(),
            });
        }
        Ok(self.ranges.get(&low).cloned().unwrap_or_default())
    }
}

/// Builder for [`MockOracle`]
#[derive(Debug, Default)]
pub struct MockOracleBuilder {
    oracle: MockOracle,
}

impl MockOracleBuilder {
    pub fn seed(mut self, address: u64, raw_value: &str) -> Self {
        self.oracle.seeds.push(SearchHit::new(address, raw_value));
        self
    }

    /// Append a hit to the results returned for windows starting at `base`
    pub fn hit(mut self, base: u64, address: u64, raw_value: &str) -> Self {
        self.oracle
            .ranges
            .entry(base)
            .or_default()
            .push(SearchHit::new(address, raw_value));
        self
    }

    pub fn fail_at(mut self, base: u64) -> Self {
        self.oracle.failing_bases.insert(base);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.oracle.unavailable = true;
        self
    }

    pub fn build(self) -> MockOracle {
        self.oracle
    }
}
