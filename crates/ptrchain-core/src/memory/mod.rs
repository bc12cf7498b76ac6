mod oracle;
mod snapshot;

#[cfg(test)]
pub mod mock;

pub use oracle::{MemoryOracle, SearchHit, WordWidth};
pub use snapshot::{MemorySnapshot, SnapshotEntry, SnapshotOracle};

#[cfg(test)]
pub use mock::{MockOracle, MockOracleBuilder};
