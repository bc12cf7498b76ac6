use std::collections::BTreeMap;

/// One discovered memory location within a chain.
///
/// Children are keyed by their byte offset from this node's `value`, so a
/// node has at most one child per offset and iterates them in ascending
/// offset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainNode {
    /// Address the value was read from
    pub address: u64,
    pub value: u64,
    pub children: BTreeMap<u64, ChainNode>,
}

impl ChainNode {
    pub fn new(address: u64, value: u64) -> Self {
        Self {
            address,
            value,
            children: BTreeMap::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, self included
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(ChainNode::node_count).sum::<usize>()
    }

    /// Number of root-to-leaf paths, i.e. rendered lines
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.values().map(ChainNode::leaf_count).sum()
        }
    }

    /// Number of node levels in the longest path, self included
    pub fn levels(&self) -> u32 {
        1 + self.children.values().map(ChainNode::levels).max().unwrap_or(0)
    }
}
