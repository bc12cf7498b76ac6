//! JSON tree export of a run

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::chain::{BuildStats, ChainNode, format_address};
use crate::config::SearchConfig;
use crate::error::Result;
use crate::report::ModuleLabel;

/// Whole-run export document
#[derive(Debug, Clone, Serialize)]
pub struct ChainDocument {
    pub generated_at: DateTime<Utc>,
    pub package: Option<String>,
    pub config: SearchConfig,
    pub elapsed_secs: f64,
    pub stats: BuildStats,
    pub chains: Vec<ChainJson>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChainJson {
    pub index: usize,
    pub label: String,
    pub root: NodeJson,
}

/// A node with hex-formatted addresses; `offset` is absent on roots
#[derive(Debug, Clone, Serialize)]
pub struct NodeJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
    pub address: String,
    pub value: String,
    pub value_dec: u64,
    pub children: Vec<NodeJson>,
}

impl NodeJson {
    fn from_node(offset: Option<u64>, node: &ChainNode) -> Self {
        Self {
            offset: offset.map(format_address),
            address: format_address(node.address),
            value: format_address(node.value),
            value_dec: node.value,
            children: node
                .children
                .iter()
                .map(|(off, child)| NodeJson::from_node(Some(*off), child))
                .collect(),
        }
    }
}

impl ChainDocument {
    pub fn new(
        package: Option<String>,
        config: &SearchConfig,
        elapsed_secs: f64,
        stats: &BuildStats,
        chains: &[ChainNode],
        label: &ModuleLabel,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            package,
            config: config.clone(),
            elapsed_secs,
            stats: stats.clone(),
            chains: chains
                .iter()
                .enumerate()
                .map(|(i, chain)| ChainJson {
                    index: i + 1,
                    label: label.label_for(chain.address),
                    root: NodeJson::from_node(None, chain),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(&path, self.to_json()?)?;
        info!("Saved chain export to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample_document() -> ChainDocument {
        let mut root = ChainNode::new(0x1000_1000, 500);
        root.children.insert(16, ChainNode::new(516, 7));
        let config = SearchConfig::builder().depth(2).max_offset(16).build().unwrap();
        let stats = BuildStats {
            chains: 1,
            nodes: 2,
            range_lookups: 1,
            ..Default::default()
        };
        ChainDocument::new(
            Some("com.example.game".to_string()),
            &config,
            0.5,
            &stats,
            &[root],
            &ModuleLabel::default(),
        )
    }

    #[test]
    fn test_document_shape() {
        let json: Value = serde_json::from_str(&sample_document().to_json().unwrap()).unwrap();

        assert_eq!(json["package"], "com.example.game");
        assert_eq!(json["config"]["depth"], 2);
        assert_eq!(json["config"]["word_width"], "64");
        assert_eq!(json["config"]["failure_policy"], "skip-subtree");
        assert_eq!(json["stats"]["nodes"], 2);

        let chain = &json["chains"][0];
        assert_eq!(chain["index"], 1);
        assert_eq!(chain["label"], "libil2cpp.so + 0x00001000");
        assert!(chain["root"].get("offset").is_none());
        assert_eq!(chain["root"]["value"], "0x000001F4");
        assert_eq!(chain["root"]["value_dec"], 500);

        let child = &chain["root"]["children"][0];
        assert_eq!(child["offset"], "0x00000010");
        assert_eq!(child["address"], "0x00000204");
        assert_eq!(child["value_dec"], 7);
        assert_eq!(child["children"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chains.json");
        sample_document().save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"generated_at\""));
    }
}
