//! Run-level text report: summary line, rendered chains, footer.

use std::io::{self, Write};
use std::time::Duration;

use crate::chain::{ChainNode, format_address, render_chain};
use crate::config::SearchConfig;

/// Marker printed once after the last chain of a run
pub const RUN_FOOTER: &str = "\n**EXIT**\nRETRY SAVE\n\n82.1 # Ch.Ca.Cd.Cb.A 0\n";

pub const DEFAULT_MODULE_NAME: &str = "libil2cpp.so";
pub const DEFAULT_MODULE_BASE: u64 = 0x1000_0000;

/// Produces root labels relative to a module load address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLabel {
    pub name: String,
    pub base: u64,
}

impl Default for ModuleLabel {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODULE_NAME.to_string(),
            base: DEFAULT_MODULE_BASE,
        }
    }
}

impl ModuleLabel {
    pub fn new(name: impl Into<String>, base: u64) -> Self {
        Self {
            name: name.into(),
            base,
        }
    }

    /// `name + 0x...` for addresses inside the module, bare hex below it
    pub fn label_for(&self, address: u64) -> String {
        match address.checked_sub(self.base) {
            Some(rel) => format!("{} + {}", self.name, format_address(rel)),
            None => format_address(address),
        }
    }
}

pub struct RunReport<'a> {
    pub chains: &'a [ChainNode],
    pub config: &'a SearchConfig,
    pub elapsed: Duration,
    pub label: &'a ModuleLabel,
}

impl RunReport<'_> {
    pub fn summary_line(&self) -> String {
        format!(
            "Found {} chains in {:.3} seconds ({}, {}):",
            self.chains.len(),
            self.elapsed.as_secs_f64(),
            self.config.depth,
            self.config.max_offset
        )
    }

    pub fn render(&self) -> String {
        let mut out = self.summary_line();
        out.push_str("\n\n");
        for (i, chain) in self.chains.iter().enumerate() {
            out.push_str(&render_chain(
                i + 1,
                &self.label.label_for(chain.address),
                chain,
            ));
        }
        out.push_str(RUN_FOOTER);
        out
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()
    }
}
