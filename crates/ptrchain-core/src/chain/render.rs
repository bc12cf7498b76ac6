//! Text rendering of built chains.
//!
//! Every root-to-leaf path is one line:
//!
//! ```text
//! 1: label [0x00001000] -> 0x000001F4 + 0x00000010 -> 0x00000020 + 0x00000008 = 7
//! ```
//!
//! The first child of a node continues the current line. Each later sibling
//! starts a new line padded with `prefix.len() + INDENT_PAD` spaces, where
//! `prefix` is the root label followed by every ` -> value + offset` segment
//! leading to the branching node.

use super::node::ChainNode;

/// Extra spaces added to the prefix width on continuation lines
pub const INDENT_PAD: usize = 10;

/// Format an address or offset as `0x` + uppercase hex, at least 8 digits
pub fn format_address(value: u64) -> String {
    format!("0x{:08X}", value)
}

/// Render one chain, one line per leaf path. The result ends with a newline.
pub fn render_chain(index: usize, root_label: &str, root: &ChainNode) -> String {
    let mut out = format!("{}: {} [{}]", index, root_label, format_address(root.address));
    render_tail(&mut out, root_label, root);
    out
}

fn render_tail(out: &mut String, prefix: &str, node: &ChainNode) {
    if node.is_leaf() {
        out.push_str(&format!(" = {}\n", node.value));
        return;
    }

    for (i, (offset, child)) in node.children.iter().enumerate() {
        if i > 0 {
            out.push_str(&" ".repeat(prefix.len() + INDENT_PAD));
        }
        let segment = format!(
            " -> {} + {}",
            format_address(node.value),
            format_address(*offset)
        );
        out.push_str(&segment);

        let child_prefix = format!("{}{}", prefix, segment);
        render_tail(out, &child_prefix, child);
    }
}
