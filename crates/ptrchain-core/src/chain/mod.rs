//! Pointer chain discovery and rendering.
//!
//! - [`ChainBuilder`] walks the oracle from each seed and grows one tree per
//!   seed, bounded by depth and by the offset window.
//! - [`render_chain`] turns a tree into text, one line per leaf path.

mod builder;
mod node;
mod render;

pub use builder::{BuildStats, ChainBuilder, NodeFailure, parse_value, window_offset};
pub use node::ChainNode;
pub use render::{INDENT_PAD, format_address, render_chain};
