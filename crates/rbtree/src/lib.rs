//! Sentinel-based red-black tree over an index arena.
//!
//! Every empty link of a tree refers to one shared, permanently black
//! sentinel slot, so rotations and fixups never branch on a missing node.
//! Insert returns a [`Handle`] that can later be passed to
//! [`RbTree::erase`]; handles of erased nodes are detected and refused.

mod erase;
mod error;
mod insert;
mod node;
mod rotate;
mod traverse;
mod tree;
mod validate;

pub use error::{Error, InvariantViolation};
pub use node::{Color, Handle};
pub use traverse::Iter;
pub use tree::{DuplicatePolicy, RbTree, TreeConfig};
