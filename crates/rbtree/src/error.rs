use std::collections::TryReserveError;
use std::fmt;

use crate::node::Handle;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The arena could not grow to hold another node.
    AllocationFailure(TryReserveError),
    /// Every addressable slot index is in use.
    CapacityExceeded,
    /// The handle is the sentinel, belongs to an erased node, or was never issued.
    InvalidHandle(Handle),
    /// An equal key is already present and the tree rejects duplicates.
    DuplicateKey { existing: Handle },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AllocationFailure(err) => write!(f, "node allocation failed: {err}"),
            Error::CapacityExceeded => f.write_str("tree slot capacity exhausted"),
            Error::InvalidHandle(h) => {
                write!(f, "invalid node handle (slot {}, generation {})", h.index, h.generation)
            }
            Error::DuplicateKey { existing } => {
                write!(f, "key already present at slot {}", existing.index)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::AllocationFailure(err) => Some(err),
            _ => None,
        }
    }
}

/// Structural rule found broken by [`RbTree::validate`](crate::RbTree::validate).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    RedSentinel,
    RedRoot,
    DoubleRed { node: Handle },
    BlackHeight { node: Handle, expected: usize, found: usize },
    Order { node: Handle },
    ParentLink { node: Handle },
    LenMismatch { expected: usize, found: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            InvariantViolation::RedSentinel => f.write_str("sentinel is red"),
            InvariantViolation::RedRoot => f.write_str("root is red"),
            InvariantViolation::DoubleRed { node } => {
                write!(f, "red node at slot {} has a red parent", node.index)
            }
            InvariantViolation::BlackHeight {
                node,
                expected,
                found,
            } => write!(
                f,
                "black height {found} below slot {} differs from {expected}",
                node.index
            ),
            InvariantViolation::Order { node } => {
                write!(f, "key at slot {} is out of order", node.index)
            }
            InvariantViolation::ParentLink { node } => {
                write!(f, "slot {} has a wrong parent link", node.index)
            }
            InvariantViolation::LenMismatch { expected, found } => {
                write!(f, "tree reports {expected} nodes but {found} are reachable")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}
