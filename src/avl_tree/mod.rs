//! Self-balancing binary search tree where the heights of the two child subtrees of any node
//! differ by at most one.
//!
//! Nodes live in an [`Arena`](crate::arena::Arena) and refer to their children and to their
//! parent through arena handles, so rebalancing after a mutation walks back up the tree through
//! parent links instead of the call stack.

mod iter;
mod node;
mod set;
mod tree;

pub use self::iter::{InOrder, IntoIter, LevelOrder, PostOrder, PreOrder};
pub use self::set::AvlTree;

use std::error;
use std::fmt;
use std::result;

/// The direction of a rotation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rotation {
    Left,
    Right,
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::Left => write!(f, "left"),
            Rotation::Right => write!(f, "right"),
        }
    }
}

/// Errors reported by the tree's internal operations and by [`AvlTree::validate`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A rotation was requested on a node that lacks the child it would promote.
    InvalidOperation { rotation: Rotation },
    /// In-order traversal found two values that are not strictly increasing.
    Unordered,
    /// A node's subtrees differ in height by more than one.
    Unbalanced { balance_factor: i32 },
    /// A node's cached height disagrees with the height of its subtrees.
    HeightMismatch { cached: i32, actual: i32 },
    /// A child's parent link does not point back at the node that owns it.
    ParentMismatch,
    /// The element count disagrees with the number of reachable nodes.
    LenMismatch { len: usize, reachable: usize },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidOperation { rotation } => {
                write!(f, "cannot rotate {}: missing child to promote", rotation)
            },
            Error::Unordered => write!(f, "values are not in strictly increasing order"),
            Error::Unbalanced { balance_factor } => {
                write!(f, "node has balance factor {}", balance_factor)
            },
            Error::HeightMismatch { cached, actual } => {
                write!(f, "node caches height {} but has height {}", cached, actual)
            },
            Error::ParentMismatch => write!(f, "child does not link back to its parent"),
            Error::LenMismatch { len, reachable } => {
                write!(f, "tree reports {} values but {} nodes are reachable", len, reachable)
            },
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::{Error, Rotation};

    #[test]
    fn test_display() {
        assert_eq!(
            Error::InvalidOperation { rotation: Rotation::Left }.to_string(),
            "cannot rotate left: missing child to promote",
        );
        assert_eq!(
            Error::LenMismatch { len: 2, reachable: 1 }.to_string(),
            "tree reports 2 values but 1 nodes are reachable",
        );
    }
}
