//! An ordered set backed by an arena-allocated AVL tree.
//!
//! # Examples
//!
//! ```
//! use avl_collections::avl_tree::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for value in &[20, 4, 15, 70, 50, 100, 80, 60] {
//!     tree.insert(*value);
//! }
//!
//! assert_eq!(tree.height(), 3);
//! assert_eq!(tree.min(), Some(&4));
//! assert!(tree.validate().is_ok());
//! ```

#[macro_use]
extern crate log;

pub mod arena;
pub mod avl_tree;
