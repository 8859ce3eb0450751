use crate::arena::{Arena, Handle};
use crate::avl_tree::node::Node;
use crate::avl_tree::{Error, Result, Rotation};
use std::cmp::{self, Ordering};
use std::mem;

/// The node arena together with the handle of the root node.
///
/// Every structural edit keeps the parent links consistent with the child links, so any node
/// can reach the root in O(height) steps without a stack.
#[derive(Clone)]
pub struct Tree<T> {
    pub nodes: Arena<Node<T>>,
    pub root: Option<Handle>,
}

impl<T> Tree<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Tree {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Returns the cached height of `node`, or -1 for an absent subtree.
    pub fn height(&self, node: Option<Handle>) -> i32 {
        match node {
            Some(node) => self.nodes[node].height,
            None => -1,
        }
    }

    pub fn update_height(&mut self, node: Handle) {
        let Node { left, right, .. } = self.nodes[node];
        let height = cmp::max(self.height(left), self.height(right)) + 1;
        self.nodes[node].height = height;
    }

    pub fn balance_factor(&self, node: Option<Handle>) -> i32 {
        match node {
            Some(node) => {
                let Node { left, right, .. } = self.nodes[node];
                self.height(left) - self.height(right)
            },
            None => 0,
        }
    }

    // points whichever slot held `old` at `new`: a child slot of `parent`, or the root
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            Some(parent) => {
                let parent = &mut self.nodes[parent];
                if parent.left == Some(old) {
                    parent.left = new;
                } else {
                    parent.right = new;
                }
            },
            None => self.root = new,
        }
    }

    /// Promotes the right child of `node` and returns it as the new root of the subtree.
    pub fn rotate_left(&mut self, node: Handle) -> Result<Handle> {
        let child = self.nodes[node].right.ok_or(Error::InvalidOperation {
            rotation: Rotation::Left,
        })?;
        trace!("rotating left at {}", node.index());

        let parent = self.nodes[node].parent;
        let inner = self.nodes[child].left;

        self.nodes[node].right = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(node);
        }

        self.replace_child(parent, node, Some(child));
        self.nodes[child].parent = parent;
        self.nodes[child].left = Some(node);
        self.nodes[node].parent = Some(child);

        self.update_height(node);
        self.update_height(child);
        Ok(child)
    }

    /// Promotes the left child of `node` and returns it as the new root of the subtree.
    pub fn rotate_right(&mut self, node: Handle) -> Result<Handle> {
        let child = self.nodes[node].left.ok_or(Error::InvalidOperation {
            rotation: Rotation::Right,
        })?;
        trace!("rotating right at {}", node.index());

        let parent = self.nodes[node].parent;
        let inner = self.nodes[child].right;

        self.nodes[node].left = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(node);
        }

        self.replace_child(parent, node, Some(child));
        self.nodes[child].parent = parent;
        self.nodes[child].right = Some(node);
        self.nodes[node].parent = Some(child);

        self.update_height(node);
        self.update_height(child);
        Ok(child)
    }

    /// Restores the balance of `node`, whose height must be up to date, and returns the node now
    /// at the root of its former subtree.
    pub fn rebalance(&mut self, node: Handle) -> Result<Handle> {
        let balance_factor = self.balance_factor(Some(node));

        if balance_factor > 1 {
            if let Some(left) = self.nodes[node].left {
                if self.balance_factor(Some(left)) < 0 {
                    self.rotate_left(left)?;
                }
            }
            self.rotate_right(node)
        } else if balance_factor < -1 {
            if let Some(right) = self.nodes[node].right {
                if self.balance_factor(Some(right)) > 0 {
                    self.rotate_right(right)?;
                }
            }
            self.rotate_left(node)
        } else {
            Ok(node)
        }
    }

    // walks from `start` to the root, updating heights and rebalancing every ancestor
    fn retrace(&mut self, start: Option<Handle>) -> Result<()> {
        let mut curr = start;
        while let Some(node) = curr {
            self.update_height(node);
            let subtree = self.rebalance(node)?;
            curr = self.nodes[subtree].parent;
        }
        Ok(())
    }

    pub fn leftmost(&self, mut node: Handle) -> Handle {
        while let Some(left) = self.nodes[node].left {
            node = left;
        }
        node
    }

    pub fn rightmost(&self, mut node: Handle) -> Handle {
        while let Some(right) = self.nodes[node].right {
            node = right;
        }
        node
    }

    /// Returns the in-order successor of `node` by following right and parent links.
    pub fn successor(&self, node: Handle) -> Option<Handle> {
        if let Some(right) = self.nodes[node].right {
            return Some(self.leftmost(right));
        }

        let mut child = node;
        let mut parent = self.nodes[node].parent;
        while let Some(curr) = parent {
            if self.nodes[curr].left == Some(child) {
                return Some(curr);
            }
            child = curr;
            parent = self.nodes[curr].parent;
        }
        None
    }

    // precondition: `node` has at most one child
    fn detach(&mut self, node: Handle) -> (Node<T>, Option<Handle>) {
        let parent = self.nodes[node].parent;
        let child = self.nodes[node].only_child();
        if let Some(child) = child {
            self.nodes[child].parent = parent;
        }
        self.replace_child(parent, node, child);
        (self.nodes.free(node), parent)
    }
}

impl<T> Tree<T>
where
    T: Ord,
{
    /// Inserts `value` unless an equal value is already stored. Returns `true` if a new node was
    /// created.
    pub fn insert(&mut self, value: T) -> Result<bool> {
        let mut parent = None;
        let mut ordering = Ordering::Equal;
        let mut curr = self.root;

        while let Some(node) = curr {
            ordering = value.cmp(&self.nodes[node].value);
            curr = match ordering {
                Ordering::Less => self.nodes[node].left,
                Ordering::Greater => self.nodes[node].right,
                Ordering::Equal => return Ok(false),
            };
            parent = Some(node);
        }

        let new_node = self.nodes.allocate(Node::new(value, parent));
        match parent {
            Some(parent) => {
                if ordering == Ordering::Less {
                    self.nodes[parent].left = Some(new_node);
                } else {
                    self.nodes[parent].right = Some(new_node);
                }
            },
            None => self.root = Some(new_node),
        }

        self.retrace(parent)?;
        Ok(true)
    }

    /// Removes the value equal to `value` and returns it, or returns `None` if no such value is
    /// stored.
    pub fn remove(&mut self, value: &T) -> Result<Option<T>> {
        let target = match self.find(value) {
            Some(target) => target,
            None => return Ok(None),
        };

        let removed = match (self.nodes[target].left, self.nodes[target].right) {
            (Some(left), Some(_)) => {
                // the predecessor's value takes over the target node and the predecessor's node
                // is the one unlinked
                let predecessor = self.rightmost(left);
                trace!(
                    "removing {} through predecessor {}",
                    target.index(),
                    predecessor.index()
                );
                let (donor, parent) = self.detach(predecessor);
                let removed = mem::replace(&mut self.nodes[target].value, donor.value);
                self.retrace(parent)?;
                removed
            },
            _ => {
                if self.nodes[target].is_leaf() {
                    trace!("removing leaf {}", target.index());
                } else {
                    trace!("splicing out {}", target.index());
                }
                let (node, parent) = self.detach(target);
                self.retrace(parent)?;
                node.value
            },
        };

        Ok(Some(removed))
    }

    pub fn find(&self, value: &T) -> Option<Handle> {
        let mut curr = self.root;
        while let Some(node) = curr {
            curr = match value.cmp(&self.nodes[node].value) {
                Ordering::Less => self.nodes[node].left,
                Ordering::Greater => self.nodes[node].right,
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// Returns the node holding the greatest value less than or equal to `value`.
    pub fn floor(&self, value: &T) -> Option<Handle> {
        let mut best = None;
        let mut curr = self.root;
        while let Some(node) = curr {
            curr = match value.cmp(&self.nodes[node].value) {
                Ordering::Less => self.nodes[node].left,
                Ordering::Greater => {
                    best = Some(node);
                    self.nodes[node].right
                },
                Ordering::Equal => return Some(node),
            };
        }
        best
    }

    /// Returns the node holding the least value greater than or equal to `value`.
    pub fn ceil(&self, value: &T) -> Option<Handle> {
        let mut best = None;
        let mut curr = self.root;
        while let Some(node) = curr {
            curr = match value.cmp(&self.nodes[node].value) {
                Ordering::Less => {
                    best = Some(node);
                    self.nodes[node].left
                },
                Ordering::Greater => self.nodes[node].right,
                Ordering::Equal => return Some(node),
            };
        }
        best
    }

    /// Checks the structural invariants of the tree against the expected element count.
    pub fn validate(&self, len: usize) -> Result<()> {
        if let Some(root) = self.root {
            if self.nodes[root].parent.is_some() {
                return Err(Error::ParentMismatch);
            }
        }

        let mut reachable = 0;
        self.validate_subtree(self.root, &mut reachable)?;
        if reachable != len || self.nodes.len() != len {
            return Err(Error::LenMismatch { len, reachable });
        }

        let mut prev: Option<&T> = None;
        let mut curr = self.root.map(|root| self.leftmost(root));
        while let Some(node) = curr {
            let value = &self.nodes[node].value;
            if let Some(prev) = prev {
                if prev >= value {
                    return Err(Error::Unordered);
                }
            }
            prev = Some(value);
            curr = self.successor(node);
        }

        Ok(())
    }

    // returns the height of the subtree computed from its shape
    fn validate_subtree(&self, node: Option<Handle>, reachable: &mut usize) -> Result<i32> {
        let node = match node {
            Some(node) => node,
            None => return Ok(-1),
        };
        *reachable += 1;

        let Node { height, left, right, .. } = self.nodes[node];
        if left.is_some() && left == right {
            return Err(Error::ParentMismatch);
        }
        for child in left.iter().chain(right.iter()) {
            if self.nodes[*child].parent != Some(node) {
                return Err(Error::ParentMismatch);
            }
        }

        let left_height = self.validate_subtree(left, reachable)?;
        let right_height = self.validate_subtree(right, reachable)?;
        let actual = cmp::max(left_height, right_height) + 1;
        if height != actual {
            return Err(Error::HeightMismatch {
                cached: height,
                actual,
            });
        }

        let balance_factor = left_height - right_height;
        if balance_factor.abs() > 1 {
            return Err(Error::Unbalanced { balance_factor });
        }

        Ok(actual)
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::arena::Handle;
    use crate::avl_tree::node::Node;
    use crate::avl_tree::{Error, Rotation};

    fn build(values: &[u32]) -> Tree<u32> {
        let mut tree = Tree::with_capacity(values.len());
        for value in values {
            tree.insert(*value).unwrap();
        }
        tree
    }

    fn value(tree: &Tree<u32>, node: Option<Handle>) -> Option<u32> {
        node.map(|node| tree.nodes[node].value)
    }

    fn root_value(tree: &Tree<u32>) -> Option<u32> {
        value(tree, tree.root)
    }

    // links `values` as a left-leaning chain without rebalancing
    fn left_chain(values: &[u32]) -> Tree<u32> {
        let mut tree = Tree::with_capacity(values.len());
        let mut parent = None;
        for value in values {
            let node = tree.nodes.allocate(Node::new(*value, parent));
            match parent {
                Some(parent) => tree.nodes[parent].left = Some(node),
                None => tree.root = Some(node),
            }
            parent = Some(node);
        }
        let mut curr = parent;
        while let Some(node) = curr {
            tree.update_height(node);
            curr = tree.nodes[node].parent;
        }
        tree
    }

    #[test]
    fn test_height_empty() {
        let tree: Tree<u32> = Tree::with_capacity(0);
        assert_eq!(tree.height(None), -1);
        assert_eq!(tree.balance_factor(None), 0);
    }

    #[test]
    fn test_height_leaf() {
        let tree = build(&[1]);
        assert_eq!(tree.height(tree.root), 0);
        assert_eq!(tree.balance_factor(tree.root), 0);
    }

    #[test]
    fn test_rotate_left_without_right_child() {
        let mut tree = build(&[1]);
        let root = tree.root.unwrap();
        assert_eq!(
            tree.rotate_left(root),
            Err(Error::InvalidOperation { rotation: Rotation::Left }),
        );
        assert_eq!(tree.validate(1), Ok(()));
    }

    #[test]
    fn test_rotate_right_without_left_child() {
        let mut tree = build(&[1]);
        let root = tree.root.unwrap();
        assert_eq!(
            tree.rotate_right(root),
            Err(Error::InvalidOperation { rotation: Rotation::Right }),
        );
    }

    #[test]
    fn test_rotate_right_rewires_parents() {
        let mut tree = left_chain(&[3, 2, 1]);
        assert_eq!(tree.validate(3), Err(Error::Unbalanced { balance_factor: 2 }));

        let root = tree.root.unwrap();
        let new_root = tree.rotate_right(root).unwrap();

        assert_eq!(tree.root, Some(new_root));
        assert_eq!(root_value(&tree), Some(2));
        assert_eq!(tree.nodes[new_root].parent, None);
        assert_eq!(tree.nodes[root].parent, Some(new_root));
        assert_eq!(value(&tree, tree.nodes[new_root].left), Some(1));
        assert_eq!(value(&tree, tree.nodes[new_root].right), Some(3));
        assert_eq!(tree.height(tree.root), 1);
        assert_eq!(tree.validate(3), Ok(()));
    }

    #[test]
    fn test_rotate_moves_inner_subtree() {
        let mut tree = build(&[2, 1, 4, 3, 5]);
        let root = tree.root.unwrap();
        let new_root = tree.rotate_left(root).unwrap();

        assert_eq!(tree.nodes[new_root].value, 4);
        let three = tree.find(&3).unwrap();
        assert_eq!(tree.nodes[three].parent, Some(root));
        assert_eq!(tree.nodes[root].right, Some(three));
        assert_eq!(tree.nodes[root].height, 1);
        assert_eq!(tree.nodes[new_root].height, 2);
    }

    #[test]
    fn test_rebalance_left_left() {
        let tree = build(&[3, 2, 1]);
        assert_eq!(root_value(&tree), Some(2));
        assert_eq!(tree.validate(3), Ok(()));
    }

    #[test]
    fn test_rebalance_left_right() {
        let tree = build(&[3, 1, 2]);
        assert_eq!(root_value(&tree), Some(2));
        assert_eq!(tree.validate(3), Ok(()));
    }

    #[test]
    fn test_rebalance_right_right() {
        let tree = build(&[1, 2, 3]);
        assert_eq!(root_value(&tree), Some(2));
        assert_eq!(tree.validate(3), Ok(()));
    }

    #[test]
    fn test_rebalance_right_left() {
        let tree = build(&[1, 3, 2]);
        assert_eq!(root_value(&tree), Some(2));
        assert_eq!(tree.validate(3), Ok(()));
    }

    #[test]
    fn test_rebalance_balanced_node() {
        let mut tree = build(&[2, 1, 3]);
        let root = tree.root.unwrap();
        assert_eq!(tree.rebalance(root), Ok(root));
    }

    #[test]
    fn test_insert_duplicate() {
        let mut tree = build(&[2, 1, 3]);
        assert_eq!(tree.insert(1), Ok(false));
        assert_eq!(tree.nodes.len(), 3);
        assert_eq!(tree.validate(3), Ok(()));
    }

    #[test]
    fn test_remove_leaf() {
        let mut tree = build(&[2, 1, 3]);
        assert_eq!(tree.remove(&3), Ok(Some(3)));
        assert_eq!(tree.nodes[tree.root.unwrap()].right, None);
        assert_eq!(tree.validate(2), Ok(()));
    }

    #[test]
    fn test_remove_one_child() {
        let mut tree = build(&[2, 1, 3, 4]);
        let four = tree.find(&4).unwrap();
        assert_eq!(tree.remove(&3), Ok(Some(3)));
        assert_eq!(tree.nodes[four].parent, tree.root);
        assert_eq!(tree.validate(3), Ok(()));
    }

    #[test]
    fn test_remove_two_children_keeps_target_node() {
        let mut tree = build(&[2, 1, 3]);
        let root = tree.root.unwrap();
        assert_eq!(tree.remove(&2), Ok(Some(2)));
        assert_eq!(tree.root, Some(root));
        assert_eq!(tree.nodes[root].value, 1);
        assert_eq!(tree.nodes[root].left, None);
        assert_eq!(tree.validate(2), Ok(()));
    }

    #[test]
    fn test_remove_rebalances_ancestors() {
        let mut tree = build(&[5, 3, 8, 2, 4, 7, 10, 1, 6, 9, 11, 12]);
        assert_eq!(tree.validate(12), Ok(()));
        assert_eq!(tree.remove(&4), Ok(Some(4)));
        assert_eq!(tree.validate(11), Ok(()));
        assert_eq!(root_value(&tree), Some(8));
    }

    #[test]
    fn test_remove_absent() {
        let mut tree = build(&[2, 1, 3]);
        assert_eq!(tree.remove(&4), Ok(None));
        assert_eq!(tree.validate(3), Ok(()));
    }

    #[test]
    fn test_successor() {
        let tree = build(&[4, 2, 6, 1, 3, 5, 7]);
        let mut curr = tree.root.map(|root| tree.leftmost(root));
        let mut values = Vec::new();
        while let Some(node) = curr {
            values.push(tree.nodes[node].value);
            curr = tree.successor(node);
        }
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_floor_ceil() {
        let tree = build(&[10, 20, 30]);
        assert_eq!(value(&tree, tree.floor(&5)), None);
        assert_eq!(value(&tree, tree.floor(&25)), Some(20));
        assert_eq!(value(&tree, tree.floor(&30)), Some(30));
        assert_eq!(value(&tree, tree.ceil(&5)), Some(10));
        assert_eq!(value(&tree, tree.ceil(&25)), Some(30));
        assert_eq!(value(&tree, tree.ceil(&35)), None);
    }

    #[test]
    fn test_validate_height_mismatch() {
        let mut tree = build(&[2, 1, 3]);
        let root = tree.root.unwrap();
        tree.nodes[root].height = 5;
        assert_eq!(
            tree.validate(3),
            Err(Error::HeightMismatch { cached: 5, actual: 1 }),
        );
    }

    #[test]
    fn test_validate_parent_mismatch() {
        let mut tree = build(&[2, 1, 3]);
        let one = tree.find(&1).unwrap();
        tree.nodes[one].parent = None;
        assert_eq!(tree.validate(3), Err(Error::ParentMismatch));
    }

    #[test]
    fn test_validate_unordered() {
        let mut tree = build(&[2, 1, 3]);
        let one = tree.find(&1).unwrap();
        tree.nodes[one].value = 4;
        assert_eq!(tree.validate(3), Err(Error::Unordered));
    }

    #[test]
    fn test_validate_len_mismatch() {
        let tree = build(&[2, 1, 3]);
        assert_eq!(
            tree.validate(4),
            Err(Error::LenMismatch { len: 4, reachable: 3 }),
        );
    }
}
