use crate::arena::{Arena, Handle};
use crate::avl_tree::node::Node;
use crate::avl_tree::tree::Tree;
use std::collections::VecDeque;
use std::vec;

/// An iterator for `AvlTree<T>` that yields values in pre-order: each node before its left
/// subtree, and the left subtree before the right subtree.
pub struct PreOrder<'a, T>
where
    T: 'a,
{
    tree: &'a Tree<T>,
    stack: Vec<Handle>,
}

impl<'a, T> PreOrder<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>) -> Self {
        PreOrder {
            tree,
            stack: tree.root.into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for PreOrder<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        self.stack.pop().map(|handle| {
            let node = &tree.nodes[handle];
            self.stack.extend(node.right);
            self.stack.extend(node.left);
            &node.value
        })
    }
}

/// An iterator for `AvlTree<T>` that yields values in ascending order.
///
/// The iterator keeps no stack: it moves to each successor through the right and parent links
/// of the current node.
pub struct InOrder<'a, T>
where
    T: 'a,
{
    tree: &'a Tree<T>,
    next: Option<Handle>,
}

impl<'a, T> InOrder<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>) -> Self {
        InOrder {
            tree,
            next: tree.root.map(|root| tree.leftmost(root)),
        }
    }
}

impl<'a, T> Iterator for InOrder<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let handle = self.next?;
        self.next = tree.successor(handle);
        Some(&tree.nodes[handle].value)
    }
}

/// An iterator for `AvlTree<T>` that yields values in post-order: both subtrees of a node
/// before the node itself.
pub struct PostOrder<'a, T>
where
    T: 'a,
{
    tree: &'a Tree<T>,
    current: Option<Handle>,
    last: Option<Handle>,
    stack: Vec<Handle>,
}

impl<'a, T> PostOrder<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>) -> Self {
        PostOrder {
            tree,
            current: tree.root,
            last: None,
            stack: Vec::new(),
        }
    }
}

impl<'a, T> Iterator for PostOrder<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            while let Some(handle) = self.current {
                self.stack.push(handle);
                self.current = tree.nodes[handle].left;
            }

            let top = *self.stack.last()?;
            let right = tree.nodes[top].right;
            if right.is_some() && right != self.last {
                self.current = right;
            } else {
                self.stack.pop();
                self.last = Some(top);
                return Some(&tree.nodes[top].value);
            }
        }
    }
}

/// An iterator for `AvlTree<T>` that yields values level by level from the root, left to right
/// within a level.
pub struct LevelOrder<'a, T>
where
    T: 'a,
{
    tree: &'a Tree<T>,
    queue: VecDeque<Handle>,
}

impl<'a, T> LevelOrder<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>) -> Self {
        LevelOrder {
            tree,
            queue: tree.root.into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for LevelOrder<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        self.queue.pop_front().map(|handle| {
            let node = &tree.nodes[handle];
            self.queue.extend(node.left);
            self.queue.extend(node.right);
            &node.value
        })
    }
}

/// An owning iterator for `AvlTree<T>`.
///
/// This iterator traverses the elements of the tree in ascending order and yields owned values.
pub struct IntoIter<T> {
    nodes: Arena<Node<T>>,
    order: vec::IntoIter<Handle>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(tree: Tree<T>) -> Self {
        let mut order = Vec::with_capacity(tree.nodes.len());
        let mut curr = tree.root.map(|root| tree.leftmost(root));
        while let Some(handle) = curr {
            order.push(handle);
            curr = tree.successor(handle);
        }
        IntoIter {
            nodes: tree.nodes,
            order: order.into_iter(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = &mut self.nodes;
        self.order.next().map(|handle| nodes.free(handle).value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
