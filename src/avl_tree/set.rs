use crate::avl_tree::iter::{InOrder, IntoIter, LevelOrder, PostOrder, PreOrder};
use crate::avl_tree::tree::Tree;
use crate::avl_tree::Result;
use std::fmt;
use std::iter::FromIterator;

// rotations only fail when handed a node without the child they promote, which the rebalancing
// walk never does
fn expect_balanced<U>(result: Result<U>) -> U {
    match result {
        Ok(value) => value,
        Err(error) => panic!("Error: {}.", error),
    }
}

/// An ordered set implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of two child subtrees of any node differ by at most one. Nodes are stored in an arena
/// and keep a link to their parent, so every insertion and removal rebalances by walking from
/// the modified node back up to the root.
///
/// # Examples
///
/// ```
/// use avl_collections::avl_tree::AvlTree;
///
/// let mut tree = AvlTree::new();
/// tree.insert(0);
/// tree.insert(3);
///
/// assert_eq!(tree.len(), 2);
///
/// assert_eq!(tree.min(), Some(&0));
/// assert_eq!(tree.ceil(&2), Some(&3));
///
/// assert_eq!(tree.remove(&0), Some(0));
/// assert_eq!(tree.remove(&1), None);
/// ```
#[derive(Clone)]
pub struct AvlTree<T> {
    tree: Tree<T>,
    len: usize,
}

impl<T> AvlTree<T> {
    /// Constructs a new, empty `AvlTree<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = AvlTree::new();
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Constructs a new, empty `AvlTree<T>` whose node arena can hold `capacity` values before
    /// it reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = AvlTree::with_capacity(1024);
    /// assert!(tree.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        AvlTree {
            tree: Tree::with_capacity(capacity),
            len: 0,
        }
    }

    /// Returns the number of values in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = AvlTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clears the tree, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(2);
    /// tree.clear();
    /// assert_eq!(tree.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
        self.len = 0;
    }

    /// Returns the height of the tree: 0 for a single value and -1 for an empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert_eq!(tree.height(), -1);
    /// for value in 1..8 {
    ///     tree.insert(value);
    /// }
    /// assert_eq!(tree.height(), 2);
    /// ```
    pub fn height(&self) -> i32 {
        self.tree.height(self.tree.root)
    }

    /// Returns the minimum value of the tree. Returns `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(3);
    /// assert_eq!(tree.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        let tree = &self.tree;
        tree.root.map(|root| &tree.nodes[tree.leftmost(root)].value)
    }

    /// Returns the maximum value of the tree. Returns `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(3);
    /// assert_eq!(tree.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        let tree = &self.tree;
        tree.root.map(|root| &tree.nodes[tree.rightmost(root)].value)
    }

    /// Returns an iterator over the tree. The iterator will yield values using in-order
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// tree.insert(3);
    ///
    /// let mut iterator = tree.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> InOrder<'_, T> {
        self.in_order()
    }

    /// Returns an iterator that yields values in pre-order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = vec![2, 1, 3].into_iter().collect();
    /// assert_eq!(tree.pre_order().collect::<Vec<&u32>>(), vec![&2, &1, &3]);
    /// ```
    pub fn pre_order(&self) -> PreOrder<'_, T> {
        PreOrder::new(&self.tree)
    }

    /// Returns an iterator that yields values in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = vec![2, 1, 3].into_iter().collect();
    /// assert_eq!(tree.in_order().collect::<Vec<&u32>>(), vec![&1, &2, &3]);
    /// ```
    pub fn in_order(&self) -> InOrder<'_, T> {
        InOrder::new(&self.tree)
    }

    /// Returns an iterator that yields values in post-order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = vec![2, 1, 3].into_iter().collect();
    /// assert_eq!(tree.post_order().collect::<Vec<&u32>>(), vec![&1, &3, &2]);
    /// ```
    pub fn post_order(&self) -> PostOrder<'_, T> {
        PostOrder::new(&self.tree)
    }

    /// Returns an iterator that yields values breadth-first, level by level from the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = vec![1, 2, 3, 4].into_iter().collect();
    /// assert_eq!(tree.level_order().collect::<Vec<&u32>>(), vec![&2, &1, &3, &4]);
    /// ```
    pub fn level_order(&self) -> LevelOrder<'_, T> {
        LevelOrder::new(&self.tree)
    }
}

impl<T> AvlTree<T>
where
    T: Ord,
{
    /// Constructs a new `AvlTree<T>` holding a single value.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let tree = AvlTree::with_value(1);
    /// assert_eq!(tree.len(), 1);
    /// assert_eq!(tree.height(), 0);
    /// ```
    pub fn with_value(value: T) -> Self {
        let mut tree = Self::new();
        tree.insert(value);
        tree
    }

    /// Inserts a value into the tree. If an equal value already exists the tree is left unchanged
    /// and `false` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert!(tree.insert(1));
    /// assert!(tree.contains(&1));
    /// assert!(!tree.insert(1));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let inserted = expect_balanced(self.tree.insert(value));
        if inserted {
            self.len += 1;
            debug!("inserted value, len is now {}", self.len);
        }
        inserted
    }

    /// Removes a value from the tree. If the value exists in the tree, it will return the stored
    /// value. Otherwise it will return `None` and leave the tree unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.remove(&1), Some(1));
    /// assert_eq!(tree.remove(&1), None);
    /// ```
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let removed = expect_balanced(self.tree.remove(value));
        if removed.is_some() {
            self.len -= 1;
            debug!("removed value, len is now {}", self.len);
        }
        removed
    }

    /// Checks if a value exists in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert!(!tree.contains(&0));
    /// assert!(tree.contains(&1));
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        self.tree.find(value).is_some()
    }

    /// Returns a reference to the stored value equal to `value`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.get(&1), Some(&1));
    /// assert_eq!(tree.get(&2), None);
    /// ```
    pub fn get(&self, value: &T) -> Option<&T> {
        let tree = &self.tree;
        tree.find(value).map(|handle| &tree.nodes[handle].value)
    }

    /// Returns a value in the tree that is less than or equal to a particular value. Returns
    /// `None` if such a value does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.floor(&0), None);
    /// assert_eq!(tree.floor(&2), Some(&1));
    /// ```
    pub fn floor(&self, value: &T) -> Option<&T> {
        let tree = &self.tree;
        tree.floor(value).map(|handle| &tree.nodes[handle].value)
    }

    /// Returns a value in the tree that is greater than or equal to a particular value. Returns
    /// `None` if such a value does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.ceil(&0), Some(&1));
    /// assert_eq!(tree.ceil(&2), None);
    /// ```
    pub fn ceil(&self, value: &T) -> Option<&T> {
        let tree = &self.tree;
        tree.ceil(value).map(|handle| &tree.nodes[handle].value)
    }

    /// Checks every structural invariant of the tree: strictly increasing in-order values,
    /// balance factors within one, cached heights, parent links, and the element count.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlTree;
    ///
    /// let tree: AvlTree<u32> = (0..100).collect();
    /// assert!(tree.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()> {
        self.tree.validate(self.len)
    }
}

impl<T> IntoIterator for AvlTree<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.tree)
    }
}

impl<'a, T> IntoIterator for &'a AvlTree<T>
where
    T: 'a,
{
    type Item = &'a T;
    type IntoIter = InOrder<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Extend<T> for AvlTree<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> FromIterator<T> for AvlTree<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T> fmt::Debug for AvlTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}
