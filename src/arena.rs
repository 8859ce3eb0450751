//! Slab allocator for tree nodes.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object allocated in an `Arena<T>`.
///
/// Handles are plain indices: they are `Copy`, do not own the object they refer to, and are
/// only meaningful for the arena that produced them.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle(usize);

impl Handle {
    /// Returns the slot index of this handle.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone)]
enum Block<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// An allocator that stores objects of a single type in one contiguous `Vec`.
///
/// Freed slots are threaded onto an intrusive free list and reused by later allocations, so
/// handles stay small and stable for as long as the object they refer to is alive. The arena
/// uses no unsafe code and all objects are dropped together when the arena is dropped or
/// cleared.
///
/// # Examples
///
/// ```
/// use avl_collections::arena::Arena;
///
/// let mut arena = Arena::new();
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), 2);
/// ```
#[derive(Clone)]
pub struct Arena<T> {
    head: Option<Handle>,
    blocks: Vec<Block<T>>,
    len: usize,
}

impl<T> Arena<T> {
    fn is_valid_handle(&self, handle: Handle) -> bool {
        handle.0 < self.blocks.len()
    }

    /// Constructs a new, empty `Arena<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::new();
    /// assert!(arena.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Constructs a new, empty `Arena<T>` with room for `capacity` objects before the backing
    /// storage has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::with_capacity(1024);
    /// assert!(arena.capacity() >= 1024);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            head: None,
            blocks: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    /// Allocates an object in the arena and returns its handle. The most recently freed slot is
    /// reused if there is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;

        match self.head.take() {
            None => {
                self.blocks.push(Block::Occupied(value));
                Handle(self.blocks.len() - 1)
            },
            Some(handle) => {
                let vacant_block = mem::replace(&mut self.blocks[handle.0], Block::Occupied(value));
                match vacant_block {
                    Block::Vacant(next_handle) => {
                        self.head = next_handle;
                        handle
                    },
                    Block::Occupied(_) => panic!("Error: free list points at an occupied block."),
                }
            },
        }
    }

    /// Deallocates an object in the arena and returns the object.
    ///
    /// # Panics
    ///
    /// Panics if `handle` corresponds to an invalid or vacant block.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(x), 0);
    /// assert_eq!(arena.get(x), None);
    /// ```
    pub fn free(&mut self, handle: Handle) -> T {
        if !self.is_valid_handle(handle) {
            panic!("Error: attempting to free invalid block.");
        }
        if let Block::Vacant(_) = self.blocks[handle.0] {
            panic!("Error: attempting to free vacant block.");
        }
        let old_block = mem::replace(&mut self.blocks[handle.0], Block::Vacant(self.head));
        match old_block {
            Block::Occupied(value) => {
                self.len -= 1;
                self.head = Some(handle);
                value
            },
            Block::Vacant(_) => unreachable!(),
        }
    }

    /// Returns an immutable reference to an object in the arena, or `None` if the handle does
    /// not correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.blocks.get(handle.0) {
            Some(Block::Occupied(ref value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the arena, or `None` if the handle does not
    /// correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// *arena.get_mut(x).unwrap() = 1;
    /// assert_eq!(arena[x], 1);
    /// ```
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.blocks.get_mut(handle.0) {
            Some(Block::Occupied(ref mut value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of objects the arena can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.blocks.capacity()
    }

    /// Drops every object in the arena. All outstanding handles become invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// arena.clear();
    /// assert!(arena.is_empty());
    /// assert_eq!(arena.get(x), None);
    /// ```
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.head = None;
        self.len = 0;
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: handle does not refer to a live block.")
    }
}

impl<T> IndexMut<Handle> for Arena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("Error: handle does not refer to a live block.")
    }
}
