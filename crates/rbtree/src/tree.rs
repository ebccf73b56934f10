use std::cmp::Ordering;
use std::fmt;

use log::debug;

use crate::error::Error;
use crate::node::{Color, Handle, Id, MAX_SLOTS, NIL, Node};
use crate::rotate::Dir;

/// What `insert` does with a key equal to one already stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail with [`Error::DuplicateKey`] and leave the tree untouched.
    #[default]
    Reject,
    /// Store the key again; equal keys descend to the right.
    Multiset,
    /// Overwrite the stored key in place and return its handle.
    Replace,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeConfig {
    pub duplicates: DuplicatePolicy,
    /// Node slots reserved up front, in addition to the sentinel.
    pub initial_capacity: usize,
}

/// Red-black tree over an index arena.
///
/// Slot 0 of the arena is the sentinel. It is black, never holds a key, and
/// every absent child or parent link points at it. Erased slots are chained
/// into a free list through their parent link and reused by later inserts.
pub struct RbTree<K> {
    pub(crate) nodes: Vec<Node<K>>,
    pub(crate) root: Id,
    pub(crate) free: Id,
    pub(crate) len: usize,
    pub(crate) config: TreeConfig,
}

impl<K> RbTree<K> {
    pub fn new() -> Result<Self, Error> {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Result<Self, Error> {
        let mut nodes = Vec::new();
        nodes
            .try_reserve(config.initial_capacity.saturating_add(1))
            .map_err(Error::AllocationFailure)?;
        nodes.push(Node::sentinel());
        debug!(
            "created red-black tree ({:?} duplicates, {} slots reserved)",
            config.duplicates, config.initial_capacity
        );
        Ok(Self {
            nodes,
            root: NIL,
            free: NIL,
            len: 0,
            config,
        })
    }

    pub fn config(&self) -> TreeConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the sentinel. Never resolves to a key and cannot be erased.
    pub fn sentinel(&self) -> Handle {
        self.handle(NIL)
    }

    pub fn root(&self) -> Option<Handle> {
        self.live_handle(self.root)
    }

    pub fn key(&self, handle: Handle) -> Option<&K> {
        self.resolve(handle).map(|x| self.key_of(x))
    }

    pub fn color(&self, handle: Handle) -> Option<Color> {
        self.resolve(handle).map(|x| self.color_of(x))
    }

    pub fn contains_handle(&self, handle: Handle) -> bool {
        self.resolve(handle).is_some()
    }

    pub fn min(&self) -> Option<Handle> {
        self.live_handle(self.extreme(self.root, Dir::Left))
    }

    pub fn max(&self) -> Option<Handle> {
        self.live_handle(self.extreme(self.root, Dir::Right))
    }

    /// Drops every key, post-order, and returns how many nodes were released.
    ///
    /// Slots stay allocated for reuse; handles issued before the call are
    /// invalidated.
    pub fn clear(&mut self) -> usize {
        let freed = self.teardown();
        debug!("cleared red-black tree ({freed} nodes released)");
        freed
    }

    /// Consumes the tree, dropping every key before the arena and sentinel.
    pub fn destroy(mut self) -> usize {
        let freed = self.teardown();
        debug!(
            "destroyed red-black tree ({freed} nodes, {} slots)",
            self.nodes.len()
        );
        freed
    }

    /// Walks the tree bottom-up through parent links, detaching and releasing
    /// each node once both of its children are gone.
    fn teardown(&mut self) -> usize {
        let mut freed = 0;
        let mut x = self.root;
        while !x.is_nil() {
            let left = self.child(x, Dir::Left);
            if !left.is_nil() {
                x = left;
                continue;
            }
            let right = self.child(x, Dir::Right);
            if !right.is_nil() {
                x = right;
                continue;
            }
            let p = self.parent(x);
            if !p.is_nil() {
                let side = self.side_of(x);
                self.set_child(p, side, NIL);
            }
            drop(self.release(x));
            freed += 1;
            x = p;
        }
        debug_assert_eq!(freed, self.len);
        self.root = NIL;
        self.len = 0;
        freed
    }

    pub(crate) fn alloc(&mut self, key: K, parent: Id) -> Result<Id, Error> {
        if !self.free.is_nil() {
            let id = self.free;
            let node = &mut self.nodes[id.idx()];
            self.free = node.parent;
            *node = Node::new(key, parent, node.generation);
            return Ok(id);
        }
        if self.nodes.len() >= MAX_SLOTS {
            return Err(Error::CapacityExceeded);
        }
        self.nodes.try_reserve(1).map_err(Error::AllocationFailure)?;
        let id = Id::from_idx(self.nodes.len());
        self.nodes.push(Node::new(key, parent, 0));
        Ok(id)
    }

    /// Returns the slot to the free list and hands back its key.
    pub(crate) fn release(&mut self, x: Id) -> K {
        debug_assert!(!x.is_nil());
        let node = &mut self.nodes[x.idx()];
        node.generation = node.generation.wrapping_add(1);
        node.ch = [NIL, NIL];
        node.parent = self.free;
        node.color = Color::Black;
        let key = node.key.take();
        self.free = x;
        match key {
            Some(key) => key,
            None => unreachable!("released slot {} held no key", x.idx()),
        }
    }

    pub(crate) fn resolve(&self, handle: Handle) -> Option<Id> {
        if handle.is_sentinel() {
            return None;
        }
        let node = self.nodes.get(handle.index as usize)?;
        (node.key.is_some() && node.generation == handle.generation)
            .then_some(Id::from_idx(handle.index as usize))
    }

    #[inline(always)]
    pub(crate) fn handle(&self, x: Id) -> Handle {
        Handle {
            index: x.idx() as u32,
            generation: self.node(x).generation,
        }
    }

    #[inline(always)]
    pub(crate) fn live_handle(&self, x: Id) -> Option<Handle> {
        (!x.is_nil()).then(|| self.handle(x))
    }

    #[inline(always)]
    pub(crate) fn node(&self, x: Id) -> &Node<K> {
        debug_assert!(x.idx() < self.nodes.len());
        &self.nodes[x.idx()]
    }

    #[inline(always)]
    pub(crate) fn node_mut(&mut self, x: Id) -> &mut Node<K> {
        debug_assert!(x.idx() < self.nodes.len());
        &mut self.nodes[x.idx()]
    }

    #[inline(always)]
    pub(crate) fn key_of(&self, x: Id) -> &K {
        match self.node(x).key.as_ref() {
            Some(key) => key,
            None => unreachable!("slot {} holds no key", x.idx()),
        }
    }

    #[inline(always)]
    pub(crate) fn child(&self, x: Id, dir: Dir) -> Id {
        self.node(x).ch[dir as usize]
    }

    #[inline(always)]
    pub(crate) fn set_child(&mut self, x: Id, dir: Dir, c: Id) {
        debug_assert!(!x.is_nil());
        self.node_mut(x).ch[dir as usize] = c;
    }

    #[inline(always)]
    pub(crate) fn parent(&self, x: Id) -> Id {
        self.node(x).parent
    }

    /// Also written on the sentinel while erasing, so the delete fixup can
    /// climb from an empty position.
    #[inline(always)]
    pub(crate) fn set_parent(&mut self, x: Id, p: Id) {
        self.node_mut(x).parent = p;
    }

    #[inline(always)]
    pub(crate) fn color_of(&self, x: Id) -> Color {
        self.node(x).color
    }

    #[inline(always)]
    pub(crate) fn is_red(&self, x: Id) -> bool {
        self.node(x).color == Color::Red
    }

    #[inline(always)]
    pub(crate) fn set_color(&mut self, x: Id, color: Color) {
        debug_assert!(!x.is_nil() || color == Color::Black);
        self.node_mut(x).color = color;
    }

    /// Which child slot of its parent `x` occupies.
    #[inline(always)]
    pub(crate) fn side_of(&self, x: Id) -> Dir {
        if self.child(self.parent(x), Dir::Left) == x {
            Dir::Left
        } else {
            Dir::Right
        }
    }

    /// Follows `dir` links from `x` as far as they go.
    pub(crate) fn extreme(&self, mut x: Id, dir: Dir) -> Id {
        if x.is_nil() {
            return NIL;
        }
        loop {
            let next = self.child(x, dir);
            if next.is_nil() {
                return x;
            }
            x = next;
        }
    }
}

impl<K: Ord> RbTree<K> {
    pub fn find(&self, key: &K) -> Option<Handle> {
        let mut x = self.root;
        while !x.is_nil() {
            x = match key.cmp(self.key_of(x)) {
                Ordering::Less => self.child(x, Dir::Left),
                Ordering::Greater => self.child(x, Dir::Right),
                Ordering::Equal => return Some(self.handle(x)),
            };
        }
        None
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns the first node in key order whose key is `>= key`.
    pub fn lower_bound(&self, key: &K) -> Option<Handle> {
        let mut best = NIL;
        let mut x = self.root;
        while !x.is_nil() {
            if self.key_of(x) >= key {
                best = x;
                x = self.child(x, Dir::Left);
            } else {
                x = self.child(x, Dir::Right);
            }
        }
        self.live_handle(best)
    }

    /// Removes one node holding `key`, returning the stored key.
    pub fn remove(&mut self, key: &K) -> Option<K> {
        let handle = self.find(key)?;
        self.erase(handle).ok()
    }

    /// Inserts every key, stopping at the first failure. Returns how many
    /// inserts succeeded.
    pub fn try_extend<I: IntoIterator<Item = K>>(&mut self, iter: I) -> Result<usize, Error> {
        let mut count = 0;
        for key in iter {
            self.insert(key)?;
            count += 1;
        }
        Ok(count)
    }
}

impl<K: fmt::Debug> fmt::Debug for RbTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
