/// Slot index shared by every empty link of a tree.
pub(crate) const NIL: Id = Id(0);

/// Largest number of arena slots a single tree can address.
pub(crate) const MAX_SLOTS: usize = u32::MAX as usize;

#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Id(u32);

impl Id {
    #[inline(always)]
    pub(crate) fn is_nil(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub(crate) fn from_idx(v: usize) -> Self {
        debug_assert!(v < MAX_SLOTS);
        Id(v as u32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

/// Reference to a node returned by [`RbTree::insert`](crate::RbTree::insert).
///
/// A handle stays valid until its node is erased or the tree is cleared. Every
/// release bumps the slot's generation, so a stale handle is rejected even
/// after its slot has been reused by a later insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Handle {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }

    pub fn is_sentinel(self) -> bool {
        self.index == NIL.0
    }
}

pub(crate) struct Node<K> {
    pub(crate) ch: [Id; 2],
    /// Parent link for live nodes, next free slot for released ones.
    pub(crate) parent: Id,
    pub(crate) color: Color,
    pub(crate) generation: u32,
    pub(crate) key: Option<K>,
}

impl<K> Node<K> {
    pub(crate) fn sentinel() -> Self {
        Self {
            ch: [NIL, NIL],
            parent: NIL,
            color: Color::Black,
            generation: 0,
            key: None,
        }
    }

    pub(crate) fn new(key: K, parent: Id, generation: u32) -> Self {
        Self {
            ch: [NIL, NIL],
            parent,
            color: Color::Red,
            generation,
            key: Some(key),
        }
    }
}
