use std::iter::FusedIterator;

use crate::node::{Handle, Id, NIL};
use crate::rotate::Dir;
use crate::tree::RbTree;

impl<K> RbTree<K> {
    /// Copies keys in ascending order into `dest` and returns how many were
    /// written. Traversal stops once `dest` is full.
    pub fn to_array(&self, dest: &mut [K]) -> usize
    where
        K: Clone,
    {
        let mut written = 0;
        for (slot, key) in dest.iter_mut().zip(self.iter()) {
            slot.clone_from(key);
            written += 1;
        }
        written
    }

    /// In-order iterator. Walks parent links, so no auxiliary stack is built.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            tree: self,
            front: self.extreme(self.root, Dir::Left),
            back: self.extreme(self.root, Dir::Right),
            remaining: self.len,
        }
    }

    pub fn successor(&self, handle: Handle) -> Option<Handle> {
        let x = self.resolve(handle)?;
        self.live_handle(self.step(x, Dir::Right))
    }

    pub fn predecessor(&self, handle: Handle) -> Option<Handle> {
        let x = self.resolve(handle)?;
        self.live_handle(self.step(x, Dir::Left))
    }

    /// Neighbor of `x` in key order: the next one for `Dir::Right`, the
    /// previous one for `Dir::Left`. Returns the sentinel past either end.
    pub(crate) fn step(&self, mut x: Id, dir: Dir) -> Id {
        let c = self.child(x, dir);
        if !c.is_nil() {
            return self.extreme(c, dir.opposite());
        }
        let mut p = self.parent(x);
        while !p.is_nil() && self.child(p, dir) == x {
            x = p;
            p = self.parent(p);
        }
        p
    }
}

pub struct Iter<'a, K> {
    tree: &'a RbTree<K>,
    front: Id,
    back: Id,
    remaining: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let x = self.front;
        debug_assert_ne!(x, NIL);
        self.remaining -= 1;
        self.front = self.tree.step(x, Dir::Right);
        Some(self.tree.key_of(x))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let x = self.back;
        debug_assert_ne!(x, NIL);
        self.remaining -= 1;
        self.back = self.tree.step(x, Dir::Left);
        Some(self.tree.key_of(x))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

impl<'a, K> IntoIterator for &'a RbTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
