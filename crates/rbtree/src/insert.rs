use std::cmp::Ordering;

use log::trace;

use crate::error::Error;
use crate::node::{Color, Handle, Id, NIL};
use crate::rotate::Dir;
use crate::tree::{DuplicatePolicy, RbTree};

impl<K: Ord> RbTree<K> {
    /// Inserts `key` and returns a handle to the node now holding it.
    ///
    /// Equal keys follow the tree's [`DuplicatePolicy`]. Fails only when the
    /// arena cannot grow, or on a duplicate under `Reject`.
    pub fn insert(&mut self, key: K) -> Result<Handle, Error> {
        let mut parent = NIL;
        let mut side = Dir::Left;
        let mut x = self.root;
        while !x.is_nil() {
            parent = x;
            side = match key.cmp(self.key_of(x)) {
                Ordering::Less => Dir::Left,
                Ordering::Greater => Dir::Right,
                Ordering::Equal => match self.config.duplicates {
                    DuplicatePolicy::Multiset => Dir::Right,
                    DuplicatePolicy::Reject => {
                        let existing = self.handle(x);
                        trace!("rejected duplicate key at slot {}", existing.index);
                        return Err(Error::DuplicateKey { existing });
                    }
                    DuplicatePolicy::Replace => {
                        self.node_mut(x).key = Some(key);
                        return Ok(self.handle(x));
                    }
                },
            };
            x = self.child(x, side);
        }

        let z = self.alloc(key, parent)?;
        if parent.is_nil() {
            self.root = z;
        } else {
            self.set_child(parent, side, z);
        }
        self.len += 1;
        self.insert_fixup(z);
        Ok(self.handle(z))
    }
}

impl<K> RbTree<K> {
    /// Restores the red-black rules after attaching the red node `z`.
    ///
    /// Runs while `z` and its parent are both red. The parent is then never
    /// the root, so the grandparent is a real node.
    fn insert_fixup(&mut self, mut z: Id) {
        while self.is_red(self.parent(z)) {
            let p = self.parent(z);
            let g = self.parent(p);
            let side = self.side_of(p);
            let uncle = self.child(g, side.opposite());

            if self.is_red(uncle) {
                self.set_color(p, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(g, Color::Red);
                z = g;
                continue;
            }

            if z == self.child(p, side.opposite()) {
                // inner grandchild: lift it to the outer position first
                z = p;
                self.rotate(z, side);
            }
            let p = self.parent(z);
            let g = self.parent(p);
            self.set_color(p, Color::Black);
            self.set_color(g, Color::Red);
            self.rotate(g, side.opposite());
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }
}
