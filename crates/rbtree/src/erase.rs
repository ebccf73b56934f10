use log::trace;

use crate::error::Error;
use crate::node::{Color, Handle, Id, NIL};
use crate::rotate::Dir;
use crate::tree::RbTree;

impl<K> RbTree<K> {
    /// Unlinks the node behind `handle` and returns its key.
    ///
    /// The sentinel, handles of erased nodes and handles from another tree's
    /// slot range are refused with [`Error::InvalidHandle`]; the tree is left
    /// unchanged in that case.
    pub fn erase(&mut self, handle: Handle) -> Result<K, Error> {
        let Some(z) = self.resolve(handle) else {
            trace!(
                "refused erase of slot {} generation {}",
                handle.index, handle.generation
            );
            return Err(Error::InvalidHandle(handle));
        };

        let mut removed = self.color_of(z);
        let x;
        if self.child(z, Dir::Left).is_nil() {
            x = self.child(z, Dir::Right);
            self.transplant(z, x);
        } else if self.child(z, Dir::Right).is_nil() {
            x = self.child(z, Dir::Left);
            self.transplant(z, x);
        } else {
            // two children: the in-order successor takes z's place and color
            let y = self.extreme(self.child(z, Dir::Right), Dir::Left);
            removed = self.color_of(y);
            x = self.child(y, Dir::Right);
            if self.parent(y) == z {
                self.set_parent(x, y);
            } else {
                self.transplant(y, x);
                let zr = self.child(z, Dir::Right);
                self.set_child(y, Dir::Right, zr);
                self.set_parent(zr, y);
            }
            self.transplant(z, y);
            let zl = self.child(z, Dir::Left);
            self.set_child(y, Dir::Left, zl);
            self.set_parent(zl, y);
            let color = self.color_of(z);
            self.set_color(y, color);
        }

        if removed == Color::Black {
            self.erase_fixup(x);
        }
        self.set_parent(NIL, NIL);
        self.len -= 1;
        Ok(self.release(z))
    }

    /// Pushes the extra black carried by `x` up the tree or absorbs it with
    /// recolors and at most three rotations.
    fn erase_fixup(&mut self, mut x: Id) {
        while x != self.root && !self.is_red(x) {
            let p = self.parent(x);
            let side = if self.child(p, Dir::Left) == x {
                Dir::Left
            } else {
                Dir::Right
            };
            let mut w = self.child(p, side.opposite());
            debug_assert!(!w.is_nil(), "deficient side must have a real sibling");

            if self.is_red(w) {
                self.set_color(w, Color::Black);
                self.set_color(p, Color::Red);
                self.rotate(p, side);
                w = self.child(p, side.opposite());
            }

            let near = self.child(w, side);
            let far = self.child(w, side.opposite());
            if !self.is_red(near) && !self.is_red(far) {
                self.set_color(w, Color::Red);
                x = p;
                continue;
            }

            if !self.is_red(far) {
                self.set_color(near, Color::Black);
                self.set_color(w, Color::Red);
                self.rotate(w, side.opposite());
                w = self.child(p, side.opposite());
            }

            let color = self.color_of(p);
            self.set_color(w, color);
            self.set_color(p, Color::Black);
            let far = self.child(w, side.opposite());
            self.set_color(far, Color::Black);
            self.rotate(p, side);
            x = self.root;
        }
        self.set_color(x, Color::Black);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DuplicatePolicy, TreeConfig};

    fn tree_of(keys: impl IntoIterator<Item = u64>) -> RbTree<u64> {
        let mut tree = RbTree::new().unwrap();
        tree.try_extend(keys).unwrap();
        tree
    }

    fn keys(tree: &RbTree<u64>) -> Vec<u64> {
        tree.iter().copied().collect()
    }

    #[test]
    fn erase_internal_two_child_node() {
        let mut tree = tree_of(1..=7);
        let h = tree.find(&4).unwrap();
        assert_eq!(tree.erase(h), Ok(4));
        assert_eq!(keys(&tree), vec![1, 2, 3, 5, 6, 7]);
        assert!(tree.validate().is_ok());
        assert_eq!(tree.find(&4), None);
    }

    #[test]
    fn erase_root_until_empty() {
        let mut tree = tree_of(0..64);
        while let Some(root) = tree.root() {
            let key = *tree.key(root).unwrap();
            assert_eq!(tree.erase(root), Ok(key));
            assert!(tree.validate().is_ok(), "after erasing {key}");
        }
        assert!(tree.is_empty());
        assert_eq!(tree.min(), None);
    }

    #[test]
    fn erase_min_and_max_repeatedly() {
        let mut tree = tree_of((0..200).map(|i| (i * 37) % 200));
        let mut lo = 0;
        let mut hi = 199;
        while lo <= hi {
            assert_eq!(tree.erase(tree.min().unwrap()), Ok(lo));
            lo += 1;
            if lo <= hi {
                assert_eq!(tree.erase(tree.max().unwrap()), Ok(hi));
                hi -= 1;
            }
            assert!(tree.validate().is_ok());
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn stale_and_sentinel_handles_are_refused() {
        let mut tree = tree_of([1, 2, 3]);
        let h = tree.find(&2).unwrap();
        assert_eq!(tree.erase(h), Ok(2));
        assert_eq!(tree.erase(h), Err(Error::InvalidHandle(h)));

        let sentinel = tree.sentinel();
        assert_eq!(tree.erase(sentinel), Err(Error::InvalidHandle(sentinel)));

        let bogus = Handle {
            index: 999,
            generation: 0,
        };
        assert_eq!(tree.erase(bogus), Err(Error::InvalidHandle(bogus)));
        assert_eq!(keys(&tree), vec![1, 3]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn reused_slot_does_not_revive_old_handle() {
        let mut tree = tree_of([1, 2, 3]);
        let old = tree.find(&2).unwrap();
        tree.erase(old).unwrap();
        let new = tree.insert(20).unwrap();
        assert_eq!(new.index(), old.index());
        assert_ne!(new.generation(), old.generation());
        assert_eq!(tree.key(old), None);
        assert_eq!(tree.erase(old), Err(Error::InvalidHandle(old)));
        assert_eq!(tree.key(new), Some(&20));
    }

    #[test]
    fn sentinel_is_restored_after_erase() {
        let mut tree = tree_of(0..32);
        for k in (0..32).step_by(3) {
            tree.remove(&k).unwrap();
        }
        let nil = tree.node(NIL);
        assert_eq!(nil.color, Color::Black);
        assert_eq!(nil.parent, NIL);
        assert_eq!(nil.ch, [NIL, NIL]);
    }

    #[test]
    fn multiset_erase_one_copy() {
        let mut tree = RbTree::with_config(TreeConfig {
            duplicates: DuplicatePolicy::Multiset,
            initial_capacity: 0,
        })
        .unwrap();
        let handles: Vec<_> = (0..10).map(|_| tree.insert(7_u64).unwrap()).collect();
        tree.insert(3).unwrap();
        for (i, h) in handles.into_iter().enumerate() {
            assert_eq!(tree.erase(h), Ok(7));
            assert_eq!(tree.len(), 10 - i);
            assert!(tree.validate().is_ok());
        }
        assert_eq!(keys(&tree), vec![3]);
    }
}
