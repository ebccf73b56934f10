use crate::node::Id;
use crate::tree::RbTree;

/// Child side. Fixups are written once for a side and its opposite instead
/// of as two mirrored branches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Dir {
    #[inline(always)]
    pub(crate) fn opposite(self) -> Self {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

impl<K> RbTree<K> {
    /// Moves `x` down toward `dir`; its child on the opposite side takes its
    /// place. `rotate(x, Dir::Left)` is the classic left rotation.
    ///
    /// Colors are untouched and in-order key sequence is preserved.
    pub(crate) fn rotate(&mut self, x: Id, dir: Dir) {
        let y = self.child(x, dir.opposite());
        debug_assert!(!y.is_nil(), "rotation pivot needs a child to lift");

        let inner = self.child(y, dir);
        self.set_child(x, dir.opposite(), inner);
        if !inner.is_nil() {
            self.set_parent(inner, x);
        }

        let p = self.parent(x);
        self.set_parent(y, p);
        self.replace_child(p, x, y);

        self.set_child(y, dir, x);
        self.set_parent(x, y);
    }

    /// Points whichever link referenced `old` (a child slot of `p`, or the
    /// root when `p` is the sentinel) at `new`.
    pub(crate) fn replace_child(&mut self, p: Id, old: Id, new: Id) {
        if p.is_nil() {
            self.root = new;
        } else if self.child(p, Dir::Left) == old {
            self.set_child(p, Dir::Left, new);
        } else {
            self.set_child(p, Dir::Right, new);
        }
    }

    /// Replaces the subtree rooted at `u` with the one rooted at `v`.
    ///
    /// `v` may be the sentinel; its parent link is still written.
    pub(crate) fn transplant(&mut self, u: Id, v: Id) {
        let p = self.parent(u);
        self.replace_child(p, u, v);
        self.set_parent(v, p);
    }
}
