use crate::error::InvariantViolation;
use crate::node::{Color, Id, NIL};
use crate::rotate::Dir;
use crate::tree::{DuplicatePolicy, RbTree};

impl<K: Ord> RbTree<K> {
    /// Checks every red-black and ordering rule and returns the black height:
    /// the number of black nodes on any root-to-sentinel path, root included.
    ///
    /// Keys must be strictly increasing in order unless the tree is a
    /// multiset, where equal neighbors are allowed. Runs in `O(n)` with an
    /// explicit stack and touches only child links for the walk.
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        let nil = self.node(NIL);
        if nil.color != Color::Black {
            return Err(InvariantViolation::RedSentinel);
        }
        if self.root.is_nil() {
            return match self.len {
                0 => Ok(0),
                n => Err(InvariantViolation::LenMismatch {
                    expected: n,
                    found: 0,
                }),
            };
        }
        if self.is_red(self.root) {
            return Err(InvariantViolation::RedRoot);
        }
        if !self.parent(self.root).is_nil() {
            return Err(InvariantViolation::ParentLink {
                node: self.handle(self.root),
            });
        }

        let strict = self.config.duplicates != DuplicatePolicy::Multiset;
        let mut black_height = None;
        let mut count = 0;
        let mut prev: Option<Id> = None;
        // (node, black nodes from the root down to it)
        let mut stack: Vec<(Id, usize)> = Vec::new();
        let mut x = self.root;
        let mut above = 0;
        loop {
            while !x.is_nil() {
                let blacks = above + usize::from(!self.is_red(x));
                stack.push((x, blacks));
                above = blacks;
                x = self.child(x, Dir::Left);
            }
            let Some((y, blacks)) = stack.pop() else {
                break;
            };

            count += 1;
            if count > self.len {
                return Err(InvariantViolation::LenMismatch {
                    expected: self.len,
                    found: count,
                });
            }
            if let Some(p) = prev {
                let (a, b) = (self.key_of(p), self.key_of(y));
                if a > b || (strict && a == b) {
                    return Err(InvariantViolation::Order {
                        node: self.handle(y),
                    });
                }
            }
            prev = Some(y);

            let children = [self.child(y, Dir::Left), self.child(y, Dir::Right)];
            for c in children.into_iter().filter(|c| !c.is_nil()) {
                if self.parent(c) != y {
                    return Err(InvariantViolation::ParentLink {
                        node: self.handle(c),
                    });
                }
                if self.is_red(y) && self.is_red(c) {
                    return Err(InvariantViolation::DoubleRed {
                        node: self.handle(c),
                    });
                }
            }
            if children.iter().any(|c| c.is_nil()) {
                match black_height {
                    None => black_height = Some(blacks),
                    Some(expected) if expected != blacks => {
                        return Err(InvariantViolation::BlackHeight {
                            node: self.handle(y),
                            expected,
                            found: blacks,
                        });
                    }
                    Some(_) => {}
                }
            }

            x = self.child(y, Dir::Right);
            above = blacks;
        }

        if count != self.len {
            return Err(InvariantViolation::LenMismatch {
                expected: self.len,
                found: count,
            });
        }
        Ok(black_height.unwrap_or(0))
    }
}
