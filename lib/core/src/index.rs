//! Red-black ordered index over catalog items
//!
//! Nodes live in a contiguous arena and link to each other by slot index.
//! Slot 0 is the shared NIL sentinel: it is always black, has no children,
//! and terminates every leaf, so rotations and fixups never branch on a
//! missing child. The parent link is a plain index used only when walking
//! upward during fixup.

use std::cmp::Ordering;

use crate::item::{Item, ItemId};
use crate::{Error, Result};

const NIL: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone)]
struct IndexNode {
    item: Item,
    color: Color,
    left: usize,
    right: usize,
    parent: usize,
}

impl IndexNode {
    fn sentinel() -> Self {
        Self {
            item: Item::default(),
            color: Color::Black,
            left: NIL,
            right: NIL,
            parent: NIL,
        }
    }
}

/// Ordered map from item id to item, balanced as a red-black tree
///
/// Duplicate ids are rejected on insert, so every id appears at most once
/// and in-order traversal is strictly increasing.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    nodes: Vec<IndexNode>,
    root: usize,
}

impl CatalogIndex {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 1);
        nodes.push(IndexNode::sentinel());
        Self { nodes, root: NIL }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root == NIL
    }

    #[inline]
    fn key(&self, n: usize) -> ItemId {
        self.nodes[n].item.id
    }

    #[inline]
    fn color(&self, n: usize) -> Color {
        self.nodes[n].color
    }

    #[inline]
    fn set_color(&mut self, n: usize, color: Color) {
        self.nodes[n].color = color;
    }

    #[inline]
    fn left(&self, n: usize) -> usize {
        self.nodes[n].left
    }

    #[inline]
    fn right(&self, n: usize) -> usize {
        self.nodes[n].right
    }

    #[inline]
    fn parent(&self, n: usize) -> usize {
        self.nodes[n].parent
    }

    fn find(&self, id: ItemId) -> usize {
        let mut cur = self.root;
        while cur != NIL {
            cur = match id.cmp(&self.key(cur)) {
                Ordering::Less => self.left(cur),
                Ordering::Greater => self.right(cur),
                Ordering::Equal => return cur,
            };
        }
        NIL
    }

    /// Point lookup by id, O(log n)
    pub fn search(&self, id: ItemId) -> Option<&Item> {
        match self.find(id) {
            NIL => None,
            n => Some(&self.nodes[n].item),
        }
    }

    /// Mutable lookup by id. The id of the returned item must not be changed.
    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        match self.find(id) {
            NIL => None,
            n => Some(&mut self.nodes[n].item),
        }
    }

    #[inline]
    pub fn contains(&self, id: ItemId) -> bool {
        self.find(id) != NIL
    }

    /// Insert an item keyed by its id
    ///
    /// Returns `Error::DuplicateItem` and leaves the tree untouched when the
    /// id is already present.
    pub fn insert(&mut self, item: Item) -> Result<()> {
        let id = item.id;
        let mut parent = NIL;
        let mut cur = self.root;
        while cur != NIL {
            parent = cur;
            cur = match id.cmp(&self.key(cur)) {
                Ordering::Less => self.left(cur),
                Ordering::Greater => self.right(cur),
                Ordering::Equal => return Err(Error::DuplicateItem(id)),
            };
        }

        let node = self.nodes.len();
        self.nodes.push(IndexNode {
            item,
            color: Color::Red,
            left: NIL,
            right: NIL,
            parent,
        });

        if parent == NIL {
            self.root = node;
        } else if id < self.key(parent) {
            self.nodes[parent].left = node;
        } else {
            self.nodes[parent].right = node;
        }

        self.insert_fixup(node);
        Ok(())
    }

    fn insert_fixup(&mut self, mut z: usize) {
        while self.color(self.parent(z)) == Color::Red {
            let p = self.parent(z);
            let g = self.parent(p);
            if p == self.left(g) {
                let uncle = self.right(g);
                if self.color(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.right(p) {
                        // inner grandchild: rotate it to the outside first
                        z = p;
                        self.rotate_left(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.left(g);
                if self.color(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.left(p) {
                        z = p;
                        self.rotate_right(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_left(g);
                }
            }
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }

    fn rotate_left(&mut self, x: usize) {
        let y = self.right(x);
        let y_left = self.left(y);
        self.nodes[x].right = y_left;
        if y_left != NIL {
            self.nodes[y_left].parent = x;
        }

        let xp = self.parent(x);
        self.nodes[y].parent = xp;
        if xp == NIL {
            self.root = y;
        } else if x == self.left(xp) {
            self.nodes[xp].left = y;
        } else {
            self.nodes[xp].right = y;
        }

        self.nodes[y].left = x;
        self.nodes[x].parent = y;
    }

    fn rotate_right(&mut self, x: usize) {
        let y = self.left(x);
        let y_right = self.right(y);
        self.nodes[x].left = y_right;
        if y_right != NIL {
            self.nodes[y_right].parent = x;
        }

        let xp = self.parent(x);
        self.nodes[y].parent = xp;
        if xp == NIL {
            self.root = y;
        } else if x == self.right(xp) {
            self.nodes[xp].right = y;
        } else {
            self.nodes[xp].left = y;
        }

        self.nodes[y].right = x;
        self.nodes[x].parent = y;
    }

    /// Replace the subtree rooted at `u` with the one rooted at `v`.
    /// `v` may be the sentinel, whose parent is then set on purpose.
    fn transplant(&mut self, u: usize, v: usize) {
        let up = self.parent(u);
        if up == NIL {
            self.root = v;
        } else if u == self.left(up) {
            self.nodes[up].left = v;
        } else {
            self.nodes[up].right = v;
        }
        self.nodes[v].parent = up;
    }

    fn minimum(&self, mut n: usize) -> usize {
        while self.left(n) != NIL {
            n = self.left(n);
        }
        n
    }

    fn maximum(&self, mut n: usize) -> usize {
        while self.right(n) != NIL {
            n = self.right(n);
        }
        n
    }

    /// Remove the item with the given id, returning it
    ///
    /// Missing ids are a no-op and return `None`.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let z = self.find(id);
        if z == NIL {
            return None;
        }

        let mut removed_color = self.color(z);
        let x;
        if self.left(z) == NIL {
            x = self.right(z);
            self.transplant(z, x);
        } else if self.right(z) == NIL {
            x = self.left(z);
            self.transplant(z, x);
        } else {
            // two children: splice out the in-order successor and put it in z's place
            let y = self.minimum(self.right(z));
            removed_color = self.color(y);
            x = self.right(y);
            if self.parent(y) == z {
                self.nodes[x].parent = y;
            } else {
                self.transplant(y, x);
                let zr = self.right(z);
                self.nodes[y].right = zr;
                self.nodes[zr].parent = y;
            }
            self.transplant(z, y);
            let zl = self.left(z);
            self.nodes[y].left = zl;
            self.nodes[zl].parent = y;
            let z_color = self.color(z);
            self.set_color(y, z_color);
        }

        if removed_color == Color::Black {
            self.delete_fixup(x);
        }

        self.nodes[NIL].parent = NIL;
        self.nodes[NIL].color = Color::Black;
        Some(self.release(z))
    }

    fn delete_fixup(&mut self, mut x: usize) {
        while x != self.root && self.color(x) == Color::Black {
            let p = self.parent(x);
            if x == self.left(p) {
                let mut w = self.right(p);
                if self.color(w) == Color::Red {
                    self.set_color(w, Color::Black);
                    self.set_color(p, Color::Red);
                    self.rotate_left(p);
                    w = self.right(self.parent(x));
                }
                if self.color(self.left(w)) == Color::Black && self.color(self.right(w)) == Color::Black {
                    self.set_color(w, Color::Red);
                    x = self.parent(x);
                } else {
                    if self.color(self.right(w)) == Color::Black {
                        let wl = self.left(w);
                        self.set_color(wl, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_right(w);
                        w = self.right(self.parent(x));
                    }
                    let p = self.parent(x);
                    let p_color = self.color(p);
                    self.set_color(w, p_color);
                    self.set_color(p, Color::Black);
                    let wr = self.right(w);
                    self.set_color(wr, Color::Black);
                    self.rotate_left(p);
                    x = self.root;
                }
            } else {
                let mut w = self.left(p);
                if self.color(w) == Color::Red {
                    self.set_color(w, Color::Black);
                    self.set_color(p, Color::Red);
                    self.rotate_right(p);
                    w = self.left(self.parent(x));
                }
                if self.color(self.right(w)) == Color::Black && self.color(self.left(w)) == Color::Black {
                    self.set_color(w, Color::Red);
                    x = self.parent(x);
                } else {
                    if self.color(self.left(w)) == Color::Black {
                        let wr = self.right(w);
                        self.set_color(wr, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_left(w);
                        w = self.left(self.parent(x));
                    }
                    let p = self.parent(x);
                    let p_color = self.color(p);
                    self.set_color(w, p_color);
                    self.set_color(p, Color::Black);
                    let wl = self.left(w);
                    self.set_color(wl, Color::Black);
                    self.rotate_right(p);
                    x = self.root;
                }
            }
        }
        self.set_color(x, Color::Black);
    }

    /// Drop an unlinked slot from the arena. The last slot moves into the
    /// hole and its neighbours are re-pointed at the new position.
    fn release(&mut self, slot: usize) -> Item {
        let last = self.nodes.len() - 1;
        let removed = self.nodes.swap_remove(slot);
        if slot != last {
            let (p, l, r) = (self.parent(slot), self.left(slot), self.right(slot));
            if p == NIL {
                self.root = slot;
            } else if self.left(p) == last {
                self.nodes[p].left = slot;
            } else {
                self.nodes[p].right = slot;
            }
            if l != NIL {
                self.nodes[l].parent = slot;
            }
            if r != NIL {
                self.nodes[r].parent = slot;
            }
        }
        removed.item
    }

    /// Lazy in-order traversal, ascending by id. Each call starts afresh.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Owned snapshot of the in-order traversal
    pub fn in_order(&self) -> Vec<Item> {
        self.iter().cloned().collect()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.iter().map(|item| item.id).collect()
    }

    pub fn min(&self) -> Option<&Item> {
        match self.root {
            NIL => None,
            root => Some(&self.nodes[self.minimum(root)].item),
        }
    }

    pub fn max(&self) -> Option<&Item> {
        match self.root {
            NIL => None,
            root => Some(&self.nodes[self.maximum(root)].item),
        }
    }

    /// Check every red-black invariant and the parent links
    ///
    /// Returns the black height of the tree, counting the sentinel leaf.
    pub fn validate(&self) -> Result<usize> {
        if self.color(NIL) != Color::Black {
            return Err(Error::InvariantViolation("sentinel is not black".into()));
        }
        if self.color(self.root) != Color::Black {
            return Err(Error::InvariantViolation("root is not black".into()));
        }
        if self.root != NIL && self.parent(self.root) != NIL {
            return Err(Error::InvariantViolation("root has a parent".into()));
        }

        let black_height = self.check_subtree(self.root)?;

        let mut prev: Option<ItemId> = None;
        let mut seen = 0usize;
        for item in self.iter() {
            if let Some(prev) = prev {
                if item.id <= prev {
                    return Err(Error::InvariantViolation(format!(
                        "in-order ids not increasing: {} then {}",
                        prev, item.id
                    )));
                }
            }
            prev = Some(item.id);
            seen += 1;
        }
        if seen != self.len() {
            return Err(Error::InvariantViolation(format!(
                "{} nodes reachable from root, {} allocated",
                seen,
                self.len()
            )));
        }

        Ok(black_height)
    }

    fn check_subtree(&self, n: usize) -> Result<usize> {
        if n == NIL {
            return Ok(1);
        }
        let (l, r) = (self.left(n), self.right(n));
        if self.color(n) == Color::Red && (self.color(l) == Color::Red || self.color(r) == Color::Red) {
            return Err(Error::InvariantViolation(format!(
                "red node {} has a red child",
                self.key(n)
            )));
        }
        for child in [l, r] {
            if child != NIL && self.parent(child) != n {
                return Err(Error::InvariantViolation(format!(
                    "node {} has a stale parent link",
                    self.key(child)
                )));
            }
        }

        let left_height = self.check_subtree(l)?;
        let right_height = self.check_subtree(r)?;
        if left_height != right_height {
            return Err(Error::InvariantViolation(format!(
                "black height differs under node {}: {} vs {}",
                self.key(n),
                left_height,
                right_height
            )));
        }
        Ok(left_height + usize::from(self.color(n) == Color::Black))
    }
}

impl Default for CatalogIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// In-order iterator over a [`CatalogIndex`], driven by an explicit stack
pub struct Iter<'a> {
    index: &'a CatalogIndex,
    stack: Vec<usize>,
}

impl<'a> Iter<'a> {
    fn new(index: &'a CatalogIndex) -> Self {
        let mut iter = Self {
            index,
            stack: Vec::new(),
        };
        iter.push_left_spine(index.root);
        iter
    }

    fn push_left_spine(&mut self, mut n: usize) {
        while n != NIL {
            self.stack.push(n);
            n = self.index.left(n);
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.stack.pop()?;
        self.push_left_spine(self.index.right(n));
        Some(&self.index.nodes[n].item)
    }
}

impl<'a> IntoIterator for &'a CatalogIndex {
    type Item = &'a Item;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
