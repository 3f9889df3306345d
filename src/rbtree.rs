use crate::compare::Compare;
use crate::depth::Depth;
use crate::error::Error;
use crate::node::{Node, NIL};

/// Tree holds the node arena and implements the structural algorithms of
/// a [red-black][rbt] tree. Slot [`NIL`] of the arena is the sentinel,
/// every other slot is either a live node or sitting in the free list.
///
/// [rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub(crate) struct Tree<K, V, C> {
    nodes: Vec<Node<K, V>>,
    free: Vec<usize>, // released slots, reused by insert.
    root: usize,
    cmp: C,
}

// which link of the parent a copied node hangs from.
enum Link {
    Root,
    Left,
    Right,
}

impl<K, V, C> Tree<K, V, C> {
    pub(crate) fn new(cmp: C) -> Tree<K, V, C> {
        Tree {
            nodes: vec![Node::sentinel()],
            free: vec![],
            root: NIL,
            cmp,
        }
    }

    #[inline]
    pub(crate) fn root(&self) -> usize {
        self.root
    }

    #[inline]
    pub(crate) fn left(&self, node: usize) -> usize {
        self.nodes[node].left
    }

    #[inline]
    pub(crate) fn right(&self, node: usize) -> usize {
        self.nodes[node].right
    }

    #[inline]
    fn parent(&self, node: usize) -> usize {
        self.nodes[node].parent
    }

    #[inline]
    pub(crate) fn is_red(&self, node: usize) -> bool {
        !self.nodes[node].is_black()
    }

    /// Return true if `node` is the sentinel or a node holding an entry.
    pub(crate) fn is_live(&self, node: usize) -> bool {
        match self.nodes.get(node) {
            Some(n) => node == NIL || n.entry.is_some(),
            None => false,
        }
    }

    pub(crate) fn entry(&self, node: usize) -> Option<(&K, &V)> {
        let (key, value) = self.nodes.get(node)?.entry.as_ref()?;
        Some((key, value))
    }

    pub(crate) fn entry_mut(&mut self, node: usize) -> Option<(&K, &mut V)> {
        let (key, value) = self.nodes.get_mut(node)?.entry.as_mut()?;
        Some((&*key, value))
    }

    fn key(&self, node: usize) -> &K {
        match &self.nodes[node].entry {
            Some((key, _)) => key,
            None => panic!("key(): keyless node {}, call the programmer", node),
        }
    }

    /// Return the leftmost node under `node`, `node` itself if it has no
    /// left child.
    pub(crate) fn minimum(&self, mut node: usize) -> usize {
        if node == NIL {
            return NIL;
        }
        while self.nodes[node].left != NIL {
            node = self.nodes[node].left;
        }
        node
    }

    /// Return the rightmost node under `node`, `node` itself if it has no
    /// right child.
    pub(crate) fn maximum(&self, mut node: usize) -> usize {
        if node == NIL {
            return NIL;
        }
        while self.nodes[node].right != NIL {
            node = self.nodes[node].right;
        }
        node
    }

    /// Next node in sort order, NIL if `node` is the maximum.
    pub(crate) fn successor(&self, mut node: usize) -> usize {
        if self.nodes[node].right != NIL {
            return self.minimum(self.nodes[node].right);
        }
        let mut up = self.parent(node);
        while up != NIL && node == self.nodes[up].right {
            node = up;
            up = self.parent(up);
        }
        up
    }

    /// Previous node in sort order, NIL if `node` is the minimum. The
    /// predecessor of NIL is the maximum of the whole tree.
    pub(crate) fn predecessor(&self, mut node: usize) -> usize {
        if node == NIL {
            return self.maximum(self.root);
        }
        if self.nodes[node].left != NIL {
            return self.maximum(self.nodes[node].left);
        }
        let mut up = self.parent(node);
        while up != NIL && node == self.nodes[up].left {
            node = up;
            up = self.parent(up);
        }
        up
    }

    /// Drop all entries, only the sentinel survives.
    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[NIL] = Node::sentinel();
        self.free.clear();
        self.root = NIL;
    }

    fn alloc(&mut self, node: Node<K, V>) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, node: usize) -> Option<(K, V)> {
        let entry = self.nodes[node].entry.take();
        self.nodes[node] = Node::sentinel();
        self.free.push(node);
        entry
    }

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //          left       x             node      xr
    //                    / \            /  \
    //                  xl   xr       left   xl
    //
    fn rotate_left(&mut self, node: usize) {
        let x = self.nodes[node].right;
        if x == NIL {
            panic!("rotate_left(): rotating a NIL link ? Call the programmer");
        }
        let xl = self.nodes[x].left;
        self.nodes[node].right = xl;
        if xl != NIL {
            self.nodes[xl].parent = node;
        }
        let up = self.parent(node);
        self.nodes[x].parent = up;
        if up == NIL {
            self.root = x;
        } else if node == self.nodes[up].left {
            self.nodes[up].left = x;
        } else {
            self.nodes[up].right = x;
        }
        self.nodes[x].left = node;
        self.nodes[node].parent = x;
    }

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //           x      right             xl      node
    //          / \                               / \
    //        xl   xr                           xr   right
    //
    fn rotate_right(&mut self, node: usize) {
        let x = self.nodes[node].left;
        if x == NIL {
            panic!("rotate_right(): rotating a NIL link ? Call the programmer");
        }
        let xr = self.nodes[x].right;
        self.nodes[node].left = xr;
        if xr != NIL {
            self.nodes[xr].parent = node;
        }
        let up = self.parent(node);
        self.nodes[x].parent = up;
        if up == NIL {
            self.root = x;
        } else if node == self.nodes[up].right {
            self.nodes[up].right = x;
        } else {
            self.nodes[up].left = x;
        }
        self.nodes[x].right = node;
        self.nodes[node].parent = x;
    }

    fn insert_fixup(&mut self, mut z: usize) {
        while self.is_red(self.parent(z)) {
            let p = self.parent(z);
            let g = self.parent(p);
            if p == self.nodes[g].left {
                let uncle = self.nodes[g].right;
                if self.is_red(uncle) {
                    self.nodes[p].set_black();
                    self.nodes[uncle].set_black();
                    self.nodes[g].set_red();
                    z = g;
                } else {
                    if z == self.nodes[p].right {
                        z = p;
                        self.rotate_left(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.nodes[p].set_black();
                    self.nodes[g].set_red();
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.nodes[g].left;
                if self.is_red(uncle) {
                    self.nodes[p].set_black();
                    self.nodes[uncle].set_black();
                    self.nodes[g].set_red();
                    z = g;
                } else {
                    if z == self.nodes[p].left {
                        z = p;
                        self.rotate_right(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.nodes[p].set_black();
                    self.nodes[g].set_red();
                    self.rotate_left(g);
                }
            }
        }
        let root = self.root;
        self.nodes[root].set_black();
    }

    // hang `v` from u's parent, in u's place. u's own links are untouched.
    fn transplant(&mut self, u: usize, v: usize) {
        let up = self.parent(u);
        if up == NIL {
            self.root = v;
        } else if u == self.nodes[up].left {
            self.nodes[up].left = v;
        } else {
            self.nodes[up].right = v;
        }
        self.nodes[v].parent = up;
    }

    /// Unlink `z` from the tree, rebalance, and return its entry. Only
    /// `z`'s slot is released, every other node keeps its handle.
    pub(crate) fn delete(&mut self, z: usize) -> Option<(K, V)> {
        let (zleft, zright) = (self.nodes[z].left, self.nodes[z].right);
        let mut removed_black = self.nodes[z].is_black();
        let x = if zleft == NIL {
            self.transplant(z, zright);
            zright
        } else if zright == NIL {
            self.transplant(z, zleft);
            zleft
        } else {
            let y = self.minimum(zright);
            removed_black = self.nodes[y].is_black();
            let x = self.nodes[y].right;
            if y != zright {
                self.transplant(y, x);
                self.nodes[y].right = zright;
                self.nodes[zright].parent = y;
            } else {
                // x may be NIL, fixup needs its parent.
                self.nodes[x].parent = y;
            }
            self.transplant(z, y);
            self.nodes[y].left = zleft;
            self.nodes[zleft].parent = y;
            self.nodes[y].black = self.nodes[z].black;
            x
        };
        if removed_black {
            self.delete_fixup(x);
        }
        self.release(z)
    }

    fn delete_fixup(&mut self, mut x: usize) {
        while x != self.root && self.nodes[x].is_black() {
            let p = self.parent(x);
            if x == self.nodes[p].left {
                let mut w = self.nodes[p].right;
                if self.is_red(w) {
                    self.nodes[w].set_black();
                    self.nodes[p].set_red();
                    self.rotate_left(p);
                    w = self.nodes[p].right;
                }
                let (wl, wr) = (self.nodes[w].left, self.nodes[w].right);
                if !self.is_red(wl) && !self.is_red(wr) {
                    self.nodes[w].set_red();
                    x = p;
                } else {
                    if !self.is_red(wr) {
                        self.nodes[wl].set_black();
                        self.nodes[w].set_red();
                        self.rotate_right(w);
                        w = self.nodes[p].right;
                    }
                    self.nodes[w].black = self.nodes[p].black;
                    self.nodes[p].set_black();
                    let wr = self.nodes[w].right;
                    self.nodes[wr].set_black();
                    self.rotate_left(p);
                    x = self.root;
                }
            } else {
                let mut w = self.nodes[p].left;
                if self.is_red(w) {
                    self.nodes[w].set_black();
                    self.nodes[p].set_red();
                    self.rotate_right(p);
                    w = self.nodes[p].left;
                }
                let (wl, wr) = (self.nodes[w].left, self.nodes[w].right);
                if !self.is_red(wl) && !self.is_red(wr) {
                    self.nodes[w].set_red();
                    x = p;
                } else {
                    if !self.is_red(wl) {
                        self.nodes[wr].set_black();
                        self.nodes[w].set_red();
                        self.rotate_left(w);
                        w = self.nodes[p].left;
                    }
                    self.nodes[w].black = self.nodes[p].black;
                    self.nodes[p].set_black();
                    let wl = self.nodes[w].left;
                    self.nodes[wl].set_black();
                    self.rotate_right(p);
                    x = self.root;
                }
            }
        }
        self.nodes[x].set_black();
    }
}

impl<K, V, C> Tree<K, V, C>
where
    C: Compare<K>,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self.cmp.less(a, b)
    }

    /// Return the node holding a key equivalent to `key`, NIL if absent.
    pub(crate) fn search(&self, key: &K) -> usize {
        let mut node = self.root;
        while node != NIL {
            let nkey = self.key(node);
            node = if self.less(key, nkey) {
                self.nodes[node].left
            } else if self.less(nkey, key) {
                self.nodes[node].right
            } else {
                return node;
            };
        }
        NIL
    }

    /// Insert `key` unless an equivalent key is present, `value` is
    /// called only when a node is created. Return the node holding the
    /// key and whether it was created.
    pub(crate) fn insert_with<F>(&mut self, key: K, value: F) -> (usize, bool)
    where
        F: FnOnce() -> V,
    {
        let (mut up, mut node, mut goleft) = (NIL, self.root, false);
        while node != NIL {
            let nkey = self.key(node);
            up = node;
            node = if self.less(&key, nkey) {
                goleft = true;
                self.nodes[node].left
            } else if self.less(nkey, &key) {
                goleft = false;
                self.nodes[node].right
            } else {
                return (node, false);
            };
        }

        let z = self.alloc(Node::new(key, value(), up));
        if up == NIL {
            self.root = z;
        } else if goleft {
            self.nodes[up].left = z;
        } else {
            self.nodes[up].right = z;
        }
        self.insert_fixup(z);
        (z, true)
    }

    /// Check every red-black and search-tree invariant, sample leaf
    /// depths into `depths`. Return (black-height, number of entries).
    pub(crate) fn validate(&self, depths: &mut Depth) -> Result<(usize, usize), Error<K>>
    where
        K: Clone,
    {
        if !self.nodes[NIL].is_black() || self.nodes[NIL].entry.is_some() {
            return Err(Error::BrokenLink("sentinel is modified".to_string()));
        }
        if self.is_red(self.root) {
            return Err(Error::RedRoot);
        }
        if self.root != NIL && self.parent(self.root) != NIL {
            let err = format!("root {} has parent {}", self.root, self.parent(self.root));
            return Err(Error::BrokenLink(err));
        }
        let blacks = self.validate_tree(self.root, false, 0, 0, depths)?;

        // in-order walk catches ordering errors across subtrees.
        let (mut count, mut node) = (0, self.minimum(self.root));
        while node != NIL {
            let next = self.successor(node);
            if next != NIL && !self.less(self.key(node), self.key(next)) {
                let (a, b) = (self.key(node).clone(), self.key(next).clone());
                return Err(Error::SortError(a, b));
            }
            count += 1;
            node = next;
        }
        Ok((blacks, count))
    }

    fn validate_tree(
        &self,
        node: usize,
        fromred: bool,
        mut nb: usize,
        depth: usize,
        depths: &mut Depth,
    ) -> Result<usize, Error<K>>
    where
        K: Clone,
    {
        if node == NIL {
            depths.sample(depth);
            return Ok(nb);
        }

        let red = self.is_red(node);
        if fromred && red {
            return Err(Error::ConsecutiveReds);
        }
        if !red {
            nb += 1;
        }
        let (left, right) = (self.nodes[node].left, self.nodes[node].right);
        for child in [left, right].iter().cloned() {
            if child != NIL && self.parent(child) != node {
                let err = format!("child {} of {} points to {}", child, node, self.parent(child));
                return Err(Error::BrokenLink(err));
            }
        }
        let lblacks = self.validate_tree(left, red, nb, depth + 1, depths)?;
        let rblacks = self.validate_tree(right, red, nb, depth + 1, depths)?;
        if lblacks != rblacks {
            let err = format!("left: {} right: {}", lblacks, rblacks);
            return Err(Error::UnbalancedBlacks(err));
        }
        if left != NIL && !self.less(self.key(left), self.key(node)) {
            let (lkey, parent) = (self.key(left).clone(), self.key(node).clone());
            return Err(Error::SortError(lkey, parent));
        }
        if right != NIL && !self.less(self.key(node), self.key(right)) {
            let (rkey, parent) = (self.key(right).clone(), self.key(node).clone());
            return Err(Error::SortError(rkey, parent));
        }
        Ok(lblacks)
    }
}

/// Deep copy, new arena with the same shape and colors. Free slots of the
/// source are not carried over.
impl<K, V, C> Clone for Tree<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        let mut tree = Tree::new(self.cmp.clone());
        if self.root == NIL {
            return tree;
        }
        tree.nodes.reserve(self.nodes.len() - self.free.len());

        let mut stack = vec![(self.root, NIL, Link::Root)];
        while let Some((src, up, link)) = stack.pop() {
            let snode = &self.nodes[src];
            let dst = tree.nodes.len();
            tree.nodes.push(Node {
                entry: snode.entry.clone(),
                black: snode.black,
                parent: up,
                left: NIL,
                right: NIL,
            });
            match link {
                Link::Root => tree.root = dst,
                Link::Left => tree.nodes[up].left = dst,
                Link::Right => tree.nodes[up].right = dst,
            }
            if snode.right != NIL {
                stack.push((snode.right, dst, Link::Right));
            }
            if snode.left != NIL {
                stack.push((snode.left, dst, Link::Left));
            }
        }
        tree
    }
}
