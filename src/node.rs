/// Handle to the sentinel node. Every map keeps its own sentinel in the
/// first arena slot.
pub(crate) const NIL: usize = 0;

/// Node corresponds to a single entry in the tree. Links are handles
/// into the owning tree's arena, absent links point to [`NIL`].
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) entry: Option<(K, V)>, // None for sentinel and freed slots.
    pub(crate) black: bool,           // store: black or red
    pub(crate) parent: usize,
    pub(crate) left: usize,
    pub(crate) right: usize,
}

impl<K, V> Node<K, V> {
    pub(crate) fn sentinel() -> Node<K, V> {
        Node {
            entry: None,
            black: true,
            parent: NIL,
            left: NIL,
            right: NIL,
        }
    }

    // new nodes are always red, fixup decides their final color.
    pub(crate) fn new(key: K, value: V, parent: usize) -> Node<K, V> {
        Node {
            entry: Some((key, value)),
            black: false,
            parent,
            left: NIL,
            right: NIL,
        }
    }

    #[inline]
    pub(crate) fn set_red(&mut self) {
        self.black = false
    }

    #[inline]
    pub(crate) fn set_black(&mut self) {
        self.black = true
    }

    #[inline]
    pub(crate) fn is_black(&self) -> bool {
        self.black
    }
}
