/// The four links of a node in a toroidal grid, stored as positions in the
/// node arena.
#[derive(Debug, PartialEq, Hash, Clone, Copy, Eq)]
pub struct BaseNode {
    pub left: usize,
    pub right: usize,
    pub up: usize,
    pub down: usize,
}

impl BaseNode {
    /// Create a node at position `index` whose links all point back at
    /// itself.
    pub fn self_linked(index: usize) -> Self {
        BaseNode {
            left: index,
            right: index,
            up: index,
            down: index,
        }
    }
}

// NOTE: The [un]cover functions never modify the links of the node being
// removed, only the links of its neighbors pointing at it. Those untouched
// links are what allow the node to be put back in place later.
impl BaseNode {
    pub fn cover_horizontal(nodes: &mut [BaseNode], index: usize) {
        let BaseNode { left, right, .. } = nodes[index];

        nodes[left].right = right;
        nodes[right].left = left;
    }

    pub fn cover_vertical(nodes: &mut [BaseNode], index: usize) {
        let BaseNode { up, down, .. } = nodes[index];

        nodes[up].down = down;
        nodes[down].up = up;
    }

    pub fn uncover_horizontal(nodes: &mut [BaseNode], index: usize) {
        let BaseNode { left, right, .. } = nodes[index];

        nodes[left].right = index;
        nodes[right].left = index;
    }

    pub fn uncover_vertical(nodes: &mut [BaseNode], index: usize) {
        let BaseNode { up, down, .. } = nodes[index];

        nodes[up].down = index;
        nodes[down].up = index;
    }
}

macro_rules! add_direction {
    ($name:ident, $direction:ident, $opposite:ident) => {
        pub fn $name(nodes: &mut [BaseNode], index: usize, neighbor: usize) {
            nodes[index].$direction = neighbor;
            nodes[neighbor].$opposite = index;
        }
    };
}

impl BaseNode {
    add_direction!(add_below, down, up);

    add_direction!(add_right, right, left);

    /// Insert `index` into the vertical list of `head`, directly above it
    /// (that is, at the bottom of the column).
    pub fn insert_above(nodes: &mut [BaseNode], head: usize, index: usize) {
        let up = nodes[head].up;

        Self::add_below(nodes, up, index);
        Self::add_below(nodes, index, head);
    }

    /// Insert `index` into the horizontal list of `head`, directly left of
    /// it (that is, at the end of the ring).
    pub fn insert_left(nodes: &mut [BaseNode], head: usize, index: usize) {
        let left = nodes[head].left;

        Self::add_right(nodes, left, index);
        Self::add_right(nodes, index, head);
    }
}

pub mod iter {
    use super::BaseNode;

    /// Walk the list starting after `original` in the given direction,
    /// stopping before it comes back around to `original`.
    pub fn walk(
        nodes: &[BaseNode],
        original: usize,
        direction: fn(&BaseNode) -> usize,
    ) -> BaseNodeIterator<'_> {
        BaseNodeIterator {
            nodes,
            original,
            current: original,
            direction,
        }
    }

    pub fn down(nodes: &[BaseNode], original: usize) -> BaseNodeIterator<'_> {
        walk(nodes, original, |node| node.down)
    }

    pub fn right(nodes: &[BaseNode], original: usize) -> BaseNodeIterator<'_> {
        walk(nodes, original, |node| node.right)
    }

    #[derive(Debug)]
    pub struct BaseNodeIterator<'n> {
        nodes: &'n [BaseNode],
        original: usize,
        current: usize,
        direction: fn(&BaseNode) -> usize,
    }

    impl Iterator for BaseNodeIterator<'_> {
        type Item = usize;

        fn next(&mut self) -> Option<Self::Item> {
            let next = (self.direction)(&self.nodes[self.current]);

            if next == self.original {
                None
            } else {
                self.current = next;

                Some(next)
            }
        }
    }
}
