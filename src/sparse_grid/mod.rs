//! Sparse, incrementally built `Grid` implementation.
//!
//! Every cell is a node in an arena, linked to its row and column neighbors
//! by arena position. Rows can be added at any time the solver is idle: a
//! new row is woven into the existing columns in time proportional to its
//! length.

mod base_node;

use self::base_node::{iter, BaseNode};
use crate::{
    grid::{Grid, Paint},
    item::{Item, Kind},
    StateError,
};
use std::collections::HashMap;

/// Head of the ring of uncovered primary columns.
const PRIMARY_HEAD: usize = 0;
/// Head of the ring of uncovered secondary columns. The search never looks
/// at this ring, so secondary columns never block a solution.
const SECONDARY_HEAD: usize = 1;
/// Marker for nodes that do not belong to any column.
const NO_COLUMN: usize = usize::MAX;

/// Sparse grid implementation
#[derive(Debug)]
pub struct SparseGrid<I: Item> {
    /// Links of all nodes: the two ring heads, column headers and row cells.
    nodes: Vec<BaseNode>,
    /// Payload of each node, indexed like `nodes`.
    cells: Vec<Cell<I::Color>>,
    columns: Vec<Column<I>>,
    lookup: HashMap<I, usize>,
}

#[derive(Debug)]
struct Cell<C> {
    /// The column this cell (or column header) belongs to.
    column: usize,
    /// Registration index of the option owning the cell.
    option: usize,
    paint: Paint<C>,
}

#[derive(Debug)]
struct Column<I: Item> {
    item: I,
    /// Position of the column header in the node arena.
    head: usize,
    len: usize,
    /// The color this column was purified with, if any.
    color: Option<I::Color>,
}

impl<I: Item> Default for SparseGrid<I> {
    fn default() -> Self {
        let heads = [PRIMARY_HEAD, SECONDARY_HEAD];

        SparseGrid {
            nodes: heads.iter().copied().map(BaseNode::self_linked).collect(),
            cells: heads
                .iter()
                .map(|_| Cell {
                    column: NO_COLUMN,
                    option: usize::MAX,
                    paint: Paint::Uncolored,
                })
                .collect(),
            columns: Vec::new(),
            lookup: HashMap::new(),
        }
    }
}

impl<I: Item> SparseGrid<I> {
    /// Return the number of columns, primary and secondary.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    fn push_node(&mut self, column: usize, option: usize, paint: Paint<I::Color>) -> usize {
        let index = self.nodes.len();

        self.nodes.push(BaseNode::self_linked(index));
        self.cells.push(Cell {
            column,
            option,
            paint,
        });

        index
    }

    fn get_or_create_column(&mut self, item: &I) -> usize {
        if let Some(&column) = self.lookup.get(item) {
            return column;
        }

        let column = self.columns.len();
        let head = self.push_node(column, usize::MAX, Paint::Uncolored);
        let ring = if item.kind().is_primary() {
            PRIMARY_HEAD
        } else {
            SECONDARY_HEAD
        };
        BaseNode::insert_left(&mut self.nodes, ring, head);

        log::trace!("Created column [{}] for item [{:?}].", column, item);

        self.columns.push(Column {
            item: item.clone(),
            head,
            len: 0,
            color: None,
        });
        self.lookup.insert(item.clone(), column);

        column
    }

    fn column_at(&self, head: usize, ring: usize) -> Option<usize> {
        (head != ring).then(|| self.cells[head].column)
    }

    /// Unlink every other cell of the row from its column.
    fn hide(&mut self, row: usize) {
        let mut current = self.nodes[row].right;
        while current != row {
            let cell = &self.cells[current];
            if !cell.paint.is_purified() {
                let column = cell.column;
                BaseNode::cover_vertical(&mut self.nodes, current);
                self.columns[column].len -= 1;
            }

            current = self.nodes[current].right;
        }
    }

    /// Reverse of `hide`.
    fn unhide(&mut self, row: usize) {
        let mut current = self.nodes[row].left;
        while current != row {
            let cell = &self.cells[current];
            if !cell.paint.is_purified() {
                let column = cell.column;
                self.columns[column].len += 1;
                BaseNode::uncover_vertical(&mut self.nodes, current);
            }

            current = self.nodes[current].left;
        }
    }

    /// Restrict the column of `cell` to rows agreeing with the color of
    /// `cell`. Agreeing cells are marked purified, the others are hidden.
    fn purify(&mut self, cell: usize, color: I::Color) {
        let column = self.cells[cell].column;
        let head = self.columns[column].head;

        let mut current = self.nodes[head].down;
        while current != head {
            if matches!(&self.cells[current].paint, Paint::Colored(other) if *other == color) {
                self.cells[current].paint = Paint::Purified;
            } else {
                self.hide(current);
            }

            current = self.nodes[current].down;
        }

        self.columns[column].color = Some(color);
    }

    /// Reverse of `purify`.
    fn unpurify(&mut self, cell: usize) {
        let column = self.cells[cell].column;
        let head = self.columns[column].head;
        let Some(color) = self.columns[column].color.take() else {
            debug_assert!(false, "unpurify of a column that was never purified");
            return;
        };

        let mut current = self.nodes[head].up;
        while current != head {
            if self.cells[current].paint.is_purified() {
                self.cells[current].paint = Paint::Colored(color.clone());
            } else {
                self.unhide(current);
            }

            current = self.nodes[current].up;
        }
    }

    fn commit(&mut self, cell: usize) {
        let column = self.cells[cell].column;

        match &self.cells[cell].paint {
            Paint::Uncolored => self.cover(column),
            Paint::Colored(color) => {
                let color = color.clone();
                self.purify(cell, color);
            }
            Paint::Purified => {}
        }
    }

    fn uncommit(&mut self, cell: usize) {
        let column = self.cells[cell].column;

        match self.cells[cell].paint {
            Paint::Uncolored => self.uncover(column),
            Paint::Colored(_) => self.unpurify(cell),
            Paint::Purified => {}
        }
    }

    /// Return the number of columns in the ring, or `None` if its links are
    /// not symmetric.
    fn ring_len(&self, ring: usize) -> Option<usize> {
        let mut count = 0;
        let mut previous = ring;
        for head in iter::right(&self.nodes, ring) {
            if self.nodes[head].left != previous || count > self.columns.len() {
                return None;
            }
            previous = head;
            count += 1;
        }

        (self.nodes[ring].left == previous).then_some(count)
    }
}

impl<I: Item> Grid for SparseGrid<I> {
    type Column = usize;
    type Item = I;
    type Row = usize;

    fn add_row(&mut self, option: usize, items: Vec<I>) -> Result<(), StateError> {
        let mut first: Option<usize> = None;

        for item in items {
            let column = self.get_or_create_column(&item);
            let paint = match item.kind() {
                Kind::Primary => Paint::Uncolored,
                Kind::Secondary(color) => Paint::from_color(color),
            };
            let index = self.push_node(column, option, paint);

            BaseNode::insert_above(&mut self.nodes, self.columns[column].head, index);
            self.columns[column].len += 1;

            match first {
                Some(first) => BaseNode::insert_left(&mut self.nodes, first, index),
                None => first = Some(index),
            }
        }

        Ok(())
    }

    fn seal(&mut self) {}

    fn is_sealed(&self) -> bool {
        false
    }

    fn column(&self, item: &I) -> Option<usize> {
        self.lookup.get(item).copied()
    }

    fn first_primary(&self) -> Option<usize> {
        self.column_at(self.nodes[PRIMARY_HEAD].right, PRIMARY_HEAD)
    }

    fn next_primary(&self, column: usize) -> Option<usize> {
        let head = self.columns[column].head;

        self.column_at(self.nodes[head].right, PRIMARY_HEAD)
    }

    fn column_len(&self, column: usize) -> usize {
        self.columns[column].len
    }

    fn first_row(&self, column: usize) -> Option<usize> {
        let head = self.columns[column].head;
        let down = self.nodes[head].down;

        (down != head).then_some(down)
    }

    fn next_row(&self, row: usize) -> Option<usize> {
        let head = self.columns[self.cells[row].column].head;
        let down = self.nodes[row].down;

        (down != head).then_some(down)
    }

    fn option(&self, row: usize) -> usize {
        self.cells[row].option
    }

    fn cover(&mut self, column: usize) {
        let head = self.columns[column].head;

        let mut current = self.nodes[head].down;
        while current != head {
            self.hide(current);
            current = self.nodes[current].down;
        }

        BaseNode::cover_horizontal(&mut self.nodes, head);
    }

    fn uncover(&mut self, column: usize) {
        let head = self.columns[column].head;

        BaseNode::uncover_horizontal(&mut self.nodes, head);

        let mut current = self.nodes[head].up;
        while current != head {
            self.unhide(current);
            current = self.nodes[current].up;
        }
    }

    fn commit_row(&mut self, row: usize) {
        let mut current = self.nodes[row].right;
        while current != row {
            self.commit(current);
            current = self.nodes[current].right;
        }
    }

    fn uncommit_row(&mut self, row: usize) {
        let mut current = self.nodes[row].left;
        while current != row {
            self.uncommit(current);
            current = self.nodes[current].left;
        }
    }

    fn is_consistent(&self) -> bool {
        let columns_ok = self.columns.iter().enumerate().all(|(index, column)| {
            let mut previous = column.head;
            let mut len = 0;
            for cell in iter::down(&self.nodes, column.head) {
                if self.nodes[cell].up != previous || self.cells[cell].column != index {
                    return false;
                }
                previous = cell;
                len += 1;
            }

            self.lookup.get(&column.item) == Some(&index)
                && column.color.is_none()
                && self.nodes[column.head].up == previous
                && len == column.len
        });

        let linked = self
            .ring_len(PRIMARY_HEAD)
            .zip(self.ring_len(SECONDARY_HEAD))
            .map(|(primary, secondary)| primary + secondary);

        columns_ok && linked == Some(self.columns.len())
    }
}
