//! Packed `Grid` implementation, laid out in flat arrays.
//!
//! Rows are staged as they are added and the arrays are built once, by the
//! first call to [`Grid::seal`]. After that the grid refuses new rows.
//!
//! Item `i` (counting from 1) owns position `i` of every array: its ring
//! links, its length and the header node of its column. Row cells follow the
//! headers, and every row is bracketed by spacer nodes. The spacer after a
//! row links up to the first cell of that row, and the spacer before a row
//! links down to its last cell, so a row can be walked in either direction
//! without horizontal links.

use crate::{
    grid::{Grid, Paint},
    item::{Item, Kind},
    StateError,
};
use std::{collections::HashMap, mem, ops::RangeInclusive};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Top {
    Header,
    Cell(usize),
    Spacer,
}

/// Packed grid implementation
#[derive(Debug)]
pub struct PackedGrid<I: Item> {
    staged: Vec<(usize, Vec<I>)>,
    sealed: bool,

    items: Vec<I>,
    lookup: HashMap<I, usize>,
    /// Index of the head of the secondary ring, one past the last item.
    secondary_head: usize,
    llink: Vec<usize>,
    rlink: Vec<usize>,
    len: Vec<usize>,
    /// The color each item's column was purified with, if any.
    colors: Vec<Option<I::Color>>,

    top: Vec<Top>,
    ulink: Vec<usize>,
    dlink: Vec<usize>,
    paint: Vec<Paint<I::Color>>,
    option: Vec<usize>,
}

impl<I: Item> Default for PackedGrid<I> {
    fn default() -> Self {
        PackedGrid {
            staged: Vec::new(),
            sealed: false,
            items: Vec::new(),
            lookup: HashMap::new(),
            secondary_head: 1,
            llink: vec![0, 1],
            rlink: vec![0, 1],
            len: vec![0, 0],
            colors: vec![None, None],
            top: Vec::new(),
            ulink: Vec::new(),
            dlink: Vec::new(),
            paint: Vec::new(),
            option: Vec::new(),
        }
    }
}

impl<I: Item> PackedGrid<I> {
    /// Return the number of columns, primary and secondary.
    pub fn num_columns(&self) -> usize {
        self.items.len()
    }

    /// Return the number of rows waiting to be packed.
    pub fn num_staged(&self) -> usize {
        self.staged.len()
    }

    fn link_ring(&mut self, head: usize, members: RangeInclusive<usize>) {
        let mut previous = head;
        for member in members {
            self.rlink[previous] = member;
            self.llink[member] = previous;
            previous = member;
        }

        self.rlink[previous] = head;
        self.llink[head] = previous;
    }

    fn push_node(&mut self, top: Top, option: usize, paint: Paint<I::Color>) -> usize {
        let index = self.top.len();

        self.top.push(top);
        self.ulink.push(index);
        self.dlink.push(index);
        self.paint.push(paint);
        self.option.push(option);

        index
    }

    fn build(&mut self) {
        let staged = mem::take(&mut self.staged);

        let mut primary = Vec::new();
        let mut secondary = Vec::new();
        for item in staged.iter().flat_map(|(_, items)| items) {
            if self.lookup.contains_key(item) {
                continue;
            }
            self.lookup.insert(item.clone(), 0);

            if item.kind().is_primary() {
                primary.push(item.clone());
            } else {
                secondary.push(item.clone());
            }
        }

        let num_primary = primary.len();
        self.items = primary.into_iter().chain(secondary).collect();
        for (index, item) in self.items.iter().enumerate() {
            self.lookup.insert(item.clone(), index + 1);
        }

        let num_items = self.items.len();
        self.secondary_head = num_items + 1;
        self.llink = vec![0; num_items + 2];
        self.rlink = vec![0; num_items + 2];
        self.len = vec![0; num_items + 2];
        self.colors = vec![None; num_items + 2];
        self.link_ring(0, 1..=num_primary);
        self.link_ring(self.secondary_head, (num_primary + 1)..=num_items);

        for _ in 0..=num_items {
            self.push_node(Top::Header, usize::MAX, Paint::Uncolored);
        }
        let mut spacer = self.push_node(Top::Spacer, usize::MAX, Paint::Uncolored);

        for (option, items) in staged {
            if items.is_empty() {
                continue;
            }

            let first = self.top.len();
            for item in items {
                let column = self.lookup[&item];
                let paint = match item.kind() {
                    Kind::Primary => Paint::Uncolored,
                    Kind::Secondary(color) => Paint::from_color(color),
                };
                let node = self.push_node(Top::Cell(column), option, paint);

                let last = self.ulink[column];
                self.ulink[node] = last;
                self.dlink[last] = node;
                self.dlink[node] = column;
                self.ulink[column] = node;
                self.len[column] += 1;
            }

            self.dlink[spacer] = self.top.len() - 1;
            spacer = self.push_node(Top::Spacer, usize::MAX, Paint::Uncolored);
            self.ulink[spacer] = first;
        }

        log::debug!(
            "Packed {} items ({} primary) into {} nodes.",
            num_items,
            num_primary,
            self.top.len()
        );
    }

    fn column_of(&self, node: usize) -> usize {
        match self.top[node] {
            Top::Cell(column) => column,
            Top::Header => node,
            Top::Spacer => usize::MAX,
        }
    }

    fn unlink_vertical(&mut self, node: usize) {
        let (up, down) = (self.ulink[node], self.dlink[node]);

        self.dlink[up] = down;
        self.ulink[down] = up;
    }

    fn relink_vertical(&mut self, node: usize) {
        let (up, down) = (self.ulink[node], self.dlink[node]);

        self.dlink[up] = node;
        self.ulink[down] = node;
    }

    fn hide(&mut self, row: usize) {
        let mut current = row + 1;
        while current != row {
            match self.top[current] {
                Top::Spacer => current = self.ulink[current],
                Top::Cell(column) => {
                    if !self.paint[current].is_purified() {
                        self.unlink_vertical(current);
                        self.len[column] -= 1;
                    }
                    current += 1;
                }
                Top::Header => unreachable!("row walk reached a column header"),
            }
        }
    }

    fn unhide(&mut self, row: usize) {
        let mut current = row - 1;
        while current != row {
            match self.top[current] {
                Top::Spacer => current = self.dlink[current],
                Top::Cell(column) => {
                    if !self.paint[current].is_purified() {
                        self.len[column] += 1;
                        self.relink_vertical(current);
                    }
                    current -= 1;
                }
                Top::Header => unreachable!("row walk reached a column header"),
            }
        }
    }

    fn purify(&mut self, cell: usize, color: I::Color) {
        let column = self.column_of(cell);

        let mut current = self.dlink[column];
        while current != column {
            if matches!(&self.paint[current], Paint::Colored(other) if *other == color) {
                self.paint[current] = Paint::Purified;
            } else {
                self.hide(current);
            }
            current = self.dlink[current];
        }

        self.colors[column] = Some(color);
    }

    fn unpurify(&mut self, cell: usize) {
        let column = self.column_of(cell);
        let Some(color) = self.colors[column].take() else {
            debug_assert!(false, "unpurify of a column that was never purified");
            return;
        };

        let mut current = self.ulink[column];
        while current != column {
            if self.paint[current].is_purified() {
                self.paint[current] = Paint::Colored(color.clone());
            } else {
                self.unhide(current);
            }
            current = self.ulink[current];
        }
    }

    fn commit(&mut self, cell: usize) {
        let column = self.column_of(cell);

        match &self.paint[cell] {
            Paint::Uncolored => self.cover(column),
            Paint::Colored(color) => {
                let color = color.clone();
                self.purify(cell, color);
            }
            Paint::Purified => {}
        }
    }

    fn uncommit(&mut self, cell: usize) {
        match self.paint[cell] {
            Paint::Uncolored => self.uncover(self.column_of(cell)),
            Paint::Colored(_) => self.unpurify(cell),
            Paint::Purified => {}
        }
    }

    fn ring_len(&self, head: usize) -> Option<usize> {
        let mut count = 0;
        let mut previous = head;
        let mut current = self.rlink[head];
        while current != head {
            if self.llink[current] != previous || count > self.items.len() {
                return None;
            }
            count += 1;
            previous = current;
            current = self.rlink[current];
        }

        (self.llink[head] == previous).then_some(count)
    }
}

impl<I: Item> Grid for PackedGrid<I> {
    type Column = usize;
    type Item = I;
    type Row = usize;

    fn add_row(&mut self, option: usize, items: Vec<I>) -> Result<(), StateError> {
        if self.sealed {
            return Err(StateError::Sealed);
        }

        self.staged.push((option, items));

        Ok(())
    }

    fn seal(&mut self) {
        if !self.sealed {
            self.build();
            self.sealed = true;
        }
    }

    fn is_sealed(&self) -> bool {
        self.sealed
    }

    fn column(&self, item: &I) -> Option<usize> {
        self.lookup.get(item).copied()
    }

    fn first_primary(&self) -> Option<usize> {
        let first = self.rlink[0];

        (first != 0).then_some(first)
    }

    fn next_primary(&self, column: usize) -> Option<usize> {
        let next = self.rlink[column];

        (next != 0).then_some(next)
    }

    fn column_len(&self, column: usize) -> usize {
        self.len[column]
    }

    fn first_row(&self, column: usize) -> Option<usize> {
        let first = self.dlink[column];

        (first != column).then_some(first)
    }

    fn next_row(&self, row: usize) -> Option<usize> {
        let next = self.dlink[row];

        (next != self.column_of(row)).then_some(next)
    }

    fn option(&self, row: usize) -> usize {
        self.option[row]
    }

    fn cover(&mut self, column: usize) {
        let mut current = self.dlink[column];
        while current != column {
            self.hide(current);
            current = self.dlink[current];
        }

        let (left, right) = (self.llink[column], self.rlink[column]);
        self.rlink[left] = right;
        self.llink[right] = left;
    }

    fn uncover(&mut self, column: usize) {
        let (left, right) = (self.llink[column], self.rlink[column]);
        self.rlink[left] = column;
        self.llink[right] = column;

        let mut current = self.ulink[column];
        while current != column {
            self.unhide(current);
            current = self.ulink[current];
        }
    }

    fn commit_row(&mut self, row: usize) {
        let mut current = row + 1;
        while current != row {
            if self.top[current] == Top::Spacer {
                current = self.ulink[current];
            } else {
                self.commit(current);
                current += 1;
            }
        }
    }

    fn uncommit_row(&mut self, row: usize) {
        let mut current = row - 1;
        while current != row {
            if self.top[current] == Top::Spacer {
                current = self.dlink[current];
            } else {
                self.uncommit(current);
                current -= 1;
            }
        }
    }

    fn is_consistent(&self) -> bool {
        let columns_ok = (1..=self.items.len()).all(|column| {
            let mut len = 0;
            let mut previous = column;
            let mut current = self.dlink[column];
            while current != column {
                if self.ulink[current] != previous || self.top[current] != Top::Cell(column) {
                    return false;
                }
                len += 1;
                previous = current;
                current = self.dlink[current];
            }

            self.ulink[column] == previous && self.len[column] == len && self.colors[column].is_none()
        });

        let rings = self
            .ring_len(0)
            .zip(self.ring_len(self.secondary_head))
            .map(|(primary, secondary)| primary + secondary);

        columns_ok && rings == Some(self.items.len())
    }
}
