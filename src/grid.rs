use crate::{item::Item, StateError};
use std::fmt::Debug;

/// A trait that describes a sparse incidence matrix of options against
/// items, which can be permuted in place to search for colored exact covers.
///
/// Every forward operation (`cover`, `commit_row`) has an inverse
/// (`uncover`, `uncommit_row`) that restores the previous state exactly,
/// provided the inverses are applied in the reverse order of the forward
/// operations.
pub trait Grid: Default {
    /// The type of items labelling the columns of the grid.
    type Item: Item;
    /// The type representing a column in the grid.
    type Column: Debug + Copy;
    /// The type representing a cell of a row in the grid.
    type Row: Debug + Copy;

    /// Append a row for the option with the given registration index.
    ///
    /// `items` must be free of duplicates; the caller checks this.
    fn add_row(&mut self, option: usize, items: Vec<Self::Item>) -> Result<(), StateError>;

    /// Make the grid ready for searching. Called at the start of every
    /// search.
    fn seal(&mut self);

    /// Return true if [`Grid::seal`] permanently closed the grid for new
    /// rows.
    fn is_sealed(&self) -> bool;

    /// Return the column labelled by `item`, if any row covers it.
    fn column(&self, item: &Self::Item) -> Option<Self::Column>;

    /// Return the first uncovered primary column.
    fn first_primary(&self) -> Option<Self::Column>;

    /// Return the uncovered primary column following `column` in the
    /// primary ring.
    fn next_primary(&self, column: Self::Column) -> Option<Self::Column>;

    /// Return the number of rows still linked into this column.
    fn column_len(&self, column: Self::Column) -> usize;

    /// Return the topmost row cell still linked into this column.
    fn first_row(&self, column: Self::Column) -> Option<Self::Row>;

    /// Return the row cell linked below `row` in its column.
    fn next_row(&self, row: Self::Row) -> Option<Self::Row>;

    /// Return the registration index of the option owning this row.
    fn option(&self, row: Self::Row) -> usize;

    /// Cover an entire column, and hide every row that appears in it.
    fn cover(&mut self, column: Self::Column);

    /// Undo the matching call to [`Grid::cover`].
    fn uncover(&mut self, column: Self::Column);

    /// Commit every cell of the row other than `row`, left to right.
    ///
    /// Uncolored cells cover their column, colored cells purify it.
    fn commit_row(&mut self, row: Self::Row);

    /// Undo [`Grid::commit_row`] for the same row, right to left.
    fn uncommit_row(&mut self, row: Self::Row);

    /// Return true if every column count matches the cells linked in the
    /// column and every cell is reachable from its neighbours.
    ///
    /// This walks the whole grid and is intended for debug assertions and
    /// tests.
    fn is_consistent(&self) -> bool;
}

/// The color state of one cell of a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Paint<C> {
    /// A primary item, or a secondary item without a color.
    Uncolored,
    /// A secondary item with a color.
    Colored(C),
    /// The column was purified with this cell's color. The cell stays linked
    /// while its row is hidden and is skipped when its row is committed.
    Purified,
}

impl<C> Paint<C> {
    pub(crate) fn from_color(color: Option<C>) -> Self {
        match color {
            Some(color) => Paint::Colored(color),
            None => Paint::Uncolored,
        }
    }

    pub(crate) fn is_purified(&self) -> bool {
        matches!(self, Paint::Purified)
    }
}
