//! Observation points of the search.
//!
//! A [`Trace`] installed with [`Solver::set_trace`](crate::Solver::set_trace)
//! is told when a search starts, when the search enters and leaves a level of
//! recursion, and when it tries a row. [`ProgressReporter`] uses these events
//! to estimate how much of the search tree has been explored.

use std::{cell::RefCell, fmt, rc::Rc};

/// Observer of search events. Every method defaults to doing nothing.
pub trait Trace {
    /// Called once at the start of every search, after the pre-selected
    /// options have been applied.
    fn on_search_started(&mut self) {}

    /// Called when the search branches on a column with `len` live rows.
    fn on_recursion_entered(&mut self, _len: usize) {}

    /// Called before a row of the current column is committed.
    fn on_row_selected(&mut self) {}

    /// Called when all rows of the current column have been tried.
    fn on_recursion_ended(&mut self) {}
}

impl<T: Trace + ?Sized> Trace for Box<T> {
    fn on_search_started(&mut self) {
        (**self).on_search_started()
    }

    fn on_recursion_entered(&mut self, len: usize) {
        (**self).on_recursion_entered(len)
    }

    fn on_row_selected(&mut self) {
        (**self).on_row_selected()
    }

    fn on_recursion_ended(&mut self) {
        (**self).on_recursion_ended()
    }
}

/// Shared handle, so the caller can inspect a trace after handing it to a
/// solver.
impl<T: Trace + ?Sized> Trace for Rc<RefCell<T>> {
    fn on_search_started(&mut self) {
        self.borrow_mut().on_search_started()
    }

    fn on_recursion_entered(&mut self, len: usize) {
        self.borrow_mut().on_recursion_entered(len)
    }

    fn on_row_selected(&mut self) {
        self.borrow_mut().on_row_selected()
    }

    fn on_recursion_ended(&mut self) {
        self.borrow_mut().on_recursion_ended()
    }
}

/// Progress record for one level of recursion.
#[derive(Debug, Clone, Copy)]
struct Level {
    /// Product of the live row counts of this level and all enclosing ones.
    product: f64,
    /// Progress when the level was entered.
    initial: f64,
    current: f64,
    /// Index of the next row to be tried on this level.
    row: usize,
}

impl Level {
    const ROOT: Level = Level {
        product: 1.0,
        initial: 0.0,
        current: 0.0,
        row: 0,
    };

    fn nested(&self, len: usize) -> Self {
        Level {
            product: self.product * len as f64,
            initial: self.current,
            current: self.current,
            row: 0,
        }
    }

    fn next_row(&mut self) {
        self.current = self.initial + self.row as f64 / self.product;
        self.row += 1;
    }
}

/// Estimates the fraction of the search tree explored so far.
///
/// Each level of recursion splits the remaining share of the tree evenly
/// between the rows of its column, so the estimate is most accurate when
/// the subtrees below each row are of similar size.
pub struct ProgressReporter {
    interval: u64,
    report: Box<dyn FnMut(u64, f64)>,
    stack: Vec<Level>,
    level: Option<Level>,
    items_tried: u64,
}

impl ProgressReporter {
    /// Create a reporter that calls `report` with the number of rows tried
    /// and the current estimate every `interval` rows.
    ///
    /// An interval of zero never reports.
    pub fn new(interval: u64, report: impl FnMut(u64, f64) + 'static) -> Self {
        ProgressReporter {
            interval,
            report: Box::new(report),
            stack: Vec::new(),
            level: None,
            items_tried: 0,
        }
    }

    /// Create a reporter that logs the estimate every `interval` rows.
    pub fn logging(interval: u64) -> Self {
        Self::new(interval, |tried, progress| {
            log::info!("Progress {}cu {:.5}", tried, progress);
        })
    }

    /// Return the estimated fraction of the search tree explored, or NaN if
    /// no search has started.
    pub fn progress(&self) -> f64 {
        match &self.level {
            Some(level) => level.current + 0.5 / level.product,
            None => f64::NAN,
        }
    }

    /// Return the number of rows tried since the reporter was created.
    pub fn items_tried(&self) -> u64 {
        self.items_tried
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("interval", &self.interval)
            .field("depth", &self.stack.len())
            .field("items_tried", &self.items_tried)
            .field("progress", &self.progress())
            .finish()
    }
}

impl Trace for ProgressReporter {
    fn on_search_started(&mut self) {
        self.stack.clear();
        self.level = Some(Level::ROOT);
    }

    fn on_recursion_entered(&mut self, len: usize) {
        let parent = self.level.unwrap_or(Level::ROOT);

        self.stack.push(parent);
        self.level = Some(parent.nested(len));
    }

    fn on_row_selected(&mut self) {
        if let Some(level) = &mut self.level {
            level.next_row();
        }

        self.items_tried += 1;
        if self.interval != 0 && self.items_tried % self.interval == 0 {
            let progress = self.progress();
            (self.report)(self.items_tried, progress);
        }
    }

    fn on_recursion_ended(&mut self) {
        if let Some(parent) = self.stack.pop() {
            self.level = Some(parent);
        }
    }
}
