#![deny(missing_docs)]

//! Implementation of [Dancing Links](https://en.wikipedia.org/wiki/Dancing_Links)
//! and [Algorithm X](https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X) for solving
//! [exact cover](https://en.wikipedia.org/wiki/Exact_cover) problems with
//! optional and colored items.
//!
//! A problem is described by registering *options* with a [`Solver`]. The
//! solver asks a [`Provider`] for the *items* each option covers. A solution
//! is a list of options that covers every primary item exactly once, covers
//! every secondary item at most once, and agrees on the color of every
//! colored secondary item it covers.
//!
//! ```
//! use dancing_xcc::Solver;
//!
//! fn items(option: &char) -> Vec<u8> {
//!     match option {
//!         'A' => vec![0, 3, 6],
//!         'B' => vec![0, 3],
//!         'C' => vec![3, 4, 6],
//!         'D' => vec![2, 4, 5],
//!         'E' => vec![1, 2, 5, 6],
//!         _ => vec![1, 6],
//!     }
//! }
//!
//! let mut solver = Solver::new(items);
//! solver.add_options("ABCDEF".chars())?;
//!
//! assert_eq!(solver.all_solutions()?, vec![vec!['B', 'D', 'F']]);
//! # Ok::<(), dancing_xcc::Error>(())
//! ```

mod error;
pub(crate) mod grid;
pub mod item;
pub mod packed_grid;
pub(crate) mod solver;
pub mod sparse_grid;
pub mod trace;

pub use error::{Error, StateError};
pub use grid::Grid;
pub use item::{Constraint, Item, Kind, Provider};
pub use packed_grid::PackedGrid;
pub use solver::Solver;
pub use sparse_grid::SparseGrid;
pub use trace::{ProgressReporter, Trace};
