//! Errors reported while registering options and searching for covers.

use std::convert::Infallible;
use thiserror::Error;

/// An operation was attempted in a lifecycle state that does not allow it.
///
/// A state error is always raised before the matrix is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    /// A previous search was interrupted by a callback failure and the matrix
    /// was left partially covered. The solver has to be recreated.
    #[error("solver is poisoned by an interrupted search")]
    Poisoned,
    /// A search is running on this solver. Searches borrow the solver
    /// mutably, so this cannot be observed through the safe API.
    #[error("a search is already in progress")]
    Searching,
    /// The matrix was built by the first search and no longer accepts
    /// options.
    #[error("matrix is sealed and cannot accept new options")]
    Sealed,
}

/// Errors returned by [`Solver`](crate::Solver) operations.
///
/// The type parameter is the error type of the solution callback given to
/// [`Solver::search`](crate::Solver::search). Operations that never run a
/// callback use the default, [`Infallible`].
#[derive(Debug, Error)]
pub enum Error<E = Infallible> {
    /// The operation is not valid in the current lifecycle state.
    #[error(transparent)]
    State(#[from] StateError),
    /// The provider returned the same item twice for one option.
    #[error("option #{option} lists item [{item}] more than once")]
    DuplicateItem {
        /// Registration index of the offending option.
        option: usize,
        /// Debug rendering of the repeated item.
        item: String,
    },
    /// A pre-selected option covers an item that no registered option
    /// covers, so there is no column to hide.
    #[error("pre-selected item [{0}] is not in the matrix")]
    UnknownItem(String),
    /// The solution callback failed. The solver is poisoned.
    #[error("solution callback failed: {0}")]
    Callback(E),
}

impl<E> Error<E> {
    /// Return true if this error poisoned the solver that raised it.
    pub fn is_poisoning(&self) -> bool {
        matches!(self, Error::Callback(_))
    }
}

impl Error<Infallible> {
    /// Widen an error raised without a callback into one carrying callback
    /// errors of type `E`.
    pub fn widen<E>(self) -> Error<E> {
        match self {
            Error::State(state) => Error::State(state),
            Error::DuplicateItem { option, item } => Error::DuplicateItem { option, item },
            Error::UnknownItem(item) => Error::UnknownItem(item),
            Error::Callback(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_errors_are_transparent() {
        let err: Error = StateError::Sealed.into();

        assert_eq!(
            err.to_string(),
            "matrix is sealed and cannot accept new options"
        );
        assert!(!err.is_poisoning());
    }

    #[test]
    fn widen_keeps_variant() {
        let err: Error<String> = Error::UnknownItem("7".into()).widen();

        assert!(matches!(err, Error::UnknownItem(ref item) if item == "7"));
        assert_eq!(err.to_string(), "pre-selected item [7] is not in the matrix");
    }

    #[test]
    fn callback_errors_poison() {
        let err: Error<&str> = Error::Callback("interrupted");

        assert!(err.is_poisoning());
        assert_eq!(err.to_string(), "solution callback failed: interrupted");
    }
}
