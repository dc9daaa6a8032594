use crate::{
    grid::Grid,
    item::Provider,
    packed_grid::PackedGrid,
    sparse_grid::SparseGrid,
    trace::Trace,
    Error, StateError,
};
use core::{convert::Infallible, fmt, iter};
use std::collections::HashSet;

/// Solver that searches a set of registered options for exact covers with
/// colors.
///
/// Options are registered one by one with [`Solver::add_option`]. The
/// provider given at construction tells the solver which items each option
/// covers. Every search reports each solution, in order, to a callback and
/// leaves the solver ready for the next search.
///
/// If a callback fails or panics in the middle of a search, the matrix is
/// left partially covered. The solver is then poisoned and every later call
/// fails with [`StateError::Poisoned`].
pub struct Solver<O, P, G>
where
    P: Provider<O>,
    G: Grid<Item = P::Item>,
{
    provider: P,
    options: Vec<O>,

    grid: G,
    state: State,
    trace: Option<Box<dyn Trace>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Clean,
    Searching,
    Poisoned,
}

impl State {
    fn ensure_clean(self) -> Result<(), StateError> {
        match self {
            State::Clean => Ok(()),
            State::Searching => Err(StateError::Searching),
            State::Poisoned => Err(StateError::Poisoned),
        }
    }
}

/// Poisons the solver unless the search is finished explicitly. Dropping the
/// guard on an early return or while unwinding leaves the solver poisoned.
struct SearchGuard<'s> {
    state: &'s mut State,
}

impl<'s> SearchGuard<'s> {
    fn enter(state: &'s mut State) -> Self {
        *state = State::Searching;

        SearchGuard { state }
    }

    fn finish(self) {
        *self.state = State::Clean;
    }
}

impl Drop for SearchGuard<'_> {
    fn drop(&mut self) {
        if *self.state == State::Searching {
            *self.state = State::Poisoned;
            log::warn!("Search was interrupted, the solver is now poisoned.");
        }
    }
}

impl<O, P> Solver<O, P, SparseGrid<P::Item>>
where
    P: Provider<O>,
{
    /// Create a new `Solver` with an open matrix, which accepts new options
    /// between searches.
    pub fn new(provider: P) -> Self {
        Self::with_grid(provider)
    }
}

impl<O, P> Solver<O, P, PackedGrid<P::Item>>
where
    P: Provider<O>,
{
    /// Create a new `Solver` with a packed matrix, which is built by the first
    /// search and refuses new options afterwards.
    pub fn sealed(provider: P) -> Self {
        Self::with_grid(provider)
    }
}

impl<O, P, G> Solver<O, P, G>
where
    P: Provider<O>,
    G: Grid<Item = P::Item>,
{
    /// Create a new `Solver` using an empty grid of type `G`.
    pub fn with_grid(provider: P) -> Self {
        Solver {
            provider,
            options: Vec::new(),

            grid: G::default(),
            state: State::Clean,
            trace: None,
        }
    }

    /// Register an option.
    ///
    /// The provider is asked for the items of the option right away. An
    /// option listing the same item twice is rejected.
    pub fn add_option(&mut self, option: O) -> Result<(), Error> {
        self.state.ensure_clean()?;
        if self.grid.is_sealed() {
            return Err(StateError::Sealed.into());
        }

        let index = self.options.len();
        let items = self.provider.items(&option);

        let duplicate = {
            let mut seen = HashSet::with_capacity(items.len());
            items
                .iter()
                .find(|item| !seen.insert(*item))
                .map(|item| format!("{:?}", item))
        };
        if let Some(item) = duplicate {
            return Err(Error::DuplicateItem {
                option: index,
                item,
            });
        }

        self.grid.add_row(index, items)?;
        self.options.push(option);

        Ok(())
    }

    /// Register every option of the iterator, stopping at the first error.
    pub fn add_options(&mut self, options: impl IntoIterator<Item = O>) -> Result<(), Error> {
        options
            .into_iter()
            .try_for_each(|option| self.add_option(option))
    }

    /// Return the registered options, in registration order.
    pub fn options(&self) -> &[O] {
        &self.options
    }

    /// Return the number of registered options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Return true if no option has been registered.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Return true if the matrix was sealed and accepts no more options.
    pub fn is_sealed(&self) -> bool {
        self.grid.is_sealed()
    }

    /// Return true if an interrupted search left the solver unusable.
    pub fn is_poisoned(&self) -> bool {
        self.state == State::Poisoned
    }

    /// Install an observer for the events of subsequent searches, replacing
    /// any previous one.
    pub fn set_trace(&mut self, trace: impl Trace + 'static) {
        self.trace = Some(Box::new(trace));
    }

    /// Remove the observer installed with [`Solver::set_trace`].
    pub fn clear_trace(&mut self) {
        self.trace = None;
    }

    /// Search for every solution, passing each one to `on_solution`.
    ///
    /// Returning an error from `on_solution` aborts the search, poisons the
    /// solver and hands the error back wrapped in [`Error::Callback`].
    pub fn search<F, E>(&mut self, on_solution: F) -> Result<(), Error<E>>
    where
        F: FnMut(&[&O]) -> Result<(), E>,
    {
        self.search_with(on_solution, &[], || false)
    }

    /// Search for every solution that extends `pre_selected`.
    ///
    /// Each solution starts with the pre-selected options, in the given
    /// order. `cancel` is polled before every branching step; once it returns
    /// true the search unwinds without reporting further solutions, and the
    /// solver stays usable.
    pub fn search_with<F, E, C>(
        &mut self,
        on_solution: F,
        pre_selected: &[O],
        cancel: C,
    ) -> Result<(), Error<E>>
    where
        F: FnMut(&[&O]) -> Result<(), E>,
        C: FnMut() -> bool,
    {
        self.state.ensure_clean()?;

        self.grid.seal();
        let columns = self.pre_selected_columns(pre_selected).map_err(Error::widen)?;

        log::debug!(
            "Starting search over {} options with {} pre-selected.",
            self.options.len(),
            pre_selected.len()
        );

        let Solver {
            options,
            grid,
            state,
            trace,
            ..
        } = self;

        for column in &columns {
            grid.cover(*column);
        }

        let guard = SearchGuard::enter(state);
        if let Some(trace) = trace.as_mut() {
            trace.on_search_started();
        }

        let mut search = Search {
            grid: &mut *grid,
            options,
            solution: pre_selected.iter().collect(),
            trace: trace.as_mut(),
            on_solution,
            cancel,
            solutions: 0,
        };
        let result = search.descend();
        let solutions = search.solutions;
        drop(search);
        result.map_err(Error::Callback)?;

        for column in columns.iter().rev() {
            grid.uncover(*column);
        }
        debug_assert!(grid.is_consistent(), "search did not restore the grid");
        guard.finish();

        log::debug!("Search finished with {} solutions.", solutions);

        Ok(())
    }

    /// Return all possible solutions.
    pub fn all_solutions(&mut self) -> Result<Vec<Vec<O>>, Error>
    where
        O: Clone,
    {
        let mut solutions: Vec<Vec<O>> = Vec::new();

        self.search(|solution| {
            solutions.push(solution.iter().map(|option| (*option).clone()).collect());
            Ok::<_, Infallible>(())
        })?;

        Ok(solutions)
    }

    /// Return the columns of the items covered by `pre_selected`, without
    /// repetition, in the order they are first encountered.
    fn pre_selected_columns(&self, pre_selected: &[O]) -> Result<Vec<G::Column>, Error> {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();

        for item in pre_selected
            .iter()
            .flat_map(|option| self.provider.items(option))
        {
            if seen.contains(&item) {
                continue;
            }

            let column = self
                .grid
                .column(&item)
                .ok_or_else(|| Error::UnknownItem(format!("{:?}", item)))?;
            columns.push(column);
            seen.insert(item);
        }

        Ok(columns)
    }
}

impl<O, P, G> fmt::Debug for Solver<O, P, G>
where
    P: Provider<O>,
    G: Grid<Item = P::Item>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solver")
            .field("options", &self.options.len())
            .field("state", &self.state)
            .field("sealed", &self.grid.is_sealed())
            .field("traced", &self.trace.is_some())
            .finish()
    }
}

/// State shared by every level of one search.
struct Search<'a, O, G, F, C> {
    grid: &'a mut G,
    options: &'a [O],
    solution: Vec<&'a O>,
    trace: Option<&'a mut Box<dyn Trace>>,
    on_solution: F,
    cancel: C,
    solutions: usize,
}

impl<'a, O, G, F, C, E> Search<'a, O, G, F, C>
where
    G: Grid,
    F: FnMut(&[&O]) -> Result<(), E>,
    C: FnMut() -> bool,
{
    fn descend(&mut self) -> Result<(), E> {
        if (self.cancel)() {
            return Ok(());
        }

        let column = match self.choose_column() {
            Some(column) => column,
            None => {
                self.solutions += 1;
                log::trace!("Found solution #{}.", self.solutions);

                return (self.on_solution)(&self.solution);
            }
        };

        if let Some(trace) = self.trace.as_mut() {
            trace.on_recursion_entered(self.grid.column_len(column));
        }

        self.grid.cover(column);

        let options: &'a [O] = self.options;
        let mut cursor = self.grid.first_row(column);
        while let Some(row) = cursor {
            if let Some(trace) = self.trace.as_mut() {
                trace.on_row_selected();
            }

            self.grid.commit_row(row);
            self.solution.push(&options[self.grid.option(row)]);

            self.descend()?;

            self.solution.pop();
            self.grid.uncommit_row(row);

            cursor = self.grid.next_row(row);
        }

        self.grid.uncover(column);

        if let Some(trace) = self.trace.as_mut() {
            trace.on_recursion_ended();
        }

        Ok(())
    }

    /// Select a column to branch on.
    ///
    /// This implementation chooses the primary column with the least number
    /// of live rows, preferring the earliest one on ties.
    fn choose_column(&self) -> Option<G::Column> {
        iter::successors(self.grid.first_primary(), |column| {
            self.grid.next_primary(*column)
        })
        .min_by_key(|column| self.grid.column_len(*column))
    }
}
