//! Items are the constraints of an exact cover problem, options are the
//! choices that satisfy them.
//!
//! The solver never looks inside an option. It asks a [`Provider`] for the
//! items an option covers, and asks each [`Item`] which [`Kind`] of
//! constraint it is.

use std::{
    fmt::Debug,
    hash::{Hash, Hasher},
};

/// The role an item plays in an exact cover problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind<C> {
    /// Must be covered by exactly one option of a solution.
    Primary,
    /// May be left uncovered.
    ///
    /// Without a color the item is covered by at most one option. With a
    /// color it may be covered by any number of options, as long as all of
    /// them assign it the same color.
    Secondary(Option<C>),
}

impl<C> Kind<C> {
    /// Return true for [`Kind::Primary`].
    pub fn is_primary(&self) -> bool {
        matches!(self, Kind::Primary)
    }

    /// Return the color of a colored secondary item.
    pub fn color(&self) -> Option<&C> {
        match self {
            Kind::Primary | Kind::Secondary(None) => None,
            Kind::Secondary(Some(color)) => Some(color),
        }
    }
}

/// A constraint of an exact cover problem.
///
/// Items are deduplicated by value equality: every option that returns an
/// equal item covers the same column of the matrix. For colored secondary
/// items the color must *not* take part in equality or hashing, otherwise
/// each color would get a column of its own.
pub trait Item: Eq + Hash + Clone + Debug {
    /// The color type attached to secondary items.
    type Color: Eq + Clone + Debug;

    /// Return whether this item is primary or secondary, and its color.
    fn kind(&self) -> Kind<Self::Color> {
        Kind::Primary
    }
}

macro_rules! primary_items {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Item for $ty {
                type Color = ();
            }
        )*
    };
}

primary_items!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char, bool, String);

impl<'a> Item for &'a str {
    type Color = ();
}

/// A general purpose item that tags a label as primary or secondary.
///
/// Equality and hashing look at the variant and the label only, so
/// `Secondary(x, Some(a))` and `Secondary(x, Some(b))` name the same column.
#[derive(Debug, Clone)]
pub enum Constraint<T, C> {
    /// A primary item.
    Primary(T),
    /// A secondary item with an optional color.
    Secondary(T, Option<C>),
}

impl<T, C> Constraint<T, C> {
    /// Return the label of this item.
    pub fn label(&self) -> &T {
        match self {
            Constraint::Primary(label) | Constraint::Secondary(label, _) => label,
        }
    }
}

impl<T: PartialEq, C> PartialEq for Constraint<T, C> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Constraint::Primary(a), Constraint::Primary(b)) => a == b,
            (Constraint::Secondary(a, _), Constraint::Secondary(b, _)) => a == b,
            _ => false,
        }
    }
}

impl<T: Eq, C> Eq for Constraint<T, C> {}

impl<T: Hash, C> Hash for Constraint<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        self.label().hash(state);
    }
}

impl<T, C> Item for Constraint<T, C>
where
    T: Eq + Hash + Clone + Debug,
    C: Eq + Clone + Debug,
{
    type Color = C;

    fn kind(&self) -> Kind<C> {
        match self {
            Constraint::Primary(_) => Kind::Primary,
            Constraint::Secondary(_, color) => Kind::Secondary(color.clone()),
        }
    }
}

/// Maps an option to the items it covers.
///
/// The provider must be a pure function of the option: the solver calls it
/// once when the option is registered and again for every pre-selected
/// option of a search. The returned items must not contain duplicates.
pub trait Provider<O> {
    /// The type of items produced for options.
    type Item: Item;

    /// Return the items covered by `option`, in row order.
    fn items(&self, option: &O) -> Vec<Self::Item>;
}

impl<O, I, F> Provider<O> for F
where
    F: Fn(&O) -> Vec<I>,
    I: Item,
{
    type Item = I;

    fn items(&self, option: &O) -> Vec<I> {
        self(option)
    }
}
