//! Lookup values, filters and insert assignments.

use crate::table::{Column, Table};
use serde_json::{Map, Value};
use std::fmt;

/// The value side of a column lookup.
///
/// A single value renders as `?? = ?`, a list as `?? IN (?)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Match one value.
    One(Value),
    /// Match any of the values.
    Many(Vec<Value>),
}

impl Lookup {
    /// True for an empty `Many` list, which can never match anything.
    pub fn is_empty_list(&self) -> bool {
        matches!(self, Lookup::Many(values) if values.is_empty())
    }

    /// The value passed to the driver for this lookup.
    pub(crate) fn to_param_value(&self) -> Value {
        match self {
            Lookup::One(value) => value.clone(),
            Lookup::Many(values) => Value::Array(values.clone()),
        }
    }
}

/// JSON arrays become lists, everything else is a single value.
impl From<Value> for Lookup {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(values) => Lookup::Many(values),
            other => Lookup::One(other),
        }
    }
}

macro_rules! impl_lookup_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Lookup {
                fn from(value: $ty) -> Self {
                    Lookup::One(Value::from(value))
                }
            }
        )*
    };
}

impl_lookup_scalar!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, String, &str,
);

impl From<&String> for Lookup {
    fn from(value: &String) -> Self {
        Lookup::One(Value::from(value.as_str()))
    }
}

/// `None` looks up SQL `NULL`; `Some` converts like the value it holds.
impl<T: Into<Value>> From<Option<T>> for Lookup {
    fn from(value: Option<T>) -> Self {
        value.map_or(Lookup::One(Value::Null), |v| Lookup::from(v.into()))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Lookup {
    fn from(values: Vec<T>) -> Self {
        Lookup::Many(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Lookup {
    fn from(values: &[T]) -> Self {
        Lookup::Many(values.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Lookup {
    fn from(values: [T; N]) -> Self {
        Lookup::Many(values.into_iter().map(Into::into).collect())
    }
}

/// How the conditions of a filter are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Join {
    #[default]
    And,
    Or,
}

impl Join {
    /// Choose `Or` when `join_by_or` is set, `And` otherwise.
    pub fn by_or(join_by_or: bool) -> Self {
        if join_by_or { Join::Or } else { Join::And }
    }

    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Join::And => " AND ",
            Join::Or => " OR ",
        }
    }
}

/// An ordered column to lookup mapping for multi-column filtering.
///
/// Entries keep insertion order; each becomes one parenthesized condition.
///
/// # Example
/// ```ignore
/// let filter = Filter::<User>::new()
///     .field(UserColumn::Status, "active")
///     .field(UserColumn::Role, vec!["admin", "owner"]);
/// ```
pub struct Filter<T: Table> {
    entries: Vec<(T::Column, Lookup)>,
}

impl<T: Table> Filter<T> {
    /// Create an empty filter (matches every row).
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a condition on `column`.
    pub fn field(mut self, column: T::Column, value: impl Into<Lookup>) -> Self {
        self.push(column, value);
        self
    }

    /// Add a condition on `column` in place.
    pub fn push(&mut self, column: T::Column, value: impl Into<Lookup>) -> &mut Self {
        self.entries.push((column, value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any condition is an empty list, so no row can match.
    pub fn has_empty_list(&self) -> bool {
        self.entries.iter().any(|(_, lookup)| lookup.is_empty_list())
    }

    /// Iterate conditions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (T::Column, &Lookup)> {
        self.entries.iter().map(|(column, lookup)| (*column, lookup))
    }
}

impl<T: Table> Default for Filter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Table> Clone for Filter<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T: Table> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(c, l)| (Column::name(*c), l)))
            .finish()
    }
}

impl<T: Table, L: Into<Lookup>> FromIterator<(T::Column, L)> for Filter<T> {
    fn from_iter<I: IntoIterator<Item = (T::Column, L)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(c, l)| (c, l.into())).collect(),
        }
    }
}

/// Ordered column assignments for a single-row insert.
///
/// Setting a column twice keeps its first position and the last value.
pub struct Assignments<T: Table> {
    entries: Vec<(T::Column, Value)>,
}

impl<T: Table> Assignments<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Assign `value` to `column`.
    pub fn set(mut self, column: T::Column, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Assign `value` to `column` in place.
    pub fn insert(&mut self, column: T::Column, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        let name = column.name();
        match self.entries.iter().position(|entry| entry.0.name() == name) {
            Some(idx) => self.entries[idx].1 = value,
            None => self.entries.push((column, value)),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The assignments as one JSON object, in insertion order.
    pub fn to_object(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(column, value)| (Column::name(*column).to_string(), value.clone()))
            .collect()
    }
}

impl<T: Table> Default for Assignments<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Table> Clone for Assignments<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T: Table> fmt::Debug for Assignments<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(c, v)| (Column::name(*c), v)))
            .finish()
    }
}

impl<T: Table, V: Into<Value>> FromIterator<(T::Column, V)> for Assignments<T> {
    fn from_iter<I: IntoIterator<Item = (T::Column, V)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (column, value) in iter {
            out.insert(column, value);
        }
        out
    }
}
