//! Sample population.

use std::fmt;

use indexmap::IndexSet;

/// The population label marking a sample as excluded from all statistics.
pub const UNASSIGNED: &str = "-9";

/// A population for a sample.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Population {
    /// Named population.
    Named(String),
    /// Sample is not assigned to any population.
    Unassigned,
}

impl From<&str> for Population {
    fn from(label: &str) -> Self {
        if label == UNASSIGNED {
            Self::Unassigned
        } else {
            Self::Named(label.to_string())
        }
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Population::Named(name) => write!(f, "{name}"),
            Population::Unassigned => f.write_str(UNASSIGNED),
        }
    }
}

/// A numeric id for a sample population.
///
/// Ids index into the sorted list of [`Populations`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Id(pub usize);

impl From<Id> for usize {
    fn from(id: Id) -> Self {
        id.0
    }
}

/// The sorted set of named populations.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Populations(IndexSet<String>);

impl Populations {
    /// Creates the population set from population labels.
    ///
    /// Duplicates and the unassigned population are dropped, and the remaining names are sorted
    /// lexicographically.
    pub fn from_labels<'a, I>(populations: I) -> Self
    where
        I: IntoIterator<Item = &'a Population>,
    {
        let mut names = populations
            .into_iter()
            .filter_map(|population| match population {
                Population::Named(name) => Some(name.clone()),
                Population::Unassigned => None,
            })
            .collect::<IndexSet<_>>();

        names.sort();

        Self(names)
    }

    /// Returns the id of a population, or `None` if unassigned or unknown.
    pub fn get(&self, population: &Population) -> Option<Id> {
        match population {
            Population::Named(name) => self.0.get_index_of(name).map(Id),
            Population::Unassigned => None,
        }
    }

    /// Returns `true` if there are no named populations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the population names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the number of named populations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the labels of all unordered population pairs, in the order of [`pairs`].
    pub fn pair_labels(&self) -> Vec<String> {
        pairs(self.len())
            .map(|(i, j)| format!("{}-{}", self.0[i.0], self.0[j.0]))
            .collect()
    }
}

/// Returns an iterator over all unordered pairs of `n` populations.
///
/// Pairs are ordered by first and then second population, so that `(0, 1), (0, 2), (1, 2)` for
/// three populations.
pub fn pairs(n: usize) -> impl Iterator<Item = (Id, Id)> + Clone {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (Id(i), Id(j))))
}

/// Returns the number of unordered pairs of `n` populations.
pub fn number_of_pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}
