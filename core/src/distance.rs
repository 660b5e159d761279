//! Pairwise distances and sums of squared differences.
//!
//! Distances between all alleles of a locus are calculated once into a [`Distances`] matrix. A
//! [`Comparison`] then projects populations into groups, and [`Distances::ssd`] sums distances
//! within groups and in total without touching the locus or the matrix.

use crate::input::{sample::population, Locus};

/// A comparison between populations.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Comparison {
    /// Comparison between two populations, ignoring all others.
    Pair(population::Id, population::Id),
    /// Comparison between all populations.
    All(usize),
}

impl Comparison {
    /// Returns the number of groups in the comparison.
    pub fn groups(&self) -> usize {
        match self {
            Comparison::Pair(..) => 2,
            Comparison::All(n) => *n,
        }
    }

    /// Returns the group of a population in the comparison, or `None` if the population is
    /// not part of the comparison.
    pub fn project(&self, population: population::Id) -> Option<usize> {
        match *self {
            Comparison::Pair(first, _) if population == first => Some(0),
            Comparison::Pair(_, second) if population == second => Some(1),
            Comparison::Pair(..) => None,
            Comparison::All(n) => Some(usize::from(population)).filter(|&i| i < n),
        }
    }
}

/// Sums of squared differences between alleles, and allele counts, for a set of groups.
///
/// Differences are summed over the full, symmetric distance matrix, so that each pair of alleles
/// contributes twice.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Ssd {
    /// Sum of squared differences between all alleles.
    pub total: u64,
    /// Sum of squared differences between alleles within each group.
    pub within: Vec<u64>,
    /// Number of alleles in each group.
    pub counts: Vec<u64>,
}

impl Ssd {
    /// Creates sums of zero for the provided number of groups.
    pub fn from_zeros(groups: usize) -> Self {
        Self {
            total: 0,
            within: vec![0; groups],
            counts: vec![0; groups],
        }
    }

    /// Returns the number of groups.
    pub fn groups(&self) -> usize {
        self.counts.len()
    }

    /// Returns the total number of alleles over all groups.
    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Hamming distances between all non-missing alleles of a locus.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Distances {
    populations: Vec<population::Id>,
    missing: Vec<population::Id>,
    condensed: Vec<u32>,
}

impl Distances {
    /// Calculates distances between the non-missing alleles of a locus.
    pub fn from_locus(locus: &Locus) -> Self {
        let (missing, present): (Vec<_>, Vec<_>) =
            locus.alleles().iter().partition(|allele| allele.is_missing());

        let n = present.len();
        let mut condensed = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for (i, first) in present.iter().enumerate() {
            for second in present.iter().skip(i + 1) {
                condensed.push(first.sequence().hamming(second.sequence()) as u32);
            }
        }

        Self {
            populations: present.iter().map(|allele| allele.population()).collect(),
            missing: missing.iter().map(|allele| allele.population()).collect(),
            condensed,
        }
    }

    /// Returns the distance between the `i`th and `j`th non-missing alleles.
    ///
    /// # Panics
    ///
    /// If either index is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> u32 {
        match i.cmp(&j) {
            std::cmp::Ordering::Less => self.condensed[self.row_start(i) + j - i - 1],
            std::cmp::Ordering::Equal => 0,
            std::cmp::Ordering::Greater => self.get(j, i),
        }
    }

    /// Returns `true` if there are no non-missing alleles.
    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }

    /// Returns the number of non-missing alleles.
    pub fn len(&self) -> usize {
        self.populations.len()
    }

    /// Returns the populations of the missing alleles.
    pub fn missing(&self) -> &[population::Id] {
        &self.missing
    }

    /// Returns the populations of the non-missing alleles.
    pub fn populations(&self) -> &[population::Id] {
        &self.populations
    }

    fn row_start(&self, i: usize) -> usize {
        let n = self.len();
        i * (2 * n - i - 1) / 2
    }

    /// Returns the sums of squared differences for a comparison.
    pub fn ssd(&self, comparison: Comparison) -> Ssd {
        let groups = self
            .populations
            .iter()
            .map(|&population| comparison.project(population))
            .collect::<Vec<_>>();

        self.ssd_with_groups(comparison.groups(), &groups)
    }

    /// Returns the sums of squared differences for an explicit group assignment of each
    /// non-missing allele, where alleles without a group are ignored.
    ///
    /// # Panics
    ///
    /// If the number of assigned groups does not match the number of non-missing alleles, or if
    /// any group is out of bounds.
    pub fn ssd_with_groups(&self, n: usize, groups: &[Option<usize>]) -> Ssd {
        assert_eq!(groups.len(), self.len());

        let mut ssd = Ssd::from_zeros(n);

        for (i, &first) in groups.iter().enumerate() {
            let Some(first) = first else {
                continue;
            };
            ssd.counts[first] += 1;

            let start = self.row_start(i);
            let row = &self.condensed[start..start + groups.len() - i - 1];

            for (&distance, &second) in row.iter().zip(&groups[i + 1..]) {
                if let Some(second) = second {
                    let distance = u64::from(distance);

                    ssd.total += distance;
                    if first == second {
                        ssd.within[first] += distance;
                    }
                }
            }
        }

        ssd.total *= 2;
        ssd.within.iter_mut().for_each(|x| *x *= 2);
        ssd
    }
}
