//! Genome-wide aggregation over loci.
//!
//! Genome-wide Phi-ST is not an average of locus statistics. Instead, sums of squared
//! differences and allele counts are added over loci, and variance components are estimated once
//! from the sums. Loci thereby contribute in proportion to their non-missing data. Since all sums
//! are integers, the result does not depend on the order of loci.

use crate::{
    input::sample::population,
    stat::{Diversity, LocusStatistics, PhiSt, WeightedMean},
};

/// Running sums over loci.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregate {
    loci: u64,
    length: u64,
    pairwise_totals: Vec<u64>,
    total: u64,
    within: Vec<u64>,
    counts: Vec<u64>,
    diversity: Vec<WeightedMean>,
    pooled_diversity: WeightedMean,
}

impl Aggregate {
    /// Creates an empty aggregate for the provided number of populations.
    pub fn new(populations: usize) -> Self {
        Self {
            loci: 0,
            length: 0,
            pairwise_totals: vec![0; population::number_of_pairs(populations)],
            total: 0,
            within: vec![0; populations],
            counts: vec![0; populations],
            diversity: vec![WeightedMean::default(); populations],
            pooled_diversity: WeightedMean::default(),
        }
    }

    /// Adds the statistics of a locus.
    ///
    /// # Panics
    ///
    /// If the statistics were calculated for a different number of populations.
    pub fn add(&mut self, stats: &LocusStatistics) {
        assert_eq!(stats.pooled().groups(), self.populations());

        self.loci += 1;
        self.length += stats.length() as u64;

        add_assign(&mut self.pairwise_totals, stats.pairwise_totals());

        let pooled = stats.pooled();
        self.total += pooled.total;
        add_assign(&mut self.within, &pooled.within);
        add_assign(&mut self.counts, &pooled.counts);

        let weight = stats.length() as f64;
        let Diversity {
            populations,
            pooled,
        } = stats.diversity();
        for (mean, diversity) in self.diversity.iter_mut().zip(populations) {
            if let Some(diversity) = diversity {
                mean.add(*diversity, weight);
            }
        }
        if let Some(pooled) = pooled {
            self.pooled_diversity.add(*pooled, weight);
        }
    }

    /// Returns the number of loci added.
    pub fn loci(&self) -> u64 {
        self.loci
    }

    /// Adds the sums of another aggregate.
    ///
    /// # Panics
    ///
    /// If the aggregates are for different numbers of populations.
    pub fn merge(&mut self, other: &Self) {
        assert_eq!(self.populations(), other.populations());

        self.loci += other.loci;
        self.length += other.length;
        add_assign(&mut self.pairwise_totals, &other.pairwise_totals);
        self.total += other.total;
        add_assign(&mut self.within, &other.within);
        add_assign(&mut self.counts, &other.counts);
        for (mean, other) in self.diversity.iter_mut().zip(&other.diversity) {
            mean.merge(other);
        }
        self.pooled_diversity.merge(&other.pooled_diversity);
    }

    /// Returns the mean number of non-missing alleles per locus for each population.
    pub fn mean_counts(&self) -> Vec<f64> {
        if self.loci == 0 {
            vec![0.; self.counts.len()]
        } else {
            self.counts
                .iter()
                .map(|&count| count as f64 / self.loci as f64)
                .collect()
        }
    }

    /// Returns the number of populations.
    pub fn populations(&self) -> usize {
        self.counts.len()
    }

    /// Returns the genome-wide statistics.
    pub fn summarize(&self) -> Summary {
        let counts = self.mean_counts();
        let within = self.within.iter().map(|&x| x as f64).collect::<Vec<_>>();

        let pairwise = population::pairs(self.populations())
            .zip(&self.pairwise_totals)
            .map(|((i, j), &total)| {
                let (i, j) = (usize::from(i), usize::from(j));
                PhiSt::from_sums(total as f64, &[within[i], within[j]], &[counts[i], counts[j]])
            })
            .collect();

        let global = PhiSt::from_sums(self.total as f64, &within, &counts);

        Summary {
            length: self.length,
            pairwise,
            global,
            diversity: Diversity {
                populations: self.diversity.iter().map(WeightedMean::mean).collect(),
                pooled: self.pooled_diversity.mean(),
            },
        }
    }
}

fn add_assign(lhs: &mut [u64], rhs: &[u64]) {
    debug_assert_eq!(lhs.len(), rhs.len());

    lhs.iter_mut().zip(rhs).for_each(|(x, y)| *x += y);
}

/// Genome-wide statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    /// Total length of all loci.
    pub length: u64,
    /// Phi-ST between each pair of populations, in the order given by [`population::pairs`].
    pub pairwise: Vec<PhiSt>,
    /// Phi-ST among all populations.
    pub global: PhiSt,
    /// Length-weighted mean nucleotide diversity.
    pub diversity: Diversity,
}
