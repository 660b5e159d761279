//! Locus statistics.

pub mod diversity;
pub use diversity::{Diversity, WeightedMean};

pub mod permutation;
pub use permutation::Permutation;

pub mod phi_st;
pub use phi_st::{PhiSt, VarianceComponents};

use crate::{
    distance::{Comparison, Distances, Ssd},
    input::{sample::population, Locus},
};

/// A calculator of statistics for individual loci.
#[derive(Clone, Debug)]
pub struct Calculator {
    populations: usize,
    permutation: Option<Permutation>,
}

impl Calculator {
    /// Creates a new calculator for the provided number of populations.
    pub fn new(populations: usize) -> Self {
        Self {
            populations,
            permutation: None,
        }
    }

    /// Sets a permutation test for the Phi-ST among all populations.
    ///
    /// By default, no permutation test is performed.
    pub fn set_permutation(mut self, permutation: Option<Permutation>) -> Self {
        self.permutation = permutation;
        self
    }

    /// Returns the number of populations.
    pub fn populations(&self) -> usize {
        self.populations
    }

    /// Returns the permutation test, if any.
    pub fn permutation(&self) -> Option<&Permutation> {
        self.permutation.as_ref()
    }

    /// Calculates the statistics for a locus.
    ///
    /// The index of the locus in the input is used to derive independent randomness for
    /// permutation tests.
    pub fn calculate(&self, locus: &Locus, index: u64) -> LocusStatistics {
        let distances = Distances::from_locus(locus);
        let length = locus.length();

        let pairwise_ssd = population::pairs(self.populations)
            .map(|(i, j)| distances.ssd(Comparison::Pair(i, j)))
            .collect::<Vec<_>>();
        let pairwise = pairwise_ssd.iter().map(PhiSt::from_ssd).collect();

        let comparison = Comparison::All(self.populations);
        let pooled = distances.ssd(comparison);
        let global = PhiSt::from_ssd(&pooled);

        let p_value = self
            .permutation
            .map(|permutation| permutation.p_value(&distances, comparison, global, index));

        log::trace!(
            "Locus '{}' with {} non-missing of {} alleles: Phi-ST {:.6}",
            locus.id(),
            distances.len(),
            locus.alleles().len(),
            global.0,
        );

        LocusStatistics {
            id: locus.id().to_string(),
            length,
            diversity: Diversity::from_ssd(&pooled, length),
            pairwise,
            pairwise_totals: pairwise_ssd.into_iter().map(|ssd| ssd.total).collect(),
            global,
            pooled,
            p_value,
        }
    }
}

/// Statistics for a single locus.
#[derive(Clone, Debug, PartialEq)]
pub struct LocusStatistics {
    id: String,
    length: usize,
    pairwise: Vec<PhiSt>,
    pairwise_totals: Vec<u64>,
    global: PhiSt,
    pooled: Ssd,
    diversity: Diversity,
    p_value: Option<f64>,
}

impl LocusStatistics {
    /// Returns the nucleotide diversity of the locus.
    pub fn diversity(&self) -> &Diversity {
        &self.diversity
    }

    /// Returns the Phi-ST among all populations.
    pub fn global(&self) -> PhiSt {
        self.global
    }

    /// Returns the cluster id of the locus.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the length of the locus.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns the Phi-ST between each pair of populations, in the order given by
    /// [`population::pairs`].
    pub fn pairwise(&self) -> &[PhiSt] {
        &self.pairwise
    }

    /// Returns the total sums of squared differences for each pair of populations.
    pub fn pairwise_totals(&self) -> &[u64] {
        &self.pairwise_totals
    }

    /// Returns the sums of squared differences among all populations.
    pub fn pooled(&self) -> &Ssd {
        &self.pooled
    }

    /// Returns the permutation test p-value of the Phi-ST among all populations, if any.
    pub fn p_value(&self) -> Option<f64> {
        self.p_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::distance::tests::locus;

    #[test]
    fn test_complete_divergence() {
        let locus = locus(&[(0, "AA"), (0, "AA"), (1, "TT"), (1, "TT")]);

        let stats = Calculator::new(2).calculate(&locus, 0);

        assert_eq!(stats.pooled().within, [0, 0]);
        assert!(stats.pooled().total > 0);
        assert_eq!(stats.global(), PhiSt(1.));
        assert_eq!(stats.pairwise(), [PhiSt(1.)]);
        assert_eq!(stats.length(), 2);
        assert_eq!(stats.p_value(), None);
    }

    #[test]
    fn test_identical_alleles() {
        let locus = locus(&[(0, "AA"), (0, "AA"), (1, "AA"), (1, "AA")]);

        let stats = Calculator::new(2).calculate(&locus, 0);

        assert_eq!(stats.global(), PhiSt(0.));
        assert_eq!(stats.diversity().populations, [Some(0.), Some(0.)]);
        assert_eq!(stats.diversity().pooled, Some(0.));
    }

    #[test]
    fn test_single_population_with_data() {
        let locus = locus(&[
            (0, "AC"),
            (0, "AG"),
            (1, "."),
            (1, "."),
            (2, "."),
            (2, "."),
        ]);

        let stats = Calculator::new(3).calculate(&locus, 0);

        assert_eq!(stats.global(), PhiSt(1.));
        assert_eq!(stats.pairwise(), [PhiSt(1.), PhiSt(1.), PhiSt(1.)]);
        assert_eq!(stats.diversity().populations, [Some(0.25), None, None]);
    }

    #[test]
    fn test_all_missing() {
        let locus = locus(&[(0, "."), (0, "."), (1, "."), (1, ".")]);

        let stats = Calculator::new(2).calculate(&locus, 0);

        assert_eq!(stats.length(), 0);
        assert_eq!(stats.global(), PhiSt(1.));
        assert_eq!(stats.pooled().total_count(), 0);
        assert_eq!(stats.diversity().pooled, None);
    }

    #[test]
    fn test_pairwise_order_and_totals() {
        let locus = locus(&[
            (0, "AA"),
            (0, "AA"),
            (1, "AA"),
            (1, "AA"),
            (2, "TT"),
            (2, "TT"),
        ]);

        let stats = Calculator::new(3).calculate(&locus, 0);

        // Pairs (0, 1), (0, 2), (1, 2)
        assert_eq!(stats.pairwise(), [PhiSt(0.), PhiSt(1.), PhiSt(1.)]);
        assert_eq!(stats.pairwise_totals(), [0, 16, 16]);
        assert_eq!(stats.pooled().total, 32);
    }

    #[test]
    fn test_pooled_diversity_agrees_with_pooled_sums() {
        let locus = locus(&[
            (0, "ACGTA"),
            (0, "ACGTT"),
            (1, "ACCTA"),
            (1, "."),
            (2, "TCGTA"),
            (2, "ACGAA"),
        ]);

        let stats = Calculator::new(3).calculate(&locus, 0);

        let pooled = stats.pooled();
        let n = pooled.total_count() as f64;
        assert_approx_eq!(
            stats.diversity().pooled.unwrap(),
            pooled.total as f64 / (n * n * 5.),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_permutation_p_value() {
        let locus = locus(&[(0, "AA"), (0, "AA"), (1, "TT"), (1, "TT")]);

        let stats = Calculator::new(2)
            .set_permutation(Permutation::new(100, 1))
            .calculate(&locus, 0);

        let p = stats.p_value().unwrap();
        assert!(p > 0. && p <= 1.);
        assert_eq!((p * 100.).fract(), 0.);

        // The locus index offsets the seed
        let distances = Distances::from_locus(&locus);
        let comparison = Comparison::All(2);
        let expected = Permutation::new(100, 4)
            .unwrap()
            .p_value(&distances, comparison, PhiSt(1.), 0);
        let shifted = Calculator::new(2)
            .set_permutation(Permutation::new(100, 1))
            .calculate(&locus, 3);
        assert_eq!(shifted.p_value(), Some(expected));
        assert_eq!(
            stats.p_value(),
            Calculator::new(2)
                .set_permutation(Permutation::new(100, 1))
                .calculate(&locus, 0)
                .p_value()
        );
    }
}
