//! Permutation tests.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::distance::{Comparison, Distances};

use super::PhiSt;

/// A permutation test of Phi-ST.
///
/// Under the null hypothesis of no differentiation, alleles are exchangeable between
/// populations. Each permutation randomly reassigns all allele sequences of a locus, including
/// missing ones, to the allele slots of the samples, and recalculates Phi-ST. The p-value is the
/// proportion of permutations with a Phi-ST at least as large as the observed one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Permutation {
    permutations: usize,
    seed: u64,
}

impl Permutation {
    /// Creates a new permutation test with the provided number of permutations per test.
    ///
    /// Returns `None` if the number of permutations is zero.
    pub fn new(permutations: usize, seed: u64) -> Option<Self> {
        (permutations > 0).then_some(Self { permutations, seed })
    }

    /// Returns the number of permutations per test.
    pub fn permutations(&self) -> usize {
        self.permutations
    }

    /// Returns the seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the p-value of an observed Phi-ST for a comparison.
    ///
    /// Randomness is derived from the seed and the provided stream, so that tests with different
    /// streams are independent, and a test with a given seed and stream is reproducible.
    pub fn p_value(
        &self,
        distances: &Distances,
        comparison: Comparison,
        observed: PhiSt,
        stream: u64,
    ) -> f64 {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(stream));

        // Shuffling group labels over a fixed distance matrix is equivalent to shuffling the
        // sequences over fixed labels; missing sequences are labelled last
        let mut groups = distances
            .populations()
            .iter()
            .chain(distances.missing())
            .map(|&population| comparison.project(population))
            .collect::<Vec<_>>();

        let present = distances.len();
        let exceeding = (0..self.permutations)
            .filter(|_| {
                groups.shuffle(&mut rng);

                let ssd = distances.ssd_with_groups(comparison.groups(), &groups[..present]);
                PhiSt::from_ssd(&ssd) >= observed
            })
            .count();

        exceeding as f64 / self.permutations as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::distance::tests::locus;

    #[test]
    fn test_zero_permutations() {
        assert_eq!(Permutation::new(0, 1), None);
    }

    #[test]
    fn test_reproducible() {
        let distances = Distances::from_locus(&locus(&[
            (0, "AAAA"),
            (0, "AAAT"),
            (0, "."),
            (1, "TTAA"),
            (1, "TTAT"),
            (1, "TTTT"),
        ]));
        let comparison = Comparison::All(2);
        let observed = PhiSt::from_ssd(&distances.ssd(comparison));

        let permutation = Permutation::new(50, 7).unwrap();
        let p = permutation.p_value(&distances, comparison, observed, 3);

        assert!((0. ..=1.).contains(&p));
        assert_eq!(p, permutation.p_value(&distances, comparison, observed, 3));
    }

    #[test]
    fn test_identical_alleles_always_exceed() {
        // Every permutation gives Phi-ST zero, which is at least the observed zero
        let distances =
            Distances::from_locus(&locus(&[(0, "AA"), (0, "AA"), (1, "AA"), (1, "AA")]));
        let comparison = Comparison::All(2);

        let permutation = Permutation::new(20, 0).unwrap();

        assert_eq!(
            permutation.p_value(&distances, comparison, PhiSt(0.), 0),
            1.
        );
    }

    #[test]
    fn test_single_population_always_exceeds() {
        let distances = Distances::from_locus(&locus(&[(0, "AA"), (0, "TT")]));
        let comparison = Comparison::All(2);
        let observed = PhiSt::from_ssd(&distances.ssd(comparison));

        let permutation = Permutation::new(10, 42).unwrap();

        assert_eq!(observed, PhiSt(1.));
        assert_eq!(permutation.p_value(&distances, comparison, observed, 0), 1.);
    }
}
