//! Nucleotide diversity.

use crate::distance::Ssd;

/// Nucleotide diversity within each population and pooled over all populations.
///
/// Diversity is undefined for a population without alleles, and for a locus without any
/// non-missing alleles.
#[derive(Clone, Debug, PartialEq)]
pub struct Diversity {
    /// Diversity within each population.
    pub populations: Vec<Option<f64>>,
    /// Diversity of all populations pooled.
    pub pooled: Option<f64>,
}

impl Diversity {
    /// Returns diversity from the sums of squared differences of a locus with the provided
    /// length.
    pub fn from_ssd(ssd: &Ssd, length: usize) -> Self {
        let populations = ssd
            .within
            .iter()
            .zip(&ssd.counts)
            .map(|(&within, &count)| per_site(within, count, length))
            .collect();

        Self {
            populations,
            pooled: per_site(ssd.total, ssd.total_count(), length),
        }
    }
}

fn per_site(ssd: u64, count: u64, length: usize) -> Option<f64> {
    (count > 0 && length > 0).then(|| ssd as f64 / ((count * count) as f64 * length as f64))
}

/// A weighted mean accumulated from values one at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WeightedMean {
    sum: f64,
    weight: f64,
}

impl WeightedMean {
    /// Adds a value with the provided weight.
    pub fn add(&mut self, value: f64, weight: f64) {
        self.sum += value * weight;
        self.weight += weight;
    }

    /// Returns the mean, or `None` if the total weight is zero.
    pub fn mean(&self) -> Option<f64> {
        (self.weight > 0.).then(|| self.sum / self.weight)
    }

    /// Adds the values of another weighted mean.
    pub fn merge(&mut self, other: &Self) {
        self.sum += other.sum;
        self.weight += other.weight;
    }

    /// Returns the total weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ssd() {
        // AA, AT versus TT, TA
        let ssd = Ssd {
            total: 16,
            within: vec![2, 2],
            counts: vec![2, 2],
        };

        let diversity = Diversity::from_ssd(&ssd, 2);

        assert_eq!(diversity.populations, [Some(0.25), Some(0.25)]);
        assert_eq!(diversity.pooled, Some(0.5));
    }

    #[test]
    fn test_pooled_matches_pooled_sums() {
        let ssd = Ssd {
            total: 118,
            within: vec![12, 0, 30],
            counts: vec![4, 1, 6],
        };

        let diversity = Diversity::from_ssd(&ssd, 7);

        assert_approx_eq!(
            diversity.pooled.unwrap(),
            118. / (11. * 11. * 7.),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_empty_population() {
        let ssd = Ssd {
            total: 0,
            within: vec![0, 0],
            counts: vec![3, 0],
        };

        let diversity = Diversity::from_ssd(&ssd, 5);

        assert_eq!(diversity.populations, [Some(0.), None]);
        assert_eq!(diversity.pooled, Some(0.));
    }

    #[test]
    fn test_all_missing() {
        let diversity = Diversity::from_ssd(&Ssd::from_zeros(2), 0);

        assert_eq!(diversity.populations, [None, None]);
        assert_eq!(diversity.pooled, None);
    }

    #[test]
    fn test_weighted_mean() {
        let mut mean = WeightedMean::default();
        assert_eq!(mean.mean(), None);

        mean.add(0.5, 10.);
        mean.add(0.2, 30.);
        assert_approx_eq!(mean.mean().unwrap(), 0.275, epsilon = 1e-12);

        let mut other = WeightedMean::default();
        other.add(1.0, 0.);
        mean.merge(&other);
        assert_eq!(mean.weight(), 40.);
        assert_approx_eq!(mean.mean().unwrap(), 0.275, epsilon = 1e-12);
    }
}
