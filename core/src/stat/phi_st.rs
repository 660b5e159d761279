//! Analysis of molecular variance and Phi-ST.

use crate::distance::Ssd;

/// Variance components within and among groups, as estimated in an analysis of molecular
/// variance.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct VarianceComponents {
    /// Variance component within groups.
    pub within: f64,
    /// Variance component among groups.
    pub among: f64,
}

impl VarianceComponents {
    /// Estimates variance components from sums of squared differences and allele counts.
    ///
    /// The sums of squared differences must be over the full distance matrix, and `within` and
    /// `counts` must have one entry for each group. Counts need not be integers, which allows
    /// estimating from average counts over several loci.
    ///
    /// Returns `None` if fewer than two groups have any alleles, in which case variance among
    /// groups is undefined.
    pub fn estimate(total: f64, within: &[f64], counts: &[f64]) -> Option<Self> {
        debug_assert_eq!(within.len(), counts.len());

        let groups = counts.iter().filter(|&&n| n > 0.).count();
        if groups <= 1 {
            return None;
        }

        let n = counts.iter().sum::<f64>();

        let ssd_within_groups = within
            .iter()
            .zip(counts)
            .filter(|(_, &count)| count > 0.)
            .map(|(&ssd, &count)| ssd / (2. * count))
            .sum::<f64>();
        let ssd_among_groups = total / (2. * n) - ssd_within_groups;

        // Zero when every group holds exactly one allele; negative with mean counts below one
        let df_within = n - groups as f64;
        let within = if df_within == 0. {
            0.
        } else {
            ssd_within_groups / df_within
        };

        let df_among = (groups - 1) as f64;
        let weighted_n = (n - counts.iter().map(|n| n * n).sum::<f64>() / n) / df_among;
        let among = (ssd_among_groups / df_among - within) / weighted_n;

        Some(Self { within, among })
    }
}

/// The Phi-ST statistic, the proportion of molecular variance among groups.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct PhiSt(pub f64);

impl PhiSt {
    /// Returns Phi-ST from variance components.
    ///
    /// Without variance components, i.e. with fewer than two groups with data, Phi-ST is taken
    /// to be one. Without any variance, Phi-ST is zero.
    pub fn from_components(components: Option<VarianceComponents>) -> Self {
        match components {
            Some(VarianceComponents { within, among }) if among + within > 0. => {
                Self(among / (among + within))
            }
            Some(_) => Self(0.),
            None => Self(1.),
        }
    }

    /// Returns Phi-ST from sums of squared differences and allele counts.
    ///
    /// See [`VarianceComponents::estimate`] for requirements on the input.
    pub fn from_sums(total: f64, within: &[f64], counts: &[f64]) -> Self {
        Self::from_components(VarianceComponents::estimate(total, within, counts))
    }

    /// Returns Phi-ST from the sums of squared differences of a single locus.
    pub fn from_ssd(ssd: &Ssd) -> Self {
        let within = ssd.within.iter().map(|&x| x as f64).collect::<Vec<_>>();
        let counts = ssd.counts.iter().map(|&x| x as f64).collect::<Vec<_>>();

        Self::from_sums(ssd.total as f64, &within, &counts)
    }
}
