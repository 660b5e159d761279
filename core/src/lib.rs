#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Locus-by-locus and genome-wide Phi-ST from clustered loci.
//!
//! This serves as the core library implementation for the `phist` CLI, but can also be used as a
//! free-standing library.
//!
//! # Overview
//!
//! Loci are read from a cluster file as a [`Locus`] of allele sequences, where each allele
//! belongs to the population of its sample. For each locus, Hamming [`Distances`] between all
//! non-missing alleles are summed within and among populations, which gives an analysis of
//! molecular variance and the [`PhiSt`] statistic, as well as nucleotide diversity. Sums rather
//! than statistics are added over loci into an [`Aggregate`], from which genome-wide Phi-ST is
//! estimated once at the end.
//!
//! # Example
//!
//! ```
//! use phist_core::{
//!     input::{locus::{Allele, Sequence}, sample::population::Id},
//!     Aggregate, Calculator, Locus, PhiSt,
//! };
//!
//! // Two populations with two alleles each, completely diverged
//! let alleles = [(0, "AA"), (0, "AA"), (1, "TT"), (1, "TT")]
//!     .into_iter()
//!     .map(|(population, sequence)| Allele::new(Id(population), Sequence::from(sequence)))
//!     .collect();
//! let locus = Locus::new("1", alleles);
//!
//! let stats = Calculator::new(2).calculate(&locus, 0);
//! assert_eq!(stats.global(), PhiSt(1.));
//!
//! let mut aggregate = Aggregate::new(2);
//! aggregate.add(&stats);
//! assert_eq!(aggregate.summarize().global, PhiSt(1.));
//! ```

#[cfg(test)]
#[macro_use]
pub(crate) mod approx;

pub mod aggregate;
pub use aggregate::{Aggregate, Summary};

pub mod distance;
pub use distance::{Comparison, Distances, Ssd};

pub mod input;
pub use input::{Input, Locus};

pub mod report;

pub mod stat;
pub use stat::{Calculator, LocusStatistics, PhiSt};
