use std::{num::NonZeroUsize, path::PathBuf};

use anyhow::Error;

use clap::Parser;

mod runner;
use runner::Runner;

/// Calculate locus-by-locus and genome-wide Phi-ST.
///
/// For each cluster, Phi-ST is calculated between each pair of populations and among all
/// populations, along with nucleotide diversity within each population and pooled. A final line
/// gives genome-wide estimates based on sums over all clusters.
#[derive(Debug, Parser)]
pub struct Calc {
    /// Input cluster file.
    ///
    /// If no file is provided, stdin will be used.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Sample info file.
    ///
    /// Whitespace-delimited file with a header line, and one line per sample in the same order as
    /// the samples in the cluster file. The fifth column gives the population of the sample.
    /// Samples with population -9 are skipped.
    #[arg(short = 's', long, value_name = "FILE")]
    sample_info: PathBuf,

    /// Output path.
    ///
    /// If no path is given, the table will be written to stdout.
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Precision to use when printing statistics.
    #[arg(short = 'p', long, default_value_t = 6, value_name = "INT")]
    precision: usize,

    /// Delimiter between columns.
    #[arg(short = 'd', long, default_value_t = '\t', value_name = "CHAR")]
    delimiter: char,

    /// Number of permutations for testing Phi-ST among all populations.
    ///
    /// By default, no permutation test is performed. If set, a column with the proportion of
    /// permutations giving at least the observed Phi-ST is added after Phi-ST among all
    /// populations.
    #[arg(short = 'n', long, default_value_t = 0, value_name = "INT")]
    permutations: usize,

    /// Seed for permutation tests.
    ///
    /// If unset, a random seed will be used and logged.
    #[arg(long, value_name = "INT")]
    seed: Option<u64>,

    /// Number of threads to use.
    #[arg(short = 't', long, default_value_t = NonZeroUsize::MIN, value_name = "INT")]
    threads: NonZeroUsize,
}

impl Calc {
    pub fn run(self) -> Result<(), Error> {
        let mut runner = Runner::try_from(self)?;

        runner.run()
    }
}
