//! Clustered loci.

use std::{fmt, io};

pub mod reader;
pub use reader::Reader;

use super::sample::population;

/// The sequence marking a missing allele.
pub const MISSING: &[u8] = b".";

/// The text starting the first field of a cluster header line.
pub(crate) const CLUSTER_TAG: &str = "Clstr";

/// An allele sequence.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Sequence(Box<[u8]>);

impl Sequence {
    /// Returns the bases of the sequence.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns `true` if the sequence is the missing sentinel.
    pub fn is_missing(&self) -> bool {
        &self.0[..] == MISSING
    }

    /// Returns the length of the sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the sequence has no bases.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of differing positions between two sequences.
    ///
    /// Sequences of unequal length are compared only up to the length of the shorter sequence.
    pub fn hamming(&self, other: &Self) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .filter(|(a, b)| a != b)
            .count()
    }
}

impl From<&str> for Sequence {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().into())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// A single allele copy of an included sample.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Allele {
    population: population::Id,
    sequence: Sequence,
}

impl Allele {
    /// Creates a new allele.
    pub fn new(population: population::Id, sequence: Sequence) -> Self {
        Self {
            population,
            sequence,
        }
    }

    /// Returns `true` if the allele sequence is missing.
    pub fn is_missing(&self) -> bool {
        self.sequence.is_missing()
    }

    /// Returns the population of the sample carrying the allele.
    pub fn population(&self) -> population::Id {
        self.population
    }

    /// Returns the allele sequence.
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }
}

/// A locus, holding two alleles for each sample assigned to a population.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Locus {
    id: String,
    alleles: Vec<Allele>,
}

impl Locus {
    /// Creates a new locus.
    pub fn new<S>(id: S, alleles: Vec<Allele>) -> Self
    where
        S: ToString,
    {
        Self {
            id: id.to_string(),
            alleles,
        }
    }

    /// Returns the alleles of the locus.
    pub fn alleles(&self) -> &[Allele] {
        &self.alleles
    }

    /// Returns the cluster id of the locus.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the length of the locus.
    ///
    /// This is the length of the first non-missing allele, or zero if all alleles are missing.
    pub fn length(&self) -> usize {
        self.alleles
            .iter()
            .find(|allele| !allele.is_missing())
            .map(|allele| allele.sequence().len())
            .unwrap_or(0)
    }
}

/// Counts the number of clusters in a reader in the cluster format.
pub fn count_clusters<R>(reader: R) -> io::Result<usize>
where
    R: io::BufRead,
{
    reader.lines().try_fold(0, |count, line| {
        let is_header = line?
            .split_whitespace()
            .next()
            .map_or(false, |field| field.contains(CLUSTER_TAG));

        Ok(count + usize::from(is_header))
    })
}

/// An error associated with parsing a locus.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// A cluster header line without cluster id.
    MissingClusterId {
        /// The line number, starting from one.
        line: usize,
    },
    /// A line where a cluster header was expected.
    MissingClusterHeader {
        /// The line number, starting from one.
        line: usize,
    },
    /// An allele line without a sequence.
    MissingSequence {
        /// The cluster id.
        cluster: String,
        /// The line number, starting from one.
        line: usize,
    },
    /// The input ended in the middle of a cluster.
    Truncated {
        /// The cluster id.
        cluster: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingClusterId { line } => {
                write!(f, "missing cluster id in cluster header on line {line}")
            }
            ParseError::MissingClusterHeader { line } => {
                write!(f, "expected cluster header on line {line}")
            }
            ParseError::MissingSequence { cluster, line } => {
                write!(
                    f,
                    "missing allele sequence on line {line} in cluster '{cluster}'"
                )
            }
            ParseError::Truncated { cluster } => {
                write!(f, "input ended before all alleles of cluster '{cluster}'")
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for io::Error {
    fn from(e: ParseError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use population::Id;

    fn allele(population: usize, sequence: &str) -> Allele {
        Allele::new(Id(population), Sequence::from(sequence))
    }

    #[test]
    fn test_hamming() {
        assert_eq!(Sequence::from("ACGT").hamming(&Sequence::from("ACGT")), 0);
        assert_eq!(Sequence::from("ACGT").hamming(&Sequence::from("TCGA")), 2);
    }

    #[test]
    fn test_hamming_unequal_lengths_compares_common_prefix() {
        assert_eq!(Sequence::from("ACGTTT").hamming(&Sequence::from("ACGA")), 1);
        assert_eq!(Sequence::from("A").hamming(&Sequence::from("TTTT")), 1);
    }

    #[test]
    fn test_missing() {
        assert!(Sequence::from(".").is_missing());
        assert!(!Sequence::from("..").is_missing());
        assert!(!Sequence::from("N").is_missing());
    }

    #[test]
    fn test_length_from_first_non_missing() {
        let locus = Locus::new(
            "1",
            vec![allele(0, "."), allele(0, "ACG"), allele(1, "ACGTT")],
        );

        assert_eq!(locus.length(), 3);
    }

    #[test]
    fn test_length_all_missing() {
        let locus = Locus::new("1", vec![allele(0, "."), allele(1, ".")]);

        assert_eq!(locus.length(), 0);
    }

    #[test]
    fn test_count_clusters() {
        let s = "Clstr 1\nheader\nind1 AC\nind1 AC\nClstr 2\nheader\nind1 .\nind1 .\n";

        assert_eq!(count_clusters(s.as_bytes()).unwrap(), 2);
        assert_eq!(count_clusters(&b""[..]).unwrap(), 0);
    }
}
