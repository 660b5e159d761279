//! Cluster file reader.
//!
//! A cluster starts with a header line, where the first field contains `Clstr` and the second
//! field is the cluster id, followed by a second header line. Then follow two allele lines for
//! each sample in the sample list, in sample list order, with the allele sequence in the second
//! field. Alleles of unassigned samples are read past, but not kept.

use std::io;

use crate::input::{
    sample::{self, population},
    ReadStatus,
};

use super::{Allele, Locus, ParseError, Sequence, CLUSTER_TAG};

const SEQUENCE_FIELD: usize = 1;
const PLOIDY: usize = 2;

/// A cluster file reader.
pub struct Reader<R> {
    inner: R,
    ids: Vec<Option<population::Id>>,
    buf: String,
    line: usize,
}

impl<R> Reader<R>
where
    R: io::BufRead,
{
    /// Creates a new reader for the samples in the provided sample list.
    pub fn new(inner: R, samples: &sample::List) -> Self {
        Self {
            inner,
            ids: samples.iter().map(|(_, id)| id).collect(),
            buf: String::new(),
            line: 0,
        }
    }

    /// Returns the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads the next locus in the reader.
    pub fn read_locus(&mut self) -> ReadStatus<Locus> {
        match self.read_locus_inner() {
            Ok(Some(locus)) => ReadStatus::Read(locus),
            Ok(None) => ReadStatus::Done,
            Err(e) => ReadStatus::Error(e),
        }
    }

    fn read_locus_inner(&mut self) -> io::Result<Option<Locus>> {
        loop {
            if !self.read_line()? {
                return Ok(None);
            } else if !self.buf.trim().is_empty() {
                break;
            }
        }

        let cluster = self.parse_header()?;

        if !self.read_line()? {
            return Err(ParseError::Truncated { cluster }.into());
        }

        let mut alleles = Vec::with_capacity(PLOIDY * self.ids.len());
        for i in 0..self.ids.len() {
            for _ in 0..PLOIDY {
                if !self.read_line()? {
                    return Err(ParseError::Truncated { cluster }.into());
                }

                if let Some(population) = self.ids[i] {
                    let sequence = self.parse_sequence(&cluster)?;
                    alleles.push(Allele::new(population, sequence));
                }
            }
        }

        Ok(Some(Locus::new(cluster, alleles)))
    }

    fn parse_header(&self) -> Result<String, ParseError> {
        let mut fields = self.buf.split_whitespace();

        match fields.next() {
            Some(tag) if tag.contains(CLUSTER_TAG) => fields
                .next()
                .map(String::from)
                .ok_or(ParseError::MissingClusterId { line: self.line }),
            _ => Err(ParseError::MissingClusterHeader { line: self.line }),
        }
    }

    fn parse_sequence(&self, cluster: &str) -> Result<Sequence, ParseError> {
        self.buf
            .split_whitespace()
            .nth(SEQUENCE_FIELD)
            .map(Sequence::from)
            .ok_or_else(|| ParseError::MissingSequence {
                cluster: cluster.to_string(),
                line: self.line,
            })
    }

    fn read_line(&mut self) -> io::Result<bool> {
        self.buf.clear();
        let bytes = self.inner.read_line(&mut self.buf)?;

        if bytes > 0 {
            self.line += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

impl<R> Iterator for Reader<R>
where
    R: io::BufRead,
{
    type Item = io::Result<Locus>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_locus().into_result().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use population::Id;

    use crate::input::sample::{List, Population, Sample};

    fn samples(populations: &[&str]) -> List {
        List::from_samples(
            populations
                .iter()
                .enumerate()
                .map(|(i, &p)| Sample::new(format!("ind{i}"), Population::from(p)))
                .collect(),
        )
        .unwrap()
    }

    fn read_all(s: &str, list: &List) -> io::Result<Vec<Locus>> {
        Reader::new(s.as_bytes(), list).collect()
    }

    #[test]
    fn test_read_skips_unassigned() {
        let list = samples(&["a", "-9", "b"]);
        let s = "\
Clstr 17 extra
ind depth
ind0 AC 1
ind0 AG 1
ind1 TT 1
ind1 TT 1
ind2 . 0
ind2 . 0
";

        let loci = read_all(s, &list).unwrap();

        assert_eq!(loci.len(), 1);
        let locus = &loci[0];
        assert_eq!(locus.id(), "17");
        assert_eq!(
            locus
                .alleles()
                .iter()
                .map(|a| (a.population(), a.sequence().to_string()))
                .collect::<Vec<_>>(),
            [
                (Id(0), String::from("AC")),
                (Id(0), String::from("AG")),
                (Id(1), String::from(".")),
                (Id(1), String::from(".")),
            ]
        );
    }

    #[test]
    fn test_read_multiple_with_blank_lines() {
        let list = samples(&["a"]);
        let s = "Clstr 1\nh\nind0 A\nind0 C\n\nClstr 2\nh\nind0 G\nind0 T\n\n\n";

        let loci = read_all(s, &list).unwrap();

        assert_eq!(
            loci.iter().map(Locus::id).collect::<Vec<_>>(),
            ["1", "2"]
        );
    }

    #[test]
    fn test_read_truncated() {
        let list = samples(&["a", "b"]);
        let s = "Clstr 1\nh\nind0 A\nind0 C\nind1 A\n";

        let error = read_all(s, &list).unwrap_err();

        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
        assert_eq!(
            error
                .into_inner()
                .and_then(|e| e.downcast::<ParseError>().ok())
                .map(|e| *e),
            Some(ParseError::Truncated {
                cluster: String::from("1")
            })
        );
    }

    #[test]
    fn test_read_missing_header() {
        let list = samples(&["a"]);
        let s = "ind0 A\nind0 C\n";

        assert!(read_all(s, &list).is_err());
    }

    #[test]
    fn test_read_missing_sequence() {
        let list = samples(&["a"]);
        let s = "Clstr 1\nh\nind0\nind0 C\n";

        let mut reader = Reader::new(s.as_bytes(), &list);

        assert!(matches!(reader.read_locus(), ReadStatus::Error(_)));
    }

    #[test]
    fn test_missing_sequence_of_unassigned_is_not_an_error() {
        let list = samples(&["-9", "a"]);
        let s = "Clstr 1\nh\nind0\nind0\nind1 A\nind1 C\n";

        let loci = read_all(s, &list).unwrap();

        assert_eq!(loci[0].alleles().len(), 2);
    }
}
