//! Writing locus and genome-wide statistics as a table.
//!
//! The table has a header line, followed by one line per locus, and finally one line of
//! genome-wide statistics with the id `ALL`. Columns are the cluster id, the locus length, Phi-ST
//! for each pair of populations, Phi-ST among all populations, optionally a permutation p-value
//! of the latter, nucleotide diversity for each population, and the pooled nucleotide diversity.
//! Populations are ordered by name. Undefined values are written as `NA`.

use std::{fmt, io};

use crate::{
    aggregate::Summary,
    input::sample::Populations,
    stat::{Diversity, LocusStatistics, PhiSt},
};

/// The id of the genome-wide line.
pub const ALL_LOCI: &str = "ALL";

const ALL_POPULATIONS: &str = "All_Pops";
const MISSING_VALUE: &str = "NA";

/// A builder to write a table.
#[derive(Debug)]
pub struct Builder {
    delimiter: char,
    precision: usize,
    p_values: bool,
}

impl Builder {
    /// Builds a table writer and writes the header.
    pub fn build<W>(self, mut writer: W, populations: &Populations) -> io::Result<Writer<W>>
    where
        W: io::Write,
    {
        write_header(&mut writer, populations, self.delimiter, self.p_values)?;

        Ok(Writer {
            inner: writer,
            delimiter: self.delimiter,
            precision: self.precision,
            p_values: self.p_values,
        })
    }

    /// Set delimiter between columns.
    ///
    /// If unset, a tab will be used.
    pub fn set_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to include a column of permutation p-values.
    ///
    /// If unset, no p-values are written.
    pub fn set_p_values(mut self, p_values: bool) -> Self {
        self.p_values = p_values;
        self
    }

    /// Set precision.
    ///
    /// If unset, a precision of six digits will be used.
    pub fn set_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            precision: 6,
            p_values: false,
        }
    }
}

fn write_header<W>(
    writer: &mut W,
    populations: &Populations,
    delimiter: char,
    p_values: bool,
) -> io::Result<()>
where
    W: io::Write,
{
    let mut names = vec![String::from("Cluster"), String::from("Seq_len")];
    names.extend(populations.pair_labels());
    names.push(String::from(ALL_POPULATIONS));
    if p_values {
        names.push(format!("{ALL_POPULATIONS}_p"));
    }
    names.extend(populations.iter().map(String::from));
    names.push(String::from(ALL_POPULATIONS));

    writeln!(writer, "{}", names.join(&delimiter.to_string()))
}

/// A table writer.
#[derive(Debug)]
pub struct Writer<W> {
    inner: W,
    delimiter: char,
    precision: usize,
    p_values: bool,
}

impl<W> Writer<W>
where
    W: io::Write,
{
    /// Flushes the inner writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    /// Returns the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Writes the statistics of a locus.
    pub fn write_locus(&mut self, stats: &LocusStatistics) -> io::Result<()> {
        self.write_row(Row {
            id: stats.id(),
            length: stats.length() as u64,
            pairwise: stats.pairwise(),
            global: stats.global(),
            p_value: stats.p_value(),
            diversity: stats.diversity(),
        })
    }

    /// Writes the genome-wide statistics.
    ///
    /// The p-value column, if any, is left empty.
    pub fn write_summary(&mut self, summary: &Summary) -> io::Result<()> {
        self.write_row(Row {
            id: ALL_LOCI,
            length: summary.length,
            pairwise: &summary.pairwise,
            global: summary.global,
            p_value: None,
            diversity: &summary.diversity,
        })
    }

    fn write_row(&mut self, row: Row<'_>) -> io::Result<()> {
        let precision = self.precision;
        let d = self.delimiter;

        write!(self.inner, "{}{d}{}", row.id, row.length)?;

        for phi_st in row.pairwise {
            write!(self.inner, "{d}{:.precision$}", phi_st.0)?;
        }
        write!(self.inner, "{d}{:.precision$}", row.global.0)?;

        if self.p_values {
            match row.p_value {
                Some(p) => write!(self.inner, "{d}{p:.precision$}")?,
                None => write!(self.inner, "{d}")?,
            }
        }

        for &diversity in &row.diversity.populations {
            write!(self.inner, "{d}{}", Value(diversity, precision))?;
        }
        writeln!(self.inner, "{d}{}", Value(row.diversity.pooled, precision))
    }
}

struct Row<'a> {
    id: &'a str,
    length: u64,
    pairwise: &'a [PhiSt],
    global: PhiSt,
    p_value: Option<f64>,
    diversity: &'a Diversity,
}

struct Value(Option<f64>, usize);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Value(value, precision) = *self;

        match value {
            Some(v) => write!(f, "{v:.precision$}"),
            None => f.write_str(MISSING_VALUE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        aggregate::Aggregate,
        distance::tests::locus,
        input::sample::{Population, Populations},
        stat::{Calculator, Permutation},
    };

    fn populations(names: &[&str]) -> Populations {
        let names = names.iter().map(|&s| Population::from(s)).collect::<Vec<_>>();
        Populations::from_labels(&names)
    }

    fn write(builder: Builder, populations: &Populations, calculator: &Calculator) -> String {
        let locus = locus(&[(0, "AA"), (0, "AT"), (1, "TT"), (1, "TA")]);
        let stats = calculator.calculate(&locus, 0);

        let mut aggregate = Aggregate::new(populations.len());
        aggregate.add(&stats);

        let mut writer = builder.build(Vec::new(), populations).unwrap();
        writer.write_locus(&stats).unwrap();
        writer.write_summary(&aggregate.summarize()).unwrap();

        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_write_two_populations() {
        let populations = populations(&["b", "a"]);
        let calculator = Calculator::new(2);

        let s = write(
            Builder::default().set_precision(3),
            &populations,
            &calculator,
        );

        assert_eq!(
            s,
            "Cluster\tSeq_len\ta-b\tAll_Pops\ta\tb\tAll_Pops\n\
            test\t2\t0.333\t0.333\t0.250\t0.250\t0.500\n\
            ALL\t2\t0.333\t0.333\t0.250\t0.250\t0.500\n"
        );
    }

    #[test]
    fn test_write_missing_population_and_p_values() {
        let populations = populations(&["x", "y", "z"]);
        let calculator = Calculator::new(3).set_permutation(Permutation::new(10, 1));

        let s = write(
            Builder::default()
                .set_delimiter(',')
                .set_precision(2)
                .set_p_values(true),
            &populations,
            &calculator,
        );

        let lines = s.lines().collect::<Vec<_>>();
        assert_eq!(
            lines[0],
            "Cluster,Seq_len,x-y,x-z,y-z,All_Pops,All_Pops_p,x,y,z,All_Pops"
        );

        let locus = lines[1].split(',').collect::<Vec<_>>();
        assert_eq!(locus[..5], ["test", "2", "0.33", "1.00", "1.00"]);
        assert_eq!(locus[7..], ["0.25", "0.25", "NA", "0.50"]);

        let all = lines[2].split(',').collect::<Vec<_>>();
        assert_eq!(all[0], "ALL");
        assert_eq!(all[6], "");
        assert_eq!(all[9], "NA");
    }
}
