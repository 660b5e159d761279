//! Samples and their population assignment.
//!
//! Samples are read from a whitespace-delimited sample info file with a single header line,
//! where each following line describes one sample. The first field is the sample name and the
//! fifth field is its population; the population `-9` marks a sample as unassigned.

use std::{fmt, fs::File, io, path::Path};

pub mod population;
pub use population::{Population, Populations};

const NAME_FIELD: usize = 0;
const POPULATION_FIELD: usize = 4;

/// A sample.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Sample {
    name: String,
    population: Population,
}

impl Sample {
    /// Creates a new sample.
    pub fn new<S>(name: S, population: Population) -> Self
    where
        S: ToString,
    {
        Self {
            name: name.to_string(),
            population,
        }
    }

    /// Returns the sample name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the sample population.
    pub fn population(&self) -> &Population {
        &self.population
    }
}

/// The ordered list of samples, in the order their alleles appear in the cluster file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct List {
    samples: Vec<Sample>,
    ids: Vec<Option<population::Id>>,
    populations: Populations,
}

impl List {
    /// Reads a sample list from a sample info file.
    pub fn from_path<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::PathDoesNotExist {
                path: path.to_path_buf(),
            });
        }

        Self::from_reader(File::open(path)?)
    }

    /// Reads a sample list from a reader in the sample info format.
    pub fn from_reader<R>(mut reader: R) -> Result<Self, Error>
    where
        R: io::Read,
    {
        let mut s = String::new();
        let _ = reader.read_to_string(&mut s)?;

        Self::from_str(&s)
    }

    fn from_str(s: &str) -> Result<Self, Error> {
        let samples = s
            .lines()
            .enumerate()
            .skip(1)
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                let fields = line.split_whitespace().collect::<Vec<_>>();

                match fields.get(POPULATION_FIELD) {
                    Some(&population) => Ok(Sample::new(
                        fields[NAME_FIELD],
                        Population::from(population),
                    )),
                    None => Err(Error::MissingPopulation {
                        line: i + 1,
                        fields: fields.len(),
                    }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_samples(samples)
    }

    /// Creates a sample list from samples in cluster file order.
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self, Error> {
        if samples.is_empty() {
            return Err(Error::Empty);
        }

        let populations = Populations::from_labels(samples.iter().map(Sample::population));
        let ids = samples
            .iter()
            .map(|sample| populations.get(sample.population()))
            .collect();

        Ok(Self {
            samples,
            ids,
            populations,
        })
    }

    /// Returns an iterator over samples and their population ids, in cluster file order.
    ///
    /// Unassigned samples have no id.
    pub fn iter(&self) -> impl Iterator<Item = (&Sample, Option<population::Id>)> {
        self.samples.iter().zip(self.ids.iter().copied())
    }

    /// Returns the number of samples assigned to a population.
    pub fn included(&self) -> usize {
        self.ids.iter().filter(|id| id.is_some()).count()
    }

    /// Returns `true` if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the total number of samples, including unassigned.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns the sorted populations of the samples.
    pub fn populations(&self) -> &Populations {
        &self.populations
    }
}

/// An error associated with reading samples.
#[derive(Debug)]
pub enum Error {
    /// No samples found.
    Empty,
    /// I/O error.
    Io(io::Error),
    /// A sample line without a population field.
    MissingPopulation {
        /// The line number, starting from one.
        line: usize,
        /// The number of fields found on the line.
        fields: usize,
    },
    /// A provided path does not exist.
    PathDoesNotExist {
        /// The provided path.
        path: std::path::PathBuf,
    },
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Empty => f.write_str("empty sample info"),
            Error::Io(e) => write!(f, "{e}"),
            Error::MissingPopulation { line, fields } => write!(
                f,
                "expected population in field {} on sample info line {line}, found {fields} fields",
                POPULATION_FIELD + 1
            ),
            Error::PathDoesNotExist { path } => {
                write!(f, "path '{}' not found", path.display())
            }
        }
    }
}

impl std::error::Error for Error {}
