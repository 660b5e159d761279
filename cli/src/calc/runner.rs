use std::{
    fs::File,
    io::{self, BufWriter},
};

use anyhow::{Context, Error};

use rayon::prelude::*;

use phist_core::{
    input::{locus, sample},
    report,
    stat::Permutation,
    Aggregate, Calculator, Input, Locus, LocusStatistics,
};

use super::Calc;

const BATCH_SIZE: usize = 1024;

pub struct Runner {
    reader: locus::Reader<phist_core::input::Reader>,
    writer: report::Writer<Box<dyn io::Write>>,
    calculator: Calculator,
    aggregate: Aggregate,
    pool: Option<rayon::ThreadPool>,
    progress: Progress,
    degenerate: Degenerate,
}

impl Runner {
    pub fn run(&mut self) -> Result<(), Error> {
        let mut batch = Vec::with_capacity(BATCH_SIZE);

        loop {
            batch.clear();
            while batch.len() < BATCH_SIZE {
                match self.reader.read_locus().into_result() {
                    Ok(Some(locus)) => batch.push(locus),
                    Ok(None) => break,
                    Err(e) => {
                        return Err(Error::from(e).context(format!(
                            "failed to read cluster {}",
                            self.progress.done + batch.len() + 1
                        )))
                    }
                }
            }

            if batch.is_empty() {
                break;
            }

            for stats in self.calculate(&batch) {
                self.degenerate.check(&stats);
                self.aggregate.add(&stats);
                self.writer.write_locus(&stats)?;
                self.progress.tick();
            }
        }

        let summary = self.aggregate.summarize();
        self.writer.write_summary(&summary)?;
        self.writer.flush()?;

        self.degenerate.summarize();
        log::info!(
            "Finished {} clusters with total length {}.",
            self.aggregate.loci(),
            summary.length
        );

        Ok(())
    }

    fn calculate(&self, batch: &[Locus]) -> Vec<LocusStatistics> {
        let calculator = &self.calculator;
        let offset = self.progress.done as u64;
        let calculate = |(i, locus): (usize, &Locus)| calculator.calculate(locus, offset + i as u64);

        match &self.pool {
            Some(pool) => pool.install(|| batch.par_iter().enumerate().map(calculate).collect()),
            None => batch.iter().enumerate().map(calculate).collect(),
        }
    }
}

impl TryFrom<Calc> for Runner {
    type Error = Error;

    fn try_from(args: Calc) -> Result<Self, Self::Error> {
        let samples = sample::List::from_path(&args.sample_info).with_context(|| {
            format!(
                "failed to read sample info from '{}'",
                args.sample_info.display()
            )
        })?;

        let populations = samples.populations();
        log::info!(
            "Found {} samples in {} populations ({}), skipping {} samples with population {}.",
            samples.included(),
            populations.len(),
            populations.iter().collect::<Vec<_>>().join(", "),
            samples.len() - samples.included(),
            sample::population::UNASSIGNED,
        );
        if populations.len() < 2 {
            log::warn!(
                "Found fewer than two populations, Phi-ST will be 1 for all clusters \
                and genome-wide."
            );
        }

        let input = Input::new(args.input)?;
        let clusters = input.count_clusters()?;
        if let Some(clusters) = clusters {
            log::info!("Found {clusters} clusters.");
        }
        let reader = input.open().with_context(|| match input.as_path() {
            Some(path) => format!("failed to open cluster file '{}'", path.display()),
            None => String::from("failed to open stdin"),
        })?;

        let seed = args.seed.unwrap_or_else(rand::random);
        let permutation = Permutation::new(args.permutations, seed);
        match (permutation, args.seed) {
            (Some(permutation), _) => log::info!(
                "Testing Phi-ST among all populations with {} permutations and seed {}.",
                permutation.permutations(),
                permutation.seed()
            ),
            (None, Some(_)) => log::warn!("Seed provided without permutations, ignoring seed."),
            (None, None) => (),
        }

        let output: Box<dyn io::Write> = match &args.output {
            Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
                format!("failed to create output file '{}'", path.display())
            })?)),
            None => Box::new(BufWriter::new(io::stdout().lock())),
        };
        let writer = report::Builder::default()
            .set_delimiter(args.delimiter)
            .set_precision(args.precision)
            .set_p_values(permutation.is_some())
            .build(output, populations)?;

        let pool = if args.threads.get() > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(args.threads.get())
                    .build()?,
            )
        } else {
            None
        };

        Ok(Self {
            reader: locus::Reader::new(reader, &samples),
            writer,
            calculator: Calculator::new(populations.len()).set_permutation(permutation),
            aggregate: Aggregate::new(populations.len()),
            pool,
            progress: Progress::new(clusters),
            degenerate: Degenerate::default(),
        })
    }
}

/// Progress logging, every tenth of clusters if the total is known, otherwise at fixed intervals.
#[derive(Clone, Debug)]
struct Progress {
    done: usize,
    total: Option<usize>,
    next: usize,
}

impl Progress {
    const INTERVAL: usize = 1000;

    fn new(total: Option<usize>) -> Self {
        let mut progress = Self {
            done: 0,
            total,
            next: 0,
        };
        progress.next = progress.step();
        progress
    }

    fn step(&self) -> usize {
        match self.total {
            Some(total) => (total / 10).max(1),
            None => Self::INTERVAL,
        }
    }

    fn tick(&mut self) {
        self.done += 1;

        if self.done >= self.next {
            match self.total {
                Some(total) => log::info!(
                    "Processed {} of {total} clusters (~{}%).",
                    self.done,
                    100 * self.done / total.max(1)
                ),
                None => log::info!("Processed {} clusters.", self.done),
            }

            self.next += self.step();
        }
    }
}

/// Counts of clusters where Phi-ST falls back to a convention rather than an estimate.
#[derive(Clone, Debug, Default)]
struct Degenerate {
    missing: usize,
    single_population: usize,
}

impl Degenerate {
    fn check(&mut self, stats: &LocusStatistics) {
        let populations = stats.pooled().counts.iter().filter(|&&n| n > 0).count();

        match populations {
            0 => {
                log::debug!("Cluster '{}' has no data.", stats.id());
                self.missing += 1;
            }
            1 => {
                log::debug!("Cluster '{}' has data for a single population.", stats.id());
                self.single_population += 1;
            }
            _ => (),
        }
    }

    fn summarize(&self) {
        if self.missing > 0 {
            log::info!(
                "Found {} clusters without data, with Phi-ST set to 1.",
                self.missing
            );
        }
        if self.single_population > 0 {
            log::info!(
                "Found {} clusters with data for a single population, with Phi-ST set to 1.",
                self.single_population
            );
        }
    }
}
