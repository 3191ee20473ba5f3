//! Reports of a search run.

use crate::access_structure::AccessStructure;
use crate::config::CoordinatorConfig;
use crate::construction::Construction;
use crate::parameters::SchemeParameters;
use crate::validator::Violation;
use crate::Result;
use itertools::Itertools;
use ndarray::ArrayView2;
use std::fmt::{self, Display};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where a report is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// The standard output.
    Stdout,

    /// A file.
    File(PathBuf),
}

impl OutputTarget {
    /// Resolves the `--output` argument: `-` is the standard output, any
    /// other value a file path whose parent directories are created.
    ///
    /// Unless `force` is set, an existing file is never overwritten: the
    /// first free name `<stem>-<n>.<ext>` with `n >= 1` is used instead.
    pub fn resolve(path: &str, force: bool) -> Result<Self> {
        if path == "-" {
            return Ok(Self::Stdout);
        }

        let path = PathBuf::from(path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
                tracing::info!("Created output directory '{}'", parent.display());
            }
        }
        if force || !path.exists() {
            return Ok(Self::File(path));
        }
        Ok(Self::File(
            (1..)
                .map(|n| numbered(&path, n))
                .find(|p| !p.exists())
                .unwrap_or(path),
        ))
    }

    /// Opens the target for writing.
    pub fn writer(&self) -> Result<Box<dyn Write>> {
        Ok(match self {
            Self::Stdout => Box::new(io::stdout()),
            Self::File(path) => Box::new(BufWriter::new(File::create(path)?)),
        })
    }
}

impl Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn numbered(path: &Path, n: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}-{}.{}", stem, n, ext.to_string_lossy()),
        None => format!("{}-{}", stem, n),
    };
    path.with_file_name(name)
}

/// Final state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A construction passing validation.
    Valid(Construction),

    /// A construction that failed validation.
    Invalid(Construction, Violation),

    /// The search found no construction.
    Exhausted,
}

impl RunOutcome {
    /// Whether the run produced a valid construction.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// The report of a run: the parameters, the elapsed time and the outcome.
#[derive(Debug)]
pub struct Report<'a> {
    parameters: &'a SchemeParameters,

    /// The access structure as given, before taking the dual.
    input: &'a AccessStructure,
    config: &'a CoordinatorConfig,
    dual: bool,
    elapsed: Duration,
    outcome: &'a RunOutcome,
}

impl<'a> Report<'a> {
    /// Creates the report of a run. `input` is the access structure as given
    /// on the command line; with `dual` set, `parameters` holds its dual.
    pub fn new(
        parameters: &'a SchemeParameters,
        input: &'a AccessStructure,
        config: &'a CoordinatorConfig,
        dual: bool,
        elapsed: Duration,
        outcome: &'a RunOutcome,
    ) -> Self {
        Self {
            parameters,
            input,
            config,
            dual,
            elapsed,
            outcome,
        }
    }

    /// Writes the report to `target`.
    pub fn write_to(&self, target: &OutputTarget) -> Result<()> {
        let mut writer = target.writer()?;
        write!(writer, "{}", self)?;
        writer.flush()?;
        Ok(())
    }
}

fn letters(ac: &AccessStructure) -> String {
    ac.gamma_min().iter().map(|x| x.letters()).join(", ")
}

fn write_matrix(f: &mut fmt::Formatter<'_>, name: &str, m: ArrayView2<u32>) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{}:", name)?;
    for row in m.rows() {
        writeln!(f, "({})", row.iter().join(", "))?;
    }
    Ok(())
}

fn write_construction(f: &mut fmt::Formatter<'_>, construction: &Construction) -> fmt::Result {
    write_matrix(f, "generator matrix", construction.generator())?;
    write_matrix(f, "parity-check matrix", construction.parity_check())?;
    write_matrix(f, "construction matrix", construction.matrix())
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ac = self.parameters.access_structure();
        writeln!(f, "participants: {}", ac.n())?;
        writeln!(f, "share sizes: {}", self.parameters.share_sizes().iter().join(", "))?;
        writeln!(f, "field order: {}", self.parameters.field().order())?;
        writeln!(f, "secret size: {}", self.parameters.secret_size())?;
        writeln!(f, "minimal sets: {}", letters(self.input))?;
        writeln!(f, "dual: {}", self.dual)?;
        if self.dual {
            writeln!(f, "realized minimal sets: {}", letters(ac))?;
        }
        writeln!(f, "skip: {}", self.config.skip)?;
        writeln!(f, "seed: {}", self.config.seed)?;
        writeln!(f, "workers: {}", self.config.workers)?;
        writeln!(f, "queue size: {}", self.config.queue_size)?;
        writeln!(f, "elapsed: {:.3}s", self.elapsed.as_secs_f64())?;

        match self.outcome {
            RunOutcome::Valid(construction) => write_construction(f, construction),
            RunOutcome::Invalid(construction, violation) => {
                writeln!(f)?;
                writeln!(
                    f,
                    "A construction was found but failed validation: {}",
                    violation
                )?;
                write_construction(f, construction)
            }
            RunOutcome::Exhausted => {
                writeln!(f)?;
                writeln!(f, "No construction exists for these parameters.")
            }
        }
    }
}
