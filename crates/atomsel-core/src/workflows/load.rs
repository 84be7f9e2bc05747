use crate::core::io::config::{ConfigError, ReaderConfig};
use crate::core::io::mmcif::{MmcifReader, ParseError};
use crate::core::io::traits::{AtomFilter, ByteSource, ParseReport, StructureReader};
use crate::engine::error::SelectionError;
use crate::engine::selection::Selection;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid selection: {source}")]
    Selection {
        #[from]
        source: SelectionError,
    },

    #[error("Invalid reader configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Failed to read structure from '{origin}': {source}")]
    Parse { origin: String, source: ParseError },
}

/// Reads one mmCIF structure, keeping only the atoms selected by `query`.
///
/// The query is compiled before the source is opened and applied while the file
/// is decoded, so rejected atoms are never stored. `None` keeps every atom.
///
/// # Errors
///
/// Returns [`LoadError::Config`] for invalid limits, [`LoadError::Selection`] for an
/// invalid query, and [`LoadError::Parse`] for I/O or decoding failures, including
/// a read that emits no atoms.
#[instrument(skip_all, name = "load_structure", fields(source = %source.describe()))]
pub fn load_structure<S>(
    source: &S,
    query: Option<&str>,
    config: &ReaderConfig,
) -> Result<ParseReport, LoadError>
where
    S: ByteSource + ?Sized,
{
    config.validate()?;
    let selection = query.map(Selection::parse).transpose()?;
    read_one(source, selection.as_ref(), config)
}

/// Reads several independent structures with one compiled query.
///
/// With the `parallel` feature the sources are read on the rayon pool. Reports are
/// returned in the order of `sources`; the first failure aborts the batch.
#[instrument(skip_all, name = "load_many", fields(sources = sources.len()))]
pub fn load_many<S>(
    sources: &[S],
    query: Option<&str>,
    config: &ReaderConfig,
) -> Result<Vec<ParseReport>, LoadError>
where
    S: ByteSource + Sync,
{
    config.validate()?;
    let selection = query.map(Selection::parse).transpose()?;

    #[cfg(not(feature = "parallel"))]
    let iterator = sources.iter();

    #[cfg(feature = "parallel")]
    let iterator = sources.par_iter();

    let results: Vec<Result<ParseReport, LoadError>> = iterator
        .map(|source| read_one(source, selection.as_ref(), config))
        .collect();

    let reports = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    info!(
        structures = reports.len(),
        atoms = reports.iter().map(|r| r.atoms.len()).sum::<usize>(),
        "Batch load finished."
    );
    Ok(reports)
}

fn read_one<S>(
    source: &S,
    selection: Option<&Selection<'_>>,
    config: &ReaderConfig,
) -> Result<ParseReport, LoadError>
where
    S: ByteSource + ?Sized,
{
    let reader = MmcifReader::new(config.clone());
    let filter = selection.map(|s| s as &dyn AtomFilter);
    let report = reader
        .read_source(source, filter)
        .map_err(|e| LoadError::Parse {
            origin: source.describe(),
            source: e,
        })?;

    if report.is_partial() {
        warn!(
            source = %source.describe(),
            atoms = report.atoms.len(),
            "Structure was only partially read."
        );
    }
    info!(
        source = %source.describe(),
        atoms = report.atoms.len(),
        decoded = report.decoded,
        stop = ?report.stop,
        "Structure loaded."
    );
    Ok(report)
}
