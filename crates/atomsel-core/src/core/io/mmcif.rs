use super::config::ReaderConfig;
use super::fields::{ColumnTable, DecodeError, assign};
use super::memory::{MemoryProbe, SystemMemory};
use super::traits::{AtomFilter, ParseReport, StopReason, StructureReader};
use crate::core::models::atom::Atom;
use crate::core::models::field::Field;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::{debug, instrument, trace, warn};

const COLUMN_MARKER: &str = "_atom_site.";
const RECORD_MARKER_COLUMN: &str = "group_PDB";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: DecodeError },
    #[error("Atom record on line {line} appears before any '_atom_site.' column declaration")]
    MissingHeader { line: usize },
    #[error("No matching atoms ({decoded} atom records decoded)")]
    NoMatchingAtoms { decoded: usize },
    #[error("Stopped by low memory after {lines_read} lines, before any atom was read")]
    MemoryPressure { lines_read: usize },
}

/// Ordinal → field lookup built from the declared columns of one block.
#[derive(Debug)]
struct Layout {
    slots: Vec<Option<Field>>,
    skip_marker: bool,
}

impl Layout {
    fn new(header: &[String], columns: &ColumnTable) -> Self {
        Self {
            slots: header.iter().map(|c| columns.field_for(c)).collect(),
            skip_marker: !header.iter().any(|c| c == RECORD_MARKER_COLUMN),
        }
    }

    fn slot(&self, ordinal: usize) -> Option<Field> {
        self.slots.get(ordinal).copied().flatten()
    }
}

/// Residue identity of the last decoded record.
#[derive(Debug, Default)]
struct ResidueKey {
    residue_name: String,
    residue_sequence_number: i32,
    chain_id: String,
    model_number: i32,
}

impl ResidueKey {
    fn of(atom: &Atom) -> Self {
        Self {
            residue_name: atom.residue_name.clone(),
            residue_sequence_number: atom.residue_sequence_number,
            chain_id: atom.chain_id.clone(),
            model_number: atom.model_number,
        }
    }

    fn matches(&self, atom: &Atom) -> bool {
        self.residue_sequence_number == atom.residue_sequence_number
            && self.model_number == atom.model_number
            && self.residue_name == atom.residue_name
            && self.chain_id == atom.chain_id
    }
}

/// Streaming reader for `_atom_site` records in mmCIF files.
///
/// The column layout is discovered from the `_atom_site.<column>` declarations and
/// mapped onto [`Atom`] fields through a [`ColumnTable`]. Records are decoded in a
/// single pass; an optional filter is applied as each record is decoded, so
/// rejected atoms are never stored.
pub struct MmcifReader<M = SystemMemory> {
    config: ReaderConfig,
    columns: ColumnTable,
    probe: M,
}

impl MmcifReader<SystemMemory> {
    pub fn new(config: ReaderConfig) -> Self {
        Self {
            config,
            columns: ColumnTable::default(),
            probe: SystemMemory::new(),
        }
    }
}

impl Default for MmcifReader<SystemMemory> {
    fn default() -> Self {
        Self::new(ReaderConfig::default())
    }
}

impl<M: MemoryProbe> MmcifReader<M> {
    /// Replaces the column table used to map declared columns to fields.
    pub fn with_columns(mut self, columns: ColumnTable) -> Self {
        self.columns = columns;
        self
    }

    /// Replaces the memory probe consulted by the memory guard.
    pub fn with_probe<N: MemoryProbe>(self, probe: N) -> MmcifReader<N> {
        MmcifReader {
            config: self.config,
            columns: self.columns,
            probe,
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    fn under_memory_pressure(&self) -> bool {
        match self.probe.available_fraction() {
            Some(available) if available < self.config.memory_headroom => {
                warn!(
                    "Available memory ({:.1}%) is below the configured headroom ({:.1}%); returning the atoms read so far.",
                    available * 100.0,
                    self.config.memory_headroom * 100.0
                );
                true
            }
            _ => false,
        }
    }
}

impl<M: MemoryProbe> StructureReader for MmcifReader<M> {
    type Error = ParseError;

    #[instrument(level = "debug", skip_all, fields(max_atoms = ?self.config.max_atoms))]
    fn read_from(
        &self,
        reader: &mut dyn BufRead,
        filter: Option<&dyn AtomFilter>,
    ) -> Result<ParseReport, Self::Error> {
        let mut header: Vec<String> = Vec::new();
        let mut layout: Option<Layout> = None;
        let mut atoms: Vec<Atom> = Vec::new();
        let mut decoded = 0usize;
        let mut lines_read = 0usize;
        let mut group_id = 0usize;
        let mut last_residue: Option<ResidueKey> = None;
        let mut stop = StopReason::EndOfInput;

        for line_res in reader.lines() {
            let line = line_res?;
            lines_read += 1;
            let line_num = lines_read;

            if line_num % self.config.memory_check_interval.max(1) == 0
                && self.under_memory_pressure()
            {
                stop = StopReason::MemoryPressure;
                break;
            }

            let content = line.trim_start();
            if let Some(column) = content.strip_prefix(COLUMN_MARKER) {
                if layout.take().is_some() {
                    header.clear();
                }
                let column = column.split_whitespace().next().unwrap_or_default();
                trace!(ordinal = header.len() + 1, column, "Column declared");
                header.push(column.to_string());
                continue;
            }

            let mut tokens = content.split_whitespace();
            if !matches!(tokens.clone().next(), Some("ATOM") | Some("HETATM")) {
                continue;
            }
            if header.is_empty() {
                return Err(ParseError::MissingHeader { line: line_num });
            }
            let layout = layout.get_or_insert_with(|| {
                let layout = Layout::new(&header, &self.columns);
                debug!(
                    "Discovered {} columns ({} mapped) before line {}.",
                    header.len(),
                    layout.slots.iter().flatten().count(),
                    line_num
                );
                layout
            });
            if layout.skip_marker {
                tokens.next();
            }

            let mut atom = Atom::default();
            for (ordinal, token) in tokens.enumerate() {
                if let Some(field) = layout.slot(ordinal) {
                    assign(&mut atom, field, &header[ordinal], token).map_err(|kind| {
                        ParseError::Parse {
                            line: line_num,
                            kind,
                        }
                    })?;
                }
            }
            decoded += 1;
            atom.index_in_source = decoded;

            if !last_residue.as_ref().is_some_and(|key| key.matches(&atom)) {
                group_id += 1;
                last_residue = Some(ResidueKey::of(&atom));
            }
            atom.residue_group_id = group_id;

            if filter.is_none_or(|f| f.matches(&atom)) {
                atom.index = atoms.len() + 1;
                atoms.push(atom);
                if self.config.max_atoms == Some(atoms.len()) {
                    stop = StopReason::AtomLimit;
                    break;
                }
            }
        }

        debug!(
            "Read {} lines: {} records decoded, {} atoms kept, stopped by {:?}.",
            lines_read,
            decoded,
            atoms.len(),
            stop
        );

        if atoms.is_empty() {
            return Err(match stop {
                StopReason::MemoryPressure => ParseError::MemoryPressure { lines_read },
                _ => ParseError::NoMatchingAtoms { decoded },
            });
        }
        Ok(ParseReport {
            atoms,
            stop,
            decoded,
            lines_read,
        })
    }
}
