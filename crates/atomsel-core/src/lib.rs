//! # atomsel
//!
//! Streaming mmCIF atom loading with a compiled selection language for macromolecular
//! structures.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Atom`, residue views), the
//!   residue chemistry table, and the field-mapped mmCIF reader with its column table,
//!   limits, and memory guard.
//!
//! - **[`engine`]: The Query Core.** Compiles selection strings such as
//!   `"resname ALA and name CA"` into an immutable predicate tree that is evaluated
//!   against atoms without re-parsing.
//!
//! - **[`workflows`]: The Public API.** Loads structures with a query pushed down into
//!   the parser, and filters atom lists after the fact.
//!
//! ## Example
//!
//! ```no_run
//! use atomsel::core::io::config::ReaderConfig;
//! use atomsel::core::models::residue::residues;
//! use atomsel::workflows::load::load_structure;
//! use std::path::Path;
//!
//! let report = load_structure(Path::new("1abc.cif.gz"), Some("protein and backbone"), &ReaderConfig::default())?;
//! for residue in residues(&report.atoms) {
//!     println!("{} {}", residue.name(), residue.residue_sequence_number());
//! }
//! # Ok::<(), atomsel::workflows::load::LoadError>(())
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
