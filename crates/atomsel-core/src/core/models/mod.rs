//! # Core Models Module
//!
//! Data structures for the atom records produced by the readers and the residue
//! views layered on top of them.
//!
//! ## Key Components
//!
//! - [`atom`] - The [`Atom`](atom::Atom) record and the [`ResidueNamed`](atom::ResidueNamed) trait
//! - [`field`] - The closed [`Field`](field::Field) enumeration and its typed accessors
//! - [`residue`] - Non-copying [`Residue`](residue::Residue) views and the grouping iterator
//!
//! ## Usage
//!
//! ```ignore
//! use atomsel::core::models::residue::residues;
//!
//! for residue in residues(&atoms) {
//!     println!("{} {} has {} atoms", residue.name(), residue.residue_sequence_number(), residue.len());
//! }
//! ```

pub mod atom;
pub mod field;
pub mod residue;
