//! # Core Module
//!
//! The foundation layer: stateless data models, residue chemistry knowledge, and
//! structure file input.
//!
//! ## Architecture
//!
//! - **Atom and residue representation** ([`models`]) - Atom records, typed fields, and
//!   non-copying residue views
//! - **Residue chemistry** ([`chemistry`]) - The immutable chemistry table and the fixed
//!   name sets used by classification predicates
//! - **File input** ([`io`]) - The field-mapped mmCIF reader, its configuration, and the
//!   byte-source/sink seams to external collaborators

pub mod chemistry;
pub mod io;
pub mod models;
