//! Provides input functionality for column-oriented structure files.
//!
//! The reader discovers each file's column layout from its header, maps columns to
//! [`Field`](crate::core::models::field::Field)s through a [`ColumnTable`](fields::ColumnTable),
//! and decodes records in a single pass with optional filter pushdown. The trait
//! seams in [`traits`] describe the byte sources the reader consumes and the sinks
//! that downstream writers implement.

pub mod config;
pub mod fields;
pub mod memory;
pub mod mmcif;
pub mod traits;
