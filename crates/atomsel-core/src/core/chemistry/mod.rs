//! Residue chemistry knowledge consulted by the selection engine.
//!
//! [`table`] holds the immutable residue chemistry table (category, polarity,
//! charge, masses) and the classification predicates built on it. [`identifiers`]
//! holds the fixed name sets that do not go through the table, such as water
//! residue names and backbone atom names.

pub mod identifiers;
pub mod table;
