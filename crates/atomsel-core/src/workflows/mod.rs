//! # Workflows Module
//!
//! High-level entry points that tie the readers in [`crate::core::io`] to the
//! selection engine in [`crate::engine`].
//!
//! - **Loading** ([`load`]) - Read a structure with a query applied during the single
//!   parse pass, or read a batch of independent structures with one compiled query.
//! - **Post-hoc selection** ([`select`]) - Filter an already loaded atom list.
//!
//! With the `parallel` feature both batch loading and post-hoc selection run on the
//! rayon thread pool.

pub mod load;
pub mod select;
