//! # Engine Module
//!
//! The selection query engine: it compiles query strings such as
//! `"resname ALA and name CA"` into an immutable predicate tree once, then
//! evaluates that tree against atom records with no re-parsing.
//!
//! - **Keywords** ([`selection::keywords`]) - The keyword and alias tables the compiler consults
//! - **Grammar** ([`selection::parser`]) - Tokenization and the flat `or`/`and`/`not` grammar
//! - **Predicates** ([`selection::node`]) - The compiled tree and its evaluation
//! - **Error Handling** ([`error`]) - Syntax and empty-result errors

pub mod error;
pub mod selection;
