//! Symbolic term IR for the tTensor translation validator
//!
//! This crate is the term layer the abstract-operation encoder builds its
//! formulas in. It plays the role a solver binding would otherwise play:
//! sorts, expressions, uninterpreted-function declarations, a structural
//! simplifier, and an SMT-LIB 2 printer for handing finished formulas to an
//! external solver process.
//!
//! The IR is designed to be:
//! - Backend-agnostic: any SMT-LIB 2 solver can consume the printed form
//! - Structural: equality and ordering are defined on the term graph, so
//!   encoders can canonicalize commutative operations syntactically
//! - Serializable for proof caching

pub mod decl;
pub mod expr;
pub mod simplify;
pub mod smtlib;
pub mod sort;

pub use decl::*;
pub use expr::*;
pub use sort::*;
