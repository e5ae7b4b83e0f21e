//! Abstract-operation SMT encoding for the tTensor translation validator
//!
//! Bit-precise IEEE-754 reasoning does not scale to whole tensor kernels,
//! so tTensor's equivalence checker encodes numeric operations through
//! uninterpreted functions constrained by a small set of axioms:
//! commutativity by symmetrization, IEEE special-value rewrites layered on
//! top of an opaque core, and an optional associativity treatment for
//! reductions. Any equivalence proven under this encoding holds under IEEE
//! semantics, modulo the associativity knob the caller opts into.
//!
//! The crate exposes one engine object, [`AbstractOps`]. The driver
//! constructs it once per verification session, encodes scalar additions
//! and multiplications, sums, and dot products through it, and finally
//! (when floating-point addition was declared associative) asserts the
//! side-condition from [`AbstractOps::fp_associative_precondition`]
//! alongside the main query. Formulas are [`smt_ir`] terms; this layer
//! never talks to a solver itself.

pub mod config;
pub mod engine;
pub mod error;

mod precond;
mod reduce;
mod scalar;

pub use config::*;
pub use engine::*;
pub use error::*;
