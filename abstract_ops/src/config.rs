//! Session configuration and usage reporting.

use serde::{Deserialize, Serialize};

/// How dot products are abstracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DotAbstraction {
    /// A dot product is a single opaque function of its two operand arrays.
    FullyAbstract,

    /// A dot product lowers to a sum over elementwise products, reusing the
    /// scalar and reduction encodings.
    SumMul,
}

/// Abstraction parameters for one verification session.
///
/// These decide how much structure the solver gets to see and are fixed for
/// the lifetime of an [`AbstractOps`](crate::AbstractOps) engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abstraction {
    /// Abstraction level for floating-point dot products
    pub fp_dot: DotAbstraction,

    /// Abstraction level for integer dot products
    pub int_dot: DotAbstraction,

    /// Treat floating-point addition as associative. Sound only when the
    /// source program is known to be permutation-tolerant.
    pub fp_add_associative: bool,

    /// Requested width of the abstract float encoding. The value field
    /// keeps `fp_bits - 1` bits (one bit when `fp_bits` is 1), and sign and
    /// type bits are added on top.
    pub fp_bits: u32,
}

/// Options that may change solver time but never what can be proven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncodingOptions {
    /// Encode associative float sums through finite bags instead of the
    /// lambda-based scheme. Requires literal reduction lengths.
    pub use_multiset: bool,
}

/// Which abstract operations a session actually exercised.
///
/// The driver reads this to skip asserting axioms for operations that never
/// appeared in the encoded program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsedOps {
    pub fp_add: bool,
    pub fp_mul: bool,
    pub fp_sum: bool,
    pub fp_dot: bool,
    pub int_sum: bool,
    pub int_dot: bool,
}
