//! Error types for the encoding engine.

use thiserror::Error;

/// Errors the encoding engine reports to the driver.
///
/// Every variant signals misuse by the caller or an abstraction that ran
/// out of headroom; well-formed requests always produce a symbolic term,
/// and any logical inconsistency surfaces only in the downstream solver
/// verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// `fp_bits` outside the representable range
    #[error("fp_bits must be between 1 and 63, got {0}")]
    InvalidFpBits(u32),

    /// No abstract values left for fresh finite magnitudes
    #[error("abstract constant pool exhausted after {capacity} finite magnitudes; raise fp_bits")]
    ConstantPoolExhausted { capacity: u64 },

    /// Multiset encoding unrolls the array, so the length must be a literal
    #[error("multiset sum requires a literal array length")]
    NonLiteralLength,

    /// Associativity precondition requested in a non-associative session
    #[error("associative precondition requested while fp addition is not associative")]
    NotAssociative,

    /// Operand sort does not match what the operation expects
    #[error("sort mismatch: expected {expected}, found {found}")]
    SortMismatch { expected: String, found: String },
}

/// Result type alias for encoding operations.
pub type EncodeResult<T> = Result<T, EncodeError>;
