//! The encoding engine and the abstract floating-point domain.
//!
//! An abstract float is a bit-vector `sign :: type :: value`. The type bit
//! separates finite values from infinities and NaN; reserved encodings are
//! `+0 = 0`, `-0 = sign bit`, `±∞ = type bit (plus sign)`, and
//! `NaN = type bit + 1`. Finite nonzero magnitudes are numbered as they are
//! encountered, with `1.0` pinned to value `1`, so two concrete constants
//! are abstractly equal exactly when they are equal as floats.

use crate::config::{Abstraction, EncodingOptions, UsedOps};
use crate::error::{EncodeError, EncodeResult};
use smt_ir::{Expr, FnDecl, Sort};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

pub(crate) const SIGN_BITS: u32 = 1;
pub(crate) const TYPE_BITS: u32 = 1;

/// Largest accepted `fp_bits`; keeps the abstract float inside a 64-bit
/// literal.
pub const MAX_FP_BITS: u32 = 63;

/// A reduction recorded for the associativity precondition: the operand
/// (array or bag), its literal length, and the abstract sum.
pub(crate) struct StaticArray {
    pub(crate) operand: Expr,
    pub(crate) len: Expr,
    pub(crate) sum: Expr,
}

/// The abstract-operation encoder for one verification session.
///
/// All state (the constant pool, the uninterpreted-function declarations,
/// the registry of encoded reductions, the usage flags) lives on this
/// object. Starting a new session means constructing a new engine; the
/// uninterpreted symbol names it emits are only stable within one session,
/// so a driver must not share solver contexts across engines without
/// clearing declarations.
pub struct AbstractOps {
    pub(crate) abs: Abstraction,
    pub(crate) opts: EncodingOptions,

    // Derived float layout
    pub(crate) value_bits: u32,
    pub(crate) fp_bits: u32,
    pub(crate) inf_value: u64,
    pub(crate) nan_value: u64,
    pub(crate) signed_value: u64,

    // Constant pool: magnitude bit pattern -> abstract value. Zeros, infs,
    // and NaN never enter the map; their encodings are fixed.
    consts: BTreeMap<u32, u64>,
    const_count: u64,

    pub(crate) fp_add_fn: Option<FnDecl>,
    pub(crate) fp_mul_fn: Option<FnDecl>,
    pub(crate) fp_sum_fn: Option<FnDecl>,
    pub(crate) fp_assoc_sum_fn: Option<FnDecl>,
    pub(crate) fp_dot_fn: Option<FnDecl>,
    pub(crate) int_sum_fns: HashMap<u32, FnDecl>,
    pub(crate) int_dot_fns: HashMap<u32, FnDecl>,

    pub(crate) static_arrays: Vec<StaticArray>,
    pub(crate) hash_count: u64,
    pub(crate) used: UsedOps,
}

impl AbstractOps {
    /// Start a fresh encoding session with the given abstraction.
    pub fn new(abs: Abstraction) -> EncodeResult<Self> {
        if abs.fp_bits == 0 || abs.fp_bits > MAX_FP_BITS {
            return Err(EncodeError::InvalidFpBits(abs.fp_bits));
        }
        // A 1-bit request keeps its single value bit; anything larger cedes
        // one bit to the type field.
        let value_bits = if abs.fp_bits == 1 {
            abs.fp_bits
        } else {
            abs.fp_bits - 1
        };
        let fp_bits = SIGN_BITS + TYPE_BITS + value_bits;
        let inf_value = 1u64 << value_bits;
        let signed_value = 1u64 << (TYPE_BITS + value_bits);
        debug!(
            fp_dot = ?abs.fp_dot,
            int_dot = ?abs.int_dot,
            fp_add_associative = abs.fp_add_associative,
            value_bits,
            "starting abstract-ops session"
        );
        Ok(Self {
            abs,
            opts: EncodingOptions::default(),
            value_bits,
            fp_bits,
            inf_value,
            nan_value: inf_value + 1,
            signed_value,
            consts: BTreeMap::new(),
            const_count: 0,
            fp_add_fn: None,
            fp_mul_fn: None,
            fp_sum_fn: None,
            fp_assoc_sum_fn: None,
            fp_dot_fn: None,
            int_sum_fns: HashMap::new(),
            int_dot_fns: HashMap::new(),
            static_arrays: Vec::new(),
            hash_count: 0,
            used: UsedOps::default(),
        })
    }

    /// Replace the precision-neutral encoding options.
    pub fn set_encoding_options(&mut self, opts: EncodingOptions) {
        self.opts = opts;
    }

    /// Whether this session treats floating-point addition as associative.
    #[must_use]
    pub fn fp_add_associative(&self) -> bool {
        self.abs.fp_add_associative
    }

    /// Which abstract operations have been exercised so far.
    #[must_use]
    pub fn used_ops(&self) -> UsedOps {
        self.used
    }

    /// The abstract floating-point sort of this session.
    #[must_use]
    pub fn fp_sort(&self) -> Sort {
        Sort::bv(self.fp_bits)
    }

    // ==========================================================================
    // Reserved encodings
    // ==========================================================================

    pub(crate) fn fp_pos_zero(&self) -> Expr {
        Expr::bv(0, self.fp_bits)
    }

    pub(crate) fn fp_neg_zero(&self) -> Expr {
        Expr::bv(self.signed_value, self.fp_bits)
    }

    pub(crate) fn fp_pos_inf(&self) -> Expr {
        Expr::bv(self.inf_value, self.fp_bits)
    }

    pub(crate) fn fp_neg_inf(&self) -> Expr {
        Expr::bv(self.signed_value + self.inf_value, self.fp_bits)
    }

    pub(crate) fn fp_nan(&self) -> Expr {
        Expr::bv(self.nan_value, self.fp_bits)
    }

    /// `1.0` always encodes as abstract value 1.
    pub(crate) fn fp_one(&self) -> Expr {
        Expr::bv(1, self.fp_bits)
    }

    // ==========================================================================
    // Constant pool
    // ==========================================================================

    /// The abstract encoding of a concrete float.
    ///
    /// Reserved values map to their fixed encodings. A fresh finite
    /// magnitude is assigned the next free abstract value; both sign
    /// variants of a magnitude share that value and differ only in the sign
    /// bit. Fails once the value field has no room for another magnitude.
    pub fn fp_const(&mut self, f: f32) -> EncodeResult<Expr> {
        if f.is_nan() {
            return Ok(self.fp_nan());
        }
        if f.is_infinite() {
            return Ok(if f.is_sign_negative() {
                self.fp_neg_inf()
            } else {
                self.fp_pos_inf()
            });
        }
        if f == 0.0 {
            return Ok(if f.is_sign_negative() {
                self.fp_neg_zero()
            } else {
                self.fp_pos_zero()
            });
        }

        let magnitude = f.abs();
        let key = magnitude.to_bits();
        let abs_value = match self.consts.get(&key) {
            Some(v) => *v,
            None => {
                let v = if magnitude == 1.0 {
                    1
                } else {
                    if 2 + self.const_count >= self.inf_value {
                        return Err(EncodeError::ConstantPoolExhausted {
                            capacity: self.inf_value.saturating_sub(2),
                        });
                    }
                    let v = 2 + self.const_count;
                    self.const_count += 1;
                    v
                };
                trace!(
                    magnitude = f64::from(magnitude),
                    abs_value = v,
                    "allocated abstract fp constant"
                );
                self.consts.insert(key, v);
                v
            }
        };

        Ok(if f.is_sign_negative() {
            Expr::bv(self.signed_value + abs_value, self.fp_bits)
        } else {
            Expr::bv(abs_value, self.fp_bits)
        })
    }

    /// Every concrete float whose abstract encoding is structurally `e`.
    ///
    /// An empty result means `e` matches no constant this session has seen;
    /// more than one entry means the abstract value is ambiguous.
    #[must_use]
    pub fn fp_possible_consts(&self, e: &Expr) -> Vec<f32> {
        let mut out = Vec::new();
        for (&key, &abs_value) in &self.consts {
            let magnitude = f32::from_bits(key);
            if Expr::bv(abs_value, self.fp_bits).is_identical(e) {
                out.push(magnitude);
            }
            if Expr::bv(self.signed_value + abs_value, self.fp_bits).is_identical(e) {
                out.push(-magnitude);
            }
        }

        // Reserved values never enter the pool.
        if self.fp_nan().is_identical(e) {
            out.push(f32::NAN);
        } else if self.fp_pos_zero().is_identical(e) {
            out.push(0.0);
        } else if self.fp_neg_zero().is_identical(e) {
            out.push(-0.0);
        } else if self.fp_pos_inf().is_identical(e) {
            out.push(f32::INFINITY);
        } else if self.fp_neg_inf().is_identical(e) {
            out.push(f32::NEG_INFINITY);
        }

        out
    }

    /// An all-zero element of the array's element sort, learned by reading
    /// index 0.
    #[must_use]
    pub fn mk_zero_elem_from_arr(&self, arr: &Expr) -> Expr {
        let width = arr.clone().select(Expr::index_lit(0)).sort().bitwidth();
        Expr::bv(0, width)
    }

    // ==========================================================================
    // Shared validation
    // ==========================================================================

    pub(crate) fn expect_sort(&self, e: &Expr, expected: &Sort) -> EncodeResult<()> {
        let found = e.sort();
        if found == *expected {
            Ok(())
        } else {
            Err(EncodeError::SortMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
            })
        }
    }

    /// Validates an integer reduction operand: an index-to-bitvec array.
    pub(crate) fn expect_int_array(&self, e: &Expr) -> EncodeResult<Sort> {
        let sort = e.sort();
        let ok = sort.is_array()
            && *sort.index_sort() == Sort::index()
            && sort.elem().is_bitvec();
        if ok {
            Ok(sort)
        } else {
            Err(EncodeError::SortMismatch {
                expected: "an index-to-bitvec array".to_string(),
                found: sort.to_string(),
            })
        }
    }
}

/// Puts two operands of a commutative operation into canonical term order.
pub(crate) fn ordered_pair(a: &Expr, b: &Expr) -> (Expr, Expr) {
    if b < a {
        (b.clone(), a.clone())
    } else {
        (a.clone(), b.clone())
    }
}
