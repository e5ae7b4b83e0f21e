//! Property-based checks of the constant-pool and commutativity
//! invariants, over arbitrary floats and operand pairs.

use abstract_ops::{AbstractOps, Abstraction, DotAbstraction};
use proptest::prelude::*;
use smt_ir::Expr;

fn session() -> AbstractOps {
    AbstractOps::new(Abstraction {
        fp_dot: DotAbstraction::SumMul,
        int_dot: DotAbstraction::SumMul,
        fp_add_associative: false,
        fp_bits: 16,
    })
    .expect("session")
}

proptest! {
    /// Encoding the same float twice in a session yields the same term.
    #[test]
    fn prop_fp_const_deterministic(bits in any::<u32>()) {
        let f = f32::from_bits(bits);
        let mut eng = session();
        let a = eng.fp_const(f).unwrap();
        let b = eng.fp_const(f).unwrap();
        prop_assert!(a.is_identical(&b));
    }

    /// Negating a finite nonzero float flips exactly the sign bit.
    #[test]
    fn prop_fp_const_negation_flips_sign(bits in any::<u32>()) {
        let f = f32::from_bits(bits);
        prop_assume!(f.is_finite() && f != 0.0);
        let mut eng = session();
        let pos = eng.fp_const(f.abs()).unwrap();
        let neg = eng.fp_const(-f.abs()).unwrap();
        let w = eng.fp_sort().bitwidth();
        prop_assert_eq!(pos.clone().msb().simplify().as_u64(), Some(0));
        prop_assert_eq!(neg.clone().msb().simplify().as_u64(), Some(1));
        // Type and value fields agree.
        let pos_low = pos.extract(w - 2, 0).simplify();
        let neg_low = neg.extract(w - 2, 0).simplify();
        prop_assert!(pos_low.is_identical(&neg_low));
    }

    /// The reverse lookup recovers what the pool handed out.
    #[test]
    fn prop_fp_possible_consts_roundtrip(bits in any::<u32>()) {
        let f = f32::from_bits(bits);
        prop_assume!(f.is_finite() && f != 0.0);
        let mut eng = session();
        let e = eng.fp_const(f).unwrap();
        let found = eng.fp_possible_consts(&e);
        prop_assert_eq!(found.len(), 1);
        prop_assert_eq!(found[0], f);
    }

    /// Abstract addition and multiplication are syntactically commutative
    /// over any pair of encoded constants.
    #[test]
    fn prop_scalar_ops_commute(abits in any::<u32>(), bbits in any::<u32>()) {
        let fa = f32::from_bits(abits);
        let fb = f32::from_bits(bbits);
        let mut eng = session();
        let a = eng.fp_const(fa).unwrap();
        let b = eng.fp_const(fb).unwrap();

        let add_lhs = eng.fp_add(&a, &b).unwrap();
        let add_rhs = eng.fp_add(&b, &a).unwrap();
        prop_assert!(add_lhs.is_identical(&add_rhs));

        let mul_lhs = eng.fp_mul(&a, &b).unwrap();
        let mul_rhs = eng.fp_mul(&b, &a).unwrap();
        prop_assert!(mul_lhs.is_identical(&mul_rhs));
    }

    /// Commutativity also holds for fresh symbolic operands.
    #[test]
    fn prop_scalar_ops_commute_symbolic(name_a in "[a-z]{1,6}", name_b in "[a-z]{1,6}") {
        let mut eng = session();
        let a = Expr::var(name_a, eng.fp_sort());
        let b = Expr::var(name_b, eng.fp_sort());
        let lhs = eng.fp_add(&a, &b).unwrap();
        let rhs = eng.fp_add(&b, &a).unwrap();
        prop_assert!(lhs.is_identical(&rhs));
    }
}
