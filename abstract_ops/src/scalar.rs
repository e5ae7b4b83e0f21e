//! Scalar floating-point operations.
//!
//! Addition and multiplication are commutative uninterpreted functions with
//! IEEE special-case rewrites layered on top. Commutativity comes from two
//! sides: the opaque core is applied in both argument orders and the
//! results summed (`f(a,b) + f(b,a)` is symmetric under the bit-vector
//! theory, no quantified axiom needed), and the rewrite cascade itself is
//! built over a canonically ordered operand pair, so swapping the caller's
//! arguments yields the identical term.

use crate::engine::{ordered_pair, AbstractOps, SIGN_BITS, TYPE_BITS};
use crate::error::EncodeResult;
use smt_ir::{Expr, FnDecl, Sort};

impl AbstractOps {
    /// Abstract floating-point addition.
    ///
    /// The opaque core returns sign and value bits only; its result always
    /// models a finite value because NaN and infinity operands are peeled
    /// off by the rewrites, so a zero type bit is inserted around the call.
    /// `-0.0` is the additive identity: rewriting on `+0.0` would erase the
    /// sign distinction the `x + -x` rule depends on.
    pub fn fp_add(&mut self, f1: &Expr, f2: &Expr) -> EncodeResult<Expr> {
        let fp = self.fp_sort();
        self.expect_sort(f1, &fp)?;
        self.expect_sort(f2, &fp)?;
        self.used.fp_add = true;

        let value_sort = Sort::bv(SIGN_BITS + self.value_bits);
        let decl = self
            .fp_add_fn
            .get_or_insert_with(|| FnDecl::new("fp_add", vec![fp.clone(), fp], value_sort))
            .clone();

        let (f1, f2) = ordered_pair(f1, f2);

        let fp_zero = self.fp_pos_zero();
        let fp_id = self.fp_neg_zero();
        let inf_pos = self.fp_pos_inf();
        let inf_neg = self.fp_neg_inf();
        let nan = self.fp_nan();
        let bv_true = Expr::bv(1, 1);
        let bv_false = Expr::bv(0, 1);

        let add_res = decl
            .apply(&[f1.clone(), f2.clone()])
            .add(decl.apply(&[f2.clone(), f1.clone()]));
        let add_sign = add_res.clone().msb();
        let add_value = add_res.extract(self.value_bits - 1, 0);

        let finite_pos = bv_false.clone().concat(add_value.clone().zext(TYPE_BITS));
        let finite_neg = bv_true.clone().concat(add_value.clone().zext(TYPE_BITS));
        let finite_any = add_sign.concat(add_value.zext(TYPE_BITS));

        // inf + -inf in either order: IEEE 754-2019 7.2, invalid operation.
        let inf_mix = f1
            .clone()
            .equals(inf_pos.clone())
            .and(f2.clone().equals(inf_neg.clone()))
            .or(f1
                .clone()
                .equals(inf_neg.clone())
                .and(f2.clone().equals(inf_pos.clone())));

        let v = self.value_bits;
        #[rustfmt::skip]
        let cascade =
            Expr::ite(f1.clone().equals(fp_id.clone()), f2.clone(),          // -0.0 + x -> x
            Expr::ite(f2.clone().equals(fp_id), f1.clone(),                  // x + -0.0 -> x
            Expr::ite(f1.clone().equals(nan.clone()), f1.clone(),            // NaN + x -> NaN
            Expr::ite(f2.clone().equals(nan.clone()), f2.clone(),            // x + NaN -> NaN
            Expr::ite(inf_mix, nan,
            // inf + x -> inf, -inf + x -> -inf: IEEE 754-2019 6.1.
            Expr::ite(f1.clone().equals(inf_pos.clone()).or(f1.clone().equals(inf_neg.clone())), f1.clone(),
            Expr::ite(f2.clone().equals(inf_pos).or(f2.clone().equals(inf_neg)), f2.clone(),
            // Same-sign operands keep their sign; the core's sign bit is
            // only trusted when the operand signs differ.
            Expr::ite(f1.clone().msb().equals(bv_false.clone()).and(f2.clone().msb().equals(bv_false)), finite_pos,
            Expr::ite(f1.clone().msb().equals(bv_true.clone()).and(f2.clone().msb().equals(bv_true)), finite_neg,
            Expr::ite(f1.extract(v - 1, 0).equals(f2.extract(v - 1, 0)), fp_zero, // x + -x -> +0.0
            finite_any))))))))));
        Ok(cascade)
    }

    /// Abstract floating-point multiplication.
    ///
    /// Only the `1.0` identity is interpreted; zeros, infinities, and NaN
    /// go through the opaque core, so queries that depend on `0 * ∞` or
    /// NaN propagation see a coarser abstraction than [`fp_add`] gives.
    ///
    /// [`fp_add`]: AbstractOps::fp_add
    pub fn fp_mul(&mut self, f1: &Expr, f2: &Expr) -> EncodeResult<Expr> {
        let fp = self.fp_sort();
        self.expect_sort(f1, &fp)?;
        self.expect_sort(f2, &fp)?;
        self.used.fp_mul = true;

        let decl = self
            .fp_mul_fn
            .get_or_insert_with(|| FnDecl::new("fp_mul", vec![fp.clone(), fp.clone()], fp))
            .clone();

        let (f1, f2) = ordered_pair(f1, f2);
        let one = self.fp_one();

        Ok(Expr::ite(
            f1.clone().equals(one.clone()),
            f2.clone(),
            Expr::ite(
                f2.clone().equals(one),
                f1.clone(),
                decl.apply(&[f1.clone(), f2.clone()])
                    .add(decl.apply(&[f2, f1])),
            ),
        ))
    }
}
