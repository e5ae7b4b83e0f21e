//! Reductions: sums and dot products over bounded-length arrays.
//!
//! A reduction argument is masked to its logical length with a lambda
//! (`λ idx. idx < n ? a[idx] : 0`) and handed to an uninterpreted sum or
//! dot function. Integer reductions are keyed by element width; the float
//! reductions share one symbol per session. When floating-point addition is
//! associative, float sums over literal-length arrays are recorded for the
//! associativity precondition, or diverted to the multiset encoding when
//! that option is on.

use crate::config::DotAbstraction;
use crate::engine::{ordered_pair, AbstractOps, StaticArray};
use crate::error::{EncodeError, EncodeResult};
use smt_ir::{Expr, FnDecl, Sort};

impl AbstractOps {
    /// Sum of the first `n` elements of an integer array.
    pub fn int_sum(&mut self, a: &Expr, n: &Expr) -> EncodeResult<Expr> {
        let arr_sort = self.expect_int_array(a)?;
        self.expect_sort(n, &Sort::index())?;
        self.used.int_sum = true;

        let width = arr_sort.elem().bitwidth();
        let decl = self
            .int_sum_fns
            .entry(width)
            .or_insert_with(|| {
                FnDecl::new(format!("int_sum{width}"), vec![arr_sort.clone()], Sort::bv(width))
            })
            .clone();
        Ok(decl.apply(&[self.masked_lambda(a, n)]))
    }

    /// Sum of the first `n` elements of a float array.
    pub fn fp_sum(&mut self, a: &Expr, n: &Expr) -> EncodeResult<Expr> {
        let fp = self.fp_sort();
        let arr_sort = Sort::array(Sort::index(), fp.clone());
        self.expect_sort(a, &arr_sort)?;
        self.expect_sort(n, &Sort::index())?;
        self.used.fp_sum = true;

        if self.abs.fp_add_associative && self.opts.use_multiset {
            return self.fp_multiset_sum(a, n);
        }

        let decl = self
            .fp_sum_fn
            .get_or_insert_with(|| FnDecl::new("fp_sum", vec![arr_sort], fp))
            .clone();
        let result = decl.apply(&[self.masked_lambda(a, n)]);

        if self.abs.fp_add_associative && n.is_numeral() {
            self.static_arrays.push(StaticArray {
                operand: a.clone(),
                len: n.clone(),
                sum: result.clone(),
            });
        }
        Ok(result)
    }

    /// Float sum through a finite bag.
    ///
    /// Two arrays that are permutations of one another build identical
    /// bags, so `fp_assoc_sum` of a bag models exactly the
    /// associative-and-commutative sum. The bag is built by unrolling,
    /// which is why the length must be a literal.
    fn fp_multiset_sum(&mut self, a: &Expr, n: &Expr) -> EncodeResult<Expr> {
        let Some(len) = n.as_u64() else {
            return Err(EncodeError::NonLiteralLength);
        };

        let mut bag = Expr::empty_bag(self.fp_sort());
        for i in 0..len {
            // Simplifying between inserts keeps the term graph small.
            bag = bag.bag_insert(a.clone().select(Expr::index_lit(i))).simplify();
        }

        let fp = self.fp_sort();
        let bag_sort = bag.sort();
        let decl = self
            .fp_assoc_sum_fn
            .get_or_insert_with(|| FnDecl::new("fp_assoc_sum", vec![bag_sort], fp))
            .clone();
        let result = decl.apply(&[bag.clone()]);

        if n.is_numeral() {
            self.static_arrays.push(StaticArray {
                operand: bag,
                len: n.clone(),
                sum: result.clone(),
            });
        }
        Ok(result)
    }

    /// Dot product of the first `n` elements of two integer arrays.
    pub fn int_dot(&mut self, a: &Expr, b: &Expr, n: &Expr) -> EncodeResult<Expr> {
        let arr_sort = self.expect_int_array(a)?;
        self.expect_sort(b, &arr_sort)?;
        self.expect_sort(n, &Sort::index())?;

        match self.abs.int_dot {
            DotAbstraction::FullyAbstract => {
                self.used.int_dot = true;
                let width = arr_sort.elem().bitwidth();
                let decl = self
                    .int_dot_fns
                    .entry(width)
                    .or_insert_with(|| {
                        FnDecl::new(
                            format!("int_dot{width}"),
                            vec![arr_sort.clone(), arr_sort.clone()],
                            Sort::bv(width),
                        )
                    })
                    .clone();
                let (a, b) = ordered_pair(a, b);
                let lam_a = self.masked_lambda(&a, n);
                let lam_b = self.masked_lambda(&b, n);
                Ok(decl
                    .apply(&[lam_a.clone(), lam_b.clone()])
                    .add(decl.apply(&[lam_b, lam_a])))
            }
            DotAbstraction::SumMul => {
                let i = Expr::index_var("idx");
                let ai = a.clone().select(i.clone());
                let bi = b.clone().select(i.clone());
                self.int_sum(&Expr::lambda(i, ai.mul(bi)), n)
            }
        }
    }

    /// Dot product of the first `n` elements of two float arrays.
    pub fn fp_dot(&mut self, a: &Expr, b: &Expr, n: &Expr) -> EncodeResult<Expr> {
        let fp = self.fp_sort();
        let arr_sort = Sort::array(Sort::index(), fp.clone());
        self.expect_sort(a, &arr_sort)?;
        self.expect_sort(b, &arr_sort)?;
        self.expect_sort(n, &Sort::index())?;

        match self.abs.fp_dot {
            DotAbstraction::FullyAbstract => {
                self.used.fp_dot = true;
                let decl = self
                    .fp_dot_fn
                    .get_or_insert_with(|| {
                        FnDecl::new("fp_dot", vec![arr_sort.clone(), arr_sort], fp)
                    })
                    .clone();
                let (a, b) = ordered_pair(a, b);
                let lam_a = self.masked_lambda(&a, n);
                let lam_b = self.masked_lambda(&b, n);
                // dot(a, b) + dot(b, a) is commutative without a quantified
                // axiom.
                Ok(decl
                    .apply(&[lam_a.clone(), lam_b.clone()])
                    .add(decl.apply(&[lam_b, lam_a])))
            }
            DotAbstraction::SumMul => {
                // The fp_mul / fp_sum calls below set their own usage
                // flags; fp_dot stays clear in this mode.
                let i = Expr::index_var("idx");
                let ai = a.clone().select(i.clone());
                let bi = b.clone().select(i.clone());
                let prod = self.fp_mul(&ai, &bi)?;
                self.fp_sum(&Expr::lambda(i, prod), n)
            }
        }
    }

    /// The reduction argument: elements below `n`, zero above.
    fn masked_lambda(&self, a: &Expr, n: &Expr) -> Expr {
        let i = Expr::index_var("idx");
        let ai = a.clone().select(i.clone());
        let zero = self.mk_zero_elem_from_arr(a);
        Expr::lambda(i.clone(), Expr::ite(i.ult(n.clone()), ai, zero))
    }
}
