//! The associativity precondition.
//!
//! The lambda-based `fp_sum` is uninterpreted, so the solver can derive
//! nothing about two independent reductions on its own. This module emits
//! the minimal side-condition that lets it relate reductions whose operand
//! arrays are multiset-equal, once per verification query, over all
//! unordered pairs of recorded reductions with equal literal lengths.

use crate::engine::AbstractOps;
use crate::error::{EncodeError, EncodeResult};
use smt_ir::{Expr, FnDecl, Sort};
use tracing::debug;

impl AbstractOps {
    /// The side-condition to assert alongside the main query.
    ///
    /// In multiset mode each pair contributes `bag_i = bag_j ⇒ sum_i =
    /// sum_j`, spelling out at the term level what the uninterpreted
    /// `fp_assoc_sum` already guarantees. In lambda mode each pair gets a
    /// fresh uninterpreted `fp_hash<k>` and contributes `sum_i ≠ sum_j ⇒
    /// h_i ≠ h_j` over the unrolled hash sums: if the sums differ, some
    /// hash separates the operand multisets, so when every hash sum
    /// agrees, the solver may conclude the sums are equal. A fresh hash per
    /// pair keeps pairs from interfering.
    pub fn fp_associative_precondition(&mut self) -> EncodeResult<Expr> {
        if !self.abs.fp_add_associative {
            return Err(EncodeError::NotAssociative);
        }
        let entries = self.static_arrays.len();
        debug!(
            entries,
            use_multiset = self.opts.use_multiset,
            "emitting fp associativity precondition"
        );

        let mut precond = Expr::bool_lit(true);
        for i in 0..entries {
            for j in (i + 1)..entries {
                let (a_len, b_len) = match (
                    self.static_arrays[i].len.as_u64(),
                    self.static_arrays[j].len.as_u64(),
                ) {
                    (Some(a), Some(b)) => (a, b),
                    _ => continue,
                };
                if a_len != b_len {
                    continue;
                }
                // A session that toggled use_multiset mid-way leaves both
                // bag and array entries behind; relate only like operands.
                if self.static_arrays[i].operand.sort() != self.static_arrays[j].operand.sort() {
                    continue;
                }

                let clause = if self.opts.use_multiset {
                    self.multiset_pair_clause(i, j)
                } else {
                    if !self.static_arrays[i].operand.sort().is_array() {
                        continue;
                    }
                    self.hash_pair_clause(i, j, a_len)
                };
                precond = precond.and(clause);
            }
        }
        Ok(precond.simplify())
    }

    /// `bag_i = bag_j ⇒ sum_i = sum_j`.
    fn multiset_pair_clause(&self, i: usize, j: usize) -> Expr {
        let a = &self.static_arrays[i];
        let b = &self.static_arrays[j];
        a.operand
            .clone()
            .equals(b.operand.clone())
            .implies(a.sum.clone().equals(b.sum.clone()))
    }

    /// `sum_i ≠ sum_j ⇒ Σ hash(a_i[k]) ≠ Σ hash(a_j[k])`.
    fn hash_pair_clause(&mut self, i: usize, j: usize, len: u64) -> Expr {
        let a_op = self.static_arrays[i].operand.clone();
        let b_op = self.static_arrays[j].operand.clone();
        let a_sum = self.static_arrays[i].sum.clone();
        let b_sum = self.static_arrays[j].sum.clone();
        let hash = self.fresh_hash_fn();

        let a_val = hash_sum(&hash, &a_op, len);
        let b_val = hash_sum(&hash, &b_op, len);
        a_sum
            .equals(b_sum)
            .not()
            .implies(a_val.equals(b_val).not())
    }

    fn fresh_hash_fn(&mut self) -> FnDecl {
        let name = format!("fp_hash{}", self.hash_count);
        self.hash_count += 1;
        FnDecl::new(name, vec![self.fp_sort()], Sort::index())
    }
}

fn hash_sum(hash: &FnDecl, arr: &Expr, len: u64) -> Expr {
    let mut val = hash.apply(&[arr.clone().select(Expr::index_lit(0))]);
    for k in 1..len {
        val = val.add(hash.apply(&[arr.clone().select(Expr::index_lit(k))]));
    }
    val
}

#[cfg(test)]
mod tests {
    use crate::config::{Abstraction, DotAbstraction, EncodingOptions};
    use crate::engine::AbstractOps;
    use crate::error::EncodeError;
    use smt_ir::{Expr, Sort};

    fn engine(assoc: bool) -> AbstractOps {
        AbstractOps::new(Abstraction {
            fp_dot: DotAbstraction::SumMul,
            int_dot: DotAbstraction::SumMul,
            fp_add_associative: assoc,
            fp_bits: 8,
        })
        .expect("engine")
    }

    fn fp_arr(eng: &AbstractOps, name: &str) -> Expr {
        Expr::var(name, Sort::array(Sort::index(), eng.fp_sort()))
    }

    /// Two length-3 arrays over the same base holding the same constants in
    /// different positions.
    fn permuted_pair(eng: &mut AbstractOps) -> (Expr, Expr) {
        let base = fp_arr(eng, "base");
        let x = eng.fp_const(2.0).unwrap();
        let y = eng.fp_const(3.0).unwrap();
        let z = eng.fp_const(4.0).unwrap();
        let fwd = base
            .clone()
            .store(Expr::index_lit(0), x.clone())
            .store(Expr::index_lit(1), y.clone())
            .store(Expr::index_lit(2), z.clone());
        let rot = base
            .store(Expr::index_lit(0), z)
            .store(Expr::index_lit(1), x)
            .store(Expr::index_lit(2), y);
        (fwd, rot)
    }

    #[test]
    fn test_precondition_requires_associativity() {
        let mut eng = engine(false);
        assert_eq!(
            eng.fp_associative_precondition().err(),
            Some(EncodeError::NotAssociative)
        );
    }

    #[test]
    fn test_empty_registry_gives_trivial_precondition() {
        let mut eng = engine(true);
        let precond = eng.fp_associative_precondition().unwrap();
        assert_eq!(precond.as_bool(), Some(true));
    }

    #[test]
    fn test_multiset_mode_permutation_discharges_to_true() {
        let mut eng = engine(true);
        eng.set_encoding_options(EncodingOptions { use_multiset: true });
        let (fwd, rot) = permuted_pair(&mut eng);
        let n = Expr::index_lit(3);
        let sum_fwd = eng.fp_sum(&fwd, &n).unwrap();
        let sum_rot = eng.fp_sum(&rot, &n).unwrap();
        // Identical bags, identical sums: the pair clause is vacuous.
        assert!(sum_fwd.is_identical(&sum_rot));
        let precond = eng.fp_associative_precondition().unwrap();
        assert_eq!(precond.as_bool(), Some(true));
    }

    #[test]
    fn test_multiset_mode_distinct_bags_keep_implication() {
        let mut eng = engine(true);
        eng.set_encoding_options(EncodingOptions { use_multiset: true });
        let base = fp_arr(&eng, "base");
        let x = eng.fp_const(2.0).unwrap();
        let y = eng.fp_const(3.0).unwrap();
        let a = base.clone().store(Expr::index_lit(0), x);
        let b = base.store(Expr::index_lit(0), y);
        let n = Expr::index_lit(1);
        let sum_a = eng.fp_sum(&a, &n).unwrap();
        let sum_b = eng.fp_sum(&b, &n).unwrap();
        let precond = eng.fp_associative_precondition().unwrap();
        // Ground distinct bags: antecedent is false, clause folds away.
        assert_eq!(precond.as_bool(), Some(true));
        assert!(!sum_a.is_identical(&sum_b));
    }

    #[test]
    fn test_lambda_mode_permutation_yields_sum_equality() {
        let mut eng = engine(true);
        let (fwd, rot) = permuted_pair(&mut eng);
        let n = Expr::index_lit(3);
        let sum_fwd = eng.fp_sum(&fwd, &n).unwrap();
        let sum_rot = eng.fp_sum(&rot, &n).unwrap();
        assert!(!sum_fwd.is_identical(&sum_rot));

        let precond = eng.fp_associative_precondition().unwrap();
        // The hash sums of a permuted pair canonicalize identically, so the
        // clause collapses to exactly the equality the solver needs.
        let expected = sum_fwd.equals(sum_rot).simplify();
        assert!(precond.is_identical(&expected));
    }

    #[test]
    fn test_lambda_mode_unrelated_arrays_keep_hash_guard() {
        let mut eng = engine(true);
        let a = fp_arr(&eng, "a");
        let b = fp_arr(&eng, "b");
        let n = Expr::index_lit(2);
        let _ = eng.fp_sum(&a, &n).unwrap();
        let _ = eng.fp_sum(&b, &n).unwrap();
        let precond = eng.fp_associative_precondition().unwrap();
        // Nothing folds: the implication with the fresh hash survives.
        assert!(precond.as_bool().is_none());
        assert!(precond.to_string().contains("fp_hash0"));
    }

    #[test]
    fn test_lambda_mode_fresh_hash_per_pair() {
        let mut eng = engine(true);
        let a = fp_arr(&eng, "a");
        let b = fp_arr(&eng, "b");
        let c = fp_arr(&eng, "c");
        let n = Expr::index_lit(2);
        let _ = eng.fp_sum(&a, &n).unwrap();
        let _ = eng.fp_sum(&b, &n).unwrap();
        let _ = eng.fp_sum(&c, &n).unwrap();
        let precond = eng.fp_associative_precondition().unwrap();
        let printed = precond.to_string();
        // Three entries, three pairs, three hash symbols.
        assert!(printed.contains("fp_hash0"));
        assert!(printed.contains("fp_hash1"));
        assert!(printed.contains("fp_hash2"));
    }

    #[test]
    fn test_pairs_with_unequal_lengths_are_skipped() {
        let mut eng = engine(true);
        let a = fp_arr(&eng, "a");
        let b = fp_arr(&eng, "b");
        let _ = eng.fp_sum(&a, &Expr::index_lit(2)).unwrap();
        let _ = eng.fp_sum(&b, &Expr::index_lit(3)).unwrap();
        let precond = eng.fp_associative_precondition().unwrap();
        assert_eq!(precond.as_bool(), Some(true));
    }
}
