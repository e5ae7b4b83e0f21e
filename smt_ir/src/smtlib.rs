//! SMT-LIB 2 printing.
//!
//! `Display` renders sorts and expressions in SMT-LIB 2 s-expression
//! syntax (bags use cvc5's `bag.*` vocabulary), so a finished formula can
//! be handed to an external solver process or dumped for debugging.

use crate::decl::FnDecl;
use crate::expr::{Expr, ExprKind};
use crate::sort::Sort;
use std::fmt;

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "Bool"),
            Self::BitVec(w) => write!(f, "(_ BitVec {w})"),
            Self::Array { index, elem } => write!(f, "(Array {index} {elem})"),
            Self::Bag(elem) => write!(f, "(Bag {elem})"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ExprKind::BoolLit(b) => write!(f, "{b}"),
            ExprKind::BvLit(v) => write!(f, "(_ bv{v} {})", self.bitwidth()),
            ExprKind::Var(name) => write!(f, "{name}"),
            ExprKind::App { decl, args } => {
                if args.is_empty() {
                    return write!(f, "{}", decl.name());
                }
                write!(f, "({}", decl.name())?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                write!(f, ")")
            }
            ExprKind::Ite { cond, then_, else_ } => {
                write!(f, "(ite {cond} {then_} {else_})")
            }
            ExprKind::Eq(a, b) => write!(f, "(= {a} {b})"),
            ExprKind::Ult(a, b) => write!(f, "(bvult {a} {b})"),
            ExprKind::Not(x) => write!(f, "(not {x})"),
            ExprKind::And(xs) => write_nary(f, "and", xs),
            ExprKind::Or(xs) => write_nary(f, "or", xs),
            ExprKind::Implies(a, b) => write!(f, "(=> {a} {b})"),
            ExprKind::Add(xs) => write_nary(f, "bvadd", xs),
            ExprKind::Mul(xs) => write_nary(f, "bvmul", xs),
            ExprKind::Concat(a, b) => write!(f, "(concat {a} {b})"),
            ExprKind::Extract { hi, lo, arg } => {
                write!(f, "((_ extract {hi} {lo}) {arg})")
            }
            ExprKind::ZeroExt { added, arg } => {
                write!(f, "((_ zero_extend {added}) {arg})")
            }
            ExprKind::Select { array, index } => write!(f, "(select {array} {index})"),
            ExprKind::Store { array, index, value } => {
                write!(f, "(store {array} {index} {value})")
            }
            ExprKind::Lambda { var, body } => {
                write!(f, "(lambda (({var} {})) {body})", var.sort())
            }
            ExprKind::EmptyBag => write!(f, "(as bag.empty {})", self.sort()),
            ExprKind::BagInsert { bag, elem } => write!(f, "(bag.insert {elem} {bag})"),
        }
    }
}

fn write_nary(f: &mut fmt::Formatter<'_>, op: &str, xs: &[Expr]) -> fmt::Result {
    write!(f, "({op}")?;
    for x in xs {
        write!(f, " {x}")?;
    }
    write!(f, ")")
}

impl FnDecl {
    /// The `declare-fun` command for this symbol.
    #[must_use]
    pub fn smtlib_decl(&self) -> String {
        let mut out = format!("(declare-fun {} (", self.name());
        for (i, sort) in self.domain().iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&sort.to_string());
        }
        out.push_str(&format!(") {})", self.range()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_display() {
        assert_eq!(Sort::Bool.to_string(), "Bool");
        assert_eq!(Sort::bv(10).to_string(), "(_ BitVec 10)");
        assert_eq!(
            Sort::array(Sort::index(), Sort::bv(8)).to_string(),
            "(Array (_ BitVec 64) (_ BitVec 8))"
        );
        assert_eq!(Sort::bag(Sort::bv(8)).to_string(), "(Bag (_ BitVec 8))");
    }

    #[test]
    fn test_literal_and_var_display() {
        assert_eq!(Expr::bv(5, 32).to_string(), "(_ bv5 32)");
        assert_eq!(Expr::bool_lit(true).to_string(), "true");
        assert_eq!(Expr::var("x", Sort::bv(4)).to_string(), "x");
    }

    #[test]
    fn test_compound_display() {
        let x = Expr::var("x", Sort::bv(8));
        let y = Expr::var("y", Sort::bv(8));
        let e = Expr::ite(
            x.clone().equals(y.clone()),
            x.clone().add(y.clone()),
            x.extract(3, 0).zext(4),
        );
        assert_eq!(
            e.to_string(),
            "(ite (= x y) (bvadd x y) ((_ zero_extend 4) ((_ extract 3 0) x)))"
        );
    }

    #[test]
    fn test_lambda_and_select_display() {
        let i = Expr::index_var("idx");
        let a = Expr::var("a", Sort::array(Sort::index(), Sort::bv(8)));
        let lam = Expr::lambda(i.clone(), a.select(i));
        assert_eq!(
            lam.to_string(),
            "(lambda ((idx (_ BitVec 64))) (select a idx))"
        );
    }

    #[test]
    fn test_bag_display() {
        let bag = Expr::empty_bag(Sort::bv(8)).bag_insert(Expr::bv(1, 8));
        assert_eq!(
            bag.to_string(),
            "(bag.insert (_ bv1 8) (as bag.empty (Bag (_ BitVec 8))))"
        );
    }

    #[test]
    fn test_app_and_decl_display() {
        let fdecl = FnDecl::new("fp_add", vec![Sort::bv(10), Sort::bv(10)], Sort::bv(9));
        let e = fdecl.apply(&[Expr::var("x", Sort::bv(10)), Expr::var("y", Sort::bv(10))]);
        assert_eq!(e.to_string(), "(fp_add x y)");
        assert_eq!(
            fdecl.smtlib_decl(),
            "(declare-fun fp_add ((_ BitVec 10) (_ BitVec 10)) (_ BitVec 9))"
        );
    }
}
