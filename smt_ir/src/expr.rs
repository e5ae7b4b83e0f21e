//! Symbolic expressions.
//!
//! `Expr` is a cheap-to-clone handle onto an immutable term graph. Equality
//! (`==` / [`Expr::is_identical`]) is structural, and terms carry a total
//! order so encoders can put operands of commutative operations into a
//! canonical order.

// Allow builder method names that overlap with std traits - intentional DSL design
#![allow(clippy::should_implement_trait)]

use crate::decl::FnDecl;
use crate::sort::{Sort, INDEX_BITS};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// A symbolic expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Expr(Rc<ExprNode>);

#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub(crate) struct ExprNode {
    pub(crate) kind: ExprKind,
    pub(crate) sort: Sort,
}

/// Term constructors. Bit-vector literals hold at most 64 bits; the width
/// lives on the node's sort.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub(crate) enum ExprKind {
    BoolLit(bool),
    BvLit(u64),
    Var(String),
    App { decl: FnDecl, args: Vec<Expr> },
    Ite { cond: Expr, then_: Expr, else_: Expr },
    Eq(Expr, Expr),
    Ult(Expr, Expr),
    Not(Expr),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Implies(Expr, Expr),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Concat(Expr, Expr),
    Extract { hi: u32, lo: u32, arg: Expr },
    ZeroExt { added: u32, arg: Expr },
    Select { array: Expr, index: Expr },
    Store { array: Expr, index: Expr, value: Expr },
    Lambda { var: Expr, body: Expr },
    EmptyBag,
    BagInsert { bag: Expr, elem: Expr },
}

/// All-ones mask for a bit-vector width.
pub(crate) const fn bv_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

impl Expr {
    pub(crate) fn mk(kind: ExprKind, sort: Sort) -> Self {
        Self(Rc::new(ExprNode { kind, sort }))
    }

    pub(crate) fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    // ==========================================================================
    // Literals and variables
    // ==========================================================================

    /// Boolean literal.
    #[must_use]
    pub fn bool_lit(b: bool) -> Self {
        Self::mk(ExprKind::BoolLit(b), Sort::Bool)
    }

    /// Bit-vector literal. The value is truncated to `width` bits.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or exceeds 64.
    #[must_use]
    pub fn bv(value: u64, width: u32) -> Self {
        assert!(
            (1..=64).contains(&width),
            "bit-vector literal width must be in 1..=64, got {width}"
        );
        Self::mk(ExprKind::BvLit(value & bv_mask(width)), Sort::bv(width))
    }

    /// Free or bound variable of the given sort.
    #[must_use]
    pub fn var(name: impl Into<String>, sort: Sort) -> Self {
        Self::mk(ExprKind::Var(name.into()), sort)
    }

    /// Index-sorted literal (array positions and lengths).
    #[must_use]
    pub fn index_lit(value: u64) -> Self {
        Self::bv(value, INDEX_BITS)
    }

    /// Index-sorted variable.
    #[must_use]
    pub fn index_var(name: impl Into<String>) -> Self {
        Self::var(name, Sort::index())
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    /// The sort of this expression.
    #[must_use]
    pub fn sort(&self) -> Sort {
        self.0.sort.clone()
    }

    /// Width of a bit-vector expression.
    ///
    /// # Panics
    ///
    /// Panics if the expression is not bit-vector sorted.
    #[must_use]
    pub fn bitwidth(&self) -> u32 {
        self.0.sort.bitwidth()
    }

    /// Structural equality check.
    #[must_use]
    pub fn is_identical(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self == other
    }

    /// Returns true if this is a bit-vector literal.
    #[must_use]
    pub fn is_numeral(&self) -> bool {
        matches!(self.0.kind, ExprKind::BvLit(_))
    }

    /// The value of a bit-vector literal, if it is one.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self.0.kind {
            ExprKind::BvLit(v) => Some(v),
            _ => None,
        }
    }

    /// The value of a boolean literal, if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.0.kind {
            ExprKind::BoolLit(b) => Some(b),
            _ => None,
        }
    }

    // ==========================================================================
    // Boolean connectives
    // ==========================================================================

    /// If-then-else. Both branches must share a sort.
    #[must_use]
    pub fn ite(cond: Self, then_: Self, else_: Self) -> Self {
        assert_eq!(cond.0.sort, Sort::Bool, "ite condition must be Bool");
        assert_eq!(
            then_.0.sort, else_.0.sort,
            "ite branches must share a sort"
        );
        let sort = then_.0.sort.clone();
        Self::mk(ExprKind::Ite { cond, then_, else_ }, sort)
    }

    /// Equality. Operands must share a sort.
    #[must_use]
    pub fn equals(self, other: Self) -> Self {
        assert_eq!(
            self.0.sort, other.0.sort,
            "equality operands must share a sort"
        );
        Self::mk(ExprKind::Eq(self, other), Sort::Bool)
    }

    /// Unsigned bit-vector less-than.
    #[must_use]
    pub fn ult(self, other: Self) -> Self {
        assert!(self.0.sort.is_bitvec(), "ult operands must be bit-vectors");
        assert_eq!(self.0.sort, other.0.sort, "ult operands must share a sort");
        Self::mk(ExprKind::Ult(self, other), Sort::Bool)
    }

    /// Logical negation.
    #[must_use]
    pub fn not(self) -> Self {
        assert_eq!(self.0.sort, Sort::Bool, "not operand must be Bool");
        Self::mk(ExprKind::Not(self), Sort::Bool)
    }

    /// Logical conjunction.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        assert_eq!(self.0.sort, Sort::Bool, "and operands must be Bool");
        assert_eq!(other.0.sort, Sort::Bool, "and operands must be Bool");
        Self::mk(ExprKind::And(vec![self, other]), Sort::Bool)
    }

    /// Logical disjunction.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        assert_eq!(self.0.sort, Sort::Bool, "or operands must be Bool");
        assert_eq!(other.0.sort, Sort::Bool, "or operands must be Bool");
        Self::mk(ExprKind::Or(vec![self, other]), Sort::Bool)
    }

    /// Implication.
    #[must_use]
    pub fn implies(self, other: Self) -> Self {
        assert_eq!(self.0.sort, Sort::Bool, "implies operands must be Bool");
        assert_eq!(other.0.sort, Sort::Bool, "implies operands must be Bool");
        Self::mk(ExprKind::Implies(self, other), Sort::Bool)
    }

    // ==========================================================================
    // Bit-vector arithmetic and structure
    // ==========================================================================

    /// Bit-vector addition (wrapping).
    #[must_use]
    pub fn add(self, other: Self) -> Self {
        assert!(self.0.sort.is_bitvec(), "add operands must be bit-vectors");
        assert_eq!(self.0.sort, other.0.sort, "add operands must share a sort");
        let sort = self.0.sort.clone();
        Self::mk(ExprKind::Add(vec![self, other]), sort)
    }

    /// Bit-vector multiplication (wrapping).
    #[must_use]
    pub fn mul(self, other: Self) -> Self {
        assert!(self.0.sort.is_bitvec(), "mul operands must be bit-vectors");
        assert_eq!(self.0.sort, other.0.sort, "mul operands must share a sort");
        let sort = self.0.sort.clone();
        Self::mk(ExprKind::Mul(vec![self, other]), sort)
    }

    /// Concatenation; `self` supplies the high bits.
    #[must_use]
    pub fn concat(self, low: Self) -> Self {
        let w = self.bitwidth() + low.bitwidth();
        assert!(w <= 64, "concat result exceeds 64 bits");
        Self::mk(ExprKind::Concat(self, low), Sort::bv(w))
    }

    /// Bit range `[hi:lo]`, inclusive on both ends.
    ///
    /// # Panics
    ///
    /// Panics unless `lo <= hi < bitwidth`.
    #[must_use]
    pub fn extract(self, hi: u32, lo: u32) -> Self {
        let w = self.bitwidth();
        assert!(lo <= hi && hi < w, "extract [{hi}:{lo}] out of range for width {w}");
        Self::mk(ExprKind::Extract { hi, lo, arg: self }, Sort::bv(hi - lo + 1))
    }

    /// Zero-extension by `added` bits.
    #[must_use]
    pub fn zext(self, added: u32) -> Self {
        let w = self.bitwidth() + added;
        assert!(w <= 64, "zero-extension result exceeds 64 bits");
        Self::mk(ExprKind::ZeroExt { added, arg: self }, Sort::bv(w))
    }

    /// Most significant bit, as a 1-bit vector.
    #[must_use]
    pub fn msb(self) -> Self {
        let w = self.bitwidth();
        self.extract(w - 1, w - 1)
    }

    // ==========================================================================
    // Arrays and lambdas
    // ==========================================================================

    /// Array read.
    #[must_use]
    pub fn select(self, index: Self) -> Self {
        let elem = {
            let sort = &self.0.sort;
            assert!(sort.is_array(), "select on non-array sort {sort}");
            assert_eq!(
                sort.index_sort(),
                &index.0.sort,
                "select index sort mismatch"
            );
            sort.elem().clone()
        };
        Self::mk(ExprKind::Select { array: self, index }, elem)
    }

    /// Array write, returning the updated array.
    #[must_use]
    pub fn store(self, index: Self, value: Self) -> Self {
        let sort = self.0.sort.clone();
        assert!(sort.is_array(), "store on non-array sort {sort}");
        assert_eq!(sort.index_sort(), &index.0.sort, "store index sort mismatch");
        assert_eq!(sort.elem(), &value.0.sort, "store value sort mismatch");
        Self::mk(ExprKind::Store { array: self, index, value }, sort)
    }

    /// Lambda abstraction over a bound variable. The result is array-sorted.
    ///
    /// # Panics
    ///
    /// Panics if `var` is not a variable.
    #[must_use]
    pub fn lambda(var: Self, body: Self) -> Self {
        assert!(
            matches!(var.0.kind, ExprKind::Var(_)),
            "lambda binder must be a variable"
        );
        let sort = Sort::array(var.0.sort.clone(), body.0.sort.clone());
        Self::mk(ExprKind::Lambda { var, body }, sort)
    }

    // ==========================================================================
    // Bags
    // ==========================================================================

    /// The empty bag over an element sort.
    #[must_use]
    pub fn empty_bag(elem: Sort) -> Self {
        Self::mk(ExprKind::EmptyBag, Sort::bag(elem))
    }

    /// Bag with one more occurrence of `elem`.
    #[must_use]
    pub fn bag_insert(self, elem: Self) -> Self {
        let sort = self.0.sort.clone();
        assert_eq!(
            sort.elem(),
            &elem.0.sort,
            "bag insert element sort mismatch"
        );
        Self::mk(ExprKind::BagInsert { bag: self, elem }, sort)
    }
}
