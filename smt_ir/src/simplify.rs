//! Structural simplification.
//!
//! `Expr::simplify` rewrites a term bottom-up into a canonical form:
//! literal folding, `ite` collapse, flattening and sorting of n-ary
//! commutative operations, `select`-of-`store` resolution, beta reduction
//! of applied lambdas, and bag-insert canonicalization. Two terms that the
//! bit-vector and bag theories make trivially equal (operand order of
//! commutative operations, insertion order of bags) simplify to the same
//! term, which is what the encoding layer's commutativity and multiset
//! properties rest on.

use crate::expr::{bv_mask, Expr, ExprKind};
use crate::sort::Sort;

impl Expr {
    /// Simplify to canonical form. The result is sort-identical to `self`
    /// and equivalent under the bit-vector, array, and bag theories.
    #[must_use]
    pub fn simplify(&self) -> Expr {
        simp(self)
    }
}

fn simp(e: &Expr) -> Expr {
    match e.kind() {
        ExprKind::BoolLit(_) | ExprKind::BvLit(_) | ExprKind::Var(_) | ExprKind::EmptyBag => {
            e.clone()
        }
        ExprKind::App { decl, args } => {
            let args: Vec<Expr> = args.iter().map(simp).collect();
            decl.apply(&args)
        }
        ExprKind::Ite { cond, then_, else_ } => simp_ite(cond, then_, else_),
        ExprKind::Eq(a, b) => simp_eq(simp(a), simp(b)),
        ExprKind::Ult(a, b) => simp_ult(simp(a), simp(b)),
        ExprKind::Not(x) => simp_not(simp(x)),
        ExprKind::And(xs) => simp_nary_bool(xs, true),
        ExprKind::Or(xs) => simp_nary_bool(xs, false),
        ExprKind::Implies(a, b) => simp_implies(simp(a), simp(b)),
        ExprKind::Add(xs) => simp_add(xs, &e.sort()),
        ExprKind::Mul(xs) => simp_mul(xs, &e.sort()),
        ExprKind::Concat(a, b) => simp_concat(simp(a), simp(b)),
        ExprKind::Extract { hi, lo, arg } => simp_extract(*hi, *lo, simp(arg)),
        ExprKind::ZeroExt { added, arg } => simp_zext(*added, arg),
        ExprKind::Select { array, index } => simp_select(simp(array), simp(index)),
        ExprKind::Store { array, index, value } => {
            simp(array).store(simp(index), simp(value))
        }
        ExprKind::Lambda { var, body } => Expr::lambda(var.clone(), simp(body)),
        ExprKind::BagInsert { .. } => simp_bag(e),
    }
}

fn simp_ite(cond: &Expr, then_: &Expr, else_: &Expr) -> Expr {
    let cond = simp(cond);
    if let Some(b) = cond.as_bool() {
        return if b { simp(then_) } else { simp(else_) };
    }
    let then_ = simp(then_);
    let else_ = simp(else_);
    if then_.is_identical(&else_) {
        return then_;
    }
    // ite(x = k, k, x) and ite(x = k, x, k) both denote the else branch.
    if let ExprKind::Eq(a, b) = cond.kind() {
        let hits = (then_.is_identical(a) && else_.is_identical(b))
            || (then_.is_identical(b) && else_.is_identical(a));
        if hits {
            return else_;
        }
    }
    Expr::ite(cond, then_, else_)
}

fn simp_eq(a: Expr, b: Expr) -> Expr {
    if a.is_identical(&b) {
        return Expr::bool_lit(true);
    }
    if let (Some(va), Some(vb)) = (a.as_u64(), b.as_u64()) {
        return Expr::bool_lit(va == vb);
    }
    if let (Some(va), Some(vb)) = (a.as_bool(), b.as_bool()) {
        return Expr::bool_lit(va == vb);
    }
    if let (Some(va), Some(vb)) = (literal_bag_elems(&a), literal_bag_elems(&b)) {
        return Expr::bool_lit(va == vb);
    }
    if b < a {
        b.equals(a)
    } else {
        a.equals(b)
    }
}

/// Elements of a ground bag term, sorted, or `None` if any element or the
/// base of the insert chain is symbolic.
fn literal_bag_elems(e: &Expr) -> Option<Vec<u64>> {
    let mut elems = Vec::new();
    let mut cur = e.clone();
    loop {
        let next = match cur.kind() {
            ExprKind::EmptyBag => break,
            ExprKind::BagInsert { bag, elem } => {
                elems.push(elem.as_u64()?);
                bag.clone()
            }
            _ => return None,
        };
        cur = next;
    }
    elems.sort_unstable();
    Some(elems)
}

fn simp_ult(a: Expr, b: Expr) -> Expr {
    if let (Some(va), Some(vb)) = (a.as_u64(), b.as_u64()) {
        return Expr::bool_lit(va < vb);
    }
    if b.as_u64() == Some(0) {
        return Expr::bool_lit(false);
    }
    a.ult(b)
}

fn simp_not(x: Expr) -> Expr {
    if let Some(b) = x.as_bool() {
        return Expr::bool_lit(!b);
    }
    if let ExprKind::Not(inner) = x.kind() {
        return inner.clone();
    }
    x.not()
}

fn simp_implies(a: Expr, b: Expr) -> Expr {
    match a.as_bool() {
        Some(false) => return Expr::bool_lit(true),
        Some(true) => return b,
        None => {}
    }
    match b.as_bool() {
        Some(true) => return Expr::bool_lit(true),
        Some(false) => return simp_not(a),
        None => {}
    }
    if a.is_identical(&b) {
        return Expr::bool_lit(true);
    }
    a.implies(b)
}

fn simp_nary_bool(xs: &[Expr], is_and: bool) -> Expr {
    let mut parts = Vec::new();
    for x in xs {
        flatten_bool(&simp(x), is_and, &mut parts);
    }
    for p in &parts {
        if p.as_bool() == Some(!is_and) {
            return Expr::bool_lit(!is_and);
        }
    }
    parts.retain(|p| p.as_bool() != Some(is_and));
    parts.sort();
    parts.dedup();
    if parts.is_empty() {
        return Expr::bool_lit(is_and);
    }
    if parts.len() == 1 {
        return parts.swap_remove(0);
    }
    let kind = if is_and {
        ExprKind::And(parts)
    } else {
        ExprKind::Or(parts)
    };
    Expr::mk(kind, Sort::Bool)
}

fn flatten_bool(x: &Expr, is_and: bool, out: &mut Vec<Expr>) {
    match x.kind() {
        ExprKind::And(inner) if is_and => {
            for i in inner {
                flatten_bool(i, is_and, out);
            }
        }
        ExprKind::Or(inner) if !is_and => {
            for i in inner {
                flatten_bool(i, is_and, out);
            }
        }
        _ => out.push(x.clone()),
    }
}

fn simp_add(xs: &[Expr], sort: &Sort) -> Expr {
    let width = sort.bitwidth();
    let mut parts = Vec::new();
    let mut acc: u64 = 0;
    for x in xs {
        flatten_add(&simp(x), &mut parts, &mut acc, width);
    }
    if acc != 0 || parts.is_empty() {
        parts.push(Expr::bv(acc, width));
    }
    parts.sort();
    if parts.len() == 1 {
        return parts.swap_remove(0);
    }
    Expr::mk(ExprKind::Add(parts), sort.clone())
}

fn flatten_add(x: &Expr, parts: &mut Vec<Expr>, acc: &mut u64, width: u32) {
    match x.kind() {
        ExprKind::Add(inner) => {
            for i in inner {
                flatten_add(i, parts, acc, width);
            }
        }
        ExprKind::BvLit(v) => *acc = acc.wrapping_add(*v) & bv_mask(width),
        _ => parts.push(x.clone()),
    }
}

fn simp_mul(xs: &[Expr], sort: &Sort) -> Expr {
    let width = sort.bitwidth();
    let mut parts = Vec::new();
    let mut acc: u64 = 1;
    for x in xs {
        flatten_mul(&simp(x), &mut parts, &mut acc, width);
    }
    if acc == 0 {
        return Expr::bv(0, width);
    }
    if acc != 1 || parts.is_empty() {
        parts.push(Expr::bv(acc, width));
    }
    parts.sort();
    if parts.len() == 1 {
        return parts.swap_remove(0);
    }
    Expr::mk(ExprKind::Mul(parts), sort.clone())
}

fn flatten_mul(x: &Expr, parts: &mut Vec<Expr>, acc: &mut u64, width: u32) {
    match x.kind() {
        ExprKind::Mul(inner) => {
            for i in inner {
                flatten_mul(i, parts, acc, width);
            }
        }
        ExprKind::BvLit(v) => *acc = acc.wrapping_mul(*v) & bv_mask(width),
        _ => parts.push(x.clone()),
    }
}

fn simp_concat(a: Expr, b: Expr) -> Expr {
    if let (Some(va), Some(vb)) = (a.as_u64(), b.as_u64()) {
        let wb = b.bitwidth();
        return Expr::bv((va << wb) | vb, a.bitwidth() + wb);
    }
    a.concat(b)
}

fn simp_extract(hi: u32, lo: u32, arg: Expr) -> Expr {
    let w = arg.bitwidth();
    if hi == w - 1 && lo == 0 {
        return arg;
    }
    if let Some(v) = arg.as_u64() {
        return Expr::bv(v >> lo, hi - lo + 1);
    }
    match arg.kind() {
        // A range that stays on one side of a concat narrows to that side.
        ExprKind::Concat(a, b) => {
            let wb = b.bitwidth();
            if lo >= wb {
                return simp_extract(hi - wb, lo - wb, a.clone());
            }
            if hi < wb {
                return simp_extract(hi, lo, b.clone());
            }
        }
        ExprKind::ZeroExt { arg: inner, .. } => {
            let wi = inner.bitwidth();
            if hi < wi {
                return simp_extract(hi, lo, inner.clone());
            }
            if lo >= wi {
                return Expr::bv(0, hi - lo + 1);
            }
        }
        _ => {}
    }
    arg.extract(hi, lo)
}

fn simp_zext(added: u32, arg: &Expr) -> Expr {
    let arg = simp(arg);
    if added == 0 {
        return arg;
    }
    if let Some(v) = arg.as_u64() {
        return Expr::bv(v, arg.bitwidth() + added);
    }
    arg.zext(added)
}

fn simp_select(array: Expr, index: Expr) -> Expr {
    let mut cur = array;
    loop {
        let next = match cur.kind() {
            ExprKind::Store {
                array: base,
                index: si,
                value,
            } => {
                if si.is_identical(&index) {
                    return value.clone();
                }
                match (si.as_u64(), index.as_u64()) {
                    // Distinct literal indices: the write cannot alias this read.
                    (Some(a), Some(b)) if a != b => base.clone(),
                    _ => break,
                }
            }
            ExprKind::Lambda { var, body } => {
                return simp(&subst(body, var, &index));
            }
            _ => break,
        };
        cur = next;
    }
    cur.select(index)
}

fn simp_bag(e: &Expr) -> Expr {
    let mut elems = Vec::new();
    let mut cur = e.clone();
    loop {
        let next = match cur.kind() {
            ExprKind::BagInsert { bag, elem } => {
                elems.push(simp(elem));
                bag.clone()
            }
            _ => break,
        };
        cur = next;
    }
    let mut acc = simp(&cur);
    elems.sort();
    for el in elems {
        acc = acc.bag_insert(el);
    }
    acc
}

/// Capture-safe substitution of a bound variable. Descent stops at lambdas
/// that rebind the same name.
fn subst(e: &Expr, var: &Expr, replacement: &Expr) -> Expr {
    if e.is_identical(var) {
        return replacement.clone();
    }
    match e.kind() {
        ExprKind::BoolLit(_) | ExprKind::BvLit(_) | ExprKind::Var(_) | ExprKind::EmptyBag => {
            e.clone()
        }
        ExprKind::App { decl, args } => {
            let args: Vec<Expr> = args.iter().map(|a| subst(a, var, replacement)).collect();
            decl.apply(&args)
        }
        ExprKind::Ite { cond, then_, else_ } => Expr::ite(
            subst(cond, var, replacement),
            subst(then_, var, replacement),
            subst(else_, var, replacement),
        ),
        ExprKind::Eq(a, b) => subst(a, var, replacement).equals(subst(b, var, replacement)),
        ExprKind::Ult(a, b) => subst(a, var, replacement).ult(subst(b, var, replacement)),
        ExprKind::Not(x) => subst(x, var, replacement).not(),
        ExprKind::And(xs) => Expr::mk(
            ExprKind::And(xs.iter().map(|x| subst(x, var, replacement)).collect()),
            Sort::Bool,
        ),
        ExprKind::Or(xs) => Expr::mk(
            ExprKind::Or(xs.iter().map(|x| subst(x, var, replacement)).collect()),
            Sort::Bool,
        ),
        ExprKind::Implies(a, b) => {
            subst(a, var, replacement).implies(subst(b, var, replacement))
        }
        ExprKind::Add(xs) => Expr::mk(
            ExprKind::Add(xs.iter().map(|x| subst(x, var, replacement)).collect()),
            e.sort(),
        ),
        ExprKind::Mul(xs) => Expr::mk(
            ExprKind::Mul(xs.iter().map(|x| subst(x, var, replacement)).collect()),
            e.sort(),
        ),
        ExprKind::Concat(a, b) => subst(a, var, replacement).concat(subst(b, var, replacement)),
        ExprKind::Extract { hi, lo, arg } => subst(arg, var, replacement).extract(*hi, *lo),
        ExprKind::ZeroExt { added, arg } => subst(arg, var, replacement).zext(*added),
        ExprKind::Select { array, index } => {
            subst(array, var, replacement).select(subst(index, var, replacement))
        }
        ExprKind::Store { array, index, value } => subst(array, var, replacement).store(
            subst(index, var, replacement),
            subst(value, var, replacement),
        ),
        ExprKind::Lambda { var: inner, body } => {
            if binder_name(inner) == binder_name(var) {
                e.clone()
            } else {
                Expr::lambda(inner.clone(), subst(body, var, replacement))
            }
        }
        ExprKind::BagInsert { bag, elem } => {
            subst(bag, var, replacement).bag_insert(subst(elem, var, replacement))
        }
    }
}

fn binder_name(var: &Expr) -> &str {
    match var.kind() {
        ExprKind::Var(name) => name,
        _ => unreachable!("lambda binder is always a variable"),
    }
}
