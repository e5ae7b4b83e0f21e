//! Uninterpreted-function declarations.

use crate::expr::{Expr, ExprKind};
use crate::sort::Sort;
use serde::{Deserialize, Serialize};

/// An uninterpreted function of fixed domain and codomain sorts.
///
/// Two declarations with the same name denote the same symbol in a solver's
/// namespace; encoders are responsible for keeping names unambiguous within
/// a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FnDecl {
    name: String,
    domain: Vec<Sort>,
    range: Sort,
}

impl FnDecl {
    /// Declare an uninterpreted function.
    #[must_use]
    pub fn new(name: impl Into<String>, domain: Vec<Sort>, range: Sort) -> Self {
        Self {
            name: name.into(),
            domain,
            range,
        }
    }

    /// The function's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The function's argument sorts.
    #[must_use]
    pub fn domain(&self) -> &[Sort] {
        &self.domain
    }

    /// The function's result sort.
    #[must_use]
    pub fn range(&self) -> &Sort {
        &self.range
    }

    /// Apply the function to arguments.
    ///
    /// # Panics
    ///
    /// Panics if the arity or an argument sort does not match the
    /// declaration.
    #[must_use]
    pub fn apply(&self, args: &[Expr]) -> Expr {
        assert_eq!(
            args.len(),
            self.domain.len(),
            "{}: expected {} arguments, got {}",
            self.name,
            self.domain.len(),
            args.len()
        );
        for (arg, expected) in args.iter().zip(&self.domain) {
            assert_eq!(
                &arg.sort(),
                expected,
                "{}: argument sort mismatch",
                self.name
            );
        }
        Expr::mk(
            ExprKind::App {
                decl: self.clone(),
                args: args.to_vec(),
            },
            self.range.clone(),
        )
    }
}
