//! Typed Abstract Syntax Tree.
//!
//! The type checker annotates the tree in place, so a typed program has the
//! same shape as the untyped one. `TypedProgram` can only be obtained from a
//! successful check, which is what lets the code generator rely on every
//! expression carrying a resolved type.

use crate::{
    ast::{ast::Program, statements::Stmt, types::Type},
    errors::errors::Error,
};

use super::type_checker::type_check;

#[derive(Debug, Clone, PartialEq)]
pub struct TypedProgram {
    program: Program,
}

impl TypedProgram {
    pub(crate) fn new(program: Program) -> Self {
        TypedProgram { program }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn body(&self) -> &[Stmt] {
        &self.program.body
    }

    pub fn into_program(self) -> Program {
        self.program
    }

    /// Checks the already annotated tree again. Annotations are kept as they are.
    pub fn recheck(self) -> Result<TypedProgram, Error> {
        type_check(self.program)
    }

    /// Every expression's type, in traversal order.
    pub fn expression_types(&self) -> Vec<Option<Type>> {
        let mut types = vec![];
        self.program
            .for_each_expr(&mut |expr| types.push(expr.get_type().cloned()));
        types
    }
}
