use crate::{
    ast::{
        expressions::{Expr, ExprKind},
        statements::{Stmt, VarDeclStmt},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl, NameErrorReason},
};

use super::{
    expr::type_check_expr,
    type_checker::{type_check_block, type_check_function, TypeChecker},
};

pub fn type_check_stmt(type_checker: &mut TypeChecker, stmt: &Stmt) -> Result<(), Error> {
    match stmt {
        Stmt::VarDecl(var_decl) => type_check_var_decl(type_checker, var_decl),
        Stmt::FnDef(function) => type_check_function(type_checker, function),
        Stmt::ClassDef(class) => {
            for field in class.fields.iter() {
                type_check_var_decl(type_checker, field)?;
            }
            for method in class.methods.iter() {
                type_check_function(type_checker, method)?;
            }
            Ok(())
        }
        Stmt::Assign(assign) => {
            if !matches!(assign.target.kind, ExprKind::Name(_) | ExprKind::FieldAccess { .. }) {
                return Err(Error::new(
                    ErrorImpl::NameError {
                        name: assign.target.kind.describe(),
                        reason: NameErrorReason::NotAssignable,
                    },
                    assign.target.span.start.clone(),
                ));
            }

            let value = type_check_expr(type_checker, &assign.value)?;
            let target = type_check_expr(type_checker, &assign.target)?;
            expect_type(&target, &value, &assign.value)
        }
        Stmt::If(if_stmt) => {
            type_check_condition(type_checker, &if_stmt.condition)?;
            // Bodies share the enclosing scope; locals are function-flat.
            type_check_block(type_checker, &if_stmt.then_body)?;

            for clause in if_stmt.elif_clauses.iter() {
                type_check_condition(type_checker, &clause.condition)?;
                type_check_block(type_checker, &clause.body)?;
            }

            type_check_block(type_checker, &if_stmt.else_body)
        }
        Stmt::While(while_stmt) => {
            type_check_condition(type_checker, &while_stmt.condition)?;
            type_check_block(type_checker, &while_stmt.body)
        }
        Stmt::Pass(_) => Ok(()),
        Stmt::Return(return_stmt) => {
            let value = type_check_expr(type_checker, &return_stmt.value)?;
            let expected = type_checker.current_return_type().clone();
            expect_type(&expected, &value, &return_stmt.value)
        }
        Stmt::Expression(expression) => {
            type_check_expr(type_checker, &expression.expression)?;
            Ok(())
        }
    }
}

/// The declared name is already bound by the enclosing block; this only checks the initializer.
fn type_check_var_decl(type_checker: &mut TypeChecker, var_decl: &VarDeclStmt) -> Result<(), Error> {
    type_checker.resolve_type(&var_decl.var_type, &var_decl.span.start)?;

    let value = &var_decl.assigned_value;
    if !matches!(value.kind, ExprKind::Literal(_)) {
        return Err(Error::new(
            ErrorImpl::TypeMismatch {
                expected: String::from("literal"),
                received: value.kind.describe(),
            },
            value.span.start.clone(),
        ));
    }

    let actual = type_check_expr(type_checker, value)?;
    if !var_decl.var_type.accepts_initializer(&actual) {
        return Err(mismatch(&var_decl.var_type, &actual, value));
    }

    Ok(())
}

fn type_check_condition(type_checker: &mut TypeChecker, condition: &Expr) -> Result<(), Error> {
    let actual = type_check_expr(type_checker, condition)?;
    expect_type(&Type::Bool, &actual, condition)
}

fn expect_type(expected: &Type, actual: &Type, at: &Expr) -> Result<(), Error> {
    if expected == actual {
        Ok(())
    } else {
        Err(mismatch(expected, actual, at))
    }
}

pub(super) fn mismatch(expected: &Type, actual: &Type, at: &Expr) -> Error {
    Error::new(
        ErrorImpl::TypeMismatch {
            expected: expected.to_string(),
            received: actual.to_string(),
        },
        at.span.start.clone(),
    )
}
