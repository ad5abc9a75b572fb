use crate::{
    ast::{
        expressions::{BinaryOp, Expr, ExprKind, Literal, UnaryOp},
        types::Type,
    },
    compiler::stdlib::lookup_builtin,
    errors::errors::{Error, ErrorImpl, NameErrorReason},
};

use super::{scope::Symbol, stmt::mismatch, type_checker::TypeChecker};

/// Resolves the type of `expr` and records it on the node.
pub fn type_check_expr(type_checker: &TypeChecker, expr: &Expr) -> Result<Type, Error> {
    let ty = resolve_expr(type_checker, expr)?;

    // Only fails when a checked tree was edited and checked again.
    if let Err(existing) = expr.annotate(ty.clone()) {
        return Err(Error::new(
            ErrorImpl::TypeMismatch {
                expected: existing.to_string(),
                received: ty.to_string(),
            },
            expr.span.start.clone(),
        ));
    }

    Ok(ty)
}

fn resolve_expr(type_checker: &TypeChecker, expr: &Expr) -> Result<Type, Error> {
    match &expr.kind {
        ExprKind::Literal(literal) => Ok(match literal {
            Literal::Number(_) => Type::Int,
            Literal::True | Literal::False => Type::Bool,
            Literal::None => Type::None,
        }),
        ExprKind::Name(name) => match type_checker.scopes.lookup(name, false) {
            Some(Symbol::Variable(ty)) => Ok(ty.clone()),
            Some(_) => Err(name_error(name, NameErrorReason::NotAVariable, expr)),
            None => Err(name_error(name, NameErrorReason::NotDefined, expr)),
        },
        ExprKind::Unary { op, operand } => {
            let actual = type_check_expr(type_checker, operand)?;
            let expected = match op {
                UnaryOp::Not => Type::Bool,
                UnaryOp::Neg => Type::Int,
            };

            if actual != expected {
                return Err(mismatch(&expected, &actual, operand));
            }
            Ok(expected)
        }
        ExprKind::Binary { op, left, right } => {
            let left_type = type_check_expr(type_checker, left)?;
            let right_type = type_check_expr(type_checker, right)?;

            match op {
                BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                    expect_ints(&left_type, left, &right_type, right)?;
                    Ok(Type::Int)
                }
                BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                    expect_ints(&left_type, left, &right_type, right)?;
                    Ok(Type::Bool)
                }
                // `is` has no identity semantics yet; it is checked like `==`.
                BinaryOp::Equal | BinaryOp::Unequal | BinaryOp::Is => {
                    if left_type != right_type {
                        return Err(mismatch(&left_type, &right_type, right));
                    }
                    Ok(Type::Bool)
                }
            }
        }
        ExprKind::Call { callee, arguments } => {
            if let Some(builtin) = lookup_builtin(callee) {
                expect_arity(callee, builtin.arity, arguments.len(), expr)?;
                for argument in arguments.iter() {
                    type_check_expr(type_checker, argument)?;
                }
                return Ok(builtin.return_type.clone());
            }

            let signature = match type_checker.scopes.lookup(callee, false) {
                Some(Symbol::Function(signature)) => signature,
                Some(_) => return Err(name_error(callee, NameErrorReason::NotAFunction, expr)),
                None => return Err(name_error(callee, NameErrorReason::NotDefined, expr)),
            };

            expect_arity(callee, signature.parameters.len(), arguments.len(), expr)?;
            type_check_arguments(type_checker, &signature.parameters, arguments)?;

            Ok(signature.return_type.clone())
        }
        ExprKind::FieldAccess { object, field } => {
            let object_type = type_check_expr(type_checker, object)?;
            let (class_name, class) = type_checker.class_info(&object_type, field, &expr.span.start)?;

            match class.fields.get(field) {
                Some(ty) => Ok(ty.clone()),
                None => Err(name_error(
                    field,
                    NameErrorReason::NoSuchField {
                        class: class_name.to_string(),
                    },
                    expr,
                )),
            }
        }
        ExprKind::MethodCall {
            object,
            method,
            arguments,
        } => {
            let object_type = type_check_expr(type_checker, object)?;
            let (class_name, class) = type_checker.class_info(&object_type, method, &expr.span.start)?;

            let Some(signature) = class.methods.get(method) else {
                return Err(name_error(
                    method,
                    NameErrorReason::NoSuchMethod {
                        class: class_name.to_string(),
                    },
                    expr,
                ));
            };

            // The declared parameter list starts with the receiver.
            let callee = format!("{}.{}", class_name, method);
            expect_arity(&callee, signature.parameters.len(), arguments.len() + 1, expr)?;
            type_check_arguments(type_checker, &signature.parameters[1..], arguments)?;

            Ok(signature.return_type.clone())
        }
    }
}

fn type_check_arguments(type_checker: &TypeChecker, parameters: &[Type], arguments: &[Expr]) -> Result<(), Error> {
    for (parameter, argument) in parameters.iter().zip(arguments.iter()) {
        let actual = type_check_expr(type_checker, argument)?;
        if actual != *parameter {
            return Err(mismatch(parameter, &actual, argument));
        }
    }

    Ok(())
}

fn expect_ints(left_type: &Type, left: &Expr, right_type: &Type, right: &Expr) -> Result<(), Error> {
    if *left_type != Type::Int {
        return Err(mismatch(&Type::Int, left_type, left));
    }
    if *right_type != Type::Int {
        return Err(mismatch(&Type::Int, right_type, right));
    }
    Ok(())
}

fn expect_arity(callee: &str, expected: usize, received: usize, at: &Expr) -> Result<(), Error> {
    if expected == received {
        return Ok(());
    }

    Err(Error::new(
        ErrorImpl::ArityMismatch {
            callee: callee.to_string(),
            expected,
            received,
        },
        at.span.start.clone(),
    ))
}

fn name_error(name: &str, reason: NameErrorReason, at: &Expr) -> Error {
    Error::new(
        ErrorImpl::NameError {
            name: name.to_string(),
            reason,
        },
        at.span.start.clone(),
    )
}
