use crate::{
    ast::expressions::{BinaryOp, Expr, ExprKind, Literal, UnaryOp},
    errors::errors::{Error, ErrorImpl},
};

use super::{compiler::Compiler, instructions::Instruction, stdlib::lookup_builtin};

/// Emits instructions leaving the value of `expr` on top of the stack.
pub fn gen_expression(compiler: &mut Compiler, expr: &Expr) -> Result<(), Error> {
    match &expr.kind {
        ExprKind::Literal(literal) => {
            // Every value is a 32-bit integer at this layer.
            let value = match literal {
                Literal::Number(value) => *value,
                Literal::True => 1,
                Literal::False | Literal::None => 0,
            };
            compiler.emit(Instruction::PushConstant(value));
        }
        ExprKind::Name(name) => {
            let slot = compiler.slot_of(name, &expr.span.start)?;
            compiler.emit(Instruction::LoadLocal(slot));
        }
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => {
            compiler.emit(Instruction::PushConstant(0));
            gen_expression(compiler, operand)?;
            compiler.emit(Instruction::Sub);
        }
        ExprKind::Binary { op, left, right } => {
            let instruction = match op {
                BinaryOp::Plus => Instruction::Add,
                BinaryOp::Minus => Instruction::Sub,
                BinaryOp::Mul => Instruction::Mul,
                _ => return Err(unsupported(expr)),
            };

            gen_expression(compiler, left)?;
            gen_expression(compiler, right)?;
            compiler.emit(instruction);
        }
        ExprKind::Call { callee, arguments } => {
            if lookup_builtin(callee).is_none() {
                return Err(unsupported(expr));
            }

            for argument in arguments.iter() {
                gen_expression(compiler, argument)?;
            }
            compiler.emit(Instruction::Call(callee.clone()));
        }
        ExprKind::Unary { .. } | ExprKind::FieldAccess { .. } | ExprKind::MethodCall { .. } => {
            return Err(unsupported(expr));
        }
    }

    Ok(())
}

fn unsupported(expr: &Expr) -> Error {
    Error::new(
        ErrorImpl::UnsupportedOperation {
            operation: expr.kind.describe(),
        },
        expr.span.start.clone(),
    )
}
