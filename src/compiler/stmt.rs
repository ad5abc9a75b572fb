use crate::{
    ast::{expressions::ExprKind, statements::Stmt},
    errors::errors::{Error, ErrorImpl},
};

use super::{compiler::Compiler, expr::gen_expression, instructions::Instruction};

/// Lowers one statement. Statements lower independently and their output is
/// appended in program order.
pub fn gen_statement(compiler: &mut Compiler, statement: &Stmt) -> Result<(), Error> {
    match statement {
        Stmt::VarDecl(var_decl) => {
            gen_expression(compiler, &var_decl.assigned_value)?;
            let slot = compiler.slot_of(&var_decl.identifier, &var_decl.span.start)?;
            compiler.emit(Instruction::StoreLocal(slot));
        }
        Stmt::Assign(assign) => {
            let ExprKind::Name(name) = &assign.target.kind else {
                return Err(unsupported(
                    format!("assignment to {}", assign.target.kind.describe()),
                    statement,
                ));
            };

            gen_expression(compiler, &assign.value)?;
            let slot = compiler.slot_of(name, &assign.target.span.start)?;
            compiler.emit(Instruction::StoreLocal(slot));
        }
        Stmt::Expression(expression) => {
            gen_expression(compiler, &expression.expression)?;
            let scratch = compiler.slot_of(&compiler.scratch_slot().to_string(), &expression.span.start)?;
            compiler.emit(Instruction::StoreLocal(scratch));
        }
        Stmt::Pass(_) => {}
        Stmt::FnDef(function) => {
            return Err(unsupported(
                format!("function definition `{}`", function.identifier),
                statement,
            ));
        }
        Stmt::ClassDef(class) => {
            return Err(unsupported(format!("class definition `{}`", class.name), statement));
        }
        Stmt::If(_) => return Err(unsupported(String::from("if statement"), statement)),
        Stmt::While(_) => return Err(unsupported(String::from("while loop"), statement)),
        Stmt::Return(_) => return Err(unsupported(String::from("return statement"), statement)),
    }

    Ok(())
}

fn unsupported(operation: String, statement: &Stmt) -> Error {
    Error::new(
        ErrorImpl::UnsupportedOperation { operation },
        statement.get_span().start.clone(),
    )
}
