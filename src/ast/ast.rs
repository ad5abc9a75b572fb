use super::{
    expressions::{Expr, ExprKind},
    statements::{FnDefStmt, Stmt},
};

/// A whole compilation unit: the statements of the top-level block, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Program { body }
    }

    /// Visits every expression node in the program, parents before children.
    pub fn for_each_expr<'a>(&'a self, f: &mut dyn FnMut(&'a Expr)) {
        for stmt in &self.body {
            visit_stmt(stmt, f);
        }
    }
}

fn visit_function<'a>(function: &'a FnDefStmt, f: &mut dyn FnMut(&'a Expr)) {
    for stmt in &function.body {
        visit_stmt(stmt, f);
    }
}

fn visit_stmt<'a>(stmt: &'a Stmt, f: &mut dyn FnMut(&'a Expr)) {
    match stmt {
        Stmt::VarDecl(var_decl) => visit_expr(&var_decl.assigned_value, f),
        Stmt::FnDef(function) => visit_function(function, f),
        Stmt::ClassDef(class) => {
            for field in &class.fields {
                visit_expr(&field.assigned_value, f);
            }
            for method in &class.methods {
                visit_function(method, f);
            }
        }
        Stmt::Assign(assign) => {
            visit_expr(&assign.target, f);
            visit_expr(&assign.value, f);
        }
        Stmt::If(if_stmt) => {
            visit_expr(&if_stmt.condition, f);
            if_stmt.then_body.iter().for_each(|s| visit_stmt(s, f));
            for clause in &if_stmt.elif_clauses {
                visit_expr(&clause.condition, f);
                clause.body.iter().for_each(|s| visit_stmt(s, f));
            }
            if_stmt.else_body.iter().for_each(|s| visit_stmt(s, f));
        }
        Stmt::While(while_stmt) => {
            visit_expr(&while_stmt.condition, f);
            while_stmt.body.iter().for_each(|s| visit_stmt(s, f));
        }
        Stmt::Pass(_) => {}
        Stmt::Return(ret) => visit_expr(&ret.value, f),
        Stmt::Expression(expr) => visit_expr(&expr.expression, f),
    }
}

fn visit_expr<'a>(expr: &'a Expr, f: &mut dyn FnMut(&'a Expr)) {
    f(expr);
    match &expr.kind {
        ExprKind::Literal(_) | ExprKind::Name(_) => {}
        ExprKind::Unary { operand, .. } => visit_expr(operand, f),
        ExprKind::Binary { left, right, .. } => {
            visit_expr(left, f);
            visit_expr(right, f);
        }
        ExprKind::Call { arguments, .. } => arguments.iter().for_each(|a| visit_expr(a, f)),
        ExprKind::FieldAccess { object, .. } => visit_expr(object, f),
        ExprKind::MethodCall {
            object, arguments, ..
        } => {
            visit_expr(object, f);
            arguments.iter().for_each(|a| visit_expr(a, f));
        }
    }
}
