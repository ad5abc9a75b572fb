use crate::Span;

use super::{expressions::Expr, types::Type};

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub param_type: Type,
}

impl Parameter {
    pub fn new(name: &str, param_type: Type) -> Self {
        Parameter {
            name: name.to_string(),
            param_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub identifier: String,
    pub var_type: Type,
    pub assigned_value: Expr,
    pub span: Span,
}

impl VarDeclStmt {
    pub fn new(identifier: &str, var_type: Type, assigned_value: Expr) -> Self {
        VarDeclStmt {
            identifier: identifier.to_string(),
            var_type,
            assigned_value,
            span: Span::null(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDefStmt {
    pub identifier: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Type,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl FnDefStmt {
    pub fn new(identifier: &str, parameters: Vec<Parameter>, return_type: Type, body: Vec<Stmt>) -> Self {
        FnDefStmt {
            identifier: identifier.to_string(),
            parameters,
            return_type,
            body,
            span: Span::null(),
        }
    }

    pub fn parameter_types(&self) -> Vec<Type> {
        self.parameters.iter().map(|p| p.param_type.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDefStmt {
    pub name: String,
    pub fields: Vec<VarDeclStmt>,
    pub methods: Vec<FnDefStmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    /// A name or a field access.
    pub target: Expr,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElifClause {
    pub condition: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: Vec<Stmt>,
    pub elif_clauses: Vec<ElifClause>,
    /// Empty when there is no `else`.
    pub else_body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    /// A bare `return` is lowered to `return None`.
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    FnDef(FnDefStmt),
    ClassDef(ClassDefStmt),
    Assign(AssignStmt),
    If(IfStmt),
    While(WhileStmt),
    Pass(Span),
    Return(ReturnStmt),
    Expression(ExpressionStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::VarDecl(stmt) => &stmt.span,
            Stmt::FnDef(stmt) => &stmt.span,
            Stmt::ClassDef(stmt) => &stmt.span,
            Stmt::Assign(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::Pass(span) => span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::Expression(stmt) => &stmt.span,
        }
    }

    /// Variable, function and class definitions are declarations; everything else executes.
    pub fn is_declaration(&self) -> bool {
        matches!(self, Stmt::VarDecl(_) | Stmt::FnDef(_) | Stmt::ClassDef(_))
    }

    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Stmt::VarDecl(stmt) => Some(&stmt.identifier),
            Stmt::FnDef(stmt) => Some(&stmt.identifier),
            Stmt::ClassDef(stmt) => Some(&stmt.name),
            _ => None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        match &mut self {
            Stmt::VarDecl(stmt) => stmt.span = span,
            Stmt::FnDef(stmt) => stmt.span = span,
            Stmt::ClassDef(stmt) => stmt.span = span,
            Stmt::Assign(stmt) => stmt.span = span,
            Stmt::If(stmt) => stmt.span = span,
            Stmt::While(stmt) => stmt.span = span,
            Stmt::Pass(inner) => *inner = span,
            Stmt::Return(stmt) => stmt.span = span,
            Stmt::Expression(stmt) => stmt.span = span,
        }
        self
    }

    pub fn var_decl(identifier: &str, var_type: Type, assigned_value: Expr) -> Self {
        Stmt::VarDecl(VarDeclStmt::new(identifier, var_type, assigned_value))
    }

    pub fn function(identifier: &str, parameters: Vec<Parameter>, return_type: Type, body: Vec<Stmt>) -> Self {
        Stmt::FnDef(FnDefStmt::new(identifier, parameters, return_type, body))
    }

    pub fn class(name: &str, fields: Vec<VarDeclStmt>, methods: Vec<FnDefStmt>) -> Self {
        Stmt::ClassDef(ClassDefStmt {
            name: name.to_string(),
            fields,
            methods,
            span: Span::null(),
        })
    }

    pub fn assign(name: &str, value: Expr) -> Self {
        Stmt::assign_to(Expr::name(name), value)
    }

    pub fn assign_to(target: Expr, value: Expr) -> Self {
        Stmt::Assign(AssignStmt {
            target,
            value,
            span: Span::null(),
        })
    }

    pub fn if_else(condition: Expr, then_body: Vec<Stmt>, elif_clauses: Vec<ElifClause>, else_body: Vec<Stmt>) -> Self {
        Stmt::If(IfStmt {
            condition,
            then_body,
            elif_clauses,
            else_body,
            span: Span::null(),
        })
    }

    pub fn while_loop(condition: Expr, body: Vec<Stmt>) -> Self {
        Stmt::While(WhileStmt {
            condition,
            body,
            span: Span::null(),
        })
    }

    pub fn pass() -> Self {
        Stmt::Pass(Span::null())
    }

    pub fn ret(value: Expr) -> Self {
        Stmt::Return(ReturnStmt {
            value,
            span: Span::null(),
        })
    }

    pub fn expr(expression: Expr) -> Self {
        Stmt::Expression(ExpressionStmt {
            expression,
            span: Span::null(),
        })
    }
}
