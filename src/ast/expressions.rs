//! Expression nodes.
//!
//! Every expression owns a one-shot type slot. Tree lowering leaves it empty,
//! the type checker fills it exactly once, and nothing changes it afterwards.

use std::{cell::OnceCell, fmt::Display};

use crate::Span;

use super::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Number(i32),
    None,
    True,
    False,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "not"),
            UnaryOp::Neg => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Equal,
    Unequal,
    Le,
    Ge,
    Lt,
    Gt,
    Is,
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Equal => "==",
            BinaryOp::Unequal => "!=",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Is => "is",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Name(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        callee: String,
        arguments: Vec<Expr>,
    },
    FieldAccess {
        object: Box<Expr>,
        field: String,
    },
    MethodCall {
        object: Box<Expr>,
        method: String,
        arguments: Vec<Expr>,
    },
}

impl ExprKind {
    /// Short human readable name of the construct, used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            ExprKind::Literal(_) => String::from("literal"),
            ExprKind::Name(name) => format!("name `{}`", name),
            ExprKind::Unary { op, .. } => format!("unary `{}`", op),
            ExprKind::Binary { op, .. } => format!("binary `{}`", op),
            ExprKind::Call { callee, .. } => format!("call to `{}`", callee),
            ExprKind::FieldAccess { field, .. } => format!("field access `.{}`", field),
            ExprKind::MethodCall { method, .. } => format!("method call `.{}()`", method),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    ty: OnceCell<Type>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr {
            kind,
            span,
            ty: OnceCell::new(),
        }
    }

    /// The type assigned by the checker, if this node has been checked.
    pub fn get_type(&self) -> Option<&Type> {
        self.ty.get()
    }

    /// Records the checked type of this node.
    ///
    /// A node that is already annotated keeps its type; the existing type is
    /// returned as an error when it disagrees with `ty`.
    pub(crate) fn annotate(&self, ty: Type) -> Result<&Type, Type> {
        match self.ty.get() {
            Some(existing) if *existing == ty => Ok(existing),
            Some(existing) => Err(existing.clone()),
            None => Ok(self.ty.get_or_init(|| ty)),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn literal(literal: Literal) -> Self {
        Expr::new(ExprKind::Literal(literal), Span::null())
    }

    pub fn number(value: i32) -> Self {
        Expr::literal(Literal::Number(value))
    }

    pub fn boolean(value: bool) -> Self {
        Expr::literal(if value { Literal::True } else { Literal::False })
    }

    pub fn none() -> Self {
        Expr::literal(Literal::None)
    }

    pub fn name(name: &str) -> Self {
        Expr::new(ExprKind::Name(name.to_string()), Span::null())
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            Span::null(),
        )
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            Span::null(),
        )
    }

    pub fn call(callee: &str, arguments: Vec<Expr>) -> Self {
        Expr::new(
            ExprKind::Call {
                callee: callee.to_string(),
                arguments,
            },
            Span::null(),
        )
    }

    pub fn field(object: Expr, field: &str) -> Self {
        Expr::new(
            ExprKind::FieldAccess {
                object: Box::new(object),
                field: field.to_string(),
            },
            Span::null(),
        )
    }

    pub fn method_call(object: Expr, method: &str, arguments: Vec<Expr>) -> Self {
        Expr::new(
            ExprKind::MethodCall {
                object: Box::new(object),
                method: method.to_string(),
                arguments,
            },
            Span::null(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{BinaryOp, Expr};
    use crate::ast::types::Type;

    #[test]
    fn test_fresh_expression_is_untyped() {
        let expr = Expr::binary(BinaryOp::Plus, Expr::number(1), Expr::number(2));
        assert!(expr.get_type().is_none());
    }

    #[test]
    fn test_annotation_is_set_once() {
        let expr = Expr::number(1);

        assert_eq!(expr.annotate(Type::Int), Ok(&Type::Int));
        assert_eq!(expr.annotate(Type::Int), Ok(&Type::Int));
        assert_eq!(expr.annotate(Type::Bool), Err(Type::Int));
        assert_eq!(expr.get_type(), Some(&Type::Int));
    }
}
