//! Type definitions for the AST.
//!
//! The language has three primitive types and one nominal type per declared
//! class. Two class types are equal exactly when their names are equal.
//!
//! Types appear in the AST as annotations (declarations, parameters, return
//! types) and are attached to every expression node by the type checker.

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Bool,
    None,
    /// A class instance, referenced by the class's declared name.
    Class(String),
}

impl Type {
    pub fn class(name: &str) -> Self {
        Type::Class(name.to_string())
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Type::Class(_))
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Class(name) => Some(name),
            _ => None,
        }
    }

    /// Whether a value of type `value` may initialize a slot declared as `self`.
    ///
    /// `None` is the null value of every class type.
    pub fn accepts_initializer(&self, value: &Type) -> bool {
        self == value || (self.is_class() && *value == Type::None)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::None => write!(f, "none"),
            Type::Class(name) => write!(f, "{}", name),
        }
    }
}
