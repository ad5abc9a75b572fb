//! Built-in callables supplied by the host runtime.
//!
//! Built-ins are not bound in any scope. The type checker consults this table
//! before resolving a call through the scope chain, and the generator only
//! emits `call(name)` for names found here.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::ast::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct Builtin {
    pub name: &'static str,
    /// Number of operands popped from the stack by `call(name)`.
    pub arity: usize,
    pub return_type: Type,
}

lazy_static! {
    pub static ref BUILTINS: HashMap<&'static str, Builtin> = {
        let mut map = HashMap::new();
        // Accepts a value of any type.
        map.insert("print", Builtin { name: "print", arity: 1, return_type: Type::None });
        map
    };
}

pub fn lookup_builtin(name: &str) -> Option<&'static Builtin> {
    BUILTINS.get(name)
}

#[cfg(test)]
mod tests {
    use super::lookup_builtin;
    use crate::ast::types::Type;

    #[test]
    fn test_print_is_builtin() {
        let print = lookup_builtin("print").unwrap();
        assert_eq!(print.arity, 1);
        assert_eq!(print.return_type, Type::None);
    }

    #[test]
    fn test_user_names_are_not_builtins() {
        assert!(lookup_builtin("f").is_none());
        assert!(lookup_builtin("Print").is_none());
    }
}
