//! Nested symbol environments.
//!
//! Variables, functions and classes share one stack of tables. Duplicate checks
//! look at the innermost table only, reference resolution walks the whole chain
//! from innermost to outermost.

use std::collections::HashMap;

use log::trace;

use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
    Position,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    /// For methods this includes the explicit receiver parameter.
    pub parameters: Vec<Type>,
    pub return_type: Type,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassInfo {
    pub methods: HashMap<String, FunctionSignature>,
    pub fields: HashMap<String, Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Variable(Type),
    Function(FunctionSignature),
    Class(ClassInfo),
}

impl Symbol {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Symbol::Variable(_) => "variable",
            Symbol::Function(_) => "function",
            Symbol::Class(_) => "class",
        }
    }
}

pub type SymbolTable = HashMap<String, Symbol>;

#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<SymbolTable>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack { scopes: vec![] }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(SymbolTable::new());
        trace!("entered scope {}", self.scopes.len() - 1);
    }

    /// Pops the innermost table.
    ///
    /// # Panics
    ///
    /// Panics when the stack is empty; every exit must pair with an earlier enter.
    pub fn exit_scope(&mut self) {
        if self.scopes.pop().is_none() {
            panic!("Cannot exit a scope when no scope is active");
        }
        trace!("exited scope {}", self.scopes.len());
    }

    pub fn define(&mut self, name: &str, symbol: Symbol, position: Position) -> Result<(), Error> {
        let depth = self.scopes.len().saturating_sub(1);
        let Some(current) = self.scopes.last_mut() else {
            panic!("Cannot define `{}` when no scope is active", name);
        };

        if current.contains_key(name) {
            return Err(Error::new(
                ErrorImpl::DuplicateDefinition {
                    name: name.to_string(),
                },
                position,
            ));
        }

        trace!("defined {} `{}` at depth {}", symbol.kind_name(), name, depth);
        current.insert(name.to_string(), symbol);
        Ok(())
    }

    /// Finds the innermost binding of `name`, or only looks at the innermost
    /// table when `current_only` is set.
    pub fn lookup(&self, name: &str, current_only: bool) -> Option<&Symbol> {
        if current_only {
            return self.scopes.last().and_then(|scope| scope.get(name));
        }

        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::{FunctionSignature, ScopeStack, Symbol};
    use crate::{ast::types::Type, errors::errors::ErrorKind, Position};

    fn int_var() -> Symbol {
        Symbol::Variable(Type::Int)
    }

    #[test]
    fn test_define_and_lookup() {
        let mut scopes = ScopeStack::new();
        scopes.enter_scope();
        scopes.define("x", int_var(), Position::null()).unwrap();

        assert_eq!(scopes.lookup("x", false), Some(&int_var()));
        assert_eq!(scopes.lookup("x", true), Some(&int_var()));
        assert_eq!(scopes.lookup("y", false), None);
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut scopes = ScopeStack::new();
        scopes.enter_scope();
        scopes.define("z", int_var(), Position::null()).unwrap();

        let error = scopes
            .define("z", Symbol::Variable(Type::Bool), Position::null())
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DuplicateDefinition);
        assert_eq!(scopes.lookup("z", false), Some(&int_var()));
    }

    #[test]
    fn test_inner_scope_shadows_outer() {
        let mut scopes = ScopeStack::new();
        scopes.enter_scope();
        scopes.define("x", int_var(), Position::null()).unwrap();

        scopes.enter_scope();
        scopes
            .define("x", Symbol::Variable(Type::Bool), Position::null())
            .unwrap();
        assert_eq!(scopes.lookup("x", false), Some(&Symbol::Variable(Type::Bool)));

        scopes.exit_scope();
        assert_eq!(scopes.lookup("x", false), Some(&int_var()));
    }

    #[test]
    fn test_current_only_ignores_outer_scopes() {
        let mut scopes = ScopeStack::new();
        scopes.enter_scope();
        scopes
            .define(
                "f",
                Symbol::Function(FunctionSignature {
                    parameters: vec![],
                    return_type: Type::None,
                }),
                Position::null(),
            )
            .unwrap();
        scopes.enter_scope();

        assert!(scopes.lookup("f", true).is_none());
        assert!(scopes.lookup("f", false).is_some());
    }

    #[test]
    fn test_define_in_nested_scope_leaves_outer_untouched() {
        let mut scopes = ScopeStack::new();
        scopes.enter_scope();
        scopes.enter_scope();
        scopes.define("inner", int_var(), Position::null()).unwrap();
        assert_eq!(scopes.depth(), 2);

        scopes.exit_scope();
        assert!(scopes.lookup("inner", false).is_none());
        scopes.define("inner", Symbol::Variable(Type::Bool), Position::null()).unwrap();
        assert_eq!(scopes.lookup("inner", true), Some(&Symbol::Variable(Type::Bool)));
    }

    #[test]
    #[should_panic(expected = "Cannot exit a scope")]
    fn test_exit_empty_stack_panics() {
        let mut scopes = ScopeStack::new();
        scopes.exit_scope();
    }
}
