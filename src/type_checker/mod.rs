//! Type checking and semantic analysis module.
//!
//! This module performs type checking and semantic analysis on the AST.
//! It annotates the untyped AST in place while:
//!
//! - Verifying type correctness of expressions and statements
//! - Resolving variable, function and class references through a scope stack
//! - Checking call arity and argument types, including method calls
//! - Enforcing that declarations precede statements within each block
//! - Detecting functions that can finish without returning a value
//!
//! The first violation stops checking and is returned as an error.

pub mod expr;
pub mod scope;
pub mod stmt;
pub mod type_checker;
pub mod typed_ast;
