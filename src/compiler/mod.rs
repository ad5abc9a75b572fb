//! Code generation module for the compiler.
//!
//! This module lowers the typed AST into a flat instruction sequence for a
//! stack machine whose only value is a 32-bit integer. It handles:
//!
//! - Local slot allocation, one slot per variable name in the block
//! - Lowering of literals, names, `+`, `-`, `*`, negation and built-in calls
//! - The instruction vocabulary and its textual listing
//! - The built-in callable table shared with the type checker
//!
//! Constructs the checker accepts but this stage cannot lower yet are reported
//! as `UnsupportedOperation`.

pub mod compiler;
pub mod expr;
pub mod instructions;
pub mod stdlib;
pub mod stmt;
