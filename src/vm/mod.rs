//! Reference stack machine.
//!
//! Executes generated instruction sequences so their behavior can be compared
//! with direct evaluation of the source program.

pub mod machine;
