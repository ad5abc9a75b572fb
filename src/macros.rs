//! Utility macros for the compiler.
//!
//! This module defines helper macros for the listing reader:
//!
//! - `MK_PLAIN_HANDLER!` - Creates a handler for an instruction without operand
//! - `MK_NAMED_HANDLER!` - Creates a handler for an instruction taking a slot or callee name
//!
//! These macros reduce boilerplate in the listing pattern table.

/// Creates a listing handler for an operand-less instruction.
///
/// # Example
///
/// ```ignore
/// ListingPattern {
///     regex: Regex::new("^add$").unwrap(),
///     handler: MK_PLAIN_HANDLER!(Instruction::Add),
/// }
/// ```
#[macro_export]
macro_rules! MK_PLAIN_HANDLER {
    ($instruction:expr) => {
        |_captures| Some($instruction)
    };
}

/// Creates a listing handler that passes the first capture group, as an owned
/// name, to `$constructor`.
///
/// # Example
///
/// ```ignore
/// ListingPattern {
///     regex: Regex::new(r"^load-local\(([^()\s]+)\)$").unwrap(),
///     handler: MK_NAMED_HANDLER!(Instruction::LoadLocal),
/// }
/// ```
#[macro_export]
macro_rules! MK_NAMED_HANDLER {
    ($constructor:path) => {
        |captures| Some($constructor(captures[1].to_string()))
    };
}
