//! Error types and error handling for the compiler.
//!
//! This module defines the single error type shared by every stage of the
//! pipeline. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for checking, generation, and the reference machine
//! - Error names and suggestions for rendering diagnostics
//!
//! The first error raised by any stage aborts the whole compilation.

pub mod errors;
