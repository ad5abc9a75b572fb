/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: the program root and traversal helpers
/// - expressions: literals, operators and expression nodes with their type slot
/// - statements: declarations and executable statements
/// - types: the primitive and class types of the language
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
