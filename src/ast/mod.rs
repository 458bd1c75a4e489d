/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The Program root produced per source file
/// - expressions: The closed family of expression nodes
/// - statements: The closed family of statement nodes
/// - types: Type representations, from annotations and from inference
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
