/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the built tree and the types it carries
///
/// Submodules:
/// - ast: Expression, statement and declaration nodes
/// - symbols: Symbols and lexical scopes
/// - types: Type descriptors
pub mod ast;
pub mod symbols;
pub mod types;
