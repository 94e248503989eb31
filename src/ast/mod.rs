/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The program root and the pieces shared by statements and expressions
/// - expressions: Expression nodes, including the nodes inserted by the type checker
/// - statements: Statement nodes
/// - dump: Indented tree printer used for debugging
pub mod ast;
pub mod dump;
pub mod expressions;
pub mod statements;
