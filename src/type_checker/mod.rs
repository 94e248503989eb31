//! Type inference and checking.
//!
//! Walks a resolved program once, giving every expression a type and every
//! symbol its fixed type. Literals and input reads start out flexible and take
//! their width from the context they are used in. Conversions and loads are
//! made explicit as nodes in the tree so the emitter never has to guess.

pub mod type_checker;

#[cfg(test)]
mod tests;
