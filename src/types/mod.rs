//! The type universe.
//!
//! All types of a compilation live in one [`types::TypeUniverse`] and are
//! referred to by [`types::TypeId`] handles. Integers are sized, booleans
//! are one bit wide, and literals start out as the flexible placeholder
//! until the type checker gives them a width.

pub mod types;
