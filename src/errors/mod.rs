//! Error types and error handling for the compiler.
//!
//! Every stage of the pipeline reports failures through the same
//! [`errors::Error`] type. Errors are fatal: the first one aborts the
//! compilation and no IR is produced. Each error carries:
//!
//! - A specific variant naming the failure class
//! - A short name for display (`get_error_name`)
//! - A suggestion for the user (`get_tip`)

pub mod errors;

#[cfg(test)]
mod tests;
