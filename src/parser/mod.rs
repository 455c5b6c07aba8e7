//! Input parsing for kubesh
//!
//! Only word splitting lives here; what the words mean is decided by the
//! command tree in [`crate::command`].

mod tokenize;

pub use tokenize::tokenize;
