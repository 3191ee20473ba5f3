#![crate_name = "lss_math"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Finite-field arithmetic and linear algebra for the lss crates.
//!
//! Elements of GF(q) are represented as integers in `0..q`; vectors and
//! matrices are `ndarray` arrays of such integers, and every operation goes
//! through a [`gf::Field`] so that the representation never leaks arithmetic.

mod errors;

pub mod gf;
pub mod linalg;
pub mod span;
pub mod tuples;

pub use errors::{Error, Result};
