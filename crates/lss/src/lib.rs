#![crate_name = "lss"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Search for linear secret-sharing schemes realizing a given access
//! structure.
//!
//! The search walks a leveled tree whose edges are labelled by vectors over
//! GF(q); every label is checked against incrementally maintained linear
//! invariants so that no forbidden set ever learns the secret. A leaf yields
//! the generator matrix of a scheme, which is then checked independently by
//! the [`validator`].

mod errors;

pub mod access_structure;
pub mod block_vector;
pub mod config;
pub mod construction;
pub mod coordinator;
pub mod labels;
pub mod parameters;
pub mod progress;
pub mod report;
pub mod search;
pub mod validator;

pub use errors::{Error, Result};
