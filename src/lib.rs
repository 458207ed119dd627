//! Nearest-neighbor ranking of abundance profiles.
//!
//! Every vector is rescaled to relative abundances, every feature is weighted
//! by its share of the whole collection's mass, and vectors are compared with
//! the weighted Euclidean distance of their relative forms.

#[macro_use]
extern crate log;

pub mod abundance;
pub mod input;

pub use abundance::{
    AbundanceError, Collection, DegeneratePolicy, Neighbor, Options, Subject, DEFAULT_LIMIT,
};
