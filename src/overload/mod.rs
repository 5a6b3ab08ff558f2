//! Overload sets assembled from naming conventions.
//!
//! Functions and methods named `name__0`, `name__1`, ... are grouped into a
//! single overloaded `name` whose variants are tried in index order.

pub mod overload;

#[cfg(test)]
mod tests;
