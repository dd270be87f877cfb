//! CPU core tests.

/// The fetch, decode and execute cycle.
pub mod cycle;


/// General-purpose registers.
pub mod registers;
