//! Mock host components.

/// Mock host I/O.
pub mod io;
