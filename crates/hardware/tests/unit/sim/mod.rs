//! ELF loading tests.



/// Segment extraction and memory image construction.
pub mod segments;
