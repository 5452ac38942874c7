//! Property-based tests for identifiers and rendering

mod rendering;
