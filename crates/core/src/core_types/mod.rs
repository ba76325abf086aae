//! Core types and utilities

pub mod field;

pub use field::*;
