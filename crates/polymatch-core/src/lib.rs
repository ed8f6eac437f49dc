//! Shared types for the polymatch multi-pattern matcher.
//!
//! This crate holds the pieces every other polymatch crate agrees on: what a
//! symbol is, which symbols a pattern set may use, and how a match is
//! reported.
//!
//! # Architecture
//!
//! - [`symbol`] -- The [`Symbol`] trait keying automaton transitions
//! - [`alphabet`] -- Alphabet policies that validate pattern symbols
//! - [`span`] -- Pattern identifiers, spans and reported matches

pub mod alphabet;
pub mod span;
pub mod symbol;

pub use alphabet::Alphabet;
pub use span::{Match, PatternId, Span};
pub use symbol::Symbol;
