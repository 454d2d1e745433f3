//! Persona Insight: profile analysis client core.

pub mod analysis;
pub mod config;
pub mod error;
