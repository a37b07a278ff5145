//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Owns all its constituent parts (enforced by Rust ownership)
//! - Exposes behavior through methods, not public fields
//! - Returns decisions from mutations instead of reacting to change events

pub mod spellbook;

pub use spellbook::Spellbook;
