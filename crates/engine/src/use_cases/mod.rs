//! Use cases - player actions orchestrated over the domain and ports.

pub mod roll;
pub mod spellbook;

pub use roll::{RollDice, RollError, RollOutcome, RollRequest};
pub use spellbook::SpellbookSession;
