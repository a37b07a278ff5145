//! Game system rules.
//!
//! Spellcasting tables and calculations live behind [`GameSystem`] and its
//! supertraits, so the spellbook and change detector never hard-code a
//! particular edition.

mod dnd5e;
mod traits;

pub use dnd5e::{
    class_spellcasting_ability, classify_caster, default_slots, slot_row, Dnd5eSystem, SlotRow,
    MAX_TABLE_LEVEL,
};
pub use traits::{CalculationEngine, CasterArchetype, GameSystem, SpellcastingSystem};
