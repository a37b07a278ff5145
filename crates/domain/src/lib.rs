//! Spellcasting and dice-resolution rules.
//!
//! Everything here is synchronous and free of I/O. Random face values and the
//! spell catalog are supplied by the caller (see `grimoire-engine`).

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod game_systems;
pub mod types;
pub mod value_objects;

pub use aggregates::Spellbook;
pub use entities::{
    CatalogSpell, SlotDirtiness, SlotField, SpellLevel, SpellSelection, SpellSlotEntry,
    SpellSlotLevel, SpellSlots, SpellState, SpellcastingOverrides, SpellcastingStats,
};
pub use error::DomainError;
pub use game_systems::{CasterArchetype, Dnd5eSystem, GameSystem};
pub use types::{
    CasterChangeChoice, CasterIdentity, ChangeDetector, DetectorState, DirtySlotChoice,
    TransitionDecision,
};
pub use value_objects::{
    Abilities, AbilityKey, AdvantageContext, AdvantageMode, AdvantageOutcome, Candidate, DiceGroup,
    DiceRequest, DiceSpec, RawRollSet, RollMode, RollResult,
};
