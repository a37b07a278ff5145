//! Domain entities - spell slots, spell selection and catalog records

mod spell;
mod spell_selection;
mod spell_slots;
mod spellcasting_stats;

pub use spell::{CatalogSpell, SpellLevel};
pub use spell_selection::{SpellSelection, SpellState};
pub use spell_slots::{
    SlotDirtiness, SlotField, SpellSlotEntry, SpellSlotLevel, SpellSlots, MAX_SLOT_LEVEL,
};
pub use spellcasting_stats::{
    resolve_spellcasting_ability, SpellcastingOverrides, SpellcastingStats,
};
