//! D&D 5th Edition spellcasting rules.
//!
//! Caster classification, the spellcasting ability each class uses, and the
//! slot progression tables for every caster archetype.

use super::traits::{CalculationEngine, CasterArchetype, GameSystem, SpellcastingSystem};
use crate::entities::SpellSlots;
use crate::value_objects::{ability_modifier, proficiency_bonus, AbilityKey};

/// Highest character level the slot tables define.
pub const MAX_TABLE_LEVEL: u8 = 20;

/// Slot maxima for spell levels 1-9.
pub type SlotRow = [u8; 9];

/// Class name fragments and the archetype they resolve to.
///
/// Fighter and Rogue are absent: their archetype depends on the subclass.
const CLASS_ARCHETYPES: &[(&str, CasterArchetype)] = &[
    ("wizard", CasterArchetype::Full),
    ("cleric", CasterArchetype::Full),
    ("druid", CasterArchetype::Full),
    ("sorcerer", CasterArchetype::Full),
    ("bard", CasterArchetype::Full),
    ("paladin", CasterArchetype::Half),
    ("ranger", CasterArchetype::Half),
    ("artificer", CasterArchetype::Half),
    // Pact slots are approximated by the full caster table
    ("warlock", CasterArchetype::Full),
    ("eldritch knight", CasterArchetype::Third),
    ("arcane trickster", CasterArchetype::Third),
];

const CLASS_ABILITIES: &[(&str, AbilityKey)] = &[
    ("wizard", AbilityKey::Int),
    ("artificer", AbilityKey::Int),
    ("cleric", AbilityKey::Wis),
    ("druid", AbilityKey::Wis),
    ("ranger", AbilityKey::Wis),
    ("bard", AbilityKey::Cha),
    ("paladin", AbilityKey::Cha),
    ("sorcerer", AbilityKey::Cha),
    ("warlock", AbilityKey::Cha),
    ("eldritch knight", AbilityKey::Int),
    ("arcane trickster", AbilityKey::Int),
];

/// D&D 5th Edition game system.
pub struct Dnd5eSystem;

impl Default for Dnd5eSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Dnd5eSystem {
    /// Create a new D&D 5e system instance.
    pub fn new() -> Self {
        Self
    }
}

impl GameSystem for Dnd5eSystem {
    fn system_id(&self) -> &str {
        "dnd5e"
    }

    fn display_name(&self) -> &str {
        "D&D 5th Edition"
    }
}

impl CalculationEngine for Dnd5eSystem {
    fn ability_modifier(&self, score: i32) -> i32 {
        ability_modifier(score)
    }

    fn proficiency_bonus(&self, level: u8) -> i32 {
        proficiency_bonus(level)
    }
}

impl SpellcastingSystem for Dnd5eSystem {
    fn caster_archetype(&self, class_name: &str, subclass_name: &str) -> CasterArchetype {
        classify_caster(class_name, subclass_name)
    }

    fn spellcasting_ability(&self, class_name: &str, subclass_name: &str) -> Option<AbilityKey> {
        class_spellcasting_ability(class_name, subclass_name)
    }

    fn default_slots(&self, class_name: &str, subclass_name: &str, level: u8) -> SpellSlots {
        default_slots(class_name, subclass_name, level)
    }
}

/// Which third-caster subclass (if any) a Fighter or Rogue has taken.
///
/// Returns `Some(true)` for Eldritch Knight / Arcane Trickster,
/// `Some(false)` for any other Fighter or Rogue, `None` for other classes.
fn third_caster_subclass(class: &str, subclass: &str) -> Option<bool> {
    if class.contains("fighter") {
        Some(subclass.contains("eldritch"))
    } else if class.contains("rogue") {
        Some(subclass.contains("arcane") || subclass.contains("trickster"))
    } else {
        None
    }
}

/// Classify a class/subclass pair into a caster archetype.
///
/// Matching is case-insensitive and tolerant of decorated names
/// ("Wizard (Evocation)"). Unknown classes are non-casters.
pub fn classify_caster(class_name: &str, subclass_name: &str) -> CasterArchetype {
    let class = class_name.trim().to_lowercase();
    let subclass = subclass_name.trim().to_lowercase();
    if class.is_empty() {
        return CasterArchetype::None;
    }

    if let Some(is_third) = third_caster_subclass(&class, &subclass) {
        return if is_third {
            CasterArchetype::Third
        } else {
            CasterArchetype::None
        };
    }

    CLASS_ARCHETYPES
        .iter()
        .find(|(name, _)| class.contains(name))
        .map(|(_, archetype)| *archetype)
        .unwrap_or(CasterArchetype::None)
}

/// The spellcasting ability inferred from a class/subclass pair.
///
/// `None` when the class has no spellcasting ability of its own; callers
/// fall back to Intelligence.
pub fn class_spellcasting_ability(class_name: &str, subclass_name: &str) -> Option<AbilityKey> {
    let class = class_name.trim().to_lowercase();
    let subclass = subclass_name.trim().to_lowercase();
    if class.is_empty() {
        return None;
    }

    if let Some(is_third) = third_caster_subclass(&class, &subclass) {
        return is_third.then_some(AbilityKey::Int);
    }

    CLASS_ABILITIES
        .iter()
        .find(|(name, _)| class.contains(name))
        .map(|(_, ability)| *ability)
}

/// Fully rested slots for a class/subclass at a character level.
pub fn default_slots(class_name: &str, subclass_name: &str, level: u8) -> SpellSlots {
    SpellSlots::from_maxima(&slot_row(classify_caster(class_name, subclass_name), level))
}

/// Slot maxima for an archetype at a character level.
///
/// Levels above the table clamp to 20; level 0 reads as level 1.
pub fn slot_row(archetype: CasterArchetype, level: u8) -> SlotRow {
    let level = level.clamp(1, MAX_TABLE_LEVEL);
    let index = (level - 1) as usize;
    match archetype {
        CasterArchetype::None => [0; 9],
        CasterArchetype::Full => FULL_CASTER_SLOTS[index],
        CasterArchetype::Half => HALF_CASTER_SLOTS[index],
        CasterArchetype::Third => THIRD_CASTER_SLOTS[index],
    }
}

// Spell slot progression tables (index is character level - 1)

const FULL_CASTER_SLOTS: [SlotRow; 20] = [
    [2, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 2, 1, 1],
];

// Half casters get slots at half rate (starting at level 2)
const HALF_CASTER_SLOTS: [SlotRow; 20] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [2, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0],
];

// Third casters (Eldritch Knight, Arcane Trickster) start at level 3
const THIRD_CASTER_SLOTS: [SlotRow; 20] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [2, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
];
