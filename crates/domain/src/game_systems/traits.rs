//! Game system traits for spellcasting mechanics.
//!
//! These traits define the interface for system-specific calculations,
//! allowing rule variants to plug in their own tables while the slot
//! manager and change detector stay system-agnostic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entities::SpellSlots;
use crate::error::DomainError;
use crate::value_objects::AbilityKey;

/// A rules system a spellbook is computed against.
pub trait GameSystem: CalculationEngine + SpellcastingSystem {
    /// Unique identifier (e.g., "dnd5e")
    fn system_id(&self) -> &str;

    /// Human-readable name
    fn display_name(&self) -> &str;
}

/// Calculation rules that vary per game system.
pub trait CalculationEngine: Send + Sync {
    /// Calculate ability modifier from score.
    ///
    /// For D&D-like systems: floor((score - 10) / 2)
    fn ability_modifier(&self, score: i32) -> i32;

    /// Calculate proficiency bonus from character level.
    ///
    /// For D&D 5e: ((level - 1) / 4) + 2
    fn proficiency_bonus(&self, level: u8) -> i32;
}

/// For systems with spellcasting.
pub trait SpellcastingSystem: Send + Sync {
    /// Classify a class/subclass pair. Unknown classes are non-casters.
    fn caster_archetype(&self, class_name: &str, subclass_name: &str) -> CasterArchetype;

    /// The spellcasting ability a class/subclass casts with, if known.
    fn spellcasting_ability(&self, class_name: &str, subclass_name: &str) -> Option<AbilityKey>;

    /// Fully rested slot maxima for a class/subclass at a character level.
    fn default_slots(&self, class_name: &str, subclass_name: &str, level: u8) -> SpellSlots;
}

/// Type of spellcaster, governing slot progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CasterArchetype {
    /// No spellcasting (Barbarian, Monk, plain Fighter/Rogue, unknown classes)
    #[default]
    None,
    /// Full caster (Wizard, Cleric, Druid, Sorcerer, Bard, Warlock)
    Full,
    /// Half caster (Paladin, Ranger, Artificer)
    Half,
    /// Third caster (Eldritch Knight, Arcane Trickster)
    Third,
}

impl CasterArchetype {
    /// Whether this archetype grants any spell slots.
    pub fn is_caster(&self) -> bool {
        !matches!(self, CasterArchetype::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CasterArchetype::None => "none",
            CasterArchetype::Full => "full",
            CasterArchetype::Half => "half",
            CasterArchetype::Third => "third",
        }
    }
}

impl fmt::Display for CasterArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CasterArchetype {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "full" => Ok(Self::Full),
            "half" => Ok(Self::Half),
            "third" => Ok(Self::Third),
            _ => Err(DomainError::parse(format!("Unknown caster archetype: {}", s))),
        }
    }
}
