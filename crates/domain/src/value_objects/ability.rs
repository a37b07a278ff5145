//! Ability scores and the modifiers derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// One of the six D&D abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityKey {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl AbilityKey {
    /// All abilities in sheet order.
    pub const ALL: [AbilityKey; 6] = [
        AbilityKey::Str,
        AbilityKey::Dex,
        AbilityKey::Con,
        AbilityKey::Int,
        AbilityKey::Wis,
        AbilityKey::Cha,
    ];

    /// Three-letter abbreviation (e.g., "INT").
    pub fn abbreviation(&self) -> &'static str {
        match self {
            AbilityKey::Str => "STR",
            AbilityKey::Dex => "DEX",
            AbilityKey::Con => "CON",
            AbilityKey::Int => "INT",
            AbilityKey::Wis => "WIS",
            AbilityKey::Cha => "CHA",
        }
    }

    /// Full ability name (e.g., "Intelligence").
    pub fn full_name(&self) -> &'static str {
        match self {
            AbilityKey::Str => "Strength",
            AbilityKey::Dex => "Dexterity",
            AbilityKey::Con => "Constitution",
            AbilityKey::Int => "Intelligence",
            AbilityKey::Wis => "Wisdom",
            AbilityKey::Cha => "Charisma",
        }
    }

    /// Loosely match free text against the six abilities.
    ///
    /// Matches when the input contains the abbreviation or full name
    /// ("Spellcasting: WIS", "intelligence"), or when the input is a
    /// fragment of at least three letters of a full name ("intel").
    /// Case-insensitive. Returns `None` for empty or unrecognised text.
    pub fn parse_fuzzy(input: &str) -> Option<Self> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        Self::ALL
            .into_iter()
            .find(|key| {
                let full = key.full_name().to_lowercase();
                needle.contains(&key.abbreviation().to_lowercase())
                    || needle.contains(&full)
                    || (needle.len() >= 3 && full.contains(&needle))
            })
    }
}

impl fmt::Display for AbilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for AbilityKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| {
                key.abbreviation().eq_ignore_ascii_case(trimmed)
                    || key.full_name().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| DomainError::parse(format!("Unknown ability: {}", s)))
    }
}

/// Calculate an ability modifier: floor((score - 10) / 2).
///
/// Scores are not clamped; 1-30 is conventional but anything is accepted.
pub fn ability_modifier(score: i32) -> i32 {
    // Rust's `/` truncates toward zero; div_euclid floors for a positive divisor
    (score - 10).div_euclid(2)
}

/// Proficiency bonus for a character level: ((level - 1) / 4) + 2.
///
/// Level 0 is treated as level 1.
pub fn proficiency_bonus(level: u8) -> i32 {
    ((level.max(1) as i32 - 1) / 4) + 2
}

/// The six ability scores of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Abilities {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for Abilities {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

impl Abilities {
    /// Get the raw score for an ability.
    pub fn score(&self, key: AbilityKey) -> i32 {
        match key {
            AbilityKey::Str => self.strength,
            AbilityKey::Dex => self.dexterity,
            AbilityKey::Con => self.constitution,
            AbilityKey::Int => self.intelligence,
            AbilityKey::Wis => self.wisdom,
            AbilityKey::Cha => self.charisma,
        }
    }

    /// Get the modifier for an ability.
    pub fn modifier(&self, key: AbilityKey) -> i32 {
        ability_modifier(self.score(key))
    }

    /// Builder-style score override.
    pub fn with_score(mut self, key: AbilityKey, score: i32) -> Self {
        match key {
            AbilityKey::Str => self.strength = score,
            AbilityKey::Dex => self.dexterity = score,
            AbilityKey::Con => self.constitution = score,
            AbilityKey::Int => self.intelligence = score,
            AbilityKey::Wis => self.wisdom = score,
            AbilityKey::Cha => self.charisma = score,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ability_modifier_examples() {
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(17), 3);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(1), -5);
        assert_eq!(ability_modifier(30), 10);
    }

    #[test]
    fn proficiency_bonus_progression() {
        assert_eq!(proficiency_bonus(0), 2);
        assert_eq!(proficiency_bonus(1), 2);
        assert_eq!(proficiency_bonus(4), 2);
        assert_eq!(proficiency_bonus(5), 3);
        assert_eq!(proficiency_bonus(9), 4);
        assert_eq!(proficiency_bonus(13), 5);
        assert_eq!(proficiency_bonus(17), 6);
        assert_eq!(proficiency_bonus(20), 6);
    }

    #[test]
    fn fuzzy_parse_matches_abbreviations_and_names() {
        assert_eq!(AbilityKey::parse_fuzzy("INT"), Some(AbilityKey::Int));
        assert_eq!(AbilityKey::parse_fuzzy("wisdom"), Some(AbilityKey::Wis));
        assert_eq!(AbilityKey::parse_fuzzy("  Charisma (CHA) "), Some(AbilityKey::Cha));
        assert_eq!(AbilityKey::parse_fuzzy("intel"), Some(AbilityKey::Int));
        assert_eq!(AbilityKey::parse_fuzzy("Constitution"), Some(AbilityKey::Con));
    }

    #[test]
    fn fuzzy_parse_rejects_empty_and_unknown() {
        assert_eq!(AbilityKey::parse_fuzzy(""), None);
        assert_eq!(AbilityKey::parse_fuzzy("   "), None);
        assert_eq!(AbilityKey::parse_fuzzy("luck"), None);
    }

    #[test]
    fn strict_parse() {
        assert_eq!("dex".parse::<AbilityKey>(), Ok(AbilityKey::Dex));
        assert_eq!("Strength".parse::<AbilityKey>(), Ok(AbilityKey::Str));
        assert!(matches!(
            "intel".parse::<AbilityKey>(),
            Err(DomainError::Parse(_))
        ));
    }

    #[test]
    fn abilities_lookup() {
        let abilities = Abilities::default()
            .with_score(AbilityKey::Int, 17)
            .with_score(AbilityKey::Cha, 8);
        assert_eq!(abilities.score(AbilityKey::Int), 17);
        assert_eq!(abilities.modifier(AbilityKey::Int), 3);
        assert_eq!(abilities.modifier(AbilityKey::Cha), -1);
        assert_eq!(abilities.modifier(AbilityKey::Wis), 0);
    }

    proptest! {
        #[test]
        fn modifier_is_floor_of_half_difference(score in -100i32..100) {
            let expected = ((score - 10) as f64 / 2.0).floor() as i32;
            prop_assert_eq!(ability_modifier(score), expected);
        }
    }
}
