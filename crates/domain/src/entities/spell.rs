//! Spell catalog records.
//!
//! The catalog itself lives outside the rules core; this is the shape of one
//! record as the catalog provides it. Known/prepared tracking only ever
//! refers to spells by name.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One spell as listed in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSpell {
    /// Display name, also the identifier used by known/prepared lists
    pub name: String,
    pub level: SpellLevel,
    /// School of magic (e.g., "Evocation", "Necromancy")
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub casting_time: String,
    #[serde(default)]
    pub range: String,
    /// Components as printed ("V, S, M (a bit of bat fur)")
    #[serde(default)]
    pub components: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
    /// Source book reference (e.g., "PHB p.241")
    #[serde(default)]
    pub source: String,
    /// Classes that can learn this spell
    #[serde(default)]
    pub classes: Vec<String>,
}

impl CatalogSpell {
    pub fn new(name: impl Into<String>, level: SpellLevel) -> Self {
        Self {
            name: name.into(),
            level,
            school: String::new(),
            casting_time: String::new(),
            range: String::new(),
            components: String::new(),
            duration: String::new(),
            description: String::new(),
            source: String::new(),
            classes: Vec::new(),
        }
    }

    pub fn with_school(mut self, school: impl Into<String>) -> Self {
        self.school = school.into();
        self
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    /// Whether a class appears on this spell's class list (case-insensitive).
    pub fn available_to(&self, class_name: &str) -> bool {
        let class_name = class_name.trim();
        self.classes
            .iter()
            .any(|class| class.trim().eq_ignore_ascii_case(class_name))
    }
}

/// Spell level: cantrip (0) through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SpellLevel {
    /// Cantrip (level 0 spell, can be cast at will)
    Cantrip,
    /// Leveled spell (1-9)
    Level(u8),
}

impl SpellLevel {
    /// Convert to numeric level (cantrip = 0).
    pub fn as_number(&self) -> u8 {
        match self {
            SpellLevel::Cantrip => 0,
            SpellLevel::Level(n) => *n,
        }
    }

    /// Check if this is a cantrip.
    pub fn is_cantrip(&self) -> bool {
        matches!(self, SpellLevel::Cantrip)
    }
}

impl TryFrom<u8> for SpellLevel {
    type Error = DomainError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(SpellLevel::Cantrip),
            1..=9 => Ok(SpellLevel::Level(level)),
            _ => Err(DomainError::validation(format!(
                "Spell level must be between 0 and 9, got {}",
                level
            ))),
        }
    }
}

impl From<SpellLevel> for u8 {
    fn from(level: SpellLevel) -> Self {
        level.as_number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_catalog_record() {
        let json = r#"{
            "name": "Fireball",
            "level": 3,
            "school": "Evocation",
            "castingTime": "1 action",
            "range": "150 feet",
            "components": "V, S, M",
            "duration": "Instantaneous",
            "description": "A bright streak flashes...",
            "source": "PHB",
            "classes": ["Sorcerer", "Wizard"]
        }"#;

        let spell: CatalogSpell = serde_json::from_str(json).unwrap();
        assert_eq!(spell.level, SpellLevel::Level(3));
        assert_eq!(spell.casting_time, "1 action");
        assert!(spell.available_to("wizard"));
        assert!(!spell.available_to("Cleric"));
        assert!(spell.is_named("fireball"));
    }

    #[test]
    fn cantrip_level_zero() {
        let spell: CatalogSpell =
            serde_json::from_str(r#"{"name": "Light", "level": 0}"#).unwrap();
        assert!(spell.level.is_cantrip());
        assert_eq!(serde_json::to_value(spell.level).unwrap(), serde_json::json!(0));
    }

    #[test]
    fn builder_sets_school_and_classes() {
        let spell = CatalogSpell::new("Shield", SpellLevel::Level(1))
            .with_school("Abjuration")
            .with_classes(["Wizard", "Sorcerer"]);

        assert_eq!(spell.school, "Abjuration");
        assert!(spell.available_to("SORCERER"));
        assert!(!spell.available_to("Druid"));
    }

    #[test]
    fn rejects_level_above_nine() {
        assert!(serde_json::from_str::<CatalogSpell>(r#"{"name": "X", "level": 10}"#).is_err());
    }
}
