//! Spell save DC and spell attack modifier.

use serde::{Deserialize, Serialize};

use crate::value_objects::AbilityKey;

/// User overrides for spellcasting numbers. `None` means "auto".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellcastingOverrides {
    /// Stored ability name, fuzzy-parsed ("Wis", "wisdom", "WIS")
    #[serde(default)]
    pub ability: Option<String>,
    #[serde(default)]
    pub spell_save_dc: Option<i32>,
    #[serde(default)]
    pub spell_attack_modifier: Option<i32>,
}

impl SpellcastingOverrides {
    pub fn is_empty(&self) -> bool {
        self.ability.is_none() && self.spell_save_dc.is_none() && self.spell_attack_modifier.is_none()
    }
}

/// Derived spellcasting numbers, auto values alongside the effective ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellcastingStats {
    pub ability: AbilityKey,
    pub ability_mod: i32,
    pub proficiency: i32,
    pub auto_spell_save_dc: i32,
    pub auto_spell_attack_modifier: i32,
    pub spell_save_dc: i32,
    pub spell_attack_modifier: i32,
    pub has_spell_save_override: bool,
    pub has_spell_attack_override: bool,
}

impl SpellcastingStats {
    /// DC = 8 + proficiency + modifier; attack = proficiency + modifier.
    pub fn calculate(
        ability: AbilityKey,
        ability_mod: i32,
        proficiency: i32,
        spell_save_dc_override: Option<i32>,
        spell_attack_override: Option<i32>,
    ) -> Self {
        let auto_spell_save_dc = 8 + proficiency + ability_mod;
        let auto_spell_attack_modifier = proficiency + ability_mod;

        Self {
            ability,
            ability_mod,
            proficiency,
            auto_spell_save_dc,
            auto_spell_attack_modifier,
            spell_save_dc: spell_save_dc_override.unwrap_or(auto_spell_save_dc),
            spell_attack_modifier: spell_attack_override.unwrap_or(auto_spell_attack_modifier),
            has_spell_save_override: spell_save_dc_override.is_some(),
            has_spell_attack_override: spell_attack_override.is_some(),
        }
    }
}

/// Pick the casting ability: a parseable stored name wins, then the class
/// inference, then Intelligence.
pub fn resolve_spellcasting_ability(
    stored: Option<&str>,
    inferred: Option<AbilityKey>,
) -> AbilityKey {
    stored
        .and_then(AbilityKey::parse_fuzzy)
        .or(inferred)
        .unwrap_or(AbilityKey::Int)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_values_without_overrides() {
        let stats = SpellcastingStats::calculate(AbilityKey::Int, 3, 3, None, None);
        assert_eq!(stats.spell_save_dc, 14);
        assert_eq!(stats.spell_attack_modifier, 6);
        assert!(!stats.has_spell_save_override);
        assert!(!stats.has_spell_attack_override);
    }

    #[test]
    fn overrides_replace_effective_values_only() {
        let stats = SpellcastingStats::calculate(AbilityKey::Wis, 2, 2, Some(17), Some(-1));
        assert_eq!(stats.auto_spell_save_dc, 12);
        assert_eq!(stats.auto_spell_attack_modifier, 4);
        assert_eq!(stats.spell_save_dc, 17);
        assert_eq!(stats.spell_attack_modifier, -1);
        assert!(stats.has_spell_save_override);
        assert!(stats.has_spell_attack_override);
    }

    #[test]
    fn ability_resolution_order() {
        assert_eq!(
            resolve_spellcasting_ability(Some("wisdom"), Some(AbilityKey::Cha)),
            AbilityKey::Wis
        );
        assert_eq!(
            resolve_spellcasting_ability(Some("???"), Some(AbilityKey::Cha)),
            AbilityKey::Cha
        );
        assert_eq!(resolve_spellcasting_ability(None, None), AbilityKey::Int);
    }

    #[test]
    fn empty_overrides() {
        let mut overrides = SpellcastingOverrides::default();
        assert!(overrides.is_empty());
        overrides.spell_save_dc = Some(15);
        assert!(!overrides.is_empty());
    }
}
