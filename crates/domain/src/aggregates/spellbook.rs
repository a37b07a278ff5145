//! Spellbook aggregate - the spellcasting slice of a character record
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: state changes only through the methods below
//! - **Whole-state replacement**: every mutation builds the next slot map or
//!   selection and swaps it in, so readers never see a half-applied edit
//! - **Injected rules**: anything derived from class tables takes a
//!   `&dyn GameSystem`
//!
//! Stored slots are overrides: levels absent from them fall back to the
//! class defaults. Slot mutations store the full merged snapshot.

use serde::{Deserialize, Serialize};

use crate::entities::{
    resolve_spellcasting_ability, SlotDirtiness, SlotField, SpellSelection, SpellSlotLevel,
    SpellSlots, SpellcastingOverrides, SpellcastingStats,
};
use crate::game_systems::{CasterArchetype, GameSystem};
use crate::types::{
    decide_identity_change, CasterChangeChoice, CasterIdentity, DirtySlotChoice,
    TransitionDecision,
};
use crate::value_objects::Abilities;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spellbook {
    identity: CasterIdentity,
    #[serde(default)]
    abilities: Abilities,
    /// Stored overrides layered over the class defaults
    #[serde(default)]
    spell_slots: SpellSlots,
    #[serde(default)]
    spells: SpellSelection,
    #[serde(default)]
    overrides: SpellcastingOverrides,
}

impl Spellbook {
    pub fn new(identity: CasterIdentity, abilities: Abilities) -> Self {
        Self {
            identity,
            abilities,
            spell_slots: SpellSlots::new(),
            spells: SpellSelection::new(),
            overrides: SpellcastingOverrides::default(),
        }
    }

    pub fn with_stored_slots(mut self, slots: SpellSlots) -> Self {
        self.spell_slots = slots;
        self
    }

    pub fn with_spells(mut self, spells: SpellSelection) -> Self {
        self.spells = spells;
        self
    }

    pub fn with_overrides(mut self, overrides: SpellcastingOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    // Read-only accessors

    pub fn identity(&self) -> &CasterIdentity {
        &self.identity
    }

    pub fn abilities(&self) -> &Abilities {
        &self.abilities
    }

    /// Stored slot overrides, without defaults merged in.
    pub fn stored_slots(&self) -> &SpellSlots {
        &self.spell_slots
    }

    pub fn spells(&self) -> &SpellSelection {
        &self.spells
    }

    pub fn overrides(&self) -> &SpellcastingOverrides {
        &self.overrides
    }

    // Derived values

    pub fn archetype(&self, system: &dyn GameSystem) -> CasterArchetype {
        system.caster_archetype(&self.identity.class_name, &self.identity.subclass_name)
    }

    pub fn default_slots(&self, system: &dyn GameSystem) -> SpellSlots {
        system.default_slots(
            &self.identity.class_name,
            &self.identity.subclass_name,
            self.identity.level,
        )
    }

    /// Stored entries where present, class defaults elsewhere.
    pub fn current_slots(&self, system: &dyn GameSystem) -> SpellSlots {
        self.spell_slots.merged_over(&self.default_slots(system))
    }

    pub fn slot_dirtiness(&self, system: &dyn GameSystem) -> SlotDirtiness {
        self.current_slots(system)
            .dirtiness(&self.default_slots(system))
    }

    pub fn spellcasting_stats(&self, system: &dyn GameSystem) -> SpellcastingStats {
        let ability = resolve_spellcasting_ability(
            self.overrides.ability.as_deref(),
            system.spellcasting_ability(&self.identity.class_name, &self.identity.subclass_name),
        );
        let ability_mod = system.ability_modifier(self.abilities.score(ability));
        let proficiency = system.proficiency_bonus(self.identity.level);

        SpellcastingStats::calculate(
            ability,
            ability_mod,
            proficiency,
            self.overrides.spell_save_dc,
            self.overrides.spell_attack_modifier,
        )
    }

    // Slot mutations

    /// Apply `edit` to the merged slots and store the result, unless the
    /// edit reports that nothing changed.
    fn edit_slots(
        &mut self,
        system: &dyn GameSystem,
        edit: impl FnOnce(&mut SpellSlots) -> bool,
    ) -> bool {
        let mut next = self.current_slots(system);
        if !edit(&mut next) {
            return false;
        }
        self.spell_slots = next;
        true
    }

    pub fn update_slot(
        &mut self,
        system: &dyn GameSystem,
        level: SpellSlotLevel,
        field: SlotField,
        value: i32,
    ) {
        self.edit_slots(system, |slots| {
            slots.update_slot(level, field, value);
            true
        });
    }

    /// Returns false (and changes nothing) when no slot was available.
    pub fn spend_slot(&mut self, system: &dyn GameSystem, level: SpellSlotLevel) -> bool {
        self.edit_slots(system, |slots| slots.spend(level))
    }

    /// Returns false (and changes nothing) when the level was already full.
    pub fn restore_slot(&mut self, system: &dyn GameSystem, level: SpellSlotLevel) -> bool {
        self.edit_slots(system, |slots| slots.restore(level))
    }

    pub fn long_rest(&mut self, system: &dyn GameSystem) {
        self.edit_slots(system, |slots| {
            slots.long_rest();
            true
        });
    }

    /// Drop every slot override in favour of the class defaults.
    pub fn reset_to_default(&mut self, system: &dyn GameSystem) {
        self.spell_slots = self.default_slots(system);
    }

    // Identity transitions

    /// Swap in a new identity and decide what happens to the slots.
    ///
    /// A `RecomputeSlots` decision is applied before returning; a
    /// confirmation leaves the slots untouched until the caller answers.
    pub fn change_identity(
        &mut self,
        system: &dyn GameSystem,
        next: CasterIdentity,
    ) -> TransitionDecision {
        let decision = decide_identity_change(
            system,
            &self.identity,
            &next,
            &self.current_slots(system),
        );

        tracing::debug!(
            from = ?self.identity,
            to = ?next,
            ?decision,
            "Spellbook identity changed"
        );

        self.identity = next;
        if let TransitionDecision::RecomputeSlots { slots } = &decision {
            self.spell_slots = slots.clone();
        }
        decision
    }

    pub fn apply_caster_change(&mut self, system: &dyn GameSystem, choice: CasterChangeChoice) {
        if choice == CasterChangeChoice::Reset {
            let mut spells = self.spells.clone();
            spells.clear_prepared();
            self.spells = spells;
        }
        self.reset_to_default(system);
    }

    pub fn apply_dirty_slot_choice(&mut self, system: &dyn GameSystem, choice: DirtySlotChoice) {
        match choice {
            DirtySlotChoice::Discard => self.reset_to_default(system),
            DirtySlotChoice::Keep => {}
        }
    }

    // Known/prepared spells

    pub fn toggle_known(&mut self, name: &str) {
        let mut spells = self.spells.clone();
        spells.toggle_known(name);
        self.spells = spells;
    }

    pub fn toggle_prepared(&mut self, name: &str) {
        let mut spells = self.spells.clone();
        spells.toggle_prepared(name);
        self.spells = spells;
    }

    // Overrides

    /// Store an ability name, or `None` to go back to the class default.
    pub fn set_spellcasting_ability(&mut self, ability: Option<String>) {
        self.overrides.ability = ability.filter(|name| !name.trim().is_empty());
    }

    pub fn set_spell_save_dc_override(&mut self, dc: Option<i32>) {
        self.overrides.spell_save_dc = dc;
    }

    pub fn set_spell_attack_override(&mut self, modifier: Option<i32>) {
        self.overrides.spell_attack_modifier = modifier;
    }

    pub fn clear_overrides(&mut self) {
        self.overrides = SpellcastingOverrides::default();
    }
}
