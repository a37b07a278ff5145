//! Spellbook session use case.
//!
//! Wraps a [`Spellbook`] for the lifetime of one open character:
//! - Tracks edit mode and the change detector's pending confirmation
//! - Applies identity changes and their slot consequences as one step
//! - Applies every mutation to a copy and swaps it in whole
//! - Cross-checks known spells against the catalog

use std::collections::HashSet;
use std::sync::Arc;

use grimoire_domain::types::decide_edit_exit;
use grimoire_domain::{
    CasterArchetype, CasterChangeChoice, CasterIdentity, ChangeDetector, DetectorState,
    DirtySlotChoice, GameSystem, SlotDirtiness, SlotField, SpellSlotLevel, SpellSlots, Spellbook,
    SpellcastingStats, TransitionDecision,
};

use crate::infrastructure::ports::{CatalogError, SpellCatalogPort};

/// One open spellbook plus the state a UI needs around it.
pub struct SpellbookSession {
    system: Arc<dyn GameSystem>,
    catalog: Arc<dyn SpellCatalogPort>,
    spellbook: Spellbook,
    detector: ChangeDetector,
    editing: bool,
}

impl SpellbookSession {
    pub fn new(
        system: Arc<dyn GameSystem>,
        catalog: Arc<dyn SpellCatalogPort>,
        spellbook: Spellbook,
    ) -> Self {
        Self {
            system,
            catalog,
            spellbook,
            detector: ChangeDetector::new(),
            editing: false,
        }
    }

    // Read-only views

    pub fn spellbook(&self) -> &Spellbook {
        &self.spellbook
    }

    /// Hand the spellbook back for persistence.
    pub fn into_spellbook(self) -> Spellbook {
        self.spellbook
    }

    pub fn detector_state(&self) -> &DetectorState {
        self.detector.state()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn archetype(&self) -> CasterArchetype {
        self.spellbook.archetype(self.system.as_ref())
    }

    pub fn current_slots(&self) -> SpellSlots {
        self.spellbook.current_slots(self.system.as_ref())
    }

    pub fn default_slots(&self) -> SpellSlots {
        self.spellbook.default_slots(self.system.as_ref())
    }

    pub fn slot_dirtiness(&self) -> SlotDirtiness {
        self.spellbook.slot_dirtiness(self.system.as_ref())
    }

    pub fn spellcasting_stats(&self) -> SpellcastingStats {
        self.spellbook.spellcasting_stats(self.system.as_ref())
    }

    /// Run `edit` against a copy of the spellbook, then swap the copy in.
    fn apply<R>(&mut self, edit: impl FnOnce(&mut Spellbook, &dyn GameSystem) -> R) -> R {
        let mut next = self.spellbook.clone();
        let result = edit(&mut next, self.system.as_ref());
        self.spellbook = next;
        result
    }

    // Edit mode

    pub fn begin_editing(&mut self) {
        self.editing = true;
    }

    /// Leave edit mode. Edited slot maxima raise a dirty-slot confirmation
    /// unless a caster change is already pending.
    pub fn end_editing(&mut self) -> TransitionDecision {
        if !self.editing {
            return TransitionDecision::NoChange;
        }
        self.editing = false;

        let decision = decide_edit_exit(
            &self.current_slots(),
            &self.default_slots(),
            self.detector.caster_change_pending(),
        );
        self.detector.observe(&decision);
        decision
    }

    // Identity

    /// Apply an identity edit. Slot recomputes happen here; confirmations
    /// wait for [`Self::resolve_caster_change`].
    pub fn change_identity(&mut self, next: CasterIdentity) -> TransitionDecision {
        let decision = self.apply(|book, system| book.change_identity(system, next));
        self.detector.observe(&decision);
        decision
    }

    /// Returns false when no caster change was pending.
    pub fn resolve_caster_change(&mut self, choice: CasterChangeChoice) -> bool {
        if !self.detector.resolve_caster_change(choice) {
            return false;
        }
        self.apply(|book, system| book.apply_caster_change(system, choice));
        true
    }

    /// Returns false when no dirty-slot confirmation was pending.
    pub fn resolve_dirty_slots(&mut self, choice: DirtySlotChoice) -> bool {
        if !self.detector.resolve_dirty_slots(choice) {
            return false;
        }
        self.apply(|book, system| book.apply_dirty_slot_choice(system, choice));
        true
    }

    // Slots

    /// Set a slot field. Levels outside 1-9 are ignored.
    pub fn update_slot(&mut self, level: u8, field: SlotField, value: i32) -> bool {
        let Some(level) = slot_level(level) else {
            return false;
        };
        self.apply(|book, system| book.update_slot(system, level, field, value));
        true
    }

    /// Spend one slot. False when the level is invalid, absent or empty.
    pub fn spend_slot(&mut self, level: u8) -> bool {
        let Some(level) = slot_level(level) else {
            return false;
        };
        self.apply(|book, system| book.spend_slot(system, level))
    }

    /// Regain one slot. False when the level is invalid, absent or full.
    pub fn restore_slot(&mut self, level: u8) -> bool {
        let Some(level) = slot_level(level) else {
            return false;
        };
        self.apply(|book, system| book.restore_slot(system, level))
    }

    pub fn long_rest(&mut self) {
        self.apply(|book, system| book.long_rest(system));
        tracing::info!(class = %self.spellbook.identity().class_name, "Long rest taken");
    }

    pub fn reset_to_default(&mut self) {
        self.apply(|book, system| book.reset_to_default(system));
    }

    // Known/prepared spells

    pub fn toggle_known(&mut self, name: &str) {
        self.apply(|book, _| book.toggle_known(name));
    }

    pub fn toggle_prepared(&mut self, name: &str) {
        self.apply(|book, _| book.toggle_prepared(name));
    }

    // Overrides

    pub fn set_spellcasting_ability(&mut self, ability: Option<String>) {
        self.apply(|book, _| book.set_spellcasting_ability(ability));
    }

    pub fn set_spell_save_dc_override(&mut self, dc: Option<i32>) {
        self.apply(|book, _| book.set_spell_save_dc_override(dc));
    }

    pub fn set_spell_attack_override(&mut self, modifier: Option<i32>) {
        self.apply(|book, _| book.set_spell_attack_override(modifier));
    }

    /// Back to automatic ability, DC and attack modifier.
    pub fn reset_overrides(&mut self) {
        self.apply(|book, _| book.clear_overrides());
    }

    // Catalog

    /// Known spell names the catalog does not list (case-insensitive).
    ///
    /// Purely informational: nothing is removed.
    pub fn uncatalogued_spells(&self) -> Result<Vec<String>, CatalogError> {
        let catalogued: HashSet<String> = self
            .catalog
            .list()?
            .into_iter()
            .map(|spell| spell.name.trim().to_lowercase())
            .collect();

        Ok(self
            .spellbook
            .spells()
            .known()
            .iter()
            .filter(|name| !catalogued.contains(&name.trim().to_lowercase()))
            .cloned()
            .collect())
    }
}

fn slot_level(level: u8) -> Option<SpellSlotLevel> {
    match SpellSlotLevel::new(level) {
        Ok(level) => Some(level),
        Err(error) => {
            tracing::debug!(level, %error, "Ignoring slot operation on invalid level");
            None
        }
    }
}
