//! Class/level change detection.
//!
//! Callers run [`decide_identity_change`] after every identity edit and
//! [`decide_edit_exit`] when an edit session ends, then feed the decision to
//! a [`ChangeDetector`], which tracks whether a confirmation is pending.

use serde::{Deserialize, Serialize};

use crate::entities::SpellSlots;
use crate::game_systems::{CasterArchetype, SpellcastingSystem};

/// The parts of a character record that drive spellcasting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasterIdentity {
    pub class_name: String,
    #[serde(default)]
    pub subclass_name: String,
    pub level: u8,
}

impl CasterIdentity {
    pub fn new(class_name: impl Into<String>, subclass_name: impl Into<String>, level: u8) -> Self {
        Self {
            class_name: class_name.into(),
            subclass_name: subclass_name.into(),
            level,
        }
    }

    /// Class names compare trimmed and case-insensitively.
    pub fn same_class_as(&self, other: &CasterIdentity) -> bool {
        self.class_name
            .trim()
            .eq_ignore_ascii_case(other.class_name.trim())
    }
}

/// What the caller must do after an identity change or edit-mode exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TransitionDecision {
    /// Nothing to do
    NoChange,
    /// Replace the slots immediately
    RecomputeSlots { slots: SpellSlots },
    /// Ask before resetting slots and prepared spells
    ConfirmCasterChange {
        from: CasterArchetype,
        to: CasterArchetype,
    },
    /// Ask whether to keep hand-edited slot maxima
    ConfirmDirtySlots { changes: Vec<String> },
}

impl TransitionDecision {
    pub fn needs_confirmation(&self) -> bool {
        matches!(
            self,
            Self::ConfirmCasterChange { .. } | Self::ConfirmDirtySlots { .. }
        )
    }
}

/// Decide how an identity edit affects slots.
///
/// A class change that moves between archetypes needs confirmation. Any
/// other change recomputes slots from the new defaults, keeping spent slots
/// spent (`current = min(old current, new max)`).
pub fn decide_identity_change<S: SpellcastingSystem + ?Sized>(
    system: &S,
    previous: &CasterIdentity,
    next: &CasterIdentity,
    current_slots: &SpellSlots,
) -> TransitionDecision {
    if previous == next {
        return TransitionDecision::NoChange;
    }

    let from = system.caster_archetype(&previous.class_name, &previous.subclass_name);
    let to = system.caster_archetype(&next.class_name, &next.subclass_name);

    if !previous.same_class_as(next) && from != to {
        return TransitionDecision::ConfirmCasterChange { from, to };
    }

    let defaults = system.default_slots(&next.class_name, &next.subclass_name, next.level);
    TransitionDecision::RecomputeSlots {
        slots: defaults.carry_over_spent(current_slots),
    }
}

/// Decide whether leaving edit mode should warn about edited slot maxima.
///
/// Skipped while a caster change confirmation is pending.
pub fn decide_edit_exit(
    current_slots: &SpellSlots,
    defaults: &SpellSlots,
    caster_change_pending: bool,
) -> TransitionDecision {
    if caster_change_pending {
        return TransitionDecision::NoChange;
    }

    let dirtiness = current_slots.dirtiness(defaults);
    if dirtiness.is_dirty {
        TransitionDecision::ConfirmDirtySlots {
            changes: dirtiness.changes,
        }
    } else {
        TransitionDecision::NoChange
    }
}

/// Answer to a pending caster change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CasterChangeChoice {
    /// Clear prepared spells and recompute slots
    Reset,
    /// Keep prepared spells, still recompute slots
    Keep,
}

/// Answer to a pending dirty-slot warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DirtySlotChoice {
    /// Reset slots to the class defaults
    Discard,
    /// Keep the edited slots
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DetectorState {
    #[default]
    Stable,
    PendingCasterTypeConfirmation {
        from: CasterArchetype,
        to: CasterArchetype,
    },
    PendingSlotDirtyConfirmation {
        changes: Vec<String>,
    },
}

/// At most one confirmation is pending at a time.
///
/// A pending caster change outranks everything else: later identity edits
/// keep it pending and only move its target archetype, so it ends only when
/// the player answers. A pending dirty-slot warning is replaced by any newer
/// decision.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeDetector {
    state: DetectorState,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    pub fn is_stable(&self) -> bool {
        matches!(self.state, DetectorState::Stable)
    }

    pub fn caster_change_pending(&self) -> bool {
        matches!(
            self.state,
            DetectorState::PendingCasterTypeConfirmation { .. }
        )
    }

    pub fn dirty_slots_pending(&self) -> bool {
        matches!(self.state, DetectorState::PendingSlotDirtyConfirmation { .. })
    }

    /// Record a decision. `NoChange` leaves the state as it is.
    pub fn observe(&mut self, decision: &TransitionDecision) {
        let next = match (&self.state, decision) {
            (_, TransitionDecision::NoChange) => return,
            (
                DetectorState::PendingCasterTypeConfirmation { from, .. },
                TransitionDecision::ConfirmCasterChange { to, .. },
            ) => DetectorState::PendingCasterTypeConfirmation {
                from: *from,
                to: *to,
            },
            (DetectorState::PendingCasterTypeConfirmation { .. }, _) => {
                tracing::debug!(?decision, "Caster change still pending");
                return;
            }
            (_, TransitionDecision::ConfirmCasterChange { from, to }) => {
                DetectorState::PendingCasterTypeConfirmation {
                    from: *from,
                    to: *to,
                }
            }
            (_, TransitionDecision::ConfirmDirtySlots { changes }) => {
                DetectorState::PendingSlotDirtyConfirmation {
                    changes: changes.clone(),
                }
            }
            (_, TransitionDecision::RecomputeSlots { .. }) => DetectorState::Stable,
        };

        if next != self.state {
            tracing::info!(from = ?self.state, to = ?next, "Change detector transition");
        }
        self.state = next;
    }

    /// Settle a pending caster change. Returns false when none was pending.
    pub fn resolve_caster_change(&mut self, choice: CasterChangeChoice) -> bool {
        if !self.caster_change_pending() {
            tracing::debug!(?choice, "No caster change pending");
            return false;
        }
        tracing::info!(?choice, "Caster change resolved");
        self.state = DetectorState::Stable;
        true
    }

    /// Settle a pending dirty-slot warning. Returns false when none was pending.
    pub fn resolve_dirty_slots(&mut self, choice: DirtySlotChoice) -> bool {
        if !self.dirty_slots_pending() {
            tracing::debug!(?choice, "No dirty slot confirmation pending");
            return false;
        }
        tracing::info!(?choice, "Dirty slot confirmation resolved");
        self.state = DetectorState::Stable;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{SlotField, SpellSlotEntry, SpellSlotLevel};
    use crate::game_systems::{default_slots, Dnd5eSystem};

    fn level(n: u8) -> SpellSlotLevel {
        SpellSlotLevel::new(n).unwrap()
    }

    #[test]
    fn identical_identity_is_no_change() {
        let identity = CasterIdentity::new("Wizard", "", 5);
        let decision = decide_identity_change(
            &Dnd5eSystem::new(),
            &identity,
            &identity.clone(),
            &SpellSlots::new(),
        );
        assert_eq!(decision, TransitionDecision::NoChange);
    }

    #[test]
    fn class_change_across_archetypes_needs_confirmation() {
        let decision = decide_identity_change(
            &Dnd5eSystem::new(),
            &CasterIdentity::new("Wizard", "", 5),
            &CasterIdentity::new("Paladin", "", 5),
            &default_slots("Wizard", "", 5),
        );
        assert_eq!(
            decision,
            TransitionDecision::ConfirmCasterChange {
                from: CasterArchetype::Full,
                to: CasterArchetype::Half,
            }
        );
        assert!(decision.needs_confirmation());
    }

    #[test]
    fn class_change_to_non_caster_needs_confirmation() {
        let decision = decide_identity_change(
            &Dnd5eSystem::new(),
            &CasterIdentity::new("Cleric", "", 3),
            &CasterIdentity::new("Barbarian", "", 3),
            &SpellSlots::new(),
        );
        assert!(matches!(
            decision,
            TransitionDecision::ConfirmCasterChange {
                to: CasterArchetype::None,
                ..
            }
        ));
    }

    #[test]
    fn same_archetype_class_change_recomputes() {
        let decision = decide_identity_change(
            &Dnd5eSystem::new(),
            &CasterIdentity::new("Wizard", "", 5),
            &CasterIdentity::new("Sorcerer", "", 5),
            &default_slots("Wizard", "", 5),
        );
        assert_eq!(
            decision,
            TransitionDecision::RecomputeSlots {
                slots: default_slots("Sorcerer", "", 5)
            }
        );
    }

    #[test]
    fn subclass_change_recomputes_without_confirmation() {
        let decision = decide_identity_change(
            &Dnd5eSystem::new(),
            &CasterIdentity::new("Fighter", "", 7),
            &CasterIdentity::new("Fighter", "Eldritch Knight", 7),
            &SpellSlots::new(),
        );
        assert_eq!(
            decision,
            TransitionDecision::RecomputeSlots {
                slots: default_slots("Fighter", "Eldritch Knight", 7)
            }
        );
    }

    #[test]
    fn level_up_preserves_spent_slots() {
        let mut slots = default_slots("Wizard", "", 4);
        slots.spend(level(1));
        slots.spend(level(1));

        let decision = decide_identity_change(
            &Dnd5eSystem::new(),
            &CasterIdentity::new("Wizard", "", 4),
            &CasterIdentity::new("wizard", "", 5),
            &slots,
        );

        let TransitionDecision::RecomputeSlots { slots: next } = decision else {
            panic!("expected recompute, got {decision:?}");
        };
        assert_eq!(next.get(level(1)), Some(SpellSlotEntry::new(2, 4)));
        assert_eq!(next.get(level(2)), Some(SpellSlotEntry::full(3)));
        assert_eq!(next.get(level(3)), Some(SpellSlotEntry::full(2)));
    }

    #[test]
    fn edit_exit_with_dirty_slots_asks() {
        let defaults = default_slots("Wizard", "", 5);
        let mut slots = defaults.clone();
        slots.update_slot(level(1), SlotField::Max, 6);

        let decision = decide_edit_exit(&slots, &defaults, false);
        assert_eq!(
            decision,
            TransitionDecision::ConfirmDirtySlots {
                changes: vec!["Level 1: 6 slots (default: 4)".to_string()]
            }
        );

        assert_eq!(decide_edit_exit(&slots, &defaults, true), TransitionDecision::NoChange);
        assert_eq!(
            decide_edit_exit(&defaults, &defaults, false),
            TransitionDecision::NoChange
        );
    }

    #[test]
    fn detector_tracks_pending_confirmations() {
        let mut detector = ChangeDetector::new();
        assert!(detector.is_stable());

        detector.observe(&TransitionDecision::ConfirmCasterChange {
            from: CasterArchetype::Full,
            to: CasterArchetype::None,
        });
        assert!(detector.caster_change_pending());
        assert!(!detector.resolve_dirty_slots(DirtySlotChoice::Keep));
        assert!(detector.resolve_caster_change(CasterChangeChoice::Keep));
        assert!(detector.is_stable());
        assert!(!detector.resolve_caster_change(CasterChangeChoice::Reset));
    }

    #[test]
    fn caster_change_replaces_pending_dirty_slots() {
        let mut detector = ChangeDetector::new();
        detector.observe(&TransitionDecision::ConfirmDirtySlots {
            changes: vec!["Level 1: 6 slots (default: 4)".to_string()],
        });
        assert!(detector.dirty_slots_pending());

        detector.observe(&TransitionDecision::ConfirmCasterChange {
            from: CasterArchetype::Full,
            to: CasterArchetype::Half,
        });
        assert_eq!(
            detector.state(),
            &DetectorState::PendingCasterTypeConfirmation {
                from: CasterArchetype::Full,
                to: CasterArchetype::Half,
            }
        );

        detector.observe(&TransitionDecision::NoChange);
        assert!(detector.caster_change_pending());
    }

    #[test]
    fn recompute_settles_pending_dirty_slots() {
        let mut detector = ChangeDetector::new();
        detector.observe(&TransitionDecision::ConfirmDirtySlots {
            changes: vec!["Level 2: 1 slots (default: 3)".to_string()],
        });
        detector.observe(&TransitionDecision::RecomputeSlots {
            slots: SpellSlots::new(),
        });
        assert!(detector.is_stable());
    }

    #[test]
    fn pending_caster_change_survives_later_edits() {
        let mut detector = ChangeDetector::new();
        detector.observe(&TransitionDecision::ConfirmCasterChange {
            from: CasterArchetype::Full,
            to: CasterArchetype::None,
        });

        detector.observe(&TransitionDecision::RecomputeSlots {
            slots: SpellSlots::new(),
        });
        detector.observe(&TransitionDecision::ConfirmDirtySlots {
            changes: vec!["Level 1: 6 slots (default: 4)".to_string()],
        });
        assert_eq!(
            detector.state(),
            &DetectorState::PendingCasterTypeConfirmation {
                from: CasterArchetype::Full,
                to: CasterArchetype::None,
            }
        );

        // A second class change keeps the original starting archetype
        detector.observe(&TransitionDecision::ConfirmCasterChange {
            from: CasterArchetype::None,
            to: CasterArchetype::Half,
        });
        assert_eq!(
            detector.state(),
            &DetectorState::PendingCasterTypeConfirmation {
                from: CasterArchetype::Full,
                to: CasterArchetype::Half,
            }
        );

        assert!(detector.resolve_caster_change(CasterChangeChoice::Reset));
        assert!(detector.is_stable());
    }
}
