//! Known and prepared spells.
//!
//! Spell names are opaque identifiers; nothing here checks them against a
//! catalog. Every prepared spell is also known.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where a spell name stands for a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpellState {
    Unknown,
    Known,
    /// Prepared implies known
    Prepared,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SelectionRecord")]
pub struct SpellSelection {
    known: BTreeSet<String>,
    prepared: BTreeSet<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectionRecord {
    #[serde(default)]
    known: BTreeSet<String>,
    #[serde(default)]
    prepared: BTreeSet<String>,
}

impl From<SelectionRecord> for SpellSelection {
    // Stray prepared names from older documents are dropped on load
    fn from(record: SelectionRecord) -> Self {
        let prepared = record
            .prepared
            .into_iter()
            .filter(|name| record.known.contains(name))
            .collect();
        Self {
            known: record.known,
            prepared,
        }
    }
}

impl SpellSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn known(&self) -> &BTreeSet<String> {
        &self.known
    }

    pub fn prepared(&self) -> &BTreeSet<String> {
        &self.prepared
    }

    pub fn is_known(&self, name: &str) -> bool {
        !name.is_empty() && self.known.contains(name)
    }

    pub fn is_prepared(&self, name: &str) -> bool {
        !name.is_empty() && self.prepared.contains(name)
    }

    pub fn state_of(&self, name: &str) -> SpellState {
        if self.is_prepared(name) {
            SpellState::Prepared
        } else if self.is_known(name) {
            SpellState::Known
        } else {
            SpellState::Unknown
        }
    }

    /// Forget a known spell (unpreparing it too), or learn an unknown one.
    ///
    /// Learning never prepares. Empty names are ignored.
    pub fn toggle_known(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        if self.known.remove(name) {
            self.prepared.remove(name);
        } else {
            self.known.insert(name.to_string());
        }
    }

    /// Flip preparation of a known spell. Unknown names are ignored.
    pub fn toggle_prepared(&mut self, name: &str) {
        if !self.is_known(name) {
            tracing::debug!(spell = name, "Ignoring prepare toggle for unknown spell");
            return;
        }
        if !self.prepared.remove(name) {
            self.prepared.insert(name.to_string());
        }
    }

    /// Unprepare everything, keeping the known list.
    pub fn clear_prepared(&mut self) {
        self.prepared.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn prepare_then_forget() {
        let mut selection = SpellSelection::new();
        selection.toggle_known("Fireball");
        assert_eq!(selection.state_of("Fireball"), SpellState::Known);

        selection.toggle_prepared("Fireball");
        assert!(selection.is_prepared("Fireball"));

        selection.toggle_known("Fireball");
        assert!(selection.known().is_empty());
        assert!(selection.prepared().is_empty());
    }

    #[test]
    fn learning_does_not_prepare() {
        let mut selection = SpellSelection::new();
        selection.toggle_known("Shield");
        assert!(selection.is_known("Shield"));
        assert!(!selection.is_prepared("Shield"));
    }

    #[test]
    fn preparing_unknown_spell_is_noop() {
        let mut selection = SpellSelection::new();
        selection.toggle_prepared("Wish");
        assert_eq!(selection, SpellSelection::new());
    }

    #[test]
    fn toggle_prepared_flips() {
        let mut selection = SpellSelection::new();
        selection.toggle_known("Bless");
        selection.toggle_prepared("Bless");
        selection.toggle_prepared("Bless");
        assert_eq!(selection.state_of("Bless"), SpellState::Known);
    }

    #[test]
    fn empty_names_never_match() {
        let mut selection = SpellSelection::new();
        selection.toggle_known("");
        assert!(!selection.is_known(""));
        assert!(selection.known().is_empty());
    }

    #[test]
    fn load_drops_prepared_names_that_are_not_known() {
        let json = serde_json::json!({"known": ["Bless"], "prepared": ["Bless", "Wish"]});
        let selection: SpellSelection = serde_json::from_value(json).unwrap();
        assert_eq!(selection.prepared().len(), 1);
        assert!(selection.is_prepared("Bless"));
    }

    #[derive(Debug, Clone)]
    enum Toggle {
        Known(usize),
        Prepared(usize),
    }

    const NAMES: [&str; 4] = ["Fireball", "Shield", "Bless", "Cure Wounds"];

    proptest! {
        #[test]
        fn prepared_is_subset_of_known(
            toggles in proptest::collection::vec(
                prop_oneof![
                    (0..NAMES.len()).prop_map(Toggle::Known),
                    (0..NAMES.len()).prop_map(Toggle::Prepared),
                ],
                0..40,
            )
        ) {
            let mut selection = SpellSelection::new();
            for toggle in toggles {
                match toggle {
                    Toggle::Known(i) => selection.toggle_known(NAMES[i]),
                    Toggle::Prepared(i) => selection.toggle_prepared(NAMES[i]),
                }
                prop_assert!(selection.prepared().is_subset(selection.known()));
            }

            let json = serde_json::to_string(&selection).unwrap();
            let back: SpellSelection = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, selection);
        }
    }
}
