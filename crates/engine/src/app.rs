//! Application composition.

use std::sync::Arc;

use anyhow::Context;

use grimoire_domain::{Dnd5eSystem, GameSystem, Spellbook};

use crate::config::EngineConfig;
use crate::infrastructure::{
    catalog::JsonSpellCatalog,
    dice_source::RandomRollSource,
    ports::{RollSourcePort, SpellCatalogPort},
};
use crate::use_cases::{RollDice, SpellbookSession};

/// Main application state.
///
/// Holds the rules system, the injected ports and the use cases built on
/// them. A UI keeps one of these and opens a session per character.
pub struct App {
    pub system: Arc<dyn GameSystem>,
    pub catalog: Arc<dyn SpellCatalogPort>,
    pub roll_source: Arc<dyn RollSourcePort>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub roll: RollDice,
}

impl App {
    pub fn new(
        system: Arc<dyn GameSystem>,
        catalog: Arc<dyn SpellCatalogPort>,
        roll_source: Arc<dyn RollSourcePort>,
    ) -> Self {
        let use_cases = UseCases {
            roll: RollDice::new(roll_source.clone()),
        };

        Self {
            system,
            catalog,
            roll_source,
            use_cases,
        }
    }

    /// Wire D&D 5e rules, the configured catalog and a (possibly seeded)
    /// random roll source.
    pub fn from_config(config: &EngineConfig) -> anyhow::Result<Self> {
        let catalog = match &config.spell_catalog {
            Some(path) => JsonSpellCatalog::from_path(path)
                .with_context(|| format!("loading spell catalog from {}", path.display()))?,
            None => {
                tracing::info!("No spell catalog configured, starting empty");
                JsonSpellCatalog::empty()
            }
        };

        let roll_source = match config.roll_seed {
            Some(seed) => {
                tracing::info!(seed, "Using seeded roll source");
                RandomRollSource::seeded(seed)
            }
            None => RandomRollSource::new(),
        };

        let system: Arc<dyn GameSystem> = Arc::new(Dnd5eSystem::new());
        tracing::info!(system = system.system_id(), "Grimoire engine ready");

        Ok(Self::new(system, Arc::new(catalog), Arc::new(roll_source)))
    }

    /// Start a session over a loaded spellbook.
    pub fn open_spellbook(&self, spellbook: Spellbook) -> SpellbookSession {
        SpellbookSession::new(self.system.clone(), self.catalog.clone(), spellbook)
    }
}
