//! External collaborator ports: the dice roller and the spell catalog.

use grimoire_domain::{CatalogSpell, DiceRequest, RawRollSet};

use super::error::{CatalogError, RollSourceError};

/// Source of raw die faces.
///
/// Given a request such as `2d20+3`, returns one face per physical die,
/// grouped by die size in roll order. How the faces are produced (PRNG,
/// physics simulation, hardware) is up to the implementation; callers only
/// rely on the counts matching the request and each face being a legal
/// value for its die. Percentile requests also get one d10 ones face per
/// tens die.
#[cfg_attr(test, mockall::automock)]
pub trait RollSourcePort: Send + Sync {
    fn roll(&self, request: &DiceRequest) -> Result<RawRollSet, RollSourceError>;
}

/// Read access to the spell catalog.
#[cfg_attr(test, mockall::automock)]
pub trait SpellCatalogPort: Send + Sync {
    /// Every spell in the catalog.
    fn list(&self) -> Result<Vec<CatalogSpell>, CatalogError>;

    /// Case-insensitive lookup by name.
    fn find(&self, name: &str) -> Result<Option<CatalogSpell>, CatalogError>;
}
