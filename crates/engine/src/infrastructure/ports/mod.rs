//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Dice rolling (could swap a seeded PRNG -> a 3D dice box)
//! - Spell catalog access (could swap a JSON file -> a remote compendium)

mod error;
mod external;

// =============================================================================
// External Ports
// =============================================================================
pub use external::{RollSourcePort, SpellCatalogPort};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{MockRollSourcePort, MockSpellCatalogPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{CatalogError, RollSourceError};
