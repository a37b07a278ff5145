//! Grimoire engine library.
//!
//! Composes the rules in `grimoire-domain` with the outside world: random or
//! scripted dice, the spell catalog, environment configuration and logging.
//!
//! ## Structure
//!
//! - `use_cases/` - Dice rolls and spellbook sessions
//! - `infrastructure/` - Ports and their adapters
//! - `config` / `telemetry` - Environment and tracing setup
//! - `app` - Application composition

pub mod app;
pub mod config;
pub mod infrastructure;
pub mod telemetry;
pub mod use_cases;

pub use app::App;
pub use config::{ConfigError, EngineConfig};
