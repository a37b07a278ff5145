//! Engine configuration from the environment.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `GRIMOIRE_LOG` | tracing filter directives, falls back to `RUST_LOG` |
//! | `GRIMOIRE_ROLL_SEED` | u64 seed for reproducible dice |
//! | `GRIMOIRE_SPELL_CATALOG` | path to a JSON spell catalog |

use std::path::PathBuf;

pub const LOG_ENV: &str = "GRIMOIRE_LOG";
pub const ROLL_SEED_ENV: &str = "GRIMOIRE_ROLL_SEED";
pub const SPELL_CATALOG_ENV: &str = "GRIMOIRE_SPELL_CATALOG";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an unsigned integer, got {value:?}")]
    InvalidSeed { var: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub log_filter: Option<String>,
    /// `None` seeds from OS entropy
    pub roll_seed: Option<u64>,
    /// `None` starts with an empty catalog
    pub spell_catalog: Option<PathBuf>,
}

impl EngineConfig {
    /// Load `.env.local`/`.env` from the repo root, then read the process
    /// environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv_from_repo_root();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let roll_seed = get(ROLL_SEED_ENV)
            .map(|value| {
                value.parse::<u64>().map_err(|_| ConfigError::InvalidSeed {
                    var: ROLL_SEED_ENV,
                    value,
                })
            })
            .transpose()?;

        Ok(Self {
            log_filter: get(LOG_ENV).or_else(|| get("RUST_LOG")),
            roll_seed,
            spell_catalog: get(SPELL_CATALOG_ENV).map(PathBuf::from),
        })
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Local overrides win: dotenvy never replaces a variable already set.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            if let Err(error) = dotenvy::from_path(&path) {
                tracing::warn!(path = %path.display(), %error, "Failed to load env file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = EngineConfig::from_lookup(lookup(&[
            (LOG_ENV, "grimoire_engine=debug"),
            (ROLL_SEED_ENV, " 1234 "),
            (SPELL_CATALOG_ENV, "data/spells.json"),
        ]))
        .unwrap();

        assert_eq!(config.log_filter.as_deref(), Some("grimoire_engine=debug"));
        assert_eq!(config.roll_seed, Some(1234));
        assert_eq!(config.spell_catalog, Some(PathBuf::from("data/spells.json")));
    }

    #[test]
    fn rust_log_is_the_fallback_filter() {
        let config = EngineConfig::from_lookup(lookup(&[("RUST_LOG", "warn")])).unwrap();
        assert_eq!(config.log_filter.as_deref(), Some("warn"));

        let config =
            EngineConfig::from_lookup(lookup(&[("RUST_LOG", "warn"), (LOG_ENV, "trace")])).unwrap();
        assert_eq!(config.log_filter.as_deref(), Some("trace"));
    }

    #[test]
    fn blank_values_are_unset() {
        let config =
            EngineConfig::from_lookup(lookup(&[(ROLL_SEED_ENV, "  "), (SPELL_CATALOG_ENV, "")]))
                .unwrap();
        assert_eq!(config.roll_seed, None);
        assert_eq!(config.spell_catalog, None);
    }

    #[test]
    fn bad_seed_is_an_error() {
        let err = EngineConfig::from_lookup(lookup(&[(ROLL_SEED_ENV, "-3")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidSeed {
                var: ROLL_SEED_ENV,
                value: "-3".to_string()
            }
        );
    }
}
