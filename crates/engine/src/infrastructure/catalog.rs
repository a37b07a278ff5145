//! JSON-backed spell catalog.

use std::path::Path;

use grimoire_domain::CatalogSpell;

use crate::infrastructure::ports::{CatalogError, SpellCatalogPort};

/// An in-memory catalog loaded from a JSON array of spell records.
///
/// Loaded once by the composing app and shared behind the port; nothing in
/// the engine keeps its own copy.
#[derive(Debug, Clone, Default)]
pub struct JsonSpellCatalog {
    spells: Vec<CatalogSpell>,
}

impl JsonSpellCatalog {
    /// A catalog with no spells.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_spells(spells: Vec<CatalogSpell>) -> Self {
        Self { spells }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let spells: Vec<CatalogSpell> = serde_json::from_str(json)?;
        Ok(Self { spells })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let catalog = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            spells = catalog.len(),
            "Loaded spell catalog"
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

impl SpellCatalogPort for JsonSpellCatalog {
    fn list(&self) -> Result<Vec<CatalogSpell>, CatalogError> {
        Ok(self.spells.clone())
    }

    fn find(&self, name: &str) -> Result<Option<CatalogSpell>, CatalogError> {
        Ok(self.spells.iter().find(|spell| spell.is_named(name)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grimoire_domain::SpellLevel;
    use std::io::Write;

    const CATALOG: &str = r#"[
        {"name": "Fireball", "level": 3, "school": "Evocation", "classes": ["Wizard", "Sorcerer"]},
        {"name": "Cure Wounds", "level": 1, "school": "Evocation", "classes": ["Cleric"]},
        {"name": "Light", "level": 0, "school": "Evocation"}
    ]"#;

    #[test]
    fn loads_from_string() {
        let catalog = JsonSpellCatalog::from_json_str(CATALOG).unwrap();
        assert_eq!(catalog.len(), 3);

        let fireball = catalog.find("FIREBALL").unwrap().unwrap();
        assert_eq!(fireball.level, SpellLevel::Level(3));
        assert!(catalog.find("Wish").unwrap().is_none());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let catalog = JsonSpellCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.list().unwrap().len(), 3);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spells.json");

        let err = JsonSpellCatalog::from_path(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert!(err.to_string().contains("spells.json"));
    }

    #[test]
    fn rejects_non_array_document() {
        let err = JsonSpellCatalog::from_json_str(r#"{"name": "Fireball"}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
