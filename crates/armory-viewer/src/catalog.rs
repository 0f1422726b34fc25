//! Gun catalog - the selectable model/sound pairings

use bevy::prelude::*;
use serde::Deserialize;

/// One selectable gun: a model file plus an optional shot sound.
#[derive(Debug, Clone, Deserialize)]
pub struct GunEntry {
    pub label: String,
    pub model: String,
    #[serde(default)]
    pub sound: Option<String>,
}

/// Built-in selection list. Kept as JSON so entries stay plain data and the
/// parser is the same one an external catalog file would go through.
const BUILTIN_CATALOG: &str = r#"[
  { "label": "Pistol",        "model": "models/pistol.glb",        "sound": "sounds/shot1.wav" },
  { "label": "Assault Rifle", "model": "models/assault_rifle.glb", "sound": "sounds/shot2.wav" },
  { "label": "Revolver",      "model": "models/revolver.glb",      "sound": "sounds/shot1.wav" },
  { "label": "Display Musket","model": "models/musket.glb" }
]"#;

/// The full list of selectable guns.
#[derive(Debug, Clone, Resource)]
pub struct GunCatalog {
    pub entries: Vec<GunEntry>,
}

impl GunCatalog {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            entries: serde_json::from_str(json)?,
        })
    }
}

impl Default for GunCatalog {
    fn default() -> Self {
        Self::parse(BUILTIN_CATALOG).unwrap_or_else(|err| {
            tracing::error!("Built-in catalog failed to parse: {}", err);
            Self {
                entries: Vec::new(),
            }
        })
    }
}

/// Index of the currently selected catalog entry.
#[derive(Debug, Clone, Resource, Default)]
pub struct SelectedGun(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entry_with_sound() {
        let catalog =
            GunCatalog::parse(r#"[{"label":"P","model":"models/p.glb","sound":"sounds/s.wav"}]"#)
                .unwrap();
        assert_eq!(catalog.entries.len(), 1);
        assert_eq!(catalog.entries[0].model, "models/p.glb");
        assert_eq!(catalog.entries[0].sound.as_deref(), Some("sounds/s.wav"));
    }

    #[test]
    fn sound_is_optional() {
        let catalog = GunCatalog::parse(r#"[{"label":"M","model":"models/m.glb"}]"#).unwrap();
        assert!(catalog.entries[0].sound.is_none());
    }

    #[test]
    fn rejects_malformed_catalog() {
        assert!(GunCatalog::parse(r#"[{"label":"no model"}]"#).is_err());
    }

    #[test]
    fn builtin_catalog_parses() {
        let catalog = GunCatalog::default();
        assert!(!catalog.entries.is_empty());
        // First entry carries a sound, last one is display-only
        assert!(catalog.entries.first().unwrap().sound.is_some());
        assert!(catalog.entries.last().unwrap().sound.is_none());
    }
}
