//! Built-in catalog of supported workshop mods
//!
//! Each entry names the archives a mod stores its properties fragments in
//! and the fragment paths inside them. The catalog is plain data; nothing
//! about a mod varies beyond it.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One pak archive of a mod and the fragments to patch inside it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveRef {
    /// Archive file name under the mod's resource directory
    pub archive: PathBuf,
    /// Entry paths inside the archive
    pub entries: Vec<PathBuf>,
}

impl ArchiveRef {
    fn new(archive: &str, entries: &[&str]) -> Self {
        Self {
            archive: PathBuf::from(archive),
            entries: entries.iter().map(PathBuf::from).collect(),
        }
    }
}

/// A supported mod
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModSpec {
    /// Catalog name used on the command line
    pub name: String,
    /// Steam workshop id
    pub workshop_id: String,
    /// Archives holding the mod's fragments
    pub archives: Vec<ArchiveRef>,
    /// Fragments shipped as plain files instead of archive entries
    pub loose_files: Vec<PathBuf>,
}

impl ModSpec {
    fn new(name: &str, workshop_id: &str, archives: Vec<ArchiveRef>) -> Self {
        Self {
            name: name.to_string(),
            workshop_id: workshop_id.to_string(),
            archives,
            loose_files: Vec::new(),
        }
    }

    /// All fragment paths of this mod, as written under the output directory
    pub fn document_paths(&self) -> Vec<PathBuf> {
        self.archives
            .iter()
            .flat_map(|a| a.entries.iter().cloned())
            .chain(self.loose_files.iter().cloned())
            .collect()
    }
}

/// The supported mods
///
/// Workshop ids are stable; the archive layouts follow whatever each mod
/// ships.
pub fn catalog() -> Vec<ModSpec> {
    vec![
        ModSpec::new(
            "valour",
            "2537987794",
            vec![
                ArchiveRef::new("britain.pak", &["properties/ammo_eng.inc"]),
                ArchiveRef::new("fra.pak", &["properties/ammo_fra.inc"]),
                ArchiveRef::new("hun.pak", &["properties/ammo_hun.inc"]),
                ArchiveRef::new("ita.pak", &["properties/ammo_ita.inc"]),
                ArchiveRef::new("jap.pak", &["properties/ammo_jap.inc"]),
                ArchiveRef::new("pol.pak", &["properties/ammo_pol.inc"]),
                ArchiveRef::new("usaf.pak", &["properties/ammo_usa.inc"]),
                ArchiveRef::new("general.pak", &["properties/resupply.inc"]),
            ],
        ),
        ModSpec::new(
            "hotmod",
            "2614199156",
            vec![ArchiveRef::new(
                "gamelogic.pak",
                &[
                    "properties/resupply_hotmod.inc",
                    "properties/resupply_vanilla.inc",
                ],
            )],
        ),
        ModSpec::new(
            "mace",
            "2905667604",
            vec![ArchiveRef::new(
                "properties.pak",
                &["properties/resupply.inc"],
            )],
        ),
        ModSpec::new(
            "west81",
            "2897299509",
            vec![ArchiveRef::new(
                "engine.pak",
                &["properties/resupply_hotmod.inc"],
            )],
        ),
    ]
}

/// Look a mod up by its catalog name
pub fn find_mod(name: &str) -> Result<ModSpec> {
    catalog()
        .into_iter()
        .find(|m| m.name == name)
        .ok_or_else(|| Error::ModNotFound(name.to_string()))
}
