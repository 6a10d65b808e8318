//! End-to-end patching runs
//!
//! A [`Patcher`] owns the output directory for one run. Fragments are
//! extracted, rewritten and saved one at a time; the item-list merge and the
//! resupply rewrite then operate on the saved copies, so each stage reads
//! exactly what the previous one produced.

use crate::archive;
use crate::catalog::ModSpec;
use crate::checksum::ChangeTracker;
use crate::error::Result;
use crate::merger;
use crate::patch;
use crate::resupply;
use crate::scan::Category;
use crate::settings::Settings;
use crate::splice::splice;
use crate::steam;
use std::path::{Path, PathBuf};

/// Driver for one patching run
pub struct Patcher {
    output_dir: PathBuf,
    game_path: PathBuf,
    workshop_path: PathBuf,
    settings: Settings,
    tracker: ChangeTracker,
}

impl Patcher {
    /// Create a patcher, locating the game through Steam
    pub fn new(output_dir: PathBuf, settings: Settings) -> Result<Self> {
        let game_path = steam::game_path()?;
        Ok(Self::with_paths(output_dir, game_path, settings))
    }

    /// Create a patcher against a known game directory
    pub fn with_paths(output_dir: PathBuf, game_path: PathBuf, settings: Settings) -> Self {
        let workshop_path = game_path
            .join("../..")
            .join("workshop/content")
            .join(steam::APP_ID);
        let tracker = ChangeTracker::scan(&output_dir);
        Self {
            output_dir,
            game_path,
            workshop_path,
            settings,
            tracker,
        }
    }

    /// Patch the base game's resupply fragment
    pub fn patch_vanilla(&self) -> Result<()> {
        self.patch_archive_entry(
            &self.game_path.join("resource/properties.pak"),
            Path::new("properties/resupply.inc"),
        )
    }

    /// Patch every fragment of a mod
    pub fn patch_mod(&self, spec: &ModSpec) -> Result<()> {
        let resource = self
            .workshop_path
            .join(&spec.workshop_id)
            .join("resource");

        for archive_ref in &spec.archives {
            let archive_path = resource.join(&archive_ref.archive);
            for entry in &archive_ref.entries {
                self.patch_archive_entry(&archive_path, entry)?;
            }
        }

        for file in &spec.loose_files {
            let data = archive::load_from_file(file)?;
            let patched = patch::patch_document(&String::from_utf8_lossy(&data), &self.settings)?;
            archive::save_to_file(&self.output_dir.join(file), patched.as_bytes())?;
        }

        Ok(())
    }

    /// Merge the mod's item lists and collapse its resupply references
    pub fn remove_resupply_restrictions(&self, spec: &ModSpec) -> Result<()> {
        self.merge_item_lists(spec)?;
        self.rewrite_resupply(spec)
    }

    /// Build the canonical item lists and collapse the per-document blocks
    ///
    /// Operates on the patched copies under the output directory. One
    /// canonical `properties/<name>.inc` is written per category, then every
    /// document has its first block of each category replaced by an include
    /// and the rest removed.
    pub fn merge_item_lists(&self, spec: &ModSpec) -> Result<()> {
        let documents = spec.document_paths();
        let mut texts = Vec::with_capacity(documents.len());
        for path in &documents {
            let data = archive::load_from_file(&self.output_dir.join(path))?;
            texts.push(String::from_utf8_lossy(&data).into_owned());
        }

        for category in Category::ALL {
            let mut items = Vec::new();
            for text in &texts {
                items.extend(merger::collect_items(text, category));
            }
            merger::canonicalize(&mut items);
            log::debug!(
                "{}: {} items after dedup",
                category.canonical_name(),
                items.len()
            );

            let block = merger::render_canonical_block(category, &items);
            let target = self
                .output_dir
                .join("properties")
                .join(format!("{}.inc", category.canonical_name()));
            archive::save_to_file(&target, block.as_bytes())?;
        }

        for (path, mut text) in documents.iter().zip(texts) {
            let mut edits = Vec::new();
            for category in Category::ALL {
                edits.extend(merger::replacement_edits(&text, category));
            }
            splice(&mut text, edits)?;
            archive::save_to_file(&self.output_dir.join(path), text.as_bytes())?;
        }

        Ok(())
    }

    /// Collapse resupply references in every document of the mod
    pub fn rewrite_resupply(&self, spec: &ModSpec) -> Result<()> {
        for path in spec.document_paths() {
            let target = self.output_dir.join(&path);
            let data = archive::load_from_file(&target)?;
            let mut text = String::from_utf8_lossy(&data).into_owned();
            resupply::rewrite_document(&mut text)?;
            archive::save_to_file(&target, text.as_bytes())?;
        }
        Ok(())
    }

    /// Output files whose contents differ from the start of the run
    pub fn changed_files(&self) -> Vec<PathBuf> {
        self.tracker.changed_files()
    }

    fn patch_archive_entry(&self, archive_path: &Path, entry: &Path) -> Result<()> {
        let data = archive::load_from_archive(archive_path, entry)?;
        let patched = patch::patch_document(&String::from_utf8_lossy(&data), &self.settings)?;
        archive::save_to_file(&self.output_dir.join(entry), patched.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ArchiveRef, ModSpec};
    use std::fs;

    fn test_mod() -> ModSpec {
        ModSpec {
            name: "test".to_string(),
            workshop_id: "1".to_string(),
            archives: vec![
                ArchiveRef {
                    archive: PathBuf::from("a.pak"),
                    entries: vec![PathBuf::from("properties/ammo_a.inc")],
                },
                ArchiveRef {
                    archive: PathBuf::from("b.pak"),
                    entries: vec![PathBuf::from("properties/ammo_b.inc")],
                },
            ],
            loose_files: Vec::new(),
        }
    }

    fn patcher(output_dir: &Path) -> Patcher {
        Patcher::with_paths(
            output_dir.to_path_buf(),
            PathBuf::from("/nonexistent/game"),
            Settings::default(),
        )
    }

    const DOC_A: &str = "\
(define \"items_light_w2\"\r\n\
\t{item \"mp_40\" 2 {value 8}}\r\n\
)\r\n\
\r\n\
\t{resupply\r\n\
\t\t(\"items_light_w2\")\r\n\
\t\t(\"items_light_vet\")\r\n\
\t}\r\n";

    const DOC_B: &str = "\
(define \"items_light_vet\"\r\n\
\t{item \"mp_40\" 2 {value 8}}\r\n\
\t{item \"stg_44\" 2 {value 6}}\r\n\
)\r\n";

    #[test]
    fn test_merge_and_rewrite_run() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(out.join("properties")).unwrap();
        fs::write(out.join("properties/ammo_a.inc"), DOC_A).unwrap();
        fs::write(out.join("properties/ammo_b.inc"), DOC_B).unwrap();

        let patcher = patcher(&out);
        patcher.remove_resupply_restrictions(&test_mod()).unwrap();

        let canonical =
            fs::read_to_string(out.join("properties/items_light_all.inc")).unwrap();
        assert_eq!(
            canonical,
            "(define \"items_light_all\"\r\n\
             \t{item \"mp_40\" 2 {value 8}}\r\n\
             \t{item \"stg_44\" 2 {value 6}}\r\n\
             )\r\n"
        );

        let doc_a = fs::read_to_string(out.join("properties/ammo_a.inc")).unwrap();
        assert_eq!(
            doc_a,
            "(include \"items_light_all.inc\")\r\n\
             \r\n\
             \t{resupply\r\n\
             \t\t(\"items_light_all\")\r\n\
             \t}\r\n"
        );

        let doc_b = fs::read_to_string(out.join("properties/ammo_b.inc")).unwrap();
        assert_eq!(doc_b, "(include \"items_light_all.inc\")\r\n");

        // every category gets its canonical file, even when empty
        let engineer =
            fs::read_to_string(out.join("properties/items_engineer.inc")).unwrap();
        assert_eq!(engineer, "(define \"items_engineer\"\r\n)\r\n");
    }

    #[test]
    fn test_changed_files_after_run() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(out.join("properties")).unwrap();
        fs::write(out.join("properties/ammo_a.inc"), DOC_A).unwrap();
        fs::write(out.join("properties/ammo_b.inc"), DOC_B).unwrap();

        let patcher = patcher(&out);
        patcher.remove_resupply_restrictions(&test_mod()).unwrap();

        let changed = patcher.changed_files();
        // both documents plus the five canonical lists
        assert_eq!(changed.len(), 7);
        assert!(changed.contains(&PathBuf::from("properties/ammo_a.inc")));
        assert!(changed.contains(&PathBuf::from("properties/items_light_all.inc")));
    }
}
