//! Loading the chapter catalog and session timings from a data directory.
//!
//! - `chapters.{ron,toml,json}` is required. In TOML the list lives under
//!   `[[chapters]]`.
//! - `timings.{ron,toml,json}` is optional; every field falls back to its
//!   default.

use std::path::Path;

use lantern_core::session::Timings;
use lantern_progress::catalog::{Catalog, ChapterRecord};

use crate::loader::{DataLoadError, deserialize_file, deserialize_list, find_data_file, require_data_file};

/// Everything a host needs to start a campaign.
#[derive(Debug, Clone)]
pub struct GameData {
    pub catalog: Catalog,
    pub timings: Timings,
}

pub fn load_catalog(dir: &Path) -> Result<Catalog, DataLoadError> {
    let path = require_data_file(dir, "chapters")?;
    let chapters: Vec<ChapterRecord> = deserialize_list(&path, "chapters")?;
    let catalog = Catalog::new(chapters).map_err(|source| DataLoadError::Catalog {
        file: path.clone(),
        source,
    })?;
    log::debug!(
        "loaded {} chapters ({} puzzles) from {}",
        catalog.len(),
        catalog.puzzle_count(),
        path.display()
    );
    Ok(catalog)
}

pub fn load_timings(dir: &Path) -> Result<Timings, DataLoadError> {
    match find_data_file(dir, "timings")? {
        Some(path) => deserialize_file(&path),
        None => {
            log::debug!("no timings file in {}, using defaults", dir.display());
            Ok(Timings::default())
        }
    }
}

pub fn load_game_data(dir: &Path) -> Result<GameData, DataLoadError> {
    Ok(GameData {
        catalog: load_catalog(dir)?,
        timings: load_timings(dir)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_core::puzzle::PuzzleKind;
    use lantern_progress::catalog::{ChapterKind, Companion, Item, Unlock};
    use std::fs;
    use std::path::PathBuf;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lantern_data_config_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    const CHAPTERS_TOML: &str = r#"
[[chapters]]
id = "intro"
kind = "text"

[[chapters]]
id = "c1"
kind = "switches"
unlocks = [{ companion = "dog" }]

[[chapters]]
id = "c2"
kind = "horses"
unlocks = [{ companion = "bear" }, { item = "glass" }]
"#;

    #[test]
    fn catalog_from_toml() {
        let dir = make_test_dir("toml");
        fs::write(dir.join("chapters.toml"), CHAPTERS_TOML).unwrap();

        let catalog = load_catalog(&dir).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.ending_index(), 3);
        assert_eq!(catalog.get(0).unwrap().kind, ChapterKind::Text);
        assert_eq!(
            catalog.get(1).unwrap().kind,
            ChapterKind::Puzzle(PuzzleKind::Switches)
        );
        assert_eq!(
            catalog.get(2).unwrap().unlocks,
            vec![Unlock::Companion(Companion::Bear), Unlock::Item(Item::Glass)]
        );

        cleanup(&dir);
    }

    #[test]
    fn catalog_from_json_matches_standard() {
        let dir = make_test_dir("json");
        let json = serde_json::to_string(Catalog::standard().chapters()).unwrap();
        fs::write(dir.join("chapters.json"), json).unwrap();

        assert_eq!(load_catalog(&dir).unwrap(), Catalog::standard());

        cleanup(&dir);
    }

    #[test]
    fn catalog_from_ron() {
        let dir = make_test_dir("ron");
        fs::write(
            dir.join("chapters.ron"),
            r#"[(id: "intro", kind: "none"), (id: "c1", kind: "balls")]"#,
        )
        .unwrap();

        let catalog = load_catalog(&dir).unwrap();
        assert!(catalog.get(0).unwrap().kind.is_text());
        assert!(catalog.get(1).unwrap().unlocks.is_empty());

        cleanup(&dir);
    }

    #[test]
    fn invalid_catalogs_are_rejected() {
        let dir = make_test_dir("invalid");
        assert!(matches!(
            load_catalog(&dir),
            Err(DataLoadError::MissingRequired { .. })
        ));

        fs::write(dir.join("chapters.json"), r#"[{"id": "c1", "kind": "jugs"}]"#).unwrap();
        assert!(matches!(load_catalog(&dir), Err(DataLoadError::Catalog { .. })));

        fs::write(dir.join("chapters.json"), r#"[{"id": "c1", "kind": "dragons"}]"#).unwrap();
        assert!(matches!(load_catalog(&dir), Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    #[test]
    fn timings_default_when_absent() {
        let dir = make_test_dir("timings_absent");
        assert_eq!(load_timings(&dir).unwrap(), Timings::default());
        cleanup(&dir);
    }

    #[test]
    fn timings_merge_defaults() {
        let dir = make_test_dir("timings_partial");
        fs::write(
            dir.join("timings.toml"),
            "crossing = 250\n\n[outcome]\nriver = 100\n",
        )
        .unwrap();

        let t = load_timings(&dir).unwrap();
        let defaults = Timings::default();
        assert_eq!(t.crossing, 250);
        assert_eq!(t.outcome.river, 100);
        assert_eq!(t.outcome.jugs, defaults.outcome.jugs);
        assert_eq!(t.weighing_display, defaults.weighing_display);

        cleanup(&dir);
    }

    #[test]
    fn game_data_bundles_both() {
        let dir = make_test_dir("bundle");
        fs::write(dir.join("chapters.toml"), CHAPTERS_TOML).unwrap();
        fs::write(dir.join("timings.json"), r#"{"adversary_response": 0}"#).unwrap();

        let data = load_game_data(&dir).unwrap();
        assert_eq!(data.catalog.puzzle_count(), 2);
        assert_eq!(data.timings.adversary_response, 0);

        cleanup(&dir);
    }
}
