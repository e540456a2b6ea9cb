//! Per-category file counts, used for previews and summaries.

use crate::error::OrganizeResult;
use crate::file_category::CategoryMap;
use crate::file_organizer::{FileOrganizer, PlannedMove};
use indexmap::IndexMap;
use std::path::Path;

/// Counts the immediate files of `directory` per category.
///
/// Every known category is present, in configuration order, with zero if
/// no file maps to it. The counts are exactly what an organize run would
/// move; use [`tally`] over [`FileOrganizer::plan`] when the organizer has
/// protected paths.
pub fn preview_counts(
    directory: &Path,
    categories: &CategoryMap,
) -> OrganizeResult<IndexMap<String, usize>> {
    let plan = FileOrganizer::new(categories).plan(directory)?;
    Ok(tally(categories, &plan))
}

/// Counts planned moves per category, starting every known category at zero.
pub fn tally(categories: &CategoryMap, plan: &[PlannedMove]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = categories
        .category_names()
        .map(|name| (name.to_string(), 0))
        .collect();

    for planned in plan {
        *counts.entry(planned.category.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::{CategoryTable, FALLBACK};
    use std::fs;
    use tempfile::TempDir;

    fn images_then_docs() -> CategoryMap {
        let mut table = CategoryTable::new();
        table.insert("IMAGES".to_string(), vec![".jpg".to_string()]);
        table.insert("DOCS".to_string(), vec![".txt".to_string()]);
        CategoryMap::from_table(&table)
    }

    #[test]
    fn test_counts_include_every_category() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("a.txt"), "a").unwrap();
        fs::write(base.join("b.TXT"), "b").unwrap();
        fs::write(base.join("c.unknown"), "c").unwrap();
        fs::create_dir(base.join("DOCS")).unwrap();
        fs::write(base.join("DOCS").join("d.txt"), "d").unwrap();

        let counts = preview_counts(base, &images_then_docs()).unwrap();

        assert_eq!(counts.len(), 3);
        assert_eq!(counts["DOCS"], 2);
        assert_eq!(counts["IMAGES"], 0);
        assert_eq!(counts[FALLBACK], 1);
    }

    #[test]
    fn test_counts_follow_configuration_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let counts = preview_counts(temp_dir.path(), &images_then_docs()).unwrap();

        let names: Vec<_> = counts.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["IMAGES", "DOCS", FALLBACK]);
    }

    #[test]
    fn test_tally_skips_protected_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("a.txt"), "a").unwrap();
        fs::write(base.join("undo_log.json"), "{}").unwrap();

        let categories = images_then_docs();
        let plan = FileOrganizer::new(&categories)
            .protect(base.join("undo_log.json"))
            .plan(base)
            .unwrap();
        let counts = tally(&categories, &plan);

        assert_eq!(counts["DOCS"], 1);
        assert_eq!(counts[FALLBACK], 0);
        assert_eq!(preview_counts(base, &categories).unwrap()[FALLBACK], 1);
    }

    #[test]
    fn test_counts_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let counts = preview_counts(temp_dir.path(), &CategoryMap::default()).unwrap();
        assert!(counts.values().all(|&count| count == 0));
        assert!(counts.contains_key(FALLBACK));
    }
}
