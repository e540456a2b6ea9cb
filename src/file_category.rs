/// Category resolution for organizing files by extension.
///
/// This module maps file extensions to category names (e.g., "DOCS",
/// "IMAGES"). The category name doubles as the name of the subdirectory a
/// file is moved into. Every map carries the fallback category [`FALLBACK`].
///
/// # Examples
///
/// ```
/// use filedock::file_category::CategoryMap;
///
/// let map = CategoryMap::default();
/// assert_eq!(map.resolve(".PNG"), "IMAGES");
/// assert_eq!(map.resolve(".mp3"), "AUDIO");
/// assert_eq!(map.resolve(".nope"), "OTHERS");
/// ```
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Category every unmapped extension resolves to.
pub const FALLBACK: &str = "OTHERS";

/// Category name → extensions, in configuration order.
pub type CategoryTable = IndexMap<String, Vec<String>>;

/// Maps lowercase extensions (with leading dot) to category names.
///
/// Immutable once built. Lookups are case-insensitive and total: anything
/// without an entry resolves to [`FALLBACK`].
#[derive(Debug, Clone)]
pub struct CategoryMap {
    extension_map: HashMap<String, String>,
    categories: IndexSet<String>,
}

impl CategoryMap {
    /// Builds a map from a category → extensions table.
    ///
    /// Extensions may be given with or without the leading dot and in any
    /// case. If an extension appears under more than one category, the
    /// category listed first in `table` keeps it. [`FALLBACK`] is always
    /// present, appended last unless `table` names it.
    ///
    /// # Arguments
    ///
    /// * `table` - Category name → extensions, in the order the categories
    ///   were written
    pub fn from_table(table: &CategoryTable) -> Self {
        let mut map = Self {
            extension_map: HashMap::new(),
            categories: IndexSet::new(),
        };

        for (category, extensions) in table {
            map.categories.insert(category.clone());
            for ext in extensions {
                map.add_extension_mapping(ext, category);
            }
        }

        map.categories.insert(FALLBACK.to_string());
        map
    }

    /// Adds a single extension mapping, keeping any earlier mapping for the
    /// same extension.
    fn add_extension_mapping(&mut self, ext: &str, category: &str) {
        let key = normalize_extension(ext);
        if key.is_empty() {
            return;
        }
        match self.extension_map.get(&key) {
            Some(existing) if existing != category => {
                warn!(
                    extension = %key,
                    kept = %existing,
                    ignored = %category,
                    "extension listed under more than one category"
                );
            }
            Some(_) => {}
            None => {
                self.extension_map.insert(key, category.to_string());
            }
        }
    }

    /// Resolves an extension to its category name.
    ///
    /// # Examples
    ///
    /// ```
    /// use filedock::file_category::CategoryMap;
    ///
    /// let map = CategoryMap::default();
    /// assert_eq!(map.resolve(".pdf"), "DOCS");
    /// assert_eq!(map.resolve("PDF"), "DOCS");
    /// assert_eq!(map.resolve(""), "OTHERS");
    /// ```
    pub fn resolve(&self, extension: &str) -> &str {
        self.extension_map
            .get(&normalize_extension(extension))
            .map(String::as_str)
            .unwrap_or(FALLBACK)
    }

    /// Resolves the category of a file from its final extension.
    pub fn resolve_path(&self, path: &Path) -> &str {
        match path.extension() {
            Some(ext) => self.resolve(&ext.to_string_lossy()),
            None => FALLBACK,
        }
    }

    /// All known category names, including the fallback, in configuration
    /// order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    /// Returns true if `name` is a known category.
    pub fn contains_category(&self, name: &str) -> bool {
        self.categories.contains(name)
    }

    /// The built-in category table used when no configuration file exists.
    pub fn standard_table() -> CategoryTable {
        let entries: &[(&str, &[&str])] = &[
            (
                "IMAGES",
                &[
                    ".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg", ".bmp", ".tiff", ".ico",
                    ".heic",
                ],
            ),
            (
                "AUDIO",
                &[".mp3", ".wav", ".ogg", ".flac", ".aac", ".m4a", ".wma"],
            ),
            (
                "VIDEOS",
                &[".mp4", ".mkv", ".avi", ".mov", ".flv", ".wmv", ".webm", ".3gp"],
            ),
            (
                "DOCS",
                &[
                    ".pdf", ".txt", ".doc", ".docx", ".html", ".htm", ".md", ".rtf", ".odt",
                ],
            ),
            (
                "ARCHIVES",
                &[".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz"],
            ),
            (
                "CODE",
                &[
                    ".py", ".java", ".c", ".cpp", ".h", ".hpp", ".js", ".ts", ".rs", ".go", ".sh",
                    ".bash", ".json", ".xml", ".yaml", ".yml", ".toml",
                ],
            ),
            ("SPREADSHEETS", &[".csv", ".xls", ".xlsx", ".ods"]),
            ("PRESENTATIONS", &[".ppt", ".pptx", ".odp"]),
            ("FONTS", &[".ttf", ".otf", ".woff", ".woff2"]),
            ("INSTALLERS", &[".exe", ".msi", ".dmg", ".deb", ".rpm", ".apk"]),
        ];

        entries
            .iter()
            .map(|(category, exts)| {
                (
                    category.to_string(),
                    exts.iter().map(|e| e.to_string()).collect(),
                )
            })
            .collect()
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self::from_table(&Self::standard_table())
    }
}

/// Lowercases an extension and makes sure it carries exactly one leading dot.
/// An empty (or dot-only) extension stays empty.
fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return String::new();
    }
    format!(".{}", trimmed.to_lowercase())
}
