//! Extension-based file classification.
//!
//! Every file is sorted into one of a fixed set of categories by looking its
//! extension up in a static table. Anything the table does not know lands in
//! [`Category::Others`].
//!
//! # Examples
//!
//! ```
//! use file_organizer::category::{Category, classify};
//!
//! assert_eq!(classify(".png"), Category::Images);
//! assert_eq!(classify(".PDF"), Category::Documents);
//! assert_eq!(classify(".zzz"), Category::Others);
//! ```

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// A destination folder label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Image files (JPG, PNG, SVG, etc.)
    Images,
    /// Documents, spreadsheets and presentations (PDF, DOCX, XLSX, etc.)
    Documents,
    /// Audio files (MP3, FLAC, etc.)
    Audio,
    /// Video files (MP4, MKV, etc.)
    Video,
    /// Archives and compressed files (ZIP, TAR, GZ, etc.)
    Archives,
    /// Source code and web files (PY, JS, HTML, JSON, etc.)
    Code,
    /// Fallback for unknown extensions
    Others,
}

impl Category {
    /// All categories, in table declaration order followed by the fallback.
    pub const ALL: [Category; 7] = [
        Category::Images,
        Category::Documents,
        Category::Audio,
        Category::Video,
        Category::Archives,
        Category::Code,
        Category::Others,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use file_organizer::category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "images");
    /// assert_eq!(Category::Others.dir_name(), "others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Documents => "documents",
            Category::Audio => "audio",
            Category::Video => "video",
            Category::Archives => "archives",
            Category::Code => "code",
            Category::Others => "others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// The built-in table, in declaration order.
const STANDARD_GROUPS: &[(Category, &[&str])] = &[
    (
        Category::Images,
        &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".tiff", ".webp"],
    ),
    (
        Category::Documents,
        &[
            ".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt", ".xls", ".xlsx", ".ppt", ".pptx",
        ],
    ),
    (
        Category::Audio,
        &[".mp3", ".wav", ".flac", ".aac", ".ogg", ".wma"],
    ),
    (
        Category::Video,
        &[".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm"],
    ),
    (
        Category::Archives,
        &[".zip", ".rar", ".7z", ".tar", ".gz", ".bz2"],
    ),
    (
        Category::Code,
        &[
            ".py", ".js", ".html", ".css", ".java", ".cpp", ".c", ".php", ".rb", ".go", ".ts",
            ".jsx", ".json",
        ],
    ),
];

static STANDARD_TABLE: LazyLock<ExtensionTable> =
    LazyLock::new(|| ExtensionTable::from_groups(STANDARD_GROUPS));

/// Maps extensions (with their leading `.`) to categories.
///
/// The table is built from ordered groups into a reverse index, so lookups are
/// O(1). If an extension appears in more than one group, the group declared
/// first keeps it.
#[derive(Debug, Clone)]
pub struct ExtensionTable {
    groups: Vec<(Category, Vec<String>)>,
    index: HashMap<String, Category>,
}

impl ExtensionTable {
    /// Builds a table from `(category, extensions)` groups.
    pub fn from_groups(groups: &[(Category, &[&str])]) -> Self {
        let mut index = HashMap::new();
        let mut owned = Vec::with_capacity(groups.len());

        for (category, extensions) in groups {
            let extensions: Vec<String> = extensions.iter().map(|e| e.to_lowercase()).collect();
            for ext in &extensions {
                index.entry(ext.clone()).or_insert(*category);
            }
            owned.push((*category, extensions));
        }

        Self {
            groups: owned,
            index,
        }
    }

    /// The process-wide built-in table.
    pub fn standard() -> &'static ExtensionTable {
        &STANDARD_TABLE
    }

    /// Looks an extension up, ignoring case. Unknown extensions map to
    /// [`Category::Others`].
    pub fn classify(&self, extension: &str) -> Category {
        self.index
            .get(&extension.to_lowercase())
            .copied()
            .unwrap_or(Category::Others)
    }

    /// The extensions declared for a category, in declaration order.
    pub fn extensions(&self, category: Category) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|(c, _)| *c == category)
            .flat_map(|(_, exts)| exts.iter().map(String::as_str))
            .collect()
    }
}

/// Classifies an extension such as `.jpg` against the built-in table.
pub fn classify(extension: &str) -> Category {
    ExtensionTable::standard().classify(extension)
}
