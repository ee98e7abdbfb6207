use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Category assigned to snippets whose category is blank
pub const UNCATEGORIZED: &str = "uncategorized";

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// A single snippet record.
///
/// This is exactly what gets written to disk, one JSON file per snippet. The
/// `path` is the storage location handle assigned by the store; it is never
/// serialized and stays stable once assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,

    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl Snippet {
    pub fn new(title: String, category: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            title,
            category,
            language: String::new(),
            tags: Vec::new(),
            content,
            created_at: now,
            updated_at: now,
            path: None,
        }
    }

    /// Category with blank values folded into [`UNCATEGORIZED`]
    pub fn category_or_default(&self) -> &str {
        let trimmed = self.category.trim();
        if trimmed.is_empty() {
            UNCATEGORIZED
        } else {
            trimmed
        }
    }

    pub fn tags_display(&self) -> String {
        self.tags.join(", ")
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

/// Turns a title into a file-safe identifier.
///
/// Lowercases, collapses every run of non-alphanumeric characters into one
/// `-` and trims separators from both ends. Titles with nothing usable get a
/// random `snippet-xxxxxxxx` identifier instead.
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let slug = SLUG_RE.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        let id = Uuid::new_v4().simple().to_string();
        format!("snippet-{}", &id[..8])
    } else {
        slug.to_string()
    }
}

/// Splits a comma separated tag field, dropping blank entries
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sorts snippets by title, ignoring case. Stable, so equal titles keep
/// their load order.
pub fn sort_by_title(snippets: &mut [Snippet]) {
    snippets.sort_by_cached_key(|s| s.title.to_lowercase());
}
