use crate::highlight::{Markup, contains_folded, highlight_positions, highlight_substring};
use crate::models::{SidebarItem, Snippet};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// How a non-empty query is matched against snippets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    Substring,
    Fuzzy,
}

impl SearchMode {
    pub fn toggled(self) -> Self {
        match self {
            SearchMode::Substring => SearchMode::Fuzzy,
            SearchMode::Fuzzy => SearchMode::Substring,
        }
    }

    pub fn is_fuzzy(self) -> bool {
        self == SearchMode::Fuzzy
    }
}

/// Produces the flat, highlighted result list for a query.
///
/// Results keep the order of the source collection. Callers are expected to
/// handle the empty query themselves by browsing the folder tree instead.
pub struct SearchEngine {
    matcher: SkimMatcherV2,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self {
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine").finish_non_exhaustive()
    }
}

impl SearchEngine {
    pub fn apply(&self, snippets: &[Snippet], query: &str, mode: SearchMode) -> Vec<SidebarItem> {
        let query = query.trim();

        snippets
            .iter()
            .enumerate()
            .filter_map(|(index, snippet)| {
                let title = match mode {
                    SearchMode::Substring => Self::match_substring(snippet, query),
                    SearchMode::Fuzzy => self.match_fuzzy(snippet, query),
                }?;
                Some(SidebarItem::Snippet {
                    title,
                    category: snippet.category.clone(),
                    depth: 0,
                    index,
                })
            })
            .collect()
    }

    /// Title, category, content or any tag contains the query
    fn match_substring(snippet: &Snippet, query: &str) -> Option<Markup> {
        let hit = contains_folded(&snippet.title, query)
            || contains_folded(&snippet.category, query)
            || contains_folded(&snippet.content, query)
            || snippet.tags.iter().any(|tag| contains_folded(tag, query));

        hit.then(|| highlight_substring(&snippet.title, query))
    }

    /// Ordered subsequence of the title or the category. Only title matches
    /// carry highlight positions.
    fn match_fuzzy(&self, snippet: &Snippet, query: &str) -> Option<Markup> {
        if query.is_empty() {
            return Some(Markup::plain(snippet.title.clone()));
        }

        if let Some((_score, positions)) = self.matcher.fuzzy_indices(&snippet.title, query) {
            return Some(highlight_positions(&snippet.title, &positions));
        }

        self.matcher
            .fuzzy_match(&snippet.category, query)
            .map(|_| Markup::plain(snippet.title.clone()))
    }
}
