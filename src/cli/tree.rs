use crate::highlight::Markup;
use crate::models::{FolderTree, SidebarItem, Snippet};
use crate::search::{SearchEngine, SearchMode};
use colored::Colorize;

const MARGIN: &str = "┃";

/// Whether the row at `index` is followed by a sibling before its parent ends
fn has_next_sibling(items: &[SidebarItem], index: usize) -> bool {
    let depth = items[index].depth();
    items[index + 1..]
        .iter()
        .take_while(|item| item.depth() >= depth)
        .any(|item| item.depth() == depth)
}

fn title_text(markup: &Markup) -> String {
    markup
        .segments()
        .iter()
        .map(|segment| {
            if segment.marks.matched {
                segment.text.bright_yellow().underline().to_string()
            } else {
                segment.text.bright_white().to_string()
            }
        })
        .collect()
}

fn snippet_line(snippet: &Snippet, title: &Markup) -> String {
    let language = if snippet.language.is_empty() {
        String::new()
    } else {
        format!(" [{}]", snippet.language)
    };
    format!(
        "{}{} {}",
        title_text(title),
        language.bright_black(),
        snippet.category_or_default().bright_black().italic()
    )
}

/// Renders the folder hierarchy with tree guides
pub fn render_tree(snippets: &[Snippet]) -> Vec<String> {
    let items = FolderTree::build(snippets).flatten(snippets);
    let mut guides: Vec<bool> = Vec::new();
    let mut out = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        let depth = item.depth();
        guides.truncate(depth);

        let mut line = format!("{}  ", MARGIN.bright_magenta());
        for open in &guides {
            line.push_str(if *open { "┃  " } else { "   " });
        }
        let last = !has_next_sibling(&items, i);
        line.push_str(if last { "└── " } else { "├── " });

        match item {
            SidebarItem::Folder { name, .. } => {
                line.push_str(&format!("{}/", name).bright_blue().bold().to_string());
            }
            SidebarItem::Snippet { title, index, .. } => {
                if let Some(snippet) = snippets.get(*index) {
                    line.push_str(&snippet_line(snippet, title));
                }
            }
        }

        guides.push(!last);
        out.push(line);
    }
    out
}

/// Renders the flat list of snippets matching `query`
pub fn render_matches(snippets: &[Snippet], query: &str, mode: SearchMode) -> Vec<String> {
    SearchEngine::default()
        .apply(snippets, query, mode)
        .iter()
        .filter_map(|item| match item {
            SidebarItem::Snippet { title, index, .. } => snippets
                .get(*index)
                .map(|snippet| format!("{}  {}", MARGIN.bright_magenta(), snippet_line(snippet, title))),
            SidebarItem::Folder { .. } => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::snippet::sort_by_title;

    fn snippets() -> Vec<Snippet> {
        colored::control::set_override(false);
        let mut snippets = vec![
            Snippet::new("Router".into(), "backend/express".into(), "r".into()),
            Snippet::new("useFetch".into(), "frontend/react".into(), "f".into()),
            Snippet::new("Centering".into(), "frontend".into(), "c".into()),
        ];
        snippets[1].language = "js".into();
        sort_by_title(&mut snippets);
        snippets
    }

    #[test]
    fn tree_draws_guides() {
        let lines = render_tree(&snippets());
        assert_eq!(
            lines,
            vec![
                "┃  ├── backend/",
                "┃  ┃  └── express/",
                "┃  ┃     └── Router backend/express",
                "┃  └── frontend/",
                "┃     ├── react/",
                "┃     ┃  └── useFetch [js] frontend/react",
                "┃     └── Centering frontend",
            ]
        );
    }

    #[test]
    fn matches_are_flat() {
        let lines = render_matches(&snippets(), "fetch", SearchMode::Substring);
        assert_eq!(lines, vec!["┃  useFetch [js] frontend/react"]);
        assert!(render_matches(&snippets(), "zzz", SearchMode::Fuzzy).is_empty());
    }
}
