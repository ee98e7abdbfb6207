//! Highlight markup
//!
//! Text is never highlighted by splicing escape codes into strings. Instead a
//! [`Markup`] is a run of [`Segment`]s, each carrying independent flags for
//! query matches and language keywords, so the two passes compose without
//! corrupting each other. The renderer maps the flags to styles.
//!
//! All positions handled here are `char` offsets, never byte offsets.

use once_cell::sync::Lazy;
use regex::Regex;

static JS_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(const|let|var|function|return|if|else|for|while|switch|case|break|await|async|new|class|try|catch|throw)\b",
    )
    .expect("valid js keyword regex")
});

static GO_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(func|package|import|return|if|else|for|range|switch|case|break|go|defer|type|struct|interface|map|chan|var|const)\b",
    )
    .expect("valid go keyword regex")
});

static SQL_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(SELECT|FROM|WHERE|AND|OR|INSERT|INTO|VALUES|UPDATE|SET|DELETE|JOIN|LEFT|RIGHT|ON|GROUP|BY|ORDER|LIMIT)\b",
    )
    .expect("valid sql keyword regex")
});

/// Emphasis flags carried by a segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Marks {
    pub matched: bool,
    pub keyword: bool,
}

impl Marks {
    pub const MATCHED: Marks = Marks {
        matched: true,
        keyword: false,
    };

    pub fn is_plain(self) -> bool {
        !self.matched && !self.keyword
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub marks: Marks,
}

/// Display text split into uniformly marked segments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    segments: Vec<Segment>,
}

impl Markup {
    pub fn plain(text: impl Into<String>) -> Self {
        let mut markup = Self::default();
        markup.push(text.into(), Marks::default());
        markup
    }

    /// Appends text, merging it into the last segment when the marks agree
    pub fn push(&mut self, text: String, marks: Marks) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.marks == marks => last.text.push_str(&text),
            _ => self.segments.push(Segment { text, marks }),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Concatenation of every segment flagged as a query match
    pub fn matched_text(&self) -> String {
        self.segments
            .iter()
            .filter(|s| s.marks.matched)
            .map(|s| s.text.as_str())
            .collect()
    }

    pub fn is_plain(&self) -> bool {
        self.segments.iter().all(|s| s.marks.is_plain())
    }
}

/// Simple case fold of a single char. Keeps one char per input char so
/// folded offsets line up with the original text.
pub fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn fold(text: &str) -> Vec<char> {
    text.chars().map(fold_char).collect()
}

fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| haystack[i..i + needle.len()] == *needle)
}

/// Case-insensitive substring test using the same folding as the highlighter
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    let needle = fold(needle);
    needle.is_empty() || find_from(&fold(haystack), &needle, 0).is_some()
}

/// Marks every non-overlapping, case-insensitive occurrence of `query`,
/// scanning left to right. An empty query returns the text unchanged.
pub fn highlight_substring(text: &str, query: &str) -> Markup {
    let needle = fold(query);
    if needle.is_empty() {
        return Markup::plain(text);
    }

    let chars: Vec<char> = text.chars().collect();
    let folded: Vec<char> = chars.iter().copied().map(fold_char).collect();

    let mut markup = Markup::default();
    let mut cursor = 0;
    while let Some(start) = find_from(&folded, &needle, cursor) {
        let end = start + needle.len();
        markup.push(chars[cursor..start].iter().collect(), Marks::default());
        markup.push(chars[start..end].iter().collect(), Marks::MATCHED);
        cursor = end;
    }
    markup.push(chars[cursor..].iter().collect(), Marks::default());
    markup
}

/// Marks the chars at the given char offsets. Offsets past the end are
/// ignored.
pub fn highlight_positions(text: &str, positions: &[usize]) -> Markup {
    let mut markup = Markup::default();
    for (i, c) in text.chars().enumerate() {
        let marks = if positions.contains(&i) {
            Marks::MATCHED
        } else {
            Marks::default()
        };
        markup.push(c.to_string(), marks);
    }
    markup
}

fn keyword_regex(language: &str) -> Option<&'static Regex> {
    match language.trim().to_lowercase().as_str() {
        "js" | "javascript" | "ts" | "typescript" => Some(&JS_KEYWORDS),
        "go" | "golang" => Some(&GO_KEYWORDS),
        "sql" => Some(&SQL_KEYWORDS),
        _ => None,
    }
}

/// Flags recognised keywords on top of existing markup.
///
/// Keyword ranges are found on the plain text and then cut into the
/// existing segments, so query marks survive. SQL keywords are shown
/// uppercased. Unknown languages pass through untouched.
pub fn color_keywords(markup: Markup, language: &str) -> Markup {
    let Some(re) = keyword_regex(language) else {
        return markup;
    };
    let uppercase = language.trim().eq_ignore_ascii_case("sql");

    let plain = markup.plain_text();
    let ranges: Vec<_> = re.find_iter(&plain).map(|m| m.range()).collect();
    if ranges.is_empty() {
        return markup;
    }

    let mut out = Markup::default();
    let mut offset = 0;
    for segment in markup.segments {
        let start = offset;
        let end = offset + segment.text.len();
        let mut cursor = start;

        for range in ranges.iter().filter(|r| r.start < end && r.end > start) {
            let kw_start = range.start.max(start);
            let kw_end = range.end.min(end);
            if kw_start > cursor {
                out.push(plain[cursor..kw_start].to_string(), segment.marks);
            }
            let piece = &plain[kw_start..kw_end];
            let text = if uppercase {
                piece.to_uppercase()
            } else {
                piece.to_string()
            };
            out.push(
                text,
                Marks {
                    keyword: true,
                    ..segment.marks
                },
            );
            cursor = kw_end;
        }

        if cursor < end {
            out.push(plain[cursor..end].to_string(), segment.marks);
        }
        offset = end;
    }
    out
}

/// Query highlight followed by keyword coloring for one preview line
pub fn highlight_line(line: &str, query: &str, language: &str) -> Markup {
    color_keywords(highlight_substring(line, query), language)
}
