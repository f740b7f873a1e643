use super::table::{BangTable, LANG_PLACEHOLDER, SEARCH_PLACEHOLDER};

/// Marker character that introduces a bang token.
pub const BANG_MARKER: char = '!';

/// Language value that disables language-specific behaviour.
pub const ALL_LANGS: &str = "all";

/// Detects bang usage in a query and returns the redirect URL, if any.
///
/// The first term that starts with `!`, is longer than one character and names
/// a bang with a template for `lang` (or `"any"`) wins. That term is removed,
/// the remaining terms are joined with single spaces and substituted into the
/// template together with the language.
///
/// Bangs are not supported when searching all languages: `lang == "all"`
/// always yields `None`.
///
/// The returned URL carries the leftover percent-encoded (`%20` for spaces),
/// not the raw text.
pub fn detect_bang(table: &BangTable, query: &str, lang: &str) -> Option<String> {
    if lang == ALL_LANGS {
        return None;
    }

    let terms: Vec<&str> = query.split_whitespace().collect();

    for (i, term) in terms.iter().enumerate() {
        let Some(token) = term.strip_prefix(BANG_MARKER) else {
            continue;
        };
        if token.is_empty() {
            continue;
        }
        let Some(template) = table.get(token).and_then(|entry| entry.template_for(lang)) else {
            continue;
        };

        let leftover = terms
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, t)| *t)
            .collect::<Vec<_>>()
            .join(" ");

        tracing::debug!("Query matched bang !{} (lang {})", token, lang);

        return Some(expand_template(template, &leftover, lang));
    }

    None
}

/// Fills a redirect template. The leftover search is percent-encoded so user
/// text cannot alter the structure of the target URL.
pub fn expand_template(template: &str, leftover: &str, lang: &str) -> String {
    template
        .replace(SEARCH_PLACEHOLDER, &urlencoding::encode(leftover))
        .replace(LANG_PLACEHOLDER, &urlencoding::encode(lang))
}
