/// Allows only `max_terms` words to enter the actual search.
///
/// Returns the usable query and the first word that was cut off. Queries
/// within the limit are returned untouched; longer ones are re-joined with
/// single spaces. Only one overflow word is surfaced, not the whole remainder.
pub fn normalize_query(query: &str, max_terms: usize) -> (String, Option<String>) {
    let words: Vec<&str> = query.split_whitespace().collect();

    if words.len() <= max_terms {
        return (query.to_string(), None);
    }

    let truncated = words[..max_terms].join(" ");
    let extra = words[max_terms].to_string();

    tracing::debug!("Query truncated to {} terms, dropped {:?}", max_terms, extra);

    (truncated, Some(extra))
}
