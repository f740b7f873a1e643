use super::types::{Hit, RetrievedDocRef};
use crate::index::protocol::{DocHit, TextHit};
use std::collections::HashMap;

const EMPHASIS_OPEN: &str = "<b>";
const EMPHASIS_CLOSE: &str = "</b>";

/// Turns text-index hits into ranked references, keeping the service order.
pub fn ranked_refs(hits: &[TextHit]) -> Vec<RetrievedDocRef> {
    hits.iter()
        .enumerate()
        .map(|(rank, hit)| RetrievedDocRef {
            id: hit.id.clone(),
            rank,
        })
        .collect()
}

/// Restores the text ranking on top of the document-store records.
///
/// IDs with no stored document are skipped: a missing document is a data
/// inconsistency between the two services, not a reason to fail the request.
pub fn join_hits(ranked: &[RetrievedDocRef], docs: Vec<DocHit>, query: &str) -> Vec<Hit> {
    let docs_by_id: HashMap<String, DocHit> =
        docs.into_iter().map(|doc| (doc.id.clone(), doc)).collect();

    let mut hits = Vec::with_capacity(ranked.len());
    for doc_ref in ranked {
        match docs_by_id.get(&doc_ref.id) {
            Some(doc) => {
                let hit = Hit {
                    id: doc.id.clone(),
                    url: doc.fields.url.clone(),
                    title: doc.fields.title.clone(),
                    summary: doc.fields.summary.clone(),
                };
                hits.push(highlight(hit, query));
            }
            None => {
                tracing::debug!(
                    "Document {} (rank {}) missing from the document store",
                    doc_ref.id,
                    doc_ref.rank
                );
            }
        }
    }
    hits
}

/// Emphasizes the query in title and summary.
///
/// This is a literal, case-sensitive match of the whole query surrounded by a
/// space on both sides, so occurrences at the very start or end of a field are
/// not highlighted.
pub fn highlight(mut hit: Hit, query: &str) -> Hit {
    if query.is_empty() {
        return hit;
    }

    let needle = format!(" {query} ");
    let replacement = format!(" {EMPHASIS_OPEN}{query}{EMPHASIS_CLOSE} ");

    hit.title = hit.title.replace(&needle, &replacement);
    hit.summary = hit.summary.replace(&needle, &replacement);
    hit
}
