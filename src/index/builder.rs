//! Query Body Builder
//!
//! Typed request bodies for the two-stage retrieval:
//! 1. **Text**: a weighted multi-field match wrapped in a `function_score`, paginated.
//! 2. **Docs**: an ID-membership filter over the IDs returned by the text stage.
//!
//! User text only ever enters a body as a serialized string value.

use serde::Serialize;

/// Stored fields requested from the document store.
pub const DOCS_FIELDS: [&str; 3] = ["title", "summary", "url"];
/// Upper bound on documents fetched per request, independent of page size.
pub const DOCS_MAX_SIZE: usize = 100;
/// Document type of the indexed pages.
pub const DOC_TYPE: &str = "page";

/// Terms that may be missing from a match: "-25%" means 75% of terms must match.
const MINIMUM_SHOULD_MATCH: &str = "-25%";
const TIE_BREAKER: f32 = 0.5;
/// Score used for documents with no per-language signal.
const MISSING_LANG_SCORE: f32 = 0.002;

/// Relative weights of the matched fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWeights {
    pub title: u32,
    pub body: u32,
    pub url_words: u32,
    pub domain_words: u32,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 3,
            body: 1,
            url_words: 2,
            domain_words: 8,
        }
    }
}

impl FieldWeights {
    /// Field list in `name^weight` form; a weight of 1 is left implicit.
    pub fn boosted_fields(&self) -> Vec<String> {
        [
            ("title", self.title),
            ("body", self.body),
            ("url_words", self.url_words),
            ("domain_words", self.domain_words),
        ]
        .into_iter()
        .map(|(field, weight)| match weight {
            1 => field.to_string(),
            w => format!("{field}^{w}"),
        })
        .collect()
    }
}

// --- Text index body ---

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextSearchBody {
    pub query: FunctionScoreQuery,
    pub from: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FunctionScoreQuery {
    pub function_score: FunctionScore,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FunctionScore {
    pub query: MultiMatchQuery,
    pub functions: Vec<ScoreFunction>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MultiMatchQuery {
    pub multi_match: MultiMatch,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MultiMatch {
    pub query: String,
    pub minimum_should_match: &'static str,
    #[serde(rename = "type")]
    pub match_type: &'static str,
    pub tie_breaker: f32,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreFunction {
    pub field_value_factor: FieldValueFactor,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldValueFactor {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<f32>,
    pub missing: f32,
}

impl ScoreFunction {
    /// Generic rank signal computed at indexing time.
    pub fn rank() -> Self {
        Self {
            field_value_factor: FieldValueFactor {
                field: "rank".to_string(),
                factor: Some(1.0),
                missing: 0.0,
            },
        }
    }

    /// Per-language probability signal stored as `lang_<code>`.
    pub fn language(lang: &str) -> Self {
        Self {
            field_value_factor: FieldValueFactor {
                field: format!("lang_{lang}"),
                factor: None,
                missing: MISSING_LANG_SCORE,
            },
        }
    }
}

/// Builds the paginated text-index query. The language boost is left out
/// entirely when `lang` is `"all"`.
pub fn build_text_request(
    query: &str,
    lang: &str,
    page: u32,
    page_size: usize,
    weights: &FieldWeights,
) -> TextSearchBody {
    let mut functions = vec![ScoreFunction::rank()];
    if lang != crate::bangs::detector::ALL_LANGS {
        functions.push(ScoreFunction::language(lang));
    }

    TextSearchBody {
        query: FunctionScoreQuery {
            function_score: FunctionScore {
                query: MultiMatchQuery {
                    multi_match: MultiMatch {
                        query: query.to_string(),
                        minimum_should_match: MINIMUM_SHOULD_MATCH,
                        match_type: "cross_fields",
                        tie_breaker: TIE_BREAKER,
                        fields: weights.boosted_fields(),
                    },
                },
                functions,
            },
        },
        from: (page.max(1) as usize - 1) * page_size,
        size: page_size,
    }
}

// --- Document store body ---

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DocsSearchBody {
    pub query: FilteredQuery,
    pub fields: Vec<&'static str>,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FilteredQuery {
    pub filtered: Filtered,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Filtered {
    pub filter: BoolFilter,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BoolFilter {
    #[serde(rename = "bool")]
    pub bool_filter: MustFilter,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MustFilter {
    pub must: Vec<IdsClause>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IdsClause {
    pub ids: IdsFilter,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IdsFilter {
    #[serde(rename = "type")]
    pub doc_type: &'static str,
    pub values: Vec<String>,
}

/// Builds the document-store lookup for the IDs returned by the text stage.
pub fn build_docs_request<S: AsRef<str>>(ids: &[S]) -> DocsSearchBody {
    DocsSearchBody {
        query: FilteredQuery {
            filtered: Filtered {
                filter: BoolFilter {
                    bool_filter: MustFilter {
                        must: vec![IdsClause {
                            ids: IdsFilter {
                                doc_type: DOC_TYPE,
                                values: ids.iter().map(|id| id.as_ref().to_string()).collect(),
                            },
                        }],
                    },
                },
            },
        },
        fields: DOCS_FIELDS.to_vec(),
        size: DOCS_MAX_SIZE,
    }
}
