use serde::{Deserialize, Serialize};
use std::fmt;

/// Similarity reported for every hit; keyword search does no scoring.
pub const PLACEHOLDER_SIMILARITY: u8 = 1;

/// Primary key of a row in the document table.
///
/// Kept in whatever shape the store returns so it round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    Int(i64),
    Text(String),
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for DocumentId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl Document {
    pub fn new(
        id: impl Into<DocumentId>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub uuid: DocumentId,
    pub title: Option<String>,
    pub content: Option<String>,
    pub similarity: u8,
}

impl From<Document> for SearchHit {
    fn from(doc: Document) -> Self {
        Self {
            uuid: doc.id,
            title: doc.title,
            content: doc.content,
            similarity: PLACEHOLDER_SIMILARITY,
        }
    }
}

/// Disjunction of case-insensitive substring conditions over `content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    /// Splits a (trimmed) query on whitespace runs.
    ///
    /// An empty query yields a single empty keyword, which every
    /// non-null content contains.
    pub fn from_query(query: &str) -> Self {
        let mut keywords: Vec<String> = query.split_whitespace().map(str::to_string).collect();
        if keywords.is_empty() {
            keywords.push(String::new());
        }
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn matches(&self, doc: &Document) -> bool {
        let Some(content) = doc.content.as_deref() else {
            return false;
        };
        let content = content.to_lowercase();
        self.keywords
            .iter()
            .any(|k| content.contains(&k.to_lowercase()))
    }
}
