//! Raw documents as returned by the content repository

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::richtext::RichTextBlock;

/// A page of query results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiPage {
    #[serde(default)]
    pub page: u32,

    #[serde(default)]
    pub results_per_page: u32,

    #[serde(default)]
    pub total_results_size: u32,

    #[serde(default)]
    pub total_pages: u32,

    /// Opaque URL of the following page, `None` once exhausted
    #[serde(default, alias = "nextCursor")]
    pub next_page: Option<String>,

    #[serde(default)]
    pub prev_page: Option<String>,

    #[serde(default)]
    pub results: Vec<RawDocument>,
}

impl ApiPage {
    /// Build a page from results and a cursor
    pub fn new(results: Vec<RawDocument>, next_page: Option<String>) -> Self {
        Self {
            next_page,
            results,
            ..Self::default()
        }
    }
}

/// A structured document, before any mapping
///
/// Every field the blog reads is optional here; defaults are applied when a
/// document is mapped into a summary or an assembled post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub uid: Option<String>,

    #[serde(rename = "type", default)]
    pub doc_type: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        serialize_with = "serialize_timestamp"
    )]
    pub first_publication_date: Option<DateTime<FixedOffset>>,

    #[serde(default)]
    pub data: DocumentData,
}

/// The `data` map of a post document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentData {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub banner: Option<ImageField>,
    pub content: Option<Vec<ContentSlice>>,
}

/// Image field with its public URL
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageField {
    pub url: Option<String>,
    pub alt: Option<String>,
}

/// One entry of the `content` group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSlice {
    pub heading: Option<String>,
    pub body: Option<Vec<RichTextBlock>>,
}

/// Parse repository timestamps
///
/// The repository emits offsets without a colon (`+0000`), which RFC 3339
/// parsing rejects, so both spellings are accepted.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s))),
    }
}

fn serialize_timestamp<S>(
    value: &Option<DateTime<FixedOffset>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(date) => serializer.serialize_some(&date.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repository_timestamp() {
        let date = parse_timestamp("2021-03-25T19:25:28+0000").unwrap();
        assert_eq!(date.to_rfc3339(), "2021-03-25T19:25:28+00:00");

        let date = parse_timestamp("2021-03-25T19:25:28-03:00").unwrap();
        assert_eq!(date.offset().local_minus_utc(), -3 * 3600);

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_deserialize_page() {
        let json = r#"{
            "page": 1,
            "results_per_page": 2,
            "total_results_size": 3,
            "total_pages": 2,
            "next_page": "https://repo.example/api/v2/documents/search?page=2",
            "prev_page": null,
            "results": [{
                "id": "YFzT",
                "uid": "como-utilizar-hooks",
                "type": "posts",
                "first_publication_date": "2021-03-15T19:25:28+0000",
                "data": {
                    "title": "Como utilizar Hooks",
                    "subtitle": "Pensando em sincronização em vez de ciclos de vida",
                    "author": "Joseph Oliveira"
                }
            }]
        }"#;

        let page: ApiPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_pages, 2);
        assert!(page.next_page.is_some());
        assert_eq!(page.results.len(), 1);

        let doc = &page.results[0];
        assert_eq!(doc.uid.as_deref(), Some("como-utilizar-hooks"));
        assert_eq!(doc.data.author.as_deref(), Some("Joseph Oliveira"));
        assert!(doc.data.content.is_none());
        assert!(doc.first_publication_date.is_some());
    }

    #[test]
    fn test_next_cursor_alias_and_nulls() {
        let json = r#"{
            "nextCursor": null,
            "results": [{ "uid": "a", "first_publication_date": null, "data": { "subtitle": null } }]
        }"#;

        let page: ApiPage = serde_json::from_str(json).unwrap();
        assert!(page.next_page.is_none());
        assert!(page.results[0].first_publication_date.is_none());
        assert!(page.results[0].data.subtitle.is_none());

        let json = r#"{ "nextCursor": "https://repo.example/next", "results": [] }"#;
        let page: ApiPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_page.as_deref(), Some("https://repo.example/next"));
    }
}
