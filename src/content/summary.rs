//! Listing-view post summaries

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::document::RawDocument;

/// Minimal view of a post for the listing page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub uid: String,
    pub first_publication_date: Option<DateTime<FixedOffset>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl PostSummary {
    /// Map a raw document, taking missing fields as empty
    pub fn from_document(doc: &RawDocument) -> Self {
        Self {
            uid: doc.uid.clone().unwrap_or_default(),
            first_publication_date: doc.first_publication_date,
            title: doc.data.title.clone().unwrap_or_default(),
            subtitle: doc.data.subtitle.clone().unwrap_or_default(),
            author: doc.data.author.clone().unwrap_or_default(),
        }
    }
}

impl From<&RawDocument> for PostSummary {
    fn from(doc: &RawDocument) -> Self {
        Self::from_document(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::document::parse_timestamp;

    #[test]
    fn test_fields_pass_through() {
        let doc: RawDocument = serde_json::from_str(
            r#"{
                "uid": "criando-um-app-cra-do-zero",
                "first_publication_date": "2021-03-19T19:25:28+0000",
                "data": {
                    "title": "Criando um app CRA do zero",
                    "subtitle": "Tudo sobre como criar a sua primeira aplicação",
                    "author": "Danilo Vieira"
                }
            }"#,
        )
        .unwrap();

        let summary = PostSummary::from_document(&doc);
        assert_eq!(summary.uid, "criando-um-app-cra-do-zero");
        assert_eq!(
            summary.first_publication_date,
            parse_timestamp("2021-03-19T19:25:28+0000")
        );
        assert_eq!(summary.title, "Criando um app CRA do zero");
        assert_eq!(
            summary.subtitle,
            "Tudo sobre como criar a sua primeira aplicação"
        );
        assert_eq!(summary.author, "Danilo Vieira");
    }

    #[test]
    fn test_missing_subtitle_is_empty() {
        let doc: RawDocument = serde_json::from_str(
            r#"{ "uid": "sem-subtitulo", "data": { "title": "Sem subtítulo", "author": "Ana" } }"#,
        )
        .unwrap();

        let summary = PostSummary::from(&doc);
        assert_eq!(summary.subtitle, "");
        assert_eq!(summary.title, "Sem subtítulo");
        assert!(summary.first_publication_date.is_none());
    }
}
