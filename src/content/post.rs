//! Fully assembled posts

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::document::RawDocument;
use super::reading_time;
use super::richtext::{BlockSerializer, RenderedSection, RichTextBlock, RichTextRenderer};

/// A named content unit of a post
#[derive(Debug, Clone, Serialize)]
pub struct PostSection {
    pub heading: String,
    pub body: Vec<RichTextBlock>,
}

/// A post ready to be rendered
#[derive(Debug, Clone, Serialize)]
pub struct AssembledPost {
    pub uid: String,
    pub first_publication_date: Option<DateTime<FixedOffset>>,
    pub title: String,
    pub subtitle: String,
    pub banner_url: String,
    pub author: String,
    pub sections: Vec<PostSection>,
}

impl AssembledPost {
    /// Assemble a post from a raw document
    ///
    /// Sections and their blocks keep the repository's order; nothing is
    /// deduplicated and rich text is left uninterpreted.
    pub fn from_document(doc: RawDocument) -> Self {
        let data = doc.data;

        let sections = data
            .content
            .unwrap_or_default()
            .into_iter()
            .map(|slice| PostSection {
                heading: slice.heading.unwrap_or_default(),
                body: slice.body.unwrap_or_default(),
            })
            .collect();

        Self {
            uid: doc.uid.unwrap_or_default(),
            first_publication_date: doc.first_publication_date,
            title: data.title.unwrap_or_default(),
            subtitle: data.subtitle.unwrap_or_default(),
            banner_url: data.banner.and_then(|b| b.url).unwrap_or_default(),
            author: data.author.unwrap_or_default(),
            sections,
        }
    }

    /// Estimated reading time in minutes, recomputed on every call
    pub fn reading_time(&self) -> usize {
        reading_time::estimate(&self.sections)
    }

    /// Render every section to markup
    pub fn render_sections<S: BlockSerializer>(
        &self,
        renderer: &RichTextRenderer<S>,
    ) -> Vec<RenderedSection> {
        renderer.render(&self.sections)
    }
}

impl From<RawDocument> for AssembledPost {
    fn from(doc: RawDocument) -> Self {
        Self::from_document(doc)
    }
}
