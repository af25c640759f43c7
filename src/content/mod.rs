//! Content module - raw documents, summaries, assembled posts and rich text

pub mod document;
pub mod post;
pub mod reading_time;
pub mod richtext;
pub mod summary;

pub use document::{ApiPage, RawDocument};
pub use post::{AssembledPost, PostSection};
pub use richtext::{BlockSerializer, HtmlSerializer, RenderedSection, RichTextBlock, RichTextRenderer};
pub use summary::PostSummary;
