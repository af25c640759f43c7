//! Rich-text blocks and their HTML rendering

use serde::{Deserialize, Serialize};

use super::post::PostSection;
use crate::helpers::post_path;

/// Kind of a rich-text block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    #[serde(rename = "heading1")]
    Heading1,
    #[serde(rename = "heading2")]
    Heading2,
    #[serde(rename = "heading3")]
    Heading3,
    #[serde(rename = "heading4")]
    Heading4,
    #[serde(rename = "heading5")]
    Heading5,
    #[serde(rename = "heading6")]
    Heading6,
    #[default]
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "preformatted")]
    Preformatted,
    #[serde(rename = "list-item")]
    ListItem,
    #[serde(rename = "o-list-item")]
    OrderedListItem,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "embed")]
    Embed,
    #[serde(other)]
    Unknown,
}

/// A block of formatted text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type", default)]
    pub kind: BlockKind,

    /// Plain text of the block, without markup
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub spans: Vec<Span>,

    /// Image source, for image blocks
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub alt: Option<String>,

    #[serde(default)]
    pub oembed: Option<Embed>,
}

impl RichTextBlock {
    /// A paragraph block without spans
    pub fn paragraph(text: &str) -> Self {
        Self {
            kind: BlockKind::Paragraph,
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    /// The block's plain text, empty when the block has none
    pub fn plain_text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

/// Span kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanKind {
    #[serde(rename = "strong")]
    Strong,
    #[serde(rename = "em")]
    Em,
    #[serde(rename = "hyperlink")]
    Hyperlink,
    #[serde(rename = "label")]
    Label,
    #[serde(other)]
    Unknown,
}

/// Styling over a range of a block's text
///
/// `start` and `end` count UTF-16 code units, as the repository reports them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: SpanKind,
    #[serde(default)]
    pub data: Option<SpanData>,
}

/// Link or label payload of a span
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanData {
    pub link_type: Option<String>,
    pub url: Option<String>,
    pub uid: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub target: Option<String>,
    pub label: Option<String>,
}

/// oEmbed payload of an embed block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Embed {
    pub html: Option<String>,
    pub embed_url: Option<String>,
    #[serde(rename = "type")]
    pub embed_type: Option<String>,
    pub provider_name: Option<String>,
}

/// Converts a single rich-text block into markup
pub trait BlockSerializer {
    fn serialize(&self, block: &RichTextBlock) -> String;
}

/// Standard rich-text to HTML mapping
#[derive(Debug, Clone)]
pub struct HtmlSerializer {
    root: String,
    document_type: String,
}

impl HtmlSerializer {
    /// Create a serializer resolving document links under `root`
    pub fn new(root: &str, document_type: &str) -> Self {
        Self {
            root: root.to_string(),
            document_type: document_type.to_string(),
        }
    }

    fn resolve_link(&self, data: &SpanData) -> String {
        match data.link_type.as_deref() {
            Some("Document") => match (data.doc_type.as_deref(), data.uid.as_deref()) {
                (Some(doc_type), Some(uid)) if doc_type == self.document_type => {
                    post_path(&self.root, uid)
                }
                _ => self.root.clone(),
            },
            _ => data.url.clone().unwrap_or_default(),
        }
    }

    fn open_tag(&self, span: &Span) -> String {
        let data = span.data.clone().unwrap_or_default();
        match span.kind {
            SpanKind::Strong => "<strong>".to_string(),
            SpanKind::Em => "<em>".to_string(),
            SpanKind::Label => format!(
                r#"<span class="{}">"#,
                escape_html(data.label.as_deref().unwrap_or_default())
            ),
            SpanKind::Hyperlink => {
                let href = escape_html(&self.resolve_link(&data));
                match data.target.as_deref() {
                    Some(target) => format!(
                        r#"<a target="{}" rel="noopener" href="{}">"#,
                        escape_html(target),
                        href
                    ),
                    None => format!(r#"<a href="{}">"#, href),
                }
            }
            SpanKind::Unknown => String::new(),
        }
    }

    fn close_tag(span: &Span) -> &'static str {
        match span.kind {
            SpanKind::Strong => "</strong>",
            SpanKind::Em => "</em>",
            SpanKind::Label => "</span>",
            SpanKind::Hyperlink => "</a>",
            SpanKind::Unknown => "",
        }
    }

    /// Render text with its spans as well-formed nested markup
    fn serialize_spans(&self, text: &str, spans: &[Span]) -> String {
        let ranges: Vec<(usize, usize, &Span)> = spans
            .iter()
            .filter_map(|span| {
                let start = byte_offset(text, span.start);
                let end = byte_offset(text, span.end);
                (start < end).then_some((start, end, span))
            })
            .collect();

        let mut cuts = vec![0, text.len()];
        for (start, end, _) in &ranges {
            cuts.push(*start);
            cuts.push(*end);
        }
        cuts.sort_unstable();
        cuts.dedup();

        let mut output = String::with_capacity(text.len());
        let mut open: Vec<usize> = Vec::new();

        for window in cuts.windows(2) {
            let (from, to) = (window[0], window[1]);

            // Outer spans first: earlier start, then longer range
            let mut active: Vec<usize> = (0..ranges.len())
                .filter(|&i| ranges[i].0 <= from && ranges[i].1 >= to)
                .collect();
            active.sort_by(|&a, &b| {
                ranges[a]
                    .0
                    .cmp(&ranges[b].0)
                    .then(ranges[b].1.cmp(&ranges[a].1))
                    .then(a.cmp(&b))
            });

            let keep = open
                .iter()
                .zip(&active)
                .take_while(|(opened, wanted)| opened == wanted)
                .count();
            for i in open.drain(keep..).rev() {
                output.push_str(Self::close_tag(ranges[i].2));
            }
            for &i in &active[keep..] {
                output.push_str(&self.open_tag(ranges[i].2));
                open.push(i);
            }

            output.push_str(&escape_text(&text[from..to]));
        }

        for i in open.into_iter().rev() {
            output.push_str(Self::close_tag(ranges[i].2));
        }

        output
    }
}

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self::new("/", "posts")
    }
}

impl BlockSerializer for HtmlSerializer {
    fn serialize(&self, block: &RichTextBlock) -> String {
        let inner = || self.serialize_spans(block.plain_text(), &block.spans);
        match block.kind {
            BlockKind::Heading1 => format!("<h1>{}</h1>", inner()),
            BlockKind::Heading2 => format!("<h2>{}</h2>", inner()),
            BlockKind::Heading3 => format!("<h3>{}</h3>", inner()),
            BlockKind::Heading4 => format!("<h4>{}</h4>", inner()),
            BlockKind::Heading5 => format!("<h5>{}</h5>", inner()),
            BlockKind::Heading6 => format!("<h6>{}</h6>", inner()),
            BlockKind::Paragraph => format!("<p>{}</p>", inner()),
            BlockKind::Preformatted => format!("<pre>{}</pre>", inner()),
            BlockKind::ListItem => format!("<ul><li>{}</li></ul>", inner()),
            BlockKind::OrderedListItem => format!("<ol><li>{}</li></ol>", inner()),
            BlockKind::Image => format!(
                r#"<p class="block-img"><img src="{}" alt="{}" /></p>"#,
                escape_html(block.url.as_deref().unwrap_or_default()),
                escape_html(block.alt.as_deref().unwrap_or_default())
            ),
            BlockKind::Embed => {
                let embed = block.oembed.clone().unwrap_or_default();
                format!(
                    r#"<div data-oembed="{}" data-oembed-type="{}" data-oembed-provider="{}">{}</div>"#,
                    escape_html(embed.embed_url.as_deref().unwrap_or_default()),
                    escape_html(embed.embed_type.as_deref().unwrap_or_default()),
                    escape_html(embed.provider_name.as_deref().unwrap_or_default()),
                    embed.html.unwrap_or_default()
                )
            }
            BlockKind::Unknown => String::new(),
        }
    }
}

/// A section rendered to markup, keyed by its position in the post
#[derive(Debug, Clone, Serialize)]
pub struct RenderedSection {
    pub key: usize,
    pub heading: String,
    pub html: String,
}

/// Renders post sections in order, one serializer call per body block
pub struct RichTextRenderer<S = HtmlSerializer> {
    serializer: S,
}

impl<S: BlockSerializer> RichTextRenderer<S> {
    pub fn new(serializer: S) -> Self {
        Self { serializer }
    }

    /// Heading element followed by every body block, in order
    ///
    /// The heading is inserted as-is: content from the repository is trusted.
    pub fn render_section(&self, section: &PostSection) -> String {
        section.body.iter().fold(
            format!("<h2>{}</h2>", section.heading),
            |mut html, block| {
                html.push_str(&self.serializer.serialize(block));
                html
            },
        )
    }

    pub fn render(&self, sections: &[PostSection]) -> Vec<RenderedSection> {
        sections
            .iter()
            .enumerate()
            .map(|(key, section)| RenderedSection {
                key,
                heading: section.heading.clone(),
                html: self.render_section(section),
            })
            .collect()
    }
}

/// Convert a UTF-16 offset into a byte offset on a char boundary
fn byte_offset(text: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (index, c) in text.char_indices() {
        if units >= utf16_offset {
            return index;
        }
        units += c.len_utf16();
    }
    text.len()
}

/// Escape text content, turning line breaks into `<br />`
fn escape_text(s: &str) -> String {
    escape_html(s).replace('\n', "<br />")
}

/// Simple HTML escaping
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn span(start: usize, end: usize, kind: SpanKind) -> Span {
        Span {
            start,
            end,
            kind,
            data: None,
        }
    }

    fn block(kind: BlockKind, text: &str, spans: Vec<Span>) -> RichTextBlock {
        RichTextBlock {
            kind,
            text: Some(text.to_string()),
            spans,
            ..RichTextBlock::default()
        }
    }

    #[test]
    fn test_serialize_block_kinds() {
        let html = HtmlSerializer::default();
        assert_eq!(
            html.serialize(&RichTextBlock::paragraph("Hello")),
            "<p>Hello</p>"
        );
        assert_eq!(
            html.serialize(&block(BlockKind::Heading3, "Title", vec![])),
            "<h3>Title</h3>"
        );
        assert_eq!(
            html.serialize(&block(BlockKind::ListItem, "one", vec![])),
            "<ul><li>one</li></ul>"
        );
        assert_eq!(
            html.serialize(&block(BlockKind::OrderedListItem, "first", vec![])),
            "<ol><li>first</li></ol>"
        );
        assert_eq!(
            html.serialize(&block(BlockKind::Preformatted, "a\nb", vec![])),
            "<pre>a<br />b</pre>"
        );
        assert_eq!(
            html.serialize(&block(BlockKind::Unknown, "ignored", vec![])),
            ""
        );
    }

    #[test]
    fn test_serialize_image_and_embed() {
        let html = HtmlSerializer::default();
        let image = RichTextBlock {
            kind: BlockKind::Image,
            url: Some("https://images.example/a.png".to_string()),
            alt: Some("A \"quoted\" alt".to_string()),
            ..RichTextBlock::default()
        };
        assert_eq!(
            html.serialize(&image),
            r#"<p class="block-img"><img src="https://images.example/a.png" alt="A &quot;quoted&quot; alt" /></p>"#
        );

        let embed = RichTextBlock {
            kind: BlockKind::Embed,
            oembed: Some(Embed {
                html: Some("<iframe></iframe>".to_string()),
                embed_url: Some("https://video.example/1".to_string()),
                embed_type: Some("video".to_string()),
                provider_name: Some("Video".to_string()),
            }),
            ..RichTextBlock::default()
        };
        assert_eq!(
            html.serialize(&embed),
            r#"<div data-oembed="https://video.example/1" data-oembed-type="video" data-oembed-provider="Video"><iframe></iframe></div>"#
        );
    }

    #[test]
    fn test_escapes_text() {
        let html = HtmlSerializer::default();
        assert_eq!(
            html.serialize(&RichTextBlock::paragraph("a < b & c")),
            "<p>a &lt; b &amp; c</p>"
        );
    }

    #[test]
    fn test_spans_nested_and_overlapping() {
        let html = HtmlSerializer::default();

        let nested = block(
            BlockKind::Paragraph,
            "bold and italic",
            vec![span(0, 15, SpanKind::Strong), span(9, 15, SpanKind::Em)],
        );
        assert_eq!(
            html.serialize(&nested),
            "<p><strong>bold and <em>italic</em></strong></p>"
        );

        let overlapping = block(
            BlockKind::Paragraph,
            "abcdef",
            vec![span(0, 4, SpanKind::Strong), span(2, 6, SpanKind::Em)],
        );
        assert_eq!(
            html.serialize(&overlapping),
            "<p><strong>ab<em>cd</em></strong><em>ef</em></p>"
        );
    }

    #[test]
    fn test_span_offsets_are_utf16() {
        let html = HtmlSerializer::default();
        // "🚀" is two UTF-16 units, "ção" three
        let text = "🚀 ação";
        let paragraph = block(BlockKind::Paragraph, text, vec![span(3, 7, SpanKind::Em)]);
        assert_eq!(html.serialize(&paragraph), "<p>🚀 <em>ação</em></p>");
    }

    #[test]
    fn test_hyperlinks() {
        let html = HtmlSerializer::new("/blog/", "posts");

        let mut web = span(0, 4, SpanKind::Hyperlink);
        web.data = Some(SpanData {
            link_type: Some("Web".to_string()),
            url: Some("https://rust-lang.org".to_string()),
            target: Some("_blank".to_string()),
            ..SpanData::default()
        });
        assert_eq!(
            html.serialize(&block(BlockKind::Paragraph, "Rust site", vec![web])),
            r#"<p><a target="_blank" rel="noopener" href="https://rust-lang.org">Rust</a> site</p>"#
        );

        let mut document = span(0, 4, SpanKind::Hyperlink);
        document.data = Some(SpanData {
            link_type: Some("Document".to_string()),
            uid: Some("como-utilizar-hooks".to_string()),
            doc_type: Some("posts".to_string()),
            ..SpanData::default()
        });
        assert_eq!(
            html.serialize(&block(BlockKind::Paragraph, "next", vec![document])),
            r#"<p><a href="/blog/post/como-utilizar-hooks/">next</a></p>"#
        );
    }

    #[test]
    fn test_label_span() {
        let html = HtmlSerializer::default();
        let mut label = span(0, 3, SpanKind::Label);
        label.data = Some(SpanData {
            label: Some("codigo".to_string()),
            ..SpanData::default()
        });
        assert_eq!(
            html.serialize(&block(BlockKind::Paragraph, "npm", vec![label])),
            r#"<p><span class="codigo">npm</span></p>"#
        );
    }

    struct Recording {
        calls: RefCell<Vec<String>>,
    }

    impl BlockSerializer for Recording {
        fn serialize(&self, block: &RichTextBlock) -> String {
            self.calls.borrow_mut().push(block.plain_text().to_string());
            format!("[{}]", block.plain_text())
        }
    }

    #[test]
    fn test_one_call_per_block_in_order() {
        let sections = vec![
            PostSection {
                heading: "A".to_string(),
                body: vec![RichTextBlock::paragraph("a1"), RichTextBlock::paragraph("a2")],
            },
            PostSection {
                heading: "B".to_string(),
                body: vec![RichTextBlock::paragraph("b1")],
            },
        ];

        let renderer = RichTextRenderer::new(Recording {
            calls: RefCell::new(Vec::new()),
        });
        let rendered = renderer.render(&sections);

        assert_eq!(*renderer.serializer.calls.borrow(), vec!["a1", "a2", "b1"]);
        assert_eq!(rendered[0].key, 0);
        assert_eq!(rendered[0].html, "<h2>A</h2>[a1][a2]");
        assert_eq!(rendered[1].key, 1);
        assert_eq!(rendered[1].html, "<h2>B</h2>[b1]");
    }

    #[test]
    fn test_section_order_preserved() {
        let sections = vec![
            PostSection {
                heading: "A".to_string(),
                body: vec![RichTextBlock::paragraph("alpha body")],
            },
            PostSection {
                heading: "B".to_string(),
                body: vec![RichTextBlock::paragraph("beta body")],
            },
        ];

        let renderer = RichTextRenderer::new(HtmlSerializer::default());
        let markup: String = renderer
            .render(&sections)
            .into_iter()
            .map(|s| s.html)
            .collect();

        let a_heading = markup.find("<h2>A</h2>").unwrap();
        let a_body = markup.find("alpha body").unwrap();
        let b_heading = markup.find("<h2>B</h2>").unwrap();
        let b_body = markup.find("beta body").unwrap();
        assert!(a_heading < a_body);
        assert!(a_body < b_heading);
        assert!(b_heading < b_body);
    }
}
