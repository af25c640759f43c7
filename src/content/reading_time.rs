//! Reading time estimation

use super::post::PostSection;

/// Assumed reading speed
pub const WORDS_PER_MINUTE: usize = 200;

/// Words of a section: heading words followed by every body block's words
///
/// Splitting is on the single space character only, so an empty string
/// still yields one (empty) word and punctuation is never stripped.
pub fn section_words(section: &PostSection) -> usize {
    let heading_words = section.heading.split(' ').count();
    let body_words: usize = section
        .body
        .iter()
        .map(|block| block.plain_text().split(' ').count())
        .sum();
    heading_words + body_words
}

/// Minutes to read one section, rounded up
pub fn section_minutes(section: &PostSection) -> usize {
    section_words(section).div_ceil(WORDS_PER_MINUTE)
}

/// Total reading time: the sum of the rounded-up minutes of each section
pub fn estimate(sections: &[PostSection]) -> usize {
    sections.iter().map(section_minutes).sum()
}
