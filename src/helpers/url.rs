//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Join a path onto the site root
///
/// # Examples
/// ```ignore
/// join_root("/blog/", "/post/a/") // -> "/blog/post/a/"
/// ```
pub fn join_root(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Prefix a root-relative path with the site URL
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/blog/post/a/") // -> "https://example.com/blog/post/a/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}/{}", base, path.trim_start_matches('/'))
}

/// Path of a post page
pub fn post_path(root: &str, uid: &str) -> String {
    join_root(root, &format!("post/{}/", encode_segment(uid)))
}

/// Path of the listing after `step` pages have been loaded
///
/// Step 1 is the home page itself.
pub fn listing_path(root: &str, step: usize) -> String {
    if step <= 1 {
        join_root(root, "")
    } else {
        join_root(root, &format!("more/{}/", step))
    }
}

/// Encode a value for use as one path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}
