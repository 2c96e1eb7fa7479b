use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

use crate::error::FeedError;

/// Parses the base URL that episode paths are appended to.
///
/// Only absolute URLs are accepted; the base is never contacted, so no
/// scheme or host policy is applied beyond what [`Url::parse`] enforces.
///
/// # Examples
///
/// ```
/// use podfeed::util::parse_base_url;
///
/// let url = parse_base_url("https://cdn.example.com/ep").unwrap();
/// assert_eq!(url.path(), "/ep");
///
/// assert!(parse_base_url("not a url").is_err());
/// ```
pub fn parse_base_url(input: &str) -> Result<Url, FeedError> {
    Url::parse(input).map_err(|source| FeedError::InvalidBaseUrl {
        input: input.to_owned(),
        source,
    })
}

/// Characters escaped inside one path segment, beyond controls and non-ASCII.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Builds the public URL of one episode: `base` with `"/" + file_path`
/// appended to its path.
///
/// `base` is borrowed immutably, so calling this repeatedly with the same
/// base never accumulates segments from earlier calls. One trailing `/` on
/// the base path is dropped before joining, and the base query and fragment
/// are carried over.
///
/// Each `/`-separated segment of `file_path` is percent-encoded and the
/// result is never re-parsed: `.` and `..` segments stay in the URL as
/// `%2E` / `%2E%2E` instead of being resolved against the base path.
///
/// # Examples
///
/// ```
/// use podfeed::util::{episode_url, parse_base_url};
///
/// let base = parse_base_url("https://cdn.example.com/ep").unwrap();
/// assert_eq!(episode_url(&base, "a.mp3"), "https://cdn.example.com/ep/a.mp3");
/// assert_eq!(episode_url(&base, "100%.mp3"), "https://cdn.example.com/ep/100%25.mp3");
/// ```
pub fn episode_url(base: &Url, file_path: &str) -> String {
    let mut root = base.clone();
    root.set_query(None);
    root.set_fragment(None);

    let root = root.as_str();
    let mut url = root.strip_suffix('/').unwrap_or(root).to_string();
    for segment in file_path.split('/') {
        url.push('/');
        match segment {
            "." | ".." => url.push_str(&"%2E".repeat(segment.len())),
            _ => url.extend(utf8_percent_encode(segment, SEGMENT)),
        }
    }

    if let Some(query) = base.query() {
        url.push('?');
        url.push_str(query);
    }
    if let Some(fragment) = base.fragment() {
        url.push('#');
        url.push_str(fragment);
    }
    url
}
