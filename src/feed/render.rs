use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Cursor, Write};
use std::path::Path;

use super::types::{Episode, Feed};
use crate::error::FeedError;

/// MIME type advertised on every enclosure unless configured otherwise.
pub const DEFAULT_MIME_TYPE: &str = "audio/mpeg";

/// RFC 1123 with a numeric zone, e.g. `Mon, 02 Jan 2006 15:04:05 -0700`.
const PUB_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Formats a publish date the way podcast clients expect in `<pubDate>`.
pub fn format_pub_date(date: &DateTime<Utc>) -> String {
    date.format(PUB_DATE_FORMAT).to_string()
}

/// Renders `feed` as an RSS 2.0 document.
///
/// Episodes are emitted in the order they appear in `feed`; callers sort
/// first with [`Feed::sort_by_date`]. Text and attribute values are escaped,
/// so the output is well-formed for any titles and URLs.
pub fn render_rss(feed: &Feed, mime_type: &str) -> Result<String, FeedError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(render_err)?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss)).map_err(render_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("channel")))
        .map_err(render_err)?;

    write_text_element(&mut writer, "title", &feed.title)?;
    write_text_element(&mut writer, "description", &feed.description)?;

    for episode in &feed.episodes {
        write_item(&mut writer, episode, mime_type)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("channel")))
        .map_err(render_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("rss")))
        .map_err(render_err)?;

    let mut bytes = writer.into_inner().into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(render_err)
}

fn write_item(
    writer: &mut XmlWriter,
    episode: &Episode,
    mime_type: &str,
) -> Result<(), FeedError> {
    let url = episode.url.as_str();
    let length = episode.size_bytes.to_string();

    writer
        .write_event(Event::Start(BytesStart::new("item")))
        .map_err(render_err)?;

    write_text_element(writer, "title", &episode.title)?;
    write_text_element(writer, "pubDate", &format_pub_date(&episode.pub_date))?;

    let mut enclosure = BytesStart::new("enclosure");
    enclosure.push_attribute(("url", url));
    enclosure.push_attribute(("length", length.as_str()));
    enclosure.push_attribute(("type", mime_type));
    writer
        .write_event(Event::Empty(enclosure))
        .map_err(render_err)?;

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "false"));
    writer.write_event(Event::Start(guid)).map_err(render_err)?;
    writer
        .write_event(Event::Text(BytesText::new(url)))
        .map_err(render_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("guid")))
        .map_err(render_err)?;

    writer
        .write_event(Event::End(BytesEnd::new("item")))
        .map_err(render_err)?;
    Ok(())
}

fn write_text_element(
    writer: &mut XmlWriter,
    name: &str,
    text: &str,
) -> Result<(), FeedError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(render_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(render_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(render_err)?;
    Ok(())
}

fn render_err(e: impl std::fmt::Display) -> FeedError {
    FeedError::Render(e.to_string())
}

/// Renders `feed` and writes it to `out`, flushing before returning.
pub fn write_feed<W: Write>(feed: &Feed, mime_type: &str, mut out: W) -> Result<(), FeedError> {
    let xml = render_rss(feed, mime_type)?;
    out.write_all(xml.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Renders `feed` into a file atomically.
///
/// The document is written to a randomly named sibling, synced to disk, then
/// renamed over `path`. A failure at any step leaves `path` untouched.
pub fn export_to_file(feed: &Feed, mime_type: &str, path: &Path) -> Result<(), FeedError> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let xml = render_rss(feed, mime_type)?;

    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("tmp.{:016x}", random_suffix));

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)?;

    let written = file
        .write_all(xml.as_bytes())
        .and_then(|()| file.sync_all());
    drop(file);

    if let Err(e) = written.and_then(|()| std::fs::rename(&temp_path, path)) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(FeedError::Write(e));
    }

    tracing::debug!(path = %path.display(), bytes = xml.len(), "Wrote feed file");
    Ok(())
}
