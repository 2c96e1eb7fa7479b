//! Feed assembly: from audio files on disk to an RSS 2.0 document.
//!
//! The pipeline runs strictly one way:
//!
//! - `collector` - stat and open each file, read its title, build an [`Episode`]
//! - `types` - the [`Feed`] that owns the episodes and orders them by date
//! - `render` - serialize the feed with `quick-xml`
//!
//! Title extraction sits behind the [`TagReader`] trait in `tags`; the
//! shipped implementation sniffs the container and reads FLAC Vorbis
//! comments or ID3v2 tags.
//!
//! # Example
//!
//! ```ignore
//! use podfeed::feed::{collect_episodes, render_rss, CollectPolicy, Feed, AudioTagReader};
//!
//! let mut feed = Feed::new("My Show", "A show about things");
//! feed.episodes = collect_episodes(&files, &base_url, &AudioTagReader, CollectPolicy::default())?;
//! feed.sort_by_date();
//! let xml = render_rss(&feed, "audio/mpeg")?;
//! ```

mod collector;
mod render;
mod tags;
mod types;

pub use collector::{collect_episodes, CollectPolicy, TagPolicy, UnreadablePolicy};
pub use render::{export_to_file, format_pub_date, render_rss, write_feed, DEFAULT_MIME_TYPE};
pub use tags::{AudioTagReader, TagError, TagReader};
pub use types::{Episode, Feed};
