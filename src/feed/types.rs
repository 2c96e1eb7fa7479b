use chrono::{DateTime, Utc};

/// One audio file published as a feed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    /// Track title from the file's tags, or the file path when tags are unusable.
    pub title: String,
    /// File modification time.
    pub pub_date: DateTime<Utc>,
    /// Base URL with the percent-encoded file path appended.
    pub url: String,
    /// File length in bytes at the time it was read.
    pub size_bytes: u64,
}

/// A podcast channel and its episodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub title: String,
    pub description: String,
    pub episodes: Vec<Episode>,
}

impl Feed {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            episodes: Vec::new(),
        }
    }

    pub fn push(&mut self, episode: Episode) {
        self.episodes.push(episode);
    }

    /// Orders episodes oldest first.
    ///
    /// The sort is stable: episodes sharing a modification time keep their
    /// input order, so identical inputs always render identically.
    pub fn sort_by_date(&mut self) {
        self.episodes.sort_by_key(|e| e.pub_date);
    }
}
