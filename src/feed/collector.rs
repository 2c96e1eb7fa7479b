use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use url::Url;

use super::tags::TagReader;
use super::types::Episode;
use crate::error::FeedError;
use crate::util::episode_url;

/// What to do when a file's tags cannot produce a title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagPolicy {
    /// Log a warning and use the file path as the title.
    #[default]
    Permissive,
    /// Abort the run.
    Strict,
}

/// What to do when a file cannot be stat'ed or opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnreadablePolicy {
    /// Abort the run; no feed is emitted.
    #[default]
    Abort,
    /// Log a warning and leave the file out of the feed.
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectPolicy {
    pub tags: TagPolicy,
    pub unreadable: UnreadablePolicy,
}

/// Builds one [`Episode`] per input file, in input order.
///
/// For each path: stat, open, read the title through `tags`, and derive the
/// episode URL from a fresh copy of `base_url`. The file handle is dropped
/// before the next path is touched, on success and on every error path.
///
/// # Errors
///
/// - [`FeedError::Stat`] / [`FeedError::Open`] under [`UnreadablePolicy::Abort`]
/// - [`FeedError::Tags`] under [`TagPolicy::Strict`]
pub fn collect_episodes<P: AsRef<Path>>(
    paths: &[P],
    base_url: &Url,
    tags: &dyn TagReader,
    policy: CollectPolicy,
) -> Result<Vec<Episode>, FeedError> {
    let mut episodes = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        match collect_one(path, base_url, tags, policy.tags) {
            Ok(episode) => {
                tracing::debug!(
                    path = %path.display(),
                    title = %episode.title,
                    size = episode.size_bytes,
                    "Collected episode"
                );
                episodes.push(episode);
            }
            Err(e @ (FeedError::Stat { .. } | FeedError::Open { .. }))
                if policy.unreadable == UnreadablePolicy::Skip =>
            {
                tracing::warn!(error = %e, "Skipping unreadable file");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(episodes)
}

fn collect_one(
    path: &Path,
    base_url: &Url,
    tags: &dyn TagReader,
    tag_policy: TagPolicy,
) -> Result<Episode, FeedError> {
    let stat_err = |source| FeedError::Stat {
        path: path.to_path_buf(),
        source,
    };
    let metadata = std::fs::metadata(path).map_err(stat_err)?;
    let modified = metadata.modified().map_err(stat_err)?;

    let mut file = File::open(path).map_err(|source| FeedError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let path_str = path.to_string_lossy();
    let title = match tags.read_title(&mut file) {
        Ok(title) => title,
        Err(source) => match tag_policy {
            TagPolicy::Permissive => {
                tracing::warn!(
                    path = %path.display(),
                    error = %source,
                    "Error loading tags, falling back to filename for title"
                );
                path_str.to_string()
            }
            TagPolicy::Strict => {
                return Err(FeedError::Tags {
                    path: path.to_path_buf(),
                    source,
                })
            }
        },
    };
    drop(file);

    Ok(Episode {
        title,
        pub_date: DateTime::<Utc>::from(modified),
        url: episode_url(base_url, &path_str),
        size_bytes: metadata.len(),
    })
}
