use clap::Parser;
use std::path::PathBuf;
use url::Url;

use crate::config::Config;
use crate::error::FeedError;
use crate::feed::{TagPolicy, UnreadablePolicy};
use crate::util::parse_base_url;

#[derive(Parser, Debug)]
#[command(
    name = "podfeed",
    version,
    about = "Generate a podcast RSS feed from local audio files",
    override_usage = "podfeed [OPTIONS] \"Feed Title\" \"Feed Description\" \"base URL\" <FILES>..."
)]
pub struct Args {
    /// Channel title
    pub title: String,

    /// Channel description
    pub description: String,

    /// URL that each file path is appended to
    pub base_url: String,

    /// Audio files to publish, one episode each
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Abort when a file's tags cannot be read instead of using its path as title
    #[arg(long)]
    pub strict_tags: bool,

    /// Leave out files that cannot be read instead of aborting
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Write the feed to FILE instead of standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Config file (default: ~/.config/podfeed/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log per-file progress to standard error
    #[arg(short, long)]
    pub verbose: bool,
}

/// Validated inputs for one feed generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub title: String,
    pub description: String,
    pub base_url: Url,
    pub files: Vec<PathBuf>,
}

impl Args {
    /// Parses the base URL and bundles the positional arguments.
    pub fn resolve(&self) -> Result<FeedRequest, FeedError> {
        Ok(FeedRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            base_url: parse_base_url(&self.base_url)?,
            files: self.files.clone(),
        })
    }

    /// Applies command-line flags on top of file configuration.
    pub fn apply_to(&self, mut config: Config) -> Config {
        if self.strict_tags {
            config.tag_policy = TagPolicy::Strict;
        }
        if self.skip_unreadable {
            config.on_unreadable = UnreadablePolicy::Skip;
        }
        config
    }
}
