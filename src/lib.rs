//! Build a podcast RSS feed from a set of local audio files.
//!
//! Each file becomes one episode: its title comes from embedded tags (or the
//! file path), its publish date from the modification time, and its URL from
//! the base URL with the file path appended.

pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod util;

pub use error::FeedError;
