//! Utility functions for common operations.
//!
//! - **URL joining**: base URL parsing and per-episode URL derivation
//!
//! # Examples
//!
//! ```
//! use podfeed::util::{episode_url, parse_base_url};
//!
//! let base = parse_base_url("https://cdn.example.com/ep").unwrap();
//! let url = episode_url(&base, "a.mp3");
//! assert_eq!(url.as_str(), "https://cdn.example.com/ep/a.mp3");
//! ```

mod url_join;

pub use url_join::{episode_url, parse_base_url};
