//! Fixture helpers shared by the integration tests.

#![allow(dead_code)]

use id3::{TagLike, Version};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// 2020-01-01T00:00:00Z
pub const JAN_1_2020: u64 = 1_577_836_800;
/// 2020-01-02T00:00:00Z
pub const JAN_2_2020: u64 = 1_577_923_200;

pub fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Writes an ID3v2-tagged file padded to `size` bytes with the given mtime.
///
/// Panics if `size` is smaller than the encoded tag, since truncating would
/// silently turn the fixture into an untagged file.
pub fn tagged_mp3(dir: &Path, name: &str, title: &str, size: u64, mtime: SystemTime) -> PathBuf {
    let path = dir.join(name);
    let mut tag = id3::Tag::new();
    tag.set_title(title);
    let file = File::create(&path).unwrap();
    tag.write_to(&file, Version::Id3v24).unwrap();
    let tag_len = file.metadata().unwrap().len();
    assert!(
        size >= tag_len,
        "{} bytes cannot hold the {}-byte tag for {:?}",
        size,
        tag_len,
        title
    );
    file.set_len(size).unwrap();
    file.set_modified(mtime).unwrap();
    path
}

/// Writes a file with no tags at all.
pub fn untagged_mp3(dir: &Path, name: &str, size: u64, mtime: SystemTime) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    file.set_len(size).unwrap();
    file.set_modified(mtime).unwrap();
    path
}
