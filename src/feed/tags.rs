use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use thiserror::Error;

/// Errors that can occur while reading a title from embedded audio tags.
#[derive(Debug, Error)]
pub enum TagError {
    /// The ID3 tag block is missing or could not be decoded.
    #[error("{0}")]
    Id3(#[from] id3::Error),

    /// The file ended before its metadata did.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// FLAC metadata blocks are present but inconsistent.
    #[error("malformed FLAC metadata: {0}")]
    Flac(&'static str),

    /// Tags were read but carry no usable title.
    #[error("no title frame")]
    MissingTitle,
}

/// Extracts a track title from an open audio file.
///
/// Implementations receive the file positioned at its start and may seek
/// freely. The caller owns the handle and closes it afterwards.
pub trait TagReader {
    fn read_title(&self, file: &mut File) -> Result<String, TagError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AudioFormat {
    Flac,
    Mp3,
}

/// Detects the container from the first bytes of a file.
///
/// | Format | Magic bytes |
/// |--------|-------------|
/// | FLAC   | `fLaC` |
/// | MP3    | `ID3`, or an MPEG sync word (0xFF, top 3 bits of the next byte set) |
fn detect_format(header: &[u8]) -> Option<AudioFormat> {
    if header.starts_with(b"fLaC") {
        return Some(AudioFormat::Flac);
    }
    if header.starts_with(b"ID3") {
        return Some(AudioFormat::Mp3);
    }
    match header {
        [0xFF, b, ..] if b & 0xE0 == 0xE0 => Some(AudioFormat::Mp3),
        _ => None,
    }
}

/// Reads the title of FLAC files from their Vorbis comment block and of
/// everything else from the `TIT2` frame of an ID3v2 tag.
#[derive(Debug, Default, Clone, Copy)]
pub struct AudioTagReader;

impl TagReader for AudioTagReader {
    fn read_title(&self, file: &mut File) -> Result<String, TagError> {
        let mut header = Vec::with_capacity(4);
        file.by_ref().take(4).read_to_end(&mut header)?;
        file.seek(SeekFrom::Start(0))?;

        let title = match detect_format(&header) {
            Some(AudioFormat::Flac) => read_flac_title(file)?,
            Some(AudioFormat::Mp3) | None => {
                use id3::TagLike;
                id3::Tag::read_from2(&mut *file)?.title().map(str::to_owned)
            }
        };

        match title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => Ok(title.to_string()),
            _ => Err(TagError::MissingTitle),
        }
    }
}

// ============================================================================
// FLAC
// ============================================================================

const FLAC_VORBIS_COMMENT: u8 = 4;

/// Walks the metadata blocks after the `fLaC` marker until the Vorbis
/// comment block, then returns its first `TITLE` entry.
///
/// Block header layout:
/// ```text
/// [0]     bit 7 = last block, bits 0..7 = block type
/// [1..4]  block length, u24 be
/// ```
fn read_flac_title(file: &mut File) -> Result<Option<String>, TagError> {
    file.seek(SeekFrom::Start(4))?;

    loop {
        let mut header = [0u8; 4];
        file.read_exact(&mut header)?;
        let [flags, len @ ..] = header;
        let len = u32::from_be_bytes([0, len[0], len[1], len[2]]);

        if flags & 0x7F == FLAC_VORBIS_COMMENT {
            let mut block = vec![0u8; len as usize];
            file.read_exact(&mut block)?;
            return vorbis_title(&block);
        }
        if flags & 0x80 != 0 {
            return Ok(None);
        }
        file.seek(SeekFrom::Current(i64::from(len)))?;
    }
}

/// Comment block layout, all lengths u32 le:
/// ```text
/// vendor_len, vendor, count, count x (len, "KEY=value")
/// ```
fn vorbis_title(mut block: &[u8]) -> Result<Option<String>, TagError> {
    let vendor_len = take_len(&mut block)?;
    take(&mut block, vendor_len)?;

    let count = take_len(&mut block)?;
    for _ in 0..count {
        let len = take_len(&mut block)?;
        let entry = String::from_utf8_lossy(take(&mut block, len)?);
        if let Some((key, value)) = entry.split_once('=') {
            if key.eq_ignore_ascii_case("TITLE") {
                return Ok(Some(value.to_string()));
            }
        }
    }
    Ok(None)
}

fn take<'a>(buf: &mut &'a [u8], n: usize) -> Result<&'a [u8], TagError> {
    if buf.len() < n {
        return Err(TagError::Flac("vorbis comment runs past its block"));
    }
    let (head, tail) = buf.split_at(n);
    *buf = tail;
    Ok(head)
}

fn take_len(buf: &mut &[u8]) -> Result<usize, TagError> {
    let bytes = <[u8; 4]>::try_from(take(buf, 4)?)
        .map_err(|_| TagError::Flac("vorbis comment runs past its block"))?;
    Ok(u32::from_le_bytes(bytes) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use id3::{TagLike, Version};
    use std::io::Write;

    /// `fLaC`, an empty STREAMINFO, then a final Vorbis comment block.
    fn flac_bytes(comments: &[&str]) -> Vec<u8> {
        let mut block = Vec::new();
        let vendor = b"reference libFLAC 1.4.3";
        block.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
        block.extend_from_slice(vendor);
        block.extend_from_slice(&(comments.len() as u32).to_le_bytes());
        for comment in comments {
            block.extend_from_slice(&(comment.len() as u32).to_le_bytes());
            block.extend_from_slice(comment.as_bytes());
        }

        let mut out = b"fLaC".to_vec();
        out.extend_from_slice(&[0x00, 0x00, 0x00, 34]);
        out.extend_from_slice(&[0u8; 34]);
        let len = (block.len() as u32).to_be_bytes();
        out.extend_from_slice(&[0x80 | FLAC_VORBIS_COMMENT, len[1], len[2], len[3]]);
        out.extend_from_slice(&block);
        out
    }

    fn read(name: &str, bytes: &[u8]) -> Result<String, TagError> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        let mut file = File::open(&path).unwrap();
        AudioTagReader.read_title(&mut file)
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(b"fLaC\0\0"), Some(AudioFormat::Flac));
        assert_eq!(detect_format(b"ID3\x04"), Some(AudioFormat::Mp3));
        assert_eq!(detect_format(&[0xFF, 0xFB, 0x90, 0x00]), Some(AudioFormat::Mp3));
        assert_eq!(detect_format(&[0xFF, 0x00]), None);
        assert_eq!(detect_format(b"RIFF"), None);
        assert_eq!(detect_format(b""), None);
    }

    #[test]
    fn test_reads_title_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagged.mp3");

        let mut tag = id3::Tag::new();
        tag.set_title("Episode One");
        let mut file = File::create(&path).unwrap();
        tag.write_to(&mut file, Version::Id3v24).unwrap();
        file.write_all(&[0xFF, 0xFB, 0x90, 0x00]).unwrap();
        drop(file);

        let mut file = File::open(&path).unwrap();
        let title = AudioTagReader.read_title(&mut file).unwrap();
        assert_eq!(title, "Episode One");
    }

    #[test]
    fn test_untagged_file_is_error() {
        let err = read("plain.mp3", b"not really audio").unwrap_err();
        assert!(matches!(err, TagError::Id3(_)));
    }

    #[test]
    fn test_empty_file_is_error() {
        assert!(read("empty.mp3", b"").is_err());
    }

    #[test]
    fn test_blank_title_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.mp3");

        let mut tag = id3::Tag::new();
        tag.set_title("   ");
        tag.set_artist("Someone");
        let mut file = File::create(&path).unwrap();
        tag.write_to(&mut file, Version::Id3v24).unwrap();
        drop(file);

        let mut file = File::open(&path).unwrap();
        let err = AudioTagReader.read_title(&mut file).unwrap_err();
        assert!(matches!(err, TagError::MissingTitle));
    }

    #[test]
    fn test_tag_without_title_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artist_only.mp3");

        let mut tag = id3::Tag::new();
        tag.set_artist("Someone");
        let mut file = File::create(&path).unwrap();
        tag.write_to(&mut file, Version::Id3v24).unwrap();
        drop(file);

        let mut file = File::open(&path).unwrap();
        let err = AudioTagReader.read_title(&mut file).unwrap_err();
        assert!(matches!(err, TagError::MissingTitle));
    }

    #[test]
    fn test_reads_flac_title() {
        let bytes = flac_bytes(&["ARTIST=Someone", "TITLE=Episode Two"]);
        assert_eq!(read("two.flac", &bytes).unwrap(), "Episode Two");
    }

    #[test]
    fn test_flac_title_key_is_case_insensitive() {
        let bytes = flac_bytes(&["title=Lower Case"]);
        assert_eq!(read("lower.flac", &bytes).unwrap(), "Lower Case");
    }

    #[test]
    fn test_flac_detected_by_content_not_extension() {
        let bytes = flac_bytes(&["TITLE=Misnamed"]);
        assert_eq!(read("misnamed.mp3", &bytes).unwrap(), "Misnamed");
    }

    #[test]
    fn test_flac_without_title_is_missing() {
        let bytes = flac_bytes(&["ARTIST=Someone"]);
        let err = read("artist_only.flac", &bytes).unwrap_err();
        assert!(matches!(err, TagError::MissingTitle));
    }

    #[test]
    fn test_flac_without_comment_block_is_missing() {
        let mut bytes = b"fLaC".to_vec();
        bytes.extend_from_slice(&[0x80, 0x00, 0x00, 34]);
        bytes.extend_from_slice(&[0u8; 34]);

        let err = read("bare.flac", &bytes).unwrap_err();
        assert!(matches!(err, TagError::MissingTitle));
    }

    #[test]
    fn test_truncated_flac_is_io_error() {
        let bytes = flac_bytes(&["TITLE=Cut"]);
        let err = read("cut.flac", &bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, TagError::Io(_)));
    }

    #[test]
    fn test_flac_comment_count_past_block_is_malformed() {
        let mut bytes = flac_bytes(&["ARTIST=Someone"]);
        // comment count sits right after the 4-byte vendor length and vendor
        let count_at = 4 + 4 + 34 + 4 + 4 + "reference libFLAC 1.4.3".len();
        bytes[count_at] = 9;

        let err = read("count.flac", &bytes).unwrap_err();
        assert!(matches!(err, TagError::Flac(_)));
    }
}
