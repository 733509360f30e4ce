//! core/tags/v1.rs
//! ID3v1.1 trailer: the legacy 128 bytes at the end of an MPEG stream.
//!
//! Layout:
//! ```text
//! "TAG" title[30] artist[30] album[30] year[4] comment[28] 0x00 track genre
//! ```
//! Text is Latin-1 (Windows-1252), NUL padded, silently truncated.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use encoding_rs::WINDOWS_1252;

use super::fingerprint::TagFields;
use super::util::parse_slash_pair_u32;

const TAG_SIZE: usize = 128;
const TAG_ID: &[u8; 3] = b"TAG";

/// Winamp extension genre index for "Podcast".
pub const GENRE_PODCAST: u8 = 186;

/// What an ID3v1 trailer holds once decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct V1Tag {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub comment: String,
    pub track: Option<u8>,
    pub genre: u8,
}

impl V1Tag {
    pub fn from_fields(fields: &TagFields) -> Self {
        let (track, _) = parse_slash_pair_u32(Some(&fields.track));

        Self {
            title: fields.title.clone(),
            artist: fields.artist.clone(),
            album: fields.album.clone(),
            year: fields.year.clone(),
            comment: fields.comment.clone(),
            track: track.and_then(|t| u8::try_from(t).ok()).filter(|t| *t > 0),
            genre: GENRE_PODCAST,
        }
    }

    fn to_bytes(&self) -> [u8; TAG_SIZE] {
        let mut buf = [0u8; TAG_SIZE];
        buf[0..3].copy_from_slice(TAG_ID);
        put_latin1(&mut buf[3..33], &self.title);
        put_latin1(&mut buf[33..63], &self.artist);
        put_latin1(&mut buf[63..93], &self.album);
        put_latin1(&mut buf[93..97], &self.year);

        match self.track {
            Some(track) => {
                put_latin1(&mut buf[97..125], &self.comment);
                buf[125] = 0;
                buf[126] = track;
            }
            None => put_latin1(&mut buf[97..127], &self.comment),
        }

        buf[127] = self.genre;
        buf
    }

    fn parse(buf: &[u8; TAG_SIZE]) -> Self {
        let (comment, track) = if buf[125] == 0 && buf[126] != 0 {
            (get_latin1(&buf[97..125]), Some(buf[126]))
        } else {
            (get_latin1(&buf[97..127]), None)
        };

        Self {
            title: get_latin1(&buf[3..33]),
            artist: get_latin1(&buf[33..63]),
            album: get_latin1(&buf[63..93]),
            year: get_latin1(&buf[93..97]),
            comment,
            track,
            genre: buf[127],
        }
    }
}

/// Write (or replace) the trailer of `path`.
pub fn write_to_path(path: &Path, tag: &V1Tag) -> std::io::Result<()> {
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;

    if has_trailer(&mut file)? {
        file.seek(SeekFrom::End(-(TAG_SIZE as i64)))?;
    } else {
        file.seek(SeekFrom::End(0))?;
    }

    file.write_all(&tag.to_bytes())?;
    file.flush()
}

/// Read the trailer of `path`, if there is one.
pub fn read_from_path(path: &Path) -> std::io::Result<Option<V1Tag>> {
    let mut file = File::open(path)?;
    if !has_trailer(&mut file)? {
        return Ok(None);
    }

    file.seek(SeekFrom::End(-(TAG_SIZE as i64)))?;
    let mut buf = [0u8; TAG_SIZE];
    file.read_exact(&mut buf)?;
    Ok(Some(V1Tag::parse(&buf)))
}

fn has_trailer(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() < TAG_SIZE as u64 {
        return Ok(false);
    }

    file.seek(SeekFrom::End(-(TAG_SIZE as i64)))?;
    let mut id = [0u8; 3];
    file.read_exact(&mut id)?;
    Ok(&id == TAG_ID)
}

/// Encode char by char so unmappable characters become '?' and nothing is split.
fn put_latin1(dst: &mut [u8], s: &str) {
    let mut at = 0;
    let mut scratch = [0u8; 4];

    for ch in s.trim().chars() {
        if at >= dst.len() {
            break;
        }
        let (bytes, _, unmappable) = WINDOWS_1252.encode(ch.encode_utf8(&mut scratch));
        dst[at] = if unmappable || bytes.len() != 1 { b'?' } else { bytes[0] };
        at += 1;
    }
}

fn get_latin1(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    WINDOWS_1252.decode(&bytes[..end]).0.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fields() -> TagFields {
        TagFields {
            title: "Episode 1".into(),
            artist: "Ann".into(),
            album: "Show".into(),
            year: "2024".into(),
            track: "3".into(),
            comment: "A very long comment that will not fit into twenty-eight bytes".into(),
            image_path: String::new(),
        }
    }

    #[test]
    fn appends_then_replaces_trailer() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ep.mp3");
        std::fs::write(&path, vec![0xFFu8; 400]).unwrap();

        write_to_path(&path, &V1Tag::from_fields(&fields())).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 528);

        let mut changed = fields();
        changed.title = "Renamed".into();
        write_to_path(&path, &V1Tag::from_fields(&changed)).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 528);

        let tag = read_from_path(&path).unwrap().unwrap();
        assert_eq!(tag.title, "Renamed");
        assert_eq!(tag.artist, "Ann");
        assert_eq!(tag.year, "2024");
        assert_eq!(tag.track, Some(3));
        assert_eq!(tag.genre, GENRE_PODCAST);
        assert_eq!(tag.comment.len(), 28);
    }

    #[test]
    fn unmappable_chars_become_question_marks() {
        let mut buf = [0u8; 6];
        put_latin1(&mut buf, "Café ✓");
        assert_eq!(&buf, &[b'C', b'a', b'f', 0xE9, b' ', b'?']);
    }

    #[test]
    fn no_trailer_on_short_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tiny.mp3");
        std::fs::write(&path, b"abc").unwrap();
        assert_eq!(read_from_path(&path).unwrap(), None);
    }
}
