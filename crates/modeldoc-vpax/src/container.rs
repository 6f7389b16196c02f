//! VPAX container handling
//!
//! A VPAX export is a ZIP archive; the model document lives in one JSON
//! member (usually `DaxModel.json`). Opening and reading are bounded by
//! entry-count and uncompressed-size limits.

use std::io::{Read, Seek};
use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use zip::result::ZipError;
use zip::ZipArchive;

/// Limits applied while reading the archive
#[derive(Debug, Clone, Copy)]
pub struct ContainerLimits {
    pub max_entries: usize,
    pub max_member_bytes: u64,
}

impl Default for ContainerLimits {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            max_member_bytes: 256 * 1024 * 1024,
        }
    }
}

/// Fatal input errors: a bad archive aborts the run
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a ZIP archive")]
    NotZipArchive,

    #[error("archive has too many entries: {entries} (limit: {limit})")]
    TooManyEntries { entries: usize, limit: usize },

    #[error("member '{member}' not found in archive")]
    MemberNotFound { member: String },

    #[error("member '{member}' is too large: {size} bytes (limit: {limit} bytes)")]
    MemberTooLarge { member: String, size: u64, limit: u64 },

    #[error("failed to read member '{member}': {reason}")]
    MemberRead { member: String, reason: String },

    #[error("member '{member}' has an unsupported text encoding: {reason}")]
    BadEncoding { member: String, reason: String },

    #[error("member '{member}' is not valid JSON: {reason}")]
    MalformedJson { member: String, reason: String },
}

pub(crate) trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// An opened VPAX archive
pub struct VpaxContainer {
    archive: ZipArchive<Box<dyn ReadSeek>>,
    limits: ContainerLimits,
}

impl VpaxContainer {
    /// Open an archive from any seekable reader with default limits
    pub fn open_from_reader<R: Read + Seek + 'static>(
        reader: R,
    ) -> Result<VpaxContainer, ArchiveError> {
        Self::open_from_reader_with_limits(reader, ContainerLimits::default())
    }

    /// Open an archive from any seekable reader
    pub fn open_from_reader_with_limits<R: Read + Seek + 'static>(
        reader: R,
        limits: ContainerLimits,
    ) -> Result<VpaxContainer, ArchiveError> {
        let reader: Box<dyn ReadSeek> = Box::new(reader);
        let archive = ZipArchive::new(reader).map_err(|err| match err {
            ZipError::InvalidArchive(_) | ZipError::UnsupportedArchive(_) => {
                ArchiveError::NotZipArchive
            }
            ZipError::Io(e) => ArchiveError::Io(e),
            other => ArchiveError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                other.to_string(),
            )),
        })?;

        if archive.len() > limits.max_entries {
            return Err(ArchiveError::TooManyEntries {
                entries: archive.len(),
                limit: limits.max_entries,
            });
        }

        Ok(VpaxContainer { archive, limits })
    }

    /// Open an archive file with default limits
    pub fn open(path: impl AsRef<Path>) -> Result<VpaxContainer, ArchiveError> {
        Self::open_with_limits(path, ContainerLimits::default())
    }

    /// Open an archive file
    pub fn open_with_limits(
        path: impl AsRef<Path>,
        limits: ContainerLimits,
    ) -> Result<VpaxContainer, ArchiveError> {
        let file = std::fs::File::open(path)?;
        Self::open_from_reader_with_limits(file, limits)
    }

    /// Raw bytes of one member
    pub fn read_member(&mut self, member: &str) -> Result<Vec<u8>, ArchiveError> {
        let size = {
            let file = self.archive.by_name(member).map_err(|e| match e {
                ZipError::FileNotFound => ArchiveError::MemberNotFound {
                    member: member.to_string(),
                },
                other => ArchiveError::MemberRead {
                    member: member.to_string(),
                    reason: other.to_string(),
                },
            })?;
            file.size()
        };

        if size > self.limits.max_member_bytes {
            return Err(ArchiveError::MemberTooLarge {
                member: member.to_string(),
                size,
                limit: self.limits.max_member_bytes,
            });
        }

        let mut file = self
            .archive
            .by_name(member)
            .map_err(|e| ArchiveError::MemberRead {
                member: member.to_string(),
                reason: e.to_string(),
            })?;

        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|e| ArchiveError::MemberRead {
                member: member.to_string(),
                reason: e.to_string(),
            })?;

        Ok(buf)
    }

    /// Parse one member as a JSON document
    pub fn read_model(&mut self, member: &str) -> Result<Value, ArchiveError> {
        let bytes = self.read_member(member)?;
        let text = decode_member_text(member, &bytes)?;

        serde_json::from_str(&text).map_err(|e| ArchiveError::MalformedJson {
            member: member.to_string(),
            reason: e.to_string(),
        })
    }

    /// Names of all archive members
    pub fn member_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn limits(&self) -> &ContainerLimits {
        &self.limits
    }
}

/// Decode member bytes to text.
///
/// VPAX exporters emit UTF-8 (with or without BOM) or UTF-16 with BOM;
/// the encoding is detected from the first bytes.
fn decode_member_text(member: &str, bytes: &[u8]) -> Result<String, ArchiveError> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        decode_utf16(member, &bytes[2..], u16::from_le_bytes)
    } else if bytes.starts_with(&[0xFE, 0xFF]) {
        decode_utf16(member, &bytes[2..], u16::from_be_bytes)
    } else {
        let text = std::str::from_utf8(bytes).map_err(|e| ArchiveError::BadEncoding {
            member: member.to_string(),
            reason: e.to_string(),
        })?;
        Ok(text.strip_prefix('\u{FEFF}').unwrap_or(text).to_string())
    }
}

fn decode_utf16(
    member: &str,
    bytes: &[u8],
    from_bytes: fn([u8; 2]) -> u16,
) -> Result<String, ArchiveError> {
    if bytes.len() % 2 != 0 {
        return Err(ArchiveError::BadEncoding {
            member: member.to_string(),
            reason: "odd number of bytes in UTF-16 content".to_string(),
        });
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| from_bytes([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&units).map_err(|e| ArchiveError::BadEncoding {
        member: member.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn archive_with(members: &[(&str, &[u8])]) -> Cursor<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in members {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(bytes).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn read_model_member() {
        let cursor = archive_with(&[("DaxModel.json", br#"{"Tables": []}"#)]);
        let mut container = VpaxContainer::open_from_reader(cursor).unwrap();

        assert_eq!(container.len(), 1);
        assert_eq!(container.member_names(), vec!["DaxModel.json"]);

        let model = container.read_model("DaxModel.json").unwrap();
        assert!(model["Tables"].as_array().unwrap().is_empty());
    }

    #[test]
    fn missing_member() {
        let cursor = archive_with(&[("other.json", b"{}")]);
        let mut container = VpaxContainer::open_from_reader(cursor).unwrap();

        let err = container.read_model("DaxModel.json").unwrap_err();
        assert!(matches!(err, ArchiveError::MemberNotFound { .. }));
    }

    #[test]
    fn not_a_zip() {
        let err = VpaxContainer::open_from_reader(Cursor::new(b"plain text".to_vec()))
            .err()
            .unwrap();
        assert!(matches!(err, ArchiveError::NotZipArchive));
    }

    #[test]
    fn malformed_json_member() {
        let cursor = archive_with(&[("DaxModel.json", b"not json")]);
        let mut container = VpaxContainer::open_from_reader(cursor).unwrap();

        let err = container.read_model("DaxModel.json").unwrap_err();
        assert!(matches!(err, ArchiveError::MalformedJson { .. }));
    }

    #[test]
    fn member_too_large() {
        let cursor = archive_with(&[("DaxModel.json", b"{}")]);
        let limits = ContainerLimits {
            max_entries: 10,
            max_member_bytes: 1,
        };
        let mut container =
            VpaxContainer::open_from_reader_with_limits(cursor, limits).unwrap();

        let err = container.read_model("DaxModel.json").unwrap_err();
        assert!(matches!(err, ArchiveError::MemberTooLarge { .. }));
    }

    #[test]
    fn too_many_entries() {
        let cursor = archive_with(&[("a", b"1"), ("b", b"2")]);
        let limits = ContainerLimits {
            max_entries: 1,
            max_member_bytes: 1024,
        };
        let err = VpaxContainer::open_from_reader_with_limits(cursor, limits)
            .err()
            .unwrap();
        assert!(matches!(err, ArchiveError::TooManyEntries { entries: 2, limit: 1 }));
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(br#"{"Tables": []}"#);
        let cursor = archive_with(&[("DaxModel.json", &bytes)]);
        let mut container = VpaxContainer::open_from_reader(cursor).unwrap();

        let model = container.read_model("DaxModel.json").unwrap();
        assert!(model.get("Tables").is_some());
    }

    #[test]
    fn utf16_le_member() {
        let text = r#"{"Tables": [{"TableName": "Ventas"}]}"#;
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let cursor = archive_with(&[("DaxModel.json", &bytes)]);
        let mut container = VpaxContainer::open_from_reader(cursor).unwrap();

        let model = container.read_model("DaxModel.json").unwrap();
        assert_eq!(model["Tables"][0]["TableName"], "Ventas");
    }
}
