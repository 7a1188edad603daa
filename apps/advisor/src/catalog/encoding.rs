//! Text decoding for the reference CSV files.
//!
//! Files arrive either as UTF-8 (often with a BOM, as exported by spreadsheet tools)
//! or as CP949/EUC-KR. UTF-8 is tried first because strict UTF-8 validation
//! rejects CP949 Hangul almost always, while the reverse is not true.

use std::path::{Path, PathBuf};

use encoding_rs::EUC_KR;
use thiserror::Error;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is neither valid UTF-8 nor CP949", .0.display())]
    Undecodable(PathBuf),
}

/// Which decoder accepted the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Cp949,
}

/// Reads a file and decodes it, falling back from UTF-8 to CP949.
pub fn read_source(path: &Path) -> Result<(String, TextEncoding), SourceError> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SourceError::Missing(path.to_path_buf()))
        }
        Err(source) => {
            return Err(SourceError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    decode(&bytes).ok_or_else(|| SourceError::Undecodable(path.to_path_buf()))
}

/// Strict decode: never substitutes replacement characters.
pub fn decode(bytes: &[u8]) -> Option<(String, TextEncoding)> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return Some((text.to_string(), TextEncoding::Utf8));
    }

    EUC_KR
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| (text.into_owned(), TextEncoding::Cp949))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_with_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("과정명\n스마트공장".as_bytes());
        let (text, enc) = decode(&bytes).unwrap();
        assert_eq!(text, "과정명\n스마트공장");
        assert_eq!(enc, TextEncoding::Utf8);
    }

    #[test]
    fn test_cp949_falls_back() {
        let (encoded, _, had_errors) = EUC_KR.encode("훈련과정명(정답라벨)\nMES 기초");
        assert!(!had_errors);
        let (text, enc) = decode(&encoded).unwrap();
        assert_eq!(text, "훈련과정명(정답라벨)\nMES 기초");
        assert_eq!(enc, TextEncoding::Cp949);
    }

    #[test]
    fn test_garbage_is_undecodable() {
        assert!(decode(&[0xFF, 0xFF, 0x00, 0xFF]).is_none());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_source(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, SourceError::Missing(_)));
        assert!(err.to_string().contains("here.csv"));
    }
}
