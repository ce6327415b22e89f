//! Loaders for the JSON inputs the pipeline consumes.
//!
//! Three shapes arrive from outside:
//!
//! - **Lookup files**: arrays of `{id, segment_content}` as downloaded from
//!   the API after segment upload
//! - **Mapping files**: arrays of working rows pairing `root_display_text`
//!   with numbered commentary fields
//! - **TOC payloads**: the nested `{sections: [...]}` shape
//!
//! Loaders reject structurally-empty inputs here rather than letting an
//! empty sequence produce a vacuously "successful" alignment downstream.

use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::core::digest::DigestLookup;
use crate::core::segment::{LookupSegment, MappingRow};
use crate::core::toc::TableOfContents;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} contains no {expected}")]
    Empty { path: String, expected: &'static str },
}

fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, ParseError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ParseError::Json {
        path: display,
        source,
    })
}

/// Load a lookup sequence file.
///
/// # Errors
///
/// Returns `ParseError::Empty` for a file holding zero segments, besides the
/// usual I/O and JSON errors.
pub fn load_lookup(path: &Path) -> Result<Vec<LookupSegment>, ParseError> {
    let segments: Vec<LookupSegment> = read_json_file(path)?;
    if segments.is_empty() {
        return Err(ParseError::Empty {
            path: path.display().to_string(),
            expected: "lookup segments",
        });
    }
    Ok(segments)
}

/// Load a mapping file of working rows.
pub fn load_mapping_rows(path: &Path) -> Result<Vec<MappingRow>, ParseError> {
    let rows: Vec<MappingRow> = read_json_file(path)?;
    if rows.is_empty() {
        return Err(ParseError::Empty {
            path: path.display().to_string(),
            expected: "mapping rows",
        });
    }
    Ok(rows)
}

/// Load a TOC payload.
pub fn load_toc(path: &Path) -> Result<TableOfContents, ParseError> {
    let toc: TableOfContents = read_json_file(path)?;
    if toc.segment_count() == 0 {
        return Err(ParseError::Empty {
            path: path.display().to_string(),
            expected: "TOC segments",
        });
    }
    Ok(toc)
}

/// Load a digest-keyed identifier table.
pub fn load_digest_lookup(path: &Path) -> Result<DigestLookup, ParseError> {
    let lookup: DigestLookup = read_json_file(path)?;
    if lookup.is_empty() {
        return Err(ParseError::Empty {
            path: path.display().to_string(),
            expected: "digest entries",
        });
    }
    Ok(lookup)
}

/// Load an arbitrary JSON payload for pass-through upload.
pub fn load_json_value(path: &Path) -> Result<serde_json::Value, ParseError> {
    read_json_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_lookup() {
        let file = write_temp(
            r#"[
                {"id": "s1", "segment_content": "foo"},
                {"id": "s2", "segment_content": "bar"}
            ]"#,
        );
        let segments = load_lookup(file.path()).unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].segment_content, "foo");
    }

    #[test]
    fn test_load_lookup_empty_rejected() {
        let file = write_temp("[]");
        assert!(matches!(
            load_lookup(file.path()),
            Err(ParseError::Empty { .. })
        ));
    }

    #[test]
    fn test_load_lookup_missing_file() {
        assert!(matches!(
            load_lookup(Path::new("/definitely/not/here.json")),
            Err(ParseError::Io { .. })
        ));
    }

    #[test]
    fn test_load_lookup_invalid_json() {
        let file = write_temp("{not json");
        assert!(matches!(
            load_lookup(file.path()),
            Err(ParseError::Json { .. })
        ));
    }

    #[test]
    fn test_load_mapping_rows() {
        let file = write_temp(
            r#"[{"root_display_text": "foo", "commentary_1": "a gloss"}]"#,
        );
        let rows = load_mapping_rows(file.path()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].root_display_text, "foo");
    }

    #[test]
    fn test_load_toc() {
        let file = write_temp(
            r#"{"sections": [{"segments": [{"segment_id": "x"}]}]}"#,
        );
        let toc = load_toc(file.path()).unwrap();
        assert_eq!(toc.segment_count(), 1);
    }

    #[test]
    fn test_load_toc_without_segments_rejected() {
        let file = write_temp(r#"{"sections": []}"#);
        assert!(matches!(
            load_toc(file.path()),
            Err(ParseError::Empty { .. })
        ));
    }
}
