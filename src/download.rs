//! Fetching the vendor spec and writing it to disk.

use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::client::SpecClient;
use crate::error::{Error, Result};
use crate::spec::SPEC_FILE_SUFFIX;

pub const PLATFORM: &str = "gong";

pub fn default_output_path(platform: &str) -> PathBuf {
    PathBuf::from(format!("{platform}{SPEC_FILE_SUFFIX}"))
}

/// Writes `body` to `path` via a temporary file in the same directory, so
/// the target is either replaced whole or left untouched.
pub fn write_spec(path: &Path, body: &[u8], pretty: bool) -> Result<()> {
    let contents = if pretty {
        let value: Value = serde_json::from_slice(body)
            .map_err(|err| Error::malformed("response body", err))?;
        let mut text = serde_json::to_string_pretty(&value)
            .map_err(|err| Error::malformed("response body", err))?;
        text.push('\n');
        text.into_bytes()
    } else {
        body.to_vec()
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file =
        NamedTempFile::new_in(dir).map_err(|err| Error::io("create temp file in", dir, err))?;
    file.write_all(&contents)
        .map_err(|err| Error::io("write", file.path().to_path_buf(), err))?;
    file.persist(path)
        .map_err(|err| Error::io("write", path, err.error))?;
    Ok(())
}

pub fn download(
    client: &SpecClient,
    version: &str,
    output: &Path,
    pretty: bool,
) -> Result<PathBuf> {
    let body = client.fetch(version)?;
    write_spec(output, &body, pretty)?;
    log::info!("wrote {} bytes from {} to {}", body.len(), client.base_url(), output.display());
    Ok(output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn default_name_follows_platform_convention() {
        assert_eq!(default_output_path(PLATFORM), PathBuf::from("gong-openapi.json"));
    }

    #[test]
    fn raw_body_is_written_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gong-openapi.json");
        write_spec(&path, br#"{"openapi":"3.0.1"}"#, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"openapi":"3.0.1"}"#);
    }

    #[test]
    fn pretty_reindents_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_spec(&path, br#"{"info":{"title":"Gong"}}"#, true).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n  \"info\": {\n    \"title\": \"Gong\"\n  }\n}\n"
        );
    }

    #[test]
    fn pretty_rejects_non_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let err = write_spec(&path, b"<html>", true).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_destination_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let err = write_spec(&path, b"{}", false).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
