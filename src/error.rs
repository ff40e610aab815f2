//! Error types shared by the inspector and the downloader.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("{0}")]
    FileNotFound(String),

    #[error("malformed input in {location}: {message}")]
    MalformedInput { location: String, message: String },

    #[error("{kind} '{name}' not found{}", format_suggestions(.suggestions))]
    NotFound {
        kind: &'static str,
        name: String,
        suggestions: Vec<String>,
    },

    #[error("multiple {kind}s match '{name}': {}", .candidates.join(", "))]
    Ambiguous {
        kind: &'static str,
        name: String,
        candidates: Vec<String>,
    },

    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("http {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("{action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn malformed(location: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Error::MalformedInput {
            location: location.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    format!(" (did you mean: {}?)", suggestions.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_lists_suggestions() {
        let err = Error::NotFound {
            kind: "category",
            name: "nonexistent".to_string(),
            suggestions: vec!["Calls".to_string(), "Users".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "category 'nonexistent' not found (did you mean: Calls, Users?)"
        );
    }

    #[test]
    fn not_found_without_suggestions_is_plain() {
        let err = Error::NotFound {
            kind: "schema",
            name: "Missing".to_string(),
            suggestions: Vec::new(),
        };
        assert_eq!(err.to_string(), "schema 'Missing' not found");
    }
}
