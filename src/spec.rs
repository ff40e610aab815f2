//! Loading an OpenAPI JSON document into a read-only `ApiSpec`.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const SPEC_FILE_SUFFIX: &str = "-openapi.json";

const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

// Fields below fall back to their default when the document gives them the
// wrong JSON type, so one odd entry never hides the rest of the document.

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Info {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagDef {
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SecurityScheme {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub scheme: Option<String>,
    #[serde(rename = "bearerFormat", default, deserialize_with = "lenient")]
    pub bearer_format: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "in", default, deserialize_with = "lenient")]
    pub location: Option<String>,
}

pub type SecurityRequirement = IndexMap<String, Vec<String>>;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Parameter {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "in", default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub required: bool,
    #[serde(rename = "$ref", default, deserialize_with = "lenient")]
    pub reference: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Operation {
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(rename = "operationId", default, deserialize_with = "lenient")]
    pub operation_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub parameters: Vec<Parameter>,
    #[serde(rename = "requestBody", default, deserialize_with = "lenient")]
    pub request_body: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub responses: IndexMap<String, Value>,
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(&value).unwrap_or_default())
}

/// Keeps the readable items of an array and drops the rest.
fn lenient_seq<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect())
}

/// `true`, `"true"` and `"TRUE"` all count as set.
fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => flag,
        Value::String(text) => text.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// One (path, method) pair of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub path: String,
    /// Upper-case HTTP method.
    pub method: String,
    pub operation: Operation,
}

impl Endpoint {
    pub fn summary(&self) -> &str {
        self.operation.summary.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.operation.description.as_deref().unwrap_or("")
    }

    pub fn tags(&self) -> &[String] {
        &self.operation.tags
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiSpec {
    pub info: Option<Info>,
    pub tags: Vec<TagDef>,
    pub endpoints: Vec<Endpoint>,
    pub schemas: IndexMap<String, Value>,
    pub security_schemes: IndexMap<String, SecurityScheme>,
    pub security: Vec<SecurityRequirement>,
}

impl ApiSpec {
    /// Builds the view from a parsed document. Only a non-object root is an
    /// error; sections and entries that cannot be read are skipped with a
    /// warning.
    pub fn from_value(doc: &Value) -> Result<Self> {
        let Value::Object(root) = doc else {
            return Err(Error::malformed("document", "expected a JSON object"));
        };

        let info = root.get("info").and_then(|v| section::<Info>(v, "info"));
        let tags = root
            .get("tags")
            .map(|v| entries::<TagDef>(v, "tags"))
            .unwrap_or_default();
        let security = root
            .get("security")
            .map(|v| entries::<SecurityRequirement>(v, "security"))
            .unwrap_or_default();

        let components = root.get("components");
        let schemas = components
            .and_then(|c| c.get("schemas"))
            .and_then(|v| section::<IndexMap<String, Value>>(v, "components.schemas"))
            .unwrap_or_default();
        let security_schemes = components
            .and_then(|c| c.get("securitySchemes"))
            .map(|v| named_entries::<SecurityScheme>(v, "components.securitySchemes"))
            .unwrap_or_default();

        let endpoints = root.get("paths").map(extract_endpoints).unwrap_or_default();

        Ok(ApiSpec {
            info,
            tags,
            endpoints,
            schemas,
            security_schemes,
            security,
        })
    }
}

fn section<T: DeserializeOwned>(value: &Value, location: &str) -> Option<T> {
    match T::deserialize(value) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            log::warn!("ignoring {location}: {err}");
            None
        }
    }
}

fn entries<T: DeserializeOwned>(value: &Value, location: &str) -> Vec<T> {
    let Value::Array(items) = value else {
        log::warn!("ignoring {location}: expected an array");
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| section(item, &format!("{location}[{idx}]")))
        .collect()
}

fn named_entries<T: DeserializeOwned>(value: &Value, location: &str) -> IndexMap<String, T> {
    let Value::Object(map) = value else {
        log::warn!("ignoring {location}: expected an object");
        return IndexMap::new();
    };
    map.iter()
        .filter_map(|(name, item)| {
            section(item, &format!("{location}.{name}")).map(|parsed| (name.clone(), parsed))
        })
        .collect()
}

fn extract_endpoints(paths: &Value) -> Vec<Endpoint> {
    let Value::Object(paths) = paths else {
        log::warn!("ignoring paths: expected an object");
        return Vec::new();
    };

    let mut out = Vec::new();
    for (path, item) in paths {
        let Value::Object(item) = item else {
            log::warn!("ignoring paths.{path}: expected an object");
            continue;
        };
        for (key, op) in item {
            let method = key.to_ascii_lowercase();
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }
            let Some(operation) = section::<Operation>(op, &format!("paths.{path}.{key}")) else {
                continue;
            };
            out.push(Endpoint {
                path: path.clone(),
                method: method.to_ascii_uppercase(),
                operation,
            });
        }
    }
    out
}

/// Finds the first `*-openapi.json` file in `dir`, by name.
pub fn discover_spec_file(dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|err| Error::io("read directory", dir, err))?;

    let mut found: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(SPEC_FILE_SUFFIX))
        })
        .map(|entry| entry.path())
        .collect();
    found.sort();

    match found.into_iter().next() {
        Some(path) => {
            log::debug!("discovered spec file {}", path.display());
            Ok(path)
        }
        None => Err(Error::FileNotFound(format!(
            "no *{SPEC_FILE_SUFFIX} file found in {}",
            dir.display()
        ))),
    }
}

pub fn resolve_spec_path(explicit: Option<&str>, dir: &Path) -> Result<PathBuf> {
    let path = match explicit {
        Some(value) => local_path(value),
        None => discover_spec_file(dir)?,
    };

    let conventional = path
        .file_name()
        .and_then(|v| v.to_str())
        .is_some_and(|name| name.ends_with(SPEC_FILE_SUFFIX));
    if !conventional {
        log::warn!(
            "spec file {} does not follow the [platform]{SPEC_FILE_SUFFIX} naming pattern",
            path.display()
        );
    }
    Ok(path)
}

pub fn load_spec(path: &Path) -> Result<ApiSpec> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(Error::FileNotFound(format!(
                "file not found: {}",
                path.display()
            )));
        }
        Err(err) => return Err(Error::io("read", path, err)),
    };
    let doc: Value = serde_json::from_str(&raw)
        .map_err(|err| Error::malformed(path.display().to_string(), err))?;
    log::debug!("loaded {} ({} bytes)", path.display(), raw.len());
    ApiSpec::from_value(&doc)
}

fn local_path(value: &str) -> PathBuf {
    if let Some(path) = value.strip_prefix('@') {
        return PathBuf::from(path);
    }
    if let Some(path) = value.strip_prefix("file://") {
        return PathBuf::from(path);
    }
    PathBuf::from(value)
}
