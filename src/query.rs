//! Read-only projections over a loaded `ApiSpec`.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::spec::{ApiSpec, Endpoint, SecurityRequirement, SecurityScheme, TagDef};
use crate::suggest;

pub const UNTAGGED: &str = "untagged";

fn method_matches(endpoint: &Endpoint, filter: Option<&str>) -> bool {
    filter.is_none_or(|m| endpoint.method.eq_ignore_ascii_case(m))
}

pub fn list<'a>(spec: &'a ApiSpec, method: Option<&str>) -> Vec<&'a Endpoint> {
    spec.endpoints
        .iter()
        .filter(|e| method_matches(e, method))
        .collect()
}

pub fn group_by_tag<'a>(
    spec: &'a ApiSpec,
    method: Option<&str>,
) -> IndexMap<String, Vec<&'a Endpoint>> {
    let mut out: IndexMap<String, Vec<&Endpoint>> = IndexMap::new();
    for endpoint in list(spec, method) {
        if endpoint.tags().is_empty() {
            out.entry(UNTAGGED.to_string()).or_default().push(endpoint);
            continue;
        }
        for tag in endpoint.tags() {
            out.entry(tag.clone()).or_default().push(endpoint);
        }
    }
    out
}

pub fn group_by_method<'a>(
    spec: &'a ApiSpec,
    method: Option<&str>,
) -> IndexMap<String, Vec<&'a Endpoint>> {
    let mut out: IndexMap<String, Vec<&Endpoint>> = IndexMap::new();
    for endpoint in list(spec, method) {
        out.entry(endpoint.method.clone()).or_default().push(endpoint);
    }
    out
}

/// Path segments as a tree; `endpoints` holds what is defined at exactly
/// the node's path.
#[derive(Debug, Default)]
pub struct PathTree<'a> {
    pub endpoints: Vec<&'a Endpoint>,
    pub children: IndexMap<String, PathTree<'a>>,
}

pub fn group_by_path<'a>(spec: &'a ApiSpec, method: Option<&str>) -> PathTree<'a> {
    let mut root = PathTree::default();
    for endpoint in list(spec, method) {
        let mut node = &mut root;
        for part in endpoint.path.trim_matches('/').split('/') {
            if part.is_empty() {
                continue;
            }
            node = node.children.entry(part.to_string()).or_default();
        }
        node.endpoints.push(endpoint);
    }
    root
}

#[derive(Debug)]
pub struct CategoryMatch<'a> {
    pub tags: Vec<String>,
    pub endpoints: Vec<&'a Endpoint>,
}

/// Tag names used by operations, in first-appearance order.
pub fn operation_tags(spec: &ApiSpec) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for tag in spec.endpoints.iter().flat_map(|e| e.tags()) {
        if !out.contains(&tag.as_str()) {
            out.push(tag);
        }
    }
    out
}

pub fn category<'a>(spec: &'a ApiSpec, name: &str) -> Result<CategoryMatch<'a>> {
    let needle = name.to_lowercase();
    let available = operation_tags(spec);

    let mut matched: Vec<&str> = available
        .iter()
        .copied()
        .filter(|tag| tag.to_lowercase() == needle)
        .collect();
    if matched.is_empty() {
        matched = available
            .iter()
            .copied()
            .filter(|tag| tag.to_lowercase().contains(&needle))
            .collect();
    }

    if matched.is_empty() {
        return Err(Error::NotFound {
            kind: "category",
            name: name.to_string(),
            suggestions: suggest::nearest(name, available, suggest::DEFAULT_LIMIT),
        });
    }

    let endpoints = spec
        .endpoints
        .iter()
        .filter(|e| e.tags().iter().any(|t| matched.contains(&t.as_str())))
        .collect();

    Ok(CategoryMatch {
        tags: matched.into_iter().map(str::to_string).collect(),
        endpoints,
    })
}

pub fn search<'a>(spec: &'a ApiSpec, term: &str) -> Vec<&'a Endpoint> {
    let needle = term.to_lowercase();
    let hit = |text: &str| text.to_lowercase().contains(&needle);
    spec.endpoints
        .iter()
        .filter(|e| {
            hit(e.path.as_str())
                || hit(e.summary())
                || hit(e.description())
                || e.tags().iter().any(|t| hit(t.as_str()))
        })
        .collect()
}

pub fn endpoint<'a>(spec: &'a ApiSpec, path: &str) -> Result<Vec<&'a Endpoint>> {
    let found: Vec<&Endpoint> = spec.endpoints.iter().filter(|e| e.path == path).collect();
    if found.is_empty() {
        let mut paths: Vec<&str> = spec.endpoints.iter().map(|e| e.path.as_str()).collect();
        paths.dedup();
        return Err(Error::NotFound {
            kind: "endpoint",
            name: path.to_string(),
            suggestions: suggest::nearest(path, paths, suggest::DEFAULT_LIMIT),
        });
    }
    Ok(found)
}

pub fn schema<'a>(spec: &'a ApiSpec, name: &str) -> Result<&'a Value> {
    spec.schemas.get(name).ok_or_else(|| Error::NotFound {
        kind: "schema",
        name: name.to_string(),
        suggestions: suggest::nearest(
            name,
            spec.schemas.keys().map(String::as_str),
            suggest::DEFAULT_LIMIT,
        ),
    })
}

#[derive(Debug)]
pub struct AuthSummary<'a> {
    pub schemes: &'a IndexMap<String, SecurityScheme>,
    pub requirements: &'a [SecurityRequirement],
}

impl AuthSummary<'_> {
    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty() && self.requirements.is_empty()
    }
}

pub fn auth(spec: &ApiSpec) -> AuthSummary<'_> {
    AuthSummary {
        schemes: &spec.security_schemes,
        requirements: &spec.security,
    }
}

pub fn groups(spec: &ApiSpec) -> &[TagDef] {
    &spec.tags
}

pub fn describe_group<'a>(spec: &'a ApiSpec, name: &str) -> Result<&'a TagDef> {
    let needle = name.to_lowercase();
    let mut matches: Vec<&TagDef> = spec
        .tags
        .iter()
        .filter(|t| t.name.to_lowercase() == needle)
        .collect();
    if matches.is_empty() {
        matches = spec
            .tags
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&needle))
            .collect();
    }

    match matches.as_slice() {
        [] => Err(Error::NotFound {
            kind: "endpoint group",
            name: name.to_string(),
            suggestions: suggest::nearest(
                name,
                spec.tags.iter().map(|t| t.name.as_str()),
                suggest::DEFAULT_LIMIT,
            ),
        }),
        [single] => Ok(*single),
        many => Err(Error::Ambiguous {
            kind: "endpoint group",
            name: name.to_string(),
            candidates: many.iter().map(|t| t.name.clone()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ApiSpec {
        ApiSpec::from_value(&json!({
            "openapi": "3.0.1",
            "tags": [
                { "name": "Calls", "description": "Call data" },
                { "name": "Calls Extensive", "description": "Extended call data" },
                { "name": "Users" }
            ],
            "paths": {
                "/v2/calls": {
                    "get": { "summary": "List calls", "tags": ["Calls"] },
                    "post": { "summary": "Add new call", "tags": ["Calls"] }
                },
                "/v2/calls/extensive": {
                    "post": {
                        "summary": "Retrieve filtered call details",
                        "description": "Lists detailed call data",
                        "tags": ["Calls", "Calls Extensive"]
                    }
                },
                "/v2/users": {
                    "get": { "summary": "List all users", "tags": ["Users"] }
                },
                "/v2/health": {
                    "get": { "summary": "Ping" }
                }
            },
            "components": {
                "schemas": {
                    "Call": { "type": "object", "properties": { "id": { "type": "string" } } },
                    "User": { "type": "object" }
                }
            }
        }))
        .unwrap()
    }

    fn pairs(endpoints: &[&Endpoint]) -> Vec<String> {
        endpoints
            .iter()
            .map(|e| format!("{} {}", e.method, e.path))
            .collect()
    }

    #[test]
    fn list_has_every_pair_once() {
        let spec = sample();
        assert_eq!(
            pairs(&list(&spec, None)),
            vec![
                "GET /v2/calls",
                "POST /v2/calls",
                "POST /v2/calls/extensive",
                "GET /v2/users",
                "GET /v2/health",
            ]
        );
        assert_eq!(pairs(&list(&spec, Some("post"))).len(), 2);
    }

    #[test]
    fn tag_groups_keep_first_appearance_order() {
        let spec = sample();
        let grouped = group_by_tag(&spec, None);
        let names: Vec<&str> = grouped.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Calls", "Calls Extensive", "Users", UNTAGGED]);
        assert_eq!(grouped["Calls"].len(), 3);
    }

    #[test]
    fn method_groups() {
        let spec = sample();
        let grouped = group_by_method(&spec, None);
        assert_eq!(grouped["GET"].len(), 3);
        assert_eq!(grouped["POST"].len(), 2);
    }

    #[test]
    fn path_tree_nests_segments() {
        let spec = sample();
        let tree = group_by_path(&spec, None);
        let v2 = &tree.children["v2"];
        assert!(v2.endpoints.is_empty());
        let calls = &v2.children["calls"];
        assert_eq!(calls.endpoints.len(), 2);
        assert_eq!(calls.children["extensive"].endpoints.len(), 1);
    }

    #[test]
    fn category_is_case_insensitive() {
        let spec = sample();
        let lower = category(&spec, "calls").unwrap();
        let upper = category(&spec, "CALLS").unwrap();
        assert_eq!(lower.tags, vec!["Calls"]);
        assert_eq!(pairs(&lower.endpoints), pairs(&upper.endpoints));
        assert_eq!(lower.endpoints.len(), 3);
    }

    #[test]
    fn category_falls_back_to_substring() {
        let spec = sample();
        let found = category(&spec, "extens").unwrap();
        assert_eq!(found.tags, vec!["Calls Extensive"]);
        assert_eq!(pairs(&found.endpoints), vec!["POST /v2/calls/extensive"]);
    }

    #[test]
    fn unknown_category_suggests_tags() {
        let spec = sample();
        match category(&spec, "userz").unwrap_err() {
            Error::NotFound { suggestions, .. } => assert_eq!(suggestions[0], "Users"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn search_covers_all_text_fields() {
        let spec = sample();
        assert_eq!(pairs(&search(&spec, "USERS")), vec!["GET /v2/users"]);
        assert_eq!(pairs(&search(&spec, "detailed")), vec!["POST /v2/calls/extensive"]);
        assert_eq!(pairs(&search(&spec, "extensive")), vec!["POST /v2/calls/extensive"]);
        assert!(search(&spec, "nothing-like-this").is_empty());
        assert_eq!(pairs(&search(&spec, "call")), pairs(&search(&spec, "call")));
    }

    #[test]
    fn endpoint_lookup_is_exact() {
        let spec = sample();
        assert_eq!(endpoint(&spec, "/v2/calls").unwrap().len(), 2);
        assert!(matches!(
            endpoint(&spec, "/V2/calls"),
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            endpoint(&spec, "/v2/call"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn every_schema_resolves_to_itself() {
        let spec = sample();
        for (name, definition) in &spec.schemas {
            assert_eq!(schema(&spec, name).unwrap(), definition);
        }
        assert!(matches!(schema(&spec, "call"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn auth_summary_empty_without_security() {
        let spec = sample();
        assert!(auth(&spec).is_empty());
    }

    #[test]
    fn describe_group_prefers_exact_match() {
        let spec = sample();
        assert_eq!(describe_group(&spec, "calls").unwrap().name, "Calls");
        assert_eq!(describe_group(&spec, "user").unwrap().name, "Users");
    }

    #[test]
    fn describe_group_reports_ambiguity() {
        let spec = sample();
        match describe_group(&spec, "call").unwrap_err() {
            Error::Ambiguous { candidates, .. } => {
                assert_eq!(candidates, vec!["Calls", "Calls Extensive"])
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            describe_group(&spec, "billing"),
            Err(Error::NotFound { .. })
        ));
    }
}
