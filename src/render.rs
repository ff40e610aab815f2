//! Plain-text rendering of query results.

use anyhow::Result;
use indexmap::IndexMap;
use serde_json::Value;
use std::io::Write;

use crate::query::{AuthSummary, CategoryMatch, PathTree};
use crate::spec::{Endpoint, Info, TagDef};

const NOT_SPECIFIED: &str = "not specified";
const RULE_WIDTH: usize = 80;

fn or_unspecified(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_SPECIFIED,
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn push_block(out: &mut Vec<String>, text: &str) {
    out.extend(text.lines().map(str::to_string));
}

pub fn info(info: Option<&Info>) -> Vec<String> {
    let info = info.cloned().unwrap_or_default();
    let mut out = vec![
        "API Information:".to_string(),
        format!("Title: {}", or_unspecified(info.title.as_deref())),
        format!("Version: {}", or_unspecified(info.version.as_deref())),
        String::new(),
        "Description:".to_string(),
    ];
    push_block(&mut out, or_unspecified(info.description.as_deref()));
    out
}

pub fn auth(summary: &AuthSummary<'_>) -> Vec<String> {
    let mut out = vec!["Authentication Requirements:".to_string()];
    if summary.is_empty() {
        out.push("No authentication required".to_string());
        return out;
    }

    for (name, scheme) in summary.schemes {
        out.push(String::new());
        out.push(format!("{name}:"));
        out.push(format!("Type: {}", or_unspecified(scheme.kind.as_deref())));
        out.push(format!(
            "Description: {}",
            or_unspecified(scheme.description.as_deref())
        ));
        if let Some(value) = &scheme.scheme {
            out.push(format!("Scheme: {value}"));
        }
        if let Some(value) = &scheme.bearer_format {
            out.push(format!("Bearer Format: {value}"));
        }
        if let (Some(param), Some(location)) = (&scheme.name, &scheme.location) {
            out.push(format!("Parameter: {param} ({location})"));
        }
    }

    if !summary.requirements.is_empty() {
        out.push(String::new());
        out.push("Global requirements:".to_string());
        for requirement in summary.requirements {
            let parts: Vec<String> = requirement
                .iter()
                .map(|(name, scopes)| {
                    if scopes.is_empty() {
                        name.clone()
                    } else {
                        format!("{name} [{}]", scopes.join(", "))
                    }
                })
                .collect();
            if parts.is_empty() {
                out.push("- (anonymous)".to_string());
            } else {
                out.push(format!("- {}", parts.join(" + ")));
            }
        }
    }
    out
}

pub fn schema(name: &str, definition: &Value) -> Vec<String> {
    let mut out = vec![format!("Schema: {name}")];
    push_block(&mut out, &pretty(definition));
    out
}

pub fn endpoint_details(path: &str, endpoints: &[&Endpoint]) -> Vec<String> {
    let mut out = vec![format!("Endpoint: {path}")];
    for endpoint in endpoints {
        let op = &endpoint.operation;
        out.push(String::new());
        out.push(format!("Method: {}", endpoint.method));
        out.push(format!("Summary: {}", endpoint.summary()));
        out.push(format!("Description: {}", endpoint.description()));
        if !op.tags.is_empty() {
            out.push(format!("Tags: {}", op.tags.join(", ")));
        }
        if let Some(id) = &op.operation_id {
            out.push(format!("Operation ID: {id}"));
        }

        if !op.parameters.is_empty() {
            out.push(String::new());
            out.push("Parameters:".to_string());
            for param in &op.parameters {
                if let Some(reference) = &param.reference {
                    out.push(format!("  $ref: {reference}"));
                    continue;
                }
                out.push(format!(
                    "  {} ({})",
                    param.name.as_deref().unwrap_or("?"),
                    param.location.as_deref().unwrap_or("?")
                ));
                out.push(format!(
                    "    Description: {}",
                    param.description.as_deref().unwrap_or("")
                ));
                out.push(format!("    Required: {}", param.required));
            }
        }

        if let Some(body) = &op.request_body {
            out.push(String::new());
            out.push("Request Body:".to_string());
            push_block(&mut out, &pretty(body));
        }

        if !op.responses.is_empty() {
            out.push(String::new());
            out.push("Responses:".to_string());
            for (status, response) in &op.responses {
                let description = response
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                out.push(format!("  {status}: {description}"));
            }
        }
    }
    out
}

pub fn list(endpoints: &[&Endpoint]) -> Vec<String> {
    let mut out = vec!["Available Endpoints:".to_string()];
    let mut current: Option<&str> = None;
    for endpoint in endpoints {
        if current != Some(endpoint.path.as_str()) {
            out.push(String::new());
            out.push(endpoint.path.clone());
            current = Some(endpoint.path.as_str());
        }
        out.push(format!("  {}: {}", endpoint.method, endpoint.summary()));
    }
    out
}

pub fn list_by_tag(grouped: &IndexMap<String, Vec<&Endpoint>>) -> Vec<String> {
    let mut out = vec!["Endpoints by Tag:".to_string()];
    for (tag, endpoints) in grouped {
        out.push(String::new());
        out.push(format!("{tag}:"));
        for endpoint in endpoints {
            out.push(format!("  {} [{}]", endpoint.path, endpoint.method));
        }
    }
    out
}

pub fn list_by_method(grouped: &IndexMap<String, Vec<&Endpoint>>) -> Vec<String> {
    let mut out = vec!["Endpoints by Method:".to_string()];
    for (method, endpoints) in grouped {
        out.push(String::new());
        out.push(format!("{method}:"));
        for endpoint in endpoints {
            out.push(format!("  {}", endpoint.path));
        }
    }
    out
}

pub fn list_by_path(tree: &PathTree<'_>) -> Vec<String> {
    fn walk(out: &mut Vec<String>, node: &PathTree<'_>, depth: usize) {
        let indent = "  ".repeat(depth);
        for endpoint in &node.endpoints {
            out.push(format!("{indent}{}: {}", endpoint.method, endpoint.summary()));
        }
        for (segment, child) in &node.children {
            out.push(format!("{indent}{segment}/"));
            walk(out, child, depth + 1);
        }
    }

    let mut out = vec!["Endpoints by Path:".to_string()];
    walk(&mut out, tree, 0);
    out
}

pub fn category(found: &CategoryMatch<'_>) -> Vec<String> {
    let mut out = vec![format!("=== {} API Endpoints ===", found.tags.join(", "))];
    out.push(String::new());
    out.push("Summary:".to_string());
    for endpoint in &found.endpoints {
        out.push(format!("{} {}", endpoint.method, endpoint.path));
        out.push(format!("  {}", endpoint.summary()));
    }

    out.push(String::new());
    out.push("Detailed Specifications:".to_string());
    for endpoint in &found.endpoints {
        out.push(String::new());
        out.push("=".repeat(RULE_WIDTH));
        out.push(String::new());
        out.extend(endpoint_details(&endpoint.path, &[*endpoint]));
    }
    out
}

pub fn search(term: &str, endpoints: &[&Endpoint]) -> Vec<String> {
    if endpoints.is_empty() {
        return vec![format!("No endpoints match '{term}'")];
    }
    let mut out = vec!["Matching Endpoints:".to_string()];
    for endpoint in endpoints {
        out.push(format!(
            "{} {}: {}",
            endpoint.method,
            endpoint.path,
            endpoint.summary()
        ));
    }
    out
}

pub fn groups(tags: &[TagDef]) -> Vec<String> {
    if tags.is_empty() {
        return vec!["No endpoint groups found in the API specification".to_string()];
    }
    let mut out = vec!["Available Endpoint Groups:".to_string()];
    out.extend(tags.iter().map(|t| format!("- {}", t.name)));
    out
}

pub fn describe_group(tag: &TagDef) -> Vec<String> {
    let mut out = vec![format!("=== {} API Endpoints ===", tag.name), String::new()];
    match tag.description.as_deref() {
        Some(text) if !text.trim().is_empty() => push_block(&mut out, text),
        _ => out.push("No description provided".to_string()),
    }
    out
}

pub fn write_lines(lines: &[String]) -> Result<()> {
    for line in lines {
        write_stdout_line(line)?;
    }
    Ok(())
}

fn write_stdout_line(value: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    if let Err(err) = out.write_all(value.as_bytes()) {
        if err.kind() == std::io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        return Err(err.into());
    }
    if let Err(err) = out.write_all(b"\n") {
        if err.kind() == std::io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        return Err(err.into());
    }
    Ok(())
}
