//! Argument definitions for both binaries.

use anyhow::{Context, Result};
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use std::env;

use crate::client::GONG_SPEC_URL;
use crate::download::{PLATFORM, default_output_path};

const MODE_GROUP: &str = "mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Tag,
    Path,
    Method,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List {
        grouped_by: Option<Grouping>,
        method: Option<String>,
    },
    Category(String),
    Search(String),
    Info,
    Auth,
    Schema(String),
    Endpoint(String),
    ListGroups,
    DescribeGroup(String),
}

impl Mode {
    /// Reads the selected mode. The required `mode` group guarantees one is
    /// set, so anything that is not another mode is `--list`.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let text = |id: &str| matches.get_one::<String>(id).cloned();

        if matches.get_flag("info") {
            return Mode::Info;
        }
        if matches.get_flag("auth") {
            return Mode::Auth;
        }
        if matches.get_flag("list_groups") {
            return Mode::ListGroups;
        }
        if let Some(v) = text("category") {
            return Mode::Category(v);
        }
        if let Some(v) = text("search") {
            return Mode::Search(v);
        }
        if let Some(v) = text("schema") {
            return Mode::Schema(v);
        }
        if let Some(v) = text("endpoint") {
            return Mode::Endpoint(v);
        }
        if let Some(v) = text("describe_group") {
            return Mode::DescribeGroup(v);
        }
        Mode::List {
            grouped_by: matches.get_one::<Grouping>("grouped_by").copied(),
            method: text("method"),
        }
    }
}

fn grouping_parser() -> impl TypedValueParser<Value = Grouping> {
    PossibleValuesParser::new(["tag", "path", "method"]).map(|value| match value.as_str() {
        "tag" => Grouping::Tag,
        "path" => Grouping::Path,
        _ => Grouping::Method,
    })
}

pub fn build_inspector_cli() -> Command {
    Command::new("api-inspector")
        .about("Explore an OpenAPI specification: endpoints, categories, schemas and auth")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("spec_file")
                .long("spec-file")
                .value_name("PATH")
                .env("API_INSPECTOR_SPEC_FILE")
                .help("OpenAPI JSON file (default: first *-openapi.json in the current directory)"),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .action(ArgAction::SetTrue)
                .help("List all endpoints with their summaries"),
        )
        .arg(
            Arg::new("category")
                .long("category")
                .value_name("NAME")
                .help("Show all endpoints of a category/tag (case-insensitive)"),
        )
        .arg(
            Arg::new("search")
                .long("search")
                .value_name("TERM")
                .help("Search path, summary, description and tags"),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .action(ArgAction::SetTrue)
                .help("Show API title, version and description"),
        )
        .arg(
            Arg::new("auth")
                .long("auth")
                .action(ArgAction::SetTrue)
                .help("Show security schemes and global requirements"),
        )
        .arg(
            Arg::new("schema")
                .long("schema")
                .value_name("NAME")
                .help("Show a schema from components.schemas"),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .value_name("PATH")
                .help("Show every method defined at an exact path (e.g. \"/v2/calls\")"),
        )
        .arg(
            Arg::new("list_groups")
                .long("list-groups")
                .action(ArgAction::SetTrue)
                .help("List the endpoint groups declared in the top-level tags"),
        )
        .arg(
            Arg::new("describe_group")
                .long("describe-group")
                .value_name("NAME")
                .help("Show the description of an endpoint group"),
        )
        .group(
            ArgGroup::new(MODE_GROUP)
                .args([
                    "list",
                    "category",
                    "search",
                    "info",
                    "auth",
                    "schema",
                    "endpoint",
                    "list_groups",
                    "describe_group",
                ])
                .required(true)
                .multiple(false),
        )
        .arg(
            Arg::new("grouped_by")
                .long("grouped-by")
                .value_name("GROUPING")
                .value_parser(grouping_parser())
                .requires("list")
                .help("Group --list output by tag, path (hierarchical) or method"),
        )
        .arg(
            Arg::new("method")
                .long("method")
                .value_name("METHOD")
                .requires("list")
                .help("Only list endpoints with this HTTP method"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
}

pub fn build_download_cli() -> Command {
    Command::new("download-gong-spec")
        .about("Download the Gong API OpenAPI specification")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("PATH")
                .help(format!(
                    "Output file (default: {})",
                    default_output_path(PLATFORM).display()
                )),
        )
        .arg(
            Arg::new("spec_version")
                .long("spec-version")
                .value_name("VERSION")
                .help("Value of the version query parameter (env: GONG_SPEC_VERSION)"),
        )
        .arg(
            Arg::new("base_url")
                .long("base-url")
                .value_name("URL")
                .help("Documentation endpoint (env: GONG_SPEC_URL)"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECONDS")
                .value_parser(clap::value_parser!(u64))
                .help("HTTP timeout in seconds"),
        )
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .action(ArgAction::SetTrue)
                .help("Re-indent the JSON before writing (default: raw body)"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
}

pub struct DownloadConfig {
    pub base_url: String,
    pub spec_version: String,
    pub output: std::path::PathBuf,
    pub timeout: Option<u64>,
    pub pretty: bool,
}

pub fn load_download_config(matches: &ArgMatches) -> DownloadConfig {
    let base_url = matches
        .get_one::<String>("base_url")
        .cloned()
        .or_else(|| env::var("GONG_SPEC_URL").ok())
        .unwrap_or_else(|| GONG_SPEC_URL.to_string());

    let spec_version = matches
        .get_one::<String>("spec_version")
        .cloned()
        .or_else(|| env::var("GONG_SPEC_VERSION").ok())
        .unwrap_or_default();

    let output = matches
        .get_one::<String>("output")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| default_output_path(PLATFORM));

    DownloadConfig {
        base_url,
        spec_version,
        output,
        timeout: matches.get_one::<u64>("timeout").copied(),
        pretty: matches.get_flag("pretty"),
    }
}

pub fn setup_logging(debug: bool) -> Result<()> {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_env("RUST_LOG")
        .filter_level(level)
        .try_init()
        .context("initialise logging")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> std::result::Result<ArgMatches, clap::Error> {
        build_inspector_cli().try_get_matches_from(
            std::iter::once("api-inspector").chain(args.iter().copied()),
        )
    }

    #[test]
    fn cli_definition_is_valid() {
        build_inspector_cli().debug_assert();
        build_download_cli().debug_assert();
    }

    #[test]
    fn conflicting_modes_are_rejected() {
        let err = parse(&["--info", "--auth"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn a_mode_is_required() {
        let err = parse(&["--spec-file", "x-openapi.json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn grouping_requires_list() {
        assert!(parse(&["--info", "--grouped-by", "tag"]).is_err());
        assert!(parse(&["--list", "--grouped-by", "nope"]).is_err());
    }

    #[test]
    fn modes_are_typed() {
        let matches = parse(&["--list", "--grouped-by", "method", "--method", "get"]).unwrap();
        assert_eq!(
            Mode::from_matches(&matches),
            Mode::List {
                grouped_by: Some(Grouping::Method),
                method: Some("get".to_string()),
            }
        );

        let matches = parse(&["--category", "calls"]).unwrap();
        assert_eq!(
            Mode::from_matches(&matches),
            Mode::Category("calls".to_string())
        );

        let matches = parse(&["--describe-group", "Users"]).unwrap();
        assert_eq!(
            Mode::from_matches(&matches),
            Mode::DescribeGroup("Users".to_string())
        );
    }

    #[test]
    fn list_without_grouping_is_flat() {
        let matches = parse(&["--list"]).unwrap();
        assert_eq!(
            Mode::from_matches(&matches),
            Mode::List {
                grouped_by: None,
                method: None,
            }
        );

        let matches = parse(&["--list", "--grouped-by", "path"]).unwrap();
        assert_eq!(
            Mode::from_matches(&matches),
            Mode::List {
                grouped_by: Some(Grouping::Path),
                method: None,
            }
        );
    }

    #[test]
    fn unknown_grouping_is_rejected_by_the_parser() {
        let err = parse(&["--list", "--grouped-by", "nope"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn logging_initialises_once() {
        setup_logging(false).unwrap();
        assert!(setup_logging(true).is_err());
    }

    #[test]
    fn download_defaults_to_platform_file() {
        let matches = build_download_cli()
            .try_get_matches_from(["download-gong-spec", "--base-url", "http://localhost:1"])
            .unwrap();
        let config = load_download_config(&matches);
        assert_eq!(config.output, std::path::PathBuf::from("gong-openapi.json"));
        assert_eq!(config.base_url, "http://localhost:1");
        assert!(!config.pretty);
    }
}
