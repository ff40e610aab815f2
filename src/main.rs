use anyhow::{Context, Result};
use gong_openapi::cli::{self, Grouping, Mode};
use gong_openapi::{query, render, spec};
use std::env;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = cli::build_inspector_cli().get_matches();
    cli::setup_logging(matches.get_flag("debug"))?;

    let mode = Mode::from_matches(&matches);

    let cwd = env::current_dir().context("resolve current directory")?;
    let path = spec::resolve_spec_path(
        matches.get_one::<String>("spec_file").map(String::as_str),
        &cwd,
    )?;
    log::info!("using spec file {}", path.display());
    let api = spec::load_spec(&path)?;
    log::debug!(
        "{} endpoints, {} schemas, {} tags",
        api.endpoints.len(),
        api.schemas.len(),
        api.tags.len()
    );

    let lines = match &mode {
        Mode::Info => render::info(api.info.as_ref()),
        Mode::Auth => render::auth(&query::auth(&api)),
        Mode::Schema(name) => render::schema(name, query::schema(&api, name)?),
        Mode::Endpoint(path) => render::endpoint_details(path, &query::endpoint(&api, path)?),
        Mode::Search(term) => render::search(term, &query::search(&api, term)),
        Mode::Category(name) => render::category(&query::category(&api, name)?),
        Mode::ListGroups => render::groups(query::groups(&api)),
        Mode::DescribeGroup(name) => render::describe_group(query::describe_group(&api, name)?),
        Mode::List { grouped_by, method } => {
            let method = method.as_deref();
            match grouped_by {
                None => render::list(&query::list(&api, method)),
                Some(Grouping::Tag) => render::list_by_tag(&query::group_by_tag(&api, method)),
                Some(Grouping::Method) => {
                    render::list_by_method(&query::group_by_method(&api, method))
                }
                Some(Grouping::Path) => render::list_by_path(&query::group_by_path(&api, method)),
            }
        }
    };

    render::write_lines(&lines)
}
