//! Tools for fetching and exploring a vendor OpenAPI specification.
//!
//! `download-gong-spec` fetches the Gong API document once and stores it as
//! `gong-openapi.json`; `api-inspector` loads any `*-openapi.json` file and
//! answers one read-only query per run (endpoints, tags, schemas, auth).

pub mod cli;
pub mod client;
pub mod download;
pub mod error;
pub mod query;
pub mod render;
pub mod spec;
pub mod suggest;

pub use error::{Error, Result};
pub use spec::{ApiSpec, Endpoint, load_spec, resolve_spec_path};
