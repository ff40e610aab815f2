use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderValue};
use std::time::Duration;

use crate::error::{Error, Result};

pub const GONG_SPEC_URL: &str = "https://gong.app.gong.io/ajax/settings/api/documentation/specs";

pub struct SpecClient {
    client: Client,
    base_url: String,
}

impl SpecClient {
    pub fn new(base_url: String, timeout: Option<u64>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            "gong-openapi/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(seconds) = timeout {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build().map_err(|source| Error::Network {
            url: base_url.clone(),
            source,
        })?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the spec body for `version` without interpreting it.
    pub fn fetch(&self, version: &str) -> Result<Vec<u8>> {
        let network = |source| Error::Network {
            url: self.base_url.clone(),
            source,
        };

        log::debug!("request GET {}?version={}", self.base_url, version);
        let resp = self
            .client
            .get(&self.base_url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .query(&[("version", version)])
            .send()
            .map_err(network)?;

        let status = resp.status();
        log::debug!("response status {}", status);
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(Error::Http {
                status,
                body: body.trim().to_string(),
            });
        }

        let bytes = resp.bytes().map_err(network)?;
        Ok(bytes.to_vec())
    }
}
