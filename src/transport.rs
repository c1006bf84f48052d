use std::time::Duration;

use log::debug;
use reqwest::header::{COOKIE, SET_COOKIE};
use url::Url;

use crate::error::{Error, Result};
use crate::request::{Fields, Request, Response};

/// Performs one HTTP call per invocation.  Anything the network throws
/// comes back as [`Error::Transport`].
pub trait Transport: Send + Sync {
    fn execute(&self, req: &Request) -> Result<Response>;
}

fn transport_error<E>(url: &str, e: E) -> Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Error::Transport {
        url: url.to_string(),
        source: e.into(),
    }
}

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Client with reqwest's default timeout.
    pub fn new() -> Result<Self> {
        Self::from_builder(reqwest::blocking::Client::builder())
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::from_builder(reqwest::blocking::Client::builder().timeout(timeout))
    }

    fn from_builder(b: reqwest::blocking::ClientBuilder) -> Result<Self> {
        let client = b
            .gzip(true)
            .build()
            .map_err(|e| transport_error("<client>", e))?;
        Ok(Self { client })
    }

    fn build(&self, req: &Request) -> Result<reqwest::blocking::RequestBuilder> {
        let url = Url::parse(&req.url).map_err(|e| transport_error(&req.url, e))?;

        let mut b = self.client.request(req.method.clone(), url);
        // An empty query would still leave a trailing `?` on the URL.
        if !req.params.is_empty() {
            b = b.query(&req.params);
        }
        for (k, v) in &req.headers {
            b = b.header(k.as_str(), v.as_str());
        }
        if let Some(cookie) = req.cookie_header() {
            b = b.header(COOKIE, cookie);
        }
        if !req.data.is_empty() {
            b = b.form(&req.data);
        }
        Ok(b)
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, req: &Request) -> Result<Response> {
        debug!("{} {}", req.method, req.url);
        let resp = self
            .build(req)?
            .send()
            .map_err(|e| transport_error(&req.url, e))?;

        let url = resp.url().to_string();
        let status = resp.status();
        let headers = resp.headers().clone();
        let cookies: Fields = resp
            .cookies()
            .map(|c| (c.name().to_string(), c.value().to_string()))
            .collect();
        debug!(
            "{} -> {} ({} cookies, {} set-cookie headers)",
            req.url,
            status,
            cookies.len(),
            headers.get_all(SET_COOKIE).iter().count()
        );
        let body = resp.text().map_err(|e| transport_error(&url, e))?;

        Ok(Response {
            url,
            status,
            headers,
            cookies,
            body,
        })
    }
}
