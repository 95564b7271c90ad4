// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use compudb_app::{Company, Computer, ComputerId, SortSpec};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        Url::parse(&base_url).with_context(|| format!("invalid api.base_url {base_url:?}"))?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn list_computers(&self, sort: &SortSpec) -> Result<Vec<Computer>> {
        let response = self
            .http
            .get(format!(
                "{}/api/computers?sort={}",
                self.base_url,
                sort.query()
            ))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response.json().context("decode computer list")
    }

    pub fn get_computer(&self, id: ComputerId) -> Result<Computer> {
        let response = self
            .http
            .get(format!("{}/api/computers/{}", self.base_url, id.get()))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(anyhow!("computer {} not found", id.get()));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response
            .json()
            .with_context(|| format!("decode computer {}", id.get()))
    }

    /// Creates a record the server has never seen. The server assigns the
    /// identifier and answers 201 with the stored representation.
    pub fn create_computer(&self, record: &Computer) -> Result<Computer> {
        if record.id.is_some() {
            bail!("new computer must not carry an id -- the server assigns one");
        }

        let response = self
            .http
            .post(format!("{}/api/computers", self.base_url))
            .json(record)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response.json().context("decode created computer")
    }

    /// Full-record replacement keyed by the id in both path and body.
    pub fn update_computer(&self, record: &Computer) -> Result<Computer> {
        let Some(id) = record.id else {
            bail!("computer update requires an id");
        };

        let response = self
            .http
            .put(format!("{}/api/computers/{}", self.base_url, id.get()))
            .json(record)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response
            .json()
            .with_context(|| format!("decode updated computer {}", id.get()))
    }

    pub fn delete_computer(&self, id: ComputerId) -> Result<()> {
        let response = self
            .http
            .delete(format!("{}/api/computers/{}", self.base_url, id.get()))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }
        Ok(())
    }

    pub fn list_companies(&self) -> Result<Vec<Company>> {
        let response = self
            .http
            .get(format!("{}/api/companies", self.base_url))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response.json().context("decode company list")
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- check api.base_url and that the server is running ({} )",
        base_url,
        error
    )
}

/// Decodes an RFC 7807 problem-detail body where the server sends one,
/// falling back to the raw body or bare status code.
fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ProblemDetail>(body) {
        if let Some(detail) = parsed.detail.filter(|detail| !detail.is_empty()) {
            return anyhow!("server error ({}): {}", status.as_u16(), detail);
        }
        if let Some(title) = parsed.title.filter(|title| !title.is_empty()) {
            return anyhow!("server error ({}): {}", status.as_u16(), title);
        }
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ProblemDetail {
    title: Option<String>,
    detail: Option<String>,
}
