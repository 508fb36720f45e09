// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP client for the GitLab REST API.
//!
//! ```text
//! get_paginated(path)
//!   page=1 --> 200 --> collect --> x-page == x-total-pages? --> done
//!                                  x-next-page empty?        --> done
//!                                  else page = x-next-page   --> loop
//!          --> !200 --> done (keep what was collected)
//!          --> transport error --> Err
//! ```

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::auth;
use super::types::Credential;
use crate::config::types::GitlabConfig;
use crate::error::{ConfigError, MirrorResult, NetworkError};

/// Pagination headers returned by listing endpoints.
const HEADER_TOTAL_PAGES: &str = "x-total-pages";
const HEADER_PAGE: &str = "x-page";
const HEADER_NEXT_PAGE: &str = "x-next-page";

/// Authenticated GitLab API client.
#[derive(Debug, Clone)]
pub struct GitlabClient {
    http: Client,
    base_url: String,
    api_url: String,
    authorization: String,
    per_page: u32,
}

impl GitlabClient {
    /// Build a client for the configured instance, without a credential.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `base_url` is missing, or a `NetworkError` if
    /// it is not a valid URL or the HTTP client cannot be built.
    pub fn new(config: &GitlabConfig) -> MirrorResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ConfigError::MissingKey {
                section: "gitlab".to_string(),
                key: "base_url".to_string(),
            }
            .into());
        }
        reqwest::Url::parse(&base_url)
            .map_err(|e| NetworkError::InvalidUrl(format!("{base_url}: {e}")))?;

        let http = Client::builder()
            .user_agent(format!("gitlab-mirror/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(NetworkError::Reqwest)?;

        let api_path = config.api_path.trim_matches('/');
        let api_url = if api_path.is_empty() {
            base_url.clone()
        } else {
            format!("{base_url}/{api_path}")
        };

        Ok(Self {
            http,
            base_url,
            api_url,
            authorization: auth::authorization_header(None),
            per_page: config.per_page.clamp(1, 100),
        })
    }

    /// Use `credential` for every following request.
    #[must_use]
    pub fn with_credential(mut self, credential: Option<&Credential>) -> Self {
        self.authorization = auth::authorization_header(credential);
        self
    }

    #[must_use]
    pub fn http(&self) -> &Client {
        &self.http
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Value sent in the `Authorization` header.
    #[must_use]
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// Fetch a single resource. Any status other than 200 yields `None`.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` on transport failure or an undecodable body.
    pub async fn get_one<T: DeserializeOwned>(&self, path: &str) -> MirrorResult<Option<T>> {
        let url = format!("{}{path}", self.api_url);
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .header("Authorization", &self.authorization)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(NetworkError::Reqwest)?;

        if response.status() != StatusCode::OK {
            tracing::warn!(
                %url,
                status = %response.status(),
                "GitLab API returned non-success status"
            );
            return Ok(None);
        }

        let body = response.json::<T>().await.map_err(NetworkError::Reqwest)?;
        Ok(Some(body))
    }

    /// Fetch every page of a listing endpoint, ordered by `order_by` descending.
    ///
    /// A non-200 page ends the walk; items of earlier pages are kept.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` on transport failure or an undecodable body.
    pub async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        order_by: &str,
    ) -> MirrorResult<Vec<T>> {
        let url = format!("{}{path}", self.api_url);
        let per_page = self.per_page.to_string();
        let mut items = Vec::new();
        let mut page = "1".to_string();

        loop {
            tracing::debug!(%url, %page, "GET");
            let response = self
                .http
                .get(&url)
                .header("Authorization", &self.authorization)
                .header("Accept", "application/json")
                .query(&[
                    ("order_by", order_by),
                    ("sort", "desc"),
                    ("per_page", per_page.as_str()),
                    ("page", page.as_str()),
                ])
                .send()
                .await
                .map_err(NetworkError::Reqwest)?;

            if response.status() != StatusCode::OK {
                tracing::warn!(
                    %url,
                    %page,
                    status = %response.status(),
                    "GitLab API returned non-success status"
                );
                break;
            }

            let header = |name: &str| {
                response
                    .headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default()
            };
            let total_pages = header(HEADER_TOTAL_PAGES);
            let current_page = header(HEADER_PAGE);
            let next_page = header(HEADER_NEXT_PAGE);

            let mut batch = response
                .json::<Vec<T>>()
                .await
                .map_err(NetworkError::Reqwest)?;
            items.append(&mut batch);

            if total_pages == current_page || total_pages == "0" || next_page.is_empty() {
                break;
            }
            page = next_page;
        }

        Ok(items)
    }
}
