// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Credential acquisition.
//!
//! ```text
//! gitlab.token set         --> Credential { token_type, token }
//! username + password set  --> POST <base>/oauth/token (password grant)
//! otherwise / grant failed --> no credential --> "Authorization: none none"
//! ```

use reqwest::StatusCode;

use super::client::GitlabClient;
use super::types::Credential;
use crate::config::types::GitlabConfig;
use crate::error::{MirrorResult, NetworkError};

/// Header value sent when no credential is available.
pub const NO_CREDENTIAL: &str = "none none";

/// `Authorization` header value for `credential`.
#[must_use]
pub fn authorization_header(credential: Option<&Credential>) -> String {
    match credential {
        Some(c) if !c.access_token.is_empty() => format!("{} {}", c.token_type, c.access_token),
        _ => NO_CREDENTIAL.to_string(),
    }
}

/// Exchange account name and password for an access token.
///
/// # Errors
///
/// Returns a `NetworkError` if the request fails or the server does not answer 200.
pub async fn password_grant(
    client: &GitlabClient,
    username: &str,
    password: &str,
) -> MirrorResult<Credential> {
    let url = format!("{}/oauth/token", client.base_url());
    tracing::debug!(%url, %username, "requesting access token");

    let response = client
        .http()
        .post(&url)
        .form(&[
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ])
        .send()
        .await
        .map_err(NetworkError::Reqwest)?;

    if response.status() != StatusCode::OK {
        return Err(NetworkError::HttpError {
            status: response.status().as_u16(),
            url,
        }
        .into());
    }

    let credential = response
        .json::<Credential>()
        .await
        .map_err(NetworkError::Reqwest)?;
    Ok(credential)
}

/// Resolve the credential for a run.
///
/// A configured token wins over the password grant. Failures are logged and
/// degrade to anonymous access.
pub async fn acquire(client: &GitlabClient, config: &GitlabConfig) -> Option<Credential> {
    if !config.token.is_empty() {
        return Some(Credential::new(&config.token_type, &config.token));
    }
    if config.username.is_empty() || config.password.is_empty() {
        tracing::warn!("no GitLab credential configured, continuing anonymously");
        return None;
    }

    match password_grant(client, &config.username, &config.password).await {
        Ok(credential) => {
            tracing::info!(username = %config.username, "obtained access token");
            Some(credential)
        }
        Err(e) => {
            tracing::warn!(username = %config.username, error = %e, "failed to obtain access token");
            None
        }
    }
}
