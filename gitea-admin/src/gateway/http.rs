//! reqwest implementation of the gateway
//!
//! Requests go to `{base_url}/{endpoint}` with an `Authorization: token ...`
//! header. Each endpoint segment is percent-encoded, so a name containing
//! `?` or `#` stays inside its segment. The token is read once from the token file when the gateway is
//! built.

use std::path::Path;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::error::{GatewayError, GatewayResult};
use super::{payload, Gateway, GatewayResponse};
use crate::types::{AccessToken, CreateTokenOption};

const USER_AGENT: &str = concat!("gitea-admin/", env!("CARGO_PKG_VERSION"));

/// Gateway talking to a live Gitea instance
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    token: String,
}

impl HttpGateway {
    /// Create a gateway for `base_url` authenticating with `token`
    pub fn new(base_url: &str, token: impl Into<String>) -> GatewayResult<Self> {
        let base_url = parse_base_url(base_url)?;
        let client = build_client(base_url.as_str())?;

        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    /// Create a gateway reading its token from `token_file`
    pub fn from_token_file(base_url: &str, token_file: &Path) -> GatewayResult<Self> {
        let token = read_token(token_file)?;
        Self::new(base_url, token)
    }

    fn url(&self, endpoint: &str) -> GatewayResult<Url> {
        join(&self.base_url, endpoint)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/json")
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> GatewayResult<GatewayResponse> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        decode(endpoint, response).await
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    #[instrument(skip(self, query), fields(method = "GET"))]
    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> GatewayResult<GatewayResponse> {
        debug!(?query, "sending request");
        let request = self.client.get(self.url(endpoint)?).query(query);
        self.send(endpoint, request).await
    }

    #[instrument(skip(self, body), fields(method = "POST"))]
    async fn post(&self, endpoint: &str, body: &Value) -> GatewayResult<GatewayResponse> {
        let request = self.client.post(self.url(endpoint)?).json(body);
        self.send(endpoint, request).await
    }

    #[instrument(skip(self, body), fields(method = "PATCH"))]
    async fn patch(&self, endpoint: &str, body: &Value) -> GatewayResult<GatewayResponse> {
        let request = self.client.patch(self.url(endpoint)?).json(body);
        self.send(endpoint, request).await
    }

    #[instrument(skip(self), fields(method = "PUT"))]
    async fn put(&self, endpoint: &str) -> GatewayResult<GatewayResponse> {
        let request = self.client.put(self.url(endpoint)?);
        self.send(endpoint, request).await
    }

    #[instrument(skip(self), fields(method = "DELETE"))]
    async fn delete(&self, endpoint: &str) -> GatewayResult<GatewayResponse> {
        let request = self.client.delete(self.url(endpoint)?);
        self.send(endpoint, request).await
    }
}

/// Create a personal access token using basic authentication
///
/// This is the only call that does not use a token, since its purpose is to
/// obtain one. Any status other than 201 is returned as an error.
#[instrument(skip(password, option), fields(token_name = %option.name))]
pub async fn create_access_token(
    base_url: &str,
    username: &str,
    password: &str,
    option: &CreateTokenOption,
) -> GatewayResult<AccessToken> {
    let base_url = parse_base_url(base_url)?;
    let client = build_client(base_url.as_str())?;
    let endpoint = format!("users/{}/tokens", username);

    let response = client
        .post(join(&base_url, &endpoint)?)
        .basic_auth(username, Some(password))
        .header("Accept", "application/json")
        .json(&payload(option)?)
        .send()
        .await
        .map_err(|source| GatewayError::Transport {
            endpoint: endpoint.clone(),
            source,
        })?;

    decode(&endpoint, response).await?.expect_json(&endpoint, 201)
}

fn build_client(base_url: &str) -> GatewayResult<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|source| GatewayError::Transport {
            endpoint: base_url.to_string(),
            source,
        })
}

fn parse_base_url(base_url: &str) -> GatewayResult<Url> {
    let url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(GatewayError::InvalidBaseUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
    }
    Ok(url)
}

/// Append the segments of `endpoint` to the base path, percent-encoding each
fn join(base_url: &Url, endpoint: &str) -> GatewayResult<Url> {
    let mut url = base_url.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| GatewayError::InvalidBaseUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
        segments.pop_if_empty();
        for segment in endpoint.split('/').filter(|s| !s.is_empty()) {
            segments.push(segment);
        }
    }
    Ok(url)
}

fn read_token(path: &Path) -> GatewayResult<String> {
    let content = std::fs::read_to_string(path).map_err(|source| GatewayError::TokenFile {
        path: path.to_path_buf(),
        source,
    })?;

    let token = content.trim();
    if token.is_empty() {
        return Err(GatewayError::EmptyToken(path.to_path_buf()));
    }
    Ok(token.to_string())
}

async fn decode(endpoint: &str, response: reqwest::Response) -> GatewayResult<GatewayResponse> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|source| GatewayError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

    // Error pages from reverse proxies are not JSON; keep them readable.
    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text))
    };

    debug!(endpoint, status, "received response");
    Ok(GatewayResponse::new(status, body))
}
