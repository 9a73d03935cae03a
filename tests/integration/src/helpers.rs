//! Test helpers for integration tests
//!
//! Spawns the API on an ephemeral port with the in-memory store and signs
//! tokens with the server's own secret.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use grievance_api::{create_app, create_app_state, serve};
use grievance_common::{AppConfig, JwtService};
use grievance_core::Actor;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::ErrorEnvelope;

/// Secret shared by the test server and `TestServer::token`
pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789";

/// Ward seed loaded by every test server
pub const WARDS_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/wards.json");

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    jwt: JwtService,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with the default test configuration
    pub async fn start() -> Result<Self> {
        Self::start_with(&[]).await
    }

    /// Start a server with extra environment overrides
    pub async fn start_with(overrides: &[(&str, &str)]) -> Result<Self> {
        let config = test_config(overrides)?;
        let jwt = JwtService::new(&config.idp);

        let state = create_app_state(config).await?;
        let app = create_app(state)?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            jwt,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Bearer token for `actor`, valid for fifteen minutes
    pub fn token(&self, actor: &Actor) -> String {
        self.jwt
            .issue(actor, 900)
            .expect("test token should encode")
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn get_as(&self, actor: &Actor, path: &str) -> Result<Response> {
        self.send_as(actor, self.client.get(self.url(path))).await
    }

    pub async fn post_as<T: Serialize>(&self, actor: &Actor, path: &str, body: &T) -> Result<Response> {
        self.send_as(actor, self.client.post(self.url(path)).json(body)).await
    }

    pub async fn put_as<T: Serialize>(&self, actor: &Actor, path: &str, body: &T) -> Result<Response> {
        self.send_as(actor, self.client.put(self.url(path)).json(body)).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    async fn send_as(&self, actor: &Actor, request: RequestBuilder) -> Result<Response> {
        Ok(request.bearer_auth(self.token(actor)).send().await?)
    }
}

/// Memory-backed configuration with generous rate limits
pub fn test_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars: HashMap<String, String> = [
        ("APP_ENV", "development"),
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "0"),
        ("DATABASE_URL", "memory://"),
        ("WARDS_FILE", WARDS_FIXTURE),
        ("IDP_JWT_SECRET", TEST_JWT_SECRET),
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1000"),
        ("RATE_LIMIT_BURST", "1000"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    AppConfig::from_lookup(|key| vars.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert an error status and return the parsed error body
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<ErrorEnvelope> {
    assert_json(response, expected_status).await
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
